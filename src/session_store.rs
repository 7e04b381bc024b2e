//! Conversation state store.
//!
//! Sessions exist only while a form is in progress and are lost on restart.

use async_trait::async_trait;
use std::sync::Arc;
use teloxide::dispatching::dialogue::{InMemStorage, InMemStorageError, Storage};
use teloxide::types::ChatId;

use crate::dialogue::Session;
use crate::errors::SessionStoreError;

/// Owner of every in-progress form, keyed by conversation
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, conversation: ChatId) -> Result<Option<Session>, SessionStoreError>;

    async fn set(&self, conversation: ChatId, session: Session) -> Result<(), SessionStoreError>;

    /// Remove the session, returning it if one existed
    async fn delete(&self, conversation: ChatId) -> Result<Option<Session>, SessionStoreError>;
}

/// Process-local store on top of teloxide's dialogue storage
pub struct InMemorySessionStore {
    storage: Arc<InMemStorage<Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, conversation: ChatId) -> Result<Option<Session>, SessionStoreError> {
        Ok(Arc::clone(&self.storage).get_dialogue(conversation).await?)
    }

    async fn set(&self, conversation: ChatId, session: Session) -> Result<(), SessionStoreError> {
        Ok(Arc::clone(&self.storage)
            .update_dialogue(conversation, session)
            .await?)
    }

    async fn delete(&self, conversation: ChatId) -> Result<Option<Session>, SessionStoreError> {
        let existing = self.get(conversation).await?;
        match Arc::clone(&self.storage).remove_dialogue(conversation).await {
            Ok(()) => Ok(existing),
            Err(InMemStorageError::DialogueNotFound) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::FormStep;

    #[tokio::test]
    async fn test_sessions_are_isolated_per_conversation() {
        let store = InMemorySessionStore::new();
        let mut second = Session::start();
        second.step = FormStep::Budget;

        store.set(ChatId(1), Session::start()).await.unwrap();
        store.set(ChatId(2), second).await.unwrap();

        let first = store.get(ChatId(1)).await.unwrap().unwrap();
        assert_eq!(first.step, FormStep::Product);
        let second = store.get(ChatId(2)).await.unwrap().unwrap();
        assert_eq!(second.step, FormStep::Budget);

        let removed = store.delete(ChatId(1)).await.unwrap();
        assert_eq!(removed.map(|session| session.step), Some(FormStep::Product));
        assert!(store.get(ChatId(1)).await.unwrap().is_none());
        assert!(store.get(ChatId(2)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_session_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.delete(ChatId(9)).await.unwrap().is_none());

        store.set(ChatId(9), Session::start()).await.unwrap();
        assert!(store.delete(ChatId(9)).await.unwrap().is_some());
        assert!(store.delete(ChatId(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_replaces_existing_session() {
        let store = InMemorySessionStore::new();
        let mut advanced = Session::start();
        advanced.step = FormStep::City;

        store.set(ChatId(3), advanced).await.unwrap();
        store.set(ChatId(3), Session::start()).await.unwrap();

        let session = store.get(ChatId(3)).await.unwrap().unwrap();
        assert_eq!(session.step, FormStep::Product);
    }
}
