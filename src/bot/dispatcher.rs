//! Delivery of completed requests to the staff channel

use teloxide::types::ChatId;
use tracing::info;

use crate::errors::TransportError;
use crate::submission::SubmissionRecord;

use super::transport::MessageSender;

/// Deliver `record` to `staff_channel` with a single attempt.
///
/// Requests with a product photo go out as the photo with the record as its
/// caption; everything else is a plain text message.
pub async fn dispatch_submission(
    sender: &dyn MessageSender,
    staff_channel: ChatId,
    record: &SubmissionRecord,
) -> Result<(), TransportError> {
    let body = record.render();

    match record.image_ref.as_deref() {
        Some(image_ref) => {
            info!(channel_id = %staff_channel, "Sending request to staff channel (photo)");
            sender.send_photo(staff_channel, image_ref, &body).await
        }
        None => {
            info!(channel_id = %staff_channel, "Sending request to staff channel (text)");
            sender.send_text(staff_channel, &body, None).await
        }
    }
}
