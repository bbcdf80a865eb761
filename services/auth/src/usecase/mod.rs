use tracing::{info, warn};

use crate::domain::notification::Notification;
use crate::domain::repository::Mailer;

pub mod authorize;
pub mod login;
pub mod password;
pub mod register;
pub mod token;
pub mod verify;

/// Send `notification` in the background.
///
/// Failures are logged and never reach the caller.
pub(crate) fn dispatch<M>(mailer: &M, notification: Notification)
where
    M: Mailer + Clone + 'static,
{
    let mailer = mailer.clone();
    tokio::spawn(async move {
        let to = notification.recipient.email.clone();
        match mailer.send(notification).await {
            Ok(()) => info!(to = %to, "notification sent"),
            Err(e) => warn!(to = %to, error = ?e, "notification failed"),
        }
    });
}
