use anyhow::Context as _;
use tracing::info;

use crate::domain::notification::Notification;
use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

const MAILGUN_API: &str = "https://api.mailgun.net/v3";

/// Sender identity and link base shared by every mailer.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub frontend_url: String,
}

/// Delivers mail through the Mailgun messages API.
#[derive(Clone)]
pub struct MailgunMailer {
    pub client: reqwest::Client,
    pub api_key: String,
    pub domain: String,
    pub settings: MailSettings,
}

impl Mailer for MailgunMailer {
    async fn send(&self, notification: Notification) -> Result<(), AuthServiceError> {
        let mail = notification.render(&self.settings.frontend_url)?;
        let to = notification.recipient.mailbox();
        let form = [
            ("from", self.settings.from.as_str()),
            ("to", to.as_str()),
            ("subject", mail.subject.as_str()),
            ("html", mail.html.as_str()),
        ];

        self.client
            .post(format!("{MAILGUN_API}/{}/messages", self.domain))
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await
            .context("mailgun request")?
            .error_for_status()
            .context("mailgun response")?;
        Ok(())
    }
}

/// Service mailer picked from configuration at startup.
#[derive(Clone)]
pub enum AppMailer {
    Mailgun(MailgunMailer),
    /// Development: log the rendered message instead of sending it.
    Log(MailSettings),
    /// Drop every message.
    Disabled,
}

impl Mailer for AppMailer {
    async fn send(&self, notification: Notification) -> Result<(), AuthServiceError> {
        match self {
            Self::Mailgun(mailer) => mailer.send(notification).await,
            Self::Log(settings) => {
                let mail = notification.render(&settings.frontend_url)?;
                info!(
                    from = %settings.from,
                    to = %notification.recipient.mailbox(),
                    subject = %mail.subject,
                    html = %mail.html,
                    "outgoing mail (not sent)"
                );
                Ok(())
            }
            Self::Disabled => Ok(()),
        }
    }
}
