//! Localized outgoing mail.

use anyhow::Context as _;
use askama::Template as _;
use serde::Serialize;

use crate::error::AuthServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Match a language tag such as `es-ES` on its primary subtag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// First supported entry of an `Accept-Language` header, else English.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .find_map(Self::from_tag)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Account verification link sent after sign-up.
    Registration { verification: String },
    /// Password reset link sent after a forgot-password request.
    ResetPassword { verification: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Recipient {
    /// `First Last <email>` mailbox form.
    pub fn mailbox(&self) -> String {
        format!("{} {} <{}>", self.first_name, self.last_name, self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub locale: Locale,
    pub template: Template,
    pub recipient: Recipient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub html: String,
}

#[derive(askama::Template)]
#[template(path = "mail/registration_en.html")]
struct RegistrationEn<'a> {
    first_name: &'a str,
    last_name: &'a str,
    link: &'a str,
}

#[derive(askama::Template)]
#[template(path = "mail/registration_es.html")]
struct RegistrationEs<'a> {
    first_name: &'a str,
    last_name: &'a str,
    link: &'a str,
}

#[derive(askama::Template)]
#[template(path = "mail/reset_en.html")]
struct ResetEn<'a> {
    email: &'a str,
    link: &'a str,
}

#[derive(askama::Template)]
#[template(path = "mail/reset_es.html")]
struct ResetEs<'a> {
    email: &'a str,
    link: &'a str,
}

impl Notification {
    /// Render subject and HTML body. Recipient fields are HTML-escaped.
    pub fn render(&self, frontend_url: &str) -> Result<RenderedMail, AuthServiceError> {
        let base = frontend_url.trim_end_matches('/');
        let r = &self.recipient;
        let locale = self.locale;
        let (subject, html) = match &self.template {
            Template::Registration { verification } => {
                let link = format!("{base}/verify/{verification}");
                let html = match locale {
                    Locale::En => RegistrationEn {
                        first_name: &r.first_name,
                        last_name: &r.last_name,
                        link: &link,
                    }
                    .render(),
                    Locale::Es => RegistrationEs {
                        first_name: &r.first_name,
                        last_name: &r.last_name,
                        link: &link,
                    }
                    .render(),
                };
                let subject = match locale {
                    Locale::En => "Verify your email",
                    Locale::Es => "Verificar tu email",
                };
                (subject, html.context("render registration mail")?)
            }
            Template::ResetPassword { verification } => {
                let link = format!("{base}/reset/{verification}");
                let html = match locale {
                    Locale::En => ResetEn {
                        email: &r.email,
                        link: &link,
                    }
                    .render(),
                    Locale::Es => ResetEs {
                        email: &r.email,
                        link: &link,
                    }
                    .render(),
                };
                let subject = match locale {
                    Locale::En => "Password recovery",
                    Locale::Es => "Recuperar contraseña",
                };
                (subject, html.context("render reset mail")?)
            }
        };
        Ok(RenderedMail {
            subject: subject.to_owned(),
            html,
        })
    }
}
