//! Contact form payloads: sanitization, validation and the notification body.
//!
//! Shared by the relay endpoint and the front-end client so both apply the
//! same rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NAME_MAX: usize = 120;
pub const EMAIL_MAX: usize = 200;
pub const BUDGET_MAX: usize = 80;
pub const MESSAGE_MAX: usize = 4000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("missing required fields")]
    MissingRequiredFields,
    #[error("invalid email")]
    InvalidEmail,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("mail relay credentials are not configured")]
    MissingSmtpCredentials,
    #[error("mail relay failed: {0}")]
    SendFailed(String),
}

impl ContactError {
    pub fn code(&self) -> &'static str {
        match self {
            ContactError::MissingRequiredFields => "missing_required_fields",
            ContactError::InvalidEmail => "invalid_email",
            ContactError::MethodNotAllowed => "method_not_allowed",
            ContactError::MissingSmtpCredentials => "missing_smtp_credentials",
            ContactError::SendFailed(_) => "send_failed",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ContactError::MissingRequiredFields | ContactError::InvalidEmail => 400,
            ContactError::MethodNotAllowed => 405,
            ContactError::MissingSmtpCredentials | ContactError::SendFailed(_) => 500,
        }
    }
}

/// Raw form payload as posted (JSON or form-encoded). Nothing here is trusted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
    pub website: Option<String>,
}

/// Sanitized, validated submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub budget: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validated {
    /// Honeypot field was filled: accept silently, send nothing.
    Honeypot,
    Submission(ContactSubmission),
}

/// JSON reply body: `{ok:true}` or `{ok:false,error:"..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactReply {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn error(err: &ContactError) -> Self {
        Self {
            ok: false,
            error: Some(err.code().to_string()),
        }
    }
}

impl ContactForm {
    /// Lenient JSON parse; malformed bodies become an empty form.
    pub fn from_json(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn is_honeypot(&self) -> bool {
        self.website
            .as_deref()
            .map(|w| !sanitize(w, BUDGET_MAX).is_empty())
            .unwrap_or(false)
    }

    pub fn validate(&self) -> Result<Validated, ContactError> {
        if self.is_honeypot() {
            return Ok(Validated::Honeypot);
        }
        let field = |v: &Option<String>, max| sanitize(v.as_deref().unwrap_or(""), max);
        let name = field(&self.name, NAME_MAX);
        let email = field(&self.email, EMAIL_MAX);
        let message = field(&self.message, MESSAGE_MAX);
        let budget = Some(field(&self.budget, BUDGET_MAX)).filter(|b| !b.is_empty());
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ContactError::MissingRequiredFields);
        }
        if !is_valid_email(&email) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(Validated::Submission(ContactSubmission {
            name,
            email,
            budget,
            message,
        }))
    }
}

/// Strip NUL and CR, trim and cap to `max` characters.
pub fn sanitize(input: &str, max: usize) -> String {
    let cleaned: String = input.chars().filter(|c| *c != '\0' && *c != '\r').collect();
    cleaned.trim().chars().take(max).collect::<String>().trim_end().to_string()
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
    if !clean(local) || !clean(domain) {
        return false;
    }
    let last = domain.len() - 1;
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < last)
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Outbound notification for the site owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub reply_to: String,
    pub text_body: String,
    pub html_body: String,
}

impl ContactSubmission {
    pub fn notification(&self) -> Notification {
        let budget = self.budget.as_deref().unwrap_or("not specified");
        let subject = format!("New enquiry from {}", self.name.replace('\n', " "));
        let text_body = format!(
            "Name: {}\nEmail: {}\nBudget: {}\n\n{}\n",
            self.name, self.email, budget, self.message
        );
        let html_body = format!(
            "<h2>New enquiry</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Budget:</strong> {}</p>\
             <p>{}</p>",
            escape_html(&self.name),
            escape_html(&self.email),
            escape_html(budget),
            escape_html(&self.message).replace('\n', "<br>")
        );
        Notification {
            subject,
            reply_to: self.email.clone(),
            text_body,
            html_body,
        }
    }
}

/// `mailto:` link carrying the same payload, used when the relay is unreachable.
pub fn mailto_fallback(to: &str, form: &ContactForm) -> String {
    let field = |v: &Option<String>, max| sanitize(v.as_deref().unwrap_or(""), max);
    let name = field(&form.name, NAME_MAX);
    let budget = field(&form.budget, BUDGET_MAX);
    let message = field(&form.message, MESSAGE_MAX);
    let subject = if name.is_empty() {
        "Project enquiry".to_string()
    } else {
        format!("Project enquiry from {name}")
    };
    let mut body = message;
    if !budget.is_empty() {
        body.push_str(&format!("\n\nBudget: {budget}"));
    }
    format!(
        "mailto:{}?subject={}&body={}",
        to,
        percent_encode(&subject),
        percent_encode(&body)
    )
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_control_bytes_and_caps() {
        assert_eq!(sanitize("  a\r\nb\0c  ", 10), "a\nbc");
        assert_eq!(sanitize("abcdef", 3), "abc");
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn mailto_encodes_payload() {
        let form = ContactForm {
            name: Some("Ada".into()),
            message: Some("Hi & bye".into()),
            ..Default::default()
        };
        let link = mailto_fallback("studio@example.com", &form);
        assert_eq!(
            link,
            "mailto:studio@example.com?subject=Project%20enquiry%20from%20Ada&body=Hi%20%26%20bye"
        );
    }
}
