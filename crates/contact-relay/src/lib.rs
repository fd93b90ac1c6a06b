//! HTTP relay for the contact form: validates a submission and hands the
//! notification to a [`Mailer`].

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Form, Json, Router};
use bytes::Bytes;
use futures_util::future::BoxFuture;
use log::{error, info, warn};
use serde::Serialize;
use showroom_core::contact::{ContactError, ContactForm, ContactReply, Notification, Validated};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8787";
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024;
pub const DEFAULT_TO: &str = "studio@example.com";

/// Outbound delivery of a contact notification.
pub trait Mailer: Send + Sync {
    fn send<'a>(&'a self, notification: &'a Notification) -> BoxFuture<'a, Result<(), ContactError>>;
}

/// Mail settings; read from the environment only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub to: String,
    pub from: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        let var = |k: &str| env::var(k).ok().filter(|v| !v.trim().is_empty());
        let user = var("SMTP_USER");
        let from = var("CONTACT_FROM")
            .or_else(|| user.clone())
            .unwrap_or_else(|| DEFAULT_TO.to_string());
        Self {
            api_url: var("MAIL_API_URL"),
            pass: var("SMTP_PASS"),
            to: var("CONTACT_TO").unwrap_or_else(|| DEFAULT_TO.to_string()),
            from,
            user,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_url.is_some() && self.user.is_some() && self.pass.is_some()
    }
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Submits notifications to a mail-API endpoint with basic auth.
pub struct HttpMailer {
    http: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn deliver(&self, n: &Notification) -> Result<(), ContactError> {
        let (Some(url), Some(user), Some(pass)) = (
            self.config.api_url.as_deref(),
            self.config.user.as_deref(),
            self.config.pass.as_deref(),
        ) else {
            return Err(ContactError::MissingSmtpCredentials);
        };
        let body = OutboundMessage {
            from: &self.config.from,
            to: &self.config.to,
            reply_to: &n.reply_to,
            subject: &n.subject,
            text: &n.text_body,
            html: &n.html_body,
        };
        let resp = self
            .http
            .post(url)
            .basic_auth(user, Some(pass))
            .json(&body)
            .send()
            .await
            .map_err(|e| ContactError::SendFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ContactError::SendFailed(format!(
                "mail api returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

impl Mailer for HttpMailer {
    fn send<'a>(&'a self, notification: &'a Notification) -> BoxFuture<'a, Result<(), ContactError>> {
        Box::pin(self.deliver(notification))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/contact", any(contact))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState, max_body_bytes: usize) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[relay] listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state, max_body_bytes)).await?;
    Ok(())
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

fn reply(err: &ContactError) -> Response {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (status, Json(ContactReply::error(err))).into_response();
    if *err == ContactError::MethodNotAllowed {
        resp.headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST"));
    }
    resp
}

fn is_form_encoded(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Body as a [`ContactForm`]; unparseable bodies yield an empty form.
async fn read_form(req: Request) -> Result<ContactForm, Response> {
    if is_form_encoded(&req) {
        return Ok(Form::<ContactForm>::from_request(req, &())
            .await
            .map(|Form(f)| f)
            .unwrap_or_default());
    }
    let body = Bytes::from_request(req, &())
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(ContactForm::from_json(&body))
}

pub async fn contact(State(state): State<AppState>, req: Request) -> Response {
    if req.method() != Method::POST {
        return reply(&ContactError::MethodNotAllowed);
    }
    let form = match read_form(req).await {
        Ok(form) => form,
        Err(resp) => return resp,
    };
    let submission = match form.validate() {
        Ok(Validated::Honeypot) => {
            info!("[relay] honeypot filled; dropping submission");
            return (StatusCode::OK, Json(ContactReply::ok())).into_response();
        }
        Ok(Validated::Submission(sub)) => sub,
        Err(err) => {
            warn!("[relay] rejected submission: {}", err.code());
            return reply(&err);
        }
    };
    match state.mailer.send(&submission.notification()).await {
        Ok(()) => {
            info!("[relay] notification sent");
            (StatusCode::OK, Json(ContactReply::ok())).into_response()
        }
        Err(err) => {
            error!("[relay] delivery failed: {err}");
            reply(&err)
        }
    }
}
