// End-to-end tests for the relay endpoint over a loopback socket.

use std::sync::{Arc, Mutex};

use contact_relay::{router, AppState, HttpMailer, MailConfig, Mailer};
use futures_util::future::BoxFuture;
use serde_json::Value;
use showroom_core::contact::{ContactError, Notification};

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, n: &'a Notification) -> BoxFuture<'a, Result<(), ContactError>> {
        Box::pin(async move {
            if self.fail {
                return Err(ContactError::SendFailed("smtp down".into()));
            }
            self.sent.lock().unwrap().push(n.clone());
            Ok(())
        })
    }
}

async fn spawn(mailer: Arc<dyn Mailer>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState { mailer }, 16 * 1024);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/contact")
}

async fn post_json(url: &str, body: &str) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn valid_json_submission_is_sent() {
    let mailer = Arc::new(RecordingMailer::default());
    let url = spawn(mailer.clone()).await;
    let (status, body) = post_json(
        &url,
        r#"{"name":"Ada","email":"ada@example.com","message":"<hi>"}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({"ok": true}));
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to, "ada@example.com");
    assert!(sent[0].html_body.contains("&lt;hi&gt;"));
}

#[tokio::test]
async fn form_encoded_submission_is_accepted() {
    let mailer = Arc::new(RecordingMailer::default());
    let url = spawn(mailer.clone()).await;
    let resp = reqwest::Client::new()
        .post(&url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Ada+L&email=ada%40example.com&budget=5k&message=Hello")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text_body.contains("Name: Ada L"));
    assert!(sent[0].text_body.contains("Budget: 5k"));
}

#[tokio::test]
async fn validation_errors_map_to_400() {
    let mailer = Arc::new(RecordingMailer::default());
    let url = spawn(mailer.clone()).await;
    let (status, body) = post_json(&url, r#"{"name":"A","email":"a@b.com"}"#).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "missing_required_fields");
    let (status, body) =
        post_json(&url, r#"{"name":"A","email":"not-an-email","message":"hi"}"#).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid_email");
    let (status, body) = post_json(&url, "garbage").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "missing_required_fields");
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn honeypot_is_acknowledged_but_not_sent() {
    let mailer = Arc::new(RecordingMailer::default());
    let url = spawn(mailer.clone()).await;
    let (status, body) = post_json(&url, r#"{"website":"x"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_post_is_405() {
    let url = spawn(Arc::new(RecordingMailer::default())).await;
    let resp = reqwest::get(&url).await.unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    assert_eq!(
        resp.headers().get("allow").and_then(|v| v.to_str().ok()),
        Some("POST")
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"ok": false, "error": "method_not_allowed"}));
}

#[tokio::test]
async fn delivery_failure_is_500_send_failed() {
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let url = spawn(mailer).await;
    let (status, body) = post_json(
        &url,
        r#"{"name":"Ada","email":"ada@example.com","message":"hi"}"#,
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "send_failed");
}

#[tokio::test]
async fn missing_credentials_is_500() {
    let mailer = Arc::new(HttpMailer::new(MailConfig::default()));
    let url = spawn(mailer).await;
    let (status, body) = post_json(
        &url,
        r#"{"name":"Ada","email":"ada@example.com","message":"hi"}"#,
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "missing_smtp_credentials");
}
