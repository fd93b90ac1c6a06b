// Host-side tests for contact payload validation.

use showroom_core::contact::*;

fn form(json: &str) -> ContactForm {
    ContactForm::from_json(json.as_bytes())
}

#[test]
fn missing_message_is_rejected() {
    let err = form(r#"{"name":"A","email":"a@b.com"}"#).validate().unwrap_err();
    assert_eq!(err, ContactError::MissingRequiredFields);
    assert_eq!(err.status(), 400);
    assert_eq!(
        serde_json::to_string(&ContactReply::error(&err)).unwrap(),
        r#"{"ok":false,"error":"missing_required_fields"}"#
    );
}

#[test]
fn whitespace_only_fields_count_as_missing() {
    let err = form(r#"{"name":"  ","email":"a@b.com","message":"\r\n"}"#)
        .validate()
        .unwrap_err();
    assert_eq!(err, ContactError::MissingRequiredFields);
}

#[test]
fn honeypot_accepts_without_checking_anything_else() {
    let v = form(r#"{"website":"x"}"#).validate().unwrap();
    assert_eq!(v, Validated::Honeypot);
    assert_eq!(
        serde_json::to_string(&ContactReply::ok()).unwrap(),
        r#"{"ok":true}"#
    );
}

#[test]
fn bad_email_is_rejected() {
    let err = form(r#"{"name":"A","email":"not-an-email","message":"hi"}"#)
        .validate()
        .unwrap_err();
    assert_eq!(err, ContactError::InvalidEmail);
    assert_eq!(err.code(), "invalid_email");
}

#[test]
fn malformed_json_is_an_empty_form() {
    assert_eq!(form("{not json"), ContactForm::default());
    assert_eq!(
        form("{not json").validate(),
        Err(ContactError::MissingRequiredFields)
    );
}

#[test]
fn valid_submission_is_sanitized_and_capped() {
    let long = "x".repeat(MESSAGE_MAX + 50);
    let json = format!(
        r#"{{"name":" Ada\u0000 ","email":"ada@example.com","budget":"","message":"{long}"}}"#
    );
    let Validated::Submission(sub) = form(&json).validate().unwrap() else {
        panic!("expected submission");
    };
    assert_eq!(sub.name, "Ada");
    assert_eq!(sub.budget, None);
    assert_eq!(sub.message.chars().count(), MESSAGE_MAX);
}

#[test]
fn notification_escapes_html_but_not_text() {
    let sub = ContactSubmission {
        name: "<b>Eve</b>".into(),
        email: "eve@example.com".into(),
        budget: Some("10k & up".into()),
        message: "line one\nline \"two\"".into(),
    };
    let n = sub.notification();
    assert_eq!(n.reply_to, "eve@example.com");
    assert!(n.text_body.contains("<b>Eve</b>"));
    assert!(n.html_body.contains("&lt;b&gt;Eve&lt;/b&gt;"));
    assert!(n.html_body.contains("10k &amp; up"));
    assert!(n.html_body.contains("line one<br>line &quot;two&quot;"));
    assert!(!n.html_body.contains("<b>Eve"));
}
