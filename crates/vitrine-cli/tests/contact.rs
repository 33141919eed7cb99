//! Contact endpoint through the site router.

use proptest::prelude::*;
use serde_json::{json, Value};
use vitrine_cli::server::CONTACT_PATH;
use vitrine_cli::{RecordingRelay, Site};

fn site() -> Site {
    Site::new(std::env::temp_dir(), 64 * 1024, Box::new(RecordingRelay::new()))
}

fn post(site: &Site, body: &Value) -> (u16, Value) {
    let response = site.handle("POST", CONTACT_PATH, body.to_string().as_bytes());
    let parsed = serde_json::from_slice(&response.body).unwrap();
    (response.status, parsed)
}

#[test]
fn test_complete_submission_succeeds() {
    let (status, body) = post(
        &site(),
        &json!({ "name": "Grace", "email": "grace@navy.mil", "message": "COBOL?" }),
    );
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));
}

#[test]
fn test_not_an_email() {
    let (status, body) = post(
        &site(),
        &json!({ "name": "Grace", "email": "not-an-email", "message": "hi" }),
    );
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid email format");
}

#[test]
fn test_unusable_address_is_400() {
    for email in ["a,b@example.com", "a;b@c.de", "a@b..com"] {
        let (status, body) = post(&site(), &json!({ "name": "A", "email": email, "message": "m" }));
        assert_eq!(status, 400, "{email}");
        assert_eq!(body["error"], "Invalid email format");
    }
}

#[test]
fn test_query_string_ignored() {
    let body = json!({ "name": "A", "email": "a@b.co", "message": "m" }).to_string();
    let response = site().handle("POST", "/api/contact?src=footer", body.as_bytes());
    assert_eq!(response.status, 200);
}

proptest! {
    #[test]
    fn prop_omitted_field_is_400(omit in 0usize..3) {
        let mut fields = serde_json::Map::new();
        fields.insert("name".into(), json!("Ada"));
        fields.insert("email".into(), json!("ada@example.com"));
        fields.insert("message".into(), json!("hello"));
        let key = ["name", "email", "message"][omit];
        fields.remove(key);

        let (status, body) = post(&site(), &Value::Object(fields));
        prop_assert_eq!(status, 400);
        prop_assert_eq!(&body["error"], "Missing required fields");
    }
}
