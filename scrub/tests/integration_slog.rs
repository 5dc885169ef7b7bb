//! Integration tests for the slog adapter.
//!
//! These tests verify that:
//! - `Scrubber::slog` emits the redacted copy as nested JSON
//! - the log key is the root field name seen by censors
//! - serialization failures degrade to a placeholder string

#![cfg(feature = "slog")]

use std::{cell::RefCell, collections::HashMap, fmt::Arguments};

use scrub::{redactor, slog::SERIALIZATION_FAILED, Scrub, Scrubber};
use serde::Serialize;
use serde_json::Value as JsonValue;

// A test serializer that captures serialized key-value pairs
struct CapturingSerializer {
    captured: RefCell<HashMap<String, CapturedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
enum CapturedValue {
    Str(String),
    Other,
    Serde(JsonValue),
}

impl CapturingSerializer {
    fn new() -> Self {
        Self {
            captured: RefCell::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<CapturedValue> {
        self.captured.borrow().get(key).cloned()
    }

    fn json(&self, key: &str) -> JsonValue {
        match self.get(key) {
            Some(CapturedValue::Serde(json)) => json,
            other => panic!("expected a Serde value for {key:?}, got {other:?}"),
        }
    }
}

impl slog::Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: slog::Key, val: &Arguments<'_>) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.to_string()));
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Str(val.into()));
        Ok(())
    }

    fn emit_unit(&mut self, key: slog::Key) -> slog::Result {
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Other);
        Ok(())
    }

    fn emit_serde(&mut self, key: slog::Key, val: &dyn slog::SerdeValue) -> slog::Result {
        let json = serde_json::to_value(val.as_serde()).unwrap_or(JsonValue::Null);
        self.captured
            .borrow_mut()
            .insert(key.into(), CapturedValue::Serde(json));
        Ok(())
    }
}

/// Serializes a `slog::Value` into the capturing serializer under `key`.
fn serialize_to_capture<V: slog::Value>(
    value: &V,
    key: &'static str,
    serializer: &mut CapturingSerializer,
) {
    static RS: slog::RecordStatic<'static> = slog::record_static!(slog::Level::Info, "");
    let args = format_args!("");
    let record = slog::Record::new(&RS, &args, slog::b!());
    value.serialize(&record, key, serializer).unwrap();
}

#[derive(Clone, Debug, Scrub, Serialize)]
struct User {
    username: String,
    #[scrub(tag = "secret")]
    password: String,
    logins: u32,
}

fn user() -> User {
    User {
        username: "alice".into(),
        password: "super_secret_password".into(),
        logins: 3,
    }
}

#[test]
fn test_struct_is_emitted_as_redacted_json() {
    let scrubber = Scrubber::builder().tag("secret").build().unwrap();
    let user = user();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&scrubber.slog(&user), "user", &mut serializer);

    let json = serializer.json("user");
    assert_eq!(json["username"], "alice");
    assert_eq!(json["password"], "[REDACTED]");
    assert_eq!(json["logins"], 3);
    // Logging never touches the original.
    assert_eq!(user.password, "super_secret_password");
}

#[test]
fn test_redactors_apply_before_serialization() {
    let scrubber = Scrubber::builder()
        .tag("secret")
        .with_redactor(redactor::mask('*', 8))
        .build()
        .unwrap();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&scrubber.slog(&user()), "user", &mut serializer);

    assert_eq!(
        serializer.json("user")["password"],
        "******** (remained 13 chars)"
    );
}

#[test]
fn test_log_key_is_the_root_field_name() {
    let scrubber = Scrubber::builder().field("api_key").build().unwrap();
    let key = "sk_live_123".to_string();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&scrubber.slog(&key), "api_key", &mut serializer);
    serialize_to_capture(&scrubber.slog(&key), "request_id", &mut serializer);

    assert_eq!(serializer.json("api_key"), "[REDACTED]");
    assert_eq!(serializer.json("request_id"), "sk_live_123");
}

#[test]
fn test_nested_collections() {
    #[derive(Clone, Debug, Scrub, Serialize)]
    struct Team {
        name: String,
        members: Vec<User>,
        tokens: HashMap<String, String>,
    }

    let mut tokens = HashMap::new();
    tokens.insert("ci".to_string(), "secret-ci-token".to_string());
    let team = Team {
        name: "core".into(),
        members: vec![user(), user()],
        tokens,
    };
    let scrubber = Scrubber::builder()
        .tag("secret")
        .contains("secret-")
        .build()
        .unwrap();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&scrubber.slog(&team), "team", &mut serializer);

    let json = serializer.json("team");
    assert_eq!(json["name"], "core");
    assert_eq!(json["members"][0]["password"], "[REDACTED]");
    assert_eq!(json["members"][1]["username"], "alice");
    assert_eq!(json["tokens"]["ci"], "[REDACTED]");
}

#[test]
fn test_serialization_failure_emits_placeholder() {
    // JSON objects need string keys.
    let mut by_pair: HashMap<(u8, u8), String> = HashMap::new();
    by_pair.insert((1, 2), "value".to_string());
    let scrubber = Scrubber::builder().build().unwrap();

    let mut serializer = CapturingSerializer::new();
    serialize_to_capture(&scrubber.slog(&by_pair), "pairs", &mut serializer);

    assert_eq!(serializer.json("pairs"), SERIALIZATION_FAILED);
}

#[test]
fn test_logger_macro_integration() {
    use slog::{info, o, Discard, Logger};

    let logger = Logger::root(Discard, o!());
    let scrubber = Scrubber::builder().tag("secret").build().unwrap();
    let user = user();
    info!(logger, "user logged in"; "user" => scrubber.slog(&user));
}
