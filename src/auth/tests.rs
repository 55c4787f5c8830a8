//! Tests for the auth module

use super::*;
use crate::error::Error;
use base64::Engine;

fn request() -> reqwest::RequestBuilder {
    reqwest::Client::new().post("https://cluster.example.com/api/lun-get-iter")
}

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let built = auth.apply(request()).unwrap().build().unwrap();
    assert!(built.headers().get("Authorization").is_none());
}

#[test]
fn test_basic_auth() {
    let auth = Authenticator::new(AuthConfig::basic("admin", "netapp123"));
    let built = auth.apply(request()).unwrap().build().unwrap();

    let expected = format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode("admin:netapp123")
    );
    assert_eq!(
        built.headers().get("Authorization").unwrap().to_str().unwrap(),
        expected
    );
}

#[test]
fn test_basic_auth_requires_username() {
    let auth = Authenticator::new(AuthConfig::basic("", "secret"));
    let err = auth.apply(request()).unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}

#[test]
fn test_bearer_auth() {
    let auth = Authenticator::new(AuthConfig::bearer("session-token"));
    let built = auth.apply(request()).unwrap().build().unwrap();
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Bearer session-token"
    );
}

#[test]
fn test_bearer_auth_requires_token() {
    let auth = Authenticator::new(AuthConfig::bearer(""));
    assert!(auth.apply(request()).is_err());
}

#[test]
fn test_auth_config_deserialize() {
    let config: AuthConfig =
        serde_yaml::from_str("type: basic\nusername: admin\npassword: secret\n").unwrap();
    assert_eq!(config, AuthConfig::basic("admin", "secret"));

    let config: AuthConfig = serde_json::from_str(r#"{"type": "none"}"#).unwrap();
    assert!(config.is_none());
}

#[test]
fn test_auth_config_debug_hides_secrets() {
    let debug = format!("{:?}", AuthConfig::basic("admin", "netapp123"));
    assert!(debug.contains("admin"));
    assert!(!debug.contains("netapp123"));

    let debug = format!("{:?}", AuthConfig::bearer("session-token"));
    assert!(!debug.contains("session-token"));
}
