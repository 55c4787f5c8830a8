//! Authenticator implementation
//!
//! Handles applying credentials to requests.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use reqwest::RequestBuilder;

/// Authenticator handles applying authentication to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Auth configuration in use
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::Basic { username, password } => {
                if username.is_empty() {
                    return Err(Error::auth("basic auth requires a username"));
                }
                Ok(req.basic_auth(username, Some(password)))
            }

            AuthConfig::Bearer { token } => {
                if token.is_empty() {
                    return Err(Error::auth("bearer auth requires a token"));
                }
                Ok(req.bearer_auth(token))
            }
        }
    }
}
