//! The API credential pair.
//!
//! The password is held in a [`Secret`] that wipes its buffer on drop and
//! never prints its contents, so a `Credential` can sit inside a `Debug`
//! derive or a `tracing` field without leaking.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ConfigError;

pub const USERNAME_ENV: &str = "VOIPMS_API_USERNAME";
pub const PASSWORD_ENV: &str = "VOIPMS_API_PASSWORD";

/// A string that is zeroed on drop and redacted when formatted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the secret value. Only the request builder should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// The `api_username` / `api_password` pair sent with every request.
///
/// Immutable once built; a client owns exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: Secret,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password),
        }
    }

    /// Read the pair from `VOIPMS_API_USERNAME` and `VOIPMS_API_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(read_var(USERNAME_ENV)?, read_var(PASSWORD_ENV)?))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }
}

pub(crate) fn read_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(std::env::VarError::NotPresent) => Err(ConfigError::MissingVar(name)),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidVar(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_password() {
        let credential = Credential::new("alice@example.com", "hunter2");
        let rendered = format!("{credential:?}");
        assert!(rendered.contains("alice@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn display_of_secret_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.expose(), "hunter2");
    }
}
