//! Session configuration.

use serde::{Deserialize, Serialize};

/// Where and as whom a [`Session`](crate::session::Session) binds.
///
/// The password never appears in `Debug` output or serialized trace data.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory server hostname or IP address.
    pub host: String,

    /// Directory server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Login (bind DN) used to authenticate.
    pub login: String,

    /// Bind password; `None` requests an anonymous-style bind with an empty
    /// credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_port() -> u16 {
    389
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            login: login.into(),
            password: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("login", &self.login)
            .field(
                "password",
                &self.password.as_ref().map(|_| "***REDACTED***"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builders() {
        let config = SessionConfig::new("ldap.example.com", "cn=admin,dc=example,dc=com")
            .with_password("secret");

        assert_eq!(config.host, "ldap.example.com");
        assert_eq!(config.port, 389);
        assert_eq!(config.password, Some("secret".to_string()));

        let config = config.with_port(636);
        assert_eq!(config.port, 636);
    }

    #[test]
    fn debug_redacts_the_password() {
        let config = SessionConfig::new("ldap.example.com", "cn=admin,dc=example,dc=com")
            .with_password("super-secret");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***REDACTED***"));
    }

    #[test]
    fn deserializes_with_default_port() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"host": "ldap.example.com", "login": "cn=admin,dc=example,dc=com"}"#,
        )
        .unwrap();
        assert_eq!(config.port, 389);
        assert!(config.password.is_none());
    }
}
