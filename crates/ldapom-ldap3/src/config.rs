//! Transport settings.

use serde::{Deserialize, Serialize};

/// Connection-level settings for the `ldap3` transport.
///
/// Credentials are not part of the transport settings; they live in the
/// session configuration and arrive through the bind call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ldap3Settings {
    /// Connect over LDAPS instead of plain LDAP.
    #[serde(default)]
    pub use_tls: bool,

    /// Upgrade a plain connection with STARTTLS. Ignored when `use_tls` is
    /// set, since an LDAPS connection is already encrypted.
    #[serde(default)]
    pub starttls: bool,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    30
}

impl Default for Ldap3Settings {
    fn default() -> Self {
        Self {
            use_tls: false,
            starttls: false,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Ldap3Settings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tls(mut self) -> Self {
        self.use_tls = true;
        self
    }

    #[must_use]
    pub fn with_starttls(mut self) -> Self {
        self.starttls = true;
        self
    }

    #[must_use]
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// URL scheme for these settings.
    pub fn scheme(&self) -> &'static str {
        if self.use_tls {
            "ldaps"
        } else {
            "ldap"
        }
    }
}
