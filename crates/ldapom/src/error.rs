//! Error types.
//!
//! Three distinct failure families: configuration errors raised while a map
//! is being constructed (fatal, no partially-configured map ever exists),
//! directory errors raised by session operations (always carrying the
//! operation, the target location and the transport's native error text),
//! and unknown-attribute errors from schema lookups.

use thiserror::Error;

/// A map was constructed from an incomplete configuration.
///
/// Raised at construction time, never at query time; `entity` is the Rust
/// type name of the entity the configuration was for.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("base DN is not set in the map configuration for '{entity}'")]
    MissingBaseDn { entity: &'static str },

    #[error("objectClass is not set in the map configuration for '{entity}'")]
    MissingObjectClass { entity: &'static str },

    #[error("entity constructor is not set in the map configuration for '{entity}'")]
    MissingConstructor { entity: &'static str },

    #[error("map configuration for '{entity}' declares no attributes beyond 'dn'")]
    NotEnoughAttributes { entity: &'static str },

    /// Lookup of a map for an entity type no configuration was registered for.
    #[error("no map configuration registered for entity type '{entity}'")]
    UnregisteredEntity { entity: &'static str },
}

/// A schema lookup named an attribute that was never declared.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("attribute '{name}' is not declared on this map")]
pub struct UnknownAttribute {
    pub name: String,
}

/// A session operation was rejected by the directory service.
///
/// Each variant carries the target location and the native error text the
/// transport reported; write failures also carry the rejected field names.
/// Errors are surfaced to the caller unchanged, never swallowed, and there is
/// no internal retry at any layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("could not bind to directory host '{host}:{port}' with login '{login}': {text}")]
    Bind {
        host: String,
        port: u16,
        login: String,
        text: String,
    },

    #[error("search under '{base}' with filter '{filter}' failed: {text}")]
    Search {
        base: String,
        filter: String,
        text: String,
    },

    /// The transport reported success but handed back no usable result set.
    /// Distinct from [`DirectoryError::Search`]: a malformed query and a
    /// refused transport call for different caller responses.
    #[error("search with filter '{filter}' on base '{base}' did not return a usable result set")]
    InvalidSearchResult { base: String, filter: String },

    #[error("error while adding entry '{dn}' with attributes {{{}}}: {text}", .fields.join(", "))]
    Create {
        dn: String,
        fields: Vec<String>,
        text: String,
    },

    #[error("error while modifying attributes {{{}}} of entry '{dn}': {text}", .fields.join(", "))]
    Modify {
        dn: String,
        fields: Vec<String>,
        text: String,
    },

    #[error("error while deleting entry '{dn}': {text}")]
    Delete { dn: String, text: String },
}

impl DirectoryError {
    /// The directory operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            DirectoryError::Bind { .. } => "bind",
            DirectoryError::Search { .. } | DirectoryError::InvalidSearchResult { .. } => "search",
            DirectoryError::Create { .. } => "create",
            DirectoryError::Modify { .. } => "modify",
            DirectoryError::Delete { .. } => "delete",
        }
    }

    /// The location the failed operation targeted.
    pub fn target(&self) -> &str {
        match self {
            DirectoryError::Bind { host, .. } => host,
            DirectoryError::Search { base, .. }
            | DirectoryError::InvalidSearchResult { base, .. } => base,
            DirectoryError::Create { dn, .. }
            | DirectoryError::Modify { dn, .. }
            | DirectoryError::Delete { dn, .. } => dn,
        }
    }

    /// The native error text the transport reported, if it reported one.
    pub fn native_text(&self) -> Option<&str> {
        match self {
            DirectoryError::Bind { text, .. }
            | DirectoryError::Search { text, .. }
            | DirectoryError::Create { text, .. }
            | DirectoryError::Modify { text, .. }
            | DirectoryError::Delete { text, .. } => Some(text),
            DirectoryError::InvalidSearchResult { .. } => None,
        }
    }
}

/// A failure reported by the transport capability, carrying its native error
/// text. Session operations wrap this into [`DirectoryError`] together with
/// the operation and target.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for TransportError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for TransportError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_and_target_accessors() {
        let err = DirectoryError::Search {
            base: "ou=people,dc=example,dc=com".to_string(),
            filter: "(cn=alice)".to_string(),
            text: "busy".to_string(),
        };
        assert_eq!(err.operation(), "search");
        assert_eq!(err.target(), "ou=people,dc=example,dc=com");
        assert_eq!(err.native_text(), Some("busy"));

        let err = DirectoryError::Delete {
            dn: "cn=alice,ou=people,dc=example,dc=com".to_string(),
            text: "insufficient access".to_string(),
        };
        assert_eq!(err.operation(), "delete");
        assert_eq!(err.target(), "cn=alice,ou=people,dc=example,dc=com");
    }

    #[test]
    fn invalid_result_is_distinguishable_from_search_failure() {
        let failed = DirectoryError::Search {
            base: "dc=example,dc=com".to_string(),
            filter: "(cn=alice)".to_string(),
            text: "server unwilling to perform".to_string(),
        };
        let unusable = DirectoryError::InvalidSearchResult {
            base: "dc=example,dc=com".to_string(),
            filter: "(cn=alice)".to_string(),
        };

        assert!(matches!(failed, DirectoryError::Search { .. }));
        assert!(matches!(unusable, DirectoryError::InvalidSearchResult { .. }));
        assert_eq!(failed.operation(), unusable.operation());
        assert!(failed.native_text().is_some());
        assert!(unusable.native_text().is_none());
    }

    #[test]
    fn write_errors_carry_the_rejected_field_set() {
        let err = DirectoryError::Modify {
            dn: "cn=alice,dc=example,dc=com".to_string(),
            fields: vec!["mail".to_string(), "telephoneNumber".to_string()],
            text: "objectClass violation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "error while modifying attributes {mail, telephoneNumber} of entry \
             'cn=alice,dc=example,dc=com': objectClass violation"
        );
    }

    #[test]
    fn configuration_errors_name_the_entity_type() {
        let err = ConfigurationError::MissingBaseDn { entity: "User" };
        assert!(err.to_string().contains("'User'"));
    }
}
