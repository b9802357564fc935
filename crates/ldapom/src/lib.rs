//! # ldapom
//!
//! Schema-driven object mapper over LDAP directories.
//!
//! Calling code declares, per entity type, a base DN, an objectClass and a
//! set of attributes with per-attribute modifiers, then issues structured
//! searches that return typed entities instead of raw directory records. The
//! write path translates typed field values back into directory add, modify
//! and delete operations.
//!
//! ## Architecture
//!
//! - [`Session`](session::Session) - lazy connect/bind lifecycle and the four
//!   directory operations, generic over the transport capability
//! - [`Mapper`](mapper::Mapper) - compiles filter fragments plus the declared
//!   schema into searches and transforms matched records into entities
//! - [`DirectoryContext`](context::DirectoryContext) - long-lived registry of
//!   mappers sharing one session
//! - [`DirectoryClient`](client::DirectoryClient) - the transport seam; the
//!   `ldapom-ldap3` crate provides the production implementation
//!
//! ## Example
//!
//! ```ignore
//! use ldapom::prelude::*;
//!
//! struct User { dn: String, uid: String, mail: Vec<String> }
//!
//! let context = DirectoryContext::new(
//!     client,
//!     SessionConfig::new("ldap.example.com", "cn=admin,dc=example,dc=com")
//!         .with_password("secret"),
//! );
//!
//! context.register(
//!     MapperConfig::new()
//!         .base_dn("ou=people,dc=example,dc=com")
//!         .object_class("inetOrgPerson")
//!         .constructor(|fields: FieldSet| User {
//!             dn: fields.get("dn").and_then(|v| v.as_text()).unwrap_or_default().into(),
//!             uid: fields.get("uid").and_then(|v| v.as_text()).unwrap_or_default().into(),
//!             mail: Vec::new(),
//!         })
//!         .attribute("uid", Modifiers::NONE)
//!         .attribute("mail", Modifiers::MULTIVALUED),
//! ).await?;
//!
//! let users = context.map_for::<User>(false).await?;
//! for user in users.find("(uid=alice)", None, 0).await? {
//!     println!("{}", user.dn);
//! }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod schema;
pub mod session;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

/// Prelude module for convenient imports.
///
/// ```
/// use ldapom::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{DirectoryClient, SearchScope, WireAttrs};
    pub use crate::config::SessionConfig;
    pub use crate::context::DirectoryContext;
    pub use crate::cursor::ResultCursor;
    pub use crate::error::{
        ConfigurationError, DirectoryError, TransportError, UnknownAttribute,
    };
    pub use crate::mapper::{Entities, EntityConstructor, Mapper, MapperConfig};
    pub use crate::schema::{AttributeSchema, DN_ATTRIBUTE};
    pub use crate::session::Session;
    pub use crate::value::{
        FieldSet, FieldValue, Modifiers, RawRecord, RawSearchResult, RawValue,
    };
}

// Re-export async_trait for client implementors
pub use async_trait::async_trait;
