//! Directory client capability.
//!
//! The transport itself (connection establishment, TLS, wire encoding) is an
//! external collaborator consumed through the [`DirectoryClient`] trait. The
//! `ldapom-ldap3` crate provides the production implementation; tests supply
//! counting doubles.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::value::{RawSearchResult, RawValue};

/// How far below the base a search reaches. The two variants are two distinct
/// protocol verbs, not a parameter of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// The entire subtree under the base.
    Subtree,
    /// Immediate children of the base only.
    OneLevel,
}

/// Attributes of one entry in the list-oriented shape the write verbs take:
/// every value is a sequence, scalars having been normalized by the session.
pub type WireAttrs = Vec<(String, Vec<RawValue>)>;

/// Transport capability for one directory server.
///
/// All operations are single synchronous round-trips from the caller's point
/// of view; timeout behavior is configured on the transport (connect/read
/// timeouts), not per call. Failures carry the transport's native error text
/// in the [`TransportError`].
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Live protocol handle. Cloning must yield a handle onto the same
    /// underlying connection.
    type Handle: Clone + Send + Sync + 'static;

    /// Establish a connection without authenticating.
    async fn connect(&self, host: &str, port: u16) -> Result<Self::Handle, TransportError>;

    /// Authenticate an established connection.
    async fn bind(
        &self,
        handle: &mut Self::Handle,
        login: &str,
        password: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Run a search. `limit` of 0 means unlimited. `Ok(None)` is the
    /// "transport reported success but returned no usable result set" case,
    /// which the session keeps distinguishable from `Err`.
    async fn search(
        &self,
        handle: &mut Self::Handle,
        base: &str,
        filter: &str,
        attrs: &[String],
        limit: u32,
        scope: SearchScope,
    ) -> Result<Option<RawSearchResult>, TransportError>;

    /// Add a new entry.
    async fn add_entry(
        &self,
        handle: &mut Self::Handle,
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError>;

    /// Replace attribute values on an existing entry.
    async fn modify_entry(
        &self,
        handle: &mut Self::Handle,
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError>;

    /// Remove an entry.
    async fn delete_entry(&self, handle: &mut Self::Handle, dn: &str)
        -> Result<(), TransportError>;
}
