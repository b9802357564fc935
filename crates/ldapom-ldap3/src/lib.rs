//! # ldapom-ldap3
//!
//! `ldap3`-backed directory client for the [`ldapom`] object mapper.
//!
//! This crate supplies the transport side of the mapper: connection
//! establishment (plain, LDAPS or STARTTLS), simple bind, subtree and
//! one-level searches with an optional size limit, and the three write
//! verbs, all over [`ldap3`]'s async API.
//!
//! ## Example
//!
//! ```ignore
//! use ldapom::prelude::*;
//! use ldapom_ldap3::{Ldap3Client, Ldap3Settings};
//!
//! let client = Ldap3Client::new(Ldap3Settings::new().with_starttls());
//! let context = DirectoryContext::new(
//!     client,
//!     SessionConfig::new("ldap.example.com", "cn=admin,dc=example,dc=com")
//!         .with_password("secret"),
//! );
//! ```

pub mod client;
pub mod config;

pub use client::Ldap3Client;
pub use config::Ldap3Settings;
