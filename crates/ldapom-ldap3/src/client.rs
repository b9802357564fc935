//! `DirectoryClient` implementation over the `ldap3` crate.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry, SearchOptions};
use tracing::{debug, warn};

use ldapom::client::{DirectoryClient, SearchScope, WireAttrs};
use ldapom::error::TransportError;
use ldapom::value::{RawRecord, RawSearchResult, RawValue};

use crate::config::Ldap3Settings;

/// Size limit exceeded: the server stopped after `limit` entries, which is
/// exactly what a limited search asked for.
const RC_SIZE_LIMIT_EXCEEDED: u32 = 4;

/// Invalid credentials on bind.
const RC_INVALID_CREDENTIALS: u32 = 49;

/// LDAP transport backed by [`ldap3`].
#[derive(Debug, Clone, Default)]
pub struct Ldap3Client {
    settings: Ldap3Settings,
}

impl Ldap3Client {
    pub fn new(settings: Ldap3Settings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl DirectoryClient for Ldap3Client {
    type Handle = Ldap;

    async fn connect(&self, host: &str, port: u16) -> Result<Ldap, TransportError> {
        let url = format!("{}://{host}:{port}", self.settings.scheme());

        debug!(url = %url, "connecting to LDAP server");

        let conn_settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(self.settings.connect_timeout_secs))
            .set_starttls(self.settings.starttls && !self.settings.use_tls);

        let (conn, ldap) = LdapConnAsync::with_settings(conn_settings, &url)
            .await
            .map_err(|e| TransportError::new(format!("failed to connect to {url}: {e}")))?;

        // Drive the connection until every handle is dropped.
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        Ok(ldap)
    }

    async fn bind(
        &self,
        handle: &mut Ldap,
        login: &str,
        password: Option<&str>,
    ) -> Result<(), TransportError> {
        let result = handle
            .simple_bind(login, password.unwrap_or(""))
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        if result.rc == RC_INVALID_CREDENTIALS {
            return Err(TransportError::new(format!(
                "invalid credentials for '{login}'"
            )));
        }

        check(result.rc, &result.text, "bind")
    }

    async fn search(
        &self,
        handle: &mut Ldap,
        base: &str,
        filter: &str,
        attrs: &[String],
        limit: u32,
        scope: SearchScope,
    ) -> Result<Option<RawSearchResult>, TransportError> {
        let attrs: Vec<&str> = attrs.iter().map(String::as_str).collect();
        let scope = protocol_scope(scope);

        let result = if limit > 0 {
            handle
                .with_search_options(SearchOptions::new().sizelimit(limit as i32))
                .search(base, scope, filter, attrs)
                .await
        } else {
            handle.search(base, scope, filter, attrs).await
        }
        .map_err(|e| TransportError::new(e.to_string()))?;

        let ldap3::SearchResult(entries, res) = result;
        if res.rc != 0 && res.rc != RC_SIZE_LIMIT_EXCEEDED {
            return Err(TransportError::new(format!(
                "search failed with code {}: {}",
                res.rc, res.text
            )));
        }

        let records: Vec<RawRecord> = entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(entry_to_record)
            .collect();

        Ok(Some(RawSearchResult::new(records)))
    }

    async fn add_entry(
        &self,
        handle: &mut Ldap,
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError> {
        let attrs: Vec<(Vec<u8>, HashSet<Vec<u8>>)> = attrs
            .into_iter()
            .map(|(name, values)| {
                (
                    name.into_bytes(),
                    values.into_iter().map(RawValue::into_bytes).collect(),
                )
            })
            .collect();

        let result = handle
            .add(dn, attrs)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        check(result.rc, &result.text, "add")
    }

    async fn modify_entry(
        &self,
        handle: &mut Ldap,
        dn: &str,
        attrs: WireAttrs,
    ) -> Result<(), TransportError> {
        let mods: Vec<Mod<Vec<u8>>> = attrs
            .into_iter()
            .map(|(name, values)| {
                Mod::Replace(
                    name.into_bytes(),
                    values.into_iter().map(RawValue::into_bytes).collect(),
                )
            })
            .collect();

        let result = handle
            .modify(dn, mods)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        check(result.rc, &result.text, "modify")
    }

    async fn delete_entry(&self, handle: &mut Ldap, dn: &str) -> Result<(), TransportError> {
        let result = handle
            .delete(dn)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        check(result.rc, &result.text, "delete")
    }
}

fn protocol_scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Subtree => Scope::Subtree,
        SearchScope::OneLevel => Scope::OneLevel,
    }
}

fn check(rc: u32, text: &str, operation: &str) -> Result<(), TransportError> {
    if rc == 0 {
        Ok(())
    } else {
        Err(TransportError::new(format!(
            "{operation} failed with code {rc}: {text}"
        )))
    }
}

/// Merge an `ldap3` search entry into the mapper's raw record shape: text
/// attributes and binary attributes land in one value sequence per name.
fn entry_to_record(entry: SearchEntry) -> RawRecord {
    let mut record = RawRecord::new(entry.dn);

    for (name, values) in entry.attrs {
        record
            .attrs
            .insert(name, values.into_iter().map(RawValue::Text).collect());
    }

    for (name, values) in entry.bin_attrs {
        record
            .attrs
            .entry(name)
            .or_default()
            .extend(values.into_iter().map(RawValue::Bytes));
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn scope_maps_onto_the_two_protocol_verbs() {
        assert!(matches!(protocol_scope(SearchScope::Subtree), Scope::Subtree));
        assert!(matches!(protocol_scope(SearchScope::OneLevel), Scope::OneLevel));
    }

    #[test]
    fn entry_conversion_merges_text_and_binary_attributes() {
        let entry = SearchEntry {
            dn: "cn=alice,dc=example,dc=com".to_string(),
            attrs: HashMap::from([
                ("cn".to_string(), vec!["alice".to_string()]),
                (
                    "mail".to_string(),
                    vec!["a@example.com".to_string(), "b@example.com".to_string()],
                ),
            ]),
            bin_attrs: HashMap::from([(
                "jpegPhoto".to_string(),
                vec![vec![0xff, 0xd8], vec![0xff, 0xd9]],
            )]),
        };

        let record = entry_to_record(entry);
        assert_eq!(record.dn, "cn=alice,dc=example,dc=com");
        assert_eq!(record.attrs["cn"], vec![RawValue::text("alice")]);
        assert_eq!(
            record.attrs["mail"],
            vec![RawValue::text("a@example.com"), RawValue::text("b@example.com")]
        );
        assert_eq!(
            record.attrs["jpegPhoto"],
            vec![
                RawValue::bytes(vec![0xff, 0xd8]),
                RawValue::bytes(vec![0xff, 0xd9])
            ]
        );
    }

    #[test]
    fn result_codes_other_than_success_become_errors() {
        assert!(check(0, "", "add").is_ok());

        let err = check(65, "object class violation", "modify").unwrap_err();
        assert_eq!(
            err.message(),
            "modify failed with code 65: object class violation"
        );
    }
}
