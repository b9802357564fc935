//! Directory session: lazy connection lifecycle and the four directory
//! operations.

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::client::{DirectoryClient, SearchScope, WireAttrs};
use crate::config::SessionConfig;
use crate::cursor::ResultCursor;
use crate::error::DirectoryError;
use crate::schema::DN_ATTRIBUTE;
use crate::value::FieldSet;

/// One logical connection to a directory service.
///
/// The connection is established lazily: the first operation connects and
/// binds, and the resulting handle is reused by every subsequent operation.
/// There is no automatic reconnection; once an operation fails on a broken
/// connection the caller retries by constructing a new `Session`. Dropping
/// the session releases the cached handle, and with it the transport's
/// connection.
///
/// The handle cache makes concurrent use memory-safe, but the design assumes
/// one logical flow of control per session; interleaving operations from
/// several tasks needs external coordination.
pub struct Session<C: DirectoryClient> {
    client: C,
    config: SessionConfig,
    handle: RwLock<Option<C::Handle>>,
}

impl<C: DirectoryClient> Session<C> {
    pub fn new(client: C, config: SessionConfig) -> Self {
        Self {
            client,
            config,
            handle: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Get the live handle, connecting and binding on first use.
    async fn handle(&self) -> Result<C::Handle, DirectoryError> {
        {
            let guard = self.handle.read().await;
            if let Some(handle) = guard.as_ref() {
                return Ok(handle.clone());
            }
        }

        let bind_error = |text: String| DirectoryError::Bind {
            host: self.config.host.clone(),
            port: self.config.port,
            login: self.config.login.clone(),
            text,
        };

        let mut handle = self
            .client
            .connect(&self.config.host, self.config.port)
            .await
            .map_err(|e| bind_error(e.to_string()))?;

        self.client
            .bind(&mut handle, &self.config.login, self.config.password.as_deref())
            .await
            .map_err(|e| bind_error(e.to_string()))?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            login = %self.config.login,
            "connected to directory"
        );

        let mut guard = self.handle.write().await;
        *guard = Some(handle.clone());

        Ok(handle)
    }

    /// Search `base` with an already-compiled filter, selecting `attrs`.
    ///
    /// `limit` of 0 means unlimited. [`SearchScope::Subtree`] searches the
    /// entire subtree under `base`; [`SearchScope::OneLevel`] its immediate
    /// children only.
    pub async fn search(
        &self,
        base: &str,
        filter: &str,
        attrs: &[String],
        limit: u32,
        scope: SearchScope,
    ) -> Result<ResultCursor, DirectoryError> {
        debug!(
            base = %base,
            filter = %filter,
            attributes = %attrs.join(", "),
            limit,
            ?scope,
            "SEARCH"
        );

        let mut handle = self.handle().await?;
        let outcome = self
            .client
            .search(&mut handle, base, filter, attrs, limit, scope)
            .await
            .map_err(|e| DirectoryError::Search {
                base: base.to_string(),
                filter: filter.to_string(),
                text: e.to_string(),
            })?;

        let result = outcome.ok_or_else(|| DirectoryError::InvalidSearchResult {
            base: base.to_string(),
            filter: filter.to_string(),
        })?;

        debug!(count = result.count(), "search returned results");

        Ok(ResultCursor::new(result))
    }

    /// Replace attribute values of the entry at `dn`.
    ///
    /// Every field value is normalized to a list before dispatch, since the
    /// wire protocol's modify verb is list-oriented. A mapping with no
    /// writable fields is a no-op.
    pub async fn modify(&self, dn: &str, fields: &FieldSet) -> Result<(), DirectoryError> {
        debug!(dn = %dn, fields = %summarize(fields), "MODIFY");

        let attrs: WireAttrs = fields
            .iter()
            .filter(|(name, _)| *name != DN_ATTRIBUTE)
            .map(|(name, value)| (name.to_string(), value.to_wire()))
            .collect();

        if attrs.is_empty() {
            return Ok(());
        }

        let names: Vec<String> = attrs.iter().map(|(name, _)| name.clone()).collect();
        let mut handle = self.handle().await?;

        if let Err(e) = self.client.modify_entry(&mut handle, dn, attrs).await {
            error!(dn = %dn, error = %e, "directory rejected MODIFY");
            return Err(DirectoryError::Modify {
                dn: dn.to_string(),
                fields: names,
                text: e.to_string(),
            });
        }

        Ok(())
    }

    /// Add a new entry at `dn`.
    ///
    /// Values are normalized to lists like in [`modify`](Self::modify);
    /// fields with empty values are omitted entirely, since the protocol
    /// rejects empty-valued attributes.
    pub async fn create(&self, dn: &str, fields: &FieldSet) -> Result<(), DirectoryError> {
        debug!(dn = %dn, fields = %summarize(fields), "CREATE");

        let attrs: WireAttrs = fields
            .iter()
            .filter(|(name, value)| *name != DN_ATTRIBUTE && !value.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_wire()))
            .collect();

        let names: Vec<String> = attrs.iter().map(|(name, _)| name.clone()).collect();
        let mut handle = self.handle().await?;

        if let Err(e) = self.client.add_entry(&mut handle, dn, attrs).await {
            error!(dn = %dn, error = %e, "directory rejected CREATE");
            return Err(DirectoryError::Create {
                dn: dn.to_string(),
                fields: names,
                text: e.to_string(),
            });
        }

        Ok(())
    }

    /// Remove the entry at `dn`.
    pub async fn delete(&self, dn: &str) -> Result<(), DirectoryError> {
        debug!(dn = %dn, "DELETE");

        let mut handle = self.handle().await?;

        if let Err(e) = self.client.delete_entry(&mut handle, dn).await {
            error!(dn = %dn, error = %e, "directory rejected DELETE");
            return Err(DirectoryError::Delete {
                dn: dn.to_string(),
                text: e.to_string(),
            });
        }

        Ok(())
    }
}

/// Redacted parameter summary for trace lines: attribute names only, never
/// values.
fn summarize(fields: &FieldSet) -> String {
    fields.names().collect::<Vec<_>>().join(", ")
}
