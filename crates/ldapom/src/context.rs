//! Directory context: session ownership plus an explicit per-entity-type
//! mapper registry.
//!
//! Mapper configurations are registered once at process start, keyed by the
//! entity's Rust type; mapper instances are built lazily on first lookup and
//! cached for the context's lifetime. No dynamic symbol resolution is
//! involved anywhere.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::client::DirectoryClient;
use crate::config::SessionConfig;
use crate::error::ConfigurationError;
use crate::mapper::{Mapper, MapperConfig};
use crate::session::Session;

/// Long-lived owner of one [`Session`] and the mappers built on top of it.
pub struct DirectoryContext<C: DirectoryClient + 'static> {
    session: Arc<Session<C>>,
    configs: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    mappers: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl<C: DirectoryClient + 'static> DirectoryContext<C> {
    pub fn new(client: C, config: SessionConfig) -> Self {
        Self::with_session(Arc::new(Session::new(client, config)))
    }

    pub fn with_session(session: Arc<Session<C>>) -> Self {
        Self {
            session,
            configs: RwLock::new(HashMap::new()),
            mappers: RwLock::new(HashMap::new()),
        }
    }

    /// The session every mapper of this context shares.
    pub fn session(&self) -> &Arc<Session<C>> {
        &self.session
    }

    /// Register the mapper configuration for entity type `E`, validating it
    /// immediately so an incomplete configuration fails at startup rather
    /// than at first lookup.
    pub async fn register<E: Send + Sync + 'static>(
        &self,
        config: MapperConfig<E>,
    ) -> Result<(), ConfigurationError> {
        config.validate()?;
        self.configs
            .write()
            .await
            .insert(TypeId::of::<E>(), Box::new(config));
        Ok(())
    }

    /// The mapper for entity type `E`, built lazily from its registered
    /// configuration on first lookup and cached afterwards. `renew` discards
    /// the cached instance and builds a fresh one.
    pub async fn map_for<E: Send + Sync + 'static>(
        &self,
        renew: bool,
    ) -> Result<Arc<Mapper<E, C>>, ConfigurationError> {
        let key = TypeId::of::<E>();

        if !renew {
            let mappers = self.mappers.read().await;
            if let Some(mapper) = mappers.get(&key) {
                if let Ok(mapper) = Arc::clone(mapper).downcast::<Mapper<E, C>>() {
                    return Ok(mapper);
                }
            }
        }

        let config = {
            let configs = self.configs.read().await;
            configs
                .get(&key)
                .and_then(|c| c.downcast_ref::<MapperConfig<E>>())
                .cloned()
                .ok_or(ConfigurationError::UnregisteredEntity {
                    entity: std::any::type_name::<E>(),
                })?
        };

        debug!(entity = std::any::type_name::<E>(), renew, "building mapper");

        let mapper = Arc::new(Mapper::new(Arc::clone(&self.session), config)?);
        self.mappers.write().await.insert(key, mapper.clone());

        Ok(mapper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDirectoryClient;
    use crate::value::{FieldSet, Modifiers};

    #[derive(Debug)]
    struct User {
        #[allow(dead_code)]
        fields: FieldSet,
    }

    fn user_config() -> MapperConfig<User> {
        MapperConfig::new()
            .base_dn("ou=people,dc=example,dc=com")
            .object_class("inetOrgPerson")
            .constructor(|fields| User { fields })
            .attribute("uid", Modifiers::NONE)
    }

    fn context() -> DirectoryContext<MockDirectoryClient> {
        DirectoryContext::new(
            MockDirectoryClient::new(),
            SessionConfig::new("ldap.example.com", "cn=admin,dc=example,dc=com"),
        )
    }

    #[tokio::test]
    async fn lookup_without_registration_fails() {
        let ctx = context();
        let err = ctx.map_for::<User>(false).await.unwrap_err();
        assert!(matches!(err, ConfigurationError::UnregisteredEntity { .. }));
    }

    #[tokio::test]
    async fn registration_validates_eagerly() {
        let ctx = context();
        let incomplete: MapperConfig<User> = MapperConfig::new().base_dn("dc=example,dc=com");
        assert!(ctx.register(incomplete).await.is_err());
    }

    #[tokio::test]
    async fn mappers_are_built_lazily_and_cached() {
        let ctx = context();
        ctx.register(user_config()).await.unwrap();

        let first = ctx.map_for::<User>(false).await.unwrap();
        let second = ctx.map_for::<User>(false).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn renew_builds_a_fresh_mapper() {
        let ctx = context();
        ctx.register(user_config()).await.unwrap();

        let first = ctx.map_for::<User>(false).await.unwrap();
        let renewed = ctx.map_for::<User>(true).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &renewed));

        let after = ctx.map_for::<User>(false).await.unwrap();
        assert!(Arc::ptr_eq(&renewed, &after));
    }
}
