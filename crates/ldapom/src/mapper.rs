//! Entity mapper: compiles declarative schemas plus filter fragments into
//! directory searches, and transforms matched records into typed entities.

use std::sync::Arc;

use tracing::debug;

use crate::client::{DirectoryClient, SearchScope};
use crate::cursor::ResultCursor;
use crate::error::{ConfigurationError, DirectoryError, UnknownAttribute};
use crate::schema::{AttributeSchema, DN_ATTRIBUTE};
use crate::session::Session;
use crate::value::{FieldSet, FieldValue, Modifiers, RawRecord, RawValue};

/// Entity constructor capability: one per entity type, turning a transformed
/// field mapping into an opaque entity value.
pub type EntityConstructor<E> = Arc<dyn Fn(FieldSet) -> E + Send + Sync>;

/// Declarative configuration a [`Mapper`] is built from: base DN,
/// objectClass, entity constructor and the attribute list.
///
/// Validation happens when the mapper is constructed (or when the
/// configuration is registered on a context), never at query time.
pub struct MapperConfig<E> {
    base_dn: Option<String>,
    object_class: Option<String>,
    constructor: Option<EntityConstructor<E>>,
    attributes: Vec<(String, Modifiers)>,
}

impl<E> Default for MapperConfig<E> {
    fn default() -> Self {
        Self {
            base_dn: None,
            object_class: None,
            constructor: None,
            attributes: Vec::new(),
        }
    }
}

impl<E> Clone for MapperConfig<E> {
    fn clone(&self) -> Self {
        Self {
            base_dn: self.base_dn.clone(),
            object_class: self.object_class.clone(),
            constructor: self.constructor.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<E> MapperConfig<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_dn(mut self, base_dn: impl Into<String>) -> Self {
        self.base_dn = Some(base_dn.into());
        self
    }

    pub fn object_class(mut self, object_class: impl Into<String>) -> Self {
        self.object_class = Some(object_class.into());
        self
    }

    pub fn constructor(
        mut self,
        constructor: impl Fn(FieldSet) -> E + Send + Sync + 'static,
    ) -> Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Declare an attribute with its modifiers; declaration order is the
    /// selection-list order.
    pub fn attribute(mut self, name: impl Into<String>, modifiers: Modifiers) -> Self {
        self.attributes.push((name.into(), modifiers));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let entity = std::any::type_name::<E>();
        if self.base_dn.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigurationError::MissingBaseDn { entity });
        }
        if self.object_class.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigurationError::MissingObjectClass { entity });
        }
        if self.constructor.is_none() {
            return Err(ConfigurationError::MissingConstructor { entity });
        }
        if self.attributes.iter().all(|(name, _)| name == DN_ATTRIBUTE) {
            return Err(ConfigurationError::NotEnoughAttributes { entity });
        }
        Ok(())
    }
}

/// Maps one entity type onto a directory subtree.
///
/// A mapper is a stateless request compiler: constructed once per entity type
/// from a validated [`MapperConfig`], it compiles filter fragments into full
/// searches, delegates to its [`Session`], and transforms every matched
/// record into an entity according to the declared attribute modifiers.
pub struct Mapper<E, C: DirectoryClient> {
    schema: AttributeSchema,
    constructor: EntityConstructor<E>,
    session: Arc<Session<C>>,
}

impl<E, C: DirectoryClient> std::fmt::Debug for Mapper<E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<E, C: DirectoryClient> Mapper<E, C> {
    /// Build a mapper, failing fast on an incomplete configuration.
    pub fn new(
        session: Arc<Session<C>>,
        config: MapperConfig<E>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        // validate() guarantees all three are present
        let mut schema = AttributeSchema::new(
            config.base_dn.unwrap_or_default(),
            config.object_class.unwrap_or_default(),
        );
        for (name, modifiers) in config.attributes {
            schema.add_attribute(name, modifiers);
        }
        let constructor = config
            .constructor
            .ok_or(ConfigurationError::MissingConstructor {
                entity: std::any::type_name::<E>(),
            })?;

        Ok(Self {
            schema,
            constructor,
            session,
        })
    }

    /// Search for entities matching `fragment`.
    ///
    /// The effective base is `"<dn_suffix>,<base_dn>"` when a suffix is
    /// given, the schema's base DN otherwise. The full filter is the
    /// caller's fragment AND-ed with the mandatory objectClass predicate:
    /// `(&(objectClass=<class>)<fragment>)`.
    ///
    /// The fragment is a trusted input: no escaping is performed on it.
    /// Callers interpolating untrusted text into a fragment must escape it
    /// first, e.g. with [`filter::escape`](crate::filter::escape).
    ///
    /// Returns a finite, lazy, single-pass sequence of entities; transforming
    /// happens per record as the sequence is consumed.
    pub async fn find(
        &self,
        fragment: &str,
        dn_suffix: Option<&str>,
        limit: u32,
    ) -> Result<Entities<E>, DirectoryError> {
        let base = match dn_suffix {
            Some(suffix) => format!("{suffix},{}", self.schema.base_dn()),
            None => self.schema.base_dn().to_string(),
        };
        let filter = format!(
            "(&(objectClass={}){})",
            self.schema.object_class(),
            fragment
        );
        let attrs: Vec<String> = self
            .schema
            .attribute_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        debug!(
            entity = std::any::type_name::<E>(),
            base = %base,
            filter = %filter,
            "FIND"
        );

        let cursor = self
            .session
            .search(&base, &filter, &attrs, limit, SearchScope::Subtree)
            .await?;

        Ok(Entities {
            cursor,
            schema: self.schema.clone(),
            constructor: self.constructor.clone(),
        })
    }

    /// Replace attribute values of the entry at `dn`. Funnels to the session
    /// unchanged; the session error already carries operation and target.
    pub async fn save(&self, dn: &str, fields: &FieldSet) -> Result<(), DirectoryError> {
        self.session.modify(dn, fields).await
    }

    /// Add a new entry at `dn`.
    pub async fn create(&self, dn: &str, fields: &FieldSet) -> Result<(), DirectoryError> {
        self.session.create(dn, fields).await
    }

    /// Remove the entry at `dn`.
    pub async fn delete(&self, dn: &str) -> Result<(), DirectoryError> {
        self.session.delete(dn).await
    }

    /// Declared attribute names in selection-list order.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.schema.attribute_names()
    }

    /// Modifiers of a declared attribute.
    pub fn modifiers_of(&self, name: &str) -> Result<Modifiers, UnknownAttribute> {
        self.schema.modifiers_of(name)
    }

    /// Declare a further attribute. Configuration-time only: once the mapper
    /// is shared (e.g. behind an `Arc` handed out by a context) the `&mut`
    /// receiver makes this unreachable.
    pub fn add_attribute(&mut self, name: impl Into<String>, modifiers: Modifiers) {
        self.schema.add_attribute(name, modifiers);
    }
}

/// Finite, lazy, single-pass sequence of entities produced by
/// [`Mapper::find`]. Not restartable once consumed, matching the underlying
/// cursor's policy.
pub struct Entities<E> {
    cursor: ResultCursor,
    schema: AttributeSchema,
    constructor: EntityConstructor<E>,
}

impl<E> Entities<E> {
    /// Total number of matched records, known up front.
    pub fn total(&self) -> usize {
        ResultCursor::count(&self.cursor)
    }
}

impl<E> Iterator for Entities<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        let record = self.cursor.next()?;
        Some(transform(&self.schema, &self.constructor, record))
    }
}

/// Transform one raw record into an entity per the schema's modifiers.
///
/// Per declared attribute: an absent or empty wire value sequence leaves the
/// field absent; MULTIVALUED keeps the full ordered sequence; otherwise the
/// first wire value wins and the rest are discarded (deliberate, preserved
/// for compatibility with existing deployments that rely on it). Attributes
/// present in the record but not declared on the schema are ignored.
fn transform<E>(
    schema: &AttributeSchema,
    constructor: &EntityConstructor<E>,
    mut record: RawRecord,
) -> E {
    let mut fields = FieldSet::new();

    for (name, modifiers) in schema.entries() {
        if name == DN_ATTRIBUTE {
            fields.set(DN_ATTRIBUTE, FieldValue::Text(record.dn.clone()));
            continue;
        }

        let Some(values) = record.attrs.remove(name) else {
            continue;
        };
        if values.is_empty() {
            continue;
        }

        let value = if modifiers.contains(Modifiers::MULTIVALUED) {
            FieldValue::List(
                values
                    .into_iter()
                    .map(|v| field_value(v, modifiers))
                    .collect(),
            )
        } else if let Some(first) = values.into_iter().next() {
            field_value(first, modifiers)
        } else {
            continue;
        };
        fields.set(name.to_string(), value);
    }

    (constructor)(fields)
}

/// One wire value under the attribute's modifiers: BINARY passes bytes
/// through untouched, everything else is interpreted as text.
fn field_value(raw: RawValue, modifiers: Modifiers) -> FieldValue {
    if modifiers.contains(Modifiers::BINARY) {
        FieldValue::Bytes(raw.into_bytes())
    } else {
        match raw {
            RawValue::Text(s) => FieldValue::Text(s),
            RawValue::Bytes(b) => FieldValue::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}
