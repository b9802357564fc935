//! Per-entity-type attribute schema.

use crate::error::UnknownAttribute;
use crate::value::Modifiers;

/// Reserved pseudo-attribute holding the entry's distinguished name.
///
/// Always declared, always single-valued. It travels in the search selection
/// list verbatim but its value is filled from the entry DN, and it is never
/// written back as an entry attribute.
pub const DN_ATTRIBUTE: &str = "dn";

/// The declarative schema of one mapped entity type: base DN, objectClass and
/// the ordered attribute → [`Modifiers`] mapping.
///
/// Immutable once the owning mapper is constructed; the mapper exposes only
/// read accessors afterwards, and the `&mut` requirement on
/// [`add_attribute`](Self::add_attribute) means a shared mapper can no longer
/// be reconfigured.
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    base_dn: String,
    object_class: String,
    attributes: Vec<(String, Modifiers)>,
}

impl AttributeSchema {
    /// A fresh schema declares only the reserved [`DN_ATTRIBUTE`]; a schema
    /// that never gains a real attribute is rejected when the mapper is
    /// constructed.
    pub(crate) fn new(base_dn: impl Into<String>, object_class: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            object_class: object_class.into(),
            attributes: vec![(DN_ATTRIBUTE.to_string(), Modifiers::NONE)],
        }
    }

    /// The directory subtree this entity type lives under.
    pub fn base_dn(&self) -> &str {
        &self.base_dn
    }

    /// The directory schema class every entity of this type matches.
    pub fn object_class(&self) -> &str {
        &self.object_class
    }

    /// All declared attribute names in declaration order, the reserved
    /// [`DN_ATTRIBUTE`] first. Used verbatim as the attribute-selection list
    /// sent to the transport.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Modifier bitmask of a declared attribute.
    pub fn modifiers_of(&self, name: &str) -> Result<Modifiers, UnknownAttribute> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| *m)
            .ok_or_else(|| UnknownAttribute {
                name: name.to_string(),
            })
    }

    /// Declare an attribute, or redeclare one with new modifiers keeping its
    /// original position.
    pub fn add_attribute(&mut self, name: impl Into<String>, modifiers: Modifiers) {
        let name = name.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = modifiers,
            None => self.attributes.push((name, modifiers)),
        }
    }

    /// Declared `(name, modifiers)` pairs in order.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, Modifiers)> {
        self.attributes.iter().map(|(n, m)| (n.as_str(), *m))
    }

    /// Number of declared attributes beyond the reserved pseudo-attribute.
    pub(crate) fn real_attribute_count(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }
}
