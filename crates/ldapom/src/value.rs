//! Value types crossing the wire and entity boundaries.
//!
//! The wire side of a directory is uniformly multi-valued: every attribute of
//! an entry comes back as an ordered sequence of raw values. The declared
//! [`Modifiers`] of an attribute decide how that sequence is folded into the
//! field value handed to the entity constructor.

use std::collections::HashMap;

/// Per-attribute transform modifiers, combinable as a bitmask.
///
/// ```
/// use ldapom::value::Modifiers;
///
/// let m = Modifiers::MULTIVALUED | Modifiers::BINARY;
/// assert!(m.contains(Modifiers::BINARY));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// Scalar text attribute: collapse to the first wire value.
    pub const NONE: Modifiers = Modifiers(0);
    /// Keep the full ordered value sequence instead of collapsing it.
    pub const MULTIVALUED: Modifiers = Modifiers(1);
    /// Value bytes are not text and are passed through uninterpreted.
    pub const BINARY: Modifiers = Modifiers(2);

    /// Whether all flags of `other` are set on `self`.
    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bitmask value.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

/// One attribute value as the transport returned or accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        RawValue::Bytes(value.into())
    }

    /// The value as transport bytes, however it was typed.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RawValue::Text(s) => s.into_bytes(),
            RawValue::Bytes(b) => b,
        }
    }
}

/// One matched entry as returned by the transport: the entry DN plus every
/// attribute as an ordered sequence of raw values.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub dn: String,
    pub attrs: HashMap<String, Vec<RawValue>>,
}

impl RawRecord {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attrs: HashMap::new(),
        }
    }

    /// Append the value sequence for an attribute (builder style, tests and
    /// transports both construct records this way).
    pub fn with_attr(mut self, name: impl Into<String>, values: Vec<RawValue>) -> Self {
        self.attrs.insert(name.into(), values);
        self
    }
}

/// The raw outcome of a search: the matched records plus their count, known
/// up front rather than by exhausting the iteration.
#[derive(Debug, Clone, Default)]
pub struct RawSearchResult {
    count: usize,
    records: Vec<RawRecord>,
}

impl RawSearchResult {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }
}

/// A transformed field value on an entity.
///
/// Scalar attributes collapse to `Text` or `Bytes`; MULTIVALUED attributes
/// keep their ordered sequence as `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Empty text, empty bytes and empty lists all count as empty; `create`
    /// omits such fields from the outgoing entry.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Bytes(b) => b.is_empty(),
            FieldValue::List(values) => values.is_empty(),
        }
    }

    /// Normalize to the list-oriented shape the wire protocol's write verbs
    /// require: scalars become single-element sequences, lists are flattened
    /// to their scalar values.
    pub fn to_wire(&self) -> Vec<RawValue> {
        match self {
            FieldValue::Text(s) => vec![RawValue::Text(s.clone())],
            FieldValue::Bytes(b) => vec![RawValue::Bytes(b.clone())],
            FieldValue::List(values) => values.iter().flat_map(FieldValue::to_wire).collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(bytes: Vec<u8>) -> Self {
        FieldValue::Bytes(bytes)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// An ordered field-name → value mapping.
///
/// This is what entity constructors receive from a search, and what the write
/// path encodes back into directory operations. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Vec<(String, FieldValue)>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        let mut set = FieldSet::new();
        for (name, value) in iter {
            set.set(name, value);
        }
        set
    }
}
