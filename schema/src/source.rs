//! Objects a schema can read attributes from.

use std::borrow::Cow;

use orma_core::{Entity, ID_COLUMN, Row, Value};
use serde_json::Map;

/// A resolved attribute: a scalar or a composite object for nested schemas.
pub enum Attribute<'a> {
    Value(Cow<'a, Value>),
    Object(&'a dyn Source),
}

impl<'a> Attribute<'a> {
    pub fn owned(value: impl Into<Value>) -> Self {
        Attribute::Value(Cow::Owned(value.into()))
    }

    pub fn borrowed(value: &'a Value) -> Self {
        Attribute::Value(Cow::Borrowed(value))
    }

    /// `Null` is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Attribute::Value(value) if value.is_null())
    }
}

impl std::fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Attribute::Object(_) => f.write_str("Object(..)"),
        }
    }
}

/// Anything with named attributes.
///
/// Implement this for your own structs to serialize them directly; return
/// [`Attribute::Object`] for fields that hold another composite value.
///
/// ```
/// use orma_core::Value;
/// use orma_schema::{Attribute, Source};
///
/// struct Book {
///     title: String,
/// }
///
/// impl Source for Book {
///     fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
///         match name {
///             "title" => Some(Attribute::owned(self.title.as_str())),
///             _ => None,
///         }
///     }
/// }
///
/// let book = Book { title: "Book".into() };
/// assert!(matches!(book.attribute("title"), Some(Attribute::Value(v)) if *v == Value::from("Book")));
/// ```
pub trait Source {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>>;
}

impl<S: Source + ?Sized> Source for &S {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        (**self).attribute(name)
    }
}

/// Plan fields plus the identity under `id`. An unpersisted entity yields a
/// missing `id`.
impl Source for Entity {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        if name == ID_COLUMN {
            return Some(Attribute::owned(self.id()));
        }
        self.get(name).map(Attribute::borrowed)
    }
}

impl Source for Row {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.get(name).map(Attribute::borrowed)
    }
}

impl Source for Map<String, serde_json::Value> {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.get(name).map(|json| Attribute::owned(Value::from_json(json)))
    }
}

/// Only JSON objects have attributes.
impl Source for serde_json::Value {
    fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        self.as_object().and_then(|map| map.attribute(name))
    }
}
