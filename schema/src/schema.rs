//! Schema types and the serializer.

use std::cell::OnceCell;
use std::sync::Arc;

use orma_core::{EntityType, OrmaError, Plan, PlanBuilder, Registered, Registry, Result, Value};
use serde_json::{Map, Value as Json};

use crate::field::{FieldKind, SchemaField};
use crate::source::{Attribute, Source};

pub type SchemaRegistry = Registry<SchemaType>;

/// A declared output shape: a name and an ordered serialization plan.
#[derive(Debug, Clone)]
pub struct SchemaType {
    name: String,
    plan: Plan<SchemaField>,
}

impl SchemaType {
    pub fn builder(name: impl Into<String>) -> SchemaTypeBuilder {
        SchemaTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plan(&self) -> &Plan<SchemaField> {
        &self.plan
    }

    /// Output keys in plan order.
    pub fn output_keys(&self) -> impl Iterator<Item = &str> {
        self.plan.iter().map(|(name, field)| field.output_key(name))
    }

    /// Serializes a single object into a JSON object.
    pub fn serialize_one(&self, source: &dyn Source) -> Result<Json> {
        let mut out = Map::with_capacity(self.plan.len());
        for (name, field) in self.plan.iter() {
            if let Some(value) = self.resolve(name, field, source)? {
                out.insert(field.output_key(name).to_string(), value);
            }
        }
        Ok(Json::Object(out))
    }

    /// Output value for one plan entry, or `None` when it is omitted.
    fn resolve(&self, name: &str, field: &SchemaField, source: &dyn Source) -> Result<Option<Json>> {
        let attribute_name = field.source_name(name);
        let attribute = match &field.accessor {
            Some(accessor) => match accessor(source) {
                Ok(value) => Some(Attribute::owned(value)),
                Err(err) if field.required => return Err(err),
                Err(_) => None,
            },
            None => source.attribute(attribute_name),
        };

        let attribute = match attribute {
            Some(attribute) if attribute.is_missing() => {
                if field.required {
                    return Err(OrmaError::MissingRequiredField {
                        field: name.to_string(),
                    });
                }
                return Ok(None);
            }
            Some(attribute) => attribute,
            None if field.required => {
                return Err(OrmaError::UnknownAttribute {
                    attribute: attribute_name.to_string(),
                });
            }
            None => return Ok(None),
        };

        let conversion = |message: String| OrmaError::TypeConversion {
            field: name.to_string(),
            message,
        };

        let value = match (&field.kind, attribute) {
            (FieldKind::Nested(nested), Attribute::Object(object)) => nested.serialize_one(object)?,
            (FieldKind::Nested(nested), Attribute::Value(value)) => match &*value {
                Value::Json(Json::Object(object)) => nested.serialize_one(object)?,
                other => {
                    return Err(conversion(format!(
                        "expected an object for `{}`, found {}",
                        nested.name(),
                        other.kind()
                    )));
                }
            },
            (_, Attribute::Object(_)) => {
                return Err(conversion("expected a value, found an object".to_string()));
            }
            (kind, Attribute::Value(value)) => kind.convert(&value).map_err(conversion)?,
        };
        Ok(Some(value))
    }
}

impl Registered for SchemaType {
    fn type_name(&self) -> &str {
        &self.name
    }
}

/// Declares a [`SchemaType`].
///
/// ```
/// use orma_schema::{Schema, SchemaField, SchemaType};
/// use serde_json::json;
///
/// let book = SchemaType::builder("BookSchema")
///     .field("title", SchemaField::string().label("full_title"))
///     .field("author", SchemaField::string().label("original_author"))
///     .build();
///
/// let input = json!({"title": "Book", "author": "John"});
/// let output = Schema::one(&book.into(), &input).serialize()?.clone();
/// assert_eq!(output, json!({"full_title": "Book", "original_author": "John"}));
/// # Ok::<(), orma_core::OrmaError>(())
/// ```
#[derive(Debug)]
pub struct SchemaTypeBuilder {
    name: String,
    ancestors: Vec<Arc<SchemaType>>,
    fields: Vec<(String, SchemaField)>,
}

impl SchemaTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ancestors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Starts from an entity type's fields, in plan order, converted with
    /// `SchemaField::from`. Later `field` calls override them.
    pub fn from_entity(entity_type: &EntityType) -> Self {
        let mut builder = Self::new(entity_type.name());
        for (attribute, descriptor) in entity_type.plan().iter() {
            builder = builder.field(attribute, SchemaField::from(descriptor));
        }
        builder
    }

    /// Adds an ancestor. Call root first.
    pub fn extends(mut self, ancestor: &Arc<SchemaType>) -> Self {
        self.ancestors.push(Arc::clone(ancestor));
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: SchemaField) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    pub fn build(self) -> SchemaType {
        let mut builder = PlanBuilder::new();
        for ancestor in &self.ancestors {
            builder = builder.inherit(&ancestor.plan);
        }
        for (name, field) in self.fields {
            builder.merge(name, field);
        }
        let plan = builder.build();
        orma_core::orma_trace_plan!("schema", self.name, plan.len());

        SchemaType {
            name: self.name,
            plan,
        }
    }

    pub fn register(self, registry: &mut SchemaRegistry) -> Result<Arc<SchemaType>> {
        registry.register(self.build())
    }
}

enum Input<'a> {
    One(&'a dyn Source),
    Many(Vec<&'a dyn Source>),
}

/// A schema applied to one object or to a sequence of them.
///
/// The output is computed on the first [`serialize`](Schema::serialize) call
/// and returned from cache afterwards.
pub struct Schema<'a> {
    schema_type: Arc<SchemaType>,
    input: Input<'a>,
    output: OnceCell<Json>,
}

impl<'a> Schema<'a> {
    pub fn one(schema_type: &Arc<SchemaType>, source: &'a dyn Source) -> Self {
        Self {
            schema_type: Arc::clone(schema_type),
            input: Input::One(source),
            output: OnceCell::new(),
        }
    }

    /// Batch mode: the output is an array with one object per source.
    pub fn many<I, S>(schema_type: &Arc<SchemaType>, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: Source + 'a,
    {
        Self {
            schema_type: Arc::clone(schema_type),
            input: Input::Many(sources.into_iter().map(|s| s as &dyn Source).collect()),
            output: OnceCell::new(),
        }
    }

    pub fn schema_type(&self) -> &Arc<SchemaType> {
        &self.schema_type
    }

    pub fn is_many(&self) -> bool {
        matches!(self.input, Input::Many(_))
    }

    pub fn serialize(&self) -> Result<&Json> {
        if let Some(output) = self.output.get() {
            return Ok(output);
        }

        let output = match &self.input {
            Input::One(source) => self.schema_type.serialize_one(*source)?,
            Input::Many(sources) => Json::Array(
                sources
                    .iter()
                    .map(|source| self.schema_type.serialize_one(*source))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        Ok(self.output.get_or_init(|| output))
    }

    /// Serializes and takes ownership of the output.
    pub fn into_json(self) -> Result<Json> {
        self.serialize()?;
        Ok(self.output.into_inner().unwrap_or_default())
    }
}

impl std::fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("schema_type", &self.schema_type.name())
            .field("many", &self.is_many())
            .field("serialized", &self.output.get().is_some())
            .finish()
    }
}
