//! Resource specification: the immutable configuration binding a collection
//! to serialization and validation rules for one endpoint.

use serde_json::{Map, Value};

use crate::codec::{FieldValue, JsonCodec, ValueCodec};
use crate::collection::Collection;
use crate::validator::ValidatorFactory;

/// Computed output field: a function of the record.
pub type CustomValueFn<R> = Box<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// Full projection override: replaces all other serialization rules.
pub type ValuesOverrideFn<R> = Box<dyn Fn(&R) -> Map<String, Value> + Send + Sync>;

/// Static configuration for one resource endpoint.
///
/// Built once, then shared read-only across concurrent requests; nothing
/// here mutates per request.
pub struct ResourceSpec<C: Collection> {
    pub(crate) collection: C,
    pub(crate) serialize_fields: Vec<String>,
    pub(crate) custom_values: Vec<(String, CustomValueFn<C::Record>)>,
    pub(crate) values_override: Option<ValuesOverrideFn<C::Record>>,
    pub(crate) primary_key: String,
    pub(crate) page_size: Option<usize>,
    pub(crate) page_param: String,
    pub(crate) add_validator: Option<Box<dyn ValidatorFactory<C::Record>>>,
    pub(crate) edit_validator: Option<Box<dyn ValidatorFactory<C::Record>>>,
    pub(crate) codec: Box<dyn ValueCodec>,
}

impl<C: Collection> ResourceSpec<C> {
    /// Start a specification for the given collection. Defaults: primary key
    /// `"id"`, page parameter `"p"`, no pagination, no validators, the
    /// standard JSON codec.
    pub fn new(collection: C) -> Self {
        Self {
            collection,
            serialize_fields: Vec::new(),
            custom_values: Vec::new(),
            values_override: None,
            primary_key: "id".to_string(),
            page_size: None,
            page_param: "p".to_string(),
            add_validator: None,
            edit_validator: None,
            codec: Box::new(JsonCodec),
        }
    }

    /// Ordered field names to appear in JSON output.
    pub fn serialize_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.serialize_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Add a computed output field. Applied after plain fields, so a custom
    /// value shadows a plain field of the same name.
    pub fn custom_value<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&C::Record) -> FieldValue + Send + Sync + 'static,
    {
        self.custom_values.push((name.into(), Box::new(f)));
        self
    }

    /// Replace the whole projection with a single per-record function.
    pub fn values_override<F>(mut self, f: F) -> Self
    where
        F: Fn(&C::Record) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.values_override = Some(Box::new(f));
        self
    }

    /// Primary key field name (default `"id"`).
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = name.into();
        self
    }

    /// Enable pagination of collection listings at the given page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Query parameter selecting the page (default `"p"`).
    pub fn page_param(mut self, name: impl Into<String>) -> Self {
        self.page_param = name.into();
        self
    }

    /// Validator factory for POST requests. Without one, POST is rejected.
    pub fn add_validator<F>(mut self, factory: F) -> Self
    where
        F: ValidatorFactory<C::Record> + 'static,
    {
        self.add_validator = Some(Box::new(factory));
        self
    }

    /// Validator factory for PUT requests. Without one, PUT is rejected.
    pub fn edit_validator<F>(mut self, factory: F) -> Self
    where
        F: ValidatorFactory<C::Record> + 'static,
    {
        self.edit_validator = Some(Box::new(factory));
        self
    }

    /// Swap the value codec (default: [`JsonCodec`]).
    pub fn codec<V: ValueCodec + 'static>(mut self, codec: V) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }
}
