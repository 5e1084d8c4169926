//! restbone - a Backbone.js-compatible REST resource adapter
//!
//! Binds an opaque backing-store collection to serialization and validation
//! rules, and exposes standard CRUD semantics over HTTP in the JSON shape
//! Backbone.js collections and models expect.

pub mod codec;
pub mod collection;
pub mod resource;
pub mod server;
pub mod validator;

pub use codec::{FieldValue, JsonCodec, ValueCodec};
pub use collection::{Collection, Lookup, MemoryCollection, MemoryRecord, Record};
pub use resource::{
    Resource, ResourceError, ResourceRequest, ResourceResponse, ResourceResult, ResourceSpec,
};
pub use server::{ResourceServer, ServerConfig};
pub use validator::{ErrorSet, RequestContext, Validation, Validator, ValidatorFactory};
