//! # Resource Core
//!
//! Request dispatch and serialization for one REST resource endpoint: the
//! mapping from (HTTP method, identifier present?) to one of five CRUD
//! operations, field projection, pagination slicing, and structured error
//! reporting.

pub mod dispatcher;
pub mod errors;
pub mod pagination;
pub mod projector;
pub mod response;
pub mod spec;

pub use dispatcher::{Resource, ResourceRequest};
pub use errors::{ErrorBody, ResourceError, ResourceResult};
pub use response::ResourceResponse;
pub use spec::ResourceSpec;
