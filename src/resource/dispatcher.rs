//! Resource dispatcher: routes one request to one of the five CRUD
//! operations and orchestrates the collection and validator collaborators.
//!
//! Operation table, keyed by (method, identifier present?):
//!
//! | Method | Id  | Operation                                  |
//! |--------|-----|--------------------------------------------|
//! | GET    | no  | list collection                            |
//! | GET    | yes | fetch single record                        |
//! | POST   | any | create (requires `add_validator`)          |
//! | PUT    | yes | update (requires `edit_validator`)         |
//! | PUT    | no  | 405                                        |
//! | DELETE | yes | delete                                     |
//! | DELETE | no  | 405                                        |

use std::collections::HashMap;

use axum::http::{HeaderMap, Method};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::collection::{Collection, Lookup};
use crate::validator::{RequestContext, Validation, ValidatorFactory};

use super::errors::{ResourceError, ResourceResult};
use super::pagination::{page_offset, slice_page};
use super::projector::{project_record, project_records};
use super::response::ResourceResponse;
use super::spec::ResourceSpec;

/// One incoming request, already stripped of routing concerns: the method,
/// the optional resource identifier, query parameters, headers, raw body.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub method: Method,
    pub id: Option<String>,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl ResourceRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            id: None,
            query: HashMap::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn context(&self) -> RequestContext {
        RequestContext::new(self.method.clone(), self.headers.clone(), self.query.clone())
    }
}

/// One configured resource endpoint. Stateless per request: the wrapped
/// specification is read-only, so a single `Resource` serves concurrent
/// requests without additional synchronization.
pub struct Resource<C: Collection> {
    spec: ResourceSpec<C>,
}

impl<C: Collection> Resource<C> {
    pub fn new(spec: ResourceSpec<C>) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ResourceSpec<C> {
        &self.spec
    }

    /// Route a request to its operation.
    pub fn dispatch(&self, req: ResourceRequest) -> ResourceResult<ResourceResponse> {
        debug!(method = %req.method, id = ?req.id, "dispatching resource request");
        match (req.method.as_str(), req.id.as_deref()) {
            ("GET", Some(id)) => self.fetch_single(id),
            ("GET", None) => self.list(&req),
            ("POST", _) => self.create(&req),
            ("PUT", Some(id)) => self.update(&req, id),
            ("PUT", None) => Err(ResourceError::MethodNotSupported(
                "PUT not supported".to_string(),
            )),
            ("DELETE", Some(id)) => self.delete(id),
            ("DELETE", None) => Err(ResourceError::MethodNotSupported(
                "DELETE is not supported for collections".to_string(),
            )),
            _ => Err(ResourceError::method_not_supported(&req.method)),
        }
    }

    /// GET with an identifier: exactly one match required. An ambiguous key
    /// is surfaced identically to absence.
    fn fetch_single(&self, id: &str) -> ResourceResult<ResourceResponse> {
        match self.spec.collection.get_by_key(id) {
            Lookup::Found(record) => Ok(ResourceResponse::ok(Value::Object(project_record(
                &self.spec, &record,
            )))),
            Lookup::NotFound => Err(ResourceError::NotFound),
            Lookup::Ambiguous => {
                warn!(id, "ambiguous primary-key match treated as not found");
                Err(ResourceError::NotFound)
            }
        }
    }

    /// GET without an identifier: full result set, paginated when a page
    /// size is configured.
    fn list(&self, req: &ResourceRequest) -> ResourceResult<ResourceResponse> {
        let mut records = self.spec.collection.all();
        if let Some(size) = self.spec.page_size {
            let raw_page = req.query.get(&self.spec.page_param).map(String::as_str);
            records = slice_page(records, page_offset(raw_page, size), size);
        }
        let rows = project_records(&self.spec, &records)
            .into_iter()
            .map(Value::Object)
            .collect();
        Ok(ResourceResponse::ok(Value::Array(rows)))
    }

    /// POST: create through the add-validator. Never paginated.
    fn create(&self, req: &ResourceRequest) -> ResourceResult<ResourceResponse> {
        let factory = self.spec.add_validator.as_ref().ok_or_else(|| {
            ResourceError::MethodNotSupported("POST not supported".to_string())
        })?;
        let input = decode_body(req)?;
        self.run_validator(factory.as_ref(), input, None, req)
    }

    /// PUT with an identifier: merge into the existing record through the
    /// edit-validator.
    fn update(&self, req: &ResourceRequest, id: &str) -> ResourceResult<ResourceResponse> {
        let factory = self.spec.edit_validator.as_ref().ok_or_else(|| {
            ResourceError::MethodNotSupported("PUT not supported".to_string())
        })?;
        let input = decode_body(req)?;
        let existing = match self.spec.collection.get_by_key(id) {
            Lookup::Found(record) => record,
            Lookup::NotFound | Lookup::Ambiguous => return Err(ResourceError::NotFound),
        };
        self.run_validator(factory.as_ref(), input, Some(&existing), req)
    }

    /// DELETE with an identifier: serialize the record's last state, then
    /// destroy it. Read-then-destroy, observably.
    fn delete(&self, id: &str) -> ResourceResult<ResourceResponse> {
        let records = self.spec.collection.filter_by_key(id);
        let first = records.first().ok_or(ResourceError::NotFound)?;
        let last_state = Value::Object(project_record(&self.spec, first));
        self.spec.collection.delete(&records);
        Ok(ResourceResponse::ok(last_state))
    }

    fn run_validator(
        &self,
        factory: &dyn ValidatorFactory<C::Record>,
        input: Map<String, Value>,
        existing: Option<&C::Record>,
        req: &ResourceRequest,
    ) -> ResourceResult<ResourceResponse> {
        let mut validator = factory.build(input, existing);
        validator.bind_request(&req.context());
        match validator.commit() {
            Validation::Saved(record) => Ok(ResourceResponse::ok(Value::Object(
                project_record(&self.spec, &record),
            ))),
            Validation::Invalid(errors) => {
                warn!(method = %req.method, ?errors, "validation failed");
                Err(ResourceError::ValidationFailed(errors))
            }
        }
    }
}

/// Decode the request body as a JSON object.
fn decode_body(req: &ResourceRequest) -> ResourceResult<Map<String, Value>> {
    let raw = req.body.as_deref().unwrap_or("");
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ResourceError::MalformedBody(req.method.clone())),
    }
}
