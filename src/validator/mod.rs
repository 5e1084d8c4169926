//! # Validation Contracts
//!
//! The opaque validation/persistence collaborator for write operations. A
//! `ValidatorFactory` is configured per resource (one for create, one for
//! update); the dispatcher hands it the decoded request body and, for
//! updates, the existing record, then commits the validator to obtain either
//! a saved record or a structured error set.

use std::collections::BTreeMap;
use std::collections::HashMap;

use axum::http::{HeaderMap, Method};
use serde_json::{Map, Value};

/// Field name to ordered human-readable messages.
pub type ErrorSet = BTreeMap<String, Vec<String>>;

/// Outcome of committing a validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<R> {
    Saved(R),
    Invalid(ErrorSet),
}

/// Ambient request state offered to validators that want it, for
/// authorization-aware validation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(method: Method, headers: HeaderMap, query: HashMap<String, String>) -> Self {
        Self { method, headers, query }
    }
}

/// A validator holding one decoded request body, ready to commit.
pub trait Validator<R>: Send {
    /// Optional capability: receive the ambient request before committing.
    /// The default implementation ignores it.
    fn bind_request(&mut self, _ctx: &RequestContext) {}

    /// Validate and persist. Consumes the validator.
    fn commit(self: Box<Self>) -> Validation<R>;
}

/// Builds a validator from a decoded JSON object and, for edits, the
/// existing record being overwritten.
pub trait ValidatorFactory<R>: Send + Sync {
    fn build(&self, input: Map<String, Value>, existing: Option<&R>) -> Box<dyn Validator<R>>;
}

impl<R, F> ValidatorFactory<R> for F
where
    F: Fn(Map<String, Value>, Option<&R>) -> Box<dyn Validator<R>> + Send + Sync,
{
    fn build(&self, input: Map<String, Value>, existing: Option<&R>) -> Box<dyn Validator<R>> {
        self(input, existing)
    }
}

/// A validator that has already decided its outcome. Handy for simple hosts
/// and for tests: the factory closure does the checking and persistence,
/// then wraps the result.
pub struct Resolved<R>(pub Validation<R>);

impl<R: Send> Validator<R> for Resolved<R> {
    fn commit(self: Box<Self>) -> Validation<R> {
        self.0
    }
}
