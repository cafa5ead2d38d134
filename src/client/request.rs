//! Request descriptors
//!
//! A [`RequestDescriptor`] is an immutable description of one outbound call.
//! It can be sent any number of times; retry bookkeeping lives in the
//! dispatch path, not on the descriptor.

use reqwest::Method;
use serde::Serialize;

use super::error::{ClientError, ClientResult};

/// Which backend a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Authentication service (`auth_url`)
    Auth,
    /// Financial data service (`base_url`)
    Data,
    /// Data service host without its `/api` prefix (health checks)
    Root,
}

/// Immutable description of an outbound HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    service: Service,
    path: String,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    authenticated: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, service: Service, path: impl Into<String>) -> Self {
        Self {
            method,
            service,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(service: Service, path: impl Into<String>) -> Self {
        Self::new(Method::GET, service, path)
    }

    pub fn post(service: Service, path: impl Into<String>) -> Self {
        Self::new(Method::POST, service, path)
    }

    pub fn patch(service: Service, path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, service, path)
    }

    /// Add one query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when present
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Validation(format!("unserializable body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without a bearer token and outside the refresh cycle
    pub fn public(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
