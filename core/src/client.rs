//! Stateless request builder and response parser for the voip.ms API.
//!
//! # Design
//! `VoipMsClient` holds only the endpoint URL and the credential, neither of
//! which changes after construction. Every call is split into
//! `build_request`, which produces an `HttpRequest`, and `parse_response`,
//! which consumes the raw body. The caller (or a `Transport` passed to
//! `call`/`send`) performs the single GET in between.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::{operation, Operation};
use crate::credential::{read_var, Credential};
use crate::error::{ApiError, CallError, ConfigError};
use crate::http::HttpRequest;
use crate::operations::Request;
use crate::params::Params;
use crate::request::build_query;
use crate::response::{decode_body, interpret};
use crate::transport::Transport;

/// The single REST endpoint every method is dispatched through.
pub const API_URL: &str = "https://voip.ms/api/v1/rest.php";

pub const API_URL_ENV: &str = "VOIPMS_API_URL";

/// Synchronous, stateless client for the voip.ms API.
///
/// Safe to share between threads; nothing is mutated after construction.
#[derive(Debug, Clone)]
pub struct VoipMsClient {
    base_url: String,
    credential: Credential,
}

impl VoipMsClient {
    pub fn new(credential: Credential) -> Self {
        Self::with_base_url(API_URL, credential)
    }

    pub fn with_base_url(base_url: &str, credential: Credential) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    /// Credential from `VOIPMS_API_USERNAME`/`VOIPMS_API_PASSWORD`, endpoint
    /// from `VOIPMS_API_URL` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credential = Credential::from_env()?;
        match read_var(API_URL_ENV) {
            Ok(url) => Ok(Self::with_base_url(&url, credential)),
            Err(ConfigError::MissingVar(_)) => Ok(Self::new(credential)),
            Err(err) => Err(err),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        self.credential.username()
    }

    /// Build the GET request for `method` without performing any I/O.
    pub fn build_request(&self, method: &str, params: &Params) -> Result<HttpRequest, ApiError> {
        let operation = lookup(method)?;
        Ok(HttpRequest {
            base_url: self.base_url.clone(),
            query: build_query(&self.credential, operation, params)?,
        })
    }

    /// Build the request for a typed argument record.
    pub fn build<R: Request>(&self, request: &R) -> Result<HttpRequest, ApiError> {
        self.build_request(R::METHOD, &Params::from_record(request)?)
    }

    /// Decode a raw response body and extract `method`'s result.
    pub fn parse_response(&self, method: &str, body: &[u8]) -> Result<Value, ApiError> {
        let operation = lookup(method)?;
        interpret(operation, &decode_body(body)?)
    }

    /// Like `parse_response`, then deserialize the extracted value into `T`.
    pub fn parse_response_as<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &[u8],
    ) -> Result<T, ApiError> {
        let value = self.parse_response(method, body)?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::MalformedResponse(format!("{method}: unexpected result shape: {e}")))
    }

    /// Parse the response to a typed argument record.
    pub fn parse<R: Request>(&self, body: &[u8]) -> Result<R::Output, ApiError> {
        self.parse_response_as(R::METHOD, body)
    }

    /// Build, execute one GET through `transport`, and interpret the result.
    pub fn call<T: Transport>(
        &self,
        transport: &T,
        method: &str,
        params: &Params,
    ) -> Result<Value, CallError<T::Error>> {
        let request = self.build_request(method, params)?;
        let body = transport.get(&request.url()).map_err(CallError::Transport)?;
        Ok(self.parse_response(method, &body)?)
    }

    /// Typed variant of `call`.
    pub fn send<T: Transport, R: Request>(
        &self,
        transport: &T,
        request: &R,
    ) -> Result<R::Output, CallError<T::Error>> {
        let http = self.build(request)?;
        let body = transport.get(&http.url()).map_err(CallError::Transport)?;
        Ok(self.parse::<R>(&body)?)
    }
}

fn lookup(method: &str) -> Result<&'static Operation, ApiError> {
    operation(method).ok_or_else(|| ApiError::InvalidArgument(format!("unknown method '{method}'")))
}
