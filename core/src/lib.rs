//! Synchronous client core for the voip.ms REST API.
//!
//! # Overview
//! Every voip.ms method is one GET against a single endpoint, dispatched by
//! the `method` query parameter and answered with a JSON object carrying a
//! `status` field. This crate builds those requests and interprets those
//! responses without touching the network (host-does-IO pattern); the
//! caller, or a [`Transport`], executes the round-trip.
//!
//! # Design
//! - The method table lives in [`catalog`] as data. Encoding rules
//!   (presence, boolean policies, record flattening) are applied by
//!   [`request`], extraction paths by [`response`].
//! - `VoipMsClient` is stateless: it holds the endpoint and one
//!   [`Credential`] and can be shared freely between threads.
//! - [`operations`] adds typed argument records and result types on top of
//!   the untyped [`Params`] path; both go through the same builder.

pub mod catalog;
pub mod client;
pub mod credential;
pub mod error;
pub mod http;
pub mod operations;
pub mod params;
pub mod request;
pub mod response;
pub mod transport;

pub use catalog::{operation, Operation, CATALOG};
pub use client::{VoipMsClient, API_URL};
pub use credential::{Credential, Secret};
pub use error::{ApiError, CallError, ConfigError};
pub use http::HttpRequest;
pub use operations::Request;
pub use params::{ParamValue, Params, Record};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
