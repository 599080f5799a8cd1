//! Outbound HTTP for cloud-mode actions.
//!
//! Actions build an [`HttpRequest`] and hand it to a [`RequestClient`].
//! [`HttpClient`] is the `reqwest` implementation; tests and dry runs
//! substitute their own.

mod client;
mod error;
mod response;

pub use client::{DEFAULT_TIMEOUT, HttpClient, HttpClientConfig, HttpRequest, RequestClient};
pub use error::RequestError;
pub use response::{Response, ResponseStatusCategory};
