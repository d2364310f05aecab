//! Shared HTTP plumbing for the users service: RFC 9457 problem responses,
//! request-id/trace middleware, a traced outbound client and shutdown signals.

pub mod api;
pub mod http;
pub mod shutdown;

pub use api::middleware::{with_http_stack, HttpStackOptions};
pub use api::problem::{FieldViolation, Problem, ProblemResponse};
pub use http::client::TracedClient;
