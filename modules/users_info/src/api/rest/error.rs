use axum::http::StatusCode;
use modkit::api::problem::{FieldViolation, Problem, ProblemResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

/// Outcome of an API Surface call that did not produce a value.
///
/// `NotFound` comes from the controller's own existence pre-check.
/// `Domain` carries whatever the gateway raised, untouched, so a row deleted
/// between the pre-check and the mutation shows up as `Domain(UserNotFound)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("User with ID {id} not found")]
    NotFound { id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.example.com/{code}"))
        .with_code(code)
        .with_instance(instance)
        .with_current_trace();

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::UserNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            format!("User with ID {id} not found"),
            instance,
        ),
        DomainError::EmailAlreadyExists { email } => from_parts(
            StatusCode::CONFLICT,
            "USERS_EMAIL_CONFLICT",
            "Email already exists",
            format!("Email '{email}' is already in use"),
            instance,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
        }
    }
}

pub fn map_api_error(e: &ApiError, instance: &str) -> ProblemResponse {
    match e {
        ApiError::NotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            "USERS_NOT_FOUND",
            "User not found",
            e.to_string(),
            instance,
        ),
        ApiError::Domain(domain) => map_domain_error(domain, instance),
    }
}

/// 400 problem listing every rejected field as a JSON pointer.
pub fn validation_problem(errors: &ValidationErrors, instance: &str) -> ProblemResponse {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldViolation {
                detail: match &err.message {
                    Some(msg) => format!("{field} {msg}"),
                    None => format!("{field} is invalid ({})", err.code),
                },
                pointer: format!("/{field}"),
            })
        })
        .collect();
    violations.sort_by(|a, b| a.pointer.cmp(&b.pointer));

    let ProblemResponse(problem) = from_parts(
        StatusCode::BAD_REQUEST,
        "USERS_VALIDATION",
        "Validation error",
        "Request body failed validation",
        instance,
    );
    ProblemResponse(problem.with_errors(violations))
}
