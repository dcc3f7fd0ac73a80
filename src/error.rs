use std::borrow::Cow;

use aide::{
	gen::GenContext,
	openapi::{Operation, Response as ApiResponse},
	OperationOutput,
};
use axum::{
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;
use validator::ValidationErrors;

use crate::store::ErrorKind;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message sent to the client.
///
/// `content` is a stable snake_case code that clients can match on,
/// the optional `field` names the input field that caused it.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub content: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Default::default)
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorBody {
	pub errors: Vec<Message<'static>>,
}

/// An error that can be presented to the client.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information. The [`std::fmt::Display`] output is only logged.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message<'static>>;
}

pub fn status(kind: ErrorKind) -> StatusCode {
	match kind {
		ErrorKind::Validation => StatusCode::BAD_REQUEST,
		ErrorKind::NotFound => StatusCode::NOT_FOUND,
		ErrorKind::Authorization => StatusCode::FORBIDDEN,
		ErrorKind::Conflict => StatusCode::CONFLICT,
	}
}

/// One message per failed validation rule, using the rule code as the content.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<Message<'static>> {
	let mut fields = errors.field_errors().into_iter().collect::<Vec<_>>();
	fields.sort_by_key(|(field, _)| *field);

	fields
		.into_iter()
		.flat_map(|(field, errors)| {
			errors.iter().map(move |error| {
				let mut message = Message::new(error.code.clone()).field(field);

				for (key, value) in &error.params {
					// The rejected value is echoed back by validator, keep it out of responses
					if key != "value" {
						message = message.detail(key.to_string(), value.clone());
					}
				}

				if let Some(text) = &error.message {
					message = message.detail("message", text.to_string());
				}

				message
			})
		})
		.collect()
}

fn respond(status: StatusCode, errors: Vec<Message<'static>>) -> Response {
	(status, axum::Json(ErrorBody { errors })).into_response()
}

/// Errors that can happen in any route, before or around the handler itself.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
	#[error("json rejected: {0}")]
	Json(#[from] JsonRejection),
	#[error("query rejected: {0}")]
	Query(#[from] QueryRejection),
	#[error("path rejected: {0}")]
	Path(#[from] PathRejection),
	#[error("rate limit: {0}")]
	RateLimit(#[from] GovernorError),
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		match self {
			Self::Validation(errors) => {
				respond(StatusCode::BAD_REQUEST, validation_messages(&errors))
			}
			Self::Json(rejection) => respond(
				StatusCode::BAD_REQUEST,
				Message::new("invalid_json")
					.detail("reason", rejection.body_text())
					.into_vec(),
			),
			Self::Query(rejection) => respond(
				StatusCode::BAD_REQUEST,
				Message::new("invalid_query")
					.detail("reason", rejection.body_text())
					.into_vec(),
			),
			Self::Path(rejection) => respond(
				StatusCode::BAD_REQUEST,
				Message::new("invalid_path")
					.detail("reason", rejection.body_text())
					.into_vec(),
			),
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, headers }) => (
				StatusCode::TOO_MANY_REQUESTS,
				headers.unwrap_or_default(),
				axum::Json(ErrorBody {
					errors: Message::new("too_many_requests")
						.detail("wait", wait_time)
						.into_vec(),
				}),
			)
				.into_response(),
			Self::RateLimit(error) => {
				tracing::error!(%error, "rate limiter failed");

				respond(
					StatusCode::INTERNAL_SERVER_ERROR,
					Message::new("internal_error").into_vec(),
				)
			}
		}
	}
}

/// The error type returned by route handlers and extractors.
///
/// Either an [`AppError`] shared by every route, or the route's own error `T`.
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T: ErrorShape> From<T> for RouteError<T> {
	fn from(error: T) -> Self {
		Self::Route(error)
	}
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				let status = error.status();

				if status.is_server_error() {
					tracing::error!(%error, "request failed");
				} else {
					tracing::debug!(%error, %status, "request rejected");
				}

				respond(status, error.into_errors())
			}
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = ErrorBody;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<ApiResponse> {
		axum_jsonschema::Json::<ErrorBody>::operation_response(ctx, operation)
	}
}
