mod session;

pub use session::{Admin, MaybeSession, Session};

use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Runs the [`Validate`] rules of an extracted value.
fn validated<T: Validate>(value: T) -> Result<T, AppError> {
	value.validate()?;
	Ok(value)
}

/// A JSON body checked against its [`Validate`] rules, and a JSON response.
///
/// Every rule violation is reported, each as its own message with the field
/// it belongs to. The schema derived with [`JsonSchema`] only documents the body.
///
/// ```rust
/// async fn route(Json(post): Json<CreatePost>) -> Json<PostView> {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum_jsonschema::Json<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: DeserializeOwned + Validate + JsonSchema + 'static,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;

		validated(value).map(Self)
	}
}

/// A query string checked against its [`Validate`] rules.
///
/// Paging and listing filters come through here, so out-of-range values are
/// rejected before they reach the store.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Query(value) =
			axum::extract::Query::<T>::from_request_parts(parts, state).await?;

		validated(value).map(Self)
	}
}

/// Path parameters checked against their [`Validate`] rules.
///
/// Malformed ids are rejected with `400 Bad Request` and an `invalid_path` message.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum_jsonschema::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: DeserializeOwned + Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let axum::extract::Path(value) =
			axum::extract::Path::<T>::from_request_parts(parts, state).await?;

		validated(value).map(Self)
	}
}
