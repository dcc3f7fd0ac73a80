use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{
	error::RouteError,
	model::{self, Actor},
	openapi::{SECURITY_SCHEME_BEARER, SECURITY_SCHEME_SESSION},
	route::auth,
	session,
	store::Store,
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the session and related user from the request.
///
/// The session id is read from an `Authorization: Bearer <id>` header if present,
/// otherwise from the session cookie.
///
/// If neither exists, a [`auth::Error::NoSession`] is returned.
/// If the session is unknown or malformed, a [`auth::Error::InvalidSession`] is returned.
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub id: Uuid,
	pub user: model::User,
}

impl Session {
	pub fn actor(&self) -> Actor {
		Actor {
			id: self.user.id,
			is_admin: self.user.is_admin,
		}
	}
}

fn session_id(parts: &request::Parts) -> Result<Uuid, auth::Error> {
	if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
		let token = value
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.ok_or(auth::Error::InvalidSession)?;

		return Uuid::parse_str(token.trim()).map_err(|_| auth::Error::InvalidSession);
	}

	let cookie = parts
		.headers
		.get_all(header::COOKIE)
		.into_iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(cookie::Cookie::split_parse)
		.filter_map(Result::ok)
		.find(|cookie| cookie.name() == session::COOKIE_NAME)
		.ok_or(auth::Error::NoSession)?;

	Uuid::parse_str(cookie.value()).map_err(|_| auth::Error::InvalidSession)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Store: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let id = session_id(parts)?;
		let user = Store::from_ref(state)
			.session_user(id)
			.await
			.ok_or(auth::Error::InvalidSession)?;

		Ok(Session { id, user })
	}
}

impl OperationInput for Session {
	/// Adds a session cookie or bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([
			[(SECURITY_SCHEME_SESSION.to_string(), Vec::new())]
				.into_iter()
				.collect(),
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		]);
	}
}

/// A [`Session`] that is allowed to be missing.
///
/// An invalid or expired session is treated the same as no session at all.
#[derive(Debug)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
	pub fn actor(&self) -> Option<Actor> {
		self.0.as_ref().map(Session::actor)
	}
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
	Store: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self(Session::from_request_parts(parts, state).await.ok()))
	}
}

impl OperationInput for MaybeSession {}

/// A [`Session`] whose user is an admin.
///
/// Non-admins are rejected with [`auth::Error::AdminRequired`].
#[derive(Debug)]
pub struct Admin(pub Session);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Admin
where
	Store: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let session = Session::from_request_parts(parts, state).await?;

		if !session.user.is_admin {
			return Err(auth::Error::AdminRequired.into());
		}

		Ok(Self(session))
	}
}

impl OperationInput for Admin {
	fn operation_input(ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		Session::operation_input(ctx, operation);
	}
}
