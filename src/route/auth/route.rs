use aide::axum::IntoApiResponse;
use argon2::Argon2;
use axum::{
	extract::State,
	http::{header, StatusCode},
	response::IntoResponse,
};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	session, AppState,
};

use super::{model, Error, RouteError};

pub const KEY_LENGTH: usize = 32;

/// Hashes a password with Argon2, using the user's id as a salt.
/// Since this is only used for logging in and registering,
/// the scope of this function can remain in here with no issues.
pub(crate) fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}

/// Creates a session for `user` and responds with it, setting the session cookie.
async fn start_session(
	state: &AppState,
	user: model::User,
	status: StatusCode,
) -> Result<impl IntoApiResponse, RouteError> {
	let session = state.store.create_session(user.id).await.map_err(Error::from)?;
	let cookie = session::create_cookie(session.id, state.config.secure_cookies);

	Ok((
		status,
		[(header::SET_COOKIE, cookie.to_string())],
		Json(model::AuthOutput {
			token: session.id,
			user,
		}),
	))
}

/// Log in
/// Logs in to an account by email and password, returning a session token and setting the session cookie.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::AuthOutput>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(auth): Json<model::LoginInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let Some(user) = state.store.find_by_email(&auth.email).await else {
		return Err(Error::InvalidEmailOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &auth.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidEmailOrPassword.into());
	}

	tracing::info!(user = %user.id, "logged in");

	start_session(&state, user, StatusCode::OK).await
}

/// Log out
/// Logs out of the authenticated account, invalidating the session and clearing the session cookie.
#[route(tag = tag::AUTH, response(status = 204, description = "Logged out successfully."))]
pub async fn logout(
	State(state): State<AppState>,
	session: Session,
) -> Result<impl IntoApiResponse, RouteError> {
	state.store.delete_session(session.id).await;

	// Clear the session cookie
	Ok((
		[(
			header::SET_COOKIE,
			session::clear_cookie(state.config.secure_cookies).to_string(),
		)],
		StatusCode::NO_CONTENT,
	)
		.into_response())
}

/// Register account
/// Registers a new account, returning a session token and setting the session cookie.
#[route(tag = tag::AUTH, response(status = 201, description = "Registered successfully.", shape = "Json<model::AuthOutput>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterUser>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user_id = Uuid::new_v4();
	let hashed = hash_password(&state.hasher, &input.password, &user_id).map_err(Error::Argon)?;

	let user = state
		.store
		.register(input, user_id, hashed.to_vec())
		.await
		.map_err(Error::from)?;

	start_session(&state, user, StatusCode::CREATED).await
}

/// Get user
/// Returns the authenticated user, including their email address and admin flag.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}

/// Update user
/// Updates the profile of the authenticated user. Only the fields present are changed.
#[route(tag = tag::AUTH)]
pub async fn update_me(
	State(state): State<AppState>,
	session: Session,
	Json(patch): Json<model::UpdateUser>,
) -> Result<Json<model::User>, RouteError> {
	let user = state
		.store
		.update_profile(session.user.id, patch)
		.await
		.map_err(Error::from)?;

	Ok(Json(user))
}
