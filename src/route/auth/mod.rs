use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, route::user::directory_errors, store::user, AppState};

pub mod model;
pub mod route;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidEmailOrPassword,
	#[error("password hashing error: {0}")]
	Argon(argon2::Error),
	#[error("no session cookie or bearer token")]
	NoSession,
	#[error("invalid session")]
	InvalidSession,
	#[error("admin access required")]
	AdminRequired,
	#[error(transparent)]
	Directory(#[from] user::Error),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/login", post_with(login, login_docs))
		.api_route("/logout", get_with(logout, logout_docs))
		.api_route("/register", post_with(register, register_docs))
		.api_route(
			"/me",
			get_with(get_me, get_me_docs).put_with(update_me, update_me_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidEmailOrPassword | Self::NoSession | Self::InvalidSession => {
				StatusCode::UNAUTHORIZED
			}
			Self::AdminRequired => StatusCode::FORBIDDEN,
			Self::Argon(..) => StatusCode::INTERNAL_SERVER_ERROR,
			Self::Directory(error) => error::status(error.kind()),
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let content = match self {
			Self::InvalidEmailOrPassword => "invalid_credentials",
			Self::NoSession => "no_session",
			Self::InvalidSession => "invalid_session",
			Self::AdminRequired => "admin_required",
			Self::Argon(..) => "internal_error",
			Self::Directory(error) => return directory_errors(error),
		};

		error::Message::new(content).into_vec()
	}
}
