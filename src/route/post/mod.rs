use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

pub use crate::store::post::Error;

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_posts, get_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route("/me", get_with(get_own_posts, get_own_posts_docs))
		.api_route(
			"/categories/stats",
			get_with(get_category_stats, get_category_stats_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route("/:id/like", post_with(like_post, like_post_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		error::status(self.kind())
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.detail("post", post.to_string())
				.into_vec(),
			Self::NotAuthor(post) => error::Message::new("not_author")
				.detail("post", post.to_string())
				.into_vec(),
			Self::HiddenStatus => error::Message::new("hidden_status")
				.field("status")
				.into_vec(),
			Self::Validation(errors) => error::validation_messages(&errors),
		}
	}
}
