use aide::axum::{
	routing::{delete_with, get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

pub use crate::store::comment::Error;

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", post_with(create_comment, create_comment_docs))
		.api_route(
			"/post/:id",
			get_with(get_post_comments, get_post_comments_docs),
		)
		.api_route("/:id", delete_with(delete_comment, delete_comment_docs))
		.api_route("/:id/like", post_with(like_comment, like_comment_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		error::status(self.kind())
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownComment(comment) => error::Message::new("unknown_comment")
				.detail("comment", comment.to_string())
				.into_vec(),
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.field("post_id")
				.detail("post", post.to_string())
				.into_vec(),
			Self::UnknownParent(comment) => error::Message::new("unknown_comment")
				.field("parent_comment_id")
				.detail("comment", comment.to_string())
				.into_vec(),
			Self::NotAuthor(comment) => error::Message::new("not_author")
				.detail("comment", comment.to_string())
				.into_vec(),
			Self::Validation(errors) => error::validation_messages(&errors),
		}
	}
}
