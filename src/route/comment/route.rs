use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Session},
	openapi::tag,
	store::Store,
};

use super::{model, RouteError};

/// Get post comments
/// Returns the top-level comments on a post, newest first, each with its direct replies.
#[route(tag = tag::COMMENT)]
pub async fn get_post_comments(
	State(store): State<Store>,
	Path(input): Path<model::IdInput>,
) -> Result<Json<Vec<model::CommentView>>, RouteError> {
	Ok(Json(store.list_top_level_comments(input.id).await?))
}

/// Create comment
/// Comments on a post, or replies to a comment when `parentCommentId` is set.
#[route(tag = tag::COMMENT, response(status = 201, description = "Created successfully.", shape = "Json<model::CommentView>"))]
pub async fn create_comment(
	State(store): State<Store>,
	session: Session,
	Json(input): Json<model::CreateComment>,
) -> Result<impl IntoApiResponse, RouteError> {
	let comment = store.create_comment(&session.actor(), input).await?;

	Ok((StatusCode::CREATED, Json(comment)))
}

/// Like comment
/// Likes a comment, or removes your like if it is already there.
#[route(tag = tag::COMMENT)]
pub async fn like_comment(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
) -> Result<Json<model::LikeOutput>, RouteError> {
	let membership = store.toggle_comment_like(input.id, session.user.id).await?;

	Ok(Json(membership.into()))
}

/// Delete comment
/// Deletes a comment you wrote along with its replies. Admins can delete any comment.
#[route(tag = tag::COMMENT, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_comment(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	store.delete_comment(&session.actor(), input.id).await?;

	Ok(StatusCode::NO_CONTENT.into_response())
}
