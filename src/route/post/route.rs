use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, MaybeSession, Path, Query, Session},
	openapi::tag,
	store::Store,
};

use super::{model, RouteError};

/// Get all posts
/// Returns a page of posts, newest first unless sorted otherwise.
/// Only published posts are listed unless a status is given, which requires being an admin or filtering by your own id.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(store): State<Store>,
	session: MaybeSession,
	Query(query): Query<model::ListPostsQuery>,
) -> Result<Json<model::Page<model::PostView>>, RouteError> {
	let filter = query.filter(model::StatusFilter::Published);
	let posts = store
		.list_posts(
			session.actor().as_ref(),
			&filter,
			query.sort(),
			query.page,
			query.size,
		)
		.await?;

	Ok(Json(posts))
}

/// Get own posts
/// Returns a page of your posts in every status, newest first unless sorted otherwise.
#[route(tag = tag::POST)]
pub async fn get_own_posts(
	State(store): State<Store>,
	session: Session,
	Query(query): Query<model::ListPostsQuery>,
) -> Result<Json<model::Page<model::PostView>>, RouteError> {
	let actor = session.actor();
	let mut filter = query.filter(model::StatusFilter::Any);
	filter.author_id = Some(actor.id);

	let posts = store
		.list_posts(Some(&actor), &filter, query.sort(), query.page, query.size)
		.await?;

	Ok(Json(posts))
}

/// Get category statistics
/// Returns the number of published posts in each category, most popular first.
#[route(tag = tag::POST)]
pub async fn get_category_stats(State(store): State<Store>) -> Json<Vec<model::CategoryCount>> {
	Json(store.category_stats().await)
}

/// Get single post
/// Returns a single post by its unique id, counting the request as a view.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(store): State<Store>,
	Path(input): Path<model::IdInput>,
) -> Result<Json<model::PostView>, RouteError> {
	Ok(Json(store.get_post(input.id).await?))
}

/// Create post
/// Creates a new post written by you. The slug and reading time are derived from the title and content.
#[route(tag = tag::POST, response(status = 201, description = "Created successfully.", shape = "Json<model::PostView>"))]
pub async fn create_post(
	State(store): State<Store>,
	session: Session,
	Json(input): Json<model::CreatePost>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = store.create_post(&session.actor(), input).await?;

	Ok((StatusCode::CREATED, Json(post)))
}

/// Update post
/// Updates the fields present in the body of a post you wrote. Admins can update any post.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
	Json(patch): Json<model::UpdatePost>,
) -> Result<Json<model::PostView>, RouteError> {
	let post = store.update_post(&session.actor(), input.id, patch).await?;

	Ok(Json(post))
}

/// Delete post
/// Deletes a post you wrote, along with every comment on it. Admins can delete any post.
#[route(tag = tag::POST, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_post(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	store.delete_post(&session.actor(), input.id).await?;

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Like post
/// Likes a post, or removes your like if it is already there.
#[route(tag = tag::POST)]
pub async fn like_post(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
) -> Result<Json<model::LikeOutput>, RouteError> {
	let membership = store.toggle_post_like(input.id, session.user.id).await?;

	Ok(Json(membership.into()))
}
