use axum::extract::State;
use macros::route;

use crate::{
	extract::{Admin, Json, MaybeSession, Path, Query, Session},
	openapi::tag,
	store::Store,
};

use super::{model, Error, RouteError};

/// Get all users
/// Returns a page of every user, newest first. Only admins can list users.
#[route(tag = tag::USER)]
pub async fn get_users(
	State(store): State<Store>,
	Admin(session): Admin,
	Query(paginate): Query<model::PaginateUsers>,
) -> Result<Json<model::Page<model::User>>, RouteError> {
	let users = store
		.list_users(&session.actor(), paginate.page, paginate.size)
		.await
		.map_err(Error::from)?;

	Ok(Json(users))
}

/// Get user profile
/// Returns the public profile of a user, with their followers, who they follow and totals over their published posts.
#[route(tag = tag::USER)]
pub async fn get_user(
	State(store): State<Store>,
	Path(input): Path<model::IdInput>,
) -> Result<Json<model::ProfileOutput>, RouteError> {
	let profile = store.profile(input.id).await.map_err(Error::from)?;
	let stats = store.user_stats(input.id).await.map_err(Error::from)?;

	Ok(Json(model::ProfileOutput { profile, stats }))
}

/// Get user posts
/// Returns a page of posts written by a user, published only unless you are that user or an admin.
#[route(tag = tag::USER)]
pub async fn get_user_posts(
	State(store): State<Store>,
	session: MaybeSession,
	Path(input): Path<model::IdInput>,
	Query(query): Query<model::ListPostsQuery>,
) -> Result<Json<model::Page<model::PostView>>, RouteError> {
	store.get_user(input.id).await.map_err(Error::from)?;

	let mut filter = query.filter(model::StatusFilter::Published);
	filter.author_id = Some(input.id);

	let posts = store
		.list_posts(
			session.actor().as_ref(),
			&filter,
			query.sort(),
			query.page,
			query.size,
		)
		.await
		.map_err(Error::from)?;

	Ok(Json(posts))
}

/// Follow user
/// Follows a user, or unfollows them if you already do. You cannot follow yourself.
#[route(tag = tag::USER)]
pub async fn follow_user(
	State(store): State<Store>,
	session: Session,
	Path(input): Path<model::IdInput>,
) -> Result<Json<model::FollowOutput>, RouteError> {
	let membership = store
		.toggle_follow(session.user.id, input.id)
		.await
		.map_err(Error::from)?;

	Ok(Json(membership.into()))
}
