use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{
	error,
	store::{post, user},
	AppState,
};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Directory(#[from] user::Error),
	#[error(transparent)]
	Content(#[from] post::Error),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/", get_with(get_users, get_users_docs))
		.api_route("/:id", get_with(get_user, get_user_docs))
		.api_route("/:id/posts", get_with(get_user_posts, get_user_posts_docs))
		.api_route("/:id/follow", post_with(follow_user, follow_user_docs))
}

/// The messages for an error from the user directory, shared with the auth routes.
pub(crate) fn directory_errors(error: user::Error) -> Vec<error::Message<'static>> {
	match error {
		user::Error::UnknownUser(user) => error::Message::new("unknown_user")
			.detail("user", user.to_string())
			.into_vec(),
		user::Error::UsernameTaken => error::Message::new("username_taken")
			.field("username")
			.into_vec(),
		user::Error::EmailTaken => error::Message::new("email_taken")
			.field("email")
			.into_vec(),
		user::Error::SelfFollow => error::Message::new("self_follow").into_vec(),
		user::Error::AdminRequired => error::Message::new("admin_required").into_vec(),
		user::Error::Validation(errors) => error::validation_messages(&errors),
	}
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::Directory(error) => error::status(error.kind()),
			Self::Content(error) => error::status(error.kind()),
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::Directory(error) => directory_errors(error),
			Self::Content(error) => error::ErrorShape::into_errors(error),
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::test::*;

	#[tokio::test]
	async fn test_follow_toggle() {
		let app = server(state());
		let john = register(&app, "john").await;
		let jane = register(&app, "jane").await;

		let (name, value) = bearer(&john.token);
		let response = app
			.post(&format!("/users/{}/follow", jane.id))
			.add_header(name.clone(), value.clone())
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(
			response.json::<Value>(),
			json!({ "isFollowing": true, "followersCount": 1 })
		);

		let response = app.get(&format!("/users/{}", jane.id)).await;
		let profile = response.json::<Value>();

		assert_eq!(profile["followers"][0]["username"], "john");
		assert_eq!(profile["stats"]["followersCount"], 1);

		let response = app.get(&format!("/users/{}", john.id)).await;

		assert_eq!(response.json::<Value>()["following"][0]["username"], "jane");

		let response = app
			.post(&format!("/users/{}/follow", jane.id))
			.add_header(name, value)
			.await;

		assert_eq!(
			response.json::<Value>(),
			json!({ "isFollowing": false, "followersCount": 0 })
		);
	}

	#[tokio::test]
	async fn test_follow_errors() {
		let app = server(state());
		let john = register(&app, "john").await;

		let (name, value) = bearer(&john.token);
		let response = app
			.post(&format!("/users/{}/follow", john.id))
			.add_header(name.clone(), value.clone())
			.await;

		assert_eq!(response.status_code(), 400);
		assert_eq!(response.json::<Value>()["errors"][0]["content"], "self_follow");

		let response = app
			.post(&format!("/users/{}/follow", Uuid::new_v4()))
			.add_header(name, value)
			.await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<Value>()["errors"][0]["content"], "unknown_user");
	}

	#[tokio::test]
	async fn test_profile_stats() {
		let app = server(state());
		let john = register(&app, "john").await;
		let jane = register(&app, "jane").await;

		let published = create_post(
			&app,
			&john,
			json!({ "title": "Out", "content": "Body", "category": "Travel", "status": "published" }),
		)
		.await;
		create_post(
			&app,
			&john,
			json!({ "title": "Not yet", "content": "Body", "category": "Travel" }),
		)
		.await;

		let (name, value) = bearer(&jane.token);
		app.post(&format!("/posts/{published}/like"))
			.add_header(name, value)
			.await;
		app.get(&format!("/posts/{published}")).await;

		let response = app.get(&format!("/users/{}", john.id)).await;

		assert_eq!(response.status_code(), 200);

		let profile = response.json::<Value>();

		assert_eq!(profile["username"], "john");
		assert!(profile.get("email").is_none());
		assert_eq!(
			profile["stats"],
			json!({
				"postsCount": 1,
				"totalLikes": 1,
				"totalViews": 1,
				"followersCount": 0,
				"followingCount": 0,
			})
		);
	}

	#[tokio::test]
	async fn test_user_posts() {
		let app = server(state());
		let john = register(&app, "john").await;
		let jane = register(&app, "jane").await;

		create_post(
			&app,
			&john,
			json!({ "title": "Out", "content": "Body", "category": "Travel", "status": "published" }),
		)
		.await;
		create_post(
			&app,
			&john,
			json!({ "title": "Not yet", "content": "Body", "category": "Travel" }),
		)
		.await;

		let response = app.get(&format!("/users/{}/posts", john.id)).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["total"], 1);

		let (name, value) = bearer(&jane.token);
		let response = app
			.get(&format!("/users/{}/posts?status=any", john.id))
			.add_header(name, value)
			.await;

		assert_eq!(response.status_code(), 403);

		let (name, value) = bearer(&john.token);
		let response = app
			.get(&format!("/users/{}/posts?status=any", john.id))
			.add_header(name, value)
			.await;

		assert_eq!(response.json::<Value>()["total"], 2);

		let response = app.get(&format!("/users/{}/posts", Uuid::new_v4())).await;

		assert_eq!(response.status_code(), 404);
	}

	#[tokio::test]
	async fn test_list_users_requires_admin() {
		let state = state();
		let app = server(state.clone());
		let john = register(&app, "john").await;
		let admin = register_admin(&app, &state, "admin").await;

		let (name, value) = bearer(&john.token);
		let response = app.get("/users").add_header(name, value).await;

		assert_eq!(response.status_code(), 403);
		assert_eq!(response.json::<Value>()["errors"][0]["content"], "admin_required");

		let (name, value) = bearer(&admin.token);
		let response = app.get("/users?limit=1").add_header(name, value).await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<Value>();

		assert_eq!(body["total"], 2);
		assert_eq!(body["totalPages"], 2);
		assert_eq!(body["items"].as_array().unwrap().len(), 1);
	}
}
