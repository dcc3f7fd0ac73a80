use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", get_with(get_stats, get_stats_docs))
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[tokio::test]
	async fn test_stats_requires_admin() {
		let app = server(state());
		let john = register(&app, "john").await;

		let response = app.get("/stats").await;

		assert_eq!(response.status_code(), 401);

		let (name, value) = bearer(&john.token);
		let response = app.get("/stats").add_header(name, value).await;

		assert_eq!(response.status_code(), 403);
	}

	#[tokio::test]
	async fn test_platform_stats() {
		let state = state();
		let app = server(state.clone());
		let john = register(&app, "john").await;
		let admin = register_admin(&app, &state, "admin").await;

		let post = create_post(
			&app,
			&john,
			json!({ "title": "One", "content": "Body", "category": "Food", "status": "published" }),
		)
		.await;
		create_post(
			&app,
			&john,
			json!({ "title": "Two", "content": "Body", "category": "Food" }),
		)
		.await;

		app.get(&format!("/posts/{post}")).await;
		app.get(&format!("/posts/{post}")).await;

		let (name, value) = bearer(&admin.token);
		app.post(&format!("/posts/{post}/like"))
			.add_header(name.clone(), value.clone())
			.await;

		let response = app.get("/stats").add_header(name, value).await;

		assert_eq!(response.status_code(), 200);

		let stats = response.json::<Value>();

		assert_eq!(stats["totalPosts"], 2);
		assert_eq!(stats["publishedCount"], 1);
		assert_eq!(stats["draftCount"], 1);
		assert_eq!(stats["archivedCount"], 0);
		assert_eq!(stats["totalUsers"], 2);
		assert_eq!(stats["totalLikes"], 1);
		assert_eq!(stats["totalViews"], 2);
		assert_eq!(stats["avgLikesPerPost"], 0.5);
		assert_eq!(stats["avgViewsPerPost"], 1.0);
	}
}
