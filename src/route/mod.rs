use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{
	openapi,
	ratelimit::{self, RateLimits},
	AppState,
};

pub mod auth;
pub mod comment;
pub mod contact;
pub mod docs;
pub mod model;
pub mod post;
pub mod stats;
pub mod user;

fn limited(
	router: ApiRouter<AppState>,
	config: Option<&Arc<ratelimit::Config>>,
) -> ApiRouter<AppState> {
	match config {
		Some(config) => router.layer(GovernorLayer {
			config: config.clone(),
		}),
		None => router,
	}
}

/// Builds the full API, documented at `/docs`.
pub fn app(state: AppState, limits: Option<RateLimits>) -> Router {
	let mut api = OpenApi::default();
	let strict = limits.as_ref().map(|limits| &limits.strict);

	let router = ApiRouter::new()
		.nest("/auth", limited(auth::routes(), strict))
		.nest("/posts", post::routes())
		.nest("/comments", comment::routes())
		.nest("/users", user::routes())
		.nest("/contact", limited(contact::routes(), strict))
		.nest("/stats", stats::routes())
		.nest("/docs", docs::routes());

	let router = limited(router, limits.as_ref().map(|limits| &limits.default))
		.finish_api_with(&mut api, openapi::docs);

	router
		.layer(Extension(Arc::new(api)))
		.layer(CompressionLayer::new())
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.layer(PropagateRequestIdLayer::x_request_id())
		.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
		.with_state(state)
}
