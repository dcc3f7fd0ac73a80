use axum::extract::State;
use macros::route;

use crate::{
	extract::{Admin, Json},
	openapi::tag,
	store::{stats::PlatformStats, Store},
};

/// Get platform statistics
/// Returns totals over every post, user and comment on the platform. Only admins can see these.
#[route(tag = tag::STATS)]
pub async fn get_stats(State(store): State<Store>, _admin: Admin) -> Json<PlatformStats> {
	Json(store.platform_stats().await)
}
