use aide::axum::{routing::post_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", post_with(send_message, send_message_docs))
}
