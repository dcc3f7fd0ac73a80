use std::sync::Arc;

use aide::{
	axum::{
		routing::{get, get_with},
		ApiRouter, IntoApiResponse,
	},
	openapi::OpenApi,
	scalar::Scalar,
};
use axum::{response::IntoResponse, Extension};

use crate::AppState;

pub const SPEC_PATH: &str = "/docs/api.json";

/// The interactive documentation page and the OpenAPI document it renders.
pub fn routes() -> ApiRouter<AppState> {
	let page = Scalar::new(SPEC_PATH)
		.with_title("BlogHub API")
		.axum_handler();

	ApiRouter::new()
		.api_route(
			"/",
			get_with(page, |op| {
				op.summary("Documentation")
					.description("An interactive page rendering the OpenAPI document.")
			}),
		)
		.route("/api.json", get(serve_api))
}

/// Serves the document built by [`super::app`].
async fn serve_api(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	axum::Json(&*api).into_response()
}
