use axum::extract::State;
use macros::route;

use crate::{extract::Json, notify, openapi::tag, AppState};

use super::model;

/// Send contact message
/// Sends a message to the site owner and a confirmation to the sender. Delivery happens in the background and never fails the request.
#[route(tag = tag::CONTACT)]
pub async fn send_message(
	State(state): State<AppState>,
	Json(message): Json<model::ContactMessage>,
) -> Json<model::ContactOutput> {
	notify::dispatch(state.notifier.clone(), message);

	Json(model::ContactOutput {
		message: "Thanks for reaching out, we will get back to you soon.".into(),
	})
}
