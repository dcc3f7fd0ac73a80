//! Outbound notifications for contact form submissions.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::validate_not_blank;

/// A message submitted through the contact form.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ContactMessage {
	#[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
	pub name: String,
	/// The address replies and the confirmation are sent to.
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
	pub subject: String,
	#[validate(length(min = 1, max = 5000), custom(function = "validate_not_blank"))]
	pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("notification transport unavailable: {0}")]
	Unavailable(String),
}

/// Delivers contact messages to the site owner and a confirmation to the sender.
#[axum::async_trait]
pub trait Notifier: Send + Sync {
	async fn send(&self, message: &ContactMessage) -> Result<(), Error>;
}

/// A [`Notifier`] that writes every notification to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[axum::async_trait]
impl Notifier for LogNotifier {
	async fn send(&self, message: &ContactMessage) -> Result<(), Error> {
		tracing::info!(
			from = %message.email,
			name = %message.name,
			subject = %message.subject,
			"contact form submission"
		);
		tracing::info!(to = %message.email, "sent contact confirmation");

		Ok(())
	}
}

/// Sends `message` in the background. Failures are logged and otherwise ignored.
pub fn dispatch(notifier: Arc<dyn Notifier>, message: ContactMessage) {
	tokio::spawn(async move {
		if let Err(error) = notifier.send(&message).await {
			tracing::warn!(%error, subject = %message.subject, "failed to send contact notification");
		}
	});
}
