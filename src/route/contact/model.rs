pub use crate::notify::ContactMessage;

use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Serialize, JsonSchema)]
pub struct ContactOutput {
	/// A confirmation to show to the sender.
	pub message: String,
}
