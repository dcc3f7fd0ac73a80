pub use crate::model::{RegisterUser, UpdateUser, User};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 128))]
	pub password: String,
}

/// A freshly created session, along with the user it belongs to.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutput {
	/// The session token, also set as the `session` cookie.
	/// Send it as `Authorization: Bearer <token>` when cookies are not an option.
	pub token: Uuid,
	pub user: User,
}
