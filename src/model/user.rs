use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validate_not_blank;

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
	if username
		.chars()
		.any(|c| !c.is_ascii_alphanumeric() && c != '_')
	{
		return Err(ValidationError::new("username must be alphanumeric"));
	}

	Ok(())
}

/// A single user.
///
/// Serialized with the email and admin flag, so only return it to the user
/// themselves or to an admin. Everywhere else, use [`Author`] or [`Profile`].
#[model(update)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
	pub username: String,
	/// The user's email address, used for logging in.
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
	pub full_name: String,
	/// A link to the user's avatar image.
	#[validate(length(max = 2048))]
	pub avatar: Option<String>,
	#[validate(length(max = 500))]
	pub bio: Option<String>,
	#[serde(skip_deserializing)]
	pub is_admin: bool,
	#[serde(skip_deserializing)]
	pub joined_at: DateTime<Utc>,
	/// Users following this user.
	#[serde(skip_deserializing)]
	pub followers: BTreeSet<Uuid>,
	/// Users this user follows.
	#[serde(skip_deserializing)]
	pub following: BTreeSet<Uuid>,
	/// The argon2 hash of the password, salted with `id`.
	#[serde(skip)]
	pub password: Vec<u8>,
}

impl User {
	pub fn author(&self) -> Author {
		Author {
			id: self.id,
			username: self.username.clone(),
			full_name: self.full_name.clone(),
			avatar: self.avatar.clone(),
		}
	}
}

/// The public-safe projection of a user, embedded in posts, comments and follower lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
	pub id: Uuid,
	pub username: String,
	pub full_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
}

/// A user's public profile.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id: Uuid,
	pub username: String,
	pub full_name: String,
	pub avatar: Option<String>,
	pub bio: Option<String>,
	pub joined_at: DateTime<Utc>,
	pub followers: Vec<Author>,
	pub following: Vec<Author>,
}

/// A login session, handed to the client as a cookie or bearer token.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	/// The session id.
	#[serde(rename = "token")]
	pub id: Uuid,
	pub user_id: Uuid,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	/// The username that is displayed to the public.
	#[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
	pub username: String,
	#[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
	pub full_name: String,
	#[validate(length(max = 2048))]
	pub avatar: Option<String>,
	#[validate(length(max = 500))]
	pub bio: Option<String>,
}
