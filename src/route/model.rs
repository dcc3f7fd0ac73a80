use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
pub(crate) fn one() -> usize {
	1
}

#[inline]
pub(crate) fn ten() -> usize {
	10
}

#[inline]
fn twenty() -> usize {
	20
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "one")]
	pub page: usize,
	/// The number of items to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten", alias = "limit")]
	pub size: usize,
}

/// Like [`Paginate`], with larger pages by default.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct PaginateUsers {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "one")]
	pub page: usize,
	/// The number of users to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "twenty", alias = "limit")]
	pub size: usize,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: Uuid,
}

/// The state of a like after toggling it.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutput {
	pub is_liked: bool,
	/// The number of likes after the toggle.
	pub likes: usize,
}

impl From<crate::model::Membership> for LikeOutput {
	fn from(membership: crate::model::Membership) -> Self {
		Self {
			is_liked: membership.is_member,
			likes: membership.count,
		}
	}
}
