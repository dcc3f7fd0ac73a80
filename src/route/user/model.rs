pub use crate::{
	model::{Page, PostView, Profile, User},
	route::{
		model::{IdInput, PaginateUsers},
		post::model::{ListPostsQuery, StatusFilter},
	},
	store::stats::UserStats,
};

use schemars::JsonSchema;
use serde::Serialize;

use crate::model::Membership;

/// A public profile together with the user's totals.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOutput {
	#[serde(flatten)]
	pub profile: Profile,
	pub stats: UserStats,
}

/// The state of a follow after toggling it.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowOutput {
	pub is_following: bool,
	/// The followed user's follower count after the toggle.
	pub followers_count: usize,
}

impl From<Membership> for FollowOutput {
	fn from(membership: Membership) -> Self {
		Self {
			is_following: membership.is_member,
			followers_count: membership.count,
		}
	}
}
