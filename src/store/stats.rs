//! Read-only rollups, recomputed from a full scan on every call.

use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

use super::{user, Store};
use crate::model::Status;

/// Totals over a single user's published posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
	pub posts_count: usize,
	pub total_likes: usize,
	pub total_views: u64,
	pub followers_count: usize,
	pub following_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
	pub total_posts: usize,
	pub published_count: usize,
	pub draft_count: usize,
	pub archived_count: usize,
	pub total_users: usize,
	pub total_comments: usize,
	pub total_likes: usize,
	pub total_views: u64,
	pub avg_likes_per_post: f64,
	pub avg_views_per_post: f64,
}

impl Store {
	pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats, user::Error> {
		let tables = self.tables.read().await;
		let user = tables
			.users
			.get(&user_id)
			.ok_or(user::Error::UnknownUser(user_id))?;

		let mut stats = UserStats {
			followers_count: user.followers.len(),
			following_count: user.following.len(),
			..UserStats::default()
		};

		let published = tables
			.posts
			.values()
			.filter(|post| post.author_id == user_id && post.status == Status::Published);

		for post in published {
			stats.posts_count += 1;
			stats.total_likes += post.likes.len();
			stats.total_views += post.views;
		}

		Ok(stats)
	}

	pub async fn platform_stats(&self) -> PlatformStats {
		let tables = self.tables.read().await;
		let mut stats = PlatformStats {
			total_posts: tables.posts.len(),
			total_users: tables.users.len(),
			total_comments: tables.comments.len(),
			..PlatformStats::default()
		};

		for post in tables.posts.values() {
			match post.status {
				Status::Draft => stats.draft_count += 1,
				Status::Published => stats.published_count += 1,
				Status::Archived => stats.archived_count += 1,
			}

			stats.total_likes += post.likes.len();
			stats.total_views += post.views;
		}

		if stats.total_posts > 0 {
			let posts = stats.total_posts as f64;

			stats.avg_likes_per_post = stats.total_likes as f64 / posts;
			stats.avg_views_per_post = stats.total_views as f64 / posts;
		}

		stats
	}
}
