use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Author;

/// A comment on a post, or a reply to another comment on the same post.
#[model(create)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The post the comment belongs to.
	pub post_id: Uuid,
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	#[validate(length(min = 1, max = 2000))]
	pub content: String,
	/// The comment this one replies to, if any.
	#[serde(default)]
	pub parent_comment_id: Option<Uuid>,
	/// Replies to this comment, oldest first.
	#[serde(skip_deserializing)]
	pub replies: Vec<Uuid>,
	#[serde(skip_deserializing)]
	pub likes: BTreeSet<Uuid>,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	/// Insertion order, used to break ties when sorting.
	#[serde(skip)]
	pub sequence: u64,
}

/// A comment with its author, and its replies resolved one level deep.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
	pub id: Uuid,
	pub post_id: Uuid,
	pub content: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author: Option<Author>,
	pub parent_comment_id: Option<Uuid>,
	pub likes: BTreeSet<Uuid>,
	pub likes_count: usize,
	pub created_at: DateTime<Utc>,
	pub replies: Vec<CommentView>,
}
