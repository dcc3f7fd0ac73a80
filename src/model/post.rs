use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Author;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, JsonSchema,
)]
pub enum Category {
	Technology,
	Programming,
	Design,
	Business,
	Marketing,
	Health,
	Lifestyle,
	Travel,
	Food,
	Education,
	Science,
	Other,
}

#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	#[default]
	Draft,
	Published,
	Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
	#[default]
	CreatedAt,
	#[serde(alias = "likesCount")]
	Likes,
	Views,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}

/// A single post, written by a user.
#[model]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that wrote the post.
	#[serde(skip_deserializing)]
	pub author_id: Uuid,
	#[validate(length(min = 1, max = 200))]
	pub title: String,
	/// The rich text content of the post.
	#[validate(length(min = 1))]
	pub content: String,
	/// A short summary shown in post listings.
	#[validate(length(max = 500))]
	pub excerpt: Option<String>,
	pub category: Category,
	#[serde(default)]
	pub tags: Vec<String>,
	/// A link to the cover image of the post.
	#[validate(length(max = 2048))]
	pub cover_image: Option<String>,
	#[serde(default)]
	pub status: Status,
	/// Users that liked the post.
	#[serde(skip_deserializing)]
	pub likes: BTreeSet<Uuid>,
	#[serde(skip_deserializing)]
	pub views: u64,
	/// The estimated reading time, in minutes.
	#[serde(skip_deserializing)]
	pub read_time: u32,
	#[serde(skip_deserializing)]
	pub slug: String,
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
	#[serde(skip_deserializing)]
	pub updated_at: DateTime<Utc>,
	/// Insertion order, used to break ties when sorting.
	#[serde(skip)]
	pub sequence: u64,
}

/// A post together with the projection of its author.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
	#[serde(flatten)]
	pub post: Post,
	pub likes_count: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CategoryCount {
	pub category: Category,
	pub count: usize,
}

/// Lowercases the title and collapses every run of non-alphanumeric characters into one hyphen.
pub fn slugify(title: &str) -> String {
	let mut slug = String::with_capacity(title.len());

	for c in title.chars() {
		if c.is_ascii_alphanumeric() {
			slug.push(c.to_ascii_lowercase());
		} else if !slug.is_empty() && !slug.ends_with('-') {
			slug.push('-');
		}
	}

	while slug.ends_with('-') {
		slug.pop();
	}

	slug
}

/// Reading time in minutes at 200 words per minute, never less than one.
pub fn read_time(content: &str) -> u32 {
	const WORDS_PER_MINUTE: usize = 200;

	let words = content.split_whitespace().count();
	let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);

	u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Trims tags and drops empty ones and duplicates, keeping the first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
	let mut seen = BTreeSet::new();

	tags.into_iter()
		.map(|tag| tag.trim().to_owned())
		.filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
		.collect()
}
