pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentView, CreateComment};
pub use post::{
	Category, CategoryCount, CreatePost, Post, PostView, SortKey, SortOrder, Status, UpdatePost,
};
pub use user::{Author, Profile, RegisterUser, Session, UpdateUser, User};

use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::new("blank"));
	}

	Ok(())
}

/// The authenticated caller of a mutating operation.
///
/// Produced by the session extractor, trusted as-is by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
	pub id: Uuid,
	pub is_admin: bool,
}

impl Actor {
	/// Whether the actor may modify a record owned by `owner`.
	pub fn can_modify(&self, owner: Uuid) -> bool {
		self.is_admin || self.id == owner
	}
}

/// One page of a listing, with enough information to render a pager.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub items: Vec<T>,
	/// The total number of matching items across all pages.
	pub total: usize,
	pub total_pages: usize,
	/// The page number that was returned (1-indexed).
	pub page: usize,
}

impl<T> Page<T> {
	/// Slices one page out of an already filtered and sorted listing.
	pub fn slice(items: Vec<T>, page: usize, size: usize) -> Self {
		let total = items.len();
		let size = size.max(1);
		let page = page.max(1);

		let items = items
			.into_iter()
			.skip((page - 1).saturating_mul(size))
			.take(size)
			.collect();

		Self {
			items,
			total,
			total_pages: total.div_ceil(size),
			page,
		}
	}

	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			total_pages: self.total_pages,
			page: self.page,
		}
	}
}

/// The result of toggling a membership set (likes, followers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
	pub is_member: bool,
	pub count: usize,
}
