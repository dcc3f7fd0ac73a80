pub use crate::{
	model::{
		Category, CategoryCount, CreatePost, Page, PostView, SortKey, SortOrder, Status, UpdatePost,
	},
	route::model::{IdInput, LikeOutput},
};

use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
	route::model::{one, ten},
	store::post::{PostFilter, PostSort},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
	Draft,
	Published,
	Archived,
	/// Every status at once.
	Any,
}

impl From<StatusFilter> for Option<Status> {
	fn from(filter: StatusFilter) -> Self {
		match filter {
			StatusFilter::Draft => Some(Status::Draft),
			StatusFilter::Published => Some(Status::Published),
			StatusFilter::Archived => Some(Status::Archived),
			StatusFilter::Any => None,
		}
	}
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ListPostsQuery {
	/// The page number to return (1-indexed).
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "one")]
	pub page: usize,
	/// The number of posts to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten", alias = "limit")]
	pub size: usize,
	/// Only published posts are listed unless this says otherwise.
	/// Other statuses are limited to admins and to authors listing their own posts.
	pub status: Option<StatusFilter>,
	pub category: Option<Category>,
	/// Only list posts written by this user.
	pub author: Option<Uuid>,
	/// Matches the title, the content or any tag, ignoring case.
	#[validate(length(max = 200))]
	pub search: Option<String>,
	#[serde(default)]
	pub sort: SortKey,
	#[serde(default)]
	pub order: SortOrder,
}

impl ListPostsQuery {
	/// The filter to list with, using `default_status` when no status was asked for.
	pub fn filter(&self, default_status: StatusFilter) -> PostFilter {
		PostFilter {
			status: self.status.unwrap_or(default_status).into(),
			category: self.category,
			author_id: self.author,
			search: self.search.clone(),
		}
	}

	pub fn sort(&self) -> PostSort {
		PostSort {
			key: self.sort,
			order: self.order,
		}
	}
}
