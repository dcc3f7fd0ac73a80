//! The content store: posts, their derived fields, views and likes.

use chrono::Utc;
use uuid::Uuid;
use validator::ValidationErrors;

use super::{patch_optional, social, validate_with_blanks, ErrorKind, Store, Tables};
use crate::model::{
	self,
	post::{normalize_tags, read_time, slugify},
	Actor, Category, CategoryCount, Membership, Page, SortKey, SortOrder, Status,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("not allowed to modify post {0}")]
	NotAuthor(Uuid),
	#[error("not allowed to list posts with this status")]
	HiddenStatus,
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnknownPost(..) => ErrorKind::NotFound,
			Self::NotAuthor(..) | Self::HiddenStatus => ErrorKind::Authorization,
			Self::Validation(..) => ErrorKind::Validation,
		}
	}
}

/// Which posts a listing includes. `status: None` matches every status.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
	pub status: Option<Status>,
	pub category: Option<Category>,
	pub author_id: Option<Uuid>,
	/// Case-insensitive substring of the title, the content or any tag.
	pub search: Option<String>,
}

impl PostFilter {
	pub fn published() -> Self {
		Self {
			status: Some(Status::Published),
			..Self::default()
		}
	}

	/// Anyone can list published posts. Other statuses are limited to admins
	/// and to authors listing their own posts.
	pub fn check_visible_to(&self, viewer: Option<&Actor>) -> Result<(), Error> {
		if self.status == Some(Status::Published) {
			return Ok(());
		}

		match viewer {
			Some(actor) if actor.is_admin || self.author_id == Some(actor.id) => Ok(()),
			_ => Err(Error::HiddenStatus),
		}
	}

	fn matches(&self, post: &model::Post, needle: Option<&str>) -> bool {
		if self.status.is_some_and(|status| status != post.status)
			|| self.category.is_some_and(|category| category != post.category)
			|| self.author_id.is_some_and(|author| author != post.author_id)
		{
			return false;
		}

		let Some(needle) = needle else {
			return true;
		};

		post.title.to_lowercase().contains(needle)
			|| post.content.to_lowercase().contains(needle)
			|| post
				.tags
				.iter()
				.any(|tag| tag.to_lowercase().contains(needle))
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostSort {
	pub key: SortKey,
	pub order: SortOrder,
}

fn slug(title: &str, token: i64) -> String {
	let base = slugify(title);

	if base.is_empty() {
		token.to_string()
	} else {
		format!("{base}-{token}")
	}
}

impl Tables {
	pub(crate) fn post_view(&self, post: model::Post) -> model::PostView {
		model::PostView {
			likes_count: post.likes.len(),
			author: self.author(post.author_id),
			post,
		}
	}

	fn authorize_post(&self, actor: &Actor, post_id: Uuid) -> Result<(), Error> {
		let post = self.posts.get(&post_id).ok_or(Error::UnknownPost(post_id))?;

		if actor.can_modify(post.author_id) {
			Ok(())
		} else {
			Err(Error::NotAuthor(post_id))
		}
	}
}

impl Store {
	/// Creates a post owned by `actor`, deriving its slug and read time.
	#[tracing::instrument(skip(self, input), fields(title = %input.title))]
	pub async fn create_post(
		&self,
		actor: &Actor,
		input: model::CreatePost,
	) -> Result<model::PostView, Error> {
		validate_with_blanks(
			&input,
			&[
				("title", Some(&input.title)),
				("content", Some(&input.content)),
			],
		)?;

		let mut tables = self.tables.write().await;
		let now = Utc::now();
		let title = input.title.trim().to_owned();

		let post = model::Post {
			id: Uuid::new_v4(),
			author_id: actor.id,
			slug: slug(&title, tables.next_slug_token()),
			read_time: read_time(&input.content),
			title,
			content: input.content,
			excerpt: input.excerpt,
			category: input.category,
			tags: normalize_tags(input.tags),
			cover_image: input.cover_image,
			status: input.status,
			likes: Default::default(),
			views: 0,
			created_at: now,
			updated_at: now,
			sequence: tables.next_sequence(),
		};

		tables.posts.insert(post.id, post.clone());
		tracing::info!(post = %post.id, slug = %post.slug, "created post");

		Ok(tables.post_view(post))
	}

	/// Applies the fields present in `patch`.
	///
	/// The slug is regenerated only when the title actually changes, the read time
	/// only when the patch carries content. An empty excerpt or cover image clears it.
	#[tracing::instrument(skip(self, patch))]
	pub async fn update_post(
		&self,
		actor: &Actor,
		post_id: Uuid,
		patch: model::UpdatePost,
	) -> Result<model::PostView, Error> {
		validate_with_blanks(
			&patch,
			&[
				("title", patch.title.as_deref()),
				("content", patch.content.as_deref()),
			],
		)?;

		let mut tables = self.tables.write().await;
		tables.authorize_post(actor, post_id)?;

		let title = patch
			.title
			.as_deref()
			.map(str::trim)
			.filter(|title| {
				tables
					.posts
					.get(&post_id)
					.is_some_and(|post| post.title != *title)
			})
			.map(str::to_owned);
		let renamed = title.map(|title| (slug(&title, tables.next_slug_token()), title));

		let post = tables
			.posts
			.get_mut(&post_id)
			.ok_or(Error::UnknownPost(post_id))?;

		if let Some((slug, title)) = renamed {
			post.slug = slug;
			post.title = title;
		}

		if let Some(content) = patch.content {
			post.read_time = read_time(&content);
			post.content = content;
		}

		patch_optional(&mut post.excerpt, patch.excerpt);

		if let Some(category) = patch.category {
			post.category = category;
		}

		if let Some(tags) = patch.tags {
			post.tags = normalize_tags(tags);
		}

		patch_optional(&mut post.cover_image, patch.cover_image);

		if let Some(status) = patch.status {
			post.status = status;
		}

		post.updated_at = Utc::now();

		let post = post.clone();
		Ok(tables.post_view(post))
	}

	/// Returns a single post, counting the read as a view.
	///
	/// Every successful read counts, including the author's own.
	pub async fn get_post(&self, post_id: Uuid) -> Result<model::PostView, Error> {
		let mut tables = self.tables.write().await;
		let post = tables
			.posts
			.get_mut(&post_id)
			.ok_or(Error::UnknownPost(post_id))?;

		post.views = post.views.saturating_add(1);

		let post = post.clone();
		Ok(tables.post_view(post))
	}

	/// Overwrites the view counter, for loading fixtures.
	pub(crate) async fn set_views(&self, post_id: Uuid, views: u64) -> Result<(), Error> {
		let mut tables = self.tables.write().await;
		let post = tables
			.posts
			.get_mut(&post_id)
			.ok_or(Error::UnknownPost(post_id))?;

		post.views = views;
		Ok(())
	}

	/// Filters, sorts and paginates posts.
	///
	/// Visibility of non-published statuses is checked against `viewer`.
	pub async fn list_posts(
		&self,
		viewer: Option<&Actor>,
		filter: &PostFilter,
		sort: PostSort,
		page: usize,
		size: usize,
	) -> Result<Page<model::PostView>, Error> {
		filter.check_visible_to(viewer)?;

		let needle = filter
			.search
			.as_deref()
			.map(str::trim)
			.filter(|search| !search.is_empty())
			.map(str::to_lowercase);

		let tables = self.tables.read().await;
		let mut posts = tables
			.posts
			.values()
			.filter(|post| filter.matches(post, needle.as_deref()))
			.collect::<Vec<_>>();

		posts.sort_by(|a, b| {
			let ordering = match sort.key {
				SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
				SortKey::Likes => a.likes.len().cmp(&b.likes.len()),
				SortKey::Views => a.views.cmp(&b.views),
			}
			.then(a.sequence.cmp(&b.sequence));

			match sort.order {
				SortOrder::Asc => ordering,
				SortOrder::Desc => ordering.reverse(),
			}
		});

		let page = Page::slice(posts, page, size);

		Ok(page.map(|post| tables.post_view(post.clone())))
	}

	/// Deletes a post and, before returning, every comment on it.
	#[tracing::instrument(skip(self))]
	pub async fn delete_post(&self, actor: &Actor, post_id: Uuid) -> Result<(), Error> {
		let mut tables = self.tables.write().await;
		tables.authorize_post(actor, post_id)?;

		tables.posts.remove(&post_id);
		let comments = tables.delete_all_for_post(post_id);

		tracing::info!(post = %post_id, comments, "deleted post");

		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn toggle_post_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Membership, Error> {
		let mut tables = self.tables.write().await;
		let post = tables
			.posts
			.get_mut(&post_id)
			.ok_or(Error::UnknownPost(post_id))?;

		let membership = social::toggle_membership(&mut post.likes, user_id);
		tracing::debug!(liked = membership.is_member, "toggled post like");

		Ok(membership)
	}

	/// Counts published posts per category, most popular first.
	pub async fn category_stats(&self) -> Vec<CategoryCount> {
		let tables = self.tables.read().await;
		let mut counts = std::collections::BTreeMap::<Category, usize>::new();

		for post in tables.posts.values() {
			if post.status == Status::Published {
				*counts.entry(post.category).or_default() += 1;
			}
		}

		let mut counts = counts
			.into_iter()
			.map(|(category, count)| CategoryCount { category, count })
			.collect::<Vec<_>>();

		// Stable, so equal counts stay in category order
		counts.sort_by(|a, b| b.count.cmp(&a.count));
		counts
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::{Error, PostFilter, PostSort};
	use crate::{
		model::{self, Category, CategoryCount, SortKey, SortOrder, Status},
		store::{test, ErrorKind, Store},
	};

	fn patch() -> model::UpdatePost {
		model::UpdatePost {
			title: None,
			content: None,
			excerpt: None,
			category: None,
			tags: None,
			cover_image: None,
			status: None,
		}
	}

	#[tokio::test]
	async fn test_create_post_derives_fields() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let mut input = test::create_post("Hello, World!  Foo", Category::Technology, Status::Draft);
		input.content = vec!["word"; 400].join(" ");
		input.tags = vec!["rust".into(), " rust ".into(), "web".into()];

		let view = store.create_post(&john, input).await.unwrap();
		let post = view.post;

		assert!(post.slug.starts_with("hello-world-foo-"));
		assert_eq!(post.read_time, 2);
		assert_eq!(post.views, 0);
		assert!(post.likes.is_empty());
		assert_eq!(post.status, Status::Draft);
		assert_eq!(post.author_id, john.id);
		assert_eq!(post.tags, vec!["rust", "web"]);
		assert_eq!(view.author.unwrap().username, "john");
	}

	#[tokio::test]
	async fn test_identical_titles_get_distinct_slugs() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let first = store
			.create_post(&john, test::create_post("Same", Category::Food, Status::Published))
			.await
			.unwrap();
		let second = store
			.create_post(&john, test::create_post("Same", Category::Food, Status::Published))
			.await
			.unwrap();

		assert_ne!(first.post.slug, second.post.slug);
		assert!(second.post.slug.starts_with("same-"));
	}

	#[tokio::test]
	async fn test_create_post_rejects_invalid_input() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let mut input = test::create_post("   ", Category::Other, Status::Draft);
		input.excerpt = Some("x".repeat(501));

		let error = store.create_post(&john, input).await.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Validation);

		let Error::Validation(errors) = error else {
			panic!("expected a validation error");
		};

		let fields = errors.field_errors();
		assert!(fields.contains_key("title"));
		assert!(fields.contains_key("excerpt"));

		let input = test::create_post(&"x".repeat(201), Category::Other, Status::Draft);
		let error = store.create_post(&john, input).await.unwrap_err();

		assert_eq!(error.kind(), ErrorKind::Validation);
	}

	#[tokio::test]
	async fn test_update_post_rederives_only_touched_fields() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let post = store
			.create_post(&john, test::create_post("Original", Category::Design, Status::Draft))
			.await
			.unwrap()
			.post;

		let updated = store
			.update_post(
				&john,
				post.id,
				model::UpdatePost {
					status: Some(Status::Published),
					excerpt: Some("A summary".into()),
					..patch()
				},
			)
			.await
			.unwrap()
			.post;

		assert_eq!(updated.slug, post.slug);
		assert_eq!(updated.read_time, post.read_time);
		assert_eq!(updated.status, Status::Published);
		assert_eq!(updated.excerpt.as_deref(), Some("A summary"));
		assert!(updated.updated_at >= post.updated_at);

		let updated = store
			.update_post(
				&john,
				post.id,
				model::UpdatePost {
					title: Some("Renamed post".into()),
					content: Some(vec!["word"; 201].join(" ")),
					..patch()
				},
			)
			.await
			.unwrap()
			.post;

		assert_ne!(updated.slug, post.slug);
		assert!(updated.slug.starts_with("renamed-post-"));
		assert_eq!(updated.read_time, 2);
		assert_eq!(updated.title, "Renamed post");
	}

	#[tokio::test]
	async fn test_update_post_keeps_slug_for_unchanged_title() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let post = store
			.create_post(&john, test::create_post("Stable Title", Category::Travel, Status::Published))
			.await
			.unwrap()
			.post;

		let updated = store
			.update_post(
				&john,
				post.id,
				model::UpdatePost {
					title: Some(" Stable Title ".into()),
					content: Some("A new body".into()),
					..patch()
				},
			)
			.await
			.unwrap()
			.post;

		assert_eq!(updated.slug, post.slug);
		assert_eq!(updated.title, "Stable Title");
		assert_eq!(updated.content, "A new body");
	}

	#[tokio::test]
	async fn test_update_post_clears_optional_fields() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let mut input = test::create_post("Covered", Category::Design, Status::Draft);
		input.excerpt = Some("A summary".into());
		input.cover_image = Some("https://example.com/cover.png".into());

		let post = store.create_post(&john, input).await.unwrap().post;

		let updated = store
			.update_post(
				&john,
				post.id,
				model::UpdatePost {
					excerpt: Some(String::new()),
					..patch()
				},
			)
			.await
			.unwrap()
			.post;

		assert_eq!(updated.excerpt, None);
		assert_eq!(updated.cover_image.as_deref(), Some("https://example.com/cover.png"));

		let updated = store
			.update_post(
				&john,
				post.id,
				model::UpdatePost {
					cover_image: Some("  ".into()),
					..patch()
				},
			)
			.await
			.unwrap()
			.post;

		assert_eq!(updated.cover_image, None);
	}

	#[tokio::test]
	async fn test_update_post_authorization() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;
		let admin = test::admin(&store, "admin").await;

		let post = store
			.create_post(&john, test::create_post("Mine", Category::Design, Status::Draft))
			.await
			.unwrap()
			.post;

		let error = store.update_post(&jane, post.id, patch()).await.unwrap_err();
		assert!(matches!(error, Error::NotAuthor(id) if id == post.id));
		assert_eq!(error.kind(), ErrorKind::Authorization);

		store.update_post(&admin, post.id, patch()).await.unwrap();

		let error = store
			.update_post(&john, Uuid::new_v4(), patch())
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::NotFound);
	}

	#[tokio::test]
	async fn test_get_post_counts_every_view() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let post = store
			.create_post(&john, test::create_post("Viewed", Category::Travel, Status::Published))
			.await
			.unwrap()
			.post;

		for _ in 0..3 {
			store.get_post(post.id).await.unwrap();
		}

		let listed = store
			.list_posts(None, &PostFilter::published(), PostSort::default(), 1, 10)
			.await
			.unwrap();

		assert_eq!(listed.items[0].post.views, 3);
		assert_eq!(store.get_post(post.id).await.unwrap().post.views, 4);

		let error = store.get_post(Uuid::new_v4()).await.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::NotFound);
	}

	#[tokio::test]
	async fn test_like_toggle_returns_to_original_state() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;

		let post = store
			.create_post(&john, test::create_post("Liked", Category::Health, Status::Published))
			.await
			.unwrap()
			.post;

		store.toggle_post_like(post.id, john.id).await.unwrap();

		let liked = store.toggle_post_like(post.id, jane.id).await.unwrap();
		assert!(liked.is_member);
		assert_eq!(liked.count, 2);

		let unliked = store.toggle_post_like(post.id, jane.id).await.unwrap();
		assert!(!unliked.is_member);
		assert_eq!(unliked.count, 1);
	}

	#[tokio::test]
	async fn test_concurrent_likes_do_not_lose_updates() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		let post = store
			.create_post(&john, test::create_post("Popular", Category::Health, Status::Published))
			.await
			.unwrap()
			.post;

		let tasks = (0..50)
			.map(|_| {
				let store = store.clone();
				let user = Uuid::new_v4();

				tokio::spawn(async move { store.toggle_post_like(post.id, user).await })
			})
			.collect::<Vec<_>>();

		for task in tasks {
			task.await.unwrap().unwrap();
		}

		let post = store.get_post(post.id).await.unwrap();
		assert_eq!(post.likes_count, 50);
	}

	#[tokio::test]
	async fn test_list_posts_pagination() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		for i in 0..25 {
			store
				.create_post(
					&john,
					test::create_post(&format!("Post {i}"), Category::Science, Status::Published),
				)
				.await
				.unwrap();
		}

		store
			.create_post(&john, test::create_post("Hidden", Category::Science, Status::Draft))
			.await
			.unwrap();

		let page = store
			.list_posts(None, &PostFilter::published(), PostSort::default(), 1, 10)
			.await
			.unwrap();

		assert_eq!(page.items.len(), 10);
		assert_eq!(page.total, 25);
		assert_eq!(page.total_pages, 3);
		assert_eq!(page.items[0].post.title, "Post 24");

		let last = store
			.list_posts(None, &PostFilter::published(), PostSort::default(), 3, 10)
			.await
			.unwrap();

		assert_eq!(last.items.len(), 5);
		assert_eq!(last.items[4].post.title, "Post 0");
	}

	#[tokio::test]
	async fn test_list_posts_filters_and_sorts() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;

		let mut rust = test::create_post("Learning Rust", Category::Programming, Status::Published);
		rust.tags = vec!["Systems".into()];
		let rust = store.create_post(&john, rust).await.unwrap().post;

		let design = store
			.create_post(&jane, test::create_post("Colours", Category::Design, Status::Published))
			.await
			.unwrap()
			.post;

		store.toggle_post_like(design.id, john.id).await.unwrap();
		store.get_post(rust.id).await.unwrap();
		store.get_post(rust.id).await.unwrap();

		let search = |text: &str| PostFilter {
			search: Some(text.into()),
			..PostFilter::published()
		};

		let found = store
			.list_posts(None, &search("rust"), PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 1);
		assert_eq!(found.items[0].post.id, rust.id);

		let found = store
			.list_posts(None, &search("SYSTEMS"), PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 1);

		let found = store
			.list_posts(None, &search("about things"), PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 2);

		let by_category = PostFilter {
			category: Some(Category::Design),
			..PostFilter::published()
		};
		let found = store
			.list_posts(None, &by_category, PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 1);
		assert_eq!(found.items[0].post.id, design.id);

		let by_author = PostFilter {
			author_id: Some(jane.id),
			..PostFilter::published()
		};
		let found = store
			.list_posts(None, &by_author, PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.items[0].post.id, design.id);

		let most_liked = PostSort {
			key: SortKey::Likes,
			order: SortOrder::Desc,
		};
		let sorted = store
			.list_posts(None, &PostFilter::published(), most_liked, 1, 10)
			.await
			.unwrap();
		assert_eq!(sorted.items[0].post.id, design.id);

		let least_viewed = PostSort {
			key: SortKey::Views,
			order: SortOrder::Asc,
		};
		let sorted = store
			.list_posts(None, &PostFilter::published(), least_viewed, 1, 10)
			.await
			.unwrap();
		assert_eq!(sorted.items[0].post.id, design.id);
		assert_eq!(sorted.items[1].post.views, 2);
	}

	#[tokio::test]
	async fn test_hidden_statuses() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;
		let admin = test::admin(&store, "admin").await;

		store
			.create_post(&john, test::create_post("Draft", Category::Other, Status::Draft))
			.await
			.unwrap();

		let drafts = PostFilter {
			status: Some(Status::Draft),
			..PostFilter::default()
		};

		let error = store
			.list_posts(None, &drafts, PostSort::default(), 1, 10)
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Authorization);

		let error = store
			.list_posts(Some(&jane), &drafts, PostSort::default(), 1, 10)
			.await
			.unwrap_err();
		assert!(matches!(error, Error::HiddenStatus));

		let own = PostFilter {
			author_id: Some(john.id),
			..drafts.clone()
		};
		let found = store
			.list_posts(Some(&john), &own, PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 1);

		let found = store
			.list_posts(Some(&admin), &drafts, PostSort::default(), 1, 10)
			.await
			.unwrap();
		assert_eq!(found.total, 1);
	}

	#[tokio::test]
	async fn test_delete_post() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;

		let post = store
			.create_post(&john, test::create_post("Doomed", Category::Other, Status::Published))
			.await
			.unwrap()
			.post;

		let error = store.delete_post(&jane, post.id).await.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Authorization);

		store.delete_post(&john, post.id).await.unwrap();

		let error = store.get_post(post.id).await.unwrap_err();
		assert!(matches!(error, Error::UnknownPost(..)));
	}

	#[tokio::test]
	async fn test_category_stats_count_published_only() {
		let store = Store::new();
		let john = test::user(&store, "john").await;

		for (category, status) in [
			(Category::Technology, Status::Published),
			(Category::Technology, Status::Published),
			(Category::Technology, Status::Draft),
			(Category::Design, Status::Published),
		] {
			store
				.create_post(&john, test::create_post("Post", category, status))
				.await
				.unwrap();
		}

		assert_eq!(
			store.category_stats().await,
			vec![
				CategoryCount {
					category: Category::Technology,
					count: 2
				},
				CategoryCount {
					category: Category::Design,
					count: 1
				},
			]
		);
	}
}
