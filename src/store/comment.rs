use chrono::Utc;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use super::{social, validate_with_blanks, ErrorKind, Store, Tables};
use crate::model::{self, Actor, Membership};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown parent comment {0}")]
	UnknownParent(Uuid),
	#[error("not allowed to delete comment {0}")]
	NotAuthor(Uuid),
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnknownComment(..) | Self::UnknownPost(..) | Self::UnknownParent(..) => {
				ErrorKind::NotFound
			}
			Self::NotAuthor(..) => ErrorKind::Authorization,
			Self::Validation(..) => ErrorKind::Validation,
		}
	}
}

fn other_post_error() -> ValidationErrors {
	let mut errors = ValidationErrors::new();
	let mut error = ValidationError::new("other_post");
	error.message = Some("the parent comment belongs to another post".into());

	errors.add("parent_comment_id", error);
	errors
}

impl Tables {
	/// Resolves a comment's author and its direct replies, oldest first.
	fn comment_view(&self, comment: &model::Comment) -> model::CommentView {
		let replies = comment
			.replies
			.iter()
			.filter_map(|id| self.comments.get(id))
			.map(|reply| model::CommentView {
				replies: Vec::new(),
				..self.comment_leaf(reply)
			})
			.collect();

		model::CommentView {
			replies,
			..self.comment_leaf(comment)
		}
	}

	fn comment_leaf(&self, comment: &model::Comment) -> model::CommentView {
		model::CommentView {
			id: comment.id,
			post_id: comment.post_id,
			content: comment.content.clone(),
			author: self.author(comment.author_id),
			parent_comment_id: comment.parent_comment_id,
			likes: comment.likes.clone(),
			likes_count: comment.likes.len(),
			created_at: comment.created_at,
			replies: Vec::new(),
		}
	}

	/// Removes a comment and, recursively, all of its replies. Returns how many were removed.
	fn delete_thread(&mut self, comment_id: Uuid) -> usize {
		let mut pending = vec![comment_id];
		let mut removed = 0;

		while let Some(id) = pending.pop() {
			if let Some(comment) = self.comments.remove(&id) {
				pending.extend(comment.replies);
				removed += 1;
			}
		}

		removed
	}

	/// Removes every comment on a post. Returns how many were removed.
	pub(crate) fn delete_all_for_post(&mut self, post_id: Uuid) -> usize {
		let before = self.comments.len();
		self.comments.retain(|_, comment| comment.post_id != post_id);

		before - self.comments.len()
	}
}

impl Store {
	/// Adds a comment to a post, or a reply to a comment on the same post.
	#[tracing::instrument(skip(self, input), fields(post = %input.post_id))]
	pub async fn create_comment(
		&self,
		actor: &Actor,
		input: model::CreateComment,
	) -> Result<model::CommentView, Error> {
		validate_with_blanks(&input, &[("content", Some(&input.content))])?;

		let mut tables = self.tables.write().await;

		if !tables.posts.contains_key(&input.post_id) {
			return Err(Error::UnknownPost(input.post_id));
		}

		if let Some(parent_id) = input.parent_comment_id {
			let parent = tables
				.comments
				.get(&parent_id)
				.ok_or(Error::UnknownParent(parent_id))?;

			if parent.post_id != input.post_id {
				return Err(other_post_error().into());
			}
		}

		let comment = model::Comment {
			id: Uuid::new_v4(),
			post_id: input.post_id,
			author_id: actor.id,
			content: input.content,
			parent_comment_id: input.parent_comment_id,
			replies: Vec::new(),
			likes: Default::default(),
			created_at: Utc::now(),
			sequence: tables.next_sequence(),
		};

		if let Some(parent) = comment
			.parent_comment_id
			.and_then(|id| tables.comments.get_mut(&id))
		{
			parent.replies.push(comment.id);
		}

		let view = tables.comment_leaf(&comment);
		tables.comments.insert(comment.id, comment);

		tracing::info!(comment = %view.id, "created comment");

		Ok(view)
	}

	/// Lists the comments on a post that are not replies, newest first, each
	/// with its direct replies resolved.
	pub async fn list_top_level_comments(
		&self,
		post_id: Uuid,
	) -> Result<Vec<model::CommentView>, Error> {
		let tables = self.tables.read().await;

		if !tables.posts.contains_key(&post_id) {
			return Err(Error::UnknownPost(post_id));
		}

		let mut comments = tables
			.comments
			.values()
			.filter(|comment| comment.post_id == post_id && comment.parent_comment_id.is_none())
			.collect::<Vec<_>>();

		comments.sort_by(|a, b| {
			b.created_at
				.cmp(&a.created_at)
				.then(b.sequence.cmp(&a.sequence))
		});

		Ok(comments
			.into_iter()
			.map(|comment| tables.comment_view(comment))
			.collect())
	}

	#[tracing::instrument(skip(self))]
	pub async fn toggle_comment_like(
		&self,
		comment_id: Uuid,
		user_id: Uuid,
	) -> Result<Membership, Error> {
		let mut tables = self.tables.write().await;
		let comment = tables
			.comments
			.get_mut(&comment_id)
			.ok_or(Error::UnknownComment(comment_id))?;

		Ok(social::toggle_membership(&mut comment.likes, user_id))
	}

	/// Deletes a comment and its replies, and unlinks it from its parent.
	#[tracing::instrument(skip(self))]
	pub async fn delete_comment(&self, actor: &Actor, comment_id: Uuid) -> Result<(), Error> {
		let mut tables = self.tables.write().await;
		let comment = tables
			.comments
			.get(&comment_id)
			.ok_or(Error::UnknownComment(comment_id))?;

		if !actor.can_modify(comment.author_id) {
			return Err(Error::NotAuthor(comment_id));
		}

		let parent_id = comment.parent_comment_id;

		if let Some(parent) = parent_id.and_then(|id| tables.comments.get_mut(&id)) {
			parent.replies.retain(|id| *id != comment_id);
		}

		let removed = tables.delete_thread(comment_id);
		tracing::info!(comment = %comment_id, removed, "deleted comment");

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::Error;
	use crate::{
		model::{self, Category, Status},
		store::{test, ErrorKind, Store},
	};

	async fn post(store: &Store, author: &model::Actor) -> Uuid {
		store
			.create_post(author, test::create_post("Commented", Category::Other, Status::Published))
			.await
			.unwrap()
			.post
			.id
	}

	fn comment(post_id: Uuid, parent: Option<Uuid>, content: &str) -> model::CreateComment {
		model::CreateComment {
			post_id,
			content: content.into(),
			parent_comment_id: parent,
		}
	}

	#[tokio::test]
	async fn test_replies_are_nested_under_their_parent() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;
		let post_id = post(&store, &john).await;

		let first = store
			.create_comment(&john, comment(post_id, None, "First"))
			.await
			.unwrap();
		let second = store
			.create_comment(&jane, comment(post_id, None, "Second"))
			.await
			.unwrap();
		let reply = store
			.create_comment(&jane, comment(post_id, Some(first.id), "A reply"))
			.await
			.unwrap();

		assert_eq!(reply.parent_comment_id, Some(first.id));
		assert_eq!(reply.author.as_ref().unwrap().username, "jane");

		let listed = store.list_top_level_comments(post_id).await.unwrap();

		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].id, second.id);
		assert_eq!(listed[1].id, first.id);
		assert_eq!(listed[1].replies.len(), 1);
		assert_eq!(listed[1].replies[0].content, "A reply");
		assert!(listed[0].replies.is_empty());
	}

	#[tokio::test]
	async fn test_create_comment_checks_relations() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let post_id = post(&store, &john).await;
		let other_post = post(&store, &john).await;

		let error = store
			.create_comment(&john, comment(Uuid::new_v4(), None, "Hi"))
			.await
			.unwrap_err();
		assert!(matches!(error, Error::UnknownPost(..)));

		let error = store
			.create_comment(&john, comment(post_id, Some(Uuid::new_v4()), "Hi"))
			.await
			.unwrap_err();
		assert!(matches!(error, Error::UnknownParent(..)));
		assert_eq!(error.kind(), ErrorKind::NotFound);

		let parent = store
			.create_comment(&john, comment(other_post, None, "Elsewhere"))
			.await
			.unwrap();
		let error = store
			.create_comment(&john, comment(post_id, Some(parent.id), "Hi"))
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Validation);

		let error = store
			.create_comment(&john, comment(post_id, None, "  "))
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Validation);

		let error = store
			.create_comment(&john, comment(post_id, None, &"x".repeat(2001)))
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::Validation);
	}

	#[tokio::test]
	async fn test_list_comments_of_unknown_post() {
		let store = Store::new();

		let error = store
			.list_top_level_comments(Uuid::new_v4())
			.await
			.unwrap_err();

		assert!(matches!(error, Error::UnknownPost(..)));
	}

	#[tokio::test]
	async fn test_toggle_comment_like() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let post_id = post(&store, &john).await;

		let created = store
			.create_comment(&john, comment(post_id, None, "Like me"))
			.await
			.unwrap();

		let liked = store.toggle_comment_like(created.id, john.id).await.unwrap();
		assert!(liked.is_member);
		assert_eq!(liked.count, 1);

		let unliked = store.toggle_comment_like(created.id, john.id).await.unwrap();
		assert!(!unliked.is_member);
		assert_eq!(unliked.count, 0);

		let error = store
			.toggle_comment_like(Uuid::new_v4(), john.id)
			.await
			.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::NotFound);
	}

	#[tokio::test]
	async fn test_delete_comment_unlinks_and_cascades() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let jane = test::user(&store, "jane").await;
		let post_id = post(&store, &john).await;

		let top = store
			.create_comment(&john, comment(post_id, None, "Top"))
			.await
			.unwrap();
		let reply = store
			.create_comment(&jane, comment(post_id, Some(top.id), "Reply"))
			.await
			.unwrap();
		store
			.create_comment(&john, comment(post_id, Some(reply.id), "Nested"))
			.await
			.unwrap();

		let error = store.delete_comment(&john, reply.id).await.unwrap_err();
		assert!(matches!(error, Error::NotAuthor(..)));

		store.delete_comment(&jane, reply.id).await.unwrap();

		let listed = store.list_top_level_comments(post_id).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert!(listed[0].replies.is_empty());
		assert_eq!(store.tables.read().await.comments.len(), 1);

		let error = store.delete_comment(&jane, reply.id).await.unwrap_err();
		assert_eq!(error.kind(), ErrorKind::NotFound);
	}

	#[tokio::test]
	async fn test_deleting_a_post_removes_its_comments() {
		let store = Store::new();
		let john = test::user(&store, "john").await;
		let post_id = post(&store, &john).await;
		let kept = post(&store, &john).await;

		let top = store
			.create_comment(&john, comment(post_id, None, "Top"))
			.await
			.unwrap();
		store
			.create_comment(&john, comment(post_id, Some(top.id), "Reply"))
			.await
			.unwrap();
		store
			.create_comment(&john, comment(kept, None, "Survivor"))
			.await
			.unwrap();

		store.delete_post(&john, post_id).await.unwrap();

		let tables = store.tables.read().await;
		assert!(tables.comments.values().all(|c| c.post_id == kept));
		assert_eq!(tables.comments.len(), 1);
	}
}
