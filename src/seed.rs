//! Sample users, posts and comments for demos and local development.

use argon2::Argon2;
use uuid::Uuid;

use crate::{
	model::{self, Actor, Category, Status},
	route::auth::route::hash_password,
	store::{comment, post, user, Store},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("password hashing error: {0}")]
	Argon(argon2::Error),
	#[error(transparent)]
	Directory(#[from] user::Error),
	#[error(transparent)]
	Content(#[from] post::Error),
	#[error(transparent)]
	Comment(#[from] comment::Error),
}

struct SampleUser {
	username: &'static str,
	email: &'static str,
	full_name: &'static str,
	bio: &'static str,
	password: &'static str,
	avatar: &'static str,
	is_admin: bool,
}

const USERS: [SampleUser; 3] = [
	SampleUser {
		username: "admin",
		email: "admin@bloghub.com",
		full_name: "Admin User",
		bio: "Platform administrator",
		password: "admin123",
		avatar: "https://images.pexels.com/photos/2379004/pexels-photo-2379004.jpeg?auto=compress&cs=tinysrgb&w=150",
		is_admin: true,
	},
	SampleUser {
		username: "johndoe",
		email: "john@example.com",
		full_name: "John Doe",
		bio: "Tech enthusiast and blogger",
		password: "user1234",
		avatar: "https://images.pexels.com/photos/220453/pexels-photo-220453.jpeg?auto=compress&cs=tinysrgb&w=150",
		is_admin: false,
	},
	SampleUser {
		username: "janesmith",
		email: "jane@example.com",
		full_name: "Jane Smith",
		bio: "Creative writer and designer",
		password: "user1234",
		avatar: "https://images.pexels.com/photos/774909/pexels-photo-774909.jpeg?auto=compress&cs=tinysrgb&w=150",
		is_admin: false,
	},
];

struct SamplePost {
	/// Index into [`USERS`].
	author: usize,
	title: &'static str,
	excerpt: &'static str,
	content: &'static str,
	category: Category,
	tags: [&'static str; 3],
	cover_image: &'static str,
	liked_by: &'static [usize],
	views: u64,
}

const POSTS: [SamplePost; 3] = [
	SamplePost {
		author: 1,
		title: "Getting Started with React and TypeScript",
		excerpt: "Learn how to combine React with TypeScript for better development experience and type safety.",
		content: "<p>React and TypeScript make a powerful combination for building modern web applications. \
			In this guide, we'll explore how to set up a React project with TypeScript and leverage the \
			benefits of static typing.</p><h2>Why Use TypeScript with React?</h2><ul><li>Static type \
			checking catches errors at compile time</li><li>Better IDE support with autocomplete and \
			refactoring</li><li>Improved code documentation and maintainability</li></ul>",
		category: Category::Programming,
		tags: ["React", "TypeScript", "Frontend"],
		cover_image: "https://images.pexels.com/photos/270348/pexels-photo-270348.jpeg?auto=compress&cs=tinysrgb&w=800",
		liked_by: &[2, 0],
		views: 234,
	},
	SamplePost {
		author: 2,
		title: "Modern CSS Techniques for Beautiful Web Design",
		excerpt: "Discover modern CSS techniques including Grid, Flexbox, and custom properties for creating stunning web designs.",
		content: "<p>CSS has evolved significantly over the years, offering powerful new features that make \
			creating beautiful, responsive designs easier than ever.</p><h2>CSS Grid and Flexbox</h2>\
			<ul><li><strong>Flexbox</strong>: Perfect for one-dimensional layouts</li><li><strong>CSS \
			Grid</strong>: Ideal for two-dimensional layouts</li></ul>",
		category: Category::Design,
		tags: ["CSS", "Web Design", "Frontend"],
		cover_image: "https://images.pexels.com/photos/196644/pexels-photo-196644.jpeg?auto=compress&cs=tinysrgb&w=800",
		liked_by: &[1],
		views: 189,
	},
	SamplePost {
		author: 1,
		title: "Building Scalable Backend APIs with Node.js",
		excerpt: "Learn best practices for building scalable and secure backend APIs using Node.js and Express.",
		content: "<p>Building scalable and maintainable backend APIs is crucial for modern web applications.</p>\
			<h2>API Design Principles</h2><ul><li>RESTful architecture</li><li>Consistent naming \
			conventions</li><li>Proper HTTP status codes</li><li>Comprehensive error handling</li></ul>",
		category: Category::Technology,
		tags: ["Node.js", "API", "Backend"],
		cover_image: "https://images.pexels.com/photos/1181677/pexels-photo-1181677.jpeg?auto=compress&cs=tinysrgb&w=800",
		liked_by: &[2],
		views: 156,
	},
];

/// Comments on the first post, as (author, content, liked by).
const COMMENTS: [(usize, &str, &[usize]); 2] = [
	(
		2,
		"Great article! TypeScript has really improved my React development workflow.",
		&[1],
	),
	(
		0,
		"Thanks for sharing this comprehensive guide. Very helpful for beginners!",
		&[],
	),
];

/// Inserts the sample users, posts and comments through the regular store operations.
///
/// Meant to run once against an empty store. Running it again fails with
/// [`user::Error::UsernameTaken`] before anything is written.
#[tracing::instrument(skip_all)]
pub async fn sample_data(store: &Store, hasher: &Argon2<'_>) -> Result<(), Error> {
	let mut actors = Vec::with_capacity(USERS.len());

	for sample in &USERS {
		let id = Uuid::new_v4();
		let password = hash_password(hasher, sample.password, &id).map_err(Error::Argon)?;
		let input = model::RegisterUser {
			email: sample.email.into(),
			password: sample.password.into(),
			username: sample.username.into(),
			full_name: sample.full_name.into(),
			avatar: Some(sample.avatar.into()),
			bio: Some(sample.bio.into()),
		};

		store.register(input, id, password.to_vec()).await?;

		if sample.is_admin {
			store.set_admin(id, true).await?;
		}

		actors.push(Actor {
			id,
			is_admin: sample.is_admin,
		});
	}

	let mut posts = Vec::with_capacity(POSTS.len());

	for sample in &POSTS {
		let input = model::CreatePost {
			title: sample.title.into(),
			content: sample.content.into(),
			excerpt: Some(sample.excerpt.into()),
			category: sample.category,
			tags: sample.tags.iter().map(|tag| (*tag).to_owned()).collect(),
			cover_image: Some(sample.cover_image.into()),
			status: Status::Published,
		};

		let id = store.create_post(&actors[sample.author], input).await?.post.id;

		for liker in sample.liked_by {
			store.toggle_post_like(id, actors[*liker].id).await?;
		}

		store.set_views(id, sample.views).await?;

		posts.push(id);
	}

	for (author, content, liked_by) in COMMENTS {
		let input = model::CreateComment {
			post_id: posts[0],
			content: content.into(),
			parent_comment_id: None,
		};

		let id = store.create_comment(&actors[author], input).await?.id;

		for liker in liked_by {
			store.toggle_comment_like(id, actors[*liker].id).await?;
		}
	}

	tracing::info!(
		users = actors.len(),
		posts = posts.len(),
		comments = COMMENTS.len(),
		"seeded sample data"
	);

	Ok(())
}
