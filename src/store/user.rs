//! The identity directory: users, sessions and profile projections.

use chrono::Utc;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::{patch_optional, ErrorKind, Store, Tables};
use crate::model::{self, Actor, Page};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
	#[error("a user cannot follow themselves")]
	SelfFollow,
	#[error("admin access required")]
	AdminRequired,
	#[error("validation error: {0}")]
	Validation(#[from] ValidationErrors),
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::UnknownUser(..) => ErrorKind::NotFound,
			Self::UsernameTaken | Self::EmailTaken => ErrorKind::Conflict,
			Self::SelfFollow | Self::Validation(..) => ErrorKind::Validation,
			Self::AdminRequired => ErrorKind::Authorization,
		}
	}
}

impl Tables {
	/// Fails if another user already has the username or email, ignoring case.
	fn check_unique(
		&self,
		except: Option<Uuid>,
		username: Option<&str>,
		email: Option<&str>,
	) -> Result<(), Error> {
		let others = self
			.users
			.values()
			.filter(|user| Some(user.id) != except);

		for user in others {
			if username.is_some_and(|username| user.username.eq_ignore_ascii_case(username)) {
				return Err(Error::UsernameTaken);
			}

			if email.is_some_and(|email| user.email.eq_ignore_ascii_case(email)) {
				return Err(Error::EmailTaken);
			}
		}

		Ok(())
	}

	fn profile(&self, user: &model::User) -> model::Profile {
		let project = |ids: &std::collections::BTreeSet<Uuid>| {
			ids.iter()
				.filter_map(|id| self.author(*id))
				.collect::<Vec<_>>()
		};

		model::Profile {
			id: user.id,
			username: user.username.clone(),
			full_name: user.full_name.clone(),
			avatar: user.avatar.clone(),
			bio: user.bio.clone(),
			joined_at: user.joined_at,
			followers: project(&user.followers),
			following: project(&user.following),
		}
	}
}

impl Store {
	/// Creates a new user with an already hashed password.
	///
	/// The id is chosen by the caller since the password hash is salted with it.
	#[tracing::instrument(skip(self, input, password), fields(username = %input.username))]
	pub async fn register(
		&self,
		input: model::RegisterUser,
		id: Uuid,
		password: Vec<u8>,
	) -> Result<model::User, Error> {
		input.validate()?;

		let mut tables = self.tables.write().await;
		tables.check_unique(None, Some(&input.username), Some(&input.email))?;

		let user = model::User {
			id,
			username: input.username,
			email: input.email,
			full_name: input.full_name.trim().to_owned(),
			avatar: input.avatar,
			bio: input.bio,
			is_admin: false,
			joined_at: Utc::now(),
			followers: Default::default(),
			following: Default::default(),
			password,
		};

		tables.users.insert(id, user.clone());
		tracing::info!(user = %id, "registered user");

		Ok(user)
	}

	pub async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> Result<(), Error> {
		let mut tables = self.tables.write().await;
		let user = tables
			.users
			.get_mut(&user_id)
			.ok_or(Error::UnknownUser(user_id))?;

		user.is_admin = is_admin;
		Ok(())
	}

	pub async fn get_user(&self, user_id: Uuid) -> Result<model::User, Error> {
		self.tables
			.read()
			.await
			.users
			.get(&user_id)
			.cloned()
			.ok_or(Error::UnknownUser(user_id))
	}

	pub async fn find_by_email(&self, email: &str) -> Option<model::User> {
		self.tables
			.read()
			.await
			.users
			.values()
			.find(|user| user.email.eq_ignore_ascii_case(email))
			.cloned()
	}

	/// Returns the public profile of a user, with followers and following projected.
	pub async fn profile(&self, user_id: Uuid) -> Result<model::Profile, Error> {
		let tables = self.tables.read().await;
		let user = tables
			.users
			.get(&user_id)
			.ok_or(Error::UnknownUser(user_id))?;

		Ok(tables.profile(user))
	}

	/// Overwrites the profile fields present in `patch`. An empty avatar or bio clears it.
	#[tracing::instrument(skip(self, patch))]
	pub async fn update_profile(
		&self,
		user_id: Uuid,
		patch: model::UpdateUser,
	) -> Result<model::User, Error> {
		patch.validate()?;

		let mut tables = self.tables.write().await;

		if !tables.users.contains_key(&user_id) {
			return Err(Error::UnknownUser(user_id));
		}

		tables.check_unique(
			Some(user_id),
			patch.username.as_deref(),
			patch.email.as_deref(),
		)?;

		let user = tables
			.users
			.get_mut(&user_id)
			.ok_or(Error::UnknownUser(user_id))?;

		if let Some(username) = patch.username {
			user.username = username;
		}

		if let Some(email) = patch.email {
			user.email = email;
		}

		if let Some(full_name) = patch.full_name {
			user.full_name = full_name.trim().to_owned();
		}

		patch_optional(&mut user.avatar, patch.avatar);
		patch_optional(&mut user.bio, patch.bio);

		Ok(user.clone())
	}

	/// Lists every user, newest first. Only admins may do this.
	pub async fn list_users(
		&self,
		actor: &Actor,
		page: usize,
		size: usize,
	) -> Result<Page<model::User>, Error> {
		if !actor.is_admin {
			return Err(Error::AdminRequired);
		}

		let tables = self.tables.read().await;
		let mut users = tables.users.values().cloned().collect::<Vec<_>>();

		users.sort_by(|a, b| {
			b.joined_at
				.cmp(&a.joined_at)
				.then_with(|| a.username.cmp(&b.username))
		});

		Ok(Page::slice(users, page, size))
	}

	pub async fn create_session(&self, user_id: Uuid) -> Result<model::Session, Error> {
		let mut tables = self.tables.write().await;

		if !tables.users.contains_key(&user_id) {
			return Err(Error::UnknownUser(user_id));
		}

		let session = model::Session {
			id: Uuid::new_v4(),
			user_id,
			created_at: Utc::now(),
		};

		tables.sessions.insert(session.id, session.clone());
		Ok(session)
	}

	/// Resolves a session id to the user it belongs to.
	pub async fn session_user(&self, session_id: Uuid) -> Option<model::User> {
		let tables = self.tables.read().await;
		let session = tables.sessions.get(&session_id)?;

		tables.users.get(&session.user_id).cloned()
	}

	pub async fn delete_session(&self, session_id: Uuid) -> bool {
		self.tables
			.write()
			.await
			.sessions
			.remove(&session_id)
			.is_some()
	}
}
