//! The in-process content and social graph store.
//!
//! Every table lives behind a single [`RwLock`]. Mutating operations take the
//! write lock once and do their whole read-modify-write inside it, so a toggle
//! or a follow is never observed half-applied and concurrent toggles cannot
//! lose updates.

pub mod comment;
pub mod post;
pub mod social;
pub mod stats;
pub mod user;

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::model;

/// The category an error falls into, independent of how it is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// A missing, oversized or malformed field, or a forbidden relation.
	Validation,
	/// An unknown id.
	NotFound,
	/// A mutation attempted by someone who is neither the owner nor an admin.
	Authorization,
	/// A unique field is already taken.
	Conflict,
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
	pub users: HashMap<Uuid, model::User>,
	pub posts: HashMap<Uuid, model::Post>,
	pub comments: HashMap<Uuid, model::Comment>,
	pub sessions: HashMap<Uuid, model::Session>,
	last_slug_token: i64,
	last_sequence: u64,
}

impl Tables {
	/// A strictly increasing millisecond timestamp, unique for the lifetime of the store.
	fn next_slug_token(&mut self) -> i64 {
		let token = Utc::now()
			.timestamp_millis()
			.max(self.last_slug_token + 1);

		self.last_slug_token = token;
		token
	}

	fn next_sequence(&mut self) -> u64 {
		self.last_sequence += 1;
		self.last_sequence
	}

	fn author(&self, user_id: Uuid) -> Option<model::Author> {
		self.users.get(&user_id).map(model::User::author)
	}
}

/// A cheaply cloneable handle to the store.
#[derive(Debug, Clone, Default)]
pub struct Store {
	tables: Arc<RwLock<Tables>>,
}

impl Store {
	pub fn new() -> Self {
		Self::default()
	}
}

/// Overwrites an optional field with a patched value, where a blank value clears it.
fn patch_optional(field: &mut Option<String>, value: Option<String>) {
	if let Some(value) = value {
		*field = (!value.trim().is_empty()).then_some(value);
	}
}

/// Records a `blank` error for `field` if the value is empty after trimming.
fn check_not_blank(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
	if value.is_some_and(|value| value.trim().is_empty()) {
		errors.add(field, ValidationError::new("blank"));
	}
}

/// Runs the derived validation and adds `blank` errors for the given fields.
fn validate_with_blanks<T: validator::Validate>(
	input: &T,
	fields: &[(&'static str, Option<&str>)],
) -> Result<(), ValidationErrors> {
	let mut errors = input.validate().err().unwrap_or_default();

	for (field, value) in fields {
		check_not_blank(&mut errors, field, *value);
	}

	if errors.is_empty() {
		Ok(())
	} else {
		Err(errors)
	}
}
