//! Toggle-membership, shared by post likes, comment likes and follows.

use std::collections::BTreeSet;

use uuid::Uuid;

use super::{user, Store};
use crate::model::Membership;

/// Adds `actor` to the set if absent, removes it otherwise.
pub fn toggle_membership(set: &mut BTreeSet<Uuid>, actor: Uuid) -> Membership {
	let is_member = if set.remove(&actor) {
		false
	} else {
		set.insert(actor)
	};

	Membership {
		is_member,
		count: set.len(),
	}
}

impl Store {
	/// Follows `target` if `actor` does not follow them yet, unfollows otherwise.
	///
	/// Both the actor's `following` and the target's `followers` are updated
	/// under the same write lock, and every check happens before either side
	/// is touched. The returned count is the target's follower count.
	#[tracing::instrument(skip(self))]
	pub async fn toggle_follow(&self, actor: Uuid, target: Uuid) -> Result<Membership, user::Error> {
		if actor == target {
			return Err(user::Error::SelfFollow);
		}

		let mut tables = self.tables.write().await;

		if !tables.users.contains_key(&target) {
			return Err(user::Error::UnknownUser(target));
		}

		let following = match tables.users.get_mut(&actor) {
			Some(user) => toggle_membership(&mut user.following, target),
			None => return Err(user::Error::UnknownUser(actor)),
		};

		let mut followers = 0;
		if let Some(user) = tables.users.get_mut(&target) {
			if following.is_member {
				user.followers.insert(actor);
			} else {
				user.followers.remove(&actor);
			}

			followers = user.followers.len();
		}

		tracing::debug!(following = following.is_member, "toggled follow");

		Ok(Membership {
			is_member: following.is_member,
			count: followers,
		})
	}
}

#[cfg(test)]
mod test {
	use std::collections::BTreeSet;

	use uuid::Uuid;

	use super::toggle_membership;
	use crate::store::{test, user, ErrorKind, Store};

	#[test]
	fn test_toggle_membership() {
		let mut set = BTreeSet::new();
		let actor = Uuid::new_v4();

		let added = toggle_membership(&mut set, actor);

		assert!(added.is_member);
		assert_eq!(added.count, 1);

		let removed = toggle_membership(&mut set, actor);

		assert!(!removed.is_member);
		assert_eq!(removed.count, 0);
		assert!(set.is_empty());
	}

	#[test]
	fn test_toggle_membership_keeps_other_members() {
		let other = Uuid::new_v4();
		let actor = Uuid::new_v4();
		let mut set = BTreeSet::from([other]);

		assert_eq!(toggle_membership(&mut set, actor).count, 2);
		assert_eq!(toggle_membership(&mut set, actor).count, 1);
		assert!(set.contains(&other));
	}

	#[tokio::test]
	async fn test_follow_is_symmetric() {
		let store = Store::new();
		let a = test::user(&store, "alice").await;
		let b = test::user(&store, "bob").await;

		let membership = store.toggle_follow(a.id, b.id).await.unwrap();

		assert!(membership.is_member);
		assert_eq!(membership.count, 1);

		let alice = store.get_user(a.id).await.unwrap();
		let bob = store.get_user(b.id).await.unwrap();

		assert!(alice.following.contains(&b.id));
		assert!(bob.followers.contains(&a.id));
		assert!(alice.followers.is_empty());
		assert!(bob.following.is_empty());

		let membership = store.toggle_follow(a.id, b.id).await.unwrap();

		assert!(!membership.is_member);
		assert_eq!(membership.count, 0);

		let alice = store.get_user(a.id).await.unwrap();
		let bob = store.get_user(b.id).await.unwrap();

		assert!(!alice.following.contains(&b.id));
		assert!(!bob.followers.contains(&a.id));
	}

	#[tokio::test]
	async fn test_self_follow_is_rejected() {
		let store = Store::new();
		let a = test::user(&store, "alice").await;

		let error = store.toggle_follow(a.id, a.id).await.unwrap_err();

		assert!(matches!(error, user::Error::SelfFollow));
		assert_eq!(error.kind(), ErrorKind::Validation);

		let alice = store.get_user(a.id).await.unwrap();

		assert!(alice.following.is_empty());
		assert!(alice.followers.is_empty());
	}

	#[tokio::test]
	async fn test_follow_unknown_user_changes_nothing() {
		let store = Store::new();
		let a = test::user(&store, "alice").await;
		let ghost = Uuid::new_v4();

		let error = store.toggle_follow(a.id, ghost).await.unwrap_err();

		assert!(matches!(error, user::Error::UnknownUser(id) if id == ghost));
		assert!(store.get_user(a.id).await.unwrap().following.is_empty());
	}

	#[tokio::test]
	async fn test_concurrent_follow_toggles_net_out() {
		let store = Store::new();
		let a = test::user(&store, "alice").await;
		let b = test::user(&store, "bob").await;

		let tasks = (0..10)
			.map(|_| {
				let store = store.clone();
				tokio::spawn(async move { store.toggle_follow(a.id, b.id).await })
			})
			.collect::<Vec<_>>();

		for task in tasks {
			task.await.unwrap().unwrap();
		}

		let alice = store.get_user(a.id).await.unwrap();
		let bob = store.get_user(b.id).await.unwrap();

		assert!(alice.following.is_empty());
		assert!(bob.followers.is_empty());
	}
}
