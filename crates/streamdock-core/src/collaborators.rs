//! Ordered, id-unique set of users to invite onto a new stream.

use serde::{Deserialize, Serialize};

use crate::remote::UserRef;

/// Users to be granted access once the stream exists.
///
/// Iteration follows insertion order. No two entries share an `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollaboratorSet {
    users: Vec<UserRef>,
}

impl CollaboratorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Returns `false` if a user with the same id is already present.
    pub fn add(&mut self, user: UserRef) -> bool {
        if self.contains(&user.id) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Remove the user with this id. Returns `false` if absent.
    pub fn remove(&mut self, user_id: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != user_id);
        self.users.len() != before
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRef> {
        self.users.iter()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<'a> IntoIterator for &'a CollaboratorSet {
    type Item = &'a UserRef;
    type IntoIter = std::slice::Iter<'a, UserRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.iter()
    }
}
