//! User, credential, and friendship models

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::{FriendshipId, UserId};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Login name, also shown as the author of pins
    pub username: String,
    pub phone_number: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Registration request
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub phone_number: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            phone_number: String::new(),
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

/// Username/password pair used to sign in
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-blank before any request is made.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Lifecycle of a friendship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    /// Sent and waiting for the receiver
    Requesting,
    Accepted,
    Deleted,
}

/// Which side of pending requests to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDirection {
    Received,
    Sent,
}

/// A friendship edge between a requester and a receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: FriendshipId,
    pub requester: User,
    pub receiver: User,
    pub status: FriendshipStatus,
}

impl Friendship {
    /// The user on the other end of the edge from `me`.
    #[must_use]
    pub fn counterpart(&self, me: UserId) -> &User {
        if self.requester.id == me {
            &self.receiver
        } else {
            &self.requester
        }
    }
}
