use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use crate::libs::models::{User, UserStatus};
use crate::ChatError;

/// Fields a profile edit may change. Anything left `None` keeps its value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub status: Option<UserStatus>,
}

/// Registry of known users plus the current session pointer. Registry order
/// is stable: seeded users first, then sign-ups in arrival order.
#[derive(Debug, Default)]
pub struct IdentityStore {
    users: Vec<User>,
    current_user_id: Option<String>,
}

impl IdentityStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            current_user_id: None,
        }
    }

    /// Log in by username (case-insensitive). A known name flips that user
    /// online; an unknown one registers a fresh user. Either way the session
    /// now points at the returned user.
    pub fn login(&mut self, username: &str, avatar: Option<String>) -> User {
        let wanted = username.to_lowercase();
        let existing = self
            .users
            .iter_mut()
            .find(|u| u.username.to_lowercase() == wanted);

        let user = match existing {
            Some(user) => {
                user.status = UserStatus::Online;
                user.clone()
            }
            None => {
                let user = User {
                    id: Uuid::now_v7().to_string(),
                    username: username.to_string(),
                    avatar: avatar.unwrap_or_else(|| default_avatar(username)),
                    status: UserStatus::Online,
                    last_seen: None,
                    bio: Some("New user".to_string()),
                };
                self.users.push(user.clone());
                user
            }
        };

        info!("login: {} ({})", user.username, user.id);
        self.current_user_id = Some(user.id.clone());
        user
    }

    /// End the session: the user goes offline with a fresh `last_seen`.
    pub fn logout(&mut self) -> Result<(), ChatError> {
        let current_id = self
            .current_user_id
            .take()
            .ok_or(ChatError::NoActiveSession)?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == current_id) {
            user.status = UserStatus::Offline;
            user.last_seen = Some(Utc::now());
            info!("logout: {} ({})", user.username, user.id);
        }
        Ok(())
    }

    /// Merge partial profile fields into the current user's registry entry.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, ChatError> {
        let current_id = self
            .current_user_id
            .clone()
            .ok_or(ChatError::NoActiveSession)?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == current_id)
            .ok_or(ChatError::NoActiveSession)?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        if let Some(status) = update.status {
            user.status = status;
        }
        debug!("profile updated: {}", user.id);
        Ok(user.clone())
    }

    /// Restore a persisted session (startup path). The user must already be
    /// in the registry; unknown ids are ignored.
    pub fn restore_session(&mut self, user: User) {
        if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
            *slot = user.clone();
        } else {
            self.users.push(user.clone());
        }
        self.current_user_id = Some(user.id);
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn online_users(&self) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| u.status == UserStatus::Online)
            .cloned()
            .collect()
    }

    pub fn current_user(&self) -> Option<&User> {
        let id = self.current_user_id.as_deref()?;
        self.users.iter().find(|u| u.id == id)
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user_id.is_some()
    }
}

fn default_avatar(username: &str) -> String {
    format!(
        "https://placehold.co/100x100?text={}+profile+photo",
        username.replace(' ', "+")
    )
}
