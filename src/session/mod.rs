//! Session context.
//!
//! Holds the signed-in user and the theme preference. Sign-in is mocked: a user record is
//! created locally and kept in local storage until sign-out. Persistence goes through
//! [`SessionStore`] so a real auth provider can replace it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::MemberRole;
use crate::storage::{load_json, save_json, LocalStorage};

pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Colour theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Where session state is persisted.
pub trait SessionStore: Send + Sync {
    fn load_user(&self) -> Result<Option<User>, AppError>;
    fn save_user(&self, user: &User) -> Result<(), AppError>;
    fn clear_user(&self) -> Result<(), AppError>;
    fn load_theme(&self) -> Result<Option<Theme>, AppError>;
    fn save_theme(&self, theme: Theme) -> Result<(), AppError>;
}

/// [`SessionStore`] over local storage, using the `user` and `theme` keys.
#[derive(Clone)]
pub struct LocalSessionStore {
    storage: Arc<dyn LocalStorage>,
}

impl LocalSessionStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }
}

impl SessionStore for LocalSessionStore {
    fn load_user(&self) -> Result<Option<User>, AppError> {
        load_json(self.storage.as_ref(), USER_KEY)
    }

    fn save_user(&self, user: &User) -> Result<(), AppError> {
        save_json(self.storage.as_ref(), USER_KEY, user)
    }

    fn clear_user(&self) -> Result<(), AppError> {
        self.storage.remove_item(USER_KEY)
    }

    fn load_theme(&self) -> Result<Option<Theme>, AppError> {
        load_json(self.storage.as_ref(), THEME_KEY)
    }

    fn save_theme(&self, theme: Theme) -> Result<(), AppError> {
        save_json(self.storage.as_ref(), THEME_KEY, &theme)
    }
}

/// Explicit session context passed to whatever needs the current user.
pub struct Session {
    store: Box<dyn SessionStore>,
    user: Option<User>,
    theme: Theme,
}

impl Session {
    /// Restore the session from its store.
    pub fn init(store: impl SessionStore + 'static) -> Result<Self, AppError> {
        let user = store.load_user()?;
        let theme = store.load_theme()?.unwrap_or_default();

        match &user {
            Some(user) => tracing::info!("Restored session for {}", user.name),
            None => tracing::debug!("No stored session"),
        }

        Ok(Self {
            store: Box::new(store),
            user,
            theme,
        })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Leaders and admins can manage records.
    pub fn is_admin(&self) -> bool {
        matches!(
            self.user.as_ref().map(|u| u.role),
            Some(MemberRole::Admin | MemberRole::Leader)
        )
    }

    pub fn sign_in(&mut self, user: User) -> Result<&User, AppError> {
        self.store.save_user(&user)?;
        tracing::info!("Signed in as {} ({})", user.name, user.role.as_str());
        Ok(&*self.user.insert(user))
    }

    /// Sign in a locally created user with a fresh id.
    pub fn sign_in_mock(&mut self, name: &str, role: MemberRole) -> Result<&User, AppError> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            role,
            email: None,
        };
        self.sign_in(user)
    }

    pub fn sign_out(&mut self) -> Result<(), AppError> {
        self.store.clear_user()?;
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user.name);
        }
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), AppError> {
        self.store.save_theme(theme)?;
        self.theme = theme;
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, AppError> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}
