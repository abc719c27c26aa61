//! Identity / session slice
//!
//! Holds the signed-in user and the session token. This state lives only
//! in memory: the type does not implement `Serialize`, so it can never end
//! up in a persisted snapshot and every restart requires re-authentication.

use super::{ActionName, Slice, SliceName};
use crate::error::FetchError;
use crate::lifecycle::FetchEvent;
use crate::types::User;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityState {
    user: Option<User>,
    session_token: Option<String>,
    loading: bool,
    error: Option<FetchError>,
}

/// What the rendering layer sees of the session; never the token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthView<'a> {
    pub user: Option<&'a User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentityAction {
    SetToken(String),
    SetUser(User),
    LoginSuccess { user: User, token: String },
    Logout,
    SetLoading(bool),
    SetError(String),
    /// `GET /api/me` lifecycle
    FetchMe(FetchEvent<User>),
}

impl ActionName for IdentityAction {
    fn name(&self) -> String {
        match self {
            Self::SetToken(_) => "setToken".into(),
            Self::SetUser(_) => "setUser".into(),
            Self::LoginSuccess { .. } => "loginSuccess".into(),
            Self::Logout => "logout".into(),
            Self::SetLoading(_) => "setLoading".into(),
            Self::SetError(_) => "setError".into(),
            Self::FetchMe(event) => format!("fetchUserMe/{}", event.label()),
        }
    }
}

impl Slice for IdentityState {
    type Action = IdentityAction;
    const NAME: SliceName = SliceName::Identity;

    fn reduce(&mut self, action: IdentityAction, _now: DateTime<Utc>) {
        match action {
            IdentityAction::SetToken(token) => {
                self.session_token = Some(token);
                self.error = None;
            }
            IdentityAction::SetUser(user) => {
                self.user = Some(user);
                self.error = None;
            }
            IdentityAction::LoginSuccess { user, token } => {
                self.user = Some(user);
                self.session_token = Some(token);
                self.loading = false;
                self.error = None;
            }
            IdentityAction::Logout => {
                *self = Self::default();
            }
            IdentityAction::SetLoading(loading) => {
                self.loading = loading;
                if loading {
                    self.error = None;
                }
            }
            IdentityAction::SetError(message) => {
                self.error = Some(FetchError::Failed(message));
                self.loading = false;
            }
            IdentityAction::FetchMe(FetchEvent::Pending) => {
                self.loading = true;
                self.error = None;
            }
            IdentityAction::FetchMe(FetchEvent::Fulfilled(user)) => {
                self.user = Some(user);
                self.loading = false;
                self.error = None;
            }
            IdentityAction::FetchMe(FetchEvent::Rejected(err)) => {
                self.loading = false;
                if err.is_unauthorized() {
                    self.user = None;
                    self.session_token = None;
                }
                self.error = Some(err);
            }
        }
    }
}

impl IdentityState {
    pub fn view(&self) -> AuthView<'_> {
        AuthView {
            user: self.user.as_ref(),
            is_authenticated: self.is_authenticated(),
            loading: self.loading,
            error: self.error.as_ref().map(FetchError::message),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Derived: true exactly when a user is present
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|u| u.id)
    }
}
