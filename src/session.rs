use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{AuthResponse, Profile};
use crate::storage::{StorageError, StorageHandle};

/// Storage keys used by the portal. They match the keys the earlier browser client
/// wrote, so a partition can be inspected with the same names.
pub mod keys {
    pub const TOKEN: &str = "userToken";
    pub const ROLE: &str = "userRole";
    pub const USER_ID: &str = "userId";
    pub const PROFILE: &str = "user";

    pub const ALL: [&str; 4] = [TOKEN, ROLE, USER_ID, PROFILE];
}

/// Role
///
/// The closed set of roles that own a navigation shell. Labels are matched exactly
/// and case-sensitively; anything else is "no role".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Employee,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::User];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ADMIN" => Some(Self::Admin),
            "EMPLOYEE" => Some(Self::Employee),
            "USER" => Some(Self::User),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Employee => "EMPLOYEE",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session
///
/// What a client partition currently holds. Any of the fields may be absent.
/// The token is opaque and never verified here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub credential_token: Option<String>,
    /// Raw role label, kept even when it is not a known role.
    pub role: Option<String>,
    pub user_id: Option<i64>,
    pub profile: Option<Profile>,
}

impl Session {
    /// True when a credential token is present. This is the only check the route
    /// guard performs.
    pub fn is_authenticated(&self) -> bool {
        self.credential_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// The parsed role, `None` for an absent or unrecognized label.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::from_label)
    }

    pub fn is_empty(&self) -> bool {
        self == &Session::default()
    }
}

/// NewSession
///
/// The four fields written together when a session is established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub credential_token: String,
    pub role: String,
    pub user_id: i64,
    pub profile: Profile,
}

impl From<AuthResponse> for NewSession {
    fn from(response: AuthResponse) -> Self {
        Self {
            credential_token: response.token,
            role: response.user.role.unwrap_or_default(),
            user_id: response.user.id,
            profile: response.user.profile,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write the session: {0}")]
    Write(#[from] StorageError),
    #[error("session could not be read back after writing")]
    Unverified,
    #[error("failed to encode the profile snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// SessionStore
///
/// The explicit read/write API over one client partition. It is constructed per
/// request from the partition and handed to whichever component needs it; nothing
/// reaches for session state through a global.
///
/// Only login, registration, logout, forced logout and the account-update handler
/// write through it. The guard and the dispatcher only call `get`.
#[derive(Clone)]
pub struct SessionStore {
    storage: StorageHandle,
}

impl SessionStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    /// set
    ///
    /// Writes all four fields as one storage batch, so no reader ever sees a token
    /// without its role. The write is all-or-nothing: if the batch is refused, or
    /// the token cannot be read back afterwards, every field is removed again and
    /// the caller must treat the session as not established.
    pub fn set(&self, session: &NewSession) -> Result<(), SessionError> {
        let profile = serde_json::to_string(&session.profile)?;
        let user_id = session.user_id.to_string();
        let fields = [
            (keys::TOKEN, session.credential_token.as_str()),
            (keys::ROLE, session.role.as_str()),
            (keys::USER_ID, user_id.as_str()),
            (keys::PROFILE, profile.as_str()),
        ];

        if let Err(source) = self.storage.set_items(&fields) {
            warn!(error = %source, "session write failed, rolling back");
            self.clear();
            return Err(SessionError::Write(source));
        }

        if self.storage.get_item(keys::TOKEN).as_deref() != Some(session.credential_token.as_str()) {
            warn!("session token did not read back, rolling back");
            self.clear();
            return Err(SessionError::Unverified);
        }

        info!(user_id = session.user_id, role = %session.role, "session established");
        Ok(())
    }

    /// get
    ///
    /// Reads the current fields from one consistent view. Never fails: an
    /// unparsable user id or profile is reported as absent.
    pub fn get(&self) -> Session {
        let [token, role, user_id, profile] = self.read_all();
        Session {
            credential_token: token,
            role,
            user_id: user_id.and_then(|raw| raw.trim().parse().ok()),
            profile: profile.and_then(|raw| serde_json::from_str(&raw).ok()),
        }
    }

    fn read_all(&self) -> [Option<String>; 4] {
        let mut values = self.storage.get_items(&keys::ALL).into_iter();
        std::array::from_fn(|_| values.next().flatten())
    }

    /// clear
    ///
    /// Removes all four fields in one batch. Calling it on an empty partition is a
    /// no-op.
    pub fn clear(&self) {
        self.storage.remove_items(&keys::ALL);
        debug!("session cleared");
    }

    /// Replaces the cached profile snapshot after a successful account update.
    pub fn update_profile(&self, profile: &Profile) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(profile)?;
        self.storage.set_item(keys::PROFILE, &encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels_are_case_sensitive() {
        assert_eq!(Role::from_label("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_label("admin"), None);
        assert_eq!(Role::from_label(""), None);
        for role in Role::ALL {
            assert_eq!(Role::from_label(role.label()), Some(role));
        }
    }

    #[test]
    fn unknown_role_label_is_kept_raw() {
        let session = Session {
            credential_token: Some("t1".into()),
            role: Some("GUEST".into()),
            user_id: Some(7),
            profile: None,
        };
        assert!(session.is_authenticated());
        assert_eq!(session.role(), None);
        assert_eq!(session.role.as_deref(), Some("GUEST"));
    }
}
