//! The signed-in operator: bearer token and role.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use neraca_core::auth::{Capability, UnknownRole, UserRole};
use neraca_shared::AppError;
use neraca_shared::config::AuthConfig;

#[derive(Default)]
struct Credentials {
    token: Option<String>,
    role: Option<UserRole>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

/// Session credentials shared by the HTTP client and the controllers.
#[derive(Debug, Default)]
pub struct Session {
    credentials: RwLock<Credentials>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a signed-in user.
    #[must_use]
    pub fn signed_in(token: impl Into<String>, role: UserRole) -> Self {
        Self {
            credentials: RwLock::new(Credentials {
                token: Some(token.into()),
                role: Some(role),
            }),
        }
    }

    /// Builds a session from configured credentials.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRole` if the configured role is not recognised.
    pub fn from_config(config: &AuthConfig) -> Result<Self, UnknownRole> {
        let role = config.role.as_deref().map(str::parse::<UserRole>).transpose()?;
        Ok(Self {
            credentials: RwLock::new(Credentials {
                token: config.token.clone(),
                role,
            }),
        })
    }

    /// The bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(|credentials| credentials.token.clone())
    }

    /// The operator's role, if known.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.read(|credentials| credentials.role)
    }

    /// Replaces the credentials.
    pub fn set(&self, token: Option<String>, role: Option<UserRole>) {
        let mut credentials = self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        credentials.token = token;
        credentials.role = role;
    }

    /// Forgets the credentials.
    pub fn clear(&self) {
        self.set(None, None);
    }

    /// Returns true if a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|credentials| credentials.token.is_some())
    }

    /// Checks that the operator may use `capability`.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` if no role is known
    /// * `AppError::Forbidden` if the role lacks the capability
    pub fn require(&self, capability: Capability) -> Result<UserRole, AppError> {
        let role = self
            .role()
            .ok_or_else(|| AppError::Unauthorized(format!("sign in to {capability}")))?;
        if role.can(capability) {
            Ok(role)
        } else {
            Err(AppError::Forbidden(format!(
                "role {role} is not allowed to {capability}"
            )))
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Credentials) -> T) -> T {
        let credentials = self
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let session = Session::signed_in("token", UserRole::Accountant);
        assert_eq!(
            session.require(Capability::PostBukuBesar),
            Ok(UserRole::Accountant)
        );
        assert_eq!(
            session.require(Capability::CloseNeracaAkhir),
            Err(AppError::Forbidden(
                "role accountant is not allowed to post neraca akhir".into()
            ))
        );
    }

    #[test]
    fn test_require_without_role() {
        let session = Session::new();
        assert!(matches!(
            session.require(Capability::ViewLedger),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let session = Session::from_config(&AuthConfig {
            token: Some("abc".into()),
            role: Some("ADMIN".into()),
        })
        .unwrap();
        assert_eq!(session.role(), Some(UserRole::Admin));
        assert_eq!(session.token().as_deref(), Some("abc"));

        let err = Session::from_config(&AuthConfig {
            token: None,
            role: Some("auditor".into()),
        })
        .unwrap_err();
        assert_eq!(err, UnknownRole("auditor".into()));
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::signed_in("very-secret", UserRole::Viewer);
        let debug = format!("{session:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("Viewer"));
    }

    #[test]
    fn test_clear() {
        let session = Session::signed_in("token", UserRole::Staff);
        assert!(session.is_authenticated());
        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }
}
