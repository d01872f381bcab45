//! Caller authentication and role checks.
//!
//! Every request is attributed to a [`Caller`]: either anonymous (no
//! `Authorization` header) or a principal proven by a signed caller token.
//! Authenticated principals are registered on first contact; the first one
//! ever seen becomes admin.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use linkshelf_shared::auth::CallerToken;
use linkshelf_shared::{Principal, UserRole};
use linkshelf_store::Database;

use crate::api::AppState;
use crate::error::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Authenticated(Principal),
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Caller::Anonymous);
        };

        let value = value
            .to_str()
            .map_err(|_| ServerError::Unauthorized("Malformed authorization header".into()))?;

        let token = CallerToken::parse_header_value(value)?;
        let principal = token.verify(
            chrono::Utc::now().timestamp(),
            state.config.auth_max_skew_secs,
        )?;

        Ok(Caller::Authenticated(principal))
    }
}

impl Caller {
    /// Role of the caller, registering authenticated principals on the way.
    pub fn role(&self, db: &Database) -> Result<UserRole, ServerError> {
        match self {
            Caller::Anonymous => Ok(UserRole::Guest),
            Caller::Authenticated(principal) => Ok(db.register_account(principal)?),
        }
    }

    /// The caller's principal, provided it holds the `user` permission
    /// (role `user` or `admin`).
    pub fn require_user(&self, db: &Database) -> Result<Principal, ServerError> {
        let Caller::Authenticated(principal) = self else {
            return Err(ServerError::Unauthorized("Authentication required".into()));
        };

        if !db.register_account(principal)?.is_user() {
            tracing::debug!(principal = %principal.short(), "guest denied");
            return Err(ServerError::Forbidden("Only users can perform this action".into()));
        }
        Ok(*principal)
    }

    pub fn require_admin(&self, db: &Database) -> Result<Principal, ServerError> {
        let principal = self.require_user(db)?;
        if self.role(db)? != UserRole::Admin {
            return Err(ServerError::Forbidden("Only admins can perform this action".into()));
        }
        Ok(principal)
    }
}
