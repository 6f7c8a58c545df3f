//! Authenticated sessions with explicit expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::{WorkflowError, WorkflowResult},
    principal::Principal,
    workspace::Workspace,
};

/// Lifetime of the backend's access tokens.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 240;
/// Longest session lifetime a deployment may configure (30 days).
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_SESSION_TTL_MINUTES)
    }
}

impl SessionPolicy {
    /// Clamps `minutes` into the supported range.
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(minutes.clamp(1, MAX_SESSION_TTL_MINUTES)),
        }
    }

    pub fn try_from_minutes(minutes: i64) -> WorkflowResult<Self> {
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
            return Err(WorkflowError::validation(
                "session_ttl_minutes",
                format!(
                    "Session lifetime must be between 1 and {} minutes",
                    MAX_SESSION_TTL_MINUTES
                ),
            ));
        }
        let ttl = Duration::try_minutes(minutes).ok_or_else(|| {
            WorkflowError::validation("session_ttl_minutes", "Session lifetime is out of range")
        })?;
        Ok(Self { ttl })
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> WorkflowResult<DateTime<Utc>> {
        now.checked_add_signed(self.ttl).ok_or_else(|| {
            WorkflowError::State("Session expiry is out of range".to_string())
        })
    }
}

/// What the authentication service hands back for valid credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub principal: Principal,
    pub token: String,
}

impl fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGrant")
            .field("principal", &self.principal)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub principal: Principal,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("principal", &self.principal)
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    pub fn establish(
        grant: AuthGrant,
        policy: &SessionPolicy,
        now: DateTime<Utc>,
    ) -> WorkflowResult<Self> {
        Ok(Self {
            principal: grant.principal,
            token: grant.token,
            issued_at: now,
            expires_at: policy.expiry_from(now)?,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// Slides the expiry forward after activity. Expired sessions cannot be
    /// revived and must authenticate again.
    pub fn refresh(&mut self, policy: &SessionPolicy, now: DateTime<Utc>) -> WorkflowResult<()> {
        if self.is_expired(now) {
            return Err(WorkflowError::Authentication(
                "Session expired, please log in again".to_string(),
            ));
        }
        self.expires_at = self.expires_at.max(policy.expiry_from(now)?);
        Ok(())
    }

    /// Returns the session only while it is still valid.
    pub fn validate(self, now: DateTime<Utc>) -> WorkflowResult<Self> {
        if self.is_expired(now) {
            Err(WorkflowError::Authentication(
                "Session expired, please log in again".to_string(),
            ))
        } else {
            Ok(self)
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::resolve(&self.principal)
    }
}
