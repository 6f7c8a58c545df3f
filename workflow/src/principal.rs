//! Principals, roles, and the account registration lifecycle.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::{
    error::{WorkflowError, WorkflowResult},
    review::{self, Decision, ReviewStatus},
    types::PrincipalId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(alias = "employee")]
    Employee,
    #[serde(alias = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "admin" => Ok(Role::Admin),
            "" => Err(WorkflowError::validation("role", "Please select a role")),
            _ => Err(WorkflowError::validation("role", "Invalid role selected")),
        }
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "email")]
    pub identity: String,
    pub role: Role,
}

impl Principal {
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with an authorization error unless the principal holds `role`.
    pub fn require_role(&self, role: Role, action: &str) -> WorkflowResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(WorkflowError::Authorization(format!(
                "{} role required to {}",
                role, action
            )))
        }
    }

    pub fn require_admin(&self, action: &str) -> WorkflowResult<()> {
        self.require_role(Role::Admin, action)
    }

    pub fn owns(&self, identity: &str) -> bool {
        self.identity.eq_ignore_ascii_case(identity)
    }
}

/// Approval state of a registered account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl ReviewStatus for AccountStatus {
    const PENDING: Self = AccountStatus::Pending;

    fn decided(decision: Decision) -> Self {
        match decision {
            Decision::Approve => AccountStatus::Active,
            Decision::Reject => AccountStatus::Rejected,
        }
    }

    fn subject() -> &'static str {
        "Account"
    }
}

/// A registered account awaiting (or past) administrator approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPrincipal {
    pub id: PrincipalId,
    #[serde(rename = "email")]
    pub identity: String,
    #[serde(rename = "role")]
    pub requested_role: Role,
    #[serde(default)]
    pub status: AccountStatus,
}

impl PendingPrincipal {
    pub fn new(identity: impl Into<String>, requested_role: Role) -> Self {
        Self {
            id: PrincipalId::new(),
            identity: identity.into(),
            requested_role,
            status: AccountStatus::Pending,
        }
    }

    /// Approves or rejects the account. Only administrators may decide, and
    /// only once.
    pub fn review(&self, actor: &Principal, decision: Decision) -> WorkflowResult<Self> {
        actor.require_admin("review registrations")?;
        let status = review::review(self.status, decision)?;
        log::info!(
            "account {} {} by {}",
            self.identity,
            decision.past_tense(),
            actor.identity
        );
        Ok(Self {
            status,
            ..self.clone()
        })
    }

    /// The principal this account authenticates as once approved.
    pub fn principal(&self) -> Option<Principal> {
        match self.status {
            AccountStatus::Active => Some(Principal::new(&self.identity, self.requested_role)),
            _ => None,
        }
    }
}

/// Sign-up form input.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Registration {
    #[serde(rename = "email")]
    #[validate(email(message = "Please enter a valid corporate email address"))]
    pub identity: String,
    #[serde(rename = "password")]
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_strength")
    )]
    pub secret: String,
    #[serde(rename = "role")]
    pub requested_role: Role,
    #[serde(skip)]
    #[validate(custom(function = "validate_terms"))]
    pub accepted_terms: bool,
}

impl Registration {
    /// Builds a registration from raw form values and validates it.
    pub fn parse(
        identity: &str,
        secret: &str,
        requested_role: &str,
        accepted_terms: bool,
    ) -> WorkflowResult<Self> {
        let registration = Self {
            identity: identity.trim().to_string(),
            secret: secret.to_string(),
            requested_role: requested_role.parse()?,
            accepted_terms,
        };
        registration.validate()?;
        Ok(registration)
    }
}

/// Scores a password on length, upper case, lower case, digits and symbols.
pub fn password_strength(secret: &str) -> u8 {
    let checks = [
        secret.chars().count() >= 8,
        secret.chars().any(|c| c.is_ascii_uppercase()),
        secret.chars().any(|c| c.is_ascii_lowercase()),
        secret.chars().any(|c| c.is_ascii_digit()),
        secret.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|passed| **passed).count() as u8
}

fn validate_password_strength(secret: &str) -> Result<(), ValidationError> {
    if password_strength(secret) < 3 {
        return Err(ValidationError::new("password_too_weak")
            .with_message(Cow::Borrowed("Password is too weak")));
    }
    Ok(())
}

fn validate_terms(accepted: &bool) -> Result<(), ValidationError> {
    if !*accepted {
        return Err(ValidationError::new("terms_required")
            .with_message(Cow::Borrowed("You must accept the terms and conditions")));
    }
    Ok(())
}
