//! Sign-in, sign-up and the registration approval queue.

use crate::{
    error::{FieldError, WorkflowError, WorkflowResult},
    principal::{PendingPrincipal, Principal, Registration},
    review::Decision,
    session::{Session, SessionPolicy},
    store::AuthService,
    time::Clock,
};
use validator::Validate;

#[derive(Clone)]
pub struct Accounts<A> {
    auth: A,
    policy: SessionPolicy,
    clock: Clock,
}

impl<A: AuthService> Accounts<A> {
    pub fn new(auth: A, policy: SessionPolicy, clock: Clock) -> Self {
        Self {
            auth,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub async fn authenticate(&self, identity: &str, secret: &str) -> WorkflowResult<Session> {
        let mut missing = Vec::new();
        if identity.trim().is_empty() {
            missing.push(FieldError::new("identity", "Email is required"));
        }
        if secret.is_empty() {
            missing.push(FieldError::new("secret", "Password is required"));
        }
        if !missing.is_empty() {
            return Err(WorkflowError::Validation(missing));
        }

        let grant = self.auth.authenticate(identity.trim(), secret).await?;
        let session = Session::establish(grant, &self.policy, self.clock.now())?;
        log::info!(
            "signed in as {} ({})",
            session.principal.identity,
            session.principal.role
        );
        Ok(session)
    }

    pub async fn register(&self, registration: &Registration) -> WorkflowResult<PendingPrincipal> {
        registration.validate()?;
        let pending = self.auth.register(registration).await?;
        log::info!("registered {}, awaiting admin approval", pending.identity);
        Ok(pending)
    }

    /// Ends the session on the server. Failures are logged and ignored; the
    /// caller always discards its local copy.
    pub async fn logout(&self, session: &Session) {
        if let Err(err) = self.auth.logout(session).await {
            log::warn!("logout failed for {}: {}", session.principal.identity, err);
        }
    }

    /// Extends a live session after activity.
    pub fn refresh(&self, session: &mut Session) -> WorkflowResult<()> {
        session.refresh(&self.policy, self.clock.now())
    }

    pub async fn pending(&self, principal: &Principal) -> WorkflowResult<Vec<PendingPrincipal>> {
        principal.require_admin("list pending accounts")?;
        self.auth.list_pending_principals().await
    }

    pub async fn review(
        &self,
        principal: &Principal,
        account: &PendingPrincipal,
        decision: Decision,
    ) -> WorkflowResult<PendingPrincipal> {
        let decided = account.review(principal, decision)?;
        self.auth.review_principal(&account.id, decision).await?;
        Ok(decided)
    }
}
