use leavedesk_workflow::{
    store::AuthService, AuthGrant, Decision, PendingPrincipal, Principal, PrincipalId,
    Registration, Session, WorkflowResult,
};
use std::rc::Rc;

use crate::api::ApiClient;

#[derive(Clone)]
pub struct HttpDirectory {
    client: Rc<ApiClient>,
}

impl HttpDirectory {
    pub fn new(client: Rc<ApiClient>) -> Self {
        Self { client }
    }
}

impl AuthService for HttpDirectory {
    async fn authenticate(&self, identity: &str, secret: &str) -> WorkflowResult<AuthGrant> {
        let response = self.client.login(identity, secret).await?;
        Ok(AuthGrant {
            principal: Principal::new(identity, response.role),
            token: response.access_token,
        })
    }

    async fn register(&self, registration: &Registration) -> WorkflowResult<PendingPrincipal> {
        let ack = self.client.register(registration).await?;
        if !ack.msg.is_empty() {
            log::debug!("register: {}", ack.msg);
        }
        Ok(PendingPrincipal::new(
            &registration.identity,
            registration.requested_role,
        ))
    }

    async fn logout(&self, session: &Session) -> WorkflowResult<()> {
        self.client.logout(session).await
    }

    async fn list_pending_principals(&self) -> WorkflowResult<Vec<PendingPrincipal>> {
        self.client.pending_users().await
    }

    async fn review_principal(&self, id: &PrincipalId, decision: Decision) -> WorkflowResult<()> {
        self.client.approve_user(id, decision).await.map(|_| ())
    }
}
