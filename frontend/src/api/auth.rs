use leavedesk_workflow::{Decision, PendingPrincipal, PrincipalId, Registration, Session, WorkflowResult};
use reqwest::Method;

use super::{
    client::{ApiClient, Auth, LOGIN_PATH},
    types::{ApiMessage, ApproveUserRequest, LoginRequest, LoginResponse, PendingUsersResponse},
};

impl ApiClient {
    pub async fn login(&self, identity: &str, secret: &str) -> WorkflowResult<LoginResponse> {
        let request = LoginRequest {
            email: identity.to_string(),
            password: secret.to_string(),
        };
        self.send_json(Method::POST, LOGIN_PATH, &request, Auth::Anonymous)
            .await
    }

    pub async fn register(&self, registration: &Registration) -> WorkflowResult<ApiMessage> {
        self.send_for_message(
            Method::POST,
            "/api/register",
            Some(registration),
            Auth::Anonymous,
        )
        .await
    }

    /// Revokes the token of `session` on the server.
    pub async fn logout(&self, session: &Session) -> WorkflowResult<()> {
        self.send_for_message::<()>(Method::POST, "/api/logout", None, Auth::Session(session))
            .await
            .map(|_| ())
    }

    pub async fn pending_users(&self) -> WorkflowResult<Vec<PendingPrincipal>> {
        let response: PendingUsersResponse = self
            .get_json("/api/admin/pending-users", Auth::Current)
            .await?;
        Ok(response.pending_users)
    }

    pub async fn approve_user(
        &self,
        user_id: &PrincipalId,
        decision: Decision,
    ) -> WorkflowResult<ApiMessage> {
        let body = ApproveUserRequest {
            user_id: user_id.clone(),
            action: decision,
        };
        self.send_for_message(
            Method::POST,
            "/api/admin/approve-user",
            Some(&body),
            Auth::Current,
        )
        .await
    }
}
