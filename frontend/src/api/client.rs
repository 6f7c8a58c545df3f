use leavedesk_workflow::{Session, WorkflowError, WorkflowResult};
use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::types::{ApiError, ApiMessage},
    config,
    state::session::SessionStore,
};

pub const LOGIN_PATH: &str = "/login";

/// Which credentials a request carries.
#[derive(Clone, Copy)]
pub enum Auth<'a> {
    Anonymous,
    /// The stored session; fails locally when nobody is signed in.
    Current,
    Session(&'a Session),
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    sessions: SessionStore,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            sessions: SessionStore::default(),
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
            sessions: SessionStore::default(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.trim_end_matches('/').to_string()
        } else {
            config::await_api_base_url().await
        }
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    fn current_bearer(&self) -> WorkflowResult<String> {
        self.sessions
            .current()
            .map(|session| session.bearer())
            .ok_or_else(|| WorkflowError::Authentication("Please log in to continue".to_string()))
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
    ) -> WorkflowResult<RequestBuilder> {
        let url = format!("{}{}", self.resolved_base_url().await, path);
        let builder = self.http_client().request(method, url);
        Ok(match auth {
            Auth::Anonymous => builder,
            Auth::Current => builder.header(AUTHORIZATION, self.current_bearer()?),
            Auth::Session(session) => builder.header(AUTHORIZATION, session.bearer()),
        })
    }

    /// Sends the request and turns non-success statuses into workflow errors.
    pub(crate) async fn execute(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> WorkflowResult<Response> {
        let response = request.send().await.map_err(|err| {
            log::warn!("request to {} failed: {}", path, err);
            WorkflowError::Network(format!("Request failed: {}", err))
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ApiError>().await.unwrap_or_else(|_| {
            ApiError::request_failed(format!("Request failed with status {}", status))
        });
        Err(self.map_error_status(path, status, body))
    }

    fn map_error_status(&self, path: &str, status: StatusCode, body: ApiError) -> WorkflowError {
        log::debug!("{} returned {}: {}", path, status, body);
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let field = body.field().unwrap_or("form").to_string();
                WorkflowError::validation(field, body.error)
            }
            StatusCode::UNAUTHORIZED => {
                self.clear_auth_session();
                WorkflowError::Authentication(body.error)
            }
            // The login endpoint answers 403 for accounts awaiting approval.
            StatusCode::FORBIDDEN if path == LOGIN_PATH => WorkflowError::Authentication(body.error),
            StatusCode::FORBIDDEN => WorkflowError::Authorization(body.error),
            StatusCode::NOT_FOUND => WorkflowError::NotFound(body.error),
            StatusCode::CONFLICT => WorkflowError::State(body.error),
            _ => WorkflowError::Network(body.error),
        }
    }

    fn clear_auth_session(&self) {
        if let Err(err) = self.sessions.clear() {
            log::warn!("failed to clear session: {}", err);
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth<'_>,
    ) -> WorkflowResult<T> {
        let request = self.request(Method::GET, path, auth).await?;
        let response = self.execute(path, request).await?;
        parse_json(response).await
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> WorkflowResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path, auth).await?.json(body);
        let response = self.execute(path, request).await?;
        parse_json(response).await
    }

    /// Like [`send_json`](Self::send_json) for endpoints that only acknowledge.
    pub(crate) async fn send_for_message<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth<'_>,
    ) -> WorkflowResult<ApiMessage>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method, path, auth).await?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.execute(path, request).await?;
        let text = response
            .text()
            .await
            .map_err(|err| WorkflowError::Network(format!("Failed to read response: {}", err)))?;
        if text.trim().is_empty() {
            return Ok(ApiMessage::default());
        }
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> WorkflowResult<T> {
    response
        .json()
        .await
        .map_err(|err| WorkflowError::Network(format!("Failed to parse response: {}", err)))
}
