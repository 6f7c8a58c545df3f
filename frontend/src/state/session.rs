use chrono::{DateTime, Utc};
use leavedesk_workflow::{Accounts, Session, WorkflowError, WorkflowResult, Workspace};
use leptos::*;
use std::rc::Rc;

use crate::{
    repository::HttpDirectory,
    utils::storage::{default_storage, read_json, write_json, KeyValueStorage},
};

pub const SESSION_STORAGE_KEY: &str = "leavedesk.session";

/// Persists the signed-in session between page loads.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(default_storage())
    }
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The stored session if it is still valid at `now`. Expired or
    /// unreadable sessions are removed.
    pub fn load(&self, now: DateTime<Utc>) -> WorkflowResult<Option<Session>> {
        let Some(session) = read_json::<Session>(self.storage.as_ref(), SESSION_STORAGE_KEY)?
        else {
            return Ok(None);
        };
        match session.validate(now) {
            Ok(session) => Ok(Some(session)),
            Err(_) => {
                log::info!("stored session expired, signing out");
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.load(Utc::now()).ok().flatten()
    }

    pub fn save(&self, session: &Session) -> WorkflowResult<()> {
        write_json(self.storage.as_ref(), SESSION_STORAGE_KEY, session)
    }

    pub fn clear(&self) -> WorkflowResult<()> {
        self.storage.remove_item(SESSION_STORAGE_KEY)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn workspace(&self) -> Option<Workspace> {
        self.session.as_ref().map(Session::workspace)
    }
}

type SessionContext = (ReadSignal<SessionState>, WriteSignal<SessionState>);

/// Restores any stored session and shares the signals with descendants.
pub fn provide_session_context(sessions: &SessionStore) -> SessionContext {
    let restored = sessions.load(Utc::now()).unwrap_or_else(|err| {
        log::warn!("failed to restore session: {}", err);
        None
    });
    let ctx = create_signal(SessionState {
        session: restored,
        loading: false,
    });
    provide_context::<SessionContext>(ctx);
    ctx
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(|| create_signal(SessionState::default()))
}

pub async fn login_request(
    identity: &str,
    secret: &str,
    accounts: &Accounts<HttpDirectory>,
    sessions: &SessionStore,
    set_state: WriteSignal<SessionState>,
) -> Result<(), WorkflowError> {
    set_state.update(|state| state.loading = true);

    let result = accounts.authenticate(identity, secret).await;
    let result = result.and_then(|session| sessions.save(&session).map(|_| session));
    match result {
        Ok(session) => {
            set_state.update(|state| {
                state.session = Some(session);
                state.loading = false;
            });
            Ok(())
        }
        Err(error) => {
            set_state.update(|state| state.loading = false);
            Err(error)
        }
    }
}

/// Ends the session. The local copy is always discarded, even when the
/// server cannot be reached.
pub async fn logout(
    accounts: &Accounts<HttpDirectory>,
    sessions: &SessionStore,
    set_state: WriteSignal<SessionState>,
) {
    if let Some(session) = sessions.current() {
        accounts.logout(&session).await;
    }
    if let Err(err) = sessions.clear() {
        log::warn!("failed to clear session: {}", err);
    }
    set_state.update(|state| {
        state.session = None;
        state.loading = false;
    });
}

/// Slides the session expiry forward after user activity.
pub fn touch(
    accounts: &Accounts<HttpDirectory>,
    sessions: &SessionStore,
    set_state: WriteSignal<SessionState>,
) -> WorkflowResult<()> {
    let Some(mut session) = sessions.current() else {
        set_state.update(|state| state.session = None);
        return Err(WorkflowError::Authentication(
            "Session expired, please log in again".to_string(),
        ));
    };
    accounts.refresh(&mut session)?;
    sessions.save(&session)?;
    set_state.update(|state| state.session = Some(session));
    Ok(())
}
