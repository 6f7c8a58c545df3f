//! In-process stores backed by mutex-guarded collections.
//!
//! Handles are cheap to clone and share the same underlying data.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{AuthService, CatalogStore, RequestStore};
use crate::{
    error::{WorkflowError, WorkflowResult},
    leave_request::{LeaveRequest, RequestFilter, RequestStatus},
    leave_type::{LeaveType, LeaveTypeDraft},
    principal::{AccountStatus, PendingPrincipal, Registration, Role},
    review::{self, Decision},
    session::{AuthGrant, Session},
    types::{LeaveTypeId, PrincipalId, RequestId},
};

fn lock<T>(mutex: &Mutex<T>) -> WorkflowResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| WorkflowError::State("store lock poisoned".to_string()))
}

#[derive(Clone, Default)]
pub struct MemoryRequestStore {
    inner: Arc<Mutex<Vec<LeaveRequest>>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestStore for MemoryRequestStore {
    async fn create_request(&self, request: LeaveRequest) -> WorkflowResult<LeaveRequest> {
        let mut requests = lock(&self.inner)?;
        if requests.iter().any(|r| r.id == request.id) {
            return Err(WorkflowError::State(format!(
                "Leave request {} already exists",
                request.id
            )));
        }
        requests.push(request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: &RequestId) -> WorkflowResult<LeaveRequest> {
        lock(&self.inner)?
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound("Leave request not found".to_string()))
    }

    async fn list_requests(&self, filter: &RequestFilter) -> WorkflowResult<Vec<LeaveRequest>> {
        let requests = lock(&self.inner)?;
        Ok(filter.apply(requests.iter()))
    }

    async fn update_request_status(
        &self,
        id: &RequestId,
        expected_version: u64,
        status: RequestStatus,
    ) -> WorkflowResult<LeaveRequest> {
        let mut requests = lock(&self.inner)?;
        let stored = requests
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| WorkflowError::NotFound("Leave request not found".to_string()))?;
        if !stored.is_pending() {
            return Err(WorkflowError::State(format!(
                "Leave request has already been {}",
                stored.status.as_str().to_lowercase()
            )));
        }
        if stored.version != expected_version {
            return Err(WorkflowError::State(
                "Leave request was modified by another reviewer".to_string(),
            ));
        }
        stored.status = status;
        stored.version += 1;
        Ok(stored.clone())
    }
}

#[derive(Default)]
struct CatalogInner {
    leave_types: Vec<LeaveType>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<Mutex<CatalogInner>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog with the given names, numbered from 1.
    pub fn with_names(names: &[&str]) -> Self {
        let leave_types: Vec<LeaveType> = names
            .iter()
            .zip(1i64..)
            .map(|(name, id)| LeaveType {
                id: LeaveTypeId::from(id),
                name: name.to_string(),
                description: None,
            })
            .collect();
        let next_id = leave_types.len() as i64;
        Self {
            inner: Arc::new(Mutex::new(CatalogInner {
                leave_types,
                next_id,
            })),
        }
    }
}

impl CatalogStore for MemoryCatalogStore {
    async fn list_leave_types(&self) -> WorkflowResult<Vec<LeaveType>> {
        Ok(lock(&self.inner)?.leave_types.clone())
    }

    async fn create_leave_type(&self, draft: LeaveTypeDraft) -> WorkflowResult<LeaveType> {
        let mut inner = lock(&self.inner)?;
        inner.next_id += 1;
        let leave_type = draft.into_leave_type(LeaveTypeId::from(inner.next_id));
        inner.leave_types.push(leave_type.clone());
        Ok(leave_type)
    }

    async fn update_leave_type(
        &self,
        id: &LeaveTypeId,
        draft: LeaveTypeDraft,
    ) -> WorkflowResult<LeaveType> {
        let mut inner = lock(&self.inner)?;
        let stored = inner
            .leave_types
            .iter_mut()
            .find(|lt| &lt.id == id)
            .ok_or_else(|| WorkflowError::NotFound("Leave type not found".to_string()))?;
        *stored = stored.apply(draft);
        Ok(stored.clone())
    }

    async fn delete_leave_type(&self, id: &LeaveTypeId) -> WorkflowResult<()> {
        let mut inner = lock(&self.inner)?;
        let before = inner.leave_types.len();
        inner.leave_types.retain(|lt| &lt.id != id);
        if inner.leave_types.len() == before {
            return Err(WorkflowError::NotFound("Leave type not found".to_string()));
        }
        Ok(())
    }
}

struct Account {
    record: PendingPrincipal,
    secret_digest: String,
}

#[derive(Default)]
struct DirectoryInner {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    revoked: HashSet<String>,
}

/// Account directory with the same approval rules as the backend: new
/// accounts cannot sign in until an administrator approves them, and rejected
/// accounts are removed.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    inner: Arc<Mutex<DirectoryInner>>,
}

fn digest(identity: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn directory_key(identity: &str) -> String {
    identity.trim().to_ascii_lowercase()
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an already-approved account, e.g. the bootstrap administrator.
    pub fn with_active_account(self, identity: &str, secret: &str, role: Role) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let key = directory_key(identity);
            let mut record = PendingPrincipal::new(identity, role);
            record.status = AccountStatus::Active;
            inner.accounts.insert(
                key.clone(),
                Account {
                    record,
                    secret_digest: digest(&key, secret),
                },
            );
        }
        self
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.revoked.contains(token))
            .unwrap_or(false)
    }
}

impl AuthService for MemoryDirectory {
    async fn authenticate(&self, identity: &str, secret: &str) -> WorkflowResult<AuthGrant> {
        let mut inner = lock(&self.inner)?;
        let key = directory_key(identity);
        let account = inner
            .accounts
            .get(&key)
            .filter(|account| account.secret_digest == digest(&key, secret))
            .ok_or_else(|| WorkflowError::Authentication("Invalid credentials".to_string()))?;
        let principal = account.record.principal().ok_or_else(|| {
            WorkflowError::Authentication("Account not approved by admin".to_string())
        })?;
        let token = Uuid::new_v4().to_string();
        inner.tokens.insert(token.clone(), key);
        Ok(AuthGrant { principal, token })
    }

    async fn register(&self, registration: &Registration) -> WorkflowResult<PendingPrincipal> {
        let mut inner = lock(&self.inner)?;
        let key = directory_key(&registration.identity);
        if inner.accounts.contains_key(&key) {
            return Err(WorkflowError::validation("identity", "User already exists"));
        }
        let record = PendingPrincipal::new(&registration.identity, registration.requested_role);
        inner.accounts.insert(
            key.clone(),
            Account {
                record: record.clone(),
                secret_digest: digest(&key, &registration.secret),
            },
        );
        Ok(record)
    }

    async fn logout(&self, session: &Session) -> WorkflowResult<()> {
        let mut inner = lock(&self.inner)?;
        if inner.tokens.remove(&session.token).is_none() {
            return Err(WorkflowError::Authentication("Token not recognized".to_string()));
        }
        inner.revoked.insert(session.token.clone());
        Ok(())
    }

    async fn list_pending_principals(&self) -> WorkflowResult<Vec<PendingPrincipal>> {
        let inner = lock(&self.inner)?;
        let mut pending: Vec<PendingPrincipal> = inner
            .accounts
            .values()
            .filter(|a| a.record.status == AccountStatus::Pending)
            .map(|a| a.record.clone())
            .collect();
        pending.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(pending)
    }

    async fn review_principal(&self, id: &PrincipalId, decision: Decision) -> WorkflowResult<()> {
        let mut inner = lock(&self.inner)?;
        let key = inner
            .accounts
            .iter()
            .find(|(_, a)| &a.record.id == id)
            .map(|(key, _)| key.clone())
            .ok_or_else(|| WorkflowError::NotFound("User not found".to_string()))?;
        let status = match inner.accounts.get(&key) {
            Some(account) => review::review(account.record.status, decision)?,
            None => return Err(WorkflowError::NotFound("User not found".to_string())),
        };
        match status {
            AccountStatus::Rejected => {
                inner.accounts.remove(&key);
            }
            _ => {
                if let Some(account) = inner.accounts.get_mut(&key) {
                    account.record.status = status;
                }
            }
        }
        Ok(())
    }
}
