//! Administrator curation of leave types.

use crate::{
    error::{WorkflowError, WorkflowResult},
    leave_request::RequestFilter,
    leave_type::{self, LeaveType, LeaveTypeDraft},
    principal::Principal,
    store::{CatalogStore, RequestStore},
    types::LeaveTypeId,
};

#[derive(Clone)]
pub struct LeaveCatalog<C, R> {
    catalog: C,
    requests: R,
}

impl<C, R> LeaveCatalog<C, R>
where
    C: CatalogStore,
    R: RequestStore,
{
    pub fn new(catalog: C, requests: R) -> Self {
        Self { catalog, requests }
    }

    pub async fn list(&self) -> WorkflowResult<Vec<LeaveType>> {
        self.catalog.list_leave_types().await
    }

    pub async fn get(&self, id: &LeaveTypeId) -> WorkflowResult<LeaveType> {
        let catalog = self.list().await?;
        leave_type::resolve(&catalog, id).cloned()
    }

    pub async fn create(
        &self,
        principal: &Principal,
        draft: LeaveTypeDraft,
    ) -> WorkflowResult<LeaveType> {
        principal.require_admin("manage leave types")?;
        let created = self.catalog.create_leave_type(draft).await?;
        log::info!("leave type '{}' created", created.name);
        Ok(created)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: &LeaveTypeId,
        draft: LeaveTypeDraft,
    ) -> WorkflowResult<LeaveType> {
        principal.require_admin("manage leave types")?;
        let updated = self.catalog.update_leave_type(id, draft).await?;
        log::info!("leave type {} updated to '{}'", id, updated.name);
        Ok(updated)
    }

    /// Removes a leave type nobody has requested yet.
    pub async fn delete(&self, principal: &Principal, id: &LeaveTypeId) -> WorkflowResult<()> {
        principal.require_admin("manage leave types")?;
        self.get(id).await?;
        let referencing = self
            .requests
            .list_requests(&RequestFilter::referencing(id.clone()))
            .await?;
        if !referencing.is_empty() {
            return Err(WorkflowError::State(
                "Cannot delete leave type with existing leave requests".to_string(),
            ));
        }
        self.catalog.delete_leave_type(id).await?;
        log::info!("leave type {} deleted", id);
        Ok(())
    }
}
