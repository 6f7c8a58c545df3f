use leavedesk_workflow::{
    leave_type, store::CatalogStore, LeaveType, LeaveTypeDraft, LeaveTypeId, WorkflowError,
    WorkflowResult,
};
use std::rc::Rc;

use crate::api::ApiClient;

#[derive(Clone)]
pub struct HttpCatalogStore {
    client: Rc<ApiClient>,
}

impl HttpCatalogStore {
    pub fn new(client: Rc<ApiClient>) -> Self {
        Self { client }
    }
}

impl CatalogStore for HttpCatalogStore {
    async fn list_leave_types(&self) -> WorkflowResult<Vec<LeaveType>> {
        self.client.list_leave_types().await
    }

    // The backend only acknowledges writes, so the stored entry is read back.
    async fn create_leave_type(&self, draft: LeaveTypeDraft) -> WorkflowResult<LeaveType> {
        self.client.create_leave_type(&draft).await?;
        let catalog = self.list_leave_types().await?;
        catalog
            .iter()
            .rev()
            .find(|lt| lt.name == draft.name)
            .or_else(|| leave_type::lookup_by_name(&catalog, &draft.name))
            .cloned()
            .ok_or_else(|| {
                WorkflowError::NotFound(format!("Leave type '{}' was not saved", draft.name))
            })
    }

    async fn update_leave_type(
        &self,
        id: &LeaveTypeId,
        draft: LeaveTypeDraft,
    ) -> WorkflowResult<LeaveType> {
        self.client.update_leave_type(id, &draft).await?;
        let catalog = self.list_leave_types().await?;
        leave_type::resolve(&catalog, id).cloned()
    }

    async fn delete_leave_type(&self, id: &LeaveTypeId) -> WorkflowResult<()> {
        self.client.delete_leave_type(id).await.map(|_| ())
    }
}
