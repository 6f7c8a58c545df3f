//! Workflow services wired to the HTTP stores.

use leavedesk_workflow::{Accounts, Clock, LeaveCatalog, LeaveRequests};
use leptos::*;
use std::rc::Rc;

use crate::{
    api::ApiClient,
    config::AppConfig,
    repository::{HttpCatalogStore, HttpDirectory, HttpRequestStore},
    state::session::SessionStore,
};

#[derive(Clone)]
pub struct AppServices {
    pub client: Rc<ApiClient>,
    pub requests: LeaveRequests<HttpRequestStore, HttpCatalogStore>,
    pub catalog: LeaveCatalog<HttpCatalogStore, HttpRequestStore>,
    pub accounts: Accounts<HttpDirectory>,
}

impl AppServices {
    pub fn new(client: ApiClient, config: &AppConfig) -> Self {
        let client = Rc::new(client);
        let request_store = HttpRequestStore::new(client.clone());
        let catalog_store = HttpCatalogStore::new(client.clone());
        let clock = Clock::system(config.time_zone);
        Self {
            requests: LeaveRequests::new(request_store.clone(), catalog_store.clone(), clock),
            catalog: LeaveCatalog::new(catalog_store, request_store),
            accounts: Accounts::new(
                HttpDirectory::new(client.clone()),
                config.session_policy,
                clock,
            ),
            client,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        self.client.sessions()
    }
}

pub fn provide_app_services(services: AppServices) {
    provide_context(services);
}

pub fn use_app_services() -> Option<AppServices> {
    use_context::<AppServices>()
}
