#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use leavedesk_workflow::{
    store::{MemoryCatalogStore, MemoryDirectory, MemoryRequestStore},
    Accounts, Clock, LeaveCatalog, LeaveRequests, Principal, Role, SessionPolicy,
};

pub const ADMIN_EMAIL: &str = "admin@leavedesk.test";
pub const ADMIN_PASSWORD: &str = "Admin#2024pass";

pub fn employee() -> Principal {
    Principal::new("employee@leavedesk.test", Role::Employee)
}

pub fn admin() -> Principal {
    Principal::new(ADMIN_EMAIL, Role::Admin)
}

/// Frozen at 2024-06-03 09:00 UTC, a Monday.
pub fn test_clock() -> Clock {
    Clock::frozen(Tz::UTC, Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap())
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct TestDesk {
    pub requests: MemoryRequestStore,
    pub catalog_store: MemoryCatalogStore,
    pub lifecycle: LeaveRequests<MemoryRequestStore, MemoryCatalogStore>,
    pub catalog: LeaveCatalog<MemoryCatalogStore, MemoryRequestStore>,
}

pub fn seed_desk() -> TestDesk {
    let requests = MemoryRequestStore::new();
    let catalog_store =
        MemoryCatalogStore::with_names(&["Annual Leave", "Sick Leave", "Parental Leave"]);
    TestDesk {
        lifecycle: LeaveRequests::new(requests.clone(), catalog_store.clone(), test_clock()),
        catalog: LeaveCatalog::new(catalog_store.clone(), requests.clone()),
        requests,
        catalog_store,
    }
}

pub fn seed_accounts() -> (MemoryDirectory, Accounts<MemoryDirectory>) {
    let directory =
        MemoryDirectory::new().with_active_account(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin);
    let accounts = Accounts::new(directory.clone(), SessionPolicy::default(), test_clock());
    (directory, accounts)
}
