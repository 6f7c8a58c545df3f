//! Role-specific workspaces, resolved once when a session is established.

use crate::principal::{Principal, Role};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Dashboard sections a workspace renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    LeaveCalendar,
    LeaveRequestForm,
    LeaveHistory,
    LeaveStatistics,
    PendingApprovals,
    LeaveTypes,
    LeaveRequests,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeWorkspace {
    principal: Principal,
}

impl EmployeeWorkspace {
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminWorkspace {
    principal: Principal,
}

impl AdminWorkspace {
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workspace {
    Employee(EmployeeWorkspace),
    Admin(AdminWorkspace),
}

const EMPLOYEE_SECTIONS: &[Section] = &[
    Section::LeaveCalendar,
    Section::LeaveRequestForm,
    Section::LeaveHistory,
];

const ADMIN_SECTIONS: &[Section] = &[
    Section::LeaveStatistics,
    Section::PendingApprovals,
    Section::LeaveTypes,
    Section::LeaveRequests,
];

impl Workspace {
    pub fn resolve(principal: &Principal) -> Self {
        match principal.role {
            Role::Employee => Workspace::Employee(EmployeeWorkspace {
                principal: principal.clone(),
            }),
            Role::Admin => Workspace::Admin(AdminWorkspace {
                principal: principal.clone(),
            }),
        }
    }

    pub fn principal(&self) -> &Principal {
        match self {
            Workspace::Employee(ws) => ws.principal(),
            Workspace::Admin(ws) => ws.principal(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Workspace::Employee(_) => Role::Employee,
            Workspace::Admin(_) => Role::Admin,
        }
    }

    pub fn sections(&self) -> &'static [Section] {
        match self {
            Workspace::Employee(_) => EMPLOYEE_SECTIONS,
            Workspace::Admin(_) => ADMIN_SECTIONS,
        }
    }

    pub fn shows(&self, section: Section) -> bool {
        self.sections().contains(&section)
    }

    pub fn as_admin(&self) -> Option<&AdminWorkspace> {
        match self {
            Workspace::Admin(ws) => Some(ws),
            Workspace::Employee(_) => None,
        }
    }

    pub fn as_employee(&self) -> Option<&EmployeeWorkspace> {
        match self {
            Workspace::Employee(ws) => Some(ws),
            Workspace::Admin(_) => None,
        }
    }

    /// Both roles land on the dashboard, which renders their own sections.
    pub fn landing_path(&self) -> &'static str {
        DASHBOARD_PATH
    }
}

/// Where navigation to `path` must be redirected, if anywhere.
///
/// Signed-out users only reach the login and registration pages; signed-in
/// users skip them and land on their workspace.
pub fn redirect_for(path: &str, workspace: Option<&Workspace>) -> Option<&'static str> {
    let public = path == LOGIN_PATH || path == REGISTER_PATH;
    match workspace {
        None if public => None,
        None => Some(LOGIN_PATH),
        Some(ws) if public || path == "/" => Some(ws.landing_path()),
        Some(_) => None,
    }
}
