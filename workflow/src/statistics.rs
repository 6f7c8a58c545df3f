use serde::{Deserialize, Serialize};

use crate::{
    leave_request::{LeaveRequest, RequestStatus},
    leave_type::LeaveType,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeCount {
    pub name: String,
    pub total_requests: u64,
}

/// Dashboard counters over all leave requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveStatistics {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub approved_requests: u64,
    #[serde(default)]
    pub rejected_requests: u64,
    #[serde(default)]
    pub leave_type_stats: Vec<LeaveTypeCount>,
}

impl LeaveStatistics {
    pub fn from_requests(requests: &[LeaveRequest], catalog: &[LeaveType]) -> Self {
        let count = |status: RequestStatus| {
            requests.iter().filter(|r| r.status == status).count() as u64
        };
        let leave_type_stats = catalog
            .iter()
            .map(|lt| LeaveTypeCount {
                name: lt.name.clone(),
                total_requests: requests
                    .iter()
                    .filter(|r| r.leave_type_id == lt.id)
                    .count() as u64,
            })
            .collect();
        Self {
            total_requests: requests.len() as u64,
            pending_requests: count(RequestStatus::Pending),
            approved_requests: count(RequestStatus::Approved),
            rejected_requests: count(RequestStatus::Rejected),
            leave_type_stats,
        }
    }

    /// Share of all requests, rounded to a whole percent.
    pub fn percentage(&self, part: u64) -> u64 {
        if self.total_requests == 0 {
            return 0;
        }
        ((part as f64 / self.total_requests as f64) * 100.0).round() as u64
    }

    pub fn approved_percentage(&self) -> u64 {
        self.percentage(self.approved_requests)
    }

    pub fn pending_percentage(&self) -> u64 {
        self.percentage(self.pending_requests)
    }

    pub fn rejected_percentage(&self) -> u64 {
        self.percentage(self.rejected_requests)
    }
}
