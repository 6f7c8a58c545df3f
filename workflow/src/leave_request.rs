//! Leave request entity and its approval lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::{FieldError, WorkflowError, WorkflowResult},
    leave_type::LeaveType,
    principal::Principal,
    review::{self, Decision, ReviewStatus},
    types::{LeaveTypeId, RequestId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RequestStatus {
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "approved")]
    Approved,
    #[serde(alias = "rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReviewStatus for RequestStatus {
    const PENDING: Self = RequestStatus::Pending;

    fn decided(decision: Decision) -> Self {
        match decision {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }

    fn subject() -> &'static str {
        "Leave request"
    }
}

/// Inclusive number of calendar days between two dates.
pub fn duration_days(start_date: NaiveDate, end_date: NaiveDate) -> i64 {
    (end_date - start_date).num_days() + 1
}

/// Leave request form input before it has been checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequestDraft {
    pub leave_type_id: Option<LeaveTypeId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl LeaveRequestDraft {
    pub fn new(leave_type_id: impl Into<LeaveTypeId>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            leave_type_id: Some(leave_type_id.into()),
            start_date,
            end_date,
        }
    }

    /// Parses raw form values (`YYYY-MM-DD` dates, leave type id as text).
    pub fn parse(leave_type_id: &str, start_date: &str, end_date: &str) -> WorkflowResult<Self> {
        let mut errors = Vec::new();
        let start = parse_form_date(start_date, "start_date", "Start date", &mut errors);
        let end = parse_form_date(end_date, "end_date", "End date", &mut errors);
        let leave_type_id = match leave_type_id.trim() {
            "" => None,
            id => Some(LeaveTypeId::from(id)),
        };
        match (start, end) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(Self {
                leave_type_id,
                start_date,
                end_date,
            }),
            _ => Err(WorkflowError::Validation(errors)),
        }
    }

    pub fn duration_days(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }
}

fn parse_form_date(
    value: &str,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", label)));
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a date in YYYY-MM-DD format", label),
            ));
            None
        }
    }
}

/// An employee's claim for time off over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: RequestId,
    pub requester: String,
    pub leave_type_id: LeaveTypeId,
    #[serde(default)]
    pub leave_type_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl LeaveRequest {
    /// Validates `draft` against the catalog snapshot and the requester's
    /// current date, returning a new pending request.
    pub fn create(
        requester: &Principal,
        draft: &LeaveRequestDraft,
        catalog: &[LeaveType],
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> WorkflowResult<LeaveRequest> {
        let mut errors = Vec::new();

        let leave_type = match &draft.leave_type_id {
            None => {
                errors.push(FieldError::new("leave_type_id", "Leave type is required"));
                None
            }
            Some(id) => {
                let found = catalog.iter().find(|lt| &lt.id == id);
                if found.is_none() {
                    errors.push(FieldError::new(
                        "leave_type_id",
                        "Selected leave type does not exist",
                    ));
                }
                found
            }
        };
        if draft.start_date < today {
            errors.push(FieldError::new(
                "start_date",
                "Start date cannot be in the past",
            ));
        }
        if draft.end_date < draft.start_date {
            errors.push(FieldError::new(
                "end_date",
                "End date must be on or after the start date",
            ));
        }

        let leave_type = match leave_type {
            Some(lt) if errors.is_empty() => lt,
            _ => return Err(WorkflowError::Validation(errors)),
        };

        Ok(LeaveRequest {
            id: RequestId::new(),
            requester: requester.identity.clone(),
            leave_type_id: leave_type.id.clone(),
            leave_type_name: Some(leave_type.name.clone()),
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: RequestStatus::Pending,
            created_at: now,
            version: 0,
        })
    }

    /// Applies an administrator's decision. Requests are decided exactly once
    /// and never by their own requester.
    pub fn transition(&self, actor: &Principal, decision: Decision) -> WorkflowResult<LeaveRequest> {
        actor.require_admin("review leave requests")?;
        if actor.owns(&self.requester) {
            return Err(WorkflowError::Authorization(
                "You cannot review your own leave request".to_string(),
            ));
        }
        let status = review::review(self.status, decision)?;
        log::info!(
            "leave request {} {} by {}",
            self.id,
            decision.past_tense(),
            actor.identity
        );
        Ok(LeaveRequest {
            status,
            version: self.version + 1,
            ..self.clone()
        })
    }

    pub fn duration(&self) -> i64 {
        duration_days(self.start_date, self.end_date)
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }
}

/// Read-only projection over stored requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub requester: Option<String>,
    pub status: Option<RequestStatus>,
    pub leave_type_id: Option<LeaveTypeId>,
}

impl RequestFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_requester(identity: impl Into<String>) -> Self {
        Self {
            requester: Some(identity.into()),
            ..Self::default()
        }
    }

    pub fn pending() -> Self {
        Self::with_status(RequestStatus::Pending)
    }

    pub fn with_status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn referencing(leave_type_id: LeaveTypeId) -> Self {
        Self {
            leave_type_id: Some(leave_type_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        self.requester
            .as_deref()
            .map_or(true, |r| r.eq_ignore_ascii_case(&request.requester))
            && self.status.map_or(true, |s| s == request.status)
            && self
                .leave_type_id
                .as_ref()
                .map_or(true, |id| id == &request.leave_type_id)
    }

    pub fn apply<'a, I>(&self, requests: I) -> Vec<LeaveRequest>
    where
        I: IntoIterator<Item = &'a LeaveRequest>,
    {
        requests
            .into_iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Vec<LeaveType> {
        vec![LeaveType {
            id: LeaveTypeId::from(2),
            name: "Sick Leave".into(),
            description: None,
        }]
    }

    fn employee() -> Principal {
        Principal::new("worker@corp.com", Role::Employee)
    }

    fn admin() -> Principal {
        Principal::new("boss@corp.com", Role::Admin)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
    }

    fn submitted() -> LeaveRequest {
        let draft = LeaveRequestDraft::new(2, date(2024, 6, 10), date(2024, 6, 14));
        LeaveRequest::create(&employee(), &draft, &catalog(), date(2024, 6, 1), now()).unwrap()
    }

    #[test]
    fn duration_is_inclusive() {
        assert_eq!(duration_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
        assert_eq!(duration_days(date(2024, 1, 1), date(2024, 1, 10)), 10);
        // spans the March DST switch in most zones
        assert_eq!(duration_days(date(2024, 3, 30), date(2024, 4, 1)), 3);
    }

    #[test]
    fn create_yields_pending_request() {
        let request = submitted();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.duration(), 5);
        assert_eq!(request.requester, "worker@corp.com");
        assert_eq!(request.leave_type_name.as_deref(), Some("Sick Leave"));
        assert_eq!(request.created_at, now());
        assert_eq!(request.version, 0);
    }

    #[test]
    fn create_accepts_start_today() {
        let draft = LeaveRequestDraft::new(2, date(2024, 6, 1), date(2024, 6, 1));
        let request =
            LeaveRequest::create(&employee(), &draft, &catalog(), date(2024, 6, 1), now()).unwrap();
        assert_eq!(request.duration(), 1);
    }

    #[test]
    fn create_rejects_end_before_start() {
        let draft = LeaveRequestDraft::new(2, date(2024, 6, 14), date(2024, 6, 10));
        let err = LeaveRequest::create(&employee(), &draft, &catalog(), date(2024, 6, 1), now())
            .unwrap_err();
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "end_date");
    }

    #[test]
    fn create_rejects_past_start_and_unknown_type() {
        let draft = LeaveRequestDraft::new(9, date(2024, 5, 30), date(2024, 6, 2));
        let err = LeaveRequest::create(&employee(), &draft, &catalog(), date(2024, 6, 1), now())
            .unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["leave_type_id", "start_date"]);
    }

    #[test]
    fn create_requires_leave_type() {
        let draft = LeaveRequestDraft::parse("", "2024-06-10", "2024-06-11").unwrap();
        let err = LeaveRequest::create(&employee(), &draft, &catalog(), date(2024, 6, 1), now())
            .unwrap_err();
        assert_eq!(err.user_message(), "Leave type is required");
    }

    #[test]
    fn draft_parse_reports_each_bad_date() {
        let err = LeaveRequestDraft::parse("2", "", "14/06/2024").unwrap_err();
        let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["start_date", "end_date"]);

        let draft = LeaveRequestDraft::parse(" 2 ", "2024-06-10", "2024-06-14").unwrap();
        assert_eq!(draft.leave_type_id, Some(LeaveTypeId::from(2)));
        assert_eq!(draft.duration_days(), 5);
    }

    #[test]
    fn approve_then_reject_fails_with_state_error() {
        let request = submitted();
        let approved = request.transition(&admin(), Decision::Approve).unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.version, 1);

        let err = approved.transition(&admin(), Decision::Reject).unwrap_err();
        assert!(matches!(err, WorkflowError::State(_)));
        assert_eq!(approved.status, RequestStatus::Approved);
    }

    #[test]
    fn non_admin_cannot_transition() {
        let request = submitted();
        let peer = Principal::new("peer@corp.com", Role::Employee);
        for decision in [Decision::Approve, Decision::Reject] {
            let err = request.transition(&peer, decision).unwrap_err();
            assert!(matches!(err, WorkflowError::Authorization(_)));
        }
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[test]
    fn admin_cannot_review_own_request() {
        let boss = admin();
        let draft = LeaveRequestDraft::new(2, date(2024, 6, 10), date(2024, 6, 11));
        let own = LeaveRequest::create(&boss, &draft, &catalog(), date(2024, 6, 1), now()).unwrap();
        let err = own.transition(&boss, Decision::Approve).unwrap_err();
        assert!(matches!(err, WorkflowError::Authorization(_)));
    }

    #[test]
    fn filters_project_by_requester_and_status() {
        let mine = submitted();
        let other = LeaveRequest {
            id: RequestId::new(),
            requester: "other@corp.com".into(),
            ..submitted()
        }
        .transition(&admin(), Decision::Reject)
        .unwrap();
        let all = vec![mine.clone(), other.clone()];

        assert_eq!(RequestFilter::all().apply(&all).len(), 2);
        assert_eq!(
            RequestFilter::for_requester("WORKER@corp.com").apply(&all),
            vec![mine.clone()]
        );
        assert_eq!(RequestFilter::pending().apply(&all), vec![mine]);
        assert_eq!(
            RequestFilter::with_status(RequestStatus::Rejected).apply(&all),
            vec![other]
        );
        assert!(RequestFilter::referencing(LeaveTypeId::from(5))
            .apply(&all)
            .is_empty());
    }

    #[test]
    fn status_accepts_lowercase_wire_values() {
        let status: RequestStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, RequestStatus::Approved);
        assert_eq!(
            serde_json::to_value(RequestStatus::Pending).unwrap(),
            serde_json::json!("Pending")
        );
    }
}
