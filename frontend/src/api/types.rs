use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use leavedesk_workflow::{
    leave_type, Decision, LeaveRequest, LeaveType, LeaveTypeId, PendingPrincipal, PrincipalId,
    RequestId, RequestStatus, Role,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Role,
}

/// Acknowledgement body returned by mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default, alias = "message")]
    pub msg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypesResponse {
    pub leave_types: Vec<LeaveType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypePayload {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyLeaveRequest {
    pub leave_type_id: LeaveTypeId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A leave request as listed by the backend. The admin listing carries the
/// requester's email; the personal history carries a precomputed duration.
/// Both name the leave type rather than its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestRecord {
    pub id: RequestId,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub leave_type_id: Option<LeaveTypeId>,
    #[serde(default)]
    pub leave_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub duration: Option<i64>,
}

impl LeaveRequestRecord {
    /// Converts to the domain type, resolving the leave type by name against
    /// `catalog` when the record carries no id.
    pub fn into_leave_request(self, requester: &str, catalog: &[LeaveType]) -> LeaveRequest {
        let leave_type_id = match (self.leave_type_id, self.leave_type.as_deref()) {
            (Some(id), _) => id,
            (None, Some(name)) => match leave_type::lookup_by_name(catalog, name) {
                Some(found) => found.id.clone(),
                None => {
                    log::warn!("leave request {} names unknown leave type '{}'", self.id, name);
                    LeaveTypeId::from(name)
                }
            },
            (None, None) => LeaveTypeId::from("unknown"),
        };
        LeaveRequest {
            id: self.id,
            requester: self.user_email.unwrap_or_else(|| requester.to_string()),
            leave_type_id,
            leave_type_name: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            created_at: self.created_at,
            version: self.version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveHistoryResponse {
    pub leave_history: Vec<LeaveRequestRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLeaveRequest {
    pub leave_request_id: RequestId,
    pub action: Decision,
    pub expected_status: RequestStatus,
    pub expected_version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingUsersResponse {
    pub pending_users: Vec<PendingPrincipal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveUserRequest {
    pub user_id: PrincipalId,
    pub action: Decision,
}

/// Error body. Accepts both `{"msg": ..}` and `{"error": .., "code": ..}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(alias = "msg")]
    pub error: String,
    #[serde(default)]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl ApiError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "UNKNOWN".to_string(),
            details: None,
        }
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            code: "REQUEST_FAILED".to_string(),
            details: None,
        }
    }

    /// Form field named in `details.field`, if the server reported one.
    pub fn field(&self) -> Option<&str> {
        self.details.as_ref()?.get("field")?.as_str()
    }
}

/// Parses RFC 3339 timestamps, or naive ISO timestamps which are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
}
