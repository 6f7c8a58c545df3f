use chrono::{Duration, NaiveDate, Utc};
use httpmock::prelude::*;
use leavedesk_workflow::{
    AuthGrant, Decision, LeaveRequestDraft, LeaveTypeDraft, LeaveTypeId, Principal,
    Registration, RequestId, RequestStatus, Role, Session, SessionPolicy, WorkflowError,
};
use leptos::*;
use serde_json::json;

use crate::{
    api::ApiClient,
    app::AppServices,
    config::AppConfig,
    state::session::{login_request, logout, SessionState},
};

fn services(server: &MockServer) -> AppServices {
    AppServices::new(
        ApiClient::new_with_base_url(server.base_url()),
        &AppConfig::default(),
    )
}

fn sign_in(services: &AppServices, identity: &str, role: Role) -> Principal {
    let principal = Principal::new(identity, role);
    let session = Session::establish(
        AuthGrant {
            principal: principal.clone(),
            token: format!("tok-{}", role),
        },
        &SessionPolicy::default(),
        Utc::now(),
    )
    .unwrap();
    services.sessions().save(&session).unwrap();
    principal
}

async fn mock_catalog(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/leave-types");
            then.status(200).json_body(json!({
                "leave_types": [
                    { "id": 1, "name": "Annual Leave", "description": "" },
                    { "id": 2, "name": "Sick Leave", "description": "" }
                ]
            }));
        })
        .await;
}

fn future_date(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

#[tokio::test]
async fn employee_submission_reads_back_the_stored_request() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    let start = future_date(7);
    let end = future_date(11);
    let apply = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/employee/apply-leave")
                .header("Authorization", "Bearer tok-Employee")
                .json_body(json!({
                    "leave_type_id": 2,
                    "start_date": start.to_string(),
                    "end_date": end.to_string()
                }));
            then.status(201)
                .json_body(json!({ "msg": "Leave request submitted successfully" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/employee/leave-history");
            then.status(200).json_body(json!({
                "leave_history": [{
                    "id": 41,
                    "leave_type": "Sick Leave",
                    "start_date": start.to_string(),
                    "end_date": end.to_string(),
                    "status": "Pending",
                    "created_at": "2024-06-03T09:00:00.000001",
                    "duration": 5
                }]
            }));
        })
        .await;
    let services = services(&server);
    let employee = sign_in(&services, "e@corp.com", Role::Employee);

    let request = services
        .requests
        .submit(&employee, &LeaveRequestDraft::new(2, start, end))
        .await
        .unwrap();

    apply.assert_async().await;
    assert_eq!(request.id, RequestId::from(41));
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.duration(), 5);
    assert_eq!(request.requester, "e@corp.com");
}

#[tokio::test]
async fn unconfirmed_submission_is_reported_as_an_error() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    let apply = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/employee/apply-leave");
            then.status(201)
                .json_body(json!({ "msg": "Leave request submitted successfully" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/employee/leave-history");
            then.status(200).json_body(json!({ "leave_history": [] }));
        })
        .await;
    let services = services(&server);
    let employee = sign_in(&services, "e@corp.com", Role::Employee);

    let err = services
        .requests
        .submit(
            &employee,
            &LeaveRequestDraft::new(1, future_date(3), future_date(4)),
        )
        .await
        .unwrap_err();

    apply.assert_async().await;
    assert!(matches!(err, WorkflowError::State(_)));
    assert!(err.to_string().contains("could not be confirmed"));
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_server() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    let apply = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/employee/apply-leave");
            then.status(201).json_body(json!({}));
        })
        .await;
    let services = services(&server);
    let employee = sign_in(&services, "e@corp.com", Role::Employee);

    let err = services
        .requests
        .submit(
            &employee,
            &LeaveRequestDraft::new(1, future_date(5), future_date(2)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.field_errors()[0].field, "end_date");
    apply.assert_hits_async(0).await;
}

#[tokio::test]
async fn admin_review_sends_expected_state_and_returns_decided_request() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/leave-requests");
            then.status(200).json_body(json!([{
                "id": 7,
                "user_email": "e@corp.com",
                "leave_type": "Annual Leave",
                "start_date": "2024-06-10",
                "end_date": "2024-06-14",
                "status": "Pending",
                "created_at": "2024-06-01T10:00:00"
            }]));
        })
        .await;
    let review = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/review-leave").json_body(json!({
                "leave_request_id": 7,
                "action": "approve",
                "expected_status": "Pending",
                "expected_version": 0
            }));
            then.status(200)
                .json_body(json!({ "msg": "Leave request approved successfully" }));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let decided = services
        .requests
        .review(&admin, &RequestId::from(7), Decision::Approve)
        .await
        .unwrap();

    review.assert_async().await;
    assert_eq!(decided.status, RequestStatus::Approved);
    assert_eq!(decided.version, 1);
    assert_eq!(decided.leave_type_id, LeaveTypeId::from(1));
}

#[tokio::test]
async fn admin_statistics_come_from_the_backend_summary() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/leave-stats")
                .header("Authorization", "Bearer tok-Admin");
            then.status(200).json_body(json!({
                "total_requests": 4,
                "pending_requests": 1,
                "approved_requests": 2,
                "rejected_requests": 1,
                "leave_type_stats": [
                    { "name": "Annual Leave", "total_requests": 3 },
                    { "name": "Sick Leave", "total_requests": 1 }
                ]
            }));
        })
        .await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/leave-requests");
            then.status(200).json_body(json!([]));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let summary = services.requests.statistics(&admin).await.unwrap();

    stats.assert_async().await;
    listing.assert_hits_async(0).await;
    assert_eq!(summary.total_requests, 4);
    assert_eq!(summary.approved_percentage(), 50);
    assert_eq!(summary.leave_type_stats[1].name, "Sick Leave");
}

#[tokio::test]
async fn concurrent_decision_surfaces_as_state_error() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/leave-requests");
            then.status(200).json_body(json!([{
                "id": 8,
                "user_email": "e@corp.com",
                "leave_type": "Sick Leave",
                "start_date": "2024-06-10",
                "end_date": "2024-06-10",
                "status": "Pending",
                "created_at": "2024-06-01T10:00:00"
            }]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/review-leave");
            then.status(409)
                .json_body(json!({ "msg": "Leave request has already been rejected" }));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let err = services
        .requests
        .review(&admin, &RequestId::from(8), Decision::Approve)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::State(_)));
    assert!(err.requires_refetch());
}

#[tokio::test]
async fn decided_request_is_rejected_locally() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/leave-requests");
            then.status(200).json_body(json!([{
                "id": 9,
                "user_email": "e@corp.com",
                "leave_type": "Sick Leave",
                "start_date": "2024-06-10",
                "end_date": "2024-06-10",
                "status": "Approved",
                "created_at": "2024-06-01T10:00:00"
            }]));
        })
        .await;
    let review = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/review-leave");
            then.status(200).json_body(json!({}));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let err = services
        .requests
        .review(&admin, &RequestId::from(9), Decision::Reject)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::State(_)));
    review.assert_hits_async(0).await;
}

#[tokio::test]
async fn created_leave_type_is_read_back_from_catalog() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/admin/leave-types")
                .json_body(json!({ "name": "Study Leave", "description": "" }));
            then.status(201)
                .json_body(json!({ "msg": "Leave type 'Study Leave' created successfully" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/leave-types");
            then.status(200).json_body(json!({
                "leave_types": [
                    { "id": 1, "name": "Annual Leave", "description": "" },
                    { "id": 5, "name": "Study Leave", "description": "" }
                ]
            }));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let created = services
        .catalog
        .create(&admin, LeaveTypeDraft::new("Study Leave", None).unwrap())
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(created.id, LeaveTypeId::from(5));
}

#[tokio::test]
async fn referenced_leave_type_is_kept() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/leave-requests");
            then.status(200).json_body(json!([{
                "id": 3,
                "user_email": "e@corp.com",
                "leave_type": "Sick Leave",
                "start_date": "2024-06-10",
                "end_date": "2024-06-10",
                "status": "Rejected",
                "created_at": "2024-06-01T10:00:00"
            }]));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/admin/leave-types/2");
            then.status(200).json_body(json!({}));
        })
        .await;
    let delete_unused = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/admin/leave-types/1");
            then.status(200)
                .json_body(json!({ "msg": "Leave type deleted successfully" }));
        })
        .await;
    let services = services(&server);
    let admin = sign_in(&services, "boss@corp.com", Role::Admin);

    let err = services
        .catalog
        .delete(&admin, &LeaveTypeId::from(2))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        WorkflowError::State("Cannot delete leave type with existing leave requests".into())
    );
    delete.assert_hits_async(0).await;

    services
        .catalog
        .delete(&admin, &LeaveTypeId::from(1))
        .await
        .unwrap();
    delete_unused.assert_async().await;
}

#[tokio::test]
async fn registration_and_approval_round_trip() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/register");
            then.status(201).json_body(json!({
                "msg": "User registered successfully, pending admin approval"
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/pending-users");
            then.status(200).json_body(json!({
                "pending_users": [{ "id": 12, "email": "a@b.com", "role": "Employee" }]
            }));
        })
        .await;
    let approve = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/admin/approve-user")
                .json_body(json!({ "user_id": 12, "action": "approve" }));
            then.status(200).json_body(json!({ "msg": "User approved successfully" }));
        })
        .await;
    let services = services(&server);

    let pending = services
        .accounts
        .register(&Registration::parse("a@b.com", "Sunny#Day2024", "Employee", true).unwrap())
        .await
        .unwrap();
    assert_eq!(pending.identity, "a@b.com");

    let admin = sign_in(&services, "boss@corp.com", Role::Admin);
    let queue = services.accounts.pending(&admin).await.unwrap();
    let approved = services
        .accounts
        .review(&admin, &queue[0], Decision::Approve)
        .await
        .unwrap();

    approve.assert_async().await;
    assert!(approved.principal().is_some());
}

#[tokio::test]
async fn login_and_logout_update_session_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/login");
            then.status(200)
                .json_body(json!({ "access_token": "jwt-e", "role": "Employee" }));
        })
        .await;
    let revoke = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/logout")
                .header("Authorization", "Bearer jwt-e");
            then.status(500).json_body(json!({ "error": "Internal server error" }));
        })
        .await;

    let runtime = create_runtime();
    let (state, set_state) = create_signal(SessionState::default());
    let services = services(&server);

    login_request(
        "e@corp.com",
        "Secret#123",
        &services.accounts,
        services.sessions(),
        set_state,
    )
    .await
    .unwrap();

    let snapshot = state.get();
    assert!(snapshot.is_authenticated());
    assert!(snapshot.workspace().unwrap().as_employee().is_some());
    assert_eq!(
        services.sessions().current().map(|s| s.token),
        Some("jwt-e".to_string())
    );

    logout(&services.accounts, services.sessions(), set_state).await;

    revoke.assert_async().await;
    assert!(!state.get().is_authenticated());
    assert!(services.sessions().current().is_none());
    runtime.dispose();
}
