//! Integration tests for the gRPC event service.
//!
//! Calls the service implementation directly with `authorization` metadata,
//! covering status code mapping and the full CRUD cycle.

use eventify_core::api::grpc::proto::event_service_server::EventService as _;
use eventify_core::api::grpc::proto::{
    CreateEventRequest, DeleteEventRequest, GetEventRequest, ListEventsRequest, Timestamp,
    UpdateEventRequest,
};
use eventify_core::api::grpc::EventGrpcService;
use eventify_core::auth::{AccessGate, TokenService, TokenSettings};
use eventify_core::events::{EventService, MemoryEventRepository};
use eventify_core::rbac::permissions::*;
use eventify_core::rbac::User;
use std::sync::Arc;
use tonic::{Code, Request};
use uuid::Uuid;

struct Harness {
    service: EventGrpcService,
    tokens: Arc<TokenService>,
    repo: Arc<MemoryEventRepository>,
}

impl Harness {
    fn new() -> Self {
        let tokens = Arc::new(TokenService::new(TokenSettings::new("grpc-test-secret")).unwrap());
        let repo = Arc::new(MemoryEventRepository::new());
        let service = EventGrpcService::new(
            AccessGate::new(tokens.clone()),
            EventService::new(repo.clone()),
        );
        Self { service, tokens, repo }
    }

    fn bearer(&self, permissions: &[&str]) -> String {
        let user = User::new("grpc@example.com", "", "Grace", "Hopper");
        let issued = self
            .tokens
            .issue_token(&user, permissions.iter().copied())
            .unwrap();
        format!("Bearer {}", issued.token)
    }

    fn request<T>(&self, message: T, authorization: Option<&str>) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(value) = authorization {
            request
                .metadata_mut()
                .insert("authorization", value.parse().unwrap());
        }
        request
    }

    async fn create(&self, name: &str) -> String {
        let bearer = self.bearer(&[EVENTS_CREATE]);
        self.service
            .create_event(self.request(create_request(name), Some(bearer.as_str())))
            .await
            .unwrap()
            .into_inner()
            .event
            .unwrap()
            .id
    }
}

fn create_request(name: &str) -> CreateEventRequest {
    CreateEventRequest {
        name: name.to_string(),
        description: "Quarterly meetup".to_string(),
        location: "Room 101".to_string(),
        date: Some(Timestamp {
            seconds: 1_900_000_000,
            nanos: 0,
        }),
        organizer: "Community".to_string(),
        category: "tech".to_string(),
        tags: vec!["rust".to_string()],
        capacity: 40,
    }
}

// ============================================================================
// Authentication and Authorization
// ============================================================================

#[tokio::test]
async fn test_missing_metadata_is_unauthenticated() {
    let harness = Harness::new();
    let status = harness
        .service
        .list_events(harness.request(ListEventsRequest { page: 0, limit: 0 }, None))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
}

#[tokio::test]
async fn test_malformed_metadata_is_unauthenticated() {
    let harness = Harness::new();
    for value in ["Token abc", "Bearer", "Bearer not.a.jwt"] {
        let status = harness
            .service
            .list_events(harness.request(ListEventsRequest { page: 0, limit: 0 }, Some(value)))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated, "{value}");
    }
}

#[tokio::test]
async fn test_missing_permission_is_permission_denied() {
    let harness = Harness::new();
    let id = harness.create("Guarded").await;
    let editor = harness.bearer(&[EVENTS_READ, EVENTS_CREATE, EVENTS_UPDATE]);

    let status = harness
        .service
        .delete_event(harness.request(DeleteEventRequest { id }, Some(editor.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::PermissionDenied);
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_get_update_delete() {
    let harness = Harness::new();
    let id = harness.create("Rust Night").await;
    let reader = harness.bearer(&[EVENTS_READ]);

    let event = harness
        .service
        .get_event(harness.request(GetEventRequest { id: id.clone() }, Some(reader.as_str())))
        .await
        .unwrap()
        .into_inner()
        .event
        .unwrap();
    assert_eq!(event.name, "Rust Night");
    assert_eq!(event.tags, vec!["rust".to_string()]);
    assert_eq!(event.date.unwrap().seconds, 1_900_000_000);
    assert!(!event.created_by.is_empty());

    let updater = harness.bearer(&[EVENTS_UPDATE]);
    let updated = harness
        .service
        .update_event(harness.request(
            UpdateEventRequest {
                id: id.clone(),
                capacity: Some(80),
                ..Default::default()
            },
            Some(updater.as_str()),
        ))
        .await
        .unwrap()
        .into_inner()
        .event
        .unwrap();
    assert_eq!(updated.capacity, 80);
    assert_eq!(updated.name, "Rust Night");
    assert_eq!(updated.tags, vec!["rust".to_string()]);

    let cleared = harness
        .service
        .update_event(harness.request(
            UpdateEventRequest {
                id: id.clone(),
                replace_tags: true,
                ..Default::default()
            },
            Some(updater.as_str()),
        ))
        .await
        .unwrap()
        .into_inner()
        .event
        .unwrap();
    assert!(cleared.tags.is_empty());

    let deleter = harness.bearer(&[EVENTS_DELETE]);
    let response = harness
        .service
        .delete_event(harness.request(DeleteEventRequest { id: id.clone() }, Some(deleter.as_str())))
        .await
        .unwrap()
        .into_inner();
    assert!(response.success);

    let status = harness
        .service
        .get_event(harness.request(GetEventRequest { id }, Some(reader.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_list_defaults_and_clamps() {
    let harness = Harness::new();
    for i in 0..3 {
        harness.create(&format!("Event {i}")).await;
    }
    let reader = harness.bearer(&[EVENTS_READ]);

    let page = harness
        .service
        .list_events(harness.request(ListEventsRequest { page: 0, limit: 0 }, Some(reader.as_str())))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(page.total, 3);
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 10);
    assert_eq!(page.events.len(), 3);

    let page = harness
        .service
        .list_events(harness.request(ListEventsRequest { page: 1, limit: 500 }, Some(reader.as_str())))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(page.limit, 100);
}

// ============================================================================
// Invalid Input
// ============================================================================

#[tokio::test]
async fn test_invalid_arguments() {
    let harness = Harness::new();
    let admin = harness.bearer(&[EVENTS_CREATE, EVENTS_READ]);

    let status = harness
        .service
        .get_event(harness.request(GetEventRequest { id: "not-a-uuid".into() }, Some(admin.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let mut request = create_request("No Date");
    request.date = None;
    let status = harness
        .service
        .create_event(harness.request(request, Some(admin.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = harness
        .service
        .create_event(harness.request(create_request(""), Some(admin.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let harness = Harness::new();
    let reader = harness.bearer(&[EVENTS_READ]);

    let status = harness
        .service
        .get_event(harness.request(
            GetEventRequest {
                id: Uuid::new_v4().to_string(),
            },
            Some(reader.as_str()),
        ))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_store_outage_is_unavailable() {
    let harness = Harness::new();
    let reader = harness.bearer(&[EVENTS_READ]);
    harness.repo.set_offline(true);

    let status = harness
        .service
        .list_events(harness.request(ListEventsRequest { page: 0, limit: 0 }, Some(reader.as_str())))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unavailable);
}
