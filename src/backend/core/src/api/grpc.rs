//! gRPC service implementation for events.
//!
//! Implements `eventify.v1.EventService` from `proto/eventify.proto`. The
//! bearer token is read from the `authorization` metadata entry and checked by
//! the same [`AccessGate`] the HTTP routes use, one permission per method.

use chrono::{DateTime, Utc};
use tonic::{Request, Response, Status};
use uuid::Uuid;

use super::AppState;
use crate::auth::{AccessGate, AuthContext};
use crate::events::{self, EventService, EventUpdate, NewEvent, Page};
use crate::rbac::permissions::{EVENTS_CREATE, EVENTS_DELETE, EVENTS_READ, EVENTS_UPDATE};

// Include the generated protobuf code
pub mod proto {
    tonic::include_proto!("eventify.v1");
}

use proto::event_service_server::{EventService as EventRpc, EventServiceServer};
use proto::*;

// ═══════════════════════════════════════════════════════════════════════════════
// Type Conversions
// ═══════════════════════════════════════════════════════════════════════════════

fn to_proto_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

fn from_proto_timestamp(ts: &Timestamp) -> Result<DateTime<Utc>, Status> {
    u32::try_from(ts.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(ts.seconds, nanos))
        .ok_or_else(|| Status::invalid_argument("Invalid timestamp"))
}

fn to_proto_event(event: events::Event) -> proto::Event {
    proto::Event {
        id: event.id.to_string(),
        name: event.name,
        description: event.description,
        location: event.location,
        date: Some(to_proto_timestamp(event.date)),
        organizer: event.organizer,
        category: event.category,
        tags: event.tags,
        capacity: event.capacity,
        created_by: event.created_by.map(|id| id.to_string()).unwrap_or_default(),
        created_at: Some(to_proto_timestamp(event.created_at)),
        updated_at: Some(to_proto_timestamp(event.updated_at)),
    }
}

fn parse_uuid(s: &str, field_name: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(s)
        .map_err(|_| Status::invalid_argument(format!("Invalid UUID for {}: {}", field_name, s)))
}

/// Proto3 scalars default to zero, which means "not set" here.
fn positive(value: i32) -> Option<u32> {
    (value > 0).then_some(value as u32)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Service
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EventGrpcService {
    gate: AccessGate,
    events: EventService,
}

impl EventGrpcService {
    pub fn new(gate: AccessGate, events: EventService) -> Self {
        Self { gate, events }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.gate.clone(), state.events.clone())
    }

    pub fn into_server(self) -> EventServiceServer<Self> {
        EventServiceServer::new(self)
    }

    fn authorize<T>(&self, request: &Request<T>, permission: &str) -> Result<AuthContext, Status> {
        let header = request
            .metadata()
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        self.gate
            .check(header, &[permission])
            .map_err(Status::from)
    }
}

#[tonic::async_trait]
impl EventRpc for EventGrpcService {
    async fn create_event(
        &self,
        request: Request<CreateEventRequest>,
    ) -> Result<Response<EventResponse>, Status> {
        let caller = self.authorize(&request, EVENTS_CREATE)?;
        let req = request.into_inner();

        let date = req
            .date
            .as_ref()
            .ok_or_else(|| Status::invalid_argument("date is required"))
            .and_then(from_proto_timestamp)?;

        let new_event = NewEvent {
            name: req.name,
            description: req.description,
            location: req.location,
            date,
            organizer: req.organizer,
            category: req.category,
            tags: req.tags,
            capacity: req.capacity,
        };

        let event = self.events.create(&caller, new_event).await?;
        Ok(Response::new(EventResponse {
            event: Some(to_proto_event(event)),
        }))
    }

    async fn get_event(
        &self,
        request: Request<GetEventRequest>,
    ) -> Result<Response<EventResponse>, Status> {
        self.authorize(&request, EVENTS_READ)?;
        let id = parse_uuid(&request.get_ref().id, "id")?;

        let event = self.events.get(id).await?;
        Ok(Response::new(EventResponse {
            event: Some(to_proto_event(event)),
        }))
    }

    async fn update_event(
        &self,
        request: Request<UpdateEventRequest>,
    ) -> Result<Response<EventResponse>, Status> {
        let caller = self.authorize(&request, EVENTS_UPDATE)?;
        let req = request.into_inner();
        let id = parse_uuid(&req.id, "id")?;

        let date = req.date.as_ref().map(from_proto_timestamp).transpose()?;
        let update = EventUpdate {
            name: req.name,
            description: req.description,
            location: req.location,
            date,
            organizer: req.organizer,
            category: req.category,
            // Repeated fields cannot be absent, so replacement is explicit.
            tags: req.replace_tags.then_some(req.tags),
            capacity: req.capacity,
        };

        let event = self.events.update(&caller, id, update).await?;
        Ok(Response::new(EventResponse {
            event: Some(to_proto_event(event)),
        }))
    }

    async fn delete_event(
        &self,
        request: Request<DeleteEventRequest>,
    ) -> Result<Response<DeleteEventResponse>, Status> {
        let caller = self.authorize(&request, EVENTS_DELETE)?;
        let id = parse_uuid(&request.get_ref().id, "id")?;

        self.events.delete(&caller, id).await?;
        Ok(Response::new(DeleteEventResponse { success: true }))
    }

    async fn list_events(
        &self,
        request: Request<ListEventsRequest>,
    ) -> Result<Response<ListEventsResponse>, Status> {
        self.authorize(&request, EVENTS_READ)?;
        let req = request.get_ref();

        let page = self
            .events
            .list(Page::new(positive(req.page), positive(req.limit)))
            .await?;

        Ok(Response::new(ListEventsResponse {
            events: page.events.into_iter().map(to_proto_event).collect(),
            total: page.total,
            page: page.page as i32,
            limit: page.limit as i32,
        }))
    }
}
