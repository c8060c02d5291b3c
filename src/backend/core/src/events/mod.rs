//! Events: the resource the API exposes over HTTP, GraphQL and gRPC.

pub mod model;
pub mod repository;
pub mod service;

pub use model::{Event, EventPage, EventUpdate, NewEvent, Page, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use repository::{EventRepository, MemoryEventRepository};
pub use service::EventService;
