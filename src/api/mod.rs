//! HTTP API layer: routes, request handlers, middleware and DTOs.

pub mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
