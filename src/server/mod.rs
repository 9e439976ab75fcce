pub mod cors;
pub mod dto;
mod handlers;
pub mod proxy;
pub mod response;
mod router;

pub use router::{AppState, create_router};
