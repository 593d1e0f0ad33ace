//! HTTP presentation surface
//!
//! The browser shell is a dumb frontend: it pushes webcam stills and speech
//! recognizer events into these endpoints and renders whatever the
//! conversation log says. All coordination logic lives in the session.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
