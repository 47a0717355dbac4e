//! REST API for the enrollment platform
//!
//! Routes are grouped by component: users, class catalog, selections and
//! payments. Handlers are thin; the managers own the behavior.

mod auth;
mod classes;
mod extract;
mod payments;
mod selections;
mod server;
mod users;

pub use server::{start_web_server, AppState};
