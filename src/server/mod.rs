//! HTTP surface for the order wizard
//!
//! [`ServerBuilder`] assembles the store, notifier and export sink into an
//! [`AppState`], mounts the routes from [`router`] and serves them.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::build_order_routes;
