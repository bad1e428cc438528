pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod host;
pub mod loader;
pub mod navigation;
pub mod orchestrator;
pub mod route;
pub mod types;

pub use error::RouterError;
pub use orchestrator::{DynamicRouter, DynamicRouterHandle, DynamicRouterOptions, DynamicRoutes};
pub use types::{ComponentRef, GuardDecision, NavigationTarget, RouteDescriptor, RouteMeta};
