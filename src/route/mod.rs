pub mod error;
pub mod permission;
pub mod transform;

pub use error::RouteTransformError;
pub use permission::{AllowAll, PermissionFilter, PermissionKeyFilter, PermissionSet, PredicateFilter};
pub use transform::{transform_remote_routes, validate_route_structure, RawRoute, MAX_ROUTE_DEPTH};
