//! Route declarations.

pub mod defaults;
pub mod table;

pub use table::{RouteAccess, RouteDef, RouteMatch, RouteTable};
