//! Platform-free core of the ShipCarbon web surfaces.
//!
//! Everything here compiles natively so the browser shell and the control service share
//! one definition of routes, page content, the sign-in flow, and the access-request form.

pub mod access_request;
pub mod config;
pub mod content;
pub mod dom_ids;
pub mod identity;
pub mod routes;
pub mod session;
