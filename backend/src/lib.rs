//! Encyclomedia backend library.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, ports
//! and services; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports against PostgreSQL, in-memory
//! stores and the metadata providers.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
