//! Request middleware. Authentication is handled per handler by the bearer
//! extractors in `inbound::http::auth`, not here.

pub mod trace;

pub use trace::Trace;
