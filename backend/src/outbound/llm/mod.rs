//! Language-model outbound adapter for the recommendation source port.

mod dto;
mod http_source;

pub use http_source::{ChatCompletionsSource, DEFAULT_LLM_BASE_URL, DEFAULT_LLM_MODEL};
