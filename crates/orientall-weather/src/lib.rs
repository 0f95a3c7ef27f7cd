//! Weather lookups for OrientAll
//!
//! Asks a generative AI backend (with web search grounding) for the current
//! weather at a location and decodes its reply into a typed record.

pub mod backend;
pub mod classify;
pub mod decode;
pub mod gate;
pub mod prompt;
pub mod proxy;
pub mod service;
pub mod types;

pub use backend::{BackendError, GeminiBackend, GenerateOptions, Generation, GenerativeBackend};
pub use classify::{classify_backend_failure, classify_network_failure};
pub use decode::decode_reply;
pub use gate::{RequestGate, Ticket};
pub use prompt::build_prompt;
pub use proxy::WeatherApiClient;
pub use service::WeatherService;
pub use types::*;
