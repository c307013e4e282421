//! Immutable exchange/endpoint registry.
//!
//! The registry is built once at startup (from the built-in defaults or a
//! config file) and handed to the sampler and runner explicitly.
mod defaults;
mod types;


pub use defaults::{DEFAULT_ENDPOINT, builtin_exchanges};
pub use types::{EndpointDescriptor, ExchangeProfile, HttpMethod, Registry, is_valid_key};
