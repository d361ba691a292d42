// Engine library root: the bar cache, its upstream source and the gRPC surface.

pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod services;

pub use error::EngineError;
