//! Infrastructure layer - configuration, logging, reference data

pub mod config;
pub mod logging;
pub mod reference;

pub use config::{ConfigError, FeedProtocol, OverlayConfig};
pub use logging::init_tracing;
pub use reference::{
    ExpectedValuesProvider, HttpReferenceSource, ProviderState, ReferenceError, ReferenceSource,
};
