//! Battle Session Overlay - Main Library
//!
//! Live session score (win rate or WN8) for a battle results feed.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables
//! - **session_rating**: Scoring, session state and the overlay runner (re-exported from workspace)
//! - **telemetry_socket**: WebSocket client library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```no_run
//! use battle_session_overlay::bin_common::{load_config_from_env, ConfigType};
//! use battle_session_overlay::session_rating::OverlayConfig;
//!
//! let path = load_config_from_env(ConfigType::Overlay);
//! let config = OverlayConfig::load_or_default(path).unwrap();
//! ```

// Re-export workspace libraries for convenience
pub use session_rating;
pub use telemetry_socket;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
}
