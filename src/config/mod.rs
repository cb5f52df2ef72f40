//! Client configuration.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ClientConfig`] | Endpoint and timing knobs |
//! | [`ClientBuilder`] | Fluent builder deriving the endpoint from a page origin |
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use stand_control::ClientBuilder;
//!
//! # fn example() -> stand_control::Result<()> {
//! let config = ClientBuilder::new()
//!     .origin("https://stand.local")
//!     .command_timeout(Duration::from_secs(5))
//!     .build_config()?;
//!
//! assert_eq!(config.endpoint.as_str(), "wss://stand.local/ws");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for client configuration.
pub mod builder;

/// Endpoint and timing options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use options::{
    ClientConfig, COMMAND_TIMEOUT, HEALTH_CHECK_INTERVAL, MAX_RETRIES, NOTICE_DURATION,
    RECONNECT_DELAY, endpoint_for_origin,
};
