//! Default values and environment variable names.

// ============================================================================
// Server
// ============================================================================

/// Listen port when neither `PORT` nor a config file sets one.
pub const DEFAULT_PORT: u16 = 3000;

/// Listen host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

// ============================================================================
// Storage
// ============================================================================

/// Backing JSON file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "jokes.json";

/// Bulk delete leaves the backing file untouched unless enabled.
pub const DEFAULT_PERSIST_ON_CLEAR: bool = false;

// ============================================================================
// Config sources
// ============================================================================

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "jokes.toml";

/// Path to an explicit config file.
pub const ENV_CONFIG: &str = "JOKES_CONFIG";

pub const ENV_PORT: &str = "PORT";
pub const ENV_HOST: &str = "JOKES_HOST";
pub const ENV_DATA_FILE: &str = "JOKES_FILE";
pub const ENV_PERSIST_ON_CLEAR: &str = "JOKES_PERSIST_ON_CLEAR";

/// Comma-separated list of origins allowed by CORS.
pub const ENV_CORS_ORIGINS: &str = "JOKES_CORS_ORIGINS";
