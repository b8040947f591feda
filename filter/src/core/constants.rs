// =============================================================================
// Application Identity
// =============================================================================

/// Crate name as seen by tracing targets
pub const CRATE_TARGET: &str = "jsonb_filter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "jsonb-filter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "JSONB_FILTER_CONFIG";

// =============================================================================
// Environment Variables - Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "JSONB_FILTER_LOG";

/// Environment variable for log output format (`compact` or `json`)
pub const ENV_LOG_FORMAT: &str = "JSONB_FILTER_LOG_FORMAT";

// =============================================================================
// Environment Variables - Compiler
// =============================================================================

/// Environment variable for the placeholder style
pub const ENV_PLACEHOLDER: &str = "JSONB_FILTER_PLACEHOLDER";

/// Environment variable enabling string coercion of containment candidates
pub const ENV_STRINGIFY_CANDIDATES: &str = "JSONB_FILTER_STRINGIFY_CANDIDATES";

// =============================================================================
// Filter Limits
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const DEFAULT_MAX_FILTER_BYTES: usize = 64 * 1024;

/// Maximum number of recognized rules in one filter
pub const DEFAULT_MAX_RULES: usize = 50;

/// Maximum object nesting walked while looking for rules
pub const DEFAULT_MAX_DEPTH: usize = 32;
