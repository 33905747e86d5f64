//! Default configuration constants used across the system.

use super::types::LoggingLevel;

/// Default HTTP port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default number of pooled SQLite connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Default log level for this crate.
pub const DEFAULT_LOG_LEVEL: LoggingLevel = LoggingLevel::Info;

/// Config file name looked up in the working directory (any supported extension).
pub const CONFIG_FILE_STEM: &str = "advocates";

/// Directory under the home directory holding user-level state.
pub const STATE_DIR_NAME: &str = ".advocate-directory";

/// Default base URL the client talks to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Path of the directory listing endpoint.
pub const ADVOCATES_ENDPOINT: &str = "/api/advocates";
