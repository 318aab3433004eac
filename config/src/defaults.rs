//! Compiled defaults.
//!
//! These are deployment constants rather than per-site settings: the
//! dashboard port is fixed so that wall panels can hardcode the URL, and
//! the pool geometry is sized once for the target board.

use std::time::Duration;

/// Default path of the settings file.
pub const SETTINGS_PATH: &str = "/etc/servus/servus.toml";

/// TCP port of the web dashboard.
pub const HTTP_PORT_NUMBER: u16 = 9000;

/// TCP port of the MODBUS gateway the temperature probe talks to.
pub const MODBUS_PORT_NUMBER: u16 = 502;

/// TCP port of the monitor status endpoint.
pub const MONITOR_PORT_NUMBER: u16 = 19150;

/// Number of banks the buffer pool is created for.
pub const POOL_BANK_CAPACITY: usize = 1;

/// Bank id used for HTTP transfer buffers.
pub const POOL_HTTP_BANK: u32 = 0;

/// Size of one HTTP transfer buffer in bytes.
pub const POOL_BUFFER_SIZE: usize = 1024;

/// Number of HTTP transfer buffers.
pub const POOL_BUFFER_COUNT: usize = 1000;

/// Interval between two temperature polling sweeps.
pub const THERMA_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Interval between two strip pin refreshes.
pub const STRIP_REFRESH_INTERVAL: Duration = Duration::from_millis(200);
