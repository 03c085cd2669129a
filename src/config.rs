use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Medical Clinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment overrides
pub const ENV_DB_PATH: &str = "CLINIC_DB_PATH";
pub const ENV_BIND_ADDR: &str = "CLINIC_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DB_FILE_NAME: &str = "clinic.db";

/// Get the application data directory
/// ~/MedicalClinic/, or ./MedicalClinic when no home directory is known
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("MedicalClinic")
}

/// SQLite database file: `$CLINIC_DB_PATH` or `<app data>/clinic.db`
pub fn database_path() -> PathBuf {
    database_path_from(std::env::var_os(ENV_DB_PATH).map(PathBuf::from))
}

fn database_path_from(overridden: Option<PathBuf>) -> PathBuf {
    overridden
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME))
}

/// Listen address: `$CLINIC_BIND_ADDR` or 127.0.0.1:8080
pub fn bind_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    bind_addr_from(std::env::var(ENV_BIND_ADDR).ok())
}

fn bind_addr_from(overridden: Option<String>) -> Result<SocketAddr, std::net::AddrParseError> {
    overridden
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BIND_ADDR)
        .parse()
}

/// Log filter used when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    "medical_clinic_lib=info,tower_http=warn"
}
