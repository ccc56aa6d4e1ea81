//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;
use tilemount::config::ConfigFileError;
use tilemount::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Bad command-line argument
    Usage(String),
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// A path argument could not be made absolute
    Path { path: String, error: std::io::Error },
    /// Failed to build the async runtime
    Runtime(std::io::Error),
    /// Mount failed or ended with an error
    Serve(ServiceError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Serve(ServiceError::StoreError(_)) => {
                eprintln!();
                eprintln!("Make sure the file is an MBTiles database with a 'tiles' table:");
                eprintln!("  sqlite3 <store> '.tables'");
            }
            CliError::Serve(ServiceError::FuseError(_)) => {
                eprintln!();
                eprintln!("Common issues:");
                eprintln!("  1. FUSE not installed: sudo apt install fuse3 (Linux)");
                eprintln!("  2. Permissions: You may need to add your user to 'fuse' group");
                eprintln!(
                    "  3. Mountpoint in use: Try unmounting with: fusermount -u <mountpoint>"
                );
            }
            CliError::Usage(_) => {
                eprintln!();
                eprintln!("Run 'tilemount --help' for usage.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!(
                    "Check {} or pass another file with --config",
                    tilemount::config::config_file_path().display()
                );
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Path { path, error } => write!(f, "Invalid path '{}': {}", path, error),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Serve(e) => write!(f, "Mount failed: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Path { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            CliError::Serve(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Serve(e)
    }
}
