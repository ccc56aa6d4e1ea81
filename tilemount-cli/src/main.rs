//! tilemount CLI - mount an MBTiles file as a `/Z/X/Y.ext` directory tree.

mod error;
mod runner;

use clap::Parser;
use std::path::{Path, PathBuf};

use error::CliError;
use runner::{CliRunner, MountOverrides};
use tilemount::config::{config_file_path, ConfigFile};
use tilemount::service::MountService;

#[derive(Parser)]
#[command(name = "tilemount", version = tilemount::VERSION)]
#[command(about = "Mount an MBTiles tile store as a read-only filesystem", long_about = None)]
struct Args {
    /// MBTiles file to serve
    #[arg(required_unless_present = "init_config")]
    store: Option<PathBuf>,

    /// Directory to mount on (created if absent)
    #[arg(required_unless_present = "init_config")]
    mountpoint: Option<PathBuf>,

    /// Write a default config file (at --config, or the default path) and exit
    #[arg(long, conflicts_with_all = ["store", "mountpoint"])]
    init_config: bool,

    /// Config file (default: ~/.tilemount/config.ini)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tile file extension, overriding the store's format
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,

    /// Treat tile names with a different extension as missing
    #[arg(long)]
    strict_extension: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log to the log file only
    #[arg(long)]
    no_stdout_log: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    if args.init_config {
        return init_config(args.config.as_deref());
    }
    let (Some(store), Some(mountpoint)) = (&args.store, &args.mountpoint) else {
        return Err(CliError::Usage(
            "STORE and MOUNTPOINT are required".to_string(),
        ));
    };
    let store = absolute(store)?;
    let mountpoint = absolute(mountpoint)?;

    let runner = CliRunner::new(args.config.as_deref(), args.debug, !args.no_stdout_log)?;
    runner.log_startup(&store, &mountpoint);

    let overrides = MountOverrides {
        extension: args.extension,
        strict_extension: args.strict_extension,
    };
    let config = runner.mount_config(store, mountpoint, &overrides)?;

    MountService::prepare_mountpoint(config.mountpoint()).map_err(CliError::Serve)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    MountService::serve_blocking(&config, runtime.handle()).map_err(CliError::Serve)
}

fn init_config(path: Option<&Path>) -> Result<(), CliError> {
    let path = path.map_or_else(config_file_path, Path::to_path_buf);
    if ConfigFile::ensure_exists_at(&path)? {
        println!("Wrote default configuration to {}", path.display());
    } else {
        println!("Configuration already exists at {}", path.display());
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf, CliError> {
    std::path::absolute(path).map_err(|error| CliError::Path {
        path: path.display().to_string(),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_positionals_and_flags() {
        let args = Args::try_parse_from([
            "tilemount",
            "world.mbtiles",
            "/mnt/tiles",
            "--extension",
            "jpg",
            "--strict-extension",
            "--no-stdout-log",
        ])
        .unwrap();

        assert_eq!(args.store, Some(PathBuf::from("world.mbtiles")));
        assert_eq!(args.mountpoint, Some(PathBuf::from("/mnt/tiles")));
        assert_eq!(args.extension.as_deref(), Some("jpg"));
        assert!(args.strict_extension);
        assert!(args.no_stdout_log);
        assert!(!args.debug);
        assert!(args.config.is_none());
        assert!(!args.init_config);
    }

    #[test]
    fn test_init_config_needs_no_positionals() {
        let args = Args::try_parse_from(["tilemount", "--init-config", "--config", "t.ini"]).unwrap();
        assert!(args.init_config);
        assert!(args.store.is_none());
        assert!(Args::try_parse_from(["tilemount", "--init-config", "a.mbtiles", "mnt"]).is_err());
    }

    #[test]
    fn test_init_config_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.ini");

        init_config(Some(&path)).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
        init_config(Some(&path)).unwrap();
    }

    #[test]
    fn test_mountpoint_is_required() {
        assert!(Args::try_parse_from(["tilemount", "world.mbtiles"]).is_err());
    }

    #[test]
    fn test_absolute_resolves_relative_paths() {
        let path = absolute(Path::new("world.mbtiles")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("world.mbtiles"));
    }
}
