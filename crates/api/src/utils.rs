use clap::Parser;
use climate_core::{
    find_config_file, get_xdg_data_dir, is_file, load_config, ConfigSource, DATABASE_FILE_NAME,
    DEFAULT_API_PORT, DEFAULT_DATABASE_PATH, DEFAULT_MAX_CONNECTIONS,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - historical Hawaii weather station observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate-api.toml,
    /// $XDG_CONFIG_HOME/hawaii-climate/climate-api.toml, /etc/hawaii-climate/climate-api.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Public URL shown on the usage page
    #[arg(short, long, env = "CLIMATE_API_REMOTE_URL")]
    pub remote_url: Option<String>,

    /// SQLite file holding the `station` and `measurement` tables, opened read-only
    #[arg(long, env = "CLIMATE_API_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Maximum number of pooled read connections
    #[arg(short, long, env = "CLIMATE_API_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn remote_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host(), self.port()))
    }

    /// Configured database, else `./Resources/hawaii.sqlite`, else the copy in
    /// the XDG data directory
    pub fn database(&self) -> String {
        if let Some(database) = &self.database {
            return database.clone();
        }
        if is_file(DEFAULT_DATABASE_PATH) {
            return DEFAULT_DATABASE_PATH.to_string();
        }
        let shared = get_xdg_data_dir().join(DATABASE_FILE_NAME);
        if shared.is_file() {
            return shared.display().to_string();
        }
        DEFAULT_DATABASE_PATH.to_string()
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    merge_config(Cli::parse())
}

fn merge_config(cli_args: Cli) -> Cli {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("CLIMATE_API_CONFIG", "climate-api.toml")
    };

    if let Some(path) = source.path() {
        log::info!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        log::warn!("ignoring config file {}: {}", source, e);
        Cli::default()
    });

    // CLI args override file config (env vars are handled by clap)
    Cli {
        config: cli_args.config,
        level: cli_args.level.or(file_config.level),
        domain: cli_args.domain.or(file_config.domain),
        port: cli_args.port.or(file_config.port),
        remote_url: cli_args.remote_url.or(file_config.remote_url),
        database: cli_args.database.or(file_config.database),
        max_connections: cli_args.max_connections.or(file_config.max_connections),
    }
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
