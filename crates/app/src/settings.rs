//! Settings for the application.
//!
//! Values are read once at startup from, in increasing priority:
//! built-in defaults, a TOML file (`settings.toml` or `--config <path>`) and
//! environment variables prefixed with `OUTLAY`, using `__` as the section
//! separator (e.g. `OUTLAY__SERVER__TOKEN_SECRET`).
use clap::Parser;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "outlay", about = "Personal expense tracker API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    /// Signs bearer tokens. There is no default.
    pub token_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let file = match args.config.as_deref() {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix("OUTLAY").separator("__"))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 3000_i64)?
        .set_default("server.database", "memory")
}
