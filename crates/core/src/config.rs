use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    pub riot: RiotConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct DiscordConfig {
    pub bot_token: SecretString,
}

#[derive(Clone, Debug)]
pub struct RiotConfig {
    pub api_key: SecretString,
    pub region: RiotRegion,
    pub ddragon_base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub health_check_port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Riot account-v1 routing region; mirrors the regions the register command
/// offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiotRegion {
    Europe,
    Americas,
    Asia,
    Esports,
}

impl RiotRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Europe => "europe",
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Esports => "esports",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub discord_bot_token: Option<String>,
    pub riot_api_key: Option<String>,
    pub riot_region: Option<RiotRegion>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://araminator.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            discord: DiscordConfig { bot_token: String::new().into() },
            riot: RiotConfig {
                api_key: String::new().into(),
                region: RiotRegion::Europe,
                ddragon_base_url: "https://ddragon.leagueoflegends.com".to_string(),
                timeout_secs: 10,
                max_retries: 2,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                health_check_port: 8080,
                graceful_shutdown_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for RiotRegion {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "europe" => Ok(Self::Europe),
            "americas" => Ok(Self::Americas),
            "asia" => Ok(Self::Asia),
            "esports" => Ok(Self::Esports),
            other => Err(ConfigError::Validation(format!(
                "unsupported riot region `{other}` (expected europe|americas|asia|esports)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("araminator.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(discord) = patch.discord {
            if let Some(bot_token_value) = discord.bot_token {
                self.discord.bot_token = secret_value(bot_token_value);
            }
        }

        if let Some(riot) = patch.riot {
            if let Some(api_key_value) = riot.api_key {
                self.riot.api_key = secret_value(api_key_value);
            }
            if let Some(region) = riot.region {
                self.riot.region = region;
            }
            if let Some(ddragon_base_url) = riot.ddragon_base_url {
                self.riot.ddragon_base_url = ddragon_base_url;
            }
            if let Some(timeout_secs) = riot.timeout_secs {
                self.riot.timeout_secs = timeout_secs;
            }
            if let Some(max_retries) = riot.max_retries {
                self.riot.max_retries = max_retries;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(health_check_port) = server.health_check_port {
                self.server.health_check_port = health_check_port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("ARAMINATOR_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("ARAMINATOR_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("ARAMINATOR_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("ARAMINATOR_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("ARAMINATOR_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("ARAMINATOR_DISCORD_BOT_TOKEN") {
            self.discord.bot_token = secret_value(value);
        }

        if let Some(value) = read_env("ARAMINATOR_RIOT_API_KEY") {
            self.riot.api_key = secret_value(value);
        }
        if let Some(value) = read_env("ARAMINATOR_RIOT_REGION") {
            self.riot.region = value.parse()?;
        }
        if let Some(value) = read_env("ARAMINATOR_RIOT_DDRAGON_BASE_URL") {
            self.riot.ddragon_base_url = value;
        }
        if let Some(value) = read_env("ARAMINATOR_RIOT_TIMEOUT_SECS") {
            self.riot.timeout_secs = parse_u64("ARAMINATOR_RIOT_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("ARAMINATOR_RIOT_MAX_RETRIES") {
            self.riot.max_retries = parse_u32("ARAMINATOR_RIOT_MAX_RETRIES", &value)?;
        }

        if let Some(value) = read_env("ARAMINATOR_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("ARAMINATOR_SERVER_HEALTH_CHECK_PORT") {
            self.server.health_check_port =
                parse_u16("ARAMINATOR_SERVER_HEALTH_CHECK_PORT", &value)?;
        }
        if let Some(value) = read_env("ARAMINATOR_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("ARAMINATOR_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level =
            read_env("ARAMINATOR_LOGGING_LEVEL").or_else(|| read_env("ARAMINATOR_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("ARAMINATOR_LOGGING_FORMAT").or_else(|| read_env("ARAMINATOR_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(discord_bot_token) = overrides.discord_bot_token {
            self.discord.bot_token = secret_value(discord_bot_token);
        }
        if let Some(riot_api_key) = overrides.riot_api_key {
            self.riot.api_key = secret_value(riot_api_key);
        }
        if let Some(riot_region) = overrides.riot_region {
            self.riot.region = riot_region;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_discord(&self.discord)?;
        validate_riot(&self.riot)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("araminator.toml"), PathBuf::from("config/araminator.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_discord(discord: &DiscordConfig) -> Result<(), ConfigError> {
    if discord.bot_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "discord.bot_token is required. Get it from https://discord.com/developers/applications > Your App > Bot > Token".to_string()
        ));
    }

    Ok(())
}

fn validate_riot(riot: &RiotConfig) -> Result<(), ConfigError> {
    if riot.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "riot.api_key is required. Get it from https://developer.riotgames.com".to_string(),
        ));
    }

    if !riot.ddragon_base_url.starts_with("http://")
        && !riot.ddragon_base_url.starts_with("https://")
    {
        return Err(ConfigError::Validation(
            "riot.ddragon_base_url must start with http:// or https://".to_string(),
        ));
    }

    if riot.timeout_secs == 0 || riot.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "riot.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.health_check_port == 0 {
        return Err(ConfigError::Validation(
            "server.health_check_port must be greater than zero".to_string(),
        ));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    discord: Option<DiscordPatch>,
    riot: Option<RiotPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscordPatch {
    bot_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RiotPatch {
    api_key: Option<String>,
    region: Option<RiotRegion>,
    ddragon_base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    health_check_port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, RiotRegion};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_DISCORD_BOT_TOKEN", "token-from-env");
        env::set_var("TEST_RIOT_API_KEY", "key-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("araminator.toml");
            fs::write(
                &path,
                r#"
[discord]
bot_token = "${TEST_DISCORD_BOT_TOKEN}"

[riot]
api_key = "${TEST_RIOT_API_KEY}"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.discord.bot_token.expose_secret() == "token-from-env",
                "bot token should be loaded from environment",
            )?;
            ensure(
                config.riot.api_key.expose_secret() == "key-from-env",
                "riot api key should be loaded from environment",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_DISCORD_BOT_TOKEN", "TEST_RIOT_API_KEY"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ARAMINATOR_DISCORD_BOT_TOKEN", "token-test");
        env::set_var("ARAMINATOR_RIOT_API_KEY", "key-test");
        env::set_var("ARAMINATOR_LOG_LEVEL", "warn");
        env::set_var("ARAMINATOR_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&[
            "ARAMINATOR_DISCORD_BOT_TOKEN",
            "ARAMINATOR_RIOT_API_KEY",
            "ARAMINATOR_LOG_LEVEL",
            "ARAMINATOR_LOG_FORMAT",
        ]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ARAMINATOR_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("ARAMINATOR_DISCORD_BOT_TOKEN", "token-from-env");
        env::set_var("ARAMINATOR_RIOT_API_KEY", "key-from-env");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("araminator.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[discord]
bot_token = "token-from-file"

[riot]
api_key = "key-from-file"
region = "americas"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.discord.bot_token.expose_secret() == "token-from-env",
                "env bot token should win over file and defaults",
            )?;
            ensure(
                config.riot.region == RiotRegion::Americas,
                "file riot region should apply when no env override exists",
            )?;
            Ok(())
        })();

        clear_vars(&[
            "ARAMINATOR_DATABASE_URL",
            "ARAMINATOR_DISCORD_BOT_TOKEN",
            "ARAMINATOR_RIOT_API_KEY",
        ]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ARAMINATOR_DISCORD_BOT_TOKEN", "token-test");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("load should fail without a riot api key".to_string()),
                Err(error) => error,
            };

            ensure(
                matches!(error, ConfigError::Validation(ref message) if message.contains("riot.api_key")),
                "validation error should name the missing key",
            )?;
            Ok(())
        })();

        clear_vars(&["ARAMINATOR_DISCORD_BOT_TOKEN"]);
        result
    }

    #[test]
    fn invalid_riot_region_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("ARAMINATOR_DISCORD_BOT_TOKEN", "token-test");
        env::set_var("ARAMINATOR_RIOT_API_KEY", "key-test");
        env::set_var("ARAMINATOR_RIOT_REGION", "narnia");

        let result = (|| -> Result<(), String> {
            match AppConfig::load(LoadOptions::default()) {
                Ok(_) => Err("load should fail with an unknown riot region".to_string()),
                Err(ConfigError::Validation(message)) if message.contains("riot region") => Ok(()),
                Err(other) => Err(format!("unexpected error: {other}")),
            }
        })();

        clear_vars(&[
            "ARAMINATOR_DISCORD_BOT_TOKEN",
            "ARAMINATOR_RIOT_API_KEY",
            "ARAMINATOR_RIOT_REGION",
        ]);
        result
    }
}
