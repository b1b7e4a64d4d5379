use std::{env, path::PathBuf, time::Duration};

use log::*;
use topup_common::{parse_boolean_flag, Secret};
use topup_engine::CorruptionPolicy;

const DEFAULT_TOPUP_HOST: &str = "127.0.0.1";
const DEFAULT_TOPUP_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_BOT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The directory holding `links.json`, `purchases.json` and `allowed.json`.
    pub data_dir: PathBuf,
    /// What to do when a table file cannot be parsed.
    pub corruption_policy: CorruptionPolicy,
    /// Public prefix used when building redeem links, e.g. `https://topup.example.com`.
    pub public_base_url: String,
    pub telegram: TelegramConfig,
}

#[derive(Clone, Debug, Default)]
pub struct TelegramConfig {
    /// If `None`, the bot worker is not started and notifications are only logged.
    pub bot_token: Option<Secret<String>>,
    /// The Telegram user id of the administrator. `None` means there is no admin.
    pub admin_id: Option<i64>,
    /// Image sent after each new-order notification, if set.
    pub payment_qr_url: Option<String>,
    /// Long-poll timeout for `getUpdates`.
    pub poll_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TOPUP_HOST.to_string(),
            port: DEFAULT_TOPUP_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            corruption_policy: CorruptionPolicy::default(),
            public_base_url: default_base_url(DEFAULT_TOPUP_PORT),
            telegram: TelegramConfig { poll_timeout: DEFAULT_BOT_POLL_TIMEOUT, ..Default::default() },
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, public_base_url: default_base_url(port), ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TOPUP_HOST").ok().unwrap_or_else(|| DEFAULT_TOPUP_HOST.into());
        let port = env::var("TOPUP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TOPUP_PORT. {e} Using the default, {DEFAULT_TOPUP_PORT}, \
                         instead."
                    );
                    DEFAULT_TOPUP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TOPUP_PORT);
        let data_dir = env::var("TOPUP_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
            info!("🪛️ TOPUP_DATA_DIR is not set. Storing data files in the working directory.");
            PathBuf::from(DEFAULT_DATA_DIR)
        });
        let corruption_policy = if parse_boolean_flag(env::var("TOPUP_RESET_CORRUPT_TABLES").ok(), true) {
            CorruptionPolicy::ResetToDefault
        } else {
            info!("🪛️ Unreadable data files will stop the server instead of being reset.");
            CorruptionPolicy::Fail
        };
        let public_base_url = env::var("TOPUP_PUBLIC_BASE_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                let url = default_base_url(port);
                warn!("🪛️ TOPUP_PUBLIC_BASE_URL is not set. Redeem links will point at {url}");
                url
            });
        let telegram = TelegramConfig::from_env_or_default();
        Self { host, port, data_dir, corruption_policy, public_base_url, telegram }
    }
}

impl TelegramConfig {
    pub fn from_env_or_default() -> Self {
        let bot_token = env::var("TOPUP_TELEGRAM_BOT_TOKEN").ok().filter(|s| !s.trim().is_empty()).map(Secret::new);
        if bot_token.is_none() {
            warn!(
                "🪛️ TOPUP_TELEGRAM_BOT_TOKEN is not set. The bot will not run, and notifications will only be written \
                 to the log."
            );
        }
        let admin_id = match env::var("TOPUP_ADMIN_ID").map(|s| s.trim().parse::<i64>()) {
            Ok(Ok(0)) | Err(_) => {
                warn!("🪛️ TOPUP_ADMIN_ID is not set. Nobody will be able to use the admin commands.");
                None
            },
            Ok(Ok(id)) => Some(id),
            Ok(Err(e)) => {
                error!("🪛️ TOPUP_ADMIN_ID must be a numeric Telegram user id. {e}. Running without an admin.");
                None
            },
        };
        let payment_qr_url = env::var("TOPUP_PAYMENT_QR_URL").ok().filter(|s| !s.trim().is_empty());
        let poll_timeout = env::var("TOPUP_BOT_POLL_TIMEOUT")
            .map_err(|_| {
                debug!(
                    "🪛️ TOPUP_BOT_POLL_TIMEOUT is not set. Using the default value of {}s.",
                    DEFAULT_BOT_POLL_TIMEOUT.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for TOPUP_BOT_POLL_TIMEOUT. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_BOT_POLL_TIMEOUT);
        Self { bot_token, admin_id, payment_qr_url, poll_timeout }
    }
}

fn default_base_url(port: u16) -> String {
    format!("http://localhost:{port}")
}
