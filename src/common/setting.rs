//! setting config module
//! load order: built-in defaults -> optional config_{env}.toml -> env var override
//! every key is optional, the terminal must be able to boot with nothing configured

use std::{fs::File, io::Read};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::env;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30000;
pub const DEFAULT_API_HOST: &str = "http://localhost";
pub const DEFAULT_API_PORT: u16 = 4000;
pub const DEFAULT_ID_CACHE_FILE: &str = "cache/terminal_id";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Env {
    pub debug: bool,
    pub env: String,
    pub log_level: String,
}

impl Default for Env {
    fn default() -> Self {
        Env {
            debug: false,
            env: String::from("dev"),
            log_level: String::from("info"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Device {
    // preconfigured terminal identity, wins over every other identity source
    pub terminal_id: Option<String>,
    // preconfigured terminal ip, skips the whoami lookup when present
    pub ip: Option<String>,
    pub id_cache_file: String,
}

impl Default for Device {
    fn default() -> Self {
        Device {
            terminal_id: None,
            ip: None,
            id_cache_file: String::from(DEFAULT_ID_CACHE_FILE),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Api {
    pub host: String,
    pub port: u16,
    // full base url, wins over host + port when present
    pub url: Option<String>,
    pub poll_interval_ms: u64,
}

impl Default for Api {
    fn default() -> Self {
        Api {
            host: String::from(DEFAULT_API_HOST),
            port: DEFAULT_API_PORT,
            url: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub env: Env,
    pub device: Device,
    pub api: Api,
}

impl Settings {
    fn load() -> Self {
        let env = match env::var("ENV") {
            Ok(e) => e,
            Err(_) => String::from("dev"),
        };

        let file_path: String = format!("config_{}.toml", env);

        let mut settings = match File::open(file_path.as_str()) {
            Ok(mut file) => {
                let mut str_val = String::new();
                match file.read_to_string(&mut str_val) {
                    Ok(_) => toml::from_str(&str_val).expect("config file format invalid"),
                    Err(e) => panic!("cannot read config file {}: {}", file_path.as_str(), e),
                }
            }
            // kiosk deployments often ship without a config file
            Err(_) => Settings::default(),
        };

        settings.apply_env_override();
        settings
    }

    /// env vars win over file values, key set matches the original deployment scripts
    fn apply_env_override(&mut self) {
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.env.log_level = val;
        }
        if let Ok(val) = env::var("DEVICE_ID") {
            if !val.is_empty() {
                self.device.terminal_id = Some(val);
            }
        }
        if let Ok(val) = env::var("DEVICE_IP") {
            if !val.is_empty() {
                self.device.ip = Some(val);
            }
        }
        if let Ok(val) = env::var("ID_CACHE_FILE") {
            self.device.id_cache_file = val;
        }
        if let Ok(val) = env::var("API_HOST") {
            self.api.host = val;
        }
        if let Ok(val) = env::var("API_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.api.port = port,
                Err(_) => log::warn!("API_PORT is not a number, ignored: {}", val),
            }
        }
        if let Ok(val) = env::var("API_URL") {
            if !val.is_empty() {
                self.api.url = Some(val);
            }
        }
        if let Ok(val) = env::var("POLL_INTERVAL_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.api.poll_interval_ms = ms,
                Err(_) => log::warn!("POLL_INTERVAL_MS is not a number, ignored: {}", val),
            }
        }
    }

    /// resolved heartbeat base address, full url wins
    pub fn base_url(&self) -> String {
        match &self.api.url {
            Some(url) => url.clone(),
            None => format!("{}:{}", self.api.host, self.api.port),
        }
    }

    pub fn get<'a>() -> &'a Self {
        // 给静态变量延迟赋值的宏
        lazy_static! {
            static ref CACHE: Settings = Settings::load();
        }
        &CACHE
    }
}
