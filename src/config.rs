use secstr::SecUtf8;
use serde::{Deserialize, Deserializer};

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(deserialize_with = "deserialize_secutf8")]
    pub bot_token: SecUtf8,
    #[serde(deserialize_with = "deserialize_non_empty")]
    pub chat_id: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port", deserialize_with = "deserialize_port")]
    pub port: u16,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<_> = vars.into_iter().collect();
        Ok(Self {
            telegram: envy::prefixed("TELEGRAM_").from_iter(vars.clone())?,
            server: envy::from_iter(vars)?,
        })
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// An empty `PORT` means the default, like an unset one.
fn deserialize_port<'de, D>(de: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(de)?;
    if s.is_empty() {
        return Ok(DEFAULT_PORT);
    }
    s.parse().map_err(serde::de::Error::custom)
}

fn deserialize_non_empty<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(de)?;
    if s.is_empty() {
        return Err(serde::de::Error::invalid_length(0, &"a non-empty string"));
    }
    Ok(s)
}

fn deserialize_secutf8<'de, D>(de: D) -> Result<SecUtf8, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_non_empty(de).map(SecUtf8::from)
}
