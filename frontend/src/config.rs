use anyhow::anyhow;
use chrono_tz::Tz;
use leavedesk_workflow::{session::DEFAULT_SESSION_TTL_MINUTES, SessionPolicy};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Raw configuration as delivered by `config.json`, page globals or the
/// environment. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, alias = "API_BASE_URL")]
    pub api_base_url: Option<String>,
    #[serde(default, alias = "TIME_ZONE")]
    pub time_zone: Option<String>,
    #[serde(default, alias = "SESSION_TTL_MINUTES")]
    pub session_ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub time_zone: Tz,
    pub session_policy: SessionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            time_zone: Tz::UTC,
            session_policy: SessionPolicy::from_minutes(DEFAULT_SESSION_TTL_MINUTES),
        }
    }
}

impl RuntimeConfig {
    /// Fills missing fields from `fallback`.
    pub fn or(self, fallback: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.or(fallback.api_base_url),
            time_zone: self.time_zone.or(fallback.time_zone),
            session_ttl_minutes: self.session_ttl_minutes.or(fallback.session_ttl_minutes),
        }
    }

    pub fn resolve(self) -> anyhow::Result<AppConfig> {
        let api_base_url = self
            .api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let time_zone_name = self.time_zone.unwrap_or_else(|| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid time zone value: {}", time_zone_name))?;

        let ttl = self
            .session_ttl_minutes
            .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);
        let session_policy = SessionPolicy::try_from_minutes(ttl)
            .map_err(|err| anyhow!("Invalid session ttl {} minutes: {}", ttl, err))?;

        Ok(AppConfig {
            api_base_url,
            time_zone,
            session_policy,
        })
    }
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

fn cache(config: AppConfig) -> AppConfig {
    APP_CONFIG.get_or_init(|| config).clone()
}

fn resolve_or_default(raw: RuntimeConfig) -> AppConfig {
    raw.resolve().unwrap_or_else(|err| {
        log::warn!("invalid runtime config, using defaults: {}", err);
        AppConfig::default()
    })
}

/// The configuration resolved so far. Before [`init`] completes in the
/// browser this only reflects page globals.
pub fn current() -> AppConfig {
    if let Some(cached) = APP_CONFIG.get() {
        return cached.clone();
    }
    resolve_or_default(snapshot())
}

pub fn current_time_zone() -> Tz {
    current().time_zone
}

pub fn session_policy() -> SessionPolicy {
    current().session_policy
}

pub async fn await_api_base_url() -> String {
    load().await.api_base_url
}

/// Resolves the configuration once and caches it for the page lifetime.
pub async fn load() -> AppConfig {
    if let Some(cached) = APP_CONFIG.get() {
        return cached.clone();
    }
    let mut raw = snapshot();
    if raw.api_base_url.is_none() {
        if let Some(fetched) = fetch_runtime_config().await {
            raw = raw.or(fetched);
        }
    }
    cache(resolve_or_default(raw))
}

pub async fn init() {
    let config = load().await;
    log::info!(
        "runtime config: api={} tz={}",
        config.api_base_url,
        config.time_zone
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn snapshot() -> RuntimeConfig {
    dotenvy::dotenv().ok();
    from_env(|key| std::env::var(key).ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn from_env(var: impl Fn(&str) -> Option<String>) -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: var("LEAVEDESK_API_BASE_URL"),
        time_zone: var("LEAVEDESK_TIME_ZONE"),
        session_ttl_minutes: var("LEAVEDESK_SESSION_TTL_MINUTES").and_then(|v| v.parse().ok()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn snapshot() -> RuntimeConfig {
    // window.__LEAVEDESK_ENV (env.js) wins over window.__LEAVEDESK_CONFIG.
    let env = read_global("__LEAVEDESK_ENV").unwrap_or_default();
    env.or(read_global("__LEAVEDESK_CONFIG").unwrap_or_default())
}

#[cfg(target_arch = "wasm32")]
fn read_global(name: &str) -> Option<RuntimeConfig> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &name.into()).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let json = js_sys::JSON::stringify(&value).ok()?.as_string()?;
    serde_json::from_str(&json).ok()
}

#[cfg(target_arch = "wasm32")]
async fn fetch_runtime_config() -> Option<RuntimeConfig> {
    let origin = web_sys::window()?.location().origin().ok()?;
    let resp = reqwest::get(format!("{}/config.json", origin)).await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    resp.json::<RuntimeConfig>().await.ok()
}
