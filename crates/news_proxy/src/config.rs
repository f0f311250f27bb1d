use std::{collections::HashMap, fs};

use anyhow::Context;
use serde::Deserialize;
use shared::news::DEFAULT_NEWS_QUERY;

const SETTINGS_FILE: &str = "news_proxy.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub news_api_key: String,
    pub news_api_base_url: String,
    pub news_default_query: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            news_api_key: String::new(),
            news_api_base_url: "https://newsapi.org".into(),
            news_default_query: DEFAULT_NEWS_QUERY.into(),
        }
    }
}

impl Settings {
    /// Overlays keys from a `news_proxy.toml` body. Unknown keys are ignored.
    pub fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg = toml::from_str::<HashMap<String, String>>(raw)
            .with_context(|| format!("failed to parse {SETTINGS_FILE}"))?;

        if let Some(v) = file_cfg.get("bind_addr") {
            self.server_bind = v.clone();
        }
        if let Some(v) = file_cfg.get("news_api_key") {
            self.news_api_key = v.clone();
        }
        if let Some(v) = file_cfg.get("news_api_base_url") {
            self.news_api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("news_default_query") {
            self.news_default_query = v.clone();
        }
        Ok(())
    }

    /// Overlays environment variables; `APP__*` names win over the short ones.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SERVER_BIND") {
            self.server_bind = v;
        }
        if let Some(v) = lookup("APP__BIND_ADDR") {
            self.server_bind = v;
        }

        if let Some(v) = lookup("NEWS_API") {
            self.news_api_key = v;
        }
        if let Some(v) = lookup("APP__NEWS_API_KEY") {
            self.news_api_key = v;
        }

        if let Some(v) = lookup("NEWS_API_BASE_URL") {
            self.news_api_base_url = v;
        }
        if let Some(v) = lookup("APP__NEWS_DEFAULT_QUERY") {
            self.news_default_query = v;
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        settings.apply_file(&raw)?;
    }
    settings.apply_env(|name| std::env::var(name).ok());

    settings.news_api_base_url = settings.news_api_base_url.trim_end_matches('/').to_string();
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
