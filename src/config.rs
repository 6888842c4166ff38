use anyhow::{Context, Result};
use reqwest::Url;
use std::env;

use crate::render::{RenderConfig, DEFAULT_FALLBACK_IMAGE, DEFAULT_IMAGE_BASE_URL};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub api_base_url: Url,
    pub image_base_url: String,
    pub fallback_image: String,
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_raw = get("CINEFAV_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = Url::parse(api_raw.trim())
            .with_context(|| format!("CINEFAV_API_URL is not a valid URL: {}", api_raw))?;
        Ok(Self {
            api_base_url,
            image_base_url: get("CINEFAV_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            fallback_image: get("CINEFAV_FALLBACK_IMAGE")
                .unwrap_or_else(|| DEFAULT_FALLBACK_IMAGE.to_string()),
        })
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            image_base_url: self.image_base_url.clone(),
            fallback_image: self.fallback_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = WidgetConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.render_config(), RenderConfig::default());
    }

    #[test]
    fn overrides_and_blank_values() {
        let config = WidgetConfig::from_lookup(lookup(&[
            ("CINEFAV_API_URL", "https://movies.example.com"),
            ("CINEFAV_IMAGE_BASE_URL", "https://img.example.com/w92"),
            ("CINEFAV_FALLBACK_IMAGE", "  "),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.host_str(), Some("movies.example.com"));
        assert_eq!(config.image_base_url, "https://img.example.com/w92");
        assert_eq!(config.fallback_image, DEFAULT_FALLBACK_IMAGE);
    }

    #[test]
    fn rejects_invalid_api_url() {
        let err = WidgetConfig::from_lookup(lookup(&[("CINEFAV_API_URL", "not a url")]))
            .unwrap_err();
        assert!(err.to_string().contains("CINEFAV_API_URL"));
    }
}
