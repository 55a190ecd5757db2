use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub render_markdown: bool,
}

impl AppConfig {
    pub fn new(api_url: &str, render_markdown: bool) -> Self {
        Self {
            api_url: api_url.to_string(),
            render_markdown,
        }
    }

    /// Overrides the backend address, e.g. from a CLI flag.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        self
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_url =
            env::var("DOCCHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let render_markdown = env::var("DOCCHAT_RENDER_MARKDOWN")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            api_url,
            render_markdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(" off "));
    }

    #[test]
    fn test_with_api_url_overrides() {
        let config = AppConfig::new(DEFAULT_API_URL, true)
            .with_api_url(Some("http://10.0.0.2:8000".to_string()));
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
    }

    #[test]
    fn test_with_api_url_none_keeps_existing() {
        let config = AppConfig::new("http://backend:8000", false).with_api_url(None);
        assert_eq!(config, AppConfig::new("http://backend:8000", false));
    }
}
