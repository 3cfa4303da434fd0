// Application state module
// Immutable state shared by every request handler

use super::types::Config;

/// Shared application state, built once at startup and handed to handlers
/// behind an `Arc`. Nothing in here is mutable: request handling never
/// coordinates across connections.
pub struct AppState {
    pub config: Config,
    /// Data route prefix with a guaranteed trailing slash, e.g. `/data/`
    pub data_prefix: String,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let trimmed = config.site.data_route.trim_end_matches('/');
        let data_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("{trimmed}/")
        };
        Self {
            config,
            data_prefix,
        }
    }

    /// Whether per-request access logging is enabled
    pub fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_data_prefix_normalization() {
        let mut config = Config::load_defaults();
        config.site.data_route = "/data".to_string();
        assert_eq!(AppState::new(config.clone()).data_prefix, "/data/");

        config.site.data_route = "/data/".to_string();
        assert_eq!(AppState::new(config.clone()).data_prefix, "/data/");

        config.site.data_route = "/files///".to_string();
        assert_eq!(AppState::new(config).data_prefix, "/files/");
    }
}
