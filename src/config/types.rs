// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site layout: which pages exist and where their files live
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the page templates
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    /// Directory whose files are served under the data route
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// URL prefix for the data route
    #[serde(default = "default_data_route")]
    pub data_route: String,
    /// Page routes: request path -> template file name
    #[serde(default = "default_pages")]
    pub pages: HashMap<String, String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_template_dir() -> String {
    "templates".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_data_dir() -> String {
    "data".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_data_route() -> String {
    "/data".to_string()
}

fn default_pages() -> HashMap<String, String> {
    HashMap::from([
        ("/".to_string(), "graph.html".to_string()),
        ("/xd2/".to_string(), "otherlanding.html".to_string()),
        ("/xd3/".to_string(), "otherlanding2.html".to_string()),
    ])
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            data_dir: default_data_dir(),
            data_route: default_data_route(),
            pages: default_pages(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}
