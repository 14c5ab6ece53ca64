use crate::app::Route;
use crate::diagram::{LayoutParams, ZoomRange};
use clap::Parser;
use config::{
    Config as ConfigCrate, ConfigError as ConfigCrateError, Environment, File, Map, Source, Value,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FILE_NAME: &str = "mindmap-tui.log";
const DEFAULT_MIN_ZOOM: f64 = 0.5;
const DEFAULT_MAX_ZOOM: f64 = 3.0;
const DEFAULT_ZOOM_STEP: f64 = 0.1;
const DEFAULT_EXPORT_SCALE: f64 = 2.0;
const DEFAULT_PAGE_HEIGHT: usize = 60;
const DEFAULT_MAX_PARENT_WIDTH: usize = 25;
const DEFAULT_MAX_LEAF_WIDTH: usize = 40;
const DEFAULT_LINE_SPACING: usize = 1;

pub const ENV_PREFIX: &str = "MINDMAP";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] ConfigCrateError),
    #[error("Failed to determine config directory")]
    DirectoryNotFound,
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

// Every field optional so file and environment layers can leave gaps.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
struct FileConfig {
    base_url: Option<String>,
    session_cookie: Option<String>,
    offline: Option<bool>,
    start_route: Option<Route>,
    export_dir: Option<PathBuf>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
    zoom_step: Option<f64>,
    export_scale: Option<f64>,
    page_height: Option<usize>,
    max_parent_node_width: Option<usize>,
    max_leaf_node_width: Option<usize>,
    line_spacing: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub offline: bool,
    pub start_route: Route,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub export_scale: f64,
    pub page_height: usize,
    pub max_parent_node_width: usize,
    pub max_leaf_node_width: usize,
    pub line_spacing: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            offline: false,
            start_route: Route::default(),
            export_dir: PathBuf::from("."),
            log_file: default_log_file(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
            export_scale: DEFAULT_EXPORT_SCALE,
            page_height: DEFAULT_PAGE_HEIGHT,
            max_parent_node_width: DEFAULT_MAX_PARENT_WIDTH,
            max_leaf_node_width: DEFAULT_MAX_LEAF_WIDTH,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

impl AppConfig {
    pub fn zoom_range(&self) -> ZoomRange {
        ZoomRange {
            min: self.min_zoom,
            max: self.max_zoom,
            step: self.zoom_step,
        }
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            max_parent_node_width: self.max_parent_node_width,
            max_leaf_node_width: self.max_leaf_node_width,
            line_spacing: self.line_spacing,
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Terminal client for the AI mind map generator", long_about = None)]
pub struct CliArgs {
    /// Path to a custom configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend API base URL, e.g. http://localhost:5000/api
    #[arg(long)]
    pub base_url: Option<String>,

    /// Session cookie value copied from a signed-in browser
    #[arg(long)]
    pub session_cookie: Option<String>,

    /// Use the built-in mock backend instead of the HTTP API
    #[arg(long)]
    pub offline: bool,

    /// Screen to open first
    #[arg(long, value_enum)]
    pub route: Option<Route>,

    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long)]
    pub min_zoom: Option<f64>,

    #[arg(long)]
    pub max_zoom: Option<f64>,

    #[arg(long)]
    pub zoom_step: Option<f64>,

    #[arg(long)]
    pub export_scale: Option<f64>,

    #[arg(long)]
    pub page_height: Option<usize>,

    #[arg(long)]
    pub max_parent_node_width: Option<usize>,

    #[arg(long)]
    pub max_leaf_node_width: Option<usize>,

    #[arg(long)]
    pub line_spacing: Option<usize>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    pub debug_config: bool,
}

/// Resolves the configuration: arguments > environment > file > defaults.
pub fn load_config(args: &CliArgs) -> Result<AppConfig, ConfigError> {
    let env_source = Environment::with_prefix(ENV_PREFIX).separator("__");
    let env_map: Map<String, Value> = env_source.collect()?;

    build_config_from_args(args, Some(env_map))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("", "", "mindmap-tui")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::DirectoryNotFound)
}

fn default_log_file() -> PathBuf {
    ProjectDirs::from("", "", "mindmap-tui")
        .map(|dirs| dirs.data_local_dir().join(DEFAULT_LOG_FILE_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE_NAME))
}

pub fn build_config_from_args(
    args: &CliArgs,
    override_source: Option<Map<String, Value>>,
) -> Result<AppConfig, ConfigError> {
    let config_file_path = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::IoError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path.clone())
        }
        // No home directory is not fatal; there is just no file layer.
        None => default_config_path().ok(),
    };

    let mut config_builder = ConfigCrate::builder();

    if let Some(path) = config_file_path {
        config_builder = config_builder.add_source(File::from(path).required(false));
    }

    // Overrides sit above the file layer
    if let Some(overrides) = override_source {
        for (key, value) in overrides {
            config_builder = config_builder.set_override(&key, value)?;
        }
    }

    let loaded: FileConfig = config_builder.build()?.try_deserialize()?;
    let defaults = AppConfig::default();

    let config = AppConfig {
        base_url: args
            .base_url
            .clone()
            .or(loaded.base_url)
            .unwrap_or(defaults.base_url),
        session_cookie: args
            .session_cookie
            .clone()
            .or(loaded.session_cookie)
            .filter(|cookie| !cookie.trim().is_empty()),
        offline: args.offline || loaded.offline.unwrap_or(defaults.offline),
        start_route: args
            .route
            .or(loaded.start_route)
            .unwrap_or(defaults.start_route),
        export_dir: args
            .export_dir
            .clone()
            .or(loaded.export_dir)
            .unwrap_or(defaults.export_dir),
        log_file: args
            .log_file
            .clone()
            .or(loaded.log_file)
            .unwrap_or(defaults.log_file),
        log_level: args
            .log_level
            .clone()
            .or(loaded.log_level)
            .unwrap_or(defaults.log_level),
        min_zoom: args.min_zoom.or(loaded.min_zoom).unwrap_or(defaults.min_zoom),
        max_zoom: args.max_zoom.or(loaded.max_zoom).unwrap_or(defaults.max_zoom),
        zoom_step: args
            .zoom_step
            .or(loaded.zoom_step)
            .unwrap_or(defaults.zoom_step),
        export_scale: args
            .export_scale
            .or(loaded.export_scale)
            .unwrap_or(defaults.export_scale),
        page_height: args
            .page_height
            .or(loaded.page_height)
            .unwrap_or(defaults.page_height),
        max_parent_node_width: args
            .max_parent_node_width
            .or(loaded.max_parent_node_width)
            .unwrap_or(defaults.max_parent_node_width),
        max_leaf_node_width: args
            .max_leaf_node_width
            .or(loaded.max_leaf_node_width)
            .unwrap_or(defaults.max_leaf_node_width),
        line_spacing: args
            .line_spacing
            .or(loaded.line_spacing)
            .unwrap_or(defaults.line_spacing),
    };

    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(&config.base_url).map_err(|err| {
        ConfigError::ValidationError(format!("base_url `{}` is invalid: {err}", config.base_url))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "base_url must use http or https, got `{}`",
            url.scheme()
        )));
    }

    if config.min_zoom <= 0.0 || config.zoom_step <= 0.0 {
        return Err(ConfigError::ValidationError(
            "min_zoom and zoom_step must be positive".to_string(),
        ));
    }
    if config.min_zoom >= config.max_zoom {
        return Err(ConfigError::ValidationError(format!(
            "min_zoom ({}) must be below max_zoom ({})",
            config.min_zoom, config.max_zoom
        )));
    }
    if config.export_scale <= 0.0 {
        return Err(ConfigError::ValidationError(
            "export_scale must be positive".to_string(),
        ));
    }
    if config.page_height == 0 {
        return Err(ConfigError::ValidationError(
            "page_height must be at least 1".to_string(),
        ));
    }
    if config.max_parent_node_width == 0 || config.max_leaf_node_width == 0 {
        return Err(ConfigError::ValidationError(
            "node widths must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::ValueKind;
    use std::io::Write;

    fn test_args(extra: &[&str]) -> CliArgs {
        let mut cmd = vec!["mindmap-tui"];
        cmd.extend_from_slice(extra);
        CliArgs::try_parse_from(cmd).expect("Failed to parse test args")
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_default_config() {
        let file = config_file("");
        let path = file.path().to_string_lossy().to_string();
        let config = build_config_from_args(&test_args(&["--config", &path]), None)
            .expect("Failed to load default config");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.start_route, Route::Generator);
        assert!(!config.offline);
        assert_eq!(config.zoom_range(), ZoomRange::default());
        assert_eq!(config.export_scale, 2.0);
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn test_file_layer() {
        let file = config_file(
            "base_url = \"https://maps.example.com/api\"\noffline = true\nstart_route = \"admin\"\npage_height = 30\n",
        );
        let path = file.path().to_string_lossy().to_string();
        let config = build_config_from_args(&test_args(&["--config", &path]), None).unwrap();

        assert_eq!(config.base_url, "https://maps.example.com/api");
        assert!(config.offline);
        assert_eq!(config.start_route, Route::Admin);
        assert_eq!(config.page_height, 30);
    }

    #[test]
    fn test_env_override() {
        let file = config_file("page_height = 30\nlog_level = \"warn\"\n");
        let path = file.path().to_string_lossy().to_string();

        let mut override_map = Map::new();
        override_map.insert(
            "page_height".to_string(),
            Value::new(None, ValueKind::U64(80)),
        );
        override_map.insert(
            "session_cookie".to_string(),
            Value::new(None, ValueKind::String("abc123".to_string())),
        );

        let config =
            build_config_from_args(&test_args(&["--config", &path]), Some(override_map)).unwrap();

        assert_eq!(config.page_height, 80);
        assert_eq!(config.session_cookie.as_deref(), Some("abc123"));
        assert_eq!(config.log_level, "warn", "file value kept when not overridden");
    }

    #[test]
    fn test_arg_override() {
        let mut override_map = Map::new();
        override_map.insert(
            "base_url".to_string(),
            Value::new(None, ValueKind::String("http://env.example/api".to_string())),
        );

        let args = test_args(&[
            "--base-url=http://cli.example/api",
            "--offline",
            "--route=admin",
            "--max-zoom=4",
        ]);
        let config = build_config_from_args(&args, Some(override_map)).unwrap();

        assert_eq!(config.base_url, "http://cli.example/api");
        assert!(config.offline);
        assert_eq!(config.start_route, Route::Admin);
        assert_eq!(config.max_zoom, 4.0);
    }

    #[test]
    fn test_blank_cookie_is_dropped() {
        let config = build_config_from_args(&test_args(&["--session-cookie=  "]), None).unwrap();
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases: &[&[&str]] = &[
            &["--base-url=not a url"],
            &["--base-url=ftp://example.com"],
            &["--min-zoom=2", "--max-zoom=1"],
            &["--min-zoom=0"],
            &["--zoom-step=0"],
            &["--page-height=0"],
            &["--export-scale=0"],
        ];

        for extra in cases {
            let err = build_config_from_args(&test_args(extra), None).unwrap_err();
            assert!(
                matches!(err, ConfigError::ValidationError(_)),
                "{extra:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let err = build_config_from_args(&test_args(&["--config", "/nonexistent/mindmap.toml"]), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
