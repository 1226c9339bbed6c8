//! TOML Configuration File Support
//!
//! Named tunables for the home screen, loaded from
//! `~/.config/companion/companion.toml` with environment overrides.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [header]
//! collapse_height = 110.0
//! expanded_height = 450.0
//!
//! [paging]
//! page_width = 390.0
//! velocity_threshold = 500.0
//!
//! [motion]
//! transition_ms = 300
//! easing = "ease_out_quad"
//!
//! [conversation]
//! response_delay_min_ms = 1000
//! response_delay_max_ms = 2000
//! word_interval_ms = 150
//!
//! [countdown]
//! target = "2030-02-15T00:00:00"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::EasingFunction;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Resolved Sections
// =============================================================================

/// Stock replies used by the simulated assistant
pub const DEFAULT_RESPONSES: &[&str] = &[
    "That sounds like a great plan! The 30th birthday is going to be unforgettable.",
    "I'm updating the schedule now. Everything is looking good.",
    "Don't worry about the details, we're on track.",
    "Have you thought about adding a photo booth? It's always a hit.",
    "The RSVPs are coming in. We're at 40 confirmed guests so far.",
    "I'll double-check with the caterer about dietary restrictions.",
    "Music playlist is updated with your suggestions.",
    "Lighting setup is confirmed for the evening.",
    "Just a reminder to pick up the party favors.",
    "It's going to be an amazing night!",
    "I've noted that down. Anything else on your mind?",
    "Great idea! Adding it to the list.",
];

/// Collapsible header geometry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderConfig {
    /// Height when collapsed (floor of every drag)
    pub collapse_height: f32,
    /// Height when fully expanded
    pub expanded_height: f32,
    /// Height above `collapse_height` over which content fades in
    pub fade_window: f32,
    /// Gradient height above `collapse_height` while collapsed
    pub gradient_offset: f32,
    /// Extra gradient height once the fade window is passed
    pub gradient_growth: f32,
    /// Scroll padding above `collapse_height` while collapsed
    pub padding_offset: f32,
    /// Extra scroll padding once the fade window is passed
    pub padding_growth: f32,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            collapse_height: 110.0,
            expanded_height: 450.0,
            fade_window: 60.0,
            gradient_offset: 100.0,
            gradient_growth: 100.0,
            padding_offset: 100.0,
            padding_growth: 60.0,
        }
    }
}

/// Two-page horizontal pager
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PagingConfig {
    /// Width of one page; offset runs from 0 to this value
    pub page_width: f32,
    /// Parallax drift of page content
    pub parallax_distance: f32,
    /// Tab indicator position on the left page
    pub indicator_left: f32,
    /// Tab indicator position on the right page
    pub indicator_right: f32,
    /// Release speed (px/s) above which velocity picks the page
    pub velocity_threshold: f32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_width: 390.0,
            parallax_distance: 150.0,
            indicator_left: 5.0,
            indicator_right: 60.0,
            velocity_threshold: 500.0,
        }
    }
}

/// Settle animation timing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionConfig {
    /// Duration of every settle transition
    pub transition: Duration,
    /// Curve of every settle transition
    pub easing: EasingFunction,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(300),
            easing: EasingFunction::EaseOutQuad,
        }
    }
}

/// Simulated assistant timing and replies
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationConfig {
    /// Shortest wait before a reply starts
    pub response_delay_min: Duration,
    /// Longest wait before a reply starts
    pub response_delay_max: Duration,
    /// Time between revealed words
    pub word_interval: Duration,
    /// Reply pool, one picked uniformly per reply
    pub responses: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            response_delay_min: Duration::from_millis(1000),
            response_delay_max: Duration::from_millis(2000),
            word_interval: Duration::from_millis(150),
            responses: DEFAULT_RESPONSES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Birthday countdown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountdownConfig {
    /// Local date and time being counted down to
    pub target: NaiveDateTime,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        let target = NaiveDate::from_ymd_opt(2030, 2, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self { target }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[header]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderToml {
    /// Collapsed height
    pub collapse_height: Option<f32>,
    /// Expanded height
    pub expanded_height: Option<f32>,
    /// Fade-in window above the collapsed height
    pub fade_window: Option<f32>,
}

/// `[paging]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingToml {
    /// Page width
    pub page_width: Option<f32>,
    /// Parallax drift
    pub parallax_distance: Option<f32>,
    /// Release speed threshold
    pub velocity_threshold: Option<f32>,
}

/// `[motion]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionToml {
    /// Settle duration in milliseconds
    pub transition_ms: Option<u64>,
    /// Settle curve
    pub easing: Option<EasingFunction>,
}

/// `[conversation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationToml {
    /// Minimum reply delay in milliseconds
    pub response_delay_min_ms: Option<u64>,
    /// Maximum reply delay in milliseconds
    pub response_delay_max_ms: Option<u64>,
    /// Word reveal interval in milliseconds
    pub word_interval_ms: Option<u64>,
    /// Replacement reply pool
    pub responses: Option<Vec<String>>,
}

/// `[countdown]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownToml {
    /// Target as `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
    pub target: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionToml {
    /// Header section
    pub header: HeaderToml,
    /// Paging section
    pub paging: PagingToml,
    /// Motion section
    pub motion: MotionToml,
    /// Conversation section
    pub conversation: ConversationToml,
    /// Countdown section
    pub countdown: CountdownToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for the whole home screen
#[derive(Clone, Debug)]
pub struct CompanionConfig {
    /// Header geometry
    pub header: HeaderConfig,
    /// Pager geometry
    pub paging: PagingConfig,
    /// Settle timing
    pub motion: MotionConfig,
    /// Assistant simulation
    pub conversation: ConversationConfig,
    /// Countdown target
    pub countdown: CountdownConfig,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            header: HeaderConfig::default(),
            paging: PagingConfig::default(),
            motion: MotionConfig::default(),
            conversation: ConversationConfig::default(),
            countdown: CountdownConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl CompanionConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let header = &self.header;
        if !(header.collapse_height.is_finite() && header.expanded_height.is_finite()) {
            return Err(ConfigError::ValidationError(
                "header heights must be finite".to_string(),
            ));
        }
        if header.collapse_height >= header.expanded_height {
            return Err(ConfigError::ValidationError(format!(
                "collapse_height ({}) must be below expanded_height ({})",
                header.collapse_height, header.expanded_height
            )));
        }
        if !(header.fade_window > 0.0) {
            return Err(ConfigError::ValidationError(
                "fade_window must be positive".to_string(),
            ));
        }
        if !(self.paging.page_width > 0.0 && self.paging.page_width.is_finite()) {
            return Err(ConfigError::ValidationError(
                "page_width must be positive".to_string(),
            ));
        }
        if self.paging.velocity_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "velocity_threshold must not be negative".to_string(),
            ));
        }
        let conversation = &self.conversation;
        if conversation.response_delay_min > conversation.response_delay_max {
            return Err(ConfigError::ValidationError(format!(
                "response_delay_min ({:?}) exceeds response_delay_max ({:?})",
                conversation.response_delay_min, conversation.response_delay_max
            )));
        }
        if conversation.word_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "word_interval must be non-zero".to_string(),
            ));
        }
        if conversation.responses.is_empty()
            || conversation.responses.iter().all(|r| r.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "responses must contain at least one non-empty reply".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/companion/companion.toml` or
/// `~/.config/companion/companion.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("companion").join("companion.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// merged result fails validation. A missing config file is not an error.
pub fn load_config() -> Result<CompanionConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the merged result fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<CompanionConfig, ConfigError> {
    let mut config = CompanionConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: CompanionToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_with(&mut config, |key| std::env::var(key).ok());

    config.validate()?;
    Ok(config)
}

/// Parse a countdown target (`YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`)
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] when neither format matches.
pub fn parse_countdown_target(raw: &str) -> Result<NaiveDateTime, ConfigError> {
    let raw = raw.trim();
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(at);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::ValidationError(format!("invalid countdown target: {raw}")))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut CompanionConfig, toml: &CompanionToml) -> Result<(), ConfigError> {
    if let Some(h) = toml.header.collapse_height {
        config.header.collapse_height = h;
    }
    if let Some(h) = toml.header.expanded_height {
        config.header.expanded_height = h;
    }
    if let Some(w) = toml.header.fade_window {
        config.header.fade_window = w;
    }

    if let Some(w) = toml.paging.page_width {
        config.paging.page_width = w;
    }
    if let Some(d) = toml.paging.parallax_distance {
        config.paging.parallax_distance = d;
    }
    if let Some(v) = toml.paging.velocity_threshold {
        config.paging.velocity_threshold = v;
    }

    if let Some(ms) = toml.motion.transition_ms {
        config.motion.transition = Duration::from_millis(ms);
    }
    if let Some(easing) = toml.motion.easing {
        config.motion.easing = easing;
    }

    if let Some(ms) = toml.conversation.response_delay_min_ms {
        config.conversation.response_delay_min = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.conversation.response_delay_max_ms {
        config.conversation.response_delay_max = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.conversation.word_interval_ms {
        config.conversation.word_interval = Duration::from_millis(ms);
    }
    if let Some(ref responses) = toml.conversation.responses {
        config.conversation.responses.clone_from(responses);
    }

    if let Some(ref target) = toml.countdown.target {
        config.countdown.target = parse_countdown_target(target)?;
    }

    Ok(())
}

/// Apply environment overrides read through `lookup`
///
/// Unparseable values are logged and skipped.
pub fn apply_env_with<F>(config: &mut CompanionConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("COMPANION_TRANSITION_MS") {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config.motion.transition = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring invalid COMPANION_TRANSITION_MS"),
        }
    }
    if let Some(raw) = lookup("COMPANION_WORD_INTERVAL_MS") {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config.conversation.word_interval = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring invalid COMPANION_WORD_INTERVAL_MS"),
        }
    }
    if let Some(raw) = lookup("COMPANION_PAGE_WIDTH") {
        match raw.parse::<f32>() {
            Ok(width) => {
                config.paging.page_width = width;
                config.source = ConfigSource::Env;
            }
            Err(_) => tracing::warn!(value = %raw, "Ignoring invalid COMPANION_PAGE_WIDTH"),
        }
    }
    if let Some(raw) = lookup("COMPANION_COUNTDOWN_TARGET") {
        match parse_countdown_target(&raw) {
            Ok(target) => {
                config.countdown.target = target;
                config.source = ConfigSource::Env;
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring COMPANION_COUNTDOWN_TARGET"),
        }
    }
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Configuration overrides from command-line arguments
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Settle duration override (milliseconds)
    pub transition_ms: Option<u64>,
    /// Page width override
    pub page_width: Option<f32>,
    /// Countdown target override
    pub countdown_target: Option<NaiveDateTime>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set settle duration override
    #[must_use]
    pub fn with_transition_ms(mut self, ms: u64) -> Self {
        self.transition_ms = Some(ms);
        self
    }

    /// Set page width override
    #[must_use]
    pub fn with_page_width(mut self, width: f32) -> Self {
        self.page_width = Some(width);
        self
    }

    /// Set countdown target override
    #[must_use]
    pub fn with_countdown_target(mut self, target: NaiveDateTime) -> Self {
        self.countdown_target = Some(target);
        self
    }

    /// Apply overrides, marking the config as CLI-sourced if anything changed
    pub fn apply(&self, config: &mut CompanionConfig) {
        let mut changed = false;
        if let Some(ms) = self.transition_ms {
            config.motion.transition = Duration::from_millis(ms);
            changed = true;
        }
        if let Some(width) = self.page_width {
            config.paging.page_width = width;
            changed = true;
        }
        if let Some(target) = self.countdown_target {
            config.countdown.target = target;
            changed = true;
        }
        if changed {
            config.source = ConfigSource::Cli;
        }
    }
}
