// Page configuration.
//
// Everything has a default; the page may override any subset with a JSON
// object in a `<script type="application/json" id="rain-config">` element,
// e.g. `{"rain": {"columns": 40}, "log_level": "debug"}`.

use serde::Deserialize;
use thiserror::Error;

use crate::color::Color;

pub const DEFAULT_GLYPHS: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-_=+[{]}|;:',<.>/?`~";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rain needs at least one column")]
    NoColumns,
    #[error("rain needs at least one row per column")]
    NoRows,
    #[error("glyph pool is empty")]
    EmptyGlyphPool,
    #[error("{0} must be a finite, non-negative number")]
    InvalidNumber(&'static str),
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Shape and motion of the falling field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of vertical lanes.
    pub columns: usize,
    /// World units between neighbouring lanes.
    pub spacing: f64,
    /// Edge length of one glyph quad in world units.
    pub size: f64,
    /// Particles per lane.
    pub rows_per_column: usize,
    /// Mean fall speed in world units per frame.
    pub base_speed: f64,
    /// Lane speeds are drawn from `base_speed ± speed_jitter`.
    pub speed_jitter: f64,
    /// Lane start offsets are drawn from `[-start_spread, start_spread)`.
    pub start_spread: f64,
    /// Per-particle, per-frame chance of swapping glyphs.
    pub flicker_chance: f64,
    pub glyphs: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            columns: 60,
            spacing: 5.0,
            size: 2.0,
            rows_per_column: 20,
            base_speed: 0.5,
            speed_jitter: 0.1,
            start_spread: 100.0,
            flicker_chance: 0.01,
            glyphs: DEFAULT_GLYPHS.to_owned(),
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.rows_per_column == 0 {
            return Err(ConfigError::NoRows);
        }
        if self.glyphs.is_empty() {
            return Err(ConfigError::EmptyGlyphPool);
        }
        let numbers = [
            ("spacing", self.spacing),
            ("size", self.size),
            ("base_speed", self.base_speed),
            ("speed_jitter", self.speed_jitter),
            ("start_spread", self.start_spread),
            ("flicker_chance", self.flicker_chance),
        ];
        for &(name, value) in numbers.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidNumber(name));
            }
        }
        if self.flicker_chance > 1.0 {
            return Err(ConfigError::InvalidNumber("flicker_chance"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas_id: String,
    /// Scheme + host the section feeds are fetched from.
    pub api_base: String,
    pub rain: FieldConfig,
    pub tint: Color,
    pub background: Color,
    pub log_level: String,
    /// Wrap every frame in console timers.
    pub profile_frames: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            canvas_id: "three-canvas".to_owned(),
            api_base: "http://localhost:8080".to_owned(),
            rain: FieldConfig::default(),
            tint: Color::NEON_GREEN,
            background: Color::BACKGROUND,
            log_level: "info".to_owned(),
            profile_frames: false,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.rain.validate()?;
        Ok(config)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.rain.validate().is_ok());
        assert_eq!(config.rain.columns * config.rain.rows_per_column, 1200);
        assert_eq!(config.rain.flicker_chance, 0.01);
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config =
            Config::from_json(r##"{"rain": {"columns": 8}, "tint": "#ff00ff"}"##).unwrap();
        assert_eq!(config.rain.columns, 8);
        assert_eq!(config.rain.rows_per_column, 20);
        assert_eq!(config.tint, Color::from_u32(0xff00ffff));
        assert_eq!(config.canvas_id, "three-canvas");
    }

    #[test]
    fn test_rejects_degenerate_field() {
        assert!(matches!(
            Config::from_json(r#"{"rain": {"columns": 0}}"#),
            Err(ConfigError::NoColumns)
        ));
        assert!(matches!(
            Config::from_json(r#"{"rain": {"glyphs": ""}}"#),
            Err(ConfigError::EmptyGlyphPool)
        ));
        assert!(matches!(
            Config::from_json(r#"{"rain": {"base_speed": -1.0}}"#),
            Err(ConfigError::InvalidNumber("base_speed"))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mut config = Config::default();
        assert_eq!(config.endpoint("/api/cv"), "http://localhost:8080/api/cv");
        config.api_base = "https://example.org/".to_owned();
        assert_eq!(config.endpoint("/api/cv"), "https://example.org/api/cv");
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = Config::from_json(r#"{"log_level": "chatty"}"#).unwrap();
        assert_eq!(config.log_level(), log::Level::Info);
        let config = Config::from_json(r#"{"log_level": "debug"}"#).unwrap();
        assert_eq!(config.log_level(), log::Level::Debug);
    }
}
