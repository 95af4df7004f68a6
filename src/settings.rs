//! Game settings and preferences
//!
//! Persisted as JSON next to the binary (or wherever the host points).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Difficulty preset keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub const ALL: [DifficultyPreset; 3] = [
        DifficultyPreset::Easy,
        DifficultyPreset::Normal,
        DifficultyPreset::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "easy",
            DifficultyPreset::Normal => "normal",
            DifficultyPreset::Hard => "hard",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }
}

/// Viewport class, decided by the host once before a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutClass {
    Mobile,
    #[default]
    Desktop,
}

impl LayoutClass {
    /// Viewports narrower than this are treated as mobile
    pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;

    pub fn for_viewport_width(width: f32) -> Self {
        if width < Self::MOBILE_BREAKPOINT_PX {
            LayoutClass::Mobile
        } else {
            LayoutClass::Desktop
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            LayoutClass::Mobile => 7,
            LayoutClass::Desktop => 6,
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            LayoutClass::Mobile => 5,
            LayoutClass::Desktop => 8,
        }
    }

    /// Cell edge length in pixels
    pub fn cell_size(&self) -> f32 {
        match self {
            LayoutClass::Mobile => 64.0,
            LayoutClass::Desktop => 80.0,
        }
    }

    pub fn is_narrow(&self) -> bool {
        *self == LayoutClass::Mobile
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Preset used when a session starts
    pub difficulty: DifficultyPreset,
    /// Last layout class the host reported
    #[serde(default)]
    pub layout: LayoutClass,
    /// Initials remembered for leaderboard submission
    #[serde(default)]
    pub initials: Option<String>,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
