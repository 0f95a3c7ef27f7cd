use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Discrete device orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationMode {
    PortraitPrimary,
    PortraitSecondary,
    LandscapePrimary,
    LandscapeSecondary,
    #[default]
    Unknown,
}

impl OrientationMode {
    pub const ROTATIONS: [OrientationMode; 4] = [
        Self::PortraitPrimary,
        Self::PortraitSecondary,
        Self::LandscapePrimary,
        Self::LandscapeSecondary,
    ];

    /// Platform name of the mode (e.g. `"portrait-primary"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PortraitPrimary => "portrait-primary",
            Self::PortraitSecondary => "portrait-secondary",
            Self::LandscapePrimary => "landscape-primary",
            Self::LandscapeSecondary => "landscape-secondary",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_portrait(&self) -> bool {
        matches!(self, Self::PortraitPrimary | Self::PortraitSecondary)
    }

    pub fn is_landscape(&self) -> bool {
        matches!(self, Self::LandscapePrimary | Self::LandscapeSecondary)
    }
}

impl std::fmt::Display for OrientationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized orientation mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for OrientationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait-primary" => Ok(Self::PortraitPrimary),
            "portrait-secondary" => Ok(Self::PortraitSecondary),
            "landscape-primary" => Ok(Self::LandscapePrimary),
            "landscape-secondary" => Ok(Self::LandscapeSecondary),
            "unknown" => Ok(Self::Unknown),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Tool shown for an orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Alarm,
    Stopwatch,
    Timer,
    Weather,
    Home,
}

impl Tool {
    /// Upright shows the alarm clock, landscape-right the stopwatch,
    /// upside down the timer and landscape-left the weather panel.
    pub fn for_mode(mode: OrientationMode) -> Self {
        match mode {
            OrientationMode::PortraitPrimary => Self::Alarm,
            OrientationMode::LandscapePrimary => Self::Stopwatch,
            OrientationMode::PortraitSecondary => Self::Timer,
            OrientationMode::LandscapeSecondary => Self::Weather,
            OrientationMode::Unknown => Self::Home,
        }
    }

    /// Title shown on the tool's card
    pub fn label(&self) -> &'static str {
        match self {
            Self::Alarm => "Alarm Clock",
            Self::Stopwatch => "Stopwatch",
            Self::Timer => "Timer",
            Self::Weather => "Today's Weather",
            Self::Home => "OrientAll",
        }
    }
}

impl From<OrientationMode> for Tool {
    fn from(mode: OrientationMode) -> Self {
        Self::for_mode(mode)
    }
}
