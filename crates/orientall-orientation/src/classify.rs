use crate::mode::OrientationMode;

/// Raw orientation state reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrientationReading {
    /// Screen Orientation API: a named type plus the rotation angle
    Screen {
        kind: Option<String>,
        angle: Option<i32>,
    },
    /// Legacy `window.orientation`: a signed angle only
    Legacy { angle: Option<i32> },
    /// Platform exposes no orientation information
    Unavailable,
}

impl OrientationReading {
    pub fn screen(kind: impl Into<String>, angle: i32) -> Self {
        Self::Screen {
            kind: Some(kind.into()),
            angle: Some(angle),
        }
    }

    pub fn legacy(angle: i32) -> Self {
        Self::Legacy { angle: Some(angle) }
    }
}

/// Map a platform reading to an orientation mode.
///
/// A recognized named type wins over the angle. Anything that cannot be
/// resolved yields [`OrientationMode::Unknown`].
pub fn classify(reading: &OrientationReading) -> OrientationMode {
    match reading {
        OrientationReading::Screen { kind, angle } => kind
            .as_deref()
            .and_then(named_mode)
            .unwrap_or_else(|| mode_from_angle(*angle)),
        OrientationReading::Legacy { angle } => mode_from_angle(*angle),
        OrientationReading::Unavailable => OrientationMode::Unknown,
    }
}

fn named_mode(kind: &str) -> Option<OrientationMode> {
    if !kind.starts_with("portrait") && !kind.starts_with("landscape") {
        return None;
    }
    kind.parse().ok()
}

fn mode_from_angle(angle: Option<i32>) -> OrientationMode {
    match angle {
        Some(0) => OrientationMode::PortraitPrimary,
        Some(90) => OrientationMode::LandscapePrimary,
        Some(180) => OrientationMode::PortraitSecondary,
        Some(270 | -90) => OrientationMode::LandscapeSecondary,
        _ => OrientationMode::Unknown,
    }
}
