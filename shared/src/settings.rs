use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Whether the whole frame is classified or a detected object is picked first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Single,
    Multi,
}

/// Continuous classification on every frame, or only on explicit capture.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WebcamMode {
    #[default]
    Continuous,
    Capture,
}

pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";
pub const SCAN_MODE_KEY: &str = "scanMode";
pub const WEBCAM_MODE_KEY: &str = "webcamMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
    pub scan_mode: ScanMode,
    pub webcam_mode: WebcamMode,
}

impl Settings {
    /// Builds settings from the raw stored strings, keeping defaults for missing or
    /// unrecognised values.
    pub fn from_stored(
        language: Option<&str>,
        theme: Option<&str>,
        scan_mode: Option<&str>,
        webcam_mode: Option<&str>,
    ) -> Self {
        Self {
            language: language.and_then(|s| s.parse().ok()).unwrap_or_default(),
            theme: theme.and_then(|s| s.parse().ok()).unwrap_or_default(),
            scan_mode: scan_mode.and_then(|s| s.parse().ok()).unwrap_or_default(),
            webcam_mode: webcam_mode.and_then(|s| s.parse().ok()).unwrap_or_default(),
        }
    }

    /// `(key, value)` pairs in storage form.
    pub fn to_stored(&self) -> [(&'static str, &'static str); 4] {
        [
            (LANGUAGE_KEY, self.language.into()),
            (THEME_KEY, self.theme.into()),
            (SCAN_MODE_KEY, self.scan_mode.into()),
            (WEBCAM_MODE_KEY, self.webcam_mode.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_strings_parse_with_defaults() {
        let settings = Settings::from_stored(Some("en"), Some("purple"), None, Some("capture"));
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.scan_mode, ScanMode::Single);
        assert_eq!(settings.webcam_mode, WebcamMode::Capture);
    }

    #[test]
    fn stored_form_matches_keys() {
        let settings = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };
        let stored = settings.to_stored();
        assert!(stored.contains(&("theme", "dark")));
        assert!(stored.contains(&("language", "es")));
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
