use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{keys, LocalStore};
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Gray,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Gray];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Gray => "gray",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace("grey", "gray");
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownTheme(raw.trim().to_string()))
    }
}

/// Persisted theme choice; dark until something else is stored.
#[derive(Debug)]
pub struct ThemePreference {
    store: LocalStore,
    current: Theme,
}

impl ThemePreference {
    pub fn load(store: LocalStore) -> Self {
        let current = store.load::<Theme>(keys::THEME).unwrap_or_default();
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn set(&mut self, theme: Theme) -> anyhow::Result<()> {
        self.current = theme;
        self.store.save(keys::THEME, &theme)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{keys, KeyValueStore, LocalStore, MemoryStore};

    use super::{Theme, ThemePreference};

    #[test]
    fn defaults_to_dark_when_nothing_is_stored() {
        let preference = ThemePreference::load(LocalStore::memory());
        assert_eq!(preference.current(), Theme::Dark);
    }

    #[test]
    fn set_persists_the_lowercase_token() -> anyhow::Result<()> {
        let store = LocalStore::memory();
        let mut preference = ThemePreference::load(store.clone());
        preference.set(Theme::Gray)?;
        assert_eq!(store.raw(keys::THEME).as_deref(), Some("\"gray\""));
        assert_eq!(ThemePreference::load(store).current(), Theme::Gray);
        Ok(())
    }

    #[test]
    fn unreadable_theme_falls_back_to_dark() -> anyhow::Result<()> {
        let backing = MemoryStore::new();
        backing.set(keys::THEME, "\"neon\"".to_string())?;
        let preference = ThemePreference::load(LocalStore::new(backing));
        assert_eq!(preference.current(), Theme::Dark);
        Ok(())
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!("Light".parse::<Theme>().ok(), Some(Theme::Light));
        assert_eq!("grey".parse::<Theme>().ok(), Some(Theme::Gray));
        assert!("solarized".parse::<Theme>().is_err());
    }
}
