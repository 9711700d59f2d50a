use crate::domain::Theme;
use crate::errors::Result;
use crate::storage::{KeyValueStore, THEME_KEY};

/// Reads and writes the display preferences kept next to the expense collection.
pub struct PreferenceService;

impl PreferenceService {
    /// Returns the stored theme, falling back to light when absent or unreadable.
    pub fn theme(store: &dyn KeyValueStore) -> Result<Theme> {
        let Some(raw) = store.get(THEME_KEY)? else {
            return Ok(Theme::default());
        };
        match raw.parse::<Theme>() {
            Ok(theme) => Ok(theme),
            Err(err) => {
                tracing::warn!(value = %raw, error = %err, "ignoring stored theme");
                Ok(Theme::default())
            }
        }
    }

    pub fn set_theme(store: &dyn KeyValueStore, theme: Theme) -> Result<()> {
        store.set(THEME_KEY, theme.as_str())?;
        tracing::info!(%theme, "theme updated");
        Ok(())
    }

    pub fn toggle_theme(store: &dyn KeyValueStore) -> Result<Theme> {
        let theme = Self::theme(store)?.toggled();
        Self::set_theme(store, theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_theme_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(PreferenceService::theme(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn reads_bare_and_quoted_values() {
        let store = MemoryStore::with_entry(THEME_KEY, "dark");
        assert_eq!(PreferenceService::theme(&store).unwrap(), Theme::Dark);
        let store = MemoryStore::with_entry(THEME_KEY, "\"dark\"");
        assert_eq!(PreferenceService::theme(&store).unwrap(), Theme::Dark);
        let store = MemoryStore::with_entry(THEME_KEY, "sepia");
        assert_eq!(PreferenceService::theme(&store).unwrap(), Theme::Light);
    }

    #[test]
    fn toggle_persists_new_value() {
        let store = MemoryStore::new();
        assert_eq!(PreferenceService::toggle_theme(&store).unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(PreferenceService::toggle_theme(&store).unwrap(), Theme::Light);
    }
}
