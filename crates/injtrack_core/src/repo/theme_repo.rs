//! Persisted light/dark theme flag.
//!
//! # Invariants
//! - Loaded once at open; absent or malformed values fall back to light.
//! - Every change is written before it becomes visible.

use crate::config::TrackerConfig;
use crate::model::theme::Theme;
use crate::repo::RepoResult;
use crate::store::{load_or_default, save_value, KvStore};
use log::info;

pub struct ThemeRepository<S: KvStore> {
    store: S,
    key: &'static str,
    theme: Theme,
}

impl<S: KvStore> ThemeRepository<S> {
    pub fn open(store: S, config: &TrackerConfig) -> RepoResult<Self> {
        let key = config.theme_key();
        let theme = load_or_default(&store, key, Theme::default)?;
        Ok(Self { store, key, theme })
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> RepoResult<Theme> {
        save_value(&self.store, self.key, &theme)?;
        self.theme = theme;
        info!("event=theme_set module=repo status=ok theme={theme}");
        Ok(theme)
    }

    pub fn toggle(&mut self) -> RepoResult<Theme> {
        self.set_theme(self.theme.toggled())
    }
}
