//! Static bottom-navigation configuration.
//!
//! The mobile shell renders its tab bar from this structure. The default
//! matches the shipped StepAhead layout; deployments can override it with a
//! JSON document of the same shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single navigation tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavTab {
    /// Stable tab identifier referenced by the shell.
    pub id: String,
    /// Emoji or glyph shown above the label.
    pub icon: String,
    /// Human-readable tab label.
    pub label: String,
    /// Whether this tab is selected at startup.
    #[serde(default)]
    pub default: bool,
}

/// Navigation-bar configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavbarConfig {
    /// Tabs in display order.
    pub tabs: Vec<NavTab>,
}

/// Errors from [`NavbarConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavbarError {
    /// The configuration has no tabs.
    #[error("navbar must define at least one tab")]
    NoTabs,
    /// Two tabs share an id.
    #[error("duplicate tab id: {0}")]
    DuplicateId(String),
    /// Not exactly one tab is marked default.
    #[error("exactly one tab must be marked default (found {0})")]
    DefaultCount(usize),
}

impl NavbarConfig {
    /// Check structural invariants: at least one tab, unique ids, exactly
    /// one default tab.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), NavbarError> {
        if self.tabs.is_empty() {
            return Err(NavbarError::NoTabs);
        }

        let mut seen = std::collections::HashSet::new();
        for tab in &self.tabs {
            if !seen.insert(tab.id.as_str()) {
                return Err(NavbarError::DuplicateId(tab.id.clone()));
            }
        }

        let defaults = self.tabs.iter().filter(|tab| tab.default).count();
        if defaults != 1 {
            return Err(NavbarError::DefaultCount(defaults));
        }

        Ok(())
    }

    /// The tab selected at startup.
    #[must_use]
    pub fn default_tab(&self) -> Option<&NavTab> {
        self.tabs.iter().find(|tab| tab.default)
    }
}

impl Default for NavbarConfig {
    fn default() -> Self {
        let tab = |id: &str, icon: &str, label: &str, default: bool| NavTab {
            id: id.to_owned(),
            icon: icon.to_owned(),
            label: label.to_owned(),
            default,
        };
        Self {
            tabs: vec![
                tab("home", "📅", "Days", true),
                tab("explore", "📊", "Progress", false),
                tab("favorites", "⚙️", "Settings", false),
                tab("profile", "👤", "Profile", false),
            ],
        }
    }
}
