//! Widget configuration: the versioned settings record, the selected bars and
//! the per-book store that reads and writes them as preferences.

mod selection;
mod settings;

pub use selection::SelectedCategories;
pub use settings::{
    SettingsRecord, CURRENT_VERSION, DEFAULT_BUDGET_NAME, DEFAULT_OVER_BUDGET_LEVEL,
    DEFAULT_WARNING_LEVEL, MAX_OVER_BUDGET_GAP, WARNING_LEVEL_RANGE,
};

use uuid::Uuid;

pub const SETTINGS_KEY: &str = "MonthlyBudgetBars_settings";
pub const SELECTED_CATEGORIES_KEY: &str = "MonthlyBudgetBars_cats";

/// String preferences attached to a book's root account.
pub trait PreferenceStore {
    fn preference(&self, key: &str, default: &str) -> String;
    fn set_preference(&mut self, key: &str, value: &str);
}

/// Holds one book's settings and selected bars between explicit loads and saves.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStore {
    book_id: Uuid,
    settings: SettingsRecord,
    selected: SelectedCategories,
}

impl SettingsStore {
    pub fn load(book_id: Uuid, prefs: &dyn PreferenceStore) -> Self {
        let settings = SettingsRecord::from_preference(&prefs.preference(SETTINGS_KEY, ""));
        let selected =
            SelectedCategories::decode(&prefs.preference(SELECTED_CATEGORIES_KEY, ""));
        tracing::debug!(
            book = %book_id,
            budget = %settings.budget_name,
            bars = selected.len(),
            "settings loaded"
        );
        Self {
            book_id,
            settings,
            selected,
        }
    }

    pub fn book_id(&self) -> Uuid {
        self.book_id
    }

    pub fn settings(&self) -> &SettingsRecord {
        &self.settings
    }

    pub fn selected(&self) -> &SelectedCategories {
        &self.selected
    }

    pub fn selected_mut(&mut self) -> &mut SelectedCategories {
        &mut self.selected
    }

    /// Applies `change` to the in-memory record. Nothing is written until `save`.
    pub fn update<R>(&mut self, change: impl FnOnce(&mut SettingsRecord) -> R) -> R {
        change(&mut self.settings)
    }

    pub fn save(&self, prefs: &mut dyn PreferenceStore) {
        prefs.set_preference(SETTINGS_KEY, &self.settings.encode());
        prefs.set_preference(SELECTED_CATEGORIES_KEY, &self.selected.encode());
        tracing::debug!(book = %self.book_id, "settings saved");
    }

    /// Discards unsaved edits.
    pub fn reload(&mut self, prefs: &dyn PreferenceStore) {
        *self = Self::load(self.book_id, prefs);
    }

    /// Loads the settings of another book. Returns false when `book_id` is
    /// already the open book.
    pub fn switch_book(&mut self, book_id: Uuid, prefs: &dyn PreferenceStore) -> bool {
        if book_id == self.book_id {
            return false;
        }
        tracing::info!(from = %self.book_id, to = %book_id, "switching book settings");
        *self = Self::load(book_id, prefs);
        true
    }
}
