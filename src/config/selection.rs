use serde::{Deserialize, Serialize};

use crate::category::CategoryId;

/// Ordered ids of the categories shown as bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedCategories {
    ids: Vec<CategoryId>,
}

impl SelectedCategories {
    /// Splits a comma-delimited list, skipping blanks and repeats.
    pub fn decode(raw: &str) -> Self {
        let mut selected = Self::default();
        for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            selected.add(CategoryId::new(id));
        }
        selected
    }

    pub fn encode(&self) -> String {
        self.ids
            .iter()
            .map(CategoryId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn ids(&self) -> &[CategoryId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.ids.contains(id)
    }

    /// Appends `id`. Returns false if it was already selected.
    pub fn add(&mut self, id: CategoryId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: &CategoryId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        before != self.ids.len()
    }

    /// Moves `id` one place towards the top. Returns false at the top or when absent.
    pub fn move_up(&mut self, id: &CategoryId) -> bool {
        match self.position(id) {
            Some(idx) if idx > 0 => {
                self.ids.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: &CategoryId) -> bool {
        match self.position(id) {
            Some(idx) if idx + 1 < self.ids.len() => {
                self.ids.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Drops ids the predicate no longer recognises and returns them.
    pub fn retain_known(&mut self, is_known: impl Fn(&CategoryId) -> bool) -> Vec<CategoryId> {
        let (kept, stale): (Vec<_>, Vec<_>) = self.ids.drain(..).partition(|id| is_known(id));
        self.ids = kept;
        for id in &stale {
            tracing::warn!(category = %id, "selected category no longer exists");
        }
        stale
    }

    fn position(&self, id: &CategoryId) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }
}
