use std::collections::BTreeSet;

/// Friends picked on the send screen; tapping a friend again unpicks them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientSelection {
    selected: BTreeSet<String>,
}

impl RecipientSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one friend in or out of the selection; returns whether they are now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in sorted order
    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
