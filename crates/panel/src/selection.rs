use std::collections::BTreeSet;

/// Selected positions within the current filtered view.
///
/// Positions are only meaningful against one filter result; the
/// controller clears the selection whenever the filter changes, since
/// positions are not stable across filter changes.
#[derive(Debug, Default)]
pub struct Selection {
    positions: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, position: usize, selected: bool) {
        if selected {
            self.positions.insert(position);
        } else {
            self.positions.remove(&position);
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Selected positions in ascending order, i.e. original relative
    /// order within the filtered view.
    pub fn ordered(&self) -> Vec<usize> {
        self.positions.iter().copied().collect()
    }
}
