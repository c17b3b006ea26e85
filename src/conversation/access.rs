use std::collections::BTreeSet;

/// Users allowed into the admin menu. Fixed for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminSet {
    ids: BTreeSet<i64>,
}

impl AdminSet {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    /// Ascending id order, each admin once.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
