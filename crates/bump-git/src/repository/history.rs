use super::Repository;

impl Repository {
    /// Whether the clone is missing history (e.g. a depth-limited CI checkout).
    #[must_use]
    pub fn is_shallow(&self) -> bool {
        self.inner.is_shallow()
    }
}
