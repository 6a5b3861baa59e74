#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub target_sha: String,
    /// Seconds since the epoch: tagger date for annotated tags, commit date otherwise.
    pub created_at: i64,
}
