mod change_detector;
mod changelog_formatter;
mod git_provider;

pub use change_detector::ChangeDetector;
pub use changelog_formatter::{ChangelogFormatter, ChangelogRequest};
pub use git_provider::GitProvider;
