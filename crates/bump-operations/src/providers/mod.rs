mod changelog;
mod git;

pub use changelog::KeepAChangelogFormatter;
pub use git::Git2Provider;
