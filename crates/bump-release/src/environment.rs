use std::path::PathBuf;

/// Repository web URL derived from the GitHub Actions environment.
pub(crate) fn github_repository_url() -> Option<String> {
    let server = std::env::var("GITHUB_SERVER_URL").ok()?;
    let repository = std::env::var("GITHUB_REPOSITORY").ok()?;
    repository_url(&server, &repository)
}

fn repository_url(server: &str, repository: &str) -> Option<String> {
    let server = server.trim().trim_end_matches('/');
    let repository = repository.trim().trim_matches('/');
    if server.is_empty() || repository.is_empty() {
        return None;
    }
    Some(format!("{server}/{repository}"))
}

/// File that CI step outputs are appended to, if any.
pub(crate) fn run_output_file() -> Option<PathBuf> {
    std::env::var_os("GITHUB_OUTPUT")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::repository_url;

    #[test]
    fn joins_server_and_repository() {
        assert_eq!(
            repository_url("https://github.com", "acme/widgets").as_deref(),
            Some("https://github.com/acme/widgets")
        );
    }

    #[test]
    fn trims_stray_slashes() {
        assert_eq!(
            repository_url("https://git.example.com/", "/acme/widgets/").as_deref(),
            Some("https://git.example.com/acme/widgets")
        );
    }

    #[test]
    fn empty_parts_give_nothing() {
        assert_eq!(repository_url("", "acme/widgets"), None);
        assert_eq!(repository_url("https://github.com", " "), None);
    }
}
