use url::Url;

use crate::error::ChangelogError;

/// Hosting service, used to pick URL shapes for changelog links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Forge {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
    SourceHut,
}

impl Forge {
    /// Unknown hosts are treated as GitHub-compatible.
    #[must_use]
    pub fn detect(host: &str) -> Self {
        let host = host.to_ascii_lowercase();

        if host == "gitlab.com" || host.starts_with("gitlab.") || host.contains(".gitlab.") {
            Self::GitLab
        } else if host == "bitbucket.org" || host.ends_with(".bitbucket.org") {
            Self::Bitbucket
        } else if host == "codeberg.org" || host.starts_with("gitea.") {
            Self::Gitea
        } else if host == "git.sr.ht" || host.ends_with(".sr.ht") {
            Self::SourceHut
        } else {
            Self::GitHub
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub forge: Forge,
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// Parses a web URL such as `https://github.com/owner/repo(.git)`.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::UrlParse` for an unparsable URL or one without
    /// a host, and `ChangelogError::InvalidRepositoryPath` when the path does
    /// not name an owner and a repository.
    pub fn from_url(raw: &str) -> Result<Self, ChangelogError> {
        let parse_error = |source| ChangelogError::UrlParse {
            url: raw.to_string(),
            source,
        };

        let url = Url::parse(raw.trim()).map_err(parse_error)?;
        let host = url
            .host_str()
            .ok_or_else(|| parse_error(url::ParseError::EmptyHost))?;

        let mut base_url = url.clone();
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);

        let (owner, repo) = owner_and_repo(&url)?;

        Ok(Self {
            forge: Forge::detect(host),
            owner,
            repo,
            base_url,
        })
    }

    /// Web URL of the project itself.
    #[must_use]
    pub fn project_url(&self) -> String {
        match self.forge {
            Forge::SourceHut => format!("{}~{}/{}", self.base_url, self.owner, self.repo),
            _ => format!("{}{}/{}", self.base_url, self.owner, self.repo),
        }
    }

    /// Link showing everything between two refs, `from` being the older one.
    #[must_use]
    pub fn comparison_url(&self, from: &str, to: &str) -> String {
        let project = self.project_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{project}/compare/{from}...{to}"),
            Forge::GitLab => format!("{project}/-/compare/{from}...{to}"),
            Forge::Bitbucket => format!("{project}/branches/compare/{to}..{from}"),
            Forge::SourceHut => format!("{project}/log/{from}..{to}"),
        }
    }

    /// Link to a single tag, used for a first release with nothing to compare against.
    #[must_use]
    pub fn tag_url(&self, tag: &str) -> String {
        let project = self.project_url();
        match self.forge {
            Forge::GitHub | Forge::Gitea => format!("{project}/releases/tag/{tag}"),
            Forge::GitLab => format!("{project}/-/tags/{tag}"),
            Forge::Bitbucket => format!("{project}/src/{tag}"),
            Forge::SourceHut => format!("{project}/refs/{tag}"),
        }
    }
}

fn owner_and_repo(url: &Url) -> Result<(String, String), ChangelogError> {
    let path = url.path().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok((
            owner.trim_start_matches('~').to_string(),
            repo.to_string(),
        )),
        _ => Err(ChangelogError::InvalidRepositoryPath {
            url: url.to_string(),
        }),
    }
}
