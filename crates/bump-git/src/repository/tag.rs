use crate::{Result, TagInfo};

use super::Repository;

impl Repository {
    /// Lists every tag, oldest first.
    ///
    /// Annotated tags are dated by their tagger, lightweight tags by the commit
    /// they point at. Ties keep name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag references cannot be read.
    pub fn tags_by_creation(&self) -> Result<Vec<TagInfo>> {
        let names = self.inner.tag_names(None)?;
        let mut tags = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let reference = self.inner.find_reference(&format!("refs/tags/{name}"))?;

            let tagger_time = reference
                .peel_to_tag()
                .ok()
                .and_then(|tag| tag.tagger().map(|sig| sig.when().seconds()));
            let commit = reference.peel_to_commit().ok();

            let created_at = tagger_time
                .or_else(|| commit.as_ref().map(|c| c.time().seconds()))
                .unwrap_or_default();
            let target_sha = commit.map_or_else(
                || reference.target().map(|oid| oid.to_string()).unwrap_or_default(),
                |c| c.id().to_string(),
            );

            tags.push(TagInfo {
                name: name.to_string(),
                target_sha,
                created_at,
            });
        }

        tags.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use super::Repository;

    fn commit_at(repo: &Repository, seconds: i64, message: &str) -> anyhow::Result<git2::Oid> {
        let sig = git2::Signature::new("Test", "test@example.com", &git2::Time::new(seconds, 0))?;
        let tree = repo.inner.head()?.peel_to_tree()?;
        let parent = repo.inner.head()?.peel_to_commit()?;
        Ok(repo
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?)
    }

    #[test]
    fn empty_repository_has_no_tags() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        assert!(repo.tags_by_creation()?.is_empty());
        Ok(())
    }

    #[test]
    fn lightweight_tags_ordered_by_commit_date_not_name() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let first = commit_at(&repo, 1_000, "first")?;
        repo.inner
            .tag_lightweight("v1.9.0", &repo.inner.find_object(first, None)?, false)?;

        let second = commit_at(&repo, 2_000, "second")?;
        repo.inner
            .tag_lightweight("v1.10.0", &repo.inner.find_object(second, None)?, false)?;

        let names: Vec<_> = repo
            .tags_by_creation()?
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["v1.9.0", "v1.10.0"]);
        Ok(())
    }

    #[test]
    fn annotated_tag_uses_tagger_date() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let old_commit = commit_at(&repo, 1_000, "old")?;
        let new_commit = commit_at(&repo, 2_000, "new")?;

        repo.inner.tag_lightweight(
            "v1.0.0",
            &repo.inner.find_object(new_commit, None)?,
            false,
        )?;

        // Tagged later on an older commit: must sort after the lightweight tag.
        let tagger = git2::Signature::new("Test", "test@example.com", &git2::Time::new(3_000, 0))?;
        repo.inner.tag(
            "v0.9.0",
            &repo.inner.find_object(old_commit, None)?,
            &tagger,
            "late tag",
            false,
        )?;

        let tags = repo.tags_by_creation()?;

        assert_eq!(tags[0].name, "v1.0.0");
        assert_eq!(tags[1].name, "v0.9.0");
        assert_eq!(tags[1].created_at, 3_000);
        assert_eq!(tags[1].target_sha, old_commit.to_string());
        Ok(())
    }
}
