use bump_core::{DependencyGroup, ManifestField};
use semver::Version;
use serde_json::{Map, Value};

pub const MANIFEST_FILE: &str = "package.json";

/// Snapshot of a `package.json` object.
///
/// Key order is the order found on disk; edits produce a new snapshot and keep
/// existing keys in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    #[must_use]
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields
            .get(ManifestField::Name.key())
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn version_str(&self) -> Option<&str> {
        self.fields
            .get(ManifestField::Version.key())
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn version(&self) -> Option<Version> {
        self.version_str().and_then(|v| Version::parse(v).ok())
    }

    #[must_use]
    pub fn private(&self) -> Option<bool> {
        self.fields
            .get(ManifestField::Private.key())
            .and_then(Value::as_bool)
    }

    /// Workspace entries, if the field is a list of strings.
    #[must_use]
    pub fn workspaces(&self) -> Option<Vec<&str>> {
        self.fields
            .get(ManifestField::Workspaces.key())?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// A manifest declaring `workspaces` is a monorepo root.
    #[must_use]
    pub fn is_monorepo_root(&self) -> bool {
        self.fields.contains_key(ManifestField::Workspaces.key())
    }

    #[must_use]
    pub fn dependencies(&self, group: DependencyGroup) -> Option<&Map<String, Value>> {
        self.fields.get(group.key()).and_then(Value::as_object)
    }

    /// Present dependency groups, in manifest key order.
    pub fn dependency_groups(&self) -> impl Iterator<Item = (DependencyGroup, &Map<String, Value>)> {
        self.fields.iter().filter_map(|(key, value)| {
            let group = key.parse::<DependencyGroup>().ok()?;
            Some((group, value.as_object()?))
        })
    }

    #[must_use]
    pub fn with_version(&self, version: &Version) -> Self {
        let mut fields = self.fields.clone();
        fields.insert(
            ManifestField::Version.key().to_string(),
            Value::String(version.to_string()),
        );
        Self { fields }
    }

    /// Rewrites string dependency ranges for which `rewrite` returns a new range.
    ///
    /// Entries the closure declines, non-string entries and every other field
    /// are carried over untouched.
    #[must_use]
    pub fn map_dependency_ranges<F>(&self, mut rewrite: F) -> Self
    where
        F: FnMut(DependencyGroup, &str, &str) -> Option<String>,
    {
        let mut fields = self.fields.clone();

        for (key, value) in &mut fields {
            let Ok(group) = key.parse::<DependencyGroup>() else {
                continue;
            };
            let Some(entries) = value.as_object_mut() else {
                continue;
            };

            for (dependency, range) in entries.iter_mut() {
                let Some(current) = range.as_str() else {
                    continue;
                };
                if let Some(new_range) = rewrite(group, dependency, current) {
                    *range = Value::String(new_range);
                }
            }
        }

        Self { fields }
    }
}
