use std::path::Path;

use bump_core::ManifestField;
use semver::Version;
use serde_json::Value;

use crate::error::ManifestError;
use crate::manifest::{MANIFEST_FILE, PackageManifest};

pub const DEFAULT_REQUIRED_FIELDS: &[ManifestField] = &[ManifestField::Name, ManifestField::Version];

/// Parses manifest text read from `path`.
///
/// # Errors
///
/// Returns `ManifestError::Parse` for malformed JSON and
/// `ManifestError::NotAnObject` when the top-level value is not an object.
pub fn parse_manifest(path: &Path, content: &str) -> Result<PackageManifest, ManifestError> {
    let value: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(fields) => Ok(PackageManifest::from_fields(fields)),
        _ => Err(ManifestError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Reads `<dir>/package.json` and validates `required` fields.
///
/// # Errors
///
/// Returns `ManifestError::Missing` if no manifest exists, a read or parse
/// error, or `ManifestError::Validation` for the first invalid required field.
pub async fn read_manifest(
    dir: &Path,
    required: &[ManifestField],
) -> Result<PackageManifest, ManifestError> {
    let path = dir.join(MANIFEST_FILE);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(ManifestError::Missing { path });
        }
        Err(source) => return Err(ManifestError::Read { path, source }),
    };

    let manifest = parse_manifest(&path, &content)?;
    validate_manifest(&path, &manifest, required)?;
    Ok(manifest)
}

/// Reads a root manifest: `version` is required, and `private`/`workspaces`
/// must be well-formed when present.
///
/// # Errors
///
/// Returns the errors of [`read_manifest`] and [`validate_root_manifest`].
pub async fn read_monorepo_root_manifest(dir: &Path) -> Result<PackageManifest, ManifestError> {
    let manifest = read_manifest(dir, &[ManifestField::Version]).await?;
    validate_root_manifest(&dir.join(MANIFEST_FILE), &manifest)?;
    Ok(manifest)
}

/// Checks `required` fields. `name` is always checked before `version`,
/// whatever order the caller lists them in.
///
/// # Errors
///
/// Returns `ManifestError::Validation` naming the first failing field.
pub fn validate_manifest(
    path: &Path,
    manifest: &PackageManifest,
    required: &[ManifestField],
) -> Result<(), ManifestError> {
    if required.contains(&ManifestField::Name) {
        match manifest.fields().get(ManifestField::Name.key()) {
            Some(Value::String(name)) if !name.trim().is_empty() => {}
            _ => {
                return Err(invalid(path, ManifestField::Name, "expected a non-empty string"));
            }
        }
    }

    if required.contains(&ManifestField::Version) {
        let Some(Value::String(version)) = manifest.fields().get(ManifestField::Version.key())
        else {
            return Err(invalid(
                path,
                ManifestField::Version,
                "expected a semantic version string",
            ));
        };

        if let Err(err) = Version::parse(version) {
            return Err(invalid(
                path,
                ManifestField::Version,
                &format!("'{version}' is not a valid semantic version: {err}"),
            ));
        }
    }

    Ok(())
}

/// # Errors
///
/// Returns `ManifestError::Validation` if `private` is present but not `true`,
/// if `workspaces` is not a non-empty list of strings, or if `workspaces` is
/// declared on a manifest that is not private.
pub fn validate_root_manifest(path: &Path, manifest: &PackageManifest) -> Result<(), ManifestError> {
    let fields = manifest.fields();

    if let Some(private) = fields.get(ManifestField::Private.key()) {
        if private != &Value::Bool(true) {
            return Err(invalid(path, ManifestField::Private, "must be exactly `true` when present"));
        }
    }

    if fields.contains_key(ManifestField::Workspaces.key()) {
        match manifest.workspaces() {
            Some(entries) if !entries.is_empty() => {}
            _ => {
                return Err(invalid(
                    path,
                    ManifestField::Workspaces,
                    "expected a non-empty list of strings",
                ));
            }
        }

        if manifest.private() != Some(true) {
            return Err(invalid(
                path,
                ManifestField::Private,
                "a manifest declaring workspaces must set `private: true`",
            ));
        }
    }

    Ok(())
}

fn invalid(path: &Path, field: ManifestField, reason: &str) -> ManifestError {
    ManifestError::Validation {
        path: path.to_path_buf(),
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> PackageManifest {
        parse_manifest(Path::new("package.json"), content).expect("test manifest should parse")
    }

    fn failing_field(result: Result<(), ManifestError>) -> Option<ManifestField> {
        match result {
            Err(ManifestError::Validation { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn parse_rejects_non_object() {
        let result = parse_manifest(Path::new("package.json"), "[1, 2]");
        assert!(matches!(result, Err(ManifestError::NotAnObject { .. })));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let result = parse_manifest(Path::new("package.json"), "{ \"name\": ");
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[test]
    fn valid_manifest_passes_default_fields() {
        let m = parse(r#"{ "name": "a", "version": "1.0.0" }"#);
        assert!(validate_manifest(Path::new("package.json"), &m, DEFAULT_REQUIRED_FIELDS).is_ok());
    }

    #[test]
    fn name_is_checked_before_version() {
        let m = parse(r#"{ "name": "", "version": "nope" }"#);
        let result = validate_manifest(
            Path::new("package.json"),
            &m,
            &[ManifestField::Version, ManifestField::Name],
        );
        assert_eq!(failing_field(result), Some(ManifestField::Name));
    }

    #[test]
    fn non_string_name_fails() {
        let m = parse(r#"{ "name": 42, "version": "1.0.0" }"#);
        let result = validate_manifest(Path::new("package.json"), &m, DEFAULT_REQUIRED_FIELDS);
        assert_eq!(failing_field(result), Some(ManifestField::Name));
    }

    #[test]
    fn prefixed_version_fails() {
        let m = parse(r#"{ "name": "a", "version": "v1.0.0" }"#);
        let result = validate_manifest(Path::new("pkg/package.json"), &m, DEFAULT_REQUIRED_FIELDS);

        let Err(err) = result else {
            panic!("expected validation failure");
        };
        let msg = err.to_string();
        assert!(msg.contains("'version'"));
        assert!(msg.contains("pkg/package.json"));
    }

    #[test]
    fn reduced_field_set_skips_name() {
        let m = parse(r#"{ "version": "1.0.0" }"#);
        assert!(validate_manifest(Path::new("package.json"), &m, &[ManifestField::Version]).is_ok());
    }

    #[test]
    fn root_private_must_be_true() {
        let m = parse(r#"{ "version": "1.0.0", "private": false }"#);
        let result = validate_root_manifest(Path::new("package.json"), &m);
        assert_eq!(failing_field(result), Some(ManifestField::Private));
    }

    #[test]
    fn root_workspaces_must_be_non_empty_strings() {
        for workspaces in [r"[]", r#"["a", 1]"#, r#""packages/*""#] {
            let m = parse(&format!(
                r#"{{ "version": "1.0.0", "private": true, "workspaces": {workspaces} }}"#
            ));
            let result = validate_root_manifest(Path::new("package.json"), &m);
            assert_eq!(
                failing_field(result),
                Some(ManifestField::Workspaces),
                "workspaces = {workspaces}"
            );
        }
    }

    #[test]
    fn root_workspaces_require_private() {
        let m = parse(r#"{ "version": "1.0.0", "workspaces": ["a"] }"#);
        let result = validate_root_manifest(Path::new("package.json"), &m);
        assert_eq!(failing_field(result), Some(ManifestField::Private));
    }

    #[test]
    fn polyrepo_root_without_private_is_valid() {
        let m = parse(r#"{ "name": "A", "version": "1.1.0" }"#);
        assert!(validate_root_manifest(Path::new("package.json"), &m).is_ok());
    }

    #[tokio::test]
    async fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let result = read_manifest(dir.path(), DEFAULT_REQUIRED_FIELDS).await;

        let Err(ManifestError::Missing { path }) = result else {
            panic!("expected missing manifest error");
        };
        assert_eq!(path, dir.path().join(MANIFEST_FILE));
    }

    #[tokio::test]
    async fn read_root_manifest_from_disk() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{ "private": true, "version": "1.1.0", "workspaces": ["a", "b", "c"] }"#,
        )
        .expect("failed to write manifest");

        let manifest = read_monorepo_root_manifest(dir.path())
            .await
            .expect("root manifest should be valid");

        assert!(manifest.is_monorepo_root());
        assert_eq!(manifest.workspaces(), Some(vec!["a", "b", "c"]));
    }
}
