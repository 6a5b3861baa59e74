use std::future::Future;

use bump_manifest::PackageMetadata;

use crate::Result;

pub trait ChangeDetector: Send + Sync {
    /// Whether `package` changed since the release its manifest version names.
    ///
    /// # Errors
    ///
    /// Returns an error if release history cannot be queried or the package
    /// version has no release tag.
    fn did_package_change(
        &self,
        package: &PackageMetadata,
    ) -> impl Future<Output = Result<bool>> + Send;
}
