mod metadata;
mod release;
mod shortcut;
mod version;

pub use metadata::PackageMetadata;
pub use release::{ReleaseEntry, ReleaseManifest};
pub use shortcut::{ShortcutLocation, ShortcutLocations};
pub use version::parse_package_version;
