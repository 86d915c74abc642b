mod error;
mod fs_utils;
mod icon;
mod layout;
mod link;
mod package;
mod registry;
mod releases;
mod shortcuts;
mod types;
mod uninstall;
mod version_info;

pub use error::{IconError, IntegrationError, IntegrationResult};
pub use fs_utils::remove_file_if_exists;
pub use icon::{materialize_icon, HttpIconFetcher, IconFetcher};
pub use layout::{default_app_root, AppLayout, ShellFolders, UNINSTALL_CONTAINER_KEY};
pub use link::{ShellLinkWriter, ShortcutWriter};
pub use package::{NuspecPackageReader, PackageReader};
pub use registry::{MemoryRegistry, RegistryStore, WindowsRegistry};
pub use releases::{
    load_release_manifest, read_active_version, resolve_current_release, resolve_latest_release,
};
pub use shortcuts::ShortcutManager;
pub use types::{RegistryValue, ShortcutTarget, UninstallRecord};
pub use uninstall::UninstallRegistrar;
pub use version_info::{PowershellVersionInfoReader, VersionInfoReader};
