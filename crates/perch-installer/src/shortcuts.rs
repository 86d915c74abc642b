use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use perch_core::{PackageMetadata, ReleaseEntry, ShortcutLocation, ShortcutLocations};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::fs_utils::{remove_file_if_exists, sanitize_file_name};
use crate::link::ShortcutWriter;
use crate::package::PackageReader;
use crate::releases::resolve_current_release;
use crate::version_info::VersionInfoReader;
use crate::{AppLayout, IntegrationError, IntegrationResult, ShellFolders, ShortcutTarget};

pub struct ShortcutManager<'a> {
    layout: &'a AppLayout,
    folders: &'a ShellFolders,
    packages: &'a dyn PackageReader,
    versions: &'a dyn VersionInfoReader,
    writer: &'a dyn ShortcutWriter,
}

struct CurrentExecutable {
    release: ReleaseEntry,
    metadata: PackageMetadata,
    path: PathBuf,
}

impl<'a> ShortcutManager<'a> {
    pub fn new(
        layout: &'a AppLayout,
        folders: &'a ShellFolders,
        packages: &'a dyn PackageReader,
        versions: &'a dyn VersionInfoReader,
        writer: &'a dyn ShortcutWriter,
    ) -> Self {
        Self {
            layout,
            folders,
            packages,
            versions,
            writer,
        }
    }

    pub fn create_shortcuts_for_executable(
        &self,
        exe_name: &str,
        locations: ShortcutLocations,
    ) -> IntegrationResult<Vec<PathBuf>> {
        let current = self.resolve_current_executable(exe_name)?;
        if !current.path.is_file() {
            return Err(IntegrationError::Executable(anyhow!(
                "executable '{exe_name}' was not found for release {}: {}",
                current.release.version,
                current.path.display()
            )));
        }
        let product_name = self.product_name_for(&current.path, locations)?;
        let working_directory = current
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.layout.app_dir(&current.release.version));

        let mut created = Vec::new();
        for location in locations.iter() {
            let title = current.metadata.shortcut_title();
            let path = self.shortcut_path(location, title, &product_name);
            let shortcut = ShortcutTarget {
                location,
                display_title: title.to_string(),
                executable_path: current.path.clone(),
                working_directory: working_directory.clone(),
                icon_path: current.path.clone(),
                icon_index: 0,
                description: current
                    .metadata
                    .description
                    .clone()
                    .unwrap_or_else(|| title.to_string()),
            };

            self.write_shortcut(&shortcut, &path)
                .map_err(IntegrationError::Shortcut)?;
            info!("created {location} shortcut {}", path.display());
            created.push(path);
        }
        Ok(created)
    }

    pub fn remove_shortcuts_for_executable(
        &self,
        exe_name: &str,
        locations: ShortcutLocations,
    ) -> IntegrationResult<Vec<PathBuf>> {
        let current = self.resolve_current_executable(exe_name)?;
        let product_name = self.product_name_for(&current.path, locations)?;

        let mut removed = Vec::new();
        for location in locations.iter() {
            let path =
                self.shortcut_path(location, current.metadata.shortcut_title(), &product_name);
            let existed = remove_file_if_exists(&path)
                .with_context(|| format!("failed to remove shortcut: {}", path.display()))
                .map_err(IntegrationError::Shortcut)?;
            if existed {
                info!("removed {location} shortcut {}", path.display());
                removed.push(path);
            } else {
                debug!("no {location} shortcut at {}", path.display());
            }
        }
        Ok(removed)
    }

    /// Deterministic shortcut location for a package title and the product
    /// name from the executable's version resource.
    pub fn shortcut_path(
        &self,
        location: ShortcutLocation,
        title: &str,
        product_name: &str,
    ) -> PathBuf {
        let file_name = format!("{}.lnk", sanitize_file_name(title));
        match location {
            ShortcutLocation::Desktop => self.folders.desktop.join(file_name),
            ShortcutLocation::StartMenu => self
                .folders
                .start_menu
                .join(sanitize_file_name(product_name))
                .join(file_name),
        }
    }

    fn resolve_current_executable(&self, exe_name: &str) -> IntegrationResult<CurrentExecutable> {
        let exe_rel = validated_executable_name(exe_name).map_err(IntegrationError::Executable)?;
        let release = resolve_current_release(self.layout)?;
        let metadata = self
            .packages
            .read_metadata(&self.layout.package_path(&release))
            .map_err(IntegrationError::Archive)?;
        let path = self.layout.app_dir(&release.version).join(exe_rel);
        debug!("resolved executable {}", path.display());
        Ok(CurrentExecutable {
            release,
            metadata,
            path,
        })
    }

    /// Only start menu shortcuts are grouped by product name, so the version
    /// resource is left alone for desktop-only requests.
    fn product_name_for(
        &self,
        executable: &Path,
        locations: ShortcutLocations,
    ) -> IntegrationResult<String> {
        if !locations.contains(ShortcutLocation::StartMenu) {
            return Ok(String::new());
        }
        let product_name = self
            .versions
            .product_name(executable)
            .map_err(IntegrationError::Executable)?;
        if product_name.trim().is_empty() {
            return Ok(self.layout.app_name().to_string());
        }
        Ok(product_name.trim().to_string())
    }

    fn write_shortcut(&self, shortcut: &ShortcutTarget, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create shortcut directory: {}", parent.display())
            })?;
        }
        remove_file_if_exists(path)
            .with_context(|| format!("failed to replace shortcut: {}", path.display()))?;
        self.writer.save(shortcut, path)
    }
}

fn validated_executable_name(exe_name: &str) -> Result<&Path> {
    let relative = Path::new(exe_name);
    if exe_name.trim().is_empty() {
        return Err(anyhow!("executable name must not be empty"));
    }
    if relative.is_absolute() || relative.has_root() {
        return Err(anyhow!(
            "executable name must be relative to the app directory: {exe_name}"
        ));
    }
    if relative
        .components()
        .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(anyhow!("executable name must not include '..': {exe_name}"));
    }
    Ok(relative)
}
