use anyhow::Context;
use chrono::{Local, NaiveDate};
use log::{debug, info};
use perch_core::PackageMetadata;
use std::fs;
use std::path::PathBuf;

use crate::icon::{materialize_icon, IconFetcher};
use crate::layout::UNINSTALL_CONTAINER_KEY;
use crate::package::PackageReader;
use crate::registry::RegistryStore;
use crate::releases::resolve_latest_release;
use crate::{AppLayout, IntegrationError, IntegrationResult, RegistryValue, UninstallRecord};

const LANGUAGE_EN_US: u32 = 0x0409;

pub struct UninstallRegistrar<'a> {
    layout: &'a AppLayout,
    registry: &'a dyn RegistryStore,
    packages: &'a dyn PackageReader,
    icons: &'a dyn IconFetcher,
}

impl<'a> UninstallRegistrar<'a> {
    pub fn new(
        layout: &'a AppLayout,
        registry: &'a dyn RegistryStore,
        packages: &'a dyn PackageReader,
        icons: &'a dyn IconFetcher,
    ) -> Self {
        Self {
            layout,
            registry,
            packages,
            icons,
        }
    }

    pub fn create_uninstaller_registry_entry(
        &self,
        uninstall_command: &str,
        quiet_switch: &str,
    ) -> IntegrationResult<UninstallRecord> {
        self.create_uninstaller_registry_entry_on(
            uninstall_command,
            quiet_switch,
            Local::now().date_naive(),
        )
    }

    pub fn create_uninstaller_registry_entry_on(
        &self,
        uninstall_command: &str,
        quiet_switch: &str,
        install_date: NaiveDate,
    ) -> IntegrationResult<UninstallRecord> {
        let latest = resolve_latest_release(self.layout)?;
        let package_path = self.layout.package_path(&latest);
        let metadata = self
            .packages
            .read_metadata(&package_path)
            .map_err(IntegrationError::Archive)?;
        let package_size = fs::metadata(&package_path)
            .with_context(|| format!("failed to stat package archive: {}", package_path.display()))
            .map_err(IntegrationError::Archive)?
            .len();

        self.registry
            .create_key(UNINSTALL_CONTAINER_KEY)
            .map_err(IntegrationError::Registry)?;

        let key_path = self.layout.uninstall_key();
        if self
            .registry
            .key_exists(&key_path)
            .map_err(IntegrationError::Registry)?
        {
            debug!("clearing previous uninstall entry {key_path}");
            self.registry
                .delete_key_tree(&key_path)
                .map_err(IntegrationError::Registry)?;
        }
        self.registry
            .create_key(&key_path)
            .map_err(IntegrationError::Registry)?;

        let icon_path = self.ensure_icon(&metadata);
        let values = self.uninstall_values(
            &metadata,
            icon_path,
            package_size,
            uninstall_command,
            quiet_switch,
            install_date,
        );
        for (name, value) in &values {
            self.registry
                .set_value(&key_path, name, value)
                .map_err(IntegrationError::Registry)?;
        }

        info!(
            "registered uninstall entry for {} {} at {key_path}",
            self.layout.app_name(),
            metadata.version
        );
        Ok(UninstallRecord { key_path, values })
    }

    pub fn remove_uninstaller_registry_entry(&self) -> IntegrationResult<()> {
        let key_path = self.layout.uninstall_key();
        for path in [UNINSTALL_CONTAINER_KEY, key_path.as_str()] {
            if !self
                .registry
                .key_exists(path)
                .map_err(IntegrationError::Registry)?
            {
                return Err(IntegrationError::NotInstalled {
                    app_name: self.layout.app_name().to_string(),
                });
            }
        }

        self.registry
            .delete_key_tree(&key_path)
            .map_err(IntegrationError::Registry)?;
        info!("removed uninstall entry {key_path}");
        Ok(())
    }

    /// Icon failures never fail registration; the entry falls back to the
    /// generic icon.
    fn ensure_icon(&self, metadata: &PackageMetadata) -> Option<PathBuf> {
        let icon_path = self.layout.icon_path();
        if icon_path.is_file() {
            return Some(icon_path);
        }
        let Some(icon_url) = metadata.icon_url.as_deref() else {
            debug!("package {} declares no icon", metadata.id);
            return None;
        };

        match materialize_icon(self.icons, icon_url, &icon_path) {
            Ok(path) => Some(path),
            Err(err) => {
                info!("couldn't write uninstall icon from {icon_url}, continuing without it: {err}");
                None
            }
        }
    }

    fn uninstall_values(
        &self,
        metadata: &PackageMetadata,
        icon_path: Option<PathBuf>,
        package_size: u64,
        uninstall_command: &str,
        quiet_switch: &str,
        install_date: NaiveDate,
    ) -> Vec<(String, RegistryValue)> {
        let text = RegistryValue::String;
        let display_name = metadata
            .display_name()
            .unwrap_or(self.layout.app_name())
            .to_string();
        let estimated_size_kib = u32::try_from(package_size / 1024).unwrap_or(u32::MAX);

        let mut values = Vec::new();
        if let Some(icon_path) = icon_path {
            values.push(("DisplayIcon", text(icon_path.display().to_string())));
        }
        values.extend([
            ("DisplayName", text(display_name)),
            ("DisplayVersion", text(metadata.version.to_string())),
            (
                "InstallDate",
                text(install_date.format("%Y%m%d").to_string()),
            ),
            (
                "InstallLocation",
                text(self.layout.root().display().to_string()),
            ),
            (
                "Publisher",
                text(metadata.publisher().unwrap_or_default().to_string()),
            ),
            (
                "QuietUninstallString",
                text(format!("{uninstall_command} {quiet_switch}")),
            ),
            ("UninstallString", text(uninstall_command.to_string())),
            (
                "URLUpdateInfo",
                text(metadata.project_url.clone().unwrap_or_default()),
            ),
            ("EstimatedSize", RegistryValue::Dword(estimated_size_kib)),
            ("NoModify", RegistryValue::Dword(1)),
            ("NoRepair", RegistryValue::Dword(1)),
            ("Language", RegistryValue::Dword(LANGUAGE_EN_US)),
        ]);

        values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}
