use anyhow::{anyhow, Context, Result};
use perch_core::ReleaseEntry;
use semver::Version;
use std::path::{Path, PathBuf};

pub const UNINSTALL_CONTAINER_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    root: PathBuf,
    app_name: String,
}

impl AppLayout {
    pub fn new(root: impl Into<PathBuf>, app_name: impl Into<String>) -> Result<Self> {
        let app_name = app_name.into();
        validate_app_name(&app_name)?;
        Ok(Self {
            root: root.into(),
            app_name,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    pub fn releases_path(&self) -> PathBuf {
        self.packages_dir().join("RELEASES")
    }

    pub fn package_path(&self, entry: &ReleaseEntry) -> PathBuf {
        self.packages_dir().join(&entry.filename)
    }

    pub fn app_dir(&self, version: &Version) -> PathBuf {
        self.root.join(format!("app-{version}"))
    }

    pub fn icon_path(&self) -> PathBuf {
        self.root.join("app.ico")
    }

    pub fn current_marker_path(&self) -> PathBuf {
        self.root.join(".current")
    }

    pub fn uninstall_key(&self) -> String {
        format!(r"{UNINSTALL_CONTAINER_KEY}\{}", self.app_name)
    }
}

fn validate_app_name(app_name: &str) -> Result<()> {
    if app_name.trim().is_empty() {
        return Err(anyhow!("application name must not be empty"));
    }
    if app_name.contains(['\\', '/']) {
        return Err(anyhow!(
            "application name must not contain path separators: {app_name}"
        ));
    }
    Ok(())
}

pub fn default_app_root(app_name: &str) -> Result<PathBuf> {
    if cfg!(windows) {
        let local_app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows application root")?;
        return Ok(PathBuf::from(local_app_data).join(app_name));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve application root")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(app_name))
}

/// Well-known shell folders that receive shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellFolders {
    pub desktop: PathBuf,
    pub start_menu: PathBuf,
}

impl ShellFolders {
    pub fn new(desktop: impl Into<PathBuf>, start_menu: impl Into<PathBuf>) -> Self {
        Self {
            desktop: desktop.into(),
            start_menu: start_menu.into(),
        }
    }

    pub fn detect() -> Result<Self> {
        let desktop = dirs::desktop_dir()
            .ok_or_else(|| anyhow!("could not resolve the user desktop directory"))?;
        let app_data = dirs::data_dir()
            .ok_or_else(|| anyhow!("could not resolve the roaming application data directory"))?;
        Ok(Self::new(desktop, project_start_menu_programs_dir(&app_data)))
    }
}

pub(crate) fn project_start_menu_programs_dir(app_data: &Path) -> PathBuf {
    app_data
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
}
