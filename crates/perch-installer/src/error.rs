use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("release manifest error: {0:#}")]
    Manifest(anyhow::Error),
    #[error("package archive error: {0:#}")]
    Archive(anyhow::Error),
    #[error("registry error: {0:#}")]
    Registry(anyhow::Error),
    #[error("uninstall entry for '{app_name}' is not registered")]
    NotInstalled { app_name: String },
    #[error("executable error: {0:#}")]
    Executable(anyhow::Error),
    #[error("shortcut error: {0:#}")]
    Shortcut(anyhow::Error),
}

impl IntegrationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Manifest(_) => "manifest",
            Self::Archive(_) => "archive",
            Self::Registry(_) => "registry",
            Self::NotInstalled { .. } => "not-installed",
            Self::Executable(_) => "executable",
            Self::Shortcut(_) => "shortcut",
        }
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to allocate temporary icon download: {0}")]
    TempFile(#[source] io::Error),
    #[error("failed to download icon: {0:#}")]
    Download(anyhow::Error),
    #[error("failed to read downloaded icon: {0}")]
    Read(#[source] io::Error),
    #[error("failed to decode icon image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode icon: {0}")]
    Encode(#[source] image::ImageError),
    #[error("failed to write icon: {0}")]
    Write(#[source] io::Error),
}

pub type IntegrationResult<T> = std::result::Result<T, IntegrationError>;
