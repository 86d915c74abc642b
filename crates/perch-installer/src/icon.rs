use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs_utils::remove_file_if_exists;
use crate::IconError;

const ICO_MAGIC: [u8; 4] = [0, 0, 1, 0];
const MAX_ICON_EDGE: u32 = 256;

pub trait IconFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpIconFetcher {
    timeout: Duration,
}

impl HttpIconFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpIconFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl IconFetcher for HttpIconFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("failed to build http client")?;
        let mut response = client
            .get(url)
            .send()
            .with_context(|| format!("failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("icon request was rejected: {url}"))?;

        let mut file = fs::File::create(destination).with_context(|| {
            format!("failed to create icon download: {}", destination.display())
        })?;
        response
            .copy_to(&mut file)
            .with_context(|| format!("failed to stream icon from {url}"))?;
        Ok(())
    }
}

/// Downloads `icon_url` and stores it as an ICO file at `destination`. The
/// temporary download is removed on every path out of this function.
pub fn materialize_icon(
    fetcher: &dyn IconFetcher,
    icon_url: &str,
    destination: &Path,
) -> std::result::Result<PathBuf, IconError> {
    let download = tempfile::Builder::new()
        .prefix("perch-icon-")
        .suffix(".download")
        .tempfile()
        .map_err(IconError::TempFile)?
        .into_temp_path();

    fetcher
        .fetch(icon_url, &download)
        .map_err(IconError::Download)?;
    let bytes = fs::read(&download).map_err(IconError::Read)?;

    let icon = if is_ico_source(icon_url, &bytes) {
        bytes
    } else {
        convert_to_ico(&bytes)?
    };

    write_icon(destination, &icon).map_err(IconError::Write)?;
    Ok(destination.to_path_buf())
}

pub(crate) fn is_ico_source(icon_url: &str, bytes: &[u8]) -> bool {
    let without_fragment = icon_url.split('#').next().unwrap_or(icon_url);
    let without_query = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);
    without_query.to_ascii_lowercase().ends_with("ico") || bytes.starts_with(&ICO_MAGIC)
}

pub(crate) fn convert_to_ico(bytes: &[u8]) -> std::result::Result<Vec<u8>, IconError> {
    let decoded = image::load_from_memory(bytes).map_err(IconError::Decode)?;
    let fitted = if decoded.width() > MAX_ICON_EDGE || decoded.height() > MAX_ICON_EDGE {
        decoded.resize(MAX_ICON_EDGE, MAX_ICON_EDGE, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgba = DynamicImage::ImageRgba8(fitted.to_rgba8());
    let mut encoded = Cursor::new(Vec::new());
    rgba.write_to(&mut encoded, ImageFormat::Ico)
        .map_err(IconError::Encode)?;
    Ok(encoded.into_inner())
}

fn write_icon(destination: &Path, icon: &[u8]) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }

    let part_path = destination.with_file_name(format!(
        "{}.part",
        destination
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("app.ico")
    ));
    let written = fs::write(&part_path, icon).and_then(|()| fs::rename(&part_path, destination));
    if written.is_err() {
        let _ = remove_file_if_exists(&part_path);
    }
    written
}
