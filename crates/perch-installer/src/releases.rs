use anyhow::{anyhow, Context, Result};
use log::debug;
use perch_core::{parse_package_version, ReleaseEntry, ReleaseManifest};
use semver::Version;
use std::fs;
use std::io;

use crate::{AppLayout, IntegrationError, IntegrationResult};

pub fn load_release_manifest(layout: &AppLayout) -> Result<ReleaseManifest> {
    let path = layout.releases_path();
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read release manifest: {}", path.display()))?;
    let manifest = ReleaseManifest::parse(&raw)
        .with_context(|| format!("failed to parse release manifest: {}", path.display()))?;
    if manifest.is_empty() {
        return Err(anyhow!(
            "release manifest has no entries: {}",
            path.display()
        ));
    }
    Ok(manifest)
}

pub fn read_active_version(layout: &AppLayout) -> Result<Option<Version>> {
    let path = layout.current_marker_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read active install marker: {}", path.display())
            })
        }
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_package_version(trimmed)
        .map(Some)
        .with_context(|| format!("invalid active install marker: {}", path.display()))
}

pub fn resolve_latest_release(layout: &AppLayout) -> IntegrationResult<ReleaseEntry> {
    let manifest = load_release_manifest(layout).map_err(IntegrationError::Manifest)?;
    let latest = manifest
        .latest()
        .cloned()
        .ok_or_else(|| IntegrationError::Manifest(anyhow!("release manifest has no entries")))?;
    debug!(
        "resolved latest release {} ({}) for {}",
        latest.version,
        latest.filename,
        layout.app_name()
    );
    Ok(latest)
}

pub fn resolve_current_release(layout: &AppLayout) -> IntegrationResult<ReleaseEntry> {
    let manifest = load_release_manifest(layout).map_err(IntegrationError::Manifest)?;
    let active = read_active_version(layout).map_err(IntegrationError::Manifest)?;
    let current = manifest
        .current(active.as_ref())
        .cloned()
        .map_err(IntegrationError::Manifest)?;
    debug!(
        "resolved current release {} ({}) for {}",
        current.version,
        current.filename,
        layout.app_name()
    );
    Ok(current)
}
