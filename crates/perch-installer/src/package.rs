use anyhow::{anyhow, Context, Result};
use perch_core::{parse_package_version, PackageMetadata};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub trait PackageReader {
    fn read_metadata(&self, archive_path: &Path) -> Result<PackageMetadata>;
}

/// Reads the root-level `.nuspec` document of a `.nupkg` zip archive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NuspecPackageReader;

impl PackageReader for NuspecPackageReader {
    fn read_metadata(&self, archive_path: &Path) -> Result<PackageMetadata> {
        let file = File::open(archive_path).with_context(|| {
            format!("failed to open package archive: {}", archive_path.display())
        })?;
        let mut archive = zip::ZipArchive::new(file).with_context(|| {
            format!("failed to read package archive: {}", archive_path.display())
        })?;

        let mut nuspec_index = None;
        for index in 0..archive.len() {
            let entry = archive.by_index(index).with_context(|| {
                format!(
                    "failed to read entry {index} of package archive: {}",
                    archive_path.display()
                )
            })?;
            let name = entry.name();
            if !name.contains('/') && name.to_ascii_lowercase().ends_with(".nuspec") {
                if nuspec_index.is_some() {
                    return Err(anyhow!(
                        "package archive contains more than one .nuspec: {}",
                        archive_path.display()
                    ));
                }
                nuspec_index = Some(index);
            }
        }
        let Some(nuspec_index) = nuspec_index else {
            return Err(anyhow!(
                "package archive has no root .nuspec document: {}",
                archive_path.display()
            ));
        };

        let mut raw = String::new();
        archive
            .by_index(nuspec_index)?
            .read_to_string(&mut raw)
            .with_context(|| {
                format!(
                    "failed to read .nuspec from package archive: {}",
                    archive_path.display()
                )
            })?;

        parse_nuspec(&raw).with_context(|| {
            format!(
                "failed to parse .nuspec from package archive: {}",
                archive_path.display()
            )
        })
    }
}

#[derive(Debug, Deserialize)]
struct NuspecDocument {
    metadata: NuspecMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NuspecMetadata {
    id: String,
    version: String,
    title: Option<String>,
    authors: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    icon_url: Option<String>,
    project_url: Option<String>,
}

pub(crate) fn parse_nuspec(raw: &str) -> Result<PackageMetadata> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let document: NuspecDocument =
        quick_xml::de::from_str(raw).context("invalid .nuspec document")?;
    let metadata = document.metadata;

    let version = parse_package_version(&metadata.version)
        .with_context(|| format!("invalid .nuspec version '{}'", metadata.version))?;
    let authors = metadata
        .authors
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    let package = PackageMetadata {
        id: metadata.id.trim().to_string(),
        version,
        title: non_empty(metadata.title),
        description: non_empty(metadata.description),
        summary: non_empty(metadata.summary),
        icon_url: non_empty(metadata.icon_url),
        authors,
        project_url: non_empty(metadata.project_url),
    };
    package.validate()?;
    Ok(package)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
