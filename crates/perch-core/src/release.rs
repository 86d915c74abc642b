use std::cmp::Ordering;

use anyhow::{anyhow, Context};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::version::{is_numeric_version_core, parse_package_version};

const PACKAGE_EXTENSION: &str = ".nupkg";
const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub sha1: String,
    pub filename: String,
    pub file_size: u64,
    pub version: Version,
    pub is_delta: bool,
}

impl ReleaseEntry {
    pub fn parse_line(line: &str) -> anyhow::Result<Self> {
        let fields = line.split_whitespace().collect::<Vec<_>>();
        let [sha1, filename, file_size] = fields.as_slice() else {
            return Err(anyhow!(
                "expected '<sha1> <filename> <size>', found {} field(s)",
                fields.len()
            ));
        };

        let digest = hex::decode(sha1).with_context(|| format!("invalid sha1 '{sha1}'"))?;
        if digest.len() != 20 {
            return Err(anyhow!("sha1 '{sha1}' must be 40 hex characters"));
        }
        let file_size = file_size
            .parse::<u64>()
            .with_context(|| format!("invalid package size '{file_size}'"))?;
        let (version, is_delta) = version_from_filename(filename)?;

        Ok(Self {
            sha1: sha1.to_ascii_uppercase(),
            filename: (*filename).to_string(),
            file_size,
            version,
            is_delta,
        })
    }

    pub fn is_full(&self) -> bool {
        !self.is_delta
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseManifest {
    entries: Vec<ReleaseEntry>,
}

impl ReleaseManifest {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let mut entries = Vec::new();
        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let entry = ReleaseEntry::parse_line(line)
                .with_context(|| format!("invalid release entry on line {}", index + 1))?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ReleaseEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest version; a full package beats a delta of the same version and
    /// the earliest line wins any remaining tie.
    pub fn latest(&self) -> Option<&ReleaseEntry> {
        self.entries
            .iter()
            .reduce(|best, candidate| match compare_entries(candidate, best) {
                Ordering::Greater => candidate,
                _ => best,
            })
    }

    pub fn latest_full(&self) -> Option<&ReleaseEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_full())
            .reduce(|best, candidate| match candidate.version.cmp(&best.version) {
                Ordering::Greater => candidate,
                _ => best,
            })
    }

    pub fn find_full(&self, version: &Version) -> Option<&ReleaseEntry> {
        self.entries
            .iter()
            .find(|entry| entry.is_full() && &entry.version == version)
    }

    /// The release the active install marker points at, or the latest full
    /// release when no marker is present.
    pub fn current(&self, active_version: Option<&Version>) -> anyhow::Result<&ReleaseEntry> {
        match active_version {
            Some(version) => self.find_full(version).ok_or_else(|| {
                anyhow!("active version {version} has no full package in the release manifest")
            }),
            None => self
                .latest_full()
                .ok_or_else(|| anyhow!("release manifest has no full packages")),
        }
    }
}

fn compare_entries(left: &ReleaseEntry, right: &ReleaseEntry) -> Ordering {
    left.version
        .cmp(&right.version)
        .then_with(|| left.is_full().cmp(&right.is_full()))
}

fn version_from_filename(filename: &str) -> anyhow::Result<(Version, bool)> {
    let lower = filename.to_ascii_lowercase();
    if !lower.ends_with(PACKAGE_EXTENSION) {
        return Err(anyhow!(
            "package filename '{filename}' must end with {PACKAGE_EXTENSION}"
        ));
    }
    let stem = &filename[..filename.len() - PACKAGE_EXTENSION.len()];
    let lower_stem = stem.to_ascii_lowercase();

    let (stem, is_delta) = if lower_stem.ends_with("-delta") {
        (&stem[..stem.len() - "-delta".len()], true)
    } else if lower_stem.ends_with("-full") {
        (&stem[..stem.len() - "-full".len()], false)
    } else {
        (stem, false)
    };

    let segments = stem.split('-').collect::<Vec<_>>();
    for index in 1..segments.len() {
        if !is_numeric_version_core(segments[index]) {
            continue;
        }
        let prerelease = &segments[index + 1..];
        if prerelease
            .first()
            .is_some_and(|first| !first.starts_with(|ch: char| ch.is_ascii_alphabetic()))
        {
            continue;
        }

        let raw_version = segments[index..].join("-");
        let version = parse_package_version(&raw_version)
            .with_context(|| format!("invalid version in package filename '{filename}'"))?;
        return Ok((version, is_delta));
    }

    Err(anyhow!(
        "package filename '{filename}' does not contain a version"
    ))
}
