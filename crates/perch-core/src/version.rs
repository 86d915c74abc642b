use anyhow::{anyhow, Context};
use semver::Version;

/// Parses package versions the way release files spell them, padding
/// `1` and `1.2` out to `1.0.0` and `1.2.0`.
pub fn parse_package_version(input: &str) -> anyhow::Result<Version> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("version must not be empty"));
    }

    let (core, suffix) = match trimmed.find(['-', '+']) {
        Some(index) => trimmed.split_at(index),
        None => (trimmed, ""),
    };

    let parts = core.split('.').collect::<Vec<_>>();
    if parts.len() > 3 {
        return Err(anyhow!(
            "version '{trimmed}' has more than three numeric components"
        ));
    }
    if parts
        .iter()
        .any(|part| part.is_empty() || !part.chars().all(|ch| ch.is_ascii_digit()))
    {
        return Err(anyhow!("version '{trimmed}' must start with numeric components"));
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).with_context(|| format!("invalid version '{trimmed}'"))
}

pub(crate) fn is_numeric_version_core(segment: &str) -> bool {
    let parts = segment.split('.').collect::<Vec<_>>();
    (1..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit()))
}
