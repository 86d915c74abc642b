use std::path::PathBuf;

use perch_core::{ReleaseEntry, ReleaseManifest};
use perch_installer::{RegistryValue, UninstallRecord};
use semver::Version;

pub(crate) fn format_release_lines(
    manifest: &ReleaseManifest,
    active: Option<&Version>,
) -> Vec<String> {
    let mut lines = manifest
        .entries()
        .iter()
        .map(format_release_entry)
        .collect::<Vec<_>>();

    let latest = manifest
        .latest()
        .map(|entry| entry.version.to_string())
        .unwrap_or_else(|| "none".to_string());
    lines.push(format!("latest: {latest}"));
    match manifest.current(active) {
        Ok(current) => lines.push(format!("current: {}", current.version)),
        Err(err) => lines.push(format!("current: unresolved ({err})")),
    }
    lines
}

fn format_release_entry(entry: &ReleaseEntry) -> String {
    let kind = if entry.is_full() { "full" } else { "delta" };
    format!(
        "{} {kind} {} ({} bytes)",
        entry.version, entry.filename, entry.file_size
    )
}

pub(crate) fn format_uninstall_record_lines(record: &UninstallRecord) -> Vec<String> {
    let mut lines = vec![format!("registered uninstall entry HKCU\\{}", record.key_path)];
    lines.extend(
        record
            .values
            .iter()
            .map(|(name, value)| format!("  {name} = {}", format_registry_value(value))),
    );
    lines
}

fn format_registry_value(value: &RegistryValue) -> String {
    match value {
        RegistryValue::String(text) => format!("\"{text}\""),
        RegistryValue::Dword(number) => format!("0x{number:08x} ({number})"),
    }
}

pub(crate) fn format_shortcut_lines(verb: &str, paths: &[PathBuf]) -> Vec<String> {
    if paths.is_empty() {
        return vec![format!("no shortcuts {verb}")];
    }
    paths
        .iter()
        .map(|path| format!("{verb} shortcut {}", path.display()))
        .collect()
}
