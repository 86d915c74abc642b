use anyhow::{anyhow, Context, Result};
use mslnk::ShellLink;
use std::path::Path;

use crate::ShortcutTarget;

pub trait ShortcutWriter {
    fn save(&self, shortcut: &ShortcutTarget, path: &Path) -> Result<()>;
}

/// Writes Windows shell link (`.lnk`) files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellLinkWriter;

impl ShortcutWriter for ShellLinkWriter {
    fn save(&self, shortcut: &ShortcutTarget, path: &Path) -> Result<()> {
        // mslnk leaves the header icon index at zero.
        if shortcut.icon_index != 0 {
            return Err(anyhow!(
                "shell link icon index {} is not supported for {}",
                shortcut.icon_index,
                path.display()
            ));
        }

        let mut link = ShellLink::new(&shortcut.executable_path).with_context(|| {
            format!(
                "failed to build shell link for {}",
                shortcut.executable_path.display()
            )
        })?;
        link.set_name(Some(shortcut.description.clone()));
        link.set_working_dir(Some(shortcut.working_directory.display().to_string()));
        link.set_icon_location(Some(shortcut.icon_path.display().to_string()));
        link.create_lnk(path)
            .with_context(|| format!("failed to write shell link: {}", path.display()))
    }
}
