use std::path::Path;

use anyhow::{anyhow, Result};
use log::debug;
use perch_installer::{
    default_app_root, load_release_manifest, read_active_version, AppLayout, HttpIconFetcher,
    NuspecPackageReader, PowershellVersionInfoReader, ShellFolders, ShellLinkWriter,
    ShortcutManager, UninstallRegistrar, WindowsRegistry,
};

use crate::completion::write_completions_script;
use crate::render::{format_release_lines, format_shortcut_lines, format_uninstall_record_lines};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let Cli {
        root,
        app_name,
        command,
        ..
    } = cli;

    match command {
        Commands::Releases => {
            let layout = resolve_layout(root.as_deref(), app_name.as_deref())?;
            let manifest = load_release_manifest(&layout)?;
            let active = read_active_version(&layout)?;
            for line in format_release_lines(&manifest, active.as_ref()) {
                println!("{line}");
            }
        }
        Commands::RegisterUninstall {
            uninstall_command,
            quiet_switch,
            json,
        } => {
            let layout = resolve_layout(root.as_deref(), app_name.as_deref())?;
            let icons = HttpIconFetcher::default();
            let registrar =
                UninstallRegistrar::new(&layout, &WindowsRegistry, &NuspecPackageReader, &icons);
            let record =
                registrar.create_uninstaller_registry_entry(&uninstall_command, &quiet_switch)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for line in format_uninstall_record_lines(&record) {
                    println!("{line}");
                }
            }
        }
        Commands::UnregisterUninstall => {
            let layout = resolve_layout(root.as_deref(), app_name.as_deref())?;
            let icons = HttpIconFetcher::default();
            UninstallRegistrar::new(&layout, &WindowsRegistry, &NuspecPackageReader, &icons)
                .remove_uninstaller_registry_entry()?;
            println!("removed uninstall entry HKCU\\{}", layout.uninstall_key());
        }
        Commands::CreateShortcuts { exe, locations } => {
            let layout = resolve_layout(root.as_deref(), app_name.as_deref())?;
            let folders = ShellFolders::detect()?;
            let manager = ShortcutManager::new(
                &layout,
                &folders,
                &NuspecPackageReader,
                &PowershellVersionInfoReader,
                &ShellLinkWriter,
            );
            let created = manager.create_shortcuts_for_executable(&exe, locations)?;
            for line in format_shortcut_lines("created", &created) {
                println!("{line}");
            }
        }
        Commands::RemoveShortcuts { exe, locations } => {
            let layout = resolve_layout(root.as_deref(), app_name.as_deref())?;
            let folders = ShellFolders::detect()?;
            let manager = ShortcutManager::new(
                &layout,
                &folders,
                &NuspecPackageReader,
                &PowershellVersionInfoReader,
                &ShellLinkWriter,
            );
            let removed = manager.remove_shortcuts_for_executable(&exe, locations)?;
            for line in format_shortcut_lines("removed", &removed) {
                println!("{line}");
            }
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

/// The application name defaults to the install root's directory name.
pub(crate) fn resolve_layout(root: Option<&Path>, app_name: Option<&str>) -> Result<AppLayout> {
    let app_name = match (app_name, root) {
        (Some(app_name), _) => app_name.to_string(),
        (None, Some(root)) => root
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "cannot infer application name from root {}; pass --app-name",
                    root.display()
                )
            })?,
        (None, None) => return Err(anyhow!("--app-name is required when --root is not given")),
    };
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => default_app_root(&app_name)?,
    };

    debug!("using install root {} for {app_name}", root.display());
    AppLayout::new(root, app_name)
}
