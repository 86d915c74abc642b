use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

pub trait VersionInfoReader {
    /// Product name from the executable's version resource; empty when the
    /// resource does not declare one.
    fn product_name(&self, executable: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PowershellVersionInfoReader;

impl VersionInfoReader for PowershellVersionInfoReader {
    fn product_name(&self, executable: &Path) -> Result<String> {
        read_product_name_with_executor(executable, run_command_capture)
    }
}

pub(crate) fn read_product_name_with_executor<RunCommand>(
    executable: &Path,
    mut run_command_executor: RunCommand,
) -> Result<String>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<String>,
{
    if !executable.is_file() {
        return Err(anyhow!(
            "executable not found for version info: {}",
            executable.display()
        ));
    }

    let mut command = build_product_name_command(executable);
    let stdout = run_command_executor(
        &mut command,
        "failed to read executable version info",
    )?;
    Ok(stdout.trim().to_string())
}

pub(crate) fn build_product_name_command(executable: &Path) -> Command {
    let literal = executable.display().to_string().replace('\'', "''");
    let mut command = Command::new("powershell");
    command
        .arg("-NoProfile")
        .arg("-NonInteractive")
        .arg("-Command")
        .arg(format!(
            "(Get-Item -LiteralPath '{literal}').VersionInfo.ProductName"
        ));
    command
}

pub(crate) fn run_command_capture(command: &mut Command, context_message: &str) -> Result<String> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() {
        return Ok(stdout.into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        output.status,
        stdout.trim(),
        stderr.trim()
    ))
}
