use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::RegistryValue;

/// Per-user hierarchical key/value store. Paths are backslash separated and
/// relative to the user hive; names compare case-insensitively.
pub trait RegistryStore {
    /// Opens the key for writing, creating it and any missing parents.
    fn create_key(&self, path: &str) -> Result<()>;
    fn key_exists(&self, path: &str) -> Result<bool>;
    fn set_value(&self, path: &str, name: &str, value: &RegistryValue) -> Result<()>;
    /// Deletes the key and every subkey beneath it; fails when it is absent.
    fn delete_key_tree(&self, path: &str) -> Result<()>;
    fn read_values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>>;
}

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    keys: RefCell<BTreeMap<String, Vec<(String, RegistryValue)>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_paths(&self) -> Vec<String> {
        self.keys.borrow().keys().cloned().collect()
    }
}

fn normalize_key_path(path: &str) -> String {
    path.split('\\')
        .filter(|segment| !segment.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("\\")
}

impl RegistryStore for MemoryRegistry {
    fn create_key(&self, path: &str) -> Result<()> {
        let normalized = normalize_key_path(path);
        if normalized.is_empty() {
            return Err(anyhow!("registry key path must not be empty"));
        }

        let mut keys = self.keys.borrow_mut();
        let mut prefix = String::new();
        for segment in normalized.split('\\') {
            if !prefix.is_empty() {
                prefix.push('\\');
            }
            prefix.push_str(segment);
            keys.entry(prefix.clone()).or_default();
        }
        Ok(())
    }

    fn key_exists(&self, path: &str) -> Result<bool> {
        Ok(self.keys.borrow().contains_key(&normalize_key_path(path)))
    }

    fn set_value(&self, path: &str, name: &str, value: &RegistryValue) -> Result<()> {
        let mut keys = self.keys.borrow_mut();
        let Some(values) = keys.get_mut(&normalize_key_path(path)) else {
            return Err(anyhow!("registry key not found: {path}"));
        };
        match values
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.clone(),
            None => values.push((name.to_string(), value.clone())),
        }
        Ok(())
    }

    fn delete_key_tree(&self, path: &str) -> Result<()> {
        let normalized = normalize_key_path(path);
        let mut keys = self.keys.borrow_mut();
        if !keys.contains_key(&normalized) {
            return Err(anyhow!("registry key not found: {path}"));
        }
        let child_prefix = format!("{normalized}\\");
        keys.retain(|key, _| key != &normalized && !key.starts_with(&child_prefix));
        Ok(())
    }

    fn read_values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>> {
        self.keys
            .borrow()
            .get(&normalize_key_path(path))
            .cloned()
            .ok_or_else(|| anyhow!("registry key not found: {path}"))
    }
}

/// The current user's hive (`HKEY_CURRENT_USER`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl RegistryStore for WindowsRegistry {
    fn create_key(&self, path: &str) -> Result<()> {
        use anyhow::Context;

        current_user()
            .create_subkey(path)
            .with_context(|| format!("failed to create registry key HKCU\\{path}"))?;
        Ok(())
    }

    fn key_exists(&self, path: &str) -> Result<bool> {
        match current_user().open_subkey(path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(anyhow!("failed to open registry key HKCU\\{path}: {err}")),
        }
    }

    fn set_value(&self, path: &str, name: &str, value: &RegistryValue) -> Result<()> {
        use anyhow::Context;
        use winreg::enums::KEY_SET_VALUE;

        let key = current_user()
            .open_subkey_with_flags(path, KEY_SET_VALUE)
            .with_context(|| format!("failed to open registry key HKCU\\{path}"))?;
        let written = match value {
            RegistryValue::String(text) => key.set_value(name, text),
            RegistryValue::Dword(number) => key.set_value(name, number),
        };
        written.with_context(|| format!("failed to set registry value '{name}' on HKCU\\{path}"))
    }

    fn delete_key_tree(&self, path: &str) -> Result<()> {
        use anyhow::Context;

        current_user()
            .delete_subkey_all(path)
            .with_context(|| format!("failed to delete registry key HKCU\\{path}"))
    }

    fn read_values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>> {
        use anyhow::Context;
        use winreg::enums::RegType;
        use winreg::types::FromRegValue;

        let key = current_user()
            .open_subkey(path)
            .with_context(|| format!("failed to open registry key HKCU\\{path}"))?;
        let mut values = Vec::new();
        for entry in key.enum_values() {
            let (name, raw) =
                entry.with_context(|| format!("failed to enumerate values of HKCU\\{path}"))?;
            let value = match raw.vtype {
                RegType::REG_SZ | RegType::REG_EXPAND_SZ => {
                    RegistryValue::String(String::from_reg_value(&raw)?)
                }
                RegType::REG_DWORD => RegistryValue::Dword(u32::from_reg_value(&raw)?),
                _ => continue,
            };
            values.push((name, value));
        }
        Ok(values)
    }
}

#[cfg(windows)]
fn current_user() -> winreg::RegKey {
    winreg::RegKey::predef(winreg::enums::HKEY_CURRENT_USER)
}

#[cfg(not(windows))]
impl RegistryStore for WindowsRegistry {
    fn create_key(&self, path: &str) -> Result<()> {
        Err(unsupported_host(path))
    }

    fn key_exists(&self, path: &str) -> Result<bool> {
        Err(unsupported_host(path))
    }

    fn set_value(&self, path: &str, _name: &str, _value: &RegistryValue) -> Result<()> {
        Err(unsupported_host(path))
    }

    fn delete_key_tree(&self, path: &str) -> Result<()> {
        Err(unsupported_host(path))
    }

    fn read_values(&self, path: &str) -> Result<Vec<(String, RegistryValue)>> {
        Err(unsupported_host(path))
    }
}

#[cfg(not(windows))]
fn unsupported_host(path: &str) -> anyhow::Error {
    anyhow!("registry key HKCU\\{path} is supported only on Windows hosts")
}
