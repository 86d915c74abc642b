use perch_core::ShortcutLocation;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RegistryValue {
    String(String),
    Dword(u32),
}

impl RegistryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Dword(_) => None,
        }
    }

    pub fn as_dword(&self) -> Option<u32> {
        match self {
            Self::String(_) => None,
            Self::Dword(value) => Some(*value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UninstallRecord {
    pub key_path: String,
    pub values: Vec<(String, RegistryValue)>,
}

impl UninstallRecord {
    pub fn value(&self, name: &str) -> Option<&RegistryValue> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(RegistryValue::as_str)
    }

    pub fn dword(&self, name: &str) -> Option<u32> {
        self.value(name).and_then(RegistryValue::as_dword)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutTarget {
    pub location: ShortcutLocation,
    pub display_title: String,
    pub executable_path: PathBuf,
    pub working_directory: PathBuf,
    pub icon_path: PathBuf,
    pub icon_index: u32,
    pub description: String,
}
