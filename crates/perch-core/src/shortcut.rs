use std::fmt;
use std::ops::BitOr;

use anyhow::anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShortcutLocation {
    StartMenu,
    Desktop,
}

impl ShortcutLocation {
    pub const ALL: [Self; 2] = [Self::StartMenu, Self::Desktop];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StartMenu => "start-menu",
            Self::Desktop => "desktop",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start-menu" | "startmenu" | "start_menu" => Some(Self::StartMenu),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::StartMenu => 1 << 0,
            Self::Desktop => 1 << 1,
        }
    }
}

impl fmt::Display for ShortcutLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ShortcutLocations(u8);

impl ShortcutLocations {
    pub const NONE: Self = Self(0);
    pub const START_MENU: Self = Self(1 << 0);
    pub const DESKTOP: Self = Self(1 << 1);
    pub const ALL: Self = Self((1 << 0) | (1 << 1));

    pub fn contains(self, location: ShortcutLocation) -> bool {
        self.0 & location.bit() != 0
    }

    pub fn insert(&mut self, location: ShortcutLocation) {
        self.0 |= location.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Locations present in the mask, start menu first.
    pub fn iter(self) -> impl Iterator<Item = ShortcutLocation> {
        ShortcutLocation::ALL
            .into_iter()
            .filter(move |location| self.contains(*location))
    }

    /// Parses a comma separated list such as `desktop,start-menu`; `all`
    /// selects every location.
    pub fn parse_list(input: &str) -> anyhow::Result<Self> {
        let mut locations = Self::NONE;
        for token in input.split(',').map(str::trim).filter(|token| !token.is_empty()) {
            if token.eq_ignore_ascii_case("all") {
                locations = locations | Self::ALL;
                continue;
            }
            let location = ShortcutLocation::parse(token).ok_or_else(|| {
                anyhow!("unsupported shortcut location '{token}'; supported: desktop, start-menu, all")
            })?;
            locations.insert(location);
        }
        if locations.is_empty() {
            return Err(anyhow!("at least one shortcut location is required"));
        }
        Ok(locations)
    }
}

impl From<ShortcutLocation> for ShortcutLocations {
    fn from(value: ShortcutLocation) -> Self {
        Self(value.bit())
    }
}

impl BitOr for ShortcutLocations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<ShortcutLocation> for ShortcutLocations {
    type Output = Self;

    fn bitor(self, rhs: ShortcutLocation) -> Self::Output {
        Self(self.0 | rhs.bit())
    }
}
