//! ABI target identities.
//!
//! A generation run targets exactly one of these. The target fixes the
//! machine word size (and with it the pointer category and the object header
//! size) and selects which aggregate-classification rules apply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three supported calling-convention families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// 32-bit universal convention (x86, armv7).
    X86,
    /// 64-bit universal convention (x86-64 System V and Win64).
    X64,
    /// AArch64 procedure call standard, with homogeneous float aggregates.
    Arm64,
}

impl Target {
    /// Every supported target, in declaration order.
    pub const ALL: [Self; 3] = [Self::X86, Self::X64, Self::Arm64];

    /// Machine word (pointer) size in bytes.
    #[inline]
    pub const fn word_size(self) -> u32 {
        match self {
            Self::X86 => 4,
            Self::X64 | Self::Arm64 => 8,
        }
    }

    /// Lowercase name used on the command line and in catalog files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }

    /// Parse a target name. Accepts a few common aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x86" | "i686" | "32" | "universal32" => Some(Self::X86),
            "x64" | "x86_64" | "amd64" | "64" | "universal64" => Some(Self::X64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
