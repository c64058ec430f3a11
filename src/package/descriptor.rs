use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::SnifferError;

/// Repository type used for every entry this tool writes into composer.json
pub const PACKAGE_REPOSITORY_TYPE: &str = "package";

/// Supported PHP_CodeSniffer major lines, each pinned to a fixed release.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    #[serde(rename = "1.x")]
    V1,
    #[serde(rename = "2.x")]
    V2,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::V1, Branch::V2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::V1 => "1.x",
            Branch::V2 => "2.x",
        }
    }

    /// The PHP_CodeSniffer release installed for this branch.
    pub fn version(&self) -> &'static str {
        match self {
            Branch::V1 => "1.5.6",
            Branch::V2 => "2.3.0",
        }
    }

    /// Composer package name, e.g. `squizlabs/phpcs-2.x`.
    pub fn package_name(&self) -> String {
        format!("squizlabs/phpcs-{}", self.as_str())
    }

    /// The fixed repository entry declaring this branch's package.
    pub fn repository(&self) -> RepositoryEntry {
        let mut extra = Map::new();
        extra.insert(
            "dist".to_string(),
            json!({
                "url": format!(
                    "https://github.com/squizlabs/PHP_CodeSniffer/archive/{}.zip",
                    self.version()
                ),
                "type": "zip",
            }),
        );
        extra.insert("bin".to_string(), json!(["scripts/phpcs"]));

        RepositoryEntry::package(PackageDescriptor {
            name: self.package_name(),
            version: self.version().to_string(),
            phpcs_branch: None,
            extra,
        })
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = SnifferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| SnifferError::UnsupportedBranch(s.to_string()))
    }
}

/// A package as published by the sniffer index and stored in composer.json.
///
/// Fields this tool does not interpret (`dist`, `source`, `autoload`, ...) are
/// kept in `extra` so they reach composer unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PackageDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(
        rename = "phpcs-branch",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub phpcs_branch: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageDescriptor {
    /// True for the placeholder returned when the index could not be read.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Vendor part of `vendor/name`.
    pub fn vendor(&self) -> &str {
        vendor_of(&self.name)
    }

    /// `<vendor_root>/<vendor>`, the directory PHP_CodeSniffer scans for standards.
    pub fn vendor_folder(&self, vendor_root: &Path) -> PathBuf {
        vendor_root.join(self.vendor())
    }
}

pub(crate) fn vendor_of(name: &str) -> &str {
    name.split('/').next().unwrap_or(name)
}

/// An entry of the composer.json `repositories` list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RepositoryEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Only set for `package` repositories; `vcs`, `composer`, ... entries have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageDescriptor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepositoryEntry {
    pub fn package(package: PackageDescriptor) -> Self {
        Self {
            kind: PACKAGE_REPOSITORY_TYPE.to_string(),
            package: Some(package),
            extra: Map::new(),
        }
    }

    /// Name of the declared package, if this entry declares one.
    pub fn name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }
}
