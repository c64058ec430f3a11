use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{Branch, InstalledSniffers, PackageDescriptor, RepositoryEntry, descriptor::vendor_of};

/// Umbrella dependency replaced by the per-branch packages
pub const LEGACY_PACKAGE: &str = "squizlabs/php_codesniffer";

/// The composer.json managed in the install directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub require: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outcome of merging a requested sniffer into the manifest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciliation {
    pub needs_install: bool,
    pub plugin_paths: Vec<PathBuf>,
}

impl Manifest {
    /// Bring the manifest to the shape this tool relies on: every supported
    /// branch declared and required, the legacy umbrella package gone.
    #[tracing::instrument(skip(self))]
    pub fn normalize(&mut self) {
        for branch in Branch::ALL {
            let entry = branch.repository();
            let name = branch.package_name();

            self.repositories.retain(|r| r.name() != Some(name.as_str()));
            self.repositories.push(entry);

            self.require.insert(name, branch.version().to_string());
        }

        self.require.remove(LEGACY_PACKAGE);
        self.repositories
            .retain(|r| r.name() != Some(LEGACY_PACKAGE));
    }

    /// Merge `package` (the index's descriptor for `sniffer_name`) into the
    /// manifest.
    ///
    /// An install is needed when the sniffer is not declared yet or when its
    /// declared version differs from the published one. Plugin paths cover
    /// every declared package listed in `installed`, plus the sniffer itself
    /// when it is newly declared.
    #[tracing::instrument(skip(self, package, installed, vendor_root))]
    pub fn reconcile(
        &mut self,
        sniffer_name: &str,
        package: &PackageDescriptor,
        installed: &InstalledSniffers,
        vendor_root: &Path,
    ) -> Reconciliation {
        let mut result = Reconciliation::default();
        let mut found = false;

        for repo in self.repositories.iter_mut() {
            let Some(declared) = repo.package.as_mut() else {
                continue;
            };

            if declared.name == sniffer_name {
                found = true;

                if declared.version != package.version {
                    log::debug!(
                        "{} changed from {} to {}",
                        sniffer_name,
                        declared.version,
                        package.version
                    );
                    result.needs_install = true;
                    *declared = package.clone();
                }
            }

            if installed.contains(&declared.name) {
                result
                    .plugin_paths
                    .push(vendor_root.join(vendor_of(&declared.name)));
            }
        }

        if !found {
            result.needs_install = true;
            self.repositories.push(RepositoryEntry::package(package.clone()));
            result.plugin_paths.push(package.vendor_folder(vendor_root));
        }

        self.require
            .insert(sniffer_name.to_string(), package.version.clone());

        result
    }

    pub fn find(&self, name: &str) -> Option<&RepositoryEntry> {
        self.repositories.iter().find(|r| r.name() == Some(name))
    }

    /// The package declared under `name`.
    pub fn descriptor(&self, name: &str) -> Option<&PackageDescriptor> {
        self.find(name).and_then(|r| r.package.as_ref())
    }
}

/// Older manifests were written with `"require": []` when nothing was required.
fn map_or_empty_list<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrList {
        Map(BTreeMap<String, String>),
        List(Vec<Value>),
    }

    match MapOrList::deserialize(deserializer)? {
        MapOrList::Map(map) => Ok(map),
        MapOrList::List(list) if list.is_empty() => Ok(BTreeMap::new()),
        MapOrList::List(_) => Err(serde::de::Error::custom(
            "expected an object for \"require\"",
        )),
    }
}
