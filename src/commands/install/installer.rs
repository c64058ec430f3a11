use anyhow::Result;
use log::info;
use std::path::PathBuf;

use crate::{
    index::SnifferIndex,
    package::{ManifestStore, SnifferError, StateStore, record},
    runtime::Runtime,
};

use crate::commands::composer::run_composer;
use crate::commands::paths::InstallLayout;
use crate::commands::phpcs_config::{resolve_plugin_paths, write_configs};
use crate::commands::wrappers::install_wrappers;

/// What an install run did.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    /// Whether composer was run
    pub installed: bool,
    /// Absolute, deduplicated paths written to CodeSniffer.conf
    pub plugin_paths: Vec<PathBuf>,
    /// The `phpcs` shell entry point
    pub entry_point: PathBuf,
}

pub struct Installer<'a, R: Runtime, I: SnifferIndex, M: ManifestStore, S: StateStore> {
    pub runtime: &'a R,
    pub index: &'a I,
    pub manifest_store: &'a M,
    pub state_store: &'a S,
    pub layout: InstallLayout,
    pub php: String,
}

impl<'a, R: Runtime, I: SnifferIndex, M: ManifestStore, S: StateStore> Installer<'a, R, I, M, S> {
    pub fn new(
        runtime: &'a R,
        index: &'a I,
        manifest_store: &'a M,
        state_store: &'a S,
        layout: InstallLayout,
        php: &str,
    ) -> Self {
        Self {
            runtime,
            index,
            manifest_store,
            state_store,
            layout,
            php: php.to_string(),
        }
    }

    /// Install `sniffer_name`, running composer only when the manifest
    /// changed or `force_install` is set.
    #[tracing::instrument(skip(self))]
    pub async fn install(&self, sniffer_name: &str, force_install: bool) -> Result<InstallReport> {
        println!("Resolving {}...", sniffer_name);

        let available = self.index.list().await;
        if !available.iter().any(|name| name == sniffer_name) {
            return Err(SnifferError::NotFound(sniffer_name.to_string()).into());
        }

        let package = self.index.package(sniffer_name).await;
        if package.is_empty() {
            return Err(SnifferError::NotFound(sniffer_name.to_string()).into());
        }
        info!("Found {} {}", package.name, package.version);

        let mut manifest = self.manifest_store.load();
        let installed = self.state_store.load();
        let vendor_dir = self.layout.vendor_dir();

        let reconciliation = manifest.reconcile(sniffer_name, &package, &installed, &vendor_dir);
        let needs_install = reconciliation.needs_install || force_install;
        let mut plugin_paths = reconciliation.plugin_paths;

        self.manifest_store.save(&manifest)?;

        if needs_install {
            run_composer(self.runtime, &self.php, &self.layout)?;
            record(
                self.state_store,
                sniffer_name,
                package.phpcs_branch.as_deref().unwrap_or_default(),
            )?;
            plugin_paths.push(package.vendor_folder(&vendor_dir));
        } else {
            info!("{} {} is up to date", sniffer_name, package.version);
        }

        let plugin_paths = resolve_plugin_paths(self.runtime, plugin_paths);
        write_configs(self.runtime, &self.layout, &plugin_paths)?;
        let entry_point = install_wrappers(self.runtime, &self.layout)?;

        self.print_install_success(&entry_point);

        Ok(InstallReport {
            installed: needs_install,
            plugin_paths,
            entry_point,
        })
    }

    /// Reinstall `sniffer_name` even when its version did not change.
    pub async fn update(&self, sniffer_name: &str) -> Result<InstallReport> {
        self.install(sniffer_name, true).await
    }

    fn print_install_success(&self, entry_point: &std::path::Path) {
        println!();
        println!("Install complete");
        println!("phpcs is located at \"{}\"", entry_point.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MockSnifferIndex;
    use crate::package::{Branch, InstalledSniffers, Manifest, PackageDescriptor};
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_root;
    use std::sync::{Arc, Mutex};

    // --- In-memory stores ---

    #[derive(Default)]
    struct MemoryManifestStore {
        saved: Mutex<Option<Manifest>>,
        saves: Mutex<usize>,
    }

    impl ManifestStore for MemoryManifestStore {
        fn load(&self) -> Manifest {
            self.saved.lock().unwrap().clone().unwrap_or_else(|| {
                let mut manifest = Manifest::default();
                manifest.normalize();
                manifest
            })
        }

        fn save(&self, manifest: &Manifest) -> Result<()> {
            *self.saved.lock().unwrap() = Some(manifest.clone());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemoryStateStore {
        sniffers: Mutex<InstalledSniffers>,
    }

    impl StateStore for MemoryStateStore {
        fn load(&self) -> InstalledSniffers {
            self.sniffers.lock().unwrap().clone()
        }

        fn save(&self, sniffers: &InstalledSniffers) -> Result<()> {
            *self.sniffers.lock().unwrap() = sniffers.clone();
            Ok(())
        }
    }

    // --- Helpers ---

    fn package(name: &str, version: &str, branch: &str) -> PackageDescriptor {
        PackageDescriptor {
            name: name.to_string(),
            version: version.to_string(),
            phpcs_branch: Some(branch.to_string()),
            ..Default::default()
        }
    }

    /// Index serving `packages`, whose versions can be changed between runs.
    fn mock_index(packages: Arc<Mutex<Vec<PackageDescriptor>>>) -> MockSnifferIndex {
        let mut index = MockSnifferIndex::new();
        let listed = Arc::clone(&packages);
        index
            .expect_list()
            .returning(move || listed.lock().unwrap().iter().map(|p| p.name.clone()).collect());
        index.expect_package().returning(move |name| {
            packages
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.name == name)
                .cloned()
                .unwrap_or_default()
        });
        index
    }

    /// Runtime accepting every file operation; counts composer runs and
    /// records the last CodeSniffer.conf written.
    fn mock_runtime(composer_runs: Arc<Mutex<usize>>, conf: Arc<Mutex<String>>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_canonicalize()
            .returning(|p| Ok(p.to_path_buf()));
        runtime.expect_set_permissions().returning(|_, _| Ok(()));
        runtime.expect_write().returning(move |path, contents| {
            if path.ends_with("CodeSniffer.conf") {
                *conf.lock().unwrap() = String::from_utf8(contents.to_vec()).unwrap();
            }
            Ok(())
        });
        runtime
            .expect_run_command()
            .withf(|program, args| program == "php" && args.last().map(String::as_str) == Some("install"))
            .returning(move |_, _| {
                *composer_runs.lock().unwrap() += 1;
                Ok(0)
            });
        runtime
    }

    struct Fixture {
        runtime: MockRuntime,
        index: MockSnifferIndex,
        manifests: MemoryManifestStore,
        states: MemoryStateStore,
        packages: Arc<Mutex<Vec<PackageDescriptor>>>,
        composer_runs: Arc<Mutex<usize>>,
        conf: Arc<Mutex<String>>,
    }

    impl Fixture {
        fn new(packages: Vec<PackageDescriptor>) -> Self {
            let packages = Arc::new(Mutex::new(packages));
            let composer_runs = Arc::new(Mutex::new(0));
            let conf = Arc::new(Mutex::new(String::new()));
            Self {
                runtime: mock_runtime(Arc::clone(&composer_runs), Arc::clone(&conf)),
                index: mock_index(Arc::clone(&packages)),
                manifests: MemoryManifestStore::default(),
                states: MemoryStateStore::default(),
                packages,
                composer_runs,
                conf,
            }
        }

        fn installer(&self) -> Installer<'_, MockRuntime, MockSnifferIndex, MemoryManifestStore, MemoryStateStore> {
            Installer::new(
                &self.runtime,
                &self.index,
                &self.manifests,
                &self.states,
                InstallLayout::new(test_root()),
                "php",
            )
        }

        fn composer_runs(&self) -> usize {
            *self.composer_runs.lock().unwrap()
        }
    }

    fn vendor(name: &str) -> PathBuf {
        test_root().join("vendor").join(name)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_install_new_sniffer() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);

        let report = fixture.installer().install("symfony/Symfony2", false).await.unwrap();

        assert!(report.installed);
        assert_eq!(fixture.composer_runs(), 1);
        assert_eq!(report.plugin_paths, vec![vendor("symfony")]);
        assert_eq!(report.entry_point, test_root().join("bin").join("phpcs"));

        let manifest = fixture.manifests.load();
        assert_eq!(manifest.require["symfony/Symfony2"], "2.0");
        assert!(manifest.find("symfony/Symfony2").is_some());

        let installed = fixture.states.load();
        assert_eq!(installed.get("symfony/Symfony2").unwrap().branch, Branch::V2);

        assert!(fixture.conf.lock().unwrap().contains(&vendor("symfony").display().to_string()));
    }

    #[tokio::test]
    async fn test_install_twice_runs_composer_once() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);
        let installer = fixture.installer();

        let first = installer.install("symfony/Symfony2", false).await.unwrap();
        let second = installer.install("symfony/Symfony2", false).await.unwrap();

        assert!(first.installed);
        assert!(!second.installed);
        assert_eq!(fixture.composer_runs(), 1);
        assert_eq!(second.plugin_paths, vec![vendor("symfony")]);
        // The manifest is saved on every run
        assert_eq!(*fixture.manifests.saves.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_version_change_triggers_reinstall() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);
        let installer = fixture.installer();
        installer.install("symfony/Symfony2", false).await.unwrap();

        *fixture.packages.lock().unwrap() = vec![package("symfony/Symfony2", "2.1", "2.x")];
        let report = installer.install("symfony/Symfony2", false).await.unwrap();

        assert!(report.installed);
        assert_eq!(fixture.composer_runs(), 2);
        let manifest = fixture.manifests.load();
        assert_eq!(manifest.descriptor("symfony/Symfony2").unwrap().version, "2.1");
        assert_eq!(manifest.require["symfony/Symfony2"], "2.1");
    }

    #[tokio::test]
    async fn test_update_always_reinstalls() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);
        let installer = fixture.installer();
        installer.install("symfony/Symfony2", false).await.unwrap();

        let report = installer.update("symfony/Symfony2").await.unwrap();

        assert!(report.installed);
        assert_eq!(fixture.composer_runs(), 2);
        assert_eq!(report.plugin_paths, vec![vendor("symfony")]);
    }

    #[tokio::test]
    async fn test_plugin_paths_cover_all_installed_sniffers_once() {
        let fixture = Fixture::new(vec![
            package("symfony/Symfony2", "2.0", "2.x"),
            package("symfony/Symfony3", "3.0", "2.x"),
            package("drupal/coder", "8.1", "1.x"),
        ]);
        let installer = fixture.installer();

        installer.install("drupal/coder", false).await.unwrap();
        installer.install("symfony/Symfony2", false).await.unwrap();
        let report = installer.install("symfony/Symfony3", false).await.unwrap();

        assert_eq!(report.plugin_paths, vec![vendor("drupal"), vendor("symfony")]);
        let conf = fixture.conf.lock().unwrap().clone();
        assert!(conf.contains(&format!(
            "{},{}",
            vendor("drupal").display(),
            vendor("symfony").display()
        )));
    }

    #[tokio::test]
    async fn test_unknown_sniffer_is_fatal_before_any_write() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);

        let err = fixture.installer().install("nobody/Nothing", false).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<SnifferError>(),
            Some(&SnifferError::NotFound("nobody/Nothing".to_string()))
        );
        assert_eq!(*fixture.manifests.saves.lock().unwrap(), 0);
        assert_eq!(fixture.composer_runs(), 0);
    }

    #[tokio::test]
    async fn test_empty_descriptor_is_not_found() {
        let mut index = MockSnifferIndex::new();
        index
            .expect_list()
            .returning(|| vec!["symfony/Symfony2".to_string()]);
        index
            .expect_package()
            .returning(|_| PackageDescriptor::default());

        let runtime = MockRuntime::new();
        let manifests = MemoryManifestStore::default();
        let states = MemoryStateStore::default();
        let installer = Installer::new(
            &runtime,
            &index,
            &manifests,
            &states,
            InstallLayout::new(test_root()),
            "php",
        );

        let err = installer.install("symfony/Symfony2", false).await.unwrap_err();
        assert!(err.downcast_ref::<SnifferError>().is_some());
    }

    #[tokio::test]
    async fn test_unsupported_branch_fails_after_composer() {
        let fixture = Fixture::new(vec![package("future/Sniffs", "1.0", "4.x")]);

        let err = fixture.installer().install("future/Sniffs", false).await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<SnifferError>(),
            Some(&SnifferError::UnsupportedBranch("4.x".to_string()))
        );
        // Manifest was already written and composer already ran
        assert_eq!(*fixture.manifests.saves.lock().unwrap(), 1);
        assert_eq!(fixture.composer_runs(), 1);
        assert!(fixture.states.load().is_empty());
    }

    #[tokio::test]
    async fn test_composer_failure_leaves_state_untouched() {
        let fixture = Fixture::new(vec![package("symfony/Symfony2", "2.0", "2.x")]);

        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_run_command().returning(|_, _| Ok(1));

        let installer = Installer::new(
            &runtime,
            &fixture.index,
            &fixture.manifests,
            &fixture.states,
            InstallLayout::new(test_root()),
            "php",
        );

        assert!(installer.install("symfony/Symfony2", false).await.is_err());
        assert!(fixture.states.load().is_empty());
        assert!(fixture.manifests.load().find("symfony/Symfony2").is_some());
    }
}
