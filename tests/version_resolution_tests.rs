//! Version precedence: explicit pin, then lockfile, then the registry's
//! latest; `--frozen` restricts resolution to the lockfile.

mod common;

use common::{MockRegistry, TestProject, archive};

use agentpm::error::AgentPmError;
use agentpm::installer::{InstallOptions, InstallOutcome, Installer};
use agentpm::lockfile::Lockfile;
use agentpm::router::{Format, Subtype};

fn registry_with_versions() -> MockRegistry {
    let mut registry = MockRegistry::new();
    registry.add_package(
        "acme/review-rule",
        Format::Cursor,
        Subtype::Rule,
        &[
            ("1.0.0", archive(&[("review-rule.md", b"# v1")])),
            ("2.0.0", archive(&[("review-rule.md", b"# v2")])),
        ],
    );
    registry
}

#[test]
fn test_no_version_installs_latest() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    let outcome = installer
        .install("@acme/review-rule", &InstallOptions::default())
        .unwrap();
    assert_eq!(outcome.version(), "2.0.0");
}

#[test]
fn test_explicit_version_overrides_locked() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    installer
        .install("@acme/review-rule@1.0.0", &InstallOptions::default())
        .unwrap();
    assert_eq!(project.read_file(".cursor/rules/review-rule.mdc"), "# v1");

    // Locked at 1.0.0; an explicit 2.0.0 wins and rewrites in place
    let outcome = installer
        .install("@acme/review-rule@2.0.0", &InstallOptions::default())
        .unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::Installed {
            version: "2.0.0".to_string()
        }
    );
    assert_eq!(project.read_file(".cursor/rules/review-rule.mdc"), "# v2");

    let lockfile = Lockfile::load(&project.path).unwrap().unwrap();
    assert_eq!(lockfile.entry("acme/review-rule").unwrap().version, "2.0.0");
}

#[test]
fn test_locked_version_pins_unversioned_reinstall() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    installer
        .install("@acme/review-rule@1.0.0", &InstallOptions::default())
        .unwrap();
    let downloads = registry.download_count();

    // No version given: the lockfile answers, no upgrade to latest
    let outcome = installer
        .install("@acme/review-rule", &InstallOptions::default())
        .unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::AlreadySatisfied {
            version: "1.0.0".to_string()
        }
    );
    assert_eq!(registry.download_count(), downloads);
    assert_eq!(project.read_file(".cursor/rules/review-rule.mdc"), "# v1");
}

#[test]
fn test_frozen_without_lock_entry_fails() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    let options = InstallOptions {
        frozen: true,
        ..InstallOptions::default()
    };
    let err = installer.install("@acme/review-rule", &options).unwrap_err();
    assert!(matches!(err, AgentPmError::LockfileEntryMissing { .. }));
    assert_eq!(registry.download_count(), 0);
}

#[test]
fn test_frozen_with_lock_entry_is_fully_offline() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);
    installer
        .install("@acme/review-rule@1.0.0", &InstallOptions::default())
        .unwrap();

    // Registry with no packages at all: frozen re-install must not need it
    let empty_registry = MockRegistry::new();
    let offline = Installer::new(&project.path, &empty_registry);
    let options = InstallOptions {
        frozen: true,
        ..InstallOptions::default()
    };
    let outcome = offline.install("@acme/review-rule", &options).unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::AlreadySatisfied {
            version: "1.0.0".to_string()
        }
    );
    assert_eq!(empty_registry.download_count(), 0);
}

#[test]
fn test_unknown_explicit_version_fails() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    let err = installer
        .install("@acme/review-rule@9.9.9", &InstallOptions::default())
        .unwrap_err();
    assert!(matches!(err, AgentPmError::VersionNotFound { .. }));
    assert!(Lockfile::load(&project.path).unwrap().is_none());
}

#[test]
fn test_spec_version_applies_when_reference_carries_none() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    let options = InstallOptions {
        spec_version: Some("1.0.0".to_string()),
        ..InstallOptions::default()
    };
    let outcome = installer.install("@acme/review-rule", &options).unwrap();
    assert_eq!(outcome.version(), "1.0.0");
}

#[test]
fn test_explicit_version_beats_spec_version() {
    let project = TestProject::new();
    let registry = registry_with_versions();
    let installer = Installer::new(&project.path, &registry);

    let options = InstallOptions {
        spec_version: Some("1.0.0".to_string()),
        ..InstallOptions::default()
    };
    let outcome = installer
        .install("@acme/review-rule@2.0.0", &options)
        .unwrap();
    assert_eq!(outcome.version(), "2.0.0");
}
