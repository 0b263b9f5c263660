// tests/sync_commands.rs

//! `deploy`, `pull` and `zip` wiring against a recording fake gateway.

use std::error::Error;
use std::sync::Arc;

use leafbuild::commands::{deploy, pull, zip, Project};
use leafbuild::config::ProjectPaths;
use leafbuild::errors::LeafError;
use leafbuild::graph::RunOutcome;
use leafbuild::report::ErrorCollector;
use leafbuild_test_utils::builders::{ProjectConfigBuilder, ProjectTree};
use leafbuild_test_utils::fakes::{FakeGateway, SyncCall};
use leafbuild_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn project_for(tree: &ProjectTree) -> Project {
    Project {
        config: ProjectConfigBuilder::default()
            .with_theme("production", "654321")
            .build(),
        paths: ProjectPaths::new(tree.root()),
        collector: ErrorCollector::new(),
    }
}

fn seeded_tree() -> ProjectTree {
    let tree = ProjectTree::new();
    tree.write("src/scripts/theme.js", "console.log('theme');\n")
        .write("src/styles/theme.scss", "body { color: red; }\n")
        .write("src/templates/cart.liquid", "{{ cart | json }}")
        .write("src/config/settings_schema.json", "[]");
    tree
}

#[tokio::test]
async fn deploy_builds_pushes_then_cleans() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new();

    let options = deploy::DeployOptions {
        environment: "development".to_string(),
        store: None,
        dev: false,
        delete: false,
    };
    let outcome =
        with_timeout(deploy::run(&project, Arc::new(gateway.clone()), options)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    assert_eq!(
        gateway.calls(),
        vec![SyncCall::Push {
            store: "test.example-store.com".to_string(),
            environment: "development".to_string(),
            delete_mode_is_delete: false,
        }]
    );

    // The trailing clean removed the staged output tree again.
    assert!(!tree.exists("dist"));
    Ok(())
}

#[tokio::test]
async fn deploy_with_delete_flag_forwards_delete_mode() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new();

    let options = deploy::DeployOptions {
        environment: "production".to_string(),
        store: None,
        dev: true,
        delete: true,
    };
    with_timeout(deploy::run(&project, Arc::new(gateway.clone()), options)).await?;

    assert_eq!(
        gateway.calls(),
        vec![SyncCall::Push {
            store: "test.example-store.com".to_string(),
            environment: "production".to_string(),
            delete_mode_is_delete: true,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn failed_push_aborts_the_deploy_before_clean() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new().fail_on("push");

    let options = deploy::DeployOptions {
        environment: "development".to_string(),
        store: None,
        dev: false,
        delete: false,
    };
    let err = with_timeout(deploy::run(&project, Arc::new(gateway), options))
        .await
        .unwrap_err();

    assert!(matches!(err, LeafError::FatalStage { ref stage, .. } if stage == "push:dist"));
    // Clean never ran, so the built tree survives for inspection.
    assert!(tree.exists("dist/assets/theme.js"));
    Ok(())
}

#[tokio::test]
async fn pull_settings_stages_in_tmp_and_syncs_back_only_settings() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new()
        .on_pull_write("config/settings_data.json", "{\"current\":{}}")
        .on_pull_write("assets/vendor.js", "window.vendor = 1;");

    let options = pull::PullOptions {
        environment: "development".to_string(),
        store: None,
        all: false,
        delete: false,
    };
    let outcome = with_timeout(pull::run(&project, Arc::new(gateway.clone()), options)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        &calls[0],
        SyncCall::Pull { target_dir, .. } if target_dir.ends_with("tmp")
    ));

    // Settings came back into src; non-settings files stayed out of it.
    assert_eq!(tree.read("src/config/settings_data.json"), "{\"current\":{}}");
    assert!(!tree.exists("src/assets/vendor.js"));

    // The staging tree was cleaned up afterwards.
    assert!(!tree.exists("tmp"));
    Ok(())
}

#[tokio::test]
async fn pull_all_targets_the_source_tree_directly() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new().on_pull_write("layout/theme.liquid", "<html></html>");

    let options = pull::PullOptions {
        environment: "development".to_string(),
        store: None,
        all: true,
        delete: false,
    };
    let outcome = with_timeout(pull::run(&project, Arc::new(gateway.clone()), options)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        &calls[0],
        SyncCall::Pull { target_dir, .. } if target_dir.ends_with("src")
    ));
    assert_eq!(tree.read("src/layout/theme.liquid"), "<html></html>");
    Ok(())
}

#[tokio::test]
async fn zip_builds_packages_and_stages_the_archive() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new()
        .on_package_write(tree.root().join("dist/theme-1.0.0.zip"), "zipbytes");

    let outcome = with_timeout(zip::run(&project, Arc::new(gateway.clone()))).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    assert_eq!(gateway.calls(), vec![SyncCall::Package]);
    assert_eq!(tree.read("upload/theme-1.0.0.zip"), "zipbytes");
    // The build ran first, so the packaged tree was fresh.
    assert!(tree.exists("dist/assets/theme.js"));
    Ok(())
}

#[tokio::test]
async fn unknown_store_flag_is_a_config_error() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);
    let gateway = FakeGateway::new();

    let options = deploy::DeployOptions {
        environment: "development".to_string(),
        store: Some("apac".to_string()),
        dev: false,
        delete: false,
    };
    let err = with_timeout(deploy::run(&project, Arc::new(gateway.clone()), options))
        .await
        .unwrap_err();

    assert!(matches!(err, LeafError::ConfigError(_)));
    assert!(gateway.calls().is_empty());
    Ok(())
}
