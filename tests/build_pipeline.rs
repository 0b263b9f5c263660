// tests/build_pipeline.rs

//! End-to-end `build` runs against a real on-disk project tree.

use std::error::Error;

use leafbuild::commands::{build, Project};
use leafbuild::config::ProjectPaths;
use leafbuild::graph::RunOutcome;
use leafbuild::report::ErrorCollector;
use leafbuild_test_utils::builders::{ProjectConfigBuilder, ProjectTree};
use leafbuild_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn project_for(tree: &ProjectTree) -> Project {
    Project {
        config: ProjectConfigBuilder::default().build(),
        paths: ProjectPaths::new(tree.root()),
        collector: ErrorCollector::new(),
    }
}

fn seeded_tree() -> ProjectTree {
    let tree = ProjectTree::new();
    tree.write("src/scripts/theme.js", "console.log('theme');\n")
        .write("src/styles/theme.scss", "body { color: red; }\n")
        .write("src/styles/_mixins.scss", "@mixin hidden { display: none; }\n")
        .write("src/icons/arrow.svg", "<svg viewBox=\"0 0 16 16\"></svg>")
        .write("src/templates/cart.liquid", "{{ cart | json }}")
        .write("src/config/settings_schema.json", "[]");
    tree
}

#[tokio::test]
async fn full_build_produces_every_artifact_class() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);

    let outcome = with_timeout(build::run(&project, false)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    assert_eq!(tree.read("dist/assets/theme.js"), "console.log('theme');\n");
    assert!(tree.read("dist/assets/theme.css").contains("color:red"));
    assert!(tree.exists("dist/snippets/arrow.liquid"));
    assert_eq!(tree.read("dist/templates/cart.liquid"), "{{ cart | json }}");
    assert!(tree.exists("dist/config/settings_schema.json"));

    // Partials feed into root stylesheets; they never become artifacts.
    assert!(!tree.exists("dist/assets/_mixins.css"));
    Ok(())
}

#[tokio::test]
async fn dev_build_keeps_styles_readable() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    let project = project_for(&tree);

    let outcome = with_timeout(build::run(&project, true)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    let css = tree.read("dist/assets/theme.css");
    // Expanded output keeps whitespace between declarations.
    assert!(css.contains("color: red"));
    Ok(())
}

#[tokio::test]
async fn broken_stylesheet_is_recorded_without_stopping_other_classes() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    tree.write("src/styles/theme.scss", "body { color: ");
    let project = project_for(&tree);

    let outcome = with_timeout(build::run(&project, false)).await?;
    assert_eq!(outcome, RunOutcome::HadErrors);

    // The failing class is isolated; everything else still built.
    assert!(tree.exists("dist/assets/theme.js"));
    assert!(tree.exists("dist/snippets/arrow.liquid"));
    assert!(tree.exists("dist/templates/cart.liquid"));
    assert!(!tree.exists("dist/assets/theme.css"));
    Ok(())
}

#[tokio::test]
async fn rebuild_is_idempotent() -> TestResult {
    init_tracing();
    let tree = seeded_tree();

    let first = with_timeout(build::run(&project_for(&tree), false)).await?;
    let second = with_timeout(build::run(&project_for(&tree), false)).await?;

    assert_eq!(first, RunOutcome::Clean);
    assert_eq!(second, RunOutcome::Clean);
    assert_eq!(tree.read("dist/assets/theme.js"), "console.log('theme');\n");
    Ok(())
}

#[tokio::test]
async fn clean_removes_stale_outputs_and_archives() -> TestResult {
    init_tracing();
    let tree = seeded_tree();
    tree.write("dist/assets/stale.js", "old")
        .write("tmp/leftover.json", "{}")
        .write("upload/theme.zip", "zipbytes")
        .write("theme-old.zip", "zipbytes");
    let project = project_for(&tree);

    let outcome = with_timeout(build::run(&project, false)).await?;
    assert_eq!(outcome, RunOutcome::Clean);

    assert!(!tree.exists("dist/assets/stale.js"));
    assert!(!tree.exists("tmp/leftover.json"));
    assert!(!tree.exists("upload/theme.zip"));
    assert!(!tree.exists("theme-old.zip"));
    Ok(())
}
