// tests/config_loading.rs

//! Loading `leaf.toml` from disk and anchoring the project at its directory.

use std::error::Error;

use leafbuild::commands::Project;
use leafbuild::errors::LeafError;
use leafbuild_test_utils::builders::ProjectTree;
use leafbuild_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn project_loads_from_config_and_anchors_at_its_directory() -> TestResult {
    init_tracing();
    let tree = ProjectTree::new();
    tree.write(
        "leaf.toml",
        r#"
        [store]
        domain = "temp.example-store.com"

        [store.themes]
        development = "123456"
        production = "654321"

        [build.js]
        inputs = ["src/scripts/theme.js", "src/scripts/checkout.js"]
        "#,
    );

    let project = Project::load(&tree.root().join("leaf.toml"))?;

    assert_eq!(project.paths.root(), tree.root());
    assert_eq!(
        project.config.build().js.inputs,
        vec!["src/scripts/theme.js", "src/scripts/checkout.js"]
    );

    let destination = project.destination(None, "production", None)?;
    assert_eq!(destination.store, "temp.example-store.com");
    assert_eq!(destination.theme_id.as_deref(), Some("654321"));
    assert_eq!(destination.password, None);
    Ok(())
}

#[test]
fn password_flag_overrides_configured_password() -> TestResult {
    init_tracing();
    let tree = ProjectTree::new();
    tree.write(
        "leaf.toml",
        r#"
        [store]
        domain = "temp.example-store.com"
        password = "from-config"
        "#,
    );

    let project = Project::load(&tree.root().join("leaf.toml"))?;

    let from_config = project.destination(None, "development", None)?;
    assert_eq!(from_config.password.as_deref(), Some("from-config"));

    let from_flag = project.destination(None, "development", Some("from-flag"))?;
    assert_eq!(from_flag.password.as_deref(), Some("from-flag"));
    Ok(())
}

#[test]
fn missing_config_file_is_an_io_error() {
    init_tracing();
    let tree = ProjectTree::new();
    let err = Project::load(&tree.root().join("leaf.toml")).unwrap_err();
    assert!(matches!(err, LeafError::IoError(_)));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    init_tracing();
    let tree = ProjectTree::new();
    tree.write("leaf.toml", "[store\ndomain = ");
    let err = Project::load(&tree.root().join("leaf.toml")).unwrap_err();
    assert!(matches!(err, LeafError::TomlError(_)));
}

#[test]
fn config_without_any_store_is_rejected() {
    init_tracing();
    let tree = ProjectTree::new();
    tree.write("leaf.toml", "[build.js]\ninputs = [\"src/scripts/theme.js\"]\n");
    let err = Project::load(&tree.root().join("leaf.toml")).unwrap_err();
    assert!(matches!(err, LeafError::ConfigError(_)));
}
