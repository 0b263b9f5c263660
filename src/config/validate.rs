// src/config/validate.rs

use crate::config::model::{ProjectConfig, RawProjectConfig, StoreConfig};
use crate::errors::{LeafError, Result};

impl TryFrom<RawProjectConfig> for ProjectConfig {
    type Error = LeafError;

    fn try_from(raw: RawProjectConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ProjectConfig::new_unchecked(raw.store, raw.stores, raw.build))
    }
}

fn validate_raw_config(cfg: &RawProjectConfig) -> Result<()> {
    ensure_has_store(cfg)?;
    if let Some(store) = &cfg.store {
        validate_store("store", store)?;
    }
    for (name, store) in cfg.stores.iter() {
        validate_store(name, store)?;
    }
    validate_build(cfg)?;
    Ok(())
}

fn ensure_has_store(cfg: &RawProjectConfig) -> Result<()> {
    if cfg.store.is_none() && cfg.stores.is_empty() {
        return Err(LeafError::ConfigError(
            "config must contain a [store] table or at least one [stores.<name>] table"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_store(name: &str, store: &StoreConfig) -> Result<()> {
    if store.domain.trim().is_empty() {
        return Err(LeafError::ConfigError(format!(
            "store '{name}' has an empty `domain`"
        )));
    }
    for (env, theme_id) in store.themes.iter() {
        if let Some(id) = theme_id {
            if id.trim().is_empty() {
                return Err(LeafError::ConfigError(format!(
                    "store '{name}' has an empty theme id for environment '{env}'; \
                     omit the entry instead"
                )));
            }
        }
    }
    Ok(())
}

fn validate_build(cfg: &RawProjectConfig) -> Result<()> {
    if cfg.build.js.inputs.is_empty() {
        return Err(LeafError::ConfigError(
            "[build.js].inputs must list at least one script entry point".to_string(),
        ));
    }
    for input in cfg.build.js.inputs.iter() {
        if !input.starts_with("src/") {
            return Err(LeafError::ConfigError(format!(
                "[build.js].inputs entry '{input}' must live under src/"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Result<ProjectConfig> {
        let raw: RawProjectConfig = toml::from_str(toml_str).unwrap();
        ProjectConfig::try_from(raw)
    }

    #[test]
    fn minimal_single_store_config_is_valid() {
        let cfg = parse(
            r#"
            [store]
            domain = "temp.example-store.com"
            "#,
        )
        .unwrap();
        let store = cfg.resolve_store(None).unwrap();
        assert_eq!(store.domain, "temp.example-store.com");
    }

    #[test]
    fn missing_store_is_rejected() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, LeafError::ConfigError(_)));
    }

    #[test]
    fn multi_store_resolves_by_name() {
        let cfg = parse(
            r#"
            [stores.eu]
            domain = "eu.example-store.com"

            [stores.us]
            domain = "us.example-store.com"
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.resolve_store(Some("us")).unwrap().domain,
            "us.example-store.com"
        );
        assert!(cfg.resolve_store(Some("apac")).is_err());
        // No default [store] table, so the bare form has nothing to fall
        // back to.
        assert!(cfg.resolve_store(None).is_err());
    }

    #[test]
    fn script_inputs_outside_src_are_rejected() {
        let err = parse(
            r#"
            [store]
            domain = "temp.example-store.com"

            [build.js]
            inputs = ["scripts/theme.js"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, LeafError::ConfigError(_)));
    }
}
