use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::commands::ReferenceSource;
use crate::context::HostContext;
use crate::error::{MetaError, Result};
use crate::options::{OptionValue, Scope};
use crate::status::CoalescePolicy;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Host configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global-scope option values
    pub options: BTreeMap<String, toml::Value>,
    /// Option overrides keyed by table name
    pub context_options: BTreeMap<String, BTreeMap<String, toml::Value>>,
    /// Extra bindings as (context, longname, key notation)
    pub keybindings: Vec<(String, String, String)>,
    /// Equality policy for status coalescing
    pub coalesce: CoalescePolicy,
    /// Command reference table on disk (None = packaged table)
    pub reference_path: Option<PathBuf>,
}

/// TOML representation of the `[options]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlOptions {
    /// Per-table overrides
    pub context: Option<BTreeMap<String, BTreeMap<String, toml::Value>>>,

    /// Global values
    #[serde(flatten)]
    pub global: BTreeMap<String, toml::Value>,
}

/// TOML representation of the `[status]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStatusConfig {
    pub coalesce: Option<CoalescePolicy>,
}

/// TOML representation of the `[catalog]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlCatalogConfig {
    pub reference: Option<PathBuf>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub options: Option<TomlOptions>,
    /// Keybindings per owner context: `longname = "keys"`
    pub keys: Option<BTreeMap<String, BTreeMap<String, String>>>,
    pub status: Option<TomlStatusConfig>,
    pub catalog: Option<TomlCatalogConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), options = config.options.len(), "Loaded config");
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let toml_config: TomlConfig =
            toml::from_str(contents).map_err(|e| MetaError::Config(e.to_string()))?;

        let mut config = Config::default();

        if let Some(options) = toml_config.options {
            config.options = options.global;
            config.context_options = options.context.unwrap_or_default();
        }

        if let Some(keys) = toml_config.keys {
            for (context, bindings) in keys {
                for (longname, notation) in bindings {
                    config.keybindings.push((context.clone(), longname, notation));
                }
            }
        }

        if let Some(coalesce) = toml_config.status.and_then(|s| s.coalesce) {
            config.coalesce = coalesce;
        }

        config.reference_path = toml_config.catalog.and_then(|c| c.reference);

        Ok(config)
    }

    /// Apply the configuration to a host context.
    ///
    /// Entries that cannot be applied become warning status entries.
    /// Returns the number of entries skipped.
    pub fn apply(&self, ctx: &HostContext) -> usize {
        let mut skipped = 0;
        let mut warn = |message: String| {
            ctx.status.warning(message);
            skipped += 1;
        };

        ctx.status.set_policy(self.coalesce);

        for (name, raw) in &self.options {
            match OptionValue::from_toml(raw) {
                Some(value) => {
                    if let Err(e) = ctx.options.write().set(name, value, Scope::Global) {
                        warn(format!("config: {}", e));
                    }
                }
                None => warn(format!("config: unsupported value for option {}", name)),
            }
        }

        for (table, overrides) in &self.context_options {
            let mut values = Vec::new();
            for (name, raw) in overrides {
                match OptionValue::from_toml(raw) {
                    Some(value) => values.push((name.clone(), value)),
                    None => warn(format!(
                        "config: unsupported value for option {} in {}",
                        name, table
                    )),
                }
            }
            for e in ctx.set_context_overrides(table, values) {
                warn(format!("config: {}", e));
            }
        }

        for (context, longname, notation) in &self.keybindings {
            if ctx.commands.read().resolve(context, longname).is_none() {
                warn(format!("config: no command {} reachable from {}", longname, context));
                continue;
            }
            if let Err(e) = ctx.bindings.write().bind(notation, longname, context) {
                warn(format!("config: {} for {}: {}", notation, longname, e));
            }
        }

        if let Some(path) = &self.reference_path {
            ctx.set_reference(ReferenceSource::File(path.clone()));
        }

        tracing::info!(skipped, "Applied config");
        skipped
    }
}
