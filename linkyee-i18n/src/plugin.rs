//! Plugin contract with the site build pipeline.
//!
//! A plugin takes its configuration value and returns named fragments for
//! the pipeline to insert into pages. Plugins are stateless; the pipeline
//! looks them up by name in a [`PluginRegistry`].

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::compiler::{Fragments, compile};
use crate::config::I18nConfig;

pub trait Plugin: Send + Sync {
    /// Name the pipeline refers to the plugin by.
    fn name(&self) -> &'static str;

    /// Produce the plugin's fragments. Must not fail.
    fn execute(&self, config: &Value) -> Fragments;
}

/// The i18n compiler as a pipeline plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct I18nPlugin;

impl Plugin for I18nPlugin {
    fn name(&self) -> &'static str {
        "I18n"
    }

    fn execute(&self, config: &Value) -> Fragments {
        let config = I18nConfig::from_value(config);
        compile(&config.supported_langs, &config.translations)
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<&'static str, Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every plugin this crate provides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(I18nPlugin);
        registry
    }

    /// Add a plugin, replacing any plugin already registered under its name.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> &mut Self {
        self.plugins.insert(plugin.name(), Box::new(plugin));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.keys().copied()
    }

    /// Run the plugin called `name`, or `None` if there is none.
    pub fn run(&self, name: &str, config: &Value) -> Option<Fragments> {
        let plugin = self.get(name)?;
        debug!(plugin = name, "Running plugin");
        Some(plugin.execute(config))
    }
}
