use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

use plumecore::ModuleMap;

use crate::props::EditorProps;

/// Settings for the demo binary, persisted as JSON and mapped onto the
/// initial editor props at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub theme: String,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub modules: ModuleMap,
    #[serde(default = "default_show_events")]
    pub show_events: bool,
}

fn default_show_events() -> bool {
    true
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            theme: String::from("classic"),
            placeholder: Some(String::from("Start writing...")),
            read_only: false,
            modules: ModuleMap::new(),
            show_events: true,
        }
    }
}

impl DemoConfig {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            let default_config = Self::default();
                            let _ = default_config.save().await;
                            return Ok(default_config);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate();
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                // Keep the broken file around for inspection
                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                let default_config = Self::default();
                                let _ = default_config.save().await;
                                return Ok(default_config);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate();

            if let Some(parent) = config_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "failed to create config directory {}: {}",
                        parent.display(),
                        e
                    )
                })?;
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("failed to serialize config: {}", e))?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!(
                    "failed to write config file {}: {}",
                    config_path.display(),
                    e
                )
            })?;
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Fix invalid values in place, logging each correction.
    pub fn validate(&mut self) {
        if self.theme.is_empty() {
            log::warn!("Empty theme name, using default");
            self.theme = String::from("classic");
        }

        if let Some(placeholder) = &self.placeholder {
            if placeholder.is_empty() {
                log::warn!("Empty placeholder, dropping it");
                self.placeholder = None;
            }
        }
    }

    /// Initial props for the demo component.
    pub fn to_props(&self) -> EditorProps {
        EditorProps {
            id: Some(String::from("plume-demo")),
            theme: self.theme.clone(),
            placeholder: self.placeholder.clone(),
            read_only: self.read_only,
            modules: self.modules.clone(),
            ..EditorProps::default()
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PLUME_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("PLUME_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("org", "plume", "plume")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
