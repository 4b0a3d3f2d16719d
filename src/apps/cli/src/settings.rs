//! TOML-file settings store
//!
//! Persists the API key, provider tag, and model under the user config
//! directory so they survive restarts of the shell.

use serde::{Deserialize, Serialize};
use sheetmate_core::{
    AssistantSettings, ProviderKind, SettingsStore, SheetMateError, SheetMateResult,
};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new() -> SheetMateResult<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| SheetMateError::storage("No user config directory available"))?;
        Ok(Self {
            path: base.join("sheetmate").join("settings.toml"),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> SheetMateResult<SettingsFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => toml::from_str(&raw)
                .map_err(|e| SheetMateError::storage(format!("Malformed settings file: {}", e))),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Ok(SettingsFile::default())
            }
            Err(error) => Err(SheetMateError::storage(format!(
                "Failed to read settings: {}",
                error
            ))),
        }
    }

    fn store(&self, file: &SettingsFile) -> SheetMateResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SheetMateError::storage(format!("Failed to create config dir: {}", e)))?;
        }
        let raw = toml::to_string_pretty(file)
            .map_err(|e| SheetMateError::storage(format!("Failed to encode settings: {}", e)))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| SheetMateError::storage(format!("Failed to write settings: {}", e)))
    }

    fn resolve(file: &SettingsFile) -> AssistantSettings {
        let provider = file
            .provider
            .as_deref()
            .and_then(|tag| tag.parse::<ProviderKind>().ok())
            .unwrap_or(ProviderKind::OpenAi);
        AssistantSettings {
            api_key: file.api_key.clone(),
            provider,
            model: file
                .model
                .clone()
                .unwrap_or_else(|| provider.default_model().to_string()),
        }
    }
}

impl SettingsStore for TomlSettingsStore {
    fn get_settings(&self) -> SheetMateResult<AssistantSettings> {
        Ok(Self::resolve(&self.load()?))
    }

    fn save_api_key(&self, api_key: &str) -> SheetMateResult<()> {
        let mut file = self.load()?;
        file.api_key = api_key.to_string();
        self.store(&file)
    }

    fn get_api_key(&self) -> SheetMateResult<Option<String>> {
        let file = self.load()?;
        Ok(if file.api_key.is_empty() {
            None
        } else {
            Some(file.api_key)
        })
    }

    fn clear_api_key(&self) -> SheetMateResult<()> {
        let mut file = self.load()?;
        file.api_key.clear();
        self.store(&file)
    }

    fn save_provider(&self, provider: ProviderKind) -> SheetMateResult<()> {
        let mut file = self.load()?;
        file.provider = Some(provider.as_str().to_string());
        file.model = Some(provider.default_model().to_string());
        self.store(&file)
    }

    fn get_provider(&self) -> SheetMateResult<ProviderKind> {
        Ok(Self::resolve(&self.load()?).provider)
    }

    fn save_model(&self, model: &str) -> SheetMateResult<()> {
        let mut file = self.load()?;
        file.model = Some(model.to_string());
        self.store(&file)
    }

    fn get_model(&self) -> SheetMateResult<String> {
        Ok(Self::resolve(&self.load()?).model)
    }
}
