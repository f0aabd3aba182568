use std::path::{Path, PathBuf};

use blocks::ContentPage;
use blocks::pages::default_menu;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read site config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse site config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Site configuration: where the documents live and which pages the menu lists.
///
/// ```toml
/// root = "public"
///
/// [[pages]]
/// menu_title = "# Basics"
/// content = "docs/BASE_EXAMPLES.md"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    /// Content root, relative to the config file. Defaults to the file's directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default = "default_menu")]
    pub pages: Vec<ContentPage>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            root: Some(PathBuf::from("public")),
            pages: default_menu(),
        }
    }
}

impl SiteConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;

        let mut config: SiteConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;

        // Relative roots are resolved against the config file's directory.
        let base = config_path.parent().unwrap_or(Path::new("."));
        config.root = Some(match config.root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        });

        Ok(config)
    }

    /// Absolute or working-directory-relative path of every page's document.
    pub fn document_paths(&self) -> Vec<(&ContentPage, PathBuf)> {
        let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));
        self.pages
            .iter()
            .map(|page| (page, root.join(&page.content_reference)))
            .collect()
    }
}
