//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use pixelmart_cache::FileStore;
use pixelmart_commerce::cart::CartStore;
use pixelmart_commerce::catalog::Catalog;
use pixelmart_commerce::events::EventBus;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["pixelmart.toml", ".pixelmart.toml", "pixelmart.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Base for relative paths in the configuration.
    pub root: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| resolve_from(&cwd, dir))
            .unwrap_or_else(|| cwd.clone());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            root,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CliConfig::load(config_path.to_str()?) {
                        Ok(config) => return Some((config_path, config)),
                        Err(e) => {
                            tracing::warn!(path = %config_path.display(), error = %e, "ignoring config file")
                        }
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a configured path against the config file's directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve_from(&self.root, Path::new(path))
    }

    /// Load the product catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        let path = self.resolve_path(&self.config.catalog.path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Catalog::from_json(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    /// Directory holding persisted slots.
    pub fn storage_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.dir)
    }

    /// Open the persisted cart.
    pub fn cart(&self, bus: EventBus) -> Result<CartStore<FileStore>> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage: {}", dir.display()))?;
        Ok(CartStore::open_with_key(
            store,
            self.config.storage.cart_key.as_str(),
            bus,
        ))
    }

    /// Delay applied to pending filter edits.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.config.filters.debounce_ms)
    }
}

fn resolve_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pixelmart.toml"),
            "[storage]\ncart_key = \"bag\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (path, config) = Context::find_config(&nested).unwrap();
        assert_eq!(path, dir.path().join("pixelmart.toml"));
        assert_eq!(config.storage.cart_key, "bag");
    }

    #[test]
    fn test_resolve_from_keeps_absolute_paths() {
        let base = Path::new("/srv/shop");
        assert_eq!(
            resolve_from(base, Path::new("data/products.json")),
            PathBuf::from("/srv/shop/data/products.json")
        );
        assert_eq!(
            resolve_from(base, Path::new("/etc/products.json")),
            PathBuf::from("/etc/products.json")
        );
    }
}
