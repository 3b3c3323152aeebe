//! `sigplan init`: write a template configuration file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::{SigplanConfig, CONFIG_FILE};

/// Create `sigplan.toml` in `dir`.
pub fn run(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    fs::write(&path, SigplanConfig::template())
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path()).unwrap();

        let (config, found) = SigplanConfig::find_and_load(dir.path()).unwrap().unwrap();
        assert_eq!(found, dir.path());
        assert_eq!(config.default_profile(), Some("default"));
    }

    #[test]
    fn init_refuses_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let err = run(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
