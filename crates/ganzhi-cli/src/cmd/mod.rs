pub mod compare;
pub mod completions;
pub mod graph;
pub mod list;
pub mod nayin;
pub mod shensha;
pub mod show;
pub mod types;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use tracing::debug;

use ganzhi_core::config::EffectiveConfig;
use ganzhi_core::{Catalog, Dataset, EntityRegistry, ErrorCode, JsonFileSource};

use crate::output::{CliError, OutputMode, render_error};

/// State shared by every data-reading command.
pub struct Context {
    pub output: OutputMode,
    pub config: EffectiveConfig,
}

impl Context {
    /// Load the configured dataset.
    ///
    /// # Errors
    ///
    /// Fails when no dataset path is configured or the file cannot be read,
    /// parsed or validated.
    pub fn catalog(&self) -> anyhow::Result<Catalog> {
        let Some(path) = self.config.resolved_data.as_deref() else {
            render_error(
                self.output,
                &CliError::from_code(ErrorCode::DatasetLoadFailed, "no dataset configured"),
            )?;
            anyhow::bail!("no dataset configured");
        };
        self.load_from(path)
    }

    /// Like [`Context::catalog`], but an unconfigured dataset yields a
    /// registry-only catalog.
    ///
    /// # Errors
    ///
    /// Fails when a configured dataset cannot be loaded.
    pub fn catalog_or_registry(&self) -> anyhow::Result<Catalog> {
        match self.config.resolved_data.as_deref() {
            Some(path) => self.load_from(path),
            None => {
                debug!("no dataset configured, using registry only");
                let registry = EntityRegistry::build()?;
                Ok(Catalog::load(registry, Dataset::default())?)
            }
        }
    }

    fn load_from(&self, path: &Path) -> anyhow::Result<Catalog> {
        match Catalog::from_source(&JsonFileSource::new(path)) {
            Ok(catalog) => Ok(catalog),
            Err(err) => {
                render_error(
                    self.output,
                    &CliError::from_code(ErrorCode::DatasetLoadFailed, format!("{err:#}")),
                )?;
                Err(err).with_context(|| format!("loading dataset {}", path.display()))
            }
        }
    }
}

/// Walk up from `start` to the nearest directory holding `.ganzhi/`.
pub fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(".ganzhi").is_dir())
        .unwrap_or(start)
        .to_path_buf()
}

/// Parse a labeled enum argument, rendering a coded error on failure.
///
/// # Errors
///
/// Returns the parse error after rendering it.
pub fn parse_arg<T>(output: OutputMode, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => Ok(value),
        Err(err) => {
            render_error(
                output,
                &CliError::from_code(ErrorCode::InvalidEnumValue, err.to_string()),
            )?;
            anyhow::bail!("{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ganzhi_core::model::LifeStage;

    #[test]
    fn project_root_found_in_ancestor() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".ganzhi")).expect("mkdir");
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).expect("mkdir nested");
        assert_eq!(find_project_root(&nested), dir.path());
    }

    #[test]
    fn project_root_defaults_to_start() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(find_project_root(dir.path()), dir.path());
    }

    #[test]
    fn parse_arg_accepts_label_and_alias() {
        let a: LifeStage = parse_arg(OutputMode::Text, "长生").expect("label");
        let b: LifeStage = parse_arg(OutputMode::Text, "Birth").expect("alias");
        assert_eq!(a, b);
        assert!(parse_arg::<LifeStage>(OutputMode::Text, "bogus").is_err());
    }
}
