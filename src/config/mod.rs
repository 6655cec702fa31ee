//! Run configuration: the resolved set of parameters a single enumeration runs with.
//!
//! A [`RunConfig`] is what the CLI binary builds from its parsed arguments (optionally merged
//! with a TOML file, CLI flags winning ties) and hands to the orchestrator. The library itself
//! never reads `std::env::args` or a filesystem path implicitly — every path is explicit on this
//! struct, mirroring the teacher's `rules::parse_rules`/`get_default_rules` split between parsing
//! and embedded defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::error::CageError;

/// Default resolution parameter for the alpha-shape envelope filter.
pub const DEFAULT_ALPHA: f32 = 3.0;
/// Default maximum added-chain length per emitted cage.
pub const DEFAULT_SIZE_MAX: usize = 5;
/// Default cap on the number of cages a run will emit.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// The fully resolved parameters for one enumeration run.
///
/// `allow_carbonyl_start` and `require_aromatic_in_chain` realize the two Open Questions the
/// source code left as disabled/commented-out branches (§9): whether a path may start with a
/// carbonyl motif, and whether a closed chain must contain at least one aromatic ring. Both
/// default to `false`, matching the source's as-shipped behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Path to the substrate XYZ file.
    pub input: PathBuf,
    /// Alpha-shape resolution parameter, typically in 2.5–4.0.
    pub alpha: f32,
    /// Maximum number of atoms a path-synthesis chain may add between one endpoint pair.
    pub size_max: usize,
    /// Stop enumeration once this many cages have been emitted.
    pub max_results: usize,
    /// Permit a chain to start with a carbonyl (C=O) motif rather than a bare atom.
    pub allow_carbonyl_start: bool,
    /// Require at least one aromatic ring somewhere in a chain before it may close.
    pub require_aromatic_in_chain: bool,
    /// Override for the covalent-radius table; `None` uses the bundled default table.
    pub radius_table: Option<PathBuf>,
    /// Directory emitted `results/<basename>/...` trees are rooted under.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            input: PathBuf::new(),
            alpha: DEFAULT_ALPHA,
            size_max: DEFAULT_SIZE_MAX,
            max_results: DEFAULT_MAX_RESULTS,
            allow_carbonyl_start: false,
            require_aromatic_in_chain: false,
            radius_table: None,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl RunConfig {
    /// Parses a `RunConfig` from TOML source, e.g. loaded from a file the CLI was pointed at.
    /// Any field absent from the document keeps [`RunConfig::default`]'s value, so a config file
    /// only needs to mention the fields it wants to override.
    pub fn from_toml(content: &str) -> Result<Self, CageError> {
        Ok(toml::from_str(content)?)
    }

    /// Overlays `other` onto `self`: every field of `other` wins, used to let CLI flags override
    /// a loaded config file without requiring the file to repeat every field. Since both sides
    /// are always fully resolved values (not `Option` overlays) the caller is expected to start
    /// `other` from [`RunConfig::default`] and apply only the flags the user actually passed
    /// before calling this; see the binary entry point.
    pub fn merged_with(self, other: RunConfigOverrides) -> Self {
        RunConfig {
            input: other.input.unwrap_or(self.input),
            alpha: other.alpha.unwrap_or(self.alpha),
            size_max: other.size_max.unwrap_or(self.size_max),
            max_results: other.max_results.unwrap_or(self.max_results),
            allow_carbonyl_start: other.allow_carbonyl_start || self.allow_carbonyl_start,
            require_aromatic_in_chain: other.require_aromatic_in_chain || self.require_aromatic_in_chain,
            radius_table: other.radius_table.or(self.radius_table),
            output_dir: other.output_dir.unwrap_or(self.output_dir),
        }
    }
}

/// CLI-originated overrides layered onto a base [`RunConfig`] (defaults, or a loaded TOML file).
/// Every field is optional because an unset CLI flag must not clobber a value the config file
/// supplied.
#[derive(Debug, Clone, Default)]
pub struct RunConfigOverrides {
    pub input: Option<PathBuf>,
    pub alpha: Option<f32>,
    pub size_max: Option<usize>,
    pub max_results: Option<usize>,
    pub allow_carbonyl_start: bool,
    pub require_aromatic_in_chain: bool,
    pub radius_table: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.alpha, DEFAULT_ALPHA);
        assert_eq!(config.size_max, DEFAULT_SIZE_MAX);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert!(!config.allow_carbonyl_start);
        assert!(!config.require_aromatic_in_chain);
    }

    #[test]
    fn from_toml_overrides_only_mentioned_fields() {
        let config = RunConfig::from_toml("alpha = 2.5\nsize_max = 3\n").unwrap();
        assert_eq!(config.alpha, 2.5);
        assert_eq!(config.size_max, 3);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn cli_overrides_win_over_base_config() {
        let base = RunConfig {
            alpha: 2.5,
            ..RunConfig::default()
        };
        let overrides = RunConfigOverrides {
            alpha: Some(4.0),
            ..RunConfigOverrides::default()
        };
        let merged = base.merged_with(overrides);
        assert_eq!(merged.alpha, 4.0);
    }
}
