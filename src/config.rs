//=============================================
// solvra_gremlin/src/config.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Represent traversal source configuration values
// Objective: Load TOML data and turn it into a strategy set
//=============================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TraversalResult;
use crate::strategy::{
    IdentityRemovalStrategy, IncidentToAdjacentStrategy, LambdaRestrictionStrategy,
    ReadOnlyStrategy, StrategySet, VertexProgramStrategy,
};

//=============================================
// SECTION: Data Model
//=============================================

/// Root configuration document for a traversal source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Built-in strategy switches.
    #[serde(default)]
    pub strategies: StrategyToggles,
    /// Present when traversals should be marked for computer execution.
    #[serde(default)]
    pub computer: Option<ComputerConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyToggles {
    #[serde(default = "enabled")]
    pub identity_removal: bool,
    #[serde(default = "enabled")]
    pub incident_to_adjacent: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub lambda_restriction: bool,
}

impl Default for StrategyToggles {
    fn default() -> Self {
        Self {
            identity_removal: enabled(),
            incident_to_adjacent: enabled(),
            read_only: false,
            lambda_restriction: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComputerConfig {
    /// Worker count hint; absent means "let the computer decide".
    #[serde(default)]
    pub workers: Option<usize>,
}

impl TraversalConfig {
    /// Strategy set described by this configuration.
    pub fn strategy_set(&self) -> TraversalResult<StrategySet> {
        let mut set = StrategySet::new();
        if let Some(computer) = &self.computer {
            set.add(VertexProgramStrategy::new(computer.workers))?;
        }
        if self.strategies.identity_removal {
            set.add(IdentityRemovalStrategy)?;
        }
        if self.strategies.incident_to_adjacent {
            set.add(IncidentToAdjacentStrategy)?;
        }
        if self.strategies.read_only {
            set.add(ReadOnlyStrategy)?;
        }
        if self.strategies.lambda_restriction {
            set.add(LambdaRestrictionStrategy)?;
        }
        Ok(set)
    }
}

//=============================================
// SECTION: IO Helpers
//=============================================

/// Parse configuration from TOML text.
pub fn from_toml_str(data: &str) -> Result<TraversalConfig> {
    let config = toml::from_str::<TraversalConfig>(data)?;
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<TraversalConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading traversal config {}", path.display()))?;
    from_toml_str(&data).with_context(|| format!("parsing traversal config {}", path.display()))
}

//=============================================
// SECTION: Defaults
//=============================================

fn enabled() -> bool {
    true
}
