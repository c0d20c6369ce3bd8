//! Engine configuration with TOML persistence.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{ActivationParams, ImportanceParams, SemanticParams};
use crate::types::{AnalyticsError, AnalyticsResult, RelationshipType, CAUSAL_TYPES};

/// Complete engine configuration. Every section and field is optional in the
/// TOML file and falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Snapshot cache configuration
    pub cache: CacheConfig,

    /// Importance ranking defaults
    pub importance: ImportanceConfig,

    /// Spreading activation defaults
    pub activation: ActivationConfig,

    /// Contradiction detection defaults
    pub contradiction: ContradictionConfig,

    /// Stochastic walk defaults
    pub walk: WalkConfig,

    /// Causal tracing defaults
    pub causal: CausalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a snapshot stays fresh
    pub ttl_secs: u64,

    /// Upper bound on one extraction, in milliseconds (none = unbounded)
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportanceConfig {
    pub damping: f64,
    pub max_iterations: usize,
    pub tolerance: f64,

    /// Teleport proportionally to node weight instead of uniformly
    pub personalize_by_weight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    pub initial: f64,
    pub decay: f64,
    pub threshold: f64,
    pub max_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContradictionConfig {
    pub similarity_threshold: f64,
    pub confidence_threshold: f64,

    /// Relationship types that make two connected beliefs a structural
    /// candidate (empty = any connection)
    pub relationship_filter: Vec<RelationshipType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    pub steps: usize,

    /// RNG seed for reproducible walks (none = seeded from entropy)
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CausalConfig {
    pub max_depth: usize,
    pub causal_types: Vec<RelationshipType>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            fetch_timeout_ms: Some(30_000),
        }
    }
}

impl Default for ImportanceConfig {
    fn default() -> Self {
        let params = ImportanceParams::default();
        Self {
            damping: params.damping,
            max_iterations: params.max_iterations,
            tolerance: params.tolerance,
            personalize_by_weight: false,
        }
    }
}

impl Default for ActivationConfig {
    fn default() -> Self {
        let params = ActivationParams::default();
        Self {
            initial: params.initial,
            decay: params.decay,
            threshold: params.threshold,
            max_nodes: params.max_nodes,
        }
    }
}

impl Default for ContradictionConfig {
    fn default() -> Self {
        let params = SemanticParams::default();
        Self {
            similarity_threshold: params.similarity_threshold,
            confidence_threshold: params.confidence_threshold,
            relationship_filter: Vec::new(),
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            seed: None,
        }
    }
}

impl Default for CausalConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            causal_types: CAUSAL_TYPES.to_vec(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}

impl ImportanceConfig {
    pub fn params(&self) -> ImportanceParams {
        ImportanceParams {
            damping: self.damping,
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

impl ActivationConfig {
    pub fn params(&self) -> ActivationParams {
        ActivationParams {
            initial: self.initial,
            decay: self.decay,
            threshold: self.threshold,
            max_nodes: self.max_nodes,
        }
    }
}

impl ContradictionConfig {
    pub fn semantic_params(&self) -> SemanticParams {
        SemanticParams {
            similarity_threshold: self.similarity_threshold,
            confidence_threshold: self.confidence_threshold,
        }
    }
}

impl AnalyticsConfig {
    /// Check every section up front so bad values fail at load time.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.cache.fetch_timeout_ms == Some(0) {
            return Err(AnalyticsError::invalid(
                "cache.fetch_timeout_ms",
                "must be positive when set",
            ));
        }
        self.importance.params().validate()?;
        self.activation.params().validate()?;
        self.contradiction.semantic_params().validate()?;
        if self.causal.causal_types.is_empty() {
            return Err(AnalyticsError::invalid(
                "causal.causal_types",
                "at least one relationship type is required",
            ));
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> AnalyticsResult<String> {
        toml::to_string_pretty(self).map_err(|e| AnalyticsError::Config(e.to_string()))
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> AnalyticsResult<AnalyticsConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AnalyticsError::Io(std::io::Error::other(format!(
            "Failed to read config file {}: {e}",
            path.display()
        )))
    })?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> AnalyticsResult<AnalyticsConfig> {
    let config: AnalyticsConfig = toml::from_str(content)
        .map_err(|e| AnalyticsError::Config(format!("Failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}
