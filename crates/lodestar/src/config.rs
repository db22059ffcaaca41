//! Engine configuration.
//!
//! [`AppConfig`] is the root of the TOML configuration file. It holds the
//! simulation settings used by the compiler and the heuristic constants used
//! by the parser.

use serde::Deserialize;

use lodestar_parser::ParserConfig;

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Simulation configuration section
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Parser configuration section
    #[serde(default)]
    pub parser: ParserConfig,
}

/// How the global repulsion force is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepulsionMode {
    /// Exact pairwise evaluation, O(n²) per frame.
    #[default]
    Naive,
    /// Octree approximation with opening angle `theta`.
    BarnesHut,
}

/// Simulation configuration section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Iteration cap after which a layout counts as settled.
    iterations: u32,
    /// Convergence threshold on the summed per-frame displacement.
    tolerance: f32,
    /// Reserved for forces that choose to apply it; not enforced centrally.
    damping: f32,
    /// Step used when the engine drives itself, e.g. headless settling.
    time_step: f32,
    repulsion: RepulsionMode,
    theta: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            tolerance: 0.001,
            damping: 0.9,
            time_step: 0.5,
            repulsion: RepulsionMode::Naive,
            theta: 0.8,
        }
    }
}

impl SimulationConfig {
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn repulsion(&self) -> RepulsionMode {
        self.repulsion
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Set the iteration cap.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the self-driven time step.
    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    /// Select the repulsion evaluation mode.
    pub fn with_repulsion(mut self, repulsion: RepulsionMode) -> Self {
        self.repulsion = repulsion;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.iterations(), 500);
        assert_eq!(config.tolerance(), 0.001);
        assert_eq!(config.damping(), 0.9);
        assert_eq!(config.repulsion(), RepulsionMode::Naive);
    }

    #[test]
    fn test_app_config_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
                [simulation]
                iterations = 200
                repulsion = "barnes-hut"
                theta = 0.5

                [parser]
                group_radius = 5.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.simulation.iterations(), 200);
        assert_eq!(config.simulation.repulsion(), RepulsionMode::BarnesHut);
        assert_eq!(config.simulation.theta(), 0.5);
        assert_eq!(config.simulation.tolerance(), 0.001);
        assert_eq!(config.parser.group_radius(), 5.0);
    }

    #[test]
    fn test_empty_config() {
        let config: AppConfig = toml::from_str("").expect("empty config is valid");
        assert_eq!(config.simulation, SimulationConfig::default());
    }
}
