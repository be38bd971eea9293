//! Tunable constants for the analysis pipeline.
//!
//! Every field has a default matching the editor's behaviour, so a partial JSON
//! object (or `{}`) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Mapping between drawing units and physical length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scale {
    /// Drawing units per foot. The editor grid uses 50.
    pub units_per_foot: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            units_per_foot: 50.0,
        }
    }
}

impl Scale {
    /// Convert a drawing-unit length to feet.
    #[must_use]
    pub fn to_feet(self, units: f64) -> f64 {
        units / self.units_per_foot
    }

    /// Convert a drawing-unit length to inches.
    #[must_use]
    pub fn to_inches(self, units: f64) -> f64 {
        self.to_feet(units) * 12.0
    }

    /// Convert feet to drawing units.
    #[must_use]
    pub fn from_feet(self, feet: f64) -> f64 {
        feet * self.units_per_foot
    }
}

/// Settings for the method-of-joints solver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Determinant magnitude below which a two-unknown joint is treated as singular.
    pub singular_tolerance: f64,
    /// Cross-product magnitude below which two members count as collinear.
    pub collinear_tolerance: f64,
    /// Load component magnitude below which a joint counts as unloaded.
    pub zero_load_tolerance: f64,
    /// Net force in pounds, per direction, below which a joint counts as in equilibrium.
    pub balance_tolerance: f64,
    /// Passes allowed per joint; the solver stops after `pass_factor × joints` passes.
    pub pass_factor: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            singular_tolerance: 1e-10,
            collinear_tolerance: 1e-10,
            zero_load_tolerance: 1e-10,
            balance_tolerance: 1e-6,
            pass_factor: 2,
        }
    }
}

impl SolverSettings {
    /// Number of solver passes allowed for a truss with `joint_count` joints.
    #[must_use]
    pub fn max_passes(&self, joint_count: usize) -> usize {
        self.pass_factor * joint_count
    }
}

/// Span-ratio deflection limits, expressed as the divisor `n` in `L/n`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeflectionLimits {
    /// Divisor for the live-load limit; this one decides pass/fail.
    pub live_load: f64,
    /// Divisor for the total-load limit, reported for information.
    pub total_load: f64,
}

impl DeflectionLimits {
    /// Roof members: L/240 live, L/180 total.
    #[must_use]
    pub const fn roof() -> Self {
        Self {
            live_load: 240.0,
            total_load: 180.0,
        }
    }

    /// Floor members: L/360 live, L/240 total.
    #[must_use]
    pub const fn floor() -> Self {
        Self {
            live_load: 360.0,
            total_load: 240.0,
        }
    }
}

impl Default for DeflectionLimits {
    fn default() -> Self {
        Self::roof()
    }
}

/// Empirical constants of the approximate deflection model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeflectionSettings {
    /// Multiplier on the point-load bending term.
    pub continuity_factor: f64,
    /// Slenderness ratio that doubles the compression amplification.
    pub slenderness_reference: f64,
    /// Exponent applied to `slenderness / slenderness_reference`.
    pub slenderness_exponent: f64,
    /// Code limits used for the pass/fail check.
    pub limits: DeflectionLimits,
}

impl Default for DeflectionSettings {
    fn default() -> Self {
        Self {
            continuity_factor: 0.5,
            slenderness_reference: 200.0,
            slenderness_exponent: 2.0,
            limits: DeflectionLimits::roof(),
        }
    }
}

/// Complete configuration for one analysis run.
///
/// # Examples
/// ```
/// use trusscheck::AnalysisConfig;
///
/// let config = AnalysisConfig::from_json(r#"{ "tributary_width": 4.0 }"#)
///     .expect("partial configuration is accepted");
/// assert_eq!(config.tributary_width, 4.0);
/// assert_eq!(config.scale.units_per_foot, 50.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Drawing scale.
    pub scale: Scale,
    /// Truss spacing in feet used to turn area loads into a line load.
    pub tributary_width: f64,
    /// Vertical distance in drawing units from the extreme non-support joint
    /// within which joints receive the roof load.
    pub top_chord_window: f64,
    /// Method-of-joints settings.
    pub solver: SolverSettings,
    /// Deflection model settings.
    pub deflection: DeflectionSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            tributary_width: 2.0,
            top_chord_window: 50.0,
            solver: SolverSettings::default(),
            deflection: DeflectionSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input and
    /// [`ConfigError::NonPositive`] when a scale, width or divisor is not positive.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every length, width and divisor is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("scale.units_per_foot", self.scale.units_per_foot),
            ("tributary_width", self.tributary_width),
            ("deflection.slenderness_reference", self.deflection.slenderness_reference),
            ("deflection.limits.live_load", self.deflection.limits.live_load),
            ("deflection.limits.total_load", self.deflection.limits.total_load),
            ("solver.balance_tolerance", self.solver.balance_tolerance),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.top_chord_window < 0.0 || !self.top_chord_window.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "top_chord_window",
                value: self.top_chord_window,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scale_converts_drawing_units() {
        let scale = Scale::default();
        assert_relative_eq!(scale.to_feet(1_000.0), 20.0);
        assert_relative_eq!(scale.to_inches(50.0), 12.0);
        assert_relative_eq!(scale.from_feet(2.0), 100.0);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = AnalysisConfig::from_json("{}").expect("defaults apply");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn nested_settings_are_partially_overridable() {
        let config = AnalysisConfig::from_json(
            r#"{ "deflection": { "limits": { "live_load": 360.0 } } }"#,
        )
        .expect("valid configuration");
        assert_relative_eq!(config.deflection.limits.live_load, 360.0);
        assert_relative_eq!(config.deflection.limits.total_load, 180.0);
        assert_relative_eq!(config.deflection.continuity_factor, 0.5);
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let error = AnalysisConfig::from_json(r#"{ "scale": { "units_per_foot": 0.0 } }"#)
            .expect_err("zero scale rejected");
        assert!(matches!(
            error,
            ConfigError::NonPositive {
                name: "scale.units_per_foot",
                ..
            }
        ));
    }

    #[test]
    fn balance_tolerance_must_be_positive() {
        let config = AnalysisConfig {
            solver: SolverSettings {
                balance_tolerance: 0.0,
                ..SolverSettings::default()
            },
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                name: "solver.balance_tolerance",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let error = AnalysisConfig::from_json("{ nope").expect_err("malformed");
        assert!(matches!(error, ConfigError::Json(_)));
    }
}
