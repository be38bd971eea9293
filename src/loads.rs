//! Roof load case and its distribution onto truss joints.
//!
//! Area loads (psf) are summed, multiplied by the tributary width to give a
//! line load, and the resulting total over the span is lumped onto the
//! loaded chord. Half of the total is carried by each of the two outermost
//! supports as an upward reaction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::errors::{AnalysisError, LoadError};
use crate::geometry::Force;
use crate::truss::{JointId, Truss};

/// Unfactored surface loads in pounds per square foot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    /// Dead load.
    pub dead: f64,
    /// Live load.
    pub live: f64,
    /// Snow load.
    pub snow: f64,
}

impl Default for LoadCase {
    fn default() -> Self {
        Self {
            dead: 15.0,
            live: 40.0,
            snow: 0.0,
        }
    }
}

impl LoadCase {
    /// Create a load case from its three components.
    #[must_use]
    pub const fn new(dead: f64, live: f64, snow: f64) -> Self {
        Self { dead, live, snow }
    }

    /// Combined surface load; components are simply summed.
    #[must_use]
    pub fn total_psf(&self) -> f64 {
        self.dead + self.live + self.snow
    }

    /// Line load in pounds per linear foot for a truss line of `tributary_width` feet.
    #[must_use]
    pub fn line_load(&self, tributary_width: f64) -> f64 {
        self.total_psf() * tributary_width
    }

    /// Check that every component is a finite, non-negative pressure.
    ///
    /// Loads act downward only; uplift is not modelled.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfRange`] naming the first offending component.
    ///
    /// # Examples
    /// ```
    /// use trusscheck::{LoadCase, LoadError};
    ///
    /// assert!(LoadCase::default().validate().is_ok());
    /// let error = LoadCase::new(15.0, f64::NAN, 0.0).validate().expect_err("NaN rejected");
    /// assert!(matches!(error, LoadError::OutOfRange { component: "live", .. }));
    /// ```
    pub fn validate(&self) -> Result<(), LoadError> {
        for (component, value) in [("dead", self.dead), ("live", self.live), ("snow", self.snow)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LoadError::OutOfRange { component, value });
            }
        }
        Ok(())
    }
}

/// Vertical support reactions in pounds (positive acts upward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Leftmost support joint.
    pub left_joint: JointId,
    /// Reaction at the leftmost support.
    pub left: f64,
    /// Rightmost support joint.
    pub right_joint: JointId,
    /// Reaction at the rightmost support.
    pub right: f64,
}

/// External forces on every joint for one load case.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalLoads {
    /// Force at every joint, zero where nothing is applied.
    pub forces: BTreeMap<JointId, Force>,
    /// Support reactions included in `forces`.
    pub reactions: Reactions,
    /// Joints that share the roof load, in ascending order.
    pub loaded_joints: Vec<JointId>,
    /// Total roof load in pounds.
    pub total_load: f64,
}

impl NodalLoads {
    /// Force at a joint; zero for joints without an entry.
    #[must_use]
    pub fn force_at(&self, joint: JointId) -> Force {
        self.forces.get(&joint).copied().unwrap_or_default()
    }
}

/// Convert the load case into joint forces.
///
/// `span` is the loaded length in drawing units. The loaded joints are the
/// non-support joints whose vertical coordinate is within
/// [`AnalysisConfig::top_chord_window`] of the smallest vertical coordinate
/// among non-support joints.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidLoad`] for a negative or non-finite load
/// component, [`AnalysisError::InvalidSpan`] unless `span` is a positive length,
/// [`AnalysisError::InsufficientSupports`] when fewer than two joints are
/// supported and [`AnalysisError::NoLoadableNodes`] when every joint is a support.
///
/// # Examples
/// ```
/// use trusscheck::{distribute, point, AnalysisConfig, LoadCase, Support, Truss};
///
/// let mut truss = Truss::new();
/// let a = truss.add_supported_joint(point(0.0, 0.0), Support::Fixed)?;
/// let b = truss.add_supported_joint(point(1_000.0, 0.0), Support::Roller)?;
/// let c = truss.add_joint(point(500.0, 0.0))?;
/// let loads = distribute(&truss, &LoadCase::new(15.0, 40.0, 0.0), 1_000.0, &AnalysisConfig::default())?;
/// assert_eq!(loads.total_load, 2_200.0);
/// assert_eq!(loads.force_at(c).y, -2_200.0);
/// assert_eq!(loads.reactions.left, 1_100.0);
/// # let _ = (a, b);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn distribute(
    truss: &Truss,
    loads: &LoadCase,
    span: f64,
    config: &AnalysisConfig,
) -> Result<NodalLoads, AnalysisError> {
    loads.validate()?;
    if !(span.is_finite() && span > 0.0) {
        return Err(AnalysisError::InvalidSpan(span));
    }
    let supports = truss.support_joints();
    if supports.len() < 2 {
        return Err(AnalysisError::InsufficientSupports {
            found: supports.len(),
        });
    }
    let free: Vec<JointId> = truss
        .joints()
        .filter(|&joint| !truss.is_supported(joint))
        .collect();
    if free.is_empty() {
        return Err(AnalysisError::NoLoadableNodes);
    }

    let span_feet = config.scale.to_feet(span);
    let total_load = loads.line_load(config.tributary_width) * span_feet;
    let reaction = total_load / 2.0;

    let x_of = |joint: JointId| truss.position(joint).map_or(0.0, |position| position.x);
    let y_of = |joint: JointId| truss.position(joint).map_or(0.0, |position| position.y);
    // Ties on x fall back to joint order, so two supports always give two distinct joints.
    let left_joint = supports
        .iter()
        .copied()
        .min_by(|&a, &b| x_of(a).total_cmp(&x_of(b)).then(a.cmp(&b)))
        .unwrap_or(supports[0]);
    let right_joint = supports
        .iter()
        .copied()
        .max_by(|&a, &b| x_of(a).total_cmp(&x_of(b)).then(a.cmp(&b)))
        .unwrap_or(supports[supports.len() - 1]);

    let mut forces: BTreeMap<JointId, Force> =
        truss.joints().map(|joint| (joint, Force::default())).collect();
    for joint in [left_joint, right_joint] {
        if let Some(force) = forces.get_mut(&joint) {
            force.y = reaction;
        }
    }

    let min_y = free.iter().map(|&joint| y_of(joint)).fold(f64::INFINITY, f64::min);
    let mut loaded_joints: Vec<JointId> = free
        .iter()
        .copied()
        .filter(|&joint| y_of(joint) <= min_y + config.top_chord_window)
        .collect();
    if loaded_joints.is_empty() {
        debug!("no top chord found; loading every non-support joint");
        loaded_joints = free;
    }

    let load_per_joint = -total_load / loaded_joints.len() as f64;
    for joint in &loaded_joints {
        if let Some(force) = forces.get_mut(joint) {
            force.y += load_per_joint;
        }
    }
    debug!(
        total_load,
        span_feet,
        loaded = loaded_joints.len(),
        load_per_joint,
        "distributed roof load"
    );

    Ok(NodalLoads {
        forces,
        reactions: Reactions {
            left_joint,
            left: reaction,
            right_joint,
            right: reaction,
        },
        loaded_joints,
        total_load,
    })
}
