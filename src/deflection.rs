//! Approximate joint displacements and the span-ratio deflection check.
//!
//! Each free joint moves by the axial shortening or elongation of the members
//! meeting there, projected onto the member direction. Compression members are
//! amplified for slenderness and loaded joints pick up an extra local sag from
//! a point-load beam formula. The result is an engineering estimate intended
//! for comparison against `L/n` limits, not a stiffness-method solution.

use std::collections::BTreeMap;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnalysisConfig, DeflectionSettings};
use crate::geometry::{unit_vector, Displacement, Force};
use crate::material::Material;
use crate::truss::{JointId, MemberId, Truss};

/// Estimated displacement of every joint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeflectionEstimate {
    /// Displacement in inches for every joint; zero at supports.
    pub displacements: BTreeMap<JointId, Displacement>,
    /// Largest displacement magnitude in inches.
    pub max_deflection: f64,
    /// Joint with the largest displacement; `None` when nothing moves.
    pub max_deflection_joint: Option<JointId>,
}

impl DeflectionEstimate {
    /// Displacement of a joint; zero for unknown joints.
    #[must_use]
    pub fn displacement(&self, joint: JointId) -> Displacement {
        self.displacements.get(&joint).copied().unwrap_or_default()
    }
}

/// Outcome of comparing the maximum deflection against code limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeflectionCheck {
    /// Span in inches.
    pub span_inches: f64,
    /// Allowable live-load deflection in inches.
    pub live_load_allowable: f64,
    /// Allowable total-load deflection in inches.
    pub total_load_allowable: f64,
    /// Whether the maximum deflection is within the live-load allowable.
    pub passes: bool,
    /// Achieved ratio such as `"L/512"`.
    pub ratio: String,
    /// Governing limit such as `"L/240"`.
    pub limit_ratio: String,
}

/// Amplification applied to a member's axial deformation.
///
/// Tension members are not amplified. Compression members use
/// `1 + ((L / r) / reference)^exponent` with `L` in inches.
#[must_use]
pub fn slenderness_factor(
    force: f64,
    length_inches: f64,
    radius_of_gyration: f64,
    settings: &DeflectionSettings,
) -> f64 {
    if force >= 0.0 {
        return 1.0;
    }
    let slenderness = length_inches / radius_of_gyration;
    1.0 + (slenderness / settings.slenderness_reference).powf(settings.slenderness_exponent)
}

/// Estimate the displacement of every joint.
///
/// `member_forces` are the solved axial forces and `nodal_forces` the external
/// joint forces used to solve them. Members must have non-zero length.
#[must_use]
pub fn estimate(
    truss: &Truss,
    member_forces: &BTreeMap<MemberId, f64>,
    material: &Material,
    nodal_forces: &BTreeMap<JointId, Force>,
    config: &AnalysisConfig,
) -> DeflectionEstimate {
    let mut estimate = DeflectionEstimate::default();
    for joint in truss.joints() {
        let displacement = if truss.is_supported(joint) {
            Displacement::default()
        } else {
            let load = nodal_forces.get(&joint).copied().unwrap_or_default();
            joint_displacement(truss, joint, member_forces, material, load, config).into()
        };
        let magnitude = displacement.magnitude();
        if magnitude > estimate.max_deflection {
            estimate.max_deflection = magnitude;
            estimate.max_deflection_joint = Some(joint);
        }
        estimate.displacements.insert(joint, displacement);
    }
    debug!(
        max_deflection = estimate.max_deflection,
        joint = estimate.max_deflection_joint.map(|joint| joint.index()),
        "estimated joint displacements"
    );
    estimate
}

/// Displacement of one free joint in inches.
fn joint_displacement(
    truss: &Truss,
    joint: JointId,
    member_forces: &BTreeMap<MemberId, f64>,
    material: &Material,
    load: Force,
    config: &AnalysisConfig,
) -> Vector2<f64> {
    let settings = &config.deflection;
    let elastic_modulus = material.elastic_modulus;
    let Some(origin) = truss.position(joint) else {
        return Vector2::zeros();
    };

    let mut displacement = Vector2::zeros();
    let mut total_length = 0.0;
    let mut total_inertia = 0.0;
    let mut count = 0_u32;
    for (member, far) in truss.incident_members(joint) {
        let (Some(section), Some(length)) =
            (truss.member_section(member), truss.member_length(member))
        else {
            continue;
        };
        let Some(direction) = truss.position(far).and_then(|far| unit_vector(origin, far)) else {
            continue;
        };
        let length = config.scale.to_inches(length);
        let force = member_forces.get(&member).copied().unwrap_or(0.0);
        let axial = force * length / (elastic_modulus * section.area);
        let factor = slenderness_factor(force, length, section.radius_of_gyration(), settings);
        displacement += direction * (axial * factor);

        total_length += length;
        total_inertia += section.moment_of_inertia;
        count += 1;
    }

    if load.y < 0.0 && count > 0 {
        let average_length = total_length / f64::from(count);
        let average_inertia = total_inertia / f64::from(count);
        let sag = settings.continuity_factor * load.y.abs() * average_length.powi(3)
            / (48.0 * elastic_modulus * average_inertia);
        displacement.y -= sag;
    }
    displacement
}

/// Compare `max_deflection` (inches) against the configured limits for a
/// truss spanning `span` drawing units.
///
/// # Examples
/// ```
/// use trusscheck::{check_limits, AnalysisConfig};
///
/// // 20 ft span: 240 in, so L/240 is one inch.
/// let check = check_limits(0.5, 1_000.0, &AnalysisConfig::default());
/// assert!(check.passes);
/// assert_eq!(check.ratio, "L/480");
/// assert_eq!(check.limit_ratio, "L/240");
/// ```
#[must_use]
pub fn check_limits(max_deflection: f64, span: f64, config: &AnalysisConfig) -> DeflectionCheck {
    let limits = config.deflection.limits;
    let span_inches = config.scale.to_inches(span);
    let live_load_allowable = span_inches / limits.live_load;
    let ratio = if max_deflection > 0.0 {
        format!("L/{}", (span_inches / max_deflection).floor())
    } else {
        "L/∞".to_string()
    };
    DeflectionCheck {
        span_inches,
        live_load_allowable,
        total_load_allowable: span_inches / limits.total_load,
        passes: max_deflection <= live_load_allowable,
        ratio,
        limit_ratio: format!("L/{}", limits.live_load),
    }
}
