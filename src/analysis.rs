//! The full analysis pipeline: loads, member forces, stresses and deflections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::deflection::{check_limits, estimate, DeflectionCheck, DeflectionEstimate};
use crate::errors::AnalysisError;
use crate::geometry::{Displacement, Force};
use crate::loads::{distribute, LoadCase, NodalLoads, Reactions};
use crate::material::Material;
use crate::solver::{solve_member_forces, JointSolution};
use crate::stress::{evaluate, MemberStress, StressCheck};
use crate::truss::{JointId, MemberId, Truss};

/// Failure reason recorded when any member exceeds its allowable stress.
pub const OVERSTRESS_FAILURE: &str = "Member overstressed";

/// Overall outcome of an analysis run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    /// No analysis has been run for the current inputs.
    #[default]
    NotAnalyzed,
    /// Every check passed.
    Passed,
    /// The analysis completed but a stress or deflection check failed.
    Failed,
    /// The analysis could not be completed.
    Error,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisStatus::NotAnalyzed => "NOT_ANALYZED",
            AnalysisStatus::Passed => "PASSED",
            AnalysisStatus::Failed => "FAILED",
            AnalysisStatus::Error => "ERROR",
        })
    }
}

/// Intermediate results of every pipeline stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Joint forces and reactions from the load distributor.
    pub loads: NodalLoads,
    /// Member forces from the method of joints.
    pub solution: JointSolution,
    /// Member stress check.
    pub stress: StressCheck,
    /// Joint displacements.
    pub deflection: DeflectionEstimate,
    /// Deflection limit check.
    pub deflection_check: DeflectionCheck,
}

impl Analysis {
    /// Human-readable reasons the truss failed; empty when it passes.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        if self.stress.max_ratio > 1.0 {
            failures.push(OVERSTRESS_FAILURE.to_string());
        }
        if !self.deflection_check.passes {
            failures.push(format!(
                "Deflection exceeds limit ({} > {})",
                self.deflection_check.ratio, self.deflection_check.limit_ratio
            ));
        }
        failures
    }

    /// [`AnalysisStatus::Passed`] or [`AnalysisStatus::Failed`].
    #[must_use]
    pub fn status(&self) -> AnalysisStatus {
        if self.failures().is_empty() {
            AnalysisStatus::Passed
        } else {
            AnalysisStatus::Failed
        }
    }
}

/// Flat analysis result handed back to the caller.
///
/// A fresh report is produced by every run; nothing is carried over from a
/// previous one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Overall outcome.
    pub status: AnalysisStatus,
    /// Reasons for a `FAILED` status, or the error message for `ERROR`.
    pub failures: Vec<String>,
    /// Axial force per member in pounds, tension positive.
    pub member_forces: BTreeMap<MemberId, f64>,
    /// External force per joint in pounds, including reactions.
    pub nodal_forces: BTreeMap<JointId, Force>,
    /// Displacement per joint in inches.
    pub displacements: BTreeMap<JointId, Displacement>,
    /// Stress result per member.
    pub member_stresses: Vec<MemberStress>,
    /// Largest axial stress in psi.
    pub max_stress: f64,
    /// Largest stress ratio.
    pub stress_ratio: f64,
    /// Largest joint displacement in inches.
    pub max_deflection: f64,
    /// Joint with the largest displacement.
    pub max_deflection_joint: Option<JointId>,
    /// Achieved deflection ratio such as `"L/512"`.
    pub deflection_ratio: String,
    /// Full deflection limit check.
    pub deflection_check: Option<DeflectionCheck>,
    /// Vertical support reactions.
    pub reactions: Option<Reactions>,
    /// Members whose stress ratio exceeds one.
    pub failed_members: Vec<MemberId>,
    /// Members whose force could not be determined and were taken as zero.
    pub indeterminate_members: Vec<MemberId>,
    /// Joints left out of equilibrium by the reported member forces.
    pub unbalanced_joints: Vec<JointId>,
}

impl AnalysisReport {
    /// Report for a run that could not be completed.
    #[must_use]
    pub fn from_error(error: &AnalysisError) -> Self {
        Self {
            status: AnalysisStatus::Error,
            failures: vec![error.to_string()],
            ..Self::default()
        }
    }

    /// Force in a member; zero when not reported.
    #[must_use]
    pub fn member_force(&self, member: MemberId) -> f64 {
        self.member_forces.get(&member).copied().unwrap_or(0.0)
    }
}

impl From<Analysis> for AnalysisReport {
    fn from(analysis: Analysis) -> Self {
        let status = analysis.status();
        let failures = analysis.failures();
        Self {
            status,
            failures,
            member_forces: analysis.solution.member_forces,
            nodal_forces: analysis.loads.forces,
            displacements: analysis.deflection.displacements,
            member_stresses: analysis.stress.members,
            max_stress: analysis.stress.max_stress,
            stress_ratio: analysis.stress.max_ratio,
            max_deflection: analysis.deflection.max_deflection,
            max_deflection_joint: analysis.deflection.max_deflection_joint,
            deflection_ratio: analysis.deflection_check.ratio.clone(),
            deflection_check: Some(analysis.deflection_check),
            reactions: Some(analysis.loads.reactions),
            failed_members: analysis.stress.failed_members,
            indeterminate_members: analysis.solution.indeterminate_members,
            unbalanced_joints: analysis.solution.unbalanced_joints,
        }
    }
}

/// Run every stage of the analysis.
///
/// `span` is the truss span in drawing units; it sets both the total roof load
/// and the deflection limit.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidConfig`] when `config` fails
/// [`AnalysisConfig::validate`], [`AnalysisError::InvalidMaterial`] for a
/// non-positive material property, the load distributor's errors for invalid
/// loads or span and for unsupported or unloadable trusses, and
/// [`AnalysisError::ZeroLengthMember`] when two connected joints coincide.
///
/// # Examples
/// ```
/// use trusscheck::{analyze, AnalysisConfig, AnalysisStatus, LoadCase, Material, Preset};
///
/// let truss = Preset::KingPost.build()?;
/// let analysis = analyze(
///     &truss,
///     &LoadCase::default(),
///     &Material::default(),
///     truss.span(),
///     &AnalysisConfig::default(),
/// )?;
/// // The preset spans 500 drawing units, 10 ft at the default scale.
/// assert_eq!(analysis.loads.total_load, 1_100.0);
/// assert!(matches!(analysis.status(), AnalysisStatus::Passed | AnalysisStatus::Failed));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn analyze(
    truss: &Truss,
    loads: &LoadCase,
    material: &Material,
    span: f64,
    config: &AnalysisConfig,
) -> Result<Analysis, AnalysisError> {
    config.validate()?;
    material.validate()?;
    let nodal = distribute(truss, loads, span, config)?;
    for member in truss.members() {
        if truss.member_length(member).map_or(true, |length| length <= 0.0) {
            return Err(AnalysisError::ZeroLengthMember(member));
        }
    }

    let solution = solve_member_forces(truss, &nodal.forces, &config.solver);
    if !solution.is_complete() {
        let members: Vec<String> = solution
            .indeterminate_members
            .iter()
            .map(|&member| truss.member_label(member).unwrap_or_default())
            .collect();
        warn!(
            count = members.len(),
            members = %members.join(", "),
            "member forces could not be determined and were taken as zero"
        );
    }
    if !solution.is_balanced() {
        let joints: Vec<String> = solution
            .unbalanced_joints
            .iter()
            .map(|&joint| truss.joint_name(joint))
            .collect();
        warn!(
            count = joints.len(),
            joints = %joints.join(", "),
            "joints are not in equilibrium under the reported member forces"
        );
    }

    let stress = evaluate(truss, &solution.member_forces, material);
    let deflection = estimate(truss, &solution.member_forces, material, &nodal.forces, config);
    let deflection_check = check_limits(deflection.max_deflection, span, config);

    let analysis = Analysis {
        loads: nodal,
        solution,
        stress,
        deflection,
        deflection_check,
    };
    info!(
        status = %analysis.status(),
        max_stress = analysis.stress.max_stress,
        stress_ratio = analysis.stress.max_ratio,
        max_deflection = analysis.deflection.max_deflection,
        ratio = %analysis.deflection_check.ratio,
        "analysis complete"
    );
    Ok(analysis)
}

/// Run the analysis and fold any error into the report.
///
/// Never fails: an [`AnalysisError`] becomes [`AnalysisStatus::Error`] with
/// the error message as the only failure.
#[must_use]
pub fn run_analysis(
    truss: &Truss,
    loads: &LoadCase,
    material: &Material,
    span: f64,
    config: &AnalysisConfig,
) -> AnalysisReport {
    match analyze(truss, loads, material, span, config) {
        Ok(analysis) => analysis.into(),
        Err(error) => {
            warn!(%error, "analysis failed");
            AnalysisReport::from_error(&error)
        }
    }
}
