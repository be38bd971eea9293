//! Plain-text rendering of an [`AnalysisReport`].

use std::fmt::Write;

use crate::analysis::{AnalysisReport, AnalysisStatus};
use crate::stress::AxialSense;
use crate::truss::Truss;

/// Render a textual summary of an analysis.
///
/// The summary opens with the status and any failure reasons, then lists the
/// reactions, one line per member, any joints left out of equilibrium and the
/// deflection check. Joints and
/// members are named by their labels where the truss has them.
#[must_use]
pub fn render_summary(truss: &Truss, report: &AnalysisReport) -> String {
    let mut output = String::new();

    writeln!(&mut output, "Truss analysis: {}", report.status)
        .expect("writing to string cannot fail");
    for failure in &report.failures {
        writeln!(&mut output, "  - {failure}").expect("writing to string cannot fail");
    }
    if matches!(
        report.status,
        AnalysisStatus::NotAnalyzed | AnalysisStatus::Error
    ) {
        return output;
    }

    if let Some(reactions) = &report.reactions {
        writeln!(
            &mut output,
            "Reactions: {} = {:.1} lb, {} = {:.1} lb",
            truss.joint_name(reactions.left_joint),
            reactions.left,
            truss.joint_name(reactions.right_joint),
            reactions.right
        )
        .expect("writing to string cannot fail");
    }

    writeln!(
        &mut output,
        "{:<8} {:>12} {:>11} {:>7}  sense",
        "member", "force (lb)", "stress (psi)", "ratio"
    )
    .expect("writing to string cannot fail");
    for result in &report.member_stresses {
        let name = truss
            .member_label(result.member)
            .unwrap_or_else(|| format!("#{}", result.member.index()));
        let sense = match result.sense {
            AxialSense::Tension => "tension",
            AxialSense::Compression => "compression",
        };
        let mut flags = String::new();
        if result.is_overstressed() {
            flags.push_str("  OVERSTRESSED");
        }
        if report.indeterminate_members.contains(&result.member) {
            flags.push_str("  indeterminate");
        }
        writeln!(
            &mut output,
            "{name:<8} {:>+12.1} {:>11.1} {:>7.3}  {sense}{flags}",
            result.force, result.stress, result.ratio
        )
        .expect("writing to string cannot fail");
    }
    if !report.unbalanced_joints.is_empty() {
        let names: Vec<String> = report
            .unbalanced_joints
            .iter()
            .map(|&joint| truss.joint_name(joint))
            .collect();
        writeln!(&mut output, "Unbalanced joints: {}", names.join(", "))
            .expect("writing to string cannot fail");
    }
    writeln!(
        &mut output,
        "Max stress: {:.1} psi (ratio {:.3})",
        report.max_stress, report.stress_ratio
    )
    .expect("writing to string cannot fail");

    let at = report
        .max_deflection_joint
        .map(|joint| format!(" at {}", truss.joint_name(joint)))
        .unwrap_or_default();
    let limit = report
        .deflection_check
        .as_ref()
        .map_or("", |check| check.limit_ratio.as_str());
    writeln!(
        &mut output,
        "Max deflection: {:.4} in{at} ({}, limit {limit})",
        report.max_deflection, report.deflection_ratio
    )
    .expect("writing to string cannot fail");

    output
}
