#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use trusscheck::{
    analyze, joint_residual, point, run_analysis, AnalysisConfig, AnalysisStatus, JointId,
    LoadCase, LumberSize, Material, MemberId, Preset, Scale, Support, Truss,
};

#[derive(Debug, Clone, Copy)]
struct KingPostGeometry {
    left: JointId,
    right: JointId,
    peak: JointId,
    centre: JointId,
    left_diagonal: MemberId,
    right_diagonal: MemberId,
    left_chord: MemberId,
    right_chord: MemberId,
    king_post: MemberId,
}

/// 20 ft King Post with its peak 5 ft off the chord line.
///
/// The chord has the smallest y, so the load distributor treats it as the top
/// chord and puts the whole roof load on its centre joint.
fn build_king_post() -> (Truss, KingPostGeometry) {
    let mut truss = Truss::new();
    let left = truss
        .add_supported_joint(point(0.0, 0.0), Support::Fixed)
        .expect("left support added");
    let right = truss
        .add_supported_joint(point(1_000.0, 0.0), Support::Roller)
        .expect("right support added");
    let peak = truss.add_joint(point(500.0, 250.0)).expect("peak added");
    let centre = truss.add_joint(point(500.0, 0.0)).expect("centre added");

    let left_diagonal = truss.add_member(left, peak).expect("member added");
    let right_diagonal = truss.add_member(peak, right).expect("member added");
    let left_chord = truss.add_member(left, centre).expect("member added");
    let right_chord = truss.add_member(centre, right).expect("member added");
    let king_post = truss.add_member(peak, centre).expect("member added");

    (
        truss,
        KingPostGeometry {
            left,
            right,
            peak,
            centre,
            left_diagonal,
            right_diagonal,
            left_chord,
            right_chord,
            king_post,
        },
    )
}

fn roof_loads() -> LoadCase {
    LoadCase::new(15.0, 40.0, 0.0)
}

#[test]
fn reactions_share_the_total_load() {
    let (truss, geometry) = build_king_post();
    let analysis = analyze(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    )
    .expect("king post analysis succeeds");

    assert_relative_eq!(analysis.loads.total_load, 2_200.0);
    assert_eq!(analysis.loads.reactions.left_joint, geometry.left);
    assert_eq!(analysis.loads.reactions.right_joint, geometry.right);
    assert_relative_eq!(analysis.loads.reactions.left, 1_100.0);
    assert_relative_eq!(analysis.loads.reactions.right, 1_100.0);
    assert_eq!(analysis.loads.loaded_joints, vec![geometry.centre]);
}

#[test]
fn member_forces_match_hand_calculation() {
    let (truss, geometry) = build_king_post();
    let report = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );

    // Diagonals rise 250 over a 559.02 unit length.
    let sin = 250.0 / 500.0_f64.hypot(250.0);
    let diagonal = -1_100.0 / sin;
    assert_relative_eq!(report.member_force(geometry.left_diagonal), diagonal, epsilon = 1e-6);
    assert_relative_eq!(report.member_force(geometry.right_diagonal), diagonal, epsilon = 1e-6);
    assert_relative_eq!(report.member_force(geometry.left_chord), 2_200.0, epsilon = 1e-6);
    assert_relative_eq!(report.member_force(geometry.right_chord), 2_200.0, epsilon = 1e-6);
    // The centre joint carries the whole roof load and the post takes all of it to the peak.
    assert_relative_eq!(report.member_force(geometry.king_post), 2_200.0, epsilon = 1e-6);
    assert!(report.indeterminate_members.is_empty());
}

#[test]
fn every_joint_is_in_equilibrium() {
    let (truss, geometry) = build_king_post();
    let analysis = analyze(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    )
    .expect("king post analysis succeeds");

    assert_eq!(analysis.solution.solved_joints.len(), 3);
    for joint in [geometry.left, geometry.right, geometry.peak, geometry.centre] {
        let residual = joint_residual(
            &truss,
            joint,
            &analysis.solution.member_forces,
            analysis.loads.force_at(joint),
        );
        assert!(residual.x.abs() < 1e-6, "x residual at {joint:?}: {}", residual.x);
        assert!(residual.y.abs() < 1e-6, "y residual at {joint:?}: {}", residual.y);
    }
}

#[test]
fn two_by_fours_fail_on_deflection_only() {
    let (truss, _) = build_king_post();
    let report = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );

    assert_eq!(report.status, AnalysisStatus::Failed);
    assert!(report.failed_members.is_empty());
    assert!(report.stress_ratio < 1.0);
    assert_eq!(
        report.failures,
        vec!["Deflection exceeds limit (L/67 > L/240)".to_string()]
    );
    assert_eq!(report.deflection_ratio, "L/67");

    let again = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );
    assert_eq!(report, again);
}

#[test]
fn deeper_members_pass() {
    let (mut truss, geometry) = build_king_post();
    truss
        .set_section_for_all(LumberSize::L2x12.section())
        .expect("section is valid");
    let report = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );

    assert_eq!(report.status, AnalysisStatus::Passed, "{:?}", report.failures);
    assert!(report.failures.is_empty());
    assert_eq!(report.max_deflection_joint, Some(geometry.centre));
    assert!(report.max_deflection < 1.0);
}

#[test]
fn single_support_is_an_error() {
    let (mut truss, geometry) = build_king_post();
    truss
        .set_support(geometry.right, None)
        .expect("support cleared");
    let report = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );

    assert_eq!(report.status, AnalysisStatus::Error);
    assert_eq!(
        report.failures,
        vec!["Truss must have at least 2 supports for stability (found 1)".to_string()]
    );
    assert!(report.member_forces.is_empty());
}

#[test]
fn simple_beam_degrades_to_zero_forces() {
    let truss = Preset::SimpleBeam.build().expect("preset tables are valid");
    let report = run_analysis(
        &truss,
        &roof_loads(),
        &Material::default(),
        truss.span(),
        &AnalysisConfig::default(),
    );

    assert_ne!(report.status, AnalysisStatus::Error);
    assert_eq!(report.member_forces.len(), 4);
    assert!(report.member_forces.values().all(|force| force.abs() < 1e-9));
    assert_relative_eq!(report.max_stress, 0.0, epsilon = 1e-9);

    // No joint of a straight chord can be solved, so every member is a default
    // and every joint is left carrying its load or reaction.
    let members: Vec<MemberId> = truss.members().collect();
    assert_eq!(report.indeterminate_members, members);
    let joints: Vec<JointId> = truss.joints().collect();
    assert_eq!(report.unbalanced_joints, joints);
    let names: Vec<String> = report
        .unbalanced_joints
        .iter()
        .map(|&joint| truss.joint_name(joint))
        .collect();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);
}

#[test]
fn solved_preset_joints_are_in_equilibrium() {
    for preset in Preset::ALL {
        let truss = preset.build().expect("preset tables are valid");
        let analysis = analyze(
            &truss,
            &roof_loads(),
            &Material::default(),
            truss.span(),
            &AnalysisConfig::default(),
        )
        .expect("preset analysis succeeds");

        for joint in truss.joints() {
            let residual = joint_residual(
                &truss,
                joint,
                &analysis.solution.member_forces,
                analysis.loads.force_at(joint),
            );
            let balanced = residual.x.abs() < 1e-6 && residual.y.abs() < 1e-6;
            if analysis.solution.solved_joints.contains(&joint) {
                assert!(balanced, "{preset}: solved joint {joint:?} left {residual:?}");
            }
            assert_eq!(
                balanced,
                !analysis.solution.unbalanced_joints.contains(&joint),
                "{preset}: joint {joint:?} left {residual:?}"
            );
        }
    }
}

#[test]
fn triangulated_presets_balance_everywhere() {
    for preset in [Preset::KingPost, Preset::QueenPost, Preset::Fink, Preset::Howe, Preset::Pratt] {
        let truss = preset.build().expect("preset tables are valid");
        let report = run_analysis(
            &truss,
            &roof_loads(),
            &Material::default(),
            truss.span(),
            &AnalysisConfig::default(),
        );
        assert!(report.unbalanced_joints.is_empty(), "{preset}: {:?}", report.unbalanced_joints);
        assert!(report.indeterminate_members.is_empty(), "{preset}");
    }
}

#[test]
fn unusable_loads_are_errors() {
    let (truss, _) = build_king_post();
    for loads in [
        LoadCase::new(f64::NAN, 40.0, 0.0),
        LoadCase::new(f64::INFINITY, 40.0, 0.0),
        LoadCase::new(15.0, -40.0, 0.0),
    ] {
        let report = run_analysis(
            &truss,
            &loads,
            &Material::default(),
            truss.span(),
            &AnalysisConfig::default(),
        );
        assert_eq!(report.status, AnalysisStatus::Error, "{loads:?}");
        assert!(report.member_forces.is_empty());
        assert!(report.reactions.is_none());
    }
}

#[test]
fn zero_scale_is_an_error() {
    let (truss, _) = build_king_post();
    let config = AnalysisConfig {
        scale: Scale { units_per_foot: 0.0 },
        ..AnalysisConfig::default()
    };
    let report = run_analysis(&truss, &roof_loads(), &Material::default(), truss.span(), &config);
    assert_eq!(report.status, AnalysisStatus::Error);
    assert_eq!(
        report.failures,
        vec![
            "invalid configuration: configuration value 'scale.units_per_foot' must be positive (received 0)"
                .to_string()
        ]
    );
}

#[test]
fn every_preset_can_be_analysed() {
    for preset in Preset::ALL {
        let truss = preset.build().expect("preset tables are valid");
        let report = run_analysis(
            &truss,
            &roof_loads(),
            &Material::default(),
            truss.span(),
            &AnalysisConfig::default(),
        );
        assert_ne!(report.status, AnalysisStatus::Error, "{preset}: {:?}", report.failures);
        assert_eq!(report.member_forces.len(), truss.member_count(), "{preset}");
        assert_eq!(report.displacements.len(), truss.joint_count(), "{preset}");
        assert!(report.max_stress.is_finite(), "{preset}");
        assert!(report.max_deflection.is_finite(), "{preset}");
    }
}
