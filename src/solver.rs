//! Method-of-joints solver for statically determinate planar trusses.
//!
//! Each joint contributes two equilibrium equations,
//! `external + Σ Fᵢ·uᵢ = 0`, where `uᵢ` is the unit vector from the joint
//! towards the far end of member `i` and `Fᵢ` is positive in tension. A joint
//! with at most two unknown member forces is solved directly; its results make
//! neighbouring joints solvable in turn. Joints are processed from a work-list
//! in passes: the first pass visits every joint, later passes only the joints
//! that gained a known member force during the previous pass.
//!
//! A joint with a single unknown is solved from its dominant equation and only
//! accepted when the other equation balances too. Members that are never
//! determined keep a force of zero and are reported as indeterminate rather
//! than failing the analysis; joints those zeros leave out of equilibrium are
//! reported as unbalanced.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use nalgebra::Vector2;
use tracing::{debug, trace};

use crate::config::SolverSettings;
use crate::geometry::{unit_vector, Force};
use crate::truss::{JointId, MemberId, Truss};

/// Result of a method-of-joints solve.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointSolution {
    /// Axial force for every member in pounds, tension positive.
    pub member_forces: BTreeMap<MemberId, f64>,
    /// Joints whose equilibrium equations were used to determine member forces.
    pub solved_joints: BTreeSet<JointId>,
    /// Joints resolved by the collinear zero-force rule.
    pub zero_force_joints: Vec<JointId>,
    /// Members whose force could not be determined and defaulted to zero.
    pub indeterminate_members: Vec<MemberId>,
    /// Joints whose net force under the final member forces exceeds the balance tolerance.
    pub unbalanced_joints: Vec<JointId>,
    /// Number of passes over the work-list.
    pub passes: usize,
}

impl JointSolution {
    /// Force in a member; zero for unknown members.
    #[must_use]
    pub fn force(&self, member: MemberId) -> f64 {
        self.member_forces.get(&member).copied().unwrap_or(0.0)
    }

    /// Whether every member force was determined.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.indeterminate_members.is_empty()
    }

    /// Whether every joint is in equilibrium.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.unbalanced_joints.is_empty()
    }
}

/// A member meeting at the joint being solved.
#[derive(Clone, Copy, Debug)]
struct Incidence {
    /// The member.
    member: MemberId,
    /// Joint at the far end.
    far: JointId,
    /// Unit vector from the joint towards `far`.
    direction: Vector2<f64>,
}

/// What happened when a joint was visited.
#[derive(Clone, Debug, PartialEq)]
enum JointOutcome {
    /// Newly determined member forces.
    Solved(Vec<(MemberId, f64)>),
    /// Two unknowns along parallel lines; not resolvable at this joint.
    Singular,
    /// One unknown, but the equation not used to find it is left with this net force.
    Unbalanced(f64),
    /// More than two unknowns remain.
    TooManyUnknowns(usize),
    /// Every member force at the joint is already known.
    NothingToSolve,
}

/// Solve the axial force in every member.
///
/// `external` holds the applied force (including support reactions) at each
/// joint; joints without an entry are unloaded. The truss is assumed to have
/// no zero-length members.
#[must_use]
pub fn solve_member_forces(
    truss: &Truss,
    external: &BTreeMap<JointId, Force>,
    settings: &SolverSettings,
) -> JointSolution {
    let incidences = incidence_table(truss);
    let load_at = |joint: JointId| external.get(&joint).copied().unwrap_or_default();

    let mut known: BTreeMap<MemberId, f64> = BTreeMap::new();
    let mut solved: BTreeSet<JointId> = BTreeSet::new();
    let mut zero_force_joints = Vec::new();

    for (&joint, members) in &incidences {
        if is_zero_force_joint(members, load_at(joint), settings) {
            for incidence in members {
                known.insert(incidence.member, 0.0);
            }
            solved.insert(joint);
            zero_force_joints.push(joint);
            debug!(joint = joint.index(), "collinear unloaded joint; members carry no force");
        }
    }

    let max_passes = settings.max_passes(truss.joint_count());
    let mut queue: VecDeque<JointId> = incidences
        .keys()
        .copied()
        .filter(|joint| !solved.contains(joint))
        .collect();
    let mut passes = 0;

    while !queue.is_empty() && passes < max_passes {
        passes += 1;
        let pass: Vec<JointId> = queue.drain(..).collect();
        let mut queued: BTreeSet<JointId> = BTreeSet::new();

        for joint in pass {
            if solved.contains(&joint) {
                continue;
            }
            let members = &incidences[&joint];
            match solve_joint(members, &known, load_at(joint), settings) {
                JointOutcome::Solved(results) => {
                    for &(member, force) in &results {
                        trace!(member = member.index(), force, "member force determined");
                        known.insert(member, force);
                        let far = members
                            .iter()
                            .find(|incidence| incidence.member == member)
                            .map(|incidence| incidence.far);
                        if let Some(far) = far {
                            if !solved.contains(&far) && queued.insert(far) {
                                queue.push_back(far);
                            }
                        }
                    }
                    solved.insert(joint);
                    debug!(joint = joint.index(), solved = results.len(), "joint solved");
                }
                JointOutcome::Singular => {
                    trace!(joint = joint.index(), "parallel unknowns; deferred");
                }
                JointOutcome::Unbalanced(residual) => {
                    trace!(
                        joint = joint.index(),
                        residual,
                        "single unknown cannot balance joint; deferred"
                    );
                }
                JointOutcome::TooManyUnknowns(count) => {
                    trace!(joint = joint.index(), unknowns = count, "too many unknowns; deferred");
                }
                JointOutcome::NothingToSolve => {}
            }
        }
    }

    let mut member_forces = BTreeMap::new();
    let mut indeterminate_members = Vec::new();
    for member in truss.members() {
        match known.get(&member) {
            Some(&force) => {
                member_forces.insert(member, force);
            }
            None => {
                member_forces.insert(member, 0.0);
                indeterminate_members.push(member);
            }
        }
    }
    let unbalanced_joints: Vec<JointId> = incidences
        .iter()
        .filter(|&(&joint, members)| {
            let residual = net_force(members, &member_forces, load_at(joint));
            residual.x.abs() > settings.balance_tolerance
                || residual.y.abs() > settings.balance_tolerance
        })
        .map(|(&joint, _)| joint)
        .collect();
    debug!(
        passes,
        solved = solved.len(),
        joints = truss.joint_count(),
        indeterminate = indeterminate_members.len(),
        unbalanced = unbalanced_joints.len(),
        "method of joints finished"
    );

    JointSolution {
        member_forces,
        solved_joints: solved,
        zero_force_joints,
        indeterminate_members,
        unbalanced_joints,
        passes,
    }
}

/// Net force left at a joint by the given member forces and external load.
///
/// A joint in equilibrium has a residual of zero in both directions. Members
/// missing from `member_forces` contribute nothing.
#[must_use]
pub fn joint_residual(
    truss: &Truss,
    joint: JointId,
    member_forces: &BTreeMap<MemberId, f64>,
    external: Force,
) -> Force {
    let Some(origin) = truss.position(joint) else {
        return Force::default();
    };
    let mut residual = external.to_vector();
    for (member, far) in truss.incident_members(joint) {
        let Some(direction) = truss.position(far).and_then(|far| unit_vector(origin, far)) else {
            continue;
        };
        residual += direction * member_forces.get(&member).copied().unwrap_or(0.0);
    }
    residual.into()
}

/// Members and direction cosines at every joint, in ascending joint order.
fn incidence_table(truss: &Truss) -> BTreeMap<JointId, Vec<Incidence>> {
    truss
        .joints()
        .map(|joint| {
            let origin = truss.position(joint);
            let members = truss
                .incident_members(joint)
                .into_iter()
                .filter_map(|(member, far)| {
                    let direction = unit_vector(origin?, truss.position(far)?)?;
                    Some(Incidence {
                        member,
                        far,
                        direction,
                    })
                })
                .collect();
            (joint, members)
        })
        .collect()
}

/// External load plus the pull of every member at a joint.
fn net_force(
    members: &[Incidence],
    member_forces: &BTreeMap<MemberId, f64>,
    load: Force,
) -> Vector2<f64> {
    members.iter().fold(load.to_vector(), |sum, incidence| {
        sum + incidence.direction * member_forces.get(&incidence.member).copied().unwrap_or(0.0)
    })
}

/// Two collinear members at an unloaded joint.
fn is_zero_force_joint(members: &[Incidence], load: Force, settings: &SolverSettings) -> bool {
    let [first, second] = members else {
        return false;
    };
    load.x.abs() < settings.zero_load_tolerance
        && load.y.abs() < settings.zero_load_tolerance
        && first.direction.perp(&second.direction).abs() < settings.collinear_tolerance
}

/// Apply joint equilibrium to determine up to two unknown member forces.
fn solve_joint(
    members: &[Incidence],
    known: &BTreeMap<MemberId, f64>,
    load: Force,
    settings: &SolverSettings,
) -> JointOutcome {
    let mut residual = load.to_vector();
    let mut unknowns = Vec::new();
    for incidence in members {
        match known.get(&incidence.member) {
            Some(&force) => residual += incidence.direction * force,
            None => unknowns.push(incidence),
        }
    }

    match unknowns.as_slice() {
        [] => JointOutcome::NothingToSolve,
        [only] => {
            let u = only.direction;
            // Use the equation with the larger coefficient.
            let force = if u.x.abs() > u.y.abs() {
                -residual.x / u.x
            } else {
                -residual.y / u.y
            };
            let leftover = residual + u * force;
            if leftover.x.abs() > settings.balance_tolerance
                || leftover.y.abs() > settings.balance_tolerance
            {
                return JointOutcome::Unbalanced(leftover.norm());
            }
            JointOutcome::Solved(vec![(only.member, force)])
        }
        [first, second] => {
            let (u1, u2) = (first.direction, second.direction);
            let det = u1.x * u2.y - u2.x * u1.y;
            if det.abs() < settings.singular_tolerance {
                return JointOutcome::Singular;
            }
            let force1 = (-residual.x * u2.y + residual.y * u2.x) / det;
            let force2 = (-u1.x * residual.y + u1.y * residual.x) / det;
            JointOutcome::Solved(vec![(first.member, force1), (second.member, force2)])
        }
        more => JointOutcome::TooManyUnknowns(more.len()),
    }
}
