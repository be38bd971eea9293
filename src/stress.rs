//! Axial stress check of every member against the material allowables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::truss::{MemberId, Truss};

/// Whether a member is being pulled or pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxialSense {
    /// Positive force.
    Tension,
    /// Negative or zero force.
    Compression,
}

impl AxialSense {
    /// Sense of an axial force in pounds.
    #[must_use]
    pub fn of(force: f64) -> Self {
        if force > 0.0 {
            AxialSense::Tension
        } else {
            AxialSense::Compression
        }
    }
}

/// Stress result for one member.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberStress {
    /// The member.
    pub member: MemberId,
    /// Axial force in pounds, tension positive.
    pub force: f64,
    /// Axial stress `|force| / area` in psi.
    pub stress: f64,
    /// Allowable stress in psi for the member's sense.
    pub allowable: f64,
    /// `stress / allowable`; above one the member is overstressed.
    pub ratio: f64,
    /// Tension or compression.
    pub sense: AxialSense,
}

impl MemberStress {
    /// Whether the member exceeds its allowable stress.
    #[must_use]
    pub fn is_overstressed(&self) -> bool {
        self.ratio > 1.0
    }
}

/// Result of checking every member.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StressCheck {
    /// Per-member results in ascending member order.
    pub members: Vec<MemberStress>,
    /// Largest axial stress in psi.
    pub max_stress: f64,
    /// Largest stress ratio.
    pub max_ratio: f64,
    /// Member with the largest ratio; the first one wins a tie.
    pub governing_member: Option<MemberId>,
    /// Members with a ratio above one.
    pub failed_members: Vec<MemberId>,
}

impl StressCheck {
    /// Whether every member is within its allowable stress.
    #[must_use]
    pub fn passes(&self) -> bool {
        self.failed_members.is_empty()
    }

    /// Result for one member.
    #[must_use]
    pub fn member(&self, member: MemberId) -> Option<&MemberStress> {
        self.members.iter().find(|result| result.member == member)
    }
}

/// Check the axial stress of every member of `truss`.
///
/// Members missing from `forces` are checked at zero force. Sections are
/// assumed to have a positive area.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use trusscheck::{evaluate, point, Material, Truss};
///
/// let mut truss = Truss::new();
/// let a = truss.add_joint(point(0.0, 0.0))?;
/// let b = truss.add_joint(point(100.0, 0.0))?;
/// let member = truss.add_member(a, b)?;
///
/// let forces = BTreeMap::from([(member, -1_150.0 * 5.25)]);
/// let check = evaluate(&truss, &forces, &Material::default());
/// assert_eq!(check.max_stress, 1_150.0);
/// assert!(check.passes());
/// # Ok::<(), trusscheck::TrussEditError>(())
/// ```
#[must_use]
pub fn evaluate(truss: &Truss, forces: &BTreeMap<MemberId, f64>, material: &Material) -> StressCheck {
    let mut check = StressCheck::default();
    for member in truss.members() {
        let Some(section) = truss.member_section(member) else {
            continue;
        };
        let force = forces.get(&member).copied().unwrap_or(0.0);
        let stress = force.abs() / section.area;
        let allowable = material.allowable_for(force);
        let result = MemberStress {
            member,
            force,
            stress,
            allowable,
            ratio: stress / allowable,
            sense: AxialSense::of(force),
        };

        check.max_stress = check.max_stress.max(stress);
        if check.governing_member.is_none() || result.ratio > check.max_ratio {
            check.max_ratio = result.ratio;
            check.governing_member = Some(member);
        }
        if result.is_overstressed() {
            check.failed_members.push(member);
        }
        check.members.push(result);
    }
    check
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point;
    use crate::section::Section;

    fn two_members() -> (Truss, MemberId, MemberId) {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        let b = truss.add_joint(point(100.0, 0.0)).expect("joint added");
        let c = truss.add_joint(point(100.0, 100.0)).expect("joint added");
        let ab = truss.add_member(a, b).expect("member added");
        let bc = truss
            .add_member_with_section(b, c, Section::rectangular(1.0, 2.0))
            .expect("member added");
        (truss, ab, bc)
    }

    #[test]
    fn tension_and_compression_use_their_allowables() {
        let (truss, ab, bc) = two_members();
        let forces = BTreeMap::from([(ab, 5.25 * 387.5), (bc, -2.0 * 575.0)]);
        let check = evaluate(&truss, &forces, &Material::default());

        let tension = check.member(ab).expect("member checked");
        assert_eq!(tension.sense, AxialSense::Tension);
        assert_relative_eq!(tension.stress, 387.5);
        assert_relative_eq!(tension.allowable, 775.0);
        assert_relative_eq!(tension.ratio, 0.5);

        let compression = check.member(bc).expect("member checked");
        assert_eq!(compression.sense, AxialSense::Compression);
        assert_relative_eq!(compression.allowable, 1_150.0);
        assert_relative_eq!(compression.ratio, 0.5);
        assert!(check.passes());
    }

    #[test]
    fn overstressed_members_are_listed() {
        let (truss, ab, bc) = two_members();
        let forces = BTreeMap::from([(ab, 100.0), (bc, -2.0 * 1_200.0)]);
        let check = evaluate(&truss, &forces, &Material::default());
        assert_eq!(check.failed_members, vec![bc]);
        assert_eq!(check.governing_member, Some(bc));
        assert_relative_eq!(check.max_stress, 1_200.0);
        assert_relative_eq!(check.max_ratio, 1_200.0 / 1_150.0);
    }

    #[test]
    fn ratio_of_exactly_one_passes() {
        let (truss, ab, _) = two_members();
        let forces = BTreeMap::from([(ab, 5.25 * 775.0)]);
        let check = evaluate(&truss, &forces, &Material::default());
        assert_relative_eq!(check.max_ratio, 1.0);
        assert!(check.passes());
    }

    #[test]
    fn missing_forces_count_as_zero() {
        let (truss, ab, _) = two_members();
        let check = evaluate(&truss, &BTreeMap::new(), &Material::default());
        assert_eq!(check.members.len(), 2);
        assert_eq!(check.max_stress, 0.0);
        assert_eq!(check.governing_member, Some(ab));
        assert_eq!(check.member(ab).map(|result| result.sense), Some(AxialSense::Compression));
    }
}
