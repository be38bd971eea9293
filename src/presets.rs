//! Library of common roof truss layouts.
//!
//! Every preset spans 500 drawing units (10 ft at the default scale) between a
//! fixed support at `x = 150` and a roller at `x = 650`, except the cantilever
//! which overhangs its supports. Joints are labelled `A`, `B`, `C`... in table
//! order and every member is a 2x4.

use std::fmt;

use crate::errors::TrussEditError;
use crate::geometry::point;
use crate::section::Section;
use crate::truss::{Support, Truss};

/// Pinned support.
const FIXED: Option<Support> = Some(Support::Fixed);
/// Roller support.
const ROLLER: Option<Support> = Some(Support::Roller);

/// Joint table row: position and support.
type JointRow = (f64, f64, Option<Support>);

/// Member table row: indices into the joint table.
type MemberRow = (usize, usize);

/// King post joints.
const KING_POST_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (400.0, 350.0, None),
    (400.0, 200.0, None),
];
/// King post members.
const KING_POST_MEMBERS: &[MemberRow] = &[(0, 2), (2, 1), (0, 3), (3, 1), (2, 3)];

/// Queen post joints, shared with the Howe truss.
const QUEEN_POST_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (400.0, 350.0, None),
    (275.0, 200.0, None),
    (525.0, 200.0, None),
    (275.0, 275.0, None),
    (525.0, 275.0, None),
];
/// Queen post members.
const QUEEN_POST_MEMBERS: &[MemberRow] = &[
    (0, 5),
    (5, 2),
    (2, 6),
    (6, 1),
    (0, 3),
    (3, 4),
    (4, 1),
    (5, 3),
    (6, 4),
    (5, 6),
];
/// Howe members.
const HOWE_MEMBERS: &[MemberRow] = &[
    (0, 5),
    (5, 2),
    (2, 6),
    (6, 1),
    (0, 3),
    (3, 4),
    (4, 1),
    (5, 3),
    (6, 4),
    (3, 2),
    (2, 4),
];

/// Fink joints.
const FINK_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (275.0, 275.0, None),
    (400.0, 350.0, None),
    (525.0, 275.0, None),
    (275.0, 200.0, None),
    (525.0, 200.0, None),
];
/// Fink members.
const FINK_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (0, 5),
    (5, 6),
    (6, 1),
    (2, 5),
    (3, 5),
    (3, 6),
    (4, 6),
];

/// Simple beam joints.
const SIMPLE_BEAM_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (275.0, 200.0, None),
    (400.0, 200.0, None),
    (525.0, 200.0, None),
];
/// Simple beam members.
const SIMPLE_BEAM_MEMBERS: &[MemberRow] = &[(0, 2), (2, 3), (3, 4), (4, 1)];

/// Pratt joints, shared with the Warren truss.
const PRATT_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (275.0, 275.0, None),
    (400.0, 350.0, None),
    (525.0, 275.0, None),
    (275.0, 200.0, None),
    (400.0, 200.0, None),
    (525.0, 200.0, None),
];
/// Pratt members.
const PRATT_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 1),
    (2, 5),
    (3, 6),
    (4, 7),
    (5, 3),
    (6, 4),
];
/// Warren members.
const WARREN_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 1),
    (2, 5),
    (5, 3),
    (3, 7),
    (7, 4),
];

/// Scissor joints.
const SCISSOR_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (250.0, 300.0, None),
    (400.0, 400.0, None),
    (550.0, 300.0, None),
    (300.0, 250.0, None),
    (500.0, 250.0, None),
];
/// Scissor members.
const SCISSOR_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (0, 5),
    (5, 6),
    (6, 1),
    (2, 6),
    (4, 5),
];

/// Fan joints.
const FAN_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (275.0, 300.0, None),
    (400.0, 350.0, None),
    (525.0, 300.0, None),
    (275.0, 200.0, None),
    (400.0, 200.0, None),
    (525.0, 200.0, None),
];
/// Fan members.
const FAN_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (0, 3),
    (0, 5),
    (2, 3),
    (3, 4),
    (1, 4),
    (1, 3),
    (1, 7),
    (5, 6),
    (6, 7),
    (2, 5),
    (3, 6),
    (4, 7),
];

/// Bowstring joints.
const BOWSTRING_JOINTS: &[JointRow] = &[
    (150.0, 200.0, FIXED),
    (650.0, 200.0, ROLLER),
    (225.0, 280.0, None),
    (300.0, 340.0, None),
    (400.0, 375.0, None),
    (500.0, 340.0, None),
    (575.0, 280.0, None),
    (225.0, 200.0, None),
    (300.0, 200.0, None),
    (400.0, 200.0, None),
    (500.0, 200.0, None),
    (575.0, 200.0, None),
];
/// Bowstring members.
const BOWSTRING_MEMBERS: &[MemberRow] = &[
    (0, 2),
    (2, 3),
    (3, 4),
    (4, 5),
    (5, 6),
    (6, 1),
    (0, 7),
    (7, 8),
    (8, 9),
    (9, 10),
    (10, 11),
    (11, 1),
    (2, 7),
    (3, 8),
    (4, 9),
    (5, 10),
    (6, 11),
];

/// Cantilever joints.
const CANTILEVER_JOINTS: &[JointRow] = &[
    (50.0, 250.0, None),
    (150.0, 300.0, None),
    (300.0, 200.0, FIXED),
    (500.0, 200.0, ROLLER),
    (650.0, 300.0, None),
    (750.0, 250.0, None),
    (400.0, 350.0, None),
    (150.0, 200.0, None),
    (400.0, 200.0, None),
    (650.0, 200.0, None),
];
/// Cantilever members.
const CANTILEVER_MEMBERS: &[MemberRow] = &[
    (0, 1),
    (1, 6),
    (6, 4),
    (4, 5),
    (0, 7),
    (7, 2),
    (2, 8),
    (8, 3),
    (3, 9),
    (9, 5),
    (1, 7),
    (1, 2),
    (6, 8),
    (4, 3),
    (4, 9),
];

/// A predefined truss layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Triangle with a central vertical.
    KingPost,
    /// Triangle with two verticals and a collar tie.
    QueenPost,
    /// W-shaped web.
    Fink,
    /// Verticals with diagonals sloping towards the centre.
    Howe,
    /// Untriangulated horizontal chord.
    SimpleBeam,
    /// Verticals with diagonals sloping away from the centre.
    Pratt,
    /// Alternating diagonals without verticals.
    Warren,
    /// Raised bottom chord with crossed webs.
    Scissor,
    /// Webs radiating from the supports.
    Fan,
    /// Curved top chord with vertical hangers.
    Bowstring,
    /// Overhangs beyond both supports.
    Cantilever,
}

impl Preset {
    /// Every preset in menu order.
    pub const ALL: [Preset; 11] = [
        Preset::KingPost,
        Preset::QueenPost,
        Preset::Fink,
        Preset::Howe,
        Preset::SimpleBeam,
        Preset::Pratt,
        Preset::Warren,
        Preset::Scissor,
        Preset::Fan,
        Preset::Bowstring,
        Preset::Cantilever,
    ];

    /// Menu name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Preset::KingPost => "King Post",
            Preset::QueenPost => "Queen Post",
            Preset::Fink => "Fink (W-Truss)",
            Preset::Howe => "Howe Truss",
            Preset::SimpleBeam => "Simple Beam",
            Preset::Pratt => "Pratt Truss",
            Preset::Warren => "Warren Truss",
            Preset::Scissor => "Scissor Truss",
            Preset::Fan => "Fan Truss",
            Preset::Bowstring => "Bowstring Truss",
            Preset::Cantilever => "Cantilever Truss",
        }
    }

    /// One-line description for the menu.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Preset::KingPost => "Simple triangular truss with center vertical member",
            Preset::QueenPost => "Triangular truss with two vertical members",
            Preset::Fink => "W-shaped web configuration for longer spans",
            Preset::Howe => "Similar to King Post but with diagonal web members",
            Preset::SimpleBeam => "Horizontal beam with supports (for testing deflection)",
            Preset::Pratt => "Vertical members in compression, diagonals in tension",
            Preset::Warren => "Alternating diagonal members without verticals",
            Preset::Scissor => "Creates vaulted ceiling space with crossed members",
            Preset::Fan => "Radiating members from supports for uniform load distribution",
            Preset::Bowstring => "Curved top chord with vertical hangers",
            Preset::Cantilever => "Extends beyond support for overhanging structures",
        }
    }

    /// Look up a preset by menu name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name.trim())
    }

    /// Joint and member tables.
    fn tables(&self) -> (&'static [JointRow], &'static [MemberRow]) {
        match self {
            Preset::KingPost => (KING_POST_JOINTS, KING_POST_MEMBERS),
            Preset::QueenPost => (QUEEN_POST_JOINTS, QUEEN_POST_MEMBERS),
            Preset::Fink => (FINK_JOINTS, FINK_MEMBERS),
            Preset::Howe => (QUEEN_POST_JOINTS, HOWE_MEMBERS),
            Preset::SimpleBeam => (SIMPLE_BEAM_JOINTS, SIMPLE_BEAM_MEMBERS),
            Preset::Pratt => (PRATT_JOINTS, PRATT_MEMBERS),
            Preset::Warren => (PRATT_JOINTS, WARREN_MEMBERS),
            Preset::Scissor => (SCISSOR_JOINTS, SCISSOR_MEMBERS),
            Preset::Fan => (FAN_JOINTS, FAN_MEMBERS),
            Preset::Bowstring => (BOWSTRING_JOINTS, BOWSTRING_MEMBERS),
            Preset::Cantilever => (CANTILEVER_JOINTS, CANTILEVER_MEMBERS),
        }
    }

    /// Build the preset as a fresh truss.
    ///
    /// # Errors
    ///
    /// Propagates [`TrussEditError`] from the truss editor; the built-in tables
    /// never trigger one.
    ///
    /// # Examples
    /// ```
    /// use trusscheck::Preset;
    ///
    /// let truss = Preset::KingPost.build()?;
    /// assert_eq!(truss.joint_count(), 4);
    /// assert_eq!(truss.member_count(), 5);
    /// # Ok::<(), trusscheck::TrussEditError>(())
    /// ```
    pub fn build(&self) -> Result<Truss, TrussEditError> {
        let (joints, members) = self.tables();
        let mut truss = Truss::new();
        let mut ids = Vec::with_capacity(joints.len());
        for (index, &(x, y, support)) in joints.iter().enumerate() {
            let joint = truss.add_joint(point(x, y))?;
            truss.set_support(joint, support)?;
            truss.set_label(joint, joint_label(index))?;
            ids.push(joint);
        }
        for &(start, end) in members {
            truss.add_member_with_section(ids[start], ids[end], Section::default())?;
        }
        Ok(truss)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `A`, `B`, ... `Z`, then `AA`, `AB`, ...
fn joint_label(index: usize) -> String {
    let letter = |i: usize| char::from(b'A' + (i % 26) as u8);
    if index < 26 {
        letter(index).to_string()
    } else {
        format!("{}{}", letter(index / 26 - 1), letter(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds() {
        for preset in Preset::ALL {
            let truss = preset.build().expect("preset tables are valid");
            assert_eq!(truss.support_joints().len(), 2, "{preset}");
            assert!(truss.member_count() >= truss.joint_count() - 1, "{preset}");
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
    }

    #[test]
    fn king_post_is_labelled_in_table_order() {
        let truss = Preset::KingPost.build().expect("preset tables are valid");
        let labels: Vec<String> = truss.joints().map(|joint| truss.joint_name(joint)).collect();
        assert_eq!(labels, ["A", "B", "C", "D"]);
        let members: Vec<String> = truss
            .members()
            .filter_map(|member| truss.member_label(member))
            .collect();
        assert_eq!(members, ["A-C", "C-B", "A-D", "D-B", "C-D"]);
        assert_eq!(truss.span(), 500.0);
    }

    #[test]
    fn labels_continue_past_z() {
        assert_eq!(joint_label(0), "A");
        assert_eq!(joint_label(25), "Z");
        assert_eq!(joint_label(26), "AA");
        assert_eq!(joint_label(27), "AB");
    }
}
