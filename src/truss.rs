//! Geometry model: joints, supports and members of a planar truss.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::errors::TrussEditError;
use crate::geometry::Point;
use crate::section::Section;

/// Identity of a joint. Indices stay valid when other joints are removed.
pub type JointId = NodeIndex;

/// Identity of a member. Indices stay valid when other members are removed.
pub type MemberId = EdgeIndex;

/// Two joints closer than this on both axes are considered the same joint.
const COINCIDENT_TOLERANCE: f64 = 1.0;

/// Restraint applied at a joint.
///
/// Both kinds are resolved as a vertical reaction by the load distributor; the
/// distinction is kept for display and for round-tripping design documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// Pinned support restraining both directions.
    Fixed,
    /// Roller support.
    Roller,
}

/// Internal representation of a truss joint.
#[derive(Clone, Debug)]
struct Joint {
    /// Position in drawing units.
    position: Point,
    /// Restraint, if any.
    support: Option<Support>,
    /// Optional display label such as `"A"`.
    label: Option<String>,
}

impl Joint {
    /// Create an unsupported, unlabelled joint.
    fn new(position: Point) -> Self {
        Self {
            position,
            support: None,
            label: None,
        }
    }
}

/// Internal representation of a truss member.
#[derive(Clone, Debug)]
struct Member {
    /// Cross-section properties.
    section: Section,
}

/// Container for a pin-jointed planar truss.
#[derive(Clone, Debug, Default)]
pub struct Truss {
    /// Underlying graph storage for joints and members.
    graph: StableUnGraph<Joint, Member>,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use trusscheck::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::default(),
        }
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Remove every joint and member.
    pub fn clear(&mut self) {
        self.graph.clear();
    }

    /// Add a new joint to the truss.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateJoint`] when another joint already sits
    /// within one drawing unit of `position`.
    ///
    /// # Examples
    /// ```
    /// use trusscheck::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let joint = truss.add_joint(point(0.0, 0.0)).expect("first joint");
    /// assert_eq!(truss.joint_count(), 1);
    /// assert_eq!(joint.index(), 0);
    /// ```
    pub fn add_joint(&mut self, position: Point) -> Result<JointId, TrussEditError> {
        if let Some(existing) = self.joint_at(position, None) {
            return Err(TrussEditError::DuplicateJoint { existing });
        }
        Ok(self.graph.add_node(Joint::new(position)))
    }

    /// Add a joint carrying a support.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::DuplicateJoint`] as for [`Truss::add_joint`].
    pub fn add_supported_joint(
        &mut self,
        position: Point,
        support: Support,
    ) -> Result<JointId, TrussEditError> {
        let joint = self.add_joint(position)?;
        self.graph[joint].support = Some(support);
        Ok(joint)
    }

    /// Update the position of an existing joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss
    /// and [`TrussEditError::DuplicateJoint`] when the target position is occupied.
    pub fn move_joint(&mut self, joint: JointId, position: Point) -> Result<(), TrussEditError> {
        if !self.graph.contains_node(joint) {
            return Err(TrussEditError::UnknownJoint(joint));
        }
        if let Some(existing) = self.joint_at(position, Some(joint)) {
            return Err(TrussEditError::DuplicateJoint { existing });
        }
        self.graph[joint].position = position;
        Ok(())
    }

    /// Remove a joint and all connected members from the truss.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn remove_joint(&mut self, joint: JointId) -> Result<(), TrussEditError> {
        self.graph
            .remove_node(joint)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    /// Set or clear the support at a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(
        &mut self,
        joint: JointId,
        support: Option<Support>,
    ) -> Result<(), TrussEditError> {
        let node = self
            .graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))?;
        node.support = support;
        Ok(())
    }

    /// Advance the support at a joint through none → fixed → roller → none.
    ///
    /// Returns the new support state.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn cycle_support(&mut self, joint: JointId) -> Result<Option<Support>, TrussEditError> {
        let node = self
            .graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))?;
        node.support = match node.support {
            None => Some(Support::Fixed),
            Some(Support::Fixed) => Some(Support::Roller),
            Some(Support::Roller) => None,
        };
        Ok(node.support)
    }

    /// Attach a display label to a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_label(
        &mut self,
        joint: JointId,
        label: impl Into<String>,
    ) -> Result<(), TrussEditError> {
        let node = self
            .graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))?;
        node.label = Some(label.into());
        Ok(())
    }

    /// Connect two joints with a new member using the default 2x4 section.
    ///
    /// # Errors
    ///
    /// See [`Truss::add_member_with_section`].
    pub fn add_member(&mut self, start: JointId, end: JointId) -> Result<MemberId, TrussEditError> {
        self.add_member_with_section(start, end, Section::default())
    }

    /// Connect two joints with a new member of the given section.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] for a missing endpoint,
    /// [`TrussEditError::SelfConnection`] when `start == end`,
    /// [`TrussEditError::DuplicateMember`] when the pair is already connected and
    /// [`TrussEditError::InvalidMemberProperties`] for a non-positive section.
    pub fn add_member_with_section(
        &mut self,
        start: JointId,
        end: JointId,
        section: Section,
    ) -> Result<MemberId, TrussEditError> {
        for joint in [start, end] {
            if !self.graph.contains_node(joint) {
                return Err(TrussEditError::UnknownJoint(joint));
            }
        }
        if start == end {
            return Err(TrussEditError::SelfConnection(start));
        }
        if self.graph.find_edge(start, end).is_some() {
            return Err(TrussEditError::DuplicateMember { start, end });
        }
        section.validate()?;
        Ok(self.graph.add_edge(start, end, Member { section }))
    }

    /// Remove a member from the truss.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss.
    pub fn remove_member(&mut self, member: MemberId) -> Result<(), TrussEditError> {
        self.graph
            .remove_edge(member)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownMember(member))
    }

    /// Replace the cross-section of a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss
    /// and [`TrussEditError::InvalidMemberProperties`] for a non-positive section.
    pub fn set_member_section(
        &mut self,
        member: MemberId,
        section: Section,
    ) -> Result<(), TrussEditError> {
        if self.graph.edge_weight(member).is_none() {
            return Err(TrussEditError::UnknownMember(member));
        }
        section.validate()?;
        if let Some(edge) = self.graph.edge_weight_mut(member) {
            edge.section = section;
        }
        Ok(())
    }

    /// Assign the same cross-section to every member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::InvalidMemberProperties`] for a non-positive section;
    /// no member is changed in that case.
    pub fn set_section_for_all(&mut self, section: Section) -> Result<(), TrussEditError> {
        section.validate()?;
        let members: Vec<MemberId> = self.graph.edge_indices().collect();
        for member in members {
            self.graph[member].section = section;
        }
        Ok(())
    }

    /// Joint identities in ascending order.
    pub fn joints(&self) -> impl Iterator<Item = JointId> + '_ {
        self.graph.node_indices()
    }

    /// Member identities in ascending order.
    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.graph.edge_indices()
    }

    /// Position of a joint in drawing units.
    #[must_use]
    pub fn position(&self, joint: JointId) -> Option<Point> {
        self.graph.node_weight(joint).map(|joint| joint.position)
    }

    /// Support at a joint; `None` for unsupported or unknown joints.
    #[must_use]
    pub fn support(&self, joint: JointId) -> Option<Support> {
        self.graph.node_weight(joint).and_then(|joint| joint.support)
    }

    /// Whether the joint carries a support.
    #[must_use]
    pub fn is_supported(&self, joint: JointId) -> bool {
        self.support(joint).is_some()
    }

    /// Display label of a joint, if one was assigned.
    #[must_use]
    pub fn label(&self, joint: JointId) -> Option<&str> {
        self.graph
            .node_weight(joint)
            .and_then(|joint| joint.label.as_deref())
    }

    /// Label of a joint, falling back to `#<index>`.
    #[must_use]
    pub fn joint_name(&self, joint: JointId) -> String {
        self.label(joint)
            .map_or_else(|| format!("#{}", joint.index()), str::to_string)
    }

    /// Start and end joints of a member.
    #[must_use]
    pub fn member_endpoints(&self, member: MemberId) -> Option<(JointId, JointId)> {
        self.graph.edge_endpoints(member)
    }

    /// Cross-section of a member.
    #[must_use]
    pub fn member_section(&self, member: MemberId) -> Option<Section> {
        self.graph.edge_weight(member).map(|member| member.section)
    }

    /// Length of a member in drawing units.
    #[must_use]
    pub fn member_length(&self, member: MemberId) -> Option<f64> {
        let (start, end) = self.graph.edge_endpoints(member)?;
        Some(self.graph[start].position.distance_to(self.graph[end].position))
    }

    /// `"A-C"` style name built from the endpoint names.
    #[must_use]
    pub fn member_label(&self, member: MemberId) -> Option<String> {
        let (start, end) = self.graph.edge_endpoints(member)?;
        Some(format!("{}-{}", self.joint_name(start), self.joint_name(end)))
    }

    /// Supported joints in ascending order.
    #[must_use]
    pub fn support_joints(&self) -> Vec<JointId> {
        self.joints()
            .filter(|&joint| self.is_supported(joint))
            .collect()
    }

    /// Members meeting at `joint`, paired with the joint at their far end,
    /// in ascending member order.
    #[must_use]
    pub fn incident_members(&self, joint: JointId) -> Vec<(MemberId, JointId)> {
        let mut incident: Vec<(MemberId, JointId)> = self
            .graph
            .edges(joint)
            .map(|edge| {
                let far = if edge.source() == joint {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), far)
            })
            .collect();
        incident.sort_by_key(|(member, _)| *member);
        incident
    }

    /// Horizontal extent of all joints in drawing units; zero for an empty truss.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.extent(|point| point.x)
    }

    /// Vertical extent of all joints in drawing units; zero for an empty truss.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.extent(|point| point.y)
    }

    /// Difference between the largest and smallest coordinate picked by `axis`.
    fn extent(&self, axis: impl Fn(Point) -> f64) -> f64 {
        let mut values = self
            .graph
            .node_indices()
            .map(|joint| axis(self.graph[joint].position));
        let Some(first) = values.next() else {
            return 0.0;
        };
        let (min, max) = values.fold((first, first), |(min, max), value| {
            (min.min(value), max.max(value))
        });
        max - min
    }

    /// Find a joint coincident with `position`, ignoring `skip`.
    fn joint_at(&self, position: Point, skip: Option<JointId>) -> Option<JointId> {
        self.graph.node_indices().find(|&joint| {
            let other = self.graph[joint].position;
            Some(joint) != skip
                && (other.x - position.x).abs() < COINCIDENT_TOLERANCE
                && (other.y - position.y).abs() < COINCIDENT_TOLERANCE
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::MemberPropertyError;
    use crate::geometry::point;

    #[test]
    fn joint_mutators_return_error_for_unknown_indices() {
        let mut truss = Truss::new();
        let stale_joint = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        truss
            .remove_joint(stale_joint)
            .expect("initial joint removal succeeds");

        let move_error = truss
            .move_joint(stale_joint, point(2.0, 0.0))
            .expect_err("unknown joint rejected");
        assert_eq!(move_error, TrussEditError::UnknownJoint(stale_joint));

        let support_error = truss
            .set_support(stale_joint, Some(Support::Fixed))
            .expect_err("unknown joint rejected");
        assert_eq!(support_error, TrussEditError::UnknownJoint(stale_joint));

        let label_error = truss
            .set_label(stale_joint, "A")
            .expect_err("unknown joint rejected");
        assert_eq!(label_error, TrussEditError::UnknownJoint(stale_joint));

        let remove_error = truss
            .remove_joint(stale_joint)
            .expect_err("stale joint rejected");
        assert_eq!(remove_error, TrussEditError::UnknownJoint(stale_joint));
    }

    #[test]
    fn member_mutators_return_error_for_unknown_indices() {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        let b = truss.add_joint(point(100.0, 0.0)).expect("joint added");
        let stale_member = truss.add_member(a, b).expect("member added");
        truss
            .remove_member(stale_member)
            .expect("initial member removal succeeds");

        let section_error = truss
            .set_member_section(stale_member, Section::default())
            .expect_err("unknown member rejected");
        assert_eq!(section_error, TrussEditError::UnknownMember(stale_member));

        let remove_error = truss
            .remove_member(stale_member)
            .expect_err("unknown member rejected");
        assert_eq!(remove_error, TrussEditError::UnknownMember(stale_member));
    }

    #[test]
    fn topology_rules_are_enforced() {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        let b = truss.add_joint(point(100.0, 0.0)).expect("joint added");

        let duplicate_joint = truss
            .add_joint(point(0.5, -0.5))
            .expect_err("coincident joint rejected");
        assert_eq!(duplicate_joint, TrussEditError::DuplicateJoint { existing: a });

        assert_eq!(
            truss.add_member(a, a).expect_err("self connection"),
            TrussEditError::SelfConnection(a)
        );
        truss.add_member(a, b).expect("first member");
        assert_eq!(
            truss.add_member(b, a).expect_err("reversed duplicate"),
            TrussEditError::DuplicateMember { start: b, end: a }
        );
        assert_eq!(
            truss.move_joint(b, point(0.0, 0.2)).expect_err("move onto a"),
            TrussEditError::DuplicateJoint { existing: a }
        );
        truss
            .move_joint(b, point(100.4, 0.0))
            .expect("a joint may move within its own footprint");
    }

    #[test]
    fn invalid_member_sections_are_rejected() {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        let b = truss.add_joint(point(100.0, 0.0)).expect("joint added");
        let member = truss.add_member(a, b).expect("member added");

        let area_error = truss
            .set_member_section(
                member,
                Section {
                    area: 0.0,
                    moment_of_inertia: 5.36,
                },
            )
            .expect_err("zero area rejected");
        assert!(matches!(
            area_error,
            TrussEditError::InvalidMemberProperties(MemberPropertyError::NonPositiveArea { .. })
        ));

        let bulk_error = truss
            .set_section_for_all(Section {
                area: 5.25,
                moment_of_inertia: -1.0,
            })
            .expect_err("negative inertia rejected");
        assert!(matches!(
            bulk_error,
            TrussEditError::InvalidMemberProperties(
                MemberPropertyError::NonPositiveInertia { .. }
            )
        ));
        assert_eq!(truss.member_section(member), Some(Section::default()));
    }

    #[test]
    fn removing_a_joint_drops_its_members() {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        let b = truss.add_joint(point(100.0, 0.0)).expect("joint added");
        let c = truss.add_joint(point(50.0, 50.0)).expect("joint added");
        truss.add_member(a, b).expect("member added");
        let bc = truss.add_member(b, c).expect("member added");
        truss.add_member(c, a).expect("member added");

        truss.remove_joint(a).expect("joint removed");
        assert_eq!(truss.joint_count(), 2);
        assert_eq!(truss.member_count(), 1);
        assert_eq!(truss.member_endpoints(bc), Some((b, c)));
    }

    #[test]
    fn support_cycles_through_states() {
        let mut truss = Truss::new();
        let a = truss.add_joint(point(0.0, 0.0)).expect("joint added");
        assert_eq!(truss.cycle_support(a), Ok(Some(Support::Fixed)));
        assert_eq!(truss.cycle_support(a), Ok(Some(Support::Roller)));
        assert!(truss.is_supported(a));
        assert_eq!(truss.cycle_support(a), Ok(None));
        assert!(truss.support_joints().is_empty());
    }

    #[test]
    fn queries_report_geometry() {
        let mut truss = Truss::new();
        let a = truss
            .add_supported_joint(point(150.0, 200.0), Support::Fixed)
            .expect("joint added");
        let b = truss.add_joint(point(400.0, 350.0)).expect("joint added");
        truss.set_label(a, "A").expect("label set");
        let member = truss.add_member(a, b).expect("member added");

        assert_relative_eq!(truss.span(), 250.0);
        assert_relative_eq!(truss.height(), 150.0);
        assert_relative_eq!(
            truss.member_length(member).expect("member exists"),
            (250.0_f64.powi(2) + 150.0_f64.powi(2)).sqrt()
        );
        assert_eq!(truss.member_label(member).as_deref(), Some("A-#1"));
        assert_eq!(truss.incident_members(b), vec![(member, a)]);
        assert_eq!(truss.support_joints(), vec![a]);
        assert_relative_eq!(Truss::new().span(), 0.0);
    }
}
