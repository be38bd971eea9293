//! Error types produced while editing, importing or analysing trusses.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when a truss analysis cannot be completed.
///
/// Structural failure (overstress, excessive deflection) is not an error; it is
/// reported through [`AnalysisStatus::Failed`](crate::AnalysisStatus::Failed).
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Returned when fewer than two joints carry a support.
    #[error("Truss must have at least 2 supports for stability (found {found})")]
    InsufficientSupports {
        /// Number of supported joints in the truss.
        found: usize,
    },
    /// Returned when every joint is a support, leaving nowhere to apply the roof load.
    #[error("No non-support nodes found to apply loads")]
    NoLoadableNodes,
    /// Returned when a member spans zero distance.
    #[error("member {0:?} has zero length")]
    ZeroLengthMember(EdgeIndex),
    /// Returned when the material properties are not physically meaningful.
    #[error("invalid material: {0}")]
    InvalidMaterial(#[from] MaterialError),
    /// Returned when a load component is negative or not a number.
    #[error("invalid load: {0}")]
    InvalidLoad(#[from] LoadError),
    /// Returned when the span is zero, negative or not finite.
    #[error("span must be a positive length (received {0})")]
    InvalidSpan(f64),
    /// Returned when the analysis configuration fails validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Error returned when a [`LoadCase`](crate::LoadCase) fails validation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
    /// Returned when a component is negative, infinite or NaN.
    #[error("{component} load must be a finite, non-negative number (received {value})")]
    OutOfRange {
        /// Name of the offending component (`dead`, `live` or `snow`).
        component: &'static str,
        /// Rejected value in psf.
        value: f64,
    },
}

/// Error returned when updating the cross-section of a truss member.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MemberPropertyError {
    /// Returned when the cross-sectional area is zero or negative.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area in square inches.
        area: f64,
    },
    /// Returned when the moment of inertia is zero or negative.
    #[error("moment of inertia must be positive (received {moment_of_inertia})")]
    NonPositiveInertia {
        /// Rejected moment of inertia in inches to the fourth.
        moment_of_inertia: f64,
    },
}

/// Error returned when a [`Material`](crate::Material) fails validation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MaterialError {
    /// Returned when a strength or stiffness property is zero, negative or not finite.
    #[error("{property} must be a positive number (received {value})")]
    NonPositiveProperty {
        /// Name of the offending property (`E`, `Fb` or `Fc`).
        property: &'static str,
        /// Rejected value in psi.
        value: f64,
    },
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid indices or topology.
///
/// # Examples
///
/// ```
/// use trusscheck::{point, Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let a = truss.add_joint(point(0.0, 0.0)).expect("empty truss accepts a joint");
/// let b = truss.add_joint(point(100.0, 0.0)).expect("distinct position");
/// truss.add_member(a, b).expect("first member");
/// let error = truss.add_member(b, a).expect_err("duplicate rejected");
/// assert_eq!(error, TrussEditError::DuplicateMember { start: b, end: a });
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a member cannot be found in the truss.
    #[error("member {0:?} does not exist in this truss")]
    UnknownMember(EdgeIndex),
    /// Returned when a joint would be placed on top of an existing joint.
    #[error("joint {existing:?} already occupies this position")]
    DuplicateJoint {
        /// Joint found at the requested position.
        existing: NodeIndex,
    },
    /// Returned when a member would connect a joint to itself.
    #[error("member cannot start and end at joint {0:?}")]
    SelfConnection(NodeIndex),
    /// Returned when a member already connects the same pair of joints.
    #[error("a member already connects joints {start:?} and {end:?}")]
    DuplicateMember {
        /// Requested start joint.
        start: NodeIndex,
        /// Requested end joint.
        end: NodeIndex,
    },
    /// Returned when the supplied member section is invalid.
    #[error("{0}")]
    InvalidMemberProperties(#[from] MemberPropertyError),
}

/// Error returned when a design document cannot be turned into a truss model.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The text is not valid JSON for the document schema.
    #[error("Failed to import design: {0}")]
    Json(#[from] serde_json::Error),
    /// The document has no version tag.
    #[error("Invalid file format: missing version")]
    MissingVersion,
    /// Two nodes share the same identifier.
    #[error("node id '{0}' appears more than once")]
    DuplicateNodeId(String),
    /// A member references a node identifier that is not in the document.
    #[error("member '{member}' references non-existent node '{node}'")]
    UnknownNode {
        /// Identifier of the offending member.
        member: String,
        /// Identifier that could not be resolved.
        node: String,
    },
    /// The geometry could not be assembled.
    #[error("member '{member}' is invalid: {source}")]
    InvalidMember {
        /// Identifier of the offending member.
        member: String,
        /// Reason the member was rejected.
        #[source]
        source: TrussEditError,
    },
    /// The node could not be placed.
    #[error("node '{node}' is invalid: {source}")]
    InvalidNode {
        /// Identifier of the offending node.
        node: String,
        /// Reason the node was rejected.
        #[source]
        source: TrussEditError,
    },
}

/// Error returned when an [`AnalysisConfig`](crate::AnalysisConfig) cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON.
    #[error("failed to parse analysis configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// A numeric setting is outside its meaningful range.
    #[error("configuration value '{name}' must be positive (received {value})")]
    NonPositive {
        /// Name of the setting.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}
