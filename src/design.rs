//! Versioned JSON design documents.
//!
//! A document stores the structure with string identifiers alongside the load
//! case and material. Reading and writing files is left to the caller; this
//! module only converts between JSON text, [`DesignDocument`] and a [`Truss`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DesignError, TrussEditError};
use crate::geometry::point;
use crate::loads::LoadCase;
use crate::material::Material;
use crate::section::Section;
use crate::truss::{JointId, Support, Truss};

/// Format version written by [`DesignDocument::from_model`].
pub const FILE_VERSION: &str = "1.0.0";

/// Top-level design document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Format version; required when reading.
    #[serde(default)]
    pub version: Option<String>,
    /// Descriptive information.
    #[serde(default)]
    pub metadata: Metadata,
    /// Joints and members.
    pub structure: Structure,
    /// Load case and material.
    #[serde(default)]
    pub parameters: Parameters,
}

/// Descriptive information about a design.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// ISO-8601 creation time, when the writer recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Design name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Program that wrote the document.
    #[serde(default)]
    pub software: String,
}

/// Joints and members of a design.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Joint records.
    pub nodes: Vec<NodeRecord>,
    /// Member records.
    pub members: Vec<MemberRecord>,
}

/// Stored joint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Identifier referenced by members.
    pub id: String,
    /// Horizontal position in drawing units.
    pub x: f64,
    /// Vertical position in drawing units.
    pub y: f64,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Support, `null` when free.
    #[serde(default)]
    pub support: Option<Support>,
}

/// Stored member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    /// Identifier.
    pub id: String,
    /// Identifier of the start node.
    pub start: String,
    /// Identifier of the end node.
    pub end: String,
    /// Area in square inches; the 2x4 value when absent.
    #[serde(default)]
    pub area: Option<f64>,
    /// Moment of inertia in inches to the fourth; the 2x4 value when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moment_of_inertia: Option<f64>,
}

impl MemberRecord {
    /// Section described by the record, filling gaps with the 2x4 defaults.
    #[must_use]
    pub fn section(&self) -> Section {
        let default = Section::default();
        Section {
            area: self.area.unwrap_or(default.area),
            moment_of_inertia: self.moment_of_inertia.unwrap_or(default.moment_of_inertia),
        }
    }
}

/// Analysis inputs stored with a design.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Surface loads; the editor defaults when absent.
    #[serde(default)]
    pub loads: LoadCase,
    /// Material; `None` leaves the caller's current material in place.
    #[serde(default)]
    pub material: Option<Material>,
}

/// A design document converted into analysis inputs.
#[derive(Clone, Debug)]
pub struct DesignModel {
    /// The assembled truss.
    pub truss: Truss,
    /// Document node identifiers mapped to truss joints.
    pub node_ids: BTreeMap<String, JointId>,
    /// Surface loads.
    pub loads: LoadCase,
    /// Stored material, if any.
    pub material: Option<Material>,
}

impl DesignDocument {
    /// Parse and validate a design document.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Json`] for malformed JSON or a missing structure and
    /// [`DesignError::MissingVersion`] when the version tag is absent.
    ///
    /// # Examples
    /// ```
    /// use trusscheck::DesignDocument;
    ///
    /// let text = r#"{
    ///     "version": "1.0.0",
    ///     "structure": {
    ///         "nodes": [
    ///             { "id": "a", "x": 0, "y": 0, "support": "fixed" },
    ///             { "id": "b", "x": 100, "y": 0, "support": "roller" },
    ///             { "id": "c", "x": 50, "y": 50 }
    ///         ],
    ///         "members": [
    ///             { "id": "ab", "start": "a", "end": "b", "area": 5.25 },
    ///             { "id": "bc", "start": "b", "end": "c", "area": 5.25 },
    ///             { "id": "ca", "start": "c", "end": "a", "area": 5.25 }
    ///         ]
    ///     }
    /// }"#;
    /// let model = DesignDocument::from_json(text)?.into_model()?;
    /// assert_eq!(model.truss.member_count(), 3);
    /// assert_eq!(model.loads.live, 40.0);
    /// # Ok::<(), trusscheck::DesignError>(())
    /// ```
    pub fn from_json(text: &str) -> Result<Self, DesignError> {
        let document: Self = serde_json::from_str(text)?;
        if document.version.as_deref().map_or(true, str::is_empty) {
            return Err(DesignError::MissingVersion);
        }
        Ok(document)
    }

    /// Serialise the document as indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, DesignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Assemble the truss described by the document.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::DuplicateNodeId`] for repeated node identifiers,
    /// [`DesignError::UnknownNode`] when a member references a missing node and
    /// [`DesignError::InvalidNode`] or [`DesignError::InvalidMember`] when the
    /// editor rejects a record.
    pub fn into_model(self) -> Result<DesignModel, DesignError> {
        let mut truss = Truss::new();
        let mut node_ids = BTreeMap::new();

        for node in &self.structure.nodes {
            if node_ids.contains_key(&node.id) {
                return Err(DesignError::DuplicateNodeId(node.id.clone()));
            }
            let invalid = |source: TrussEditError| DesignError::InvalidNode {
                node: node.id.clone(),
                source,
            };
            let joint = truss.add_joint(point(node.x, node.y)).map_err(invalid)?;
            truss.set_support(joint, node.support).map_err(invalid)?;
            if let Some(label) = &node.label {
                truss.set_label(joint, label.clone()).map_err(invalid)?;
            }
            node_ids.insert(node.id.clone(), joint);
        }

        for member in &self.structure.members {
            let lookup = |id: &String| {
                node_ids.get(id).copied().ok_or_else(|| DesignError::UnknownNode {
                    member: member.id.clone(),
                    node: id.clone(),
                })
            };
            let start = lookup(&member.start)?;
            let end = lookup(&member.end)?;
            truss
                .add_member_with_section(start, end, member.section())
                .map_err(|source| DesignError::InvalidMember {
                    member: member.id.clone(),
                    source,
                })?;
        }
        debug!(
            joints = truss.joint_count(),
            members = truss.member_count(),
            "imported design"
        );

        Ok(DesignModel {
            truss,
            node_ids,
            loads: self.parameters.loads,
            material: self.parameters.material,
        })
    }

    /// Describe a truss and its analysis inputs as a document.
    ///
    /// Nodes are identified as `n<index>` and members as `m<index>`.
    #[must_use]
    pub fn from_model(truss: &Truss, loads: &LoadCase, material: &Material, name: &str) -> Self {
        let node_id = |joint: JointId| format!("n{}", joint.index());
        let nodes = truss
            .joints()
            .filter_map(|joint| {
                let position = truss.position(joint)?;
                Some(NodeRecord {
                    id: node_id(joint),
                    x: position.x,
                    y: position.y,
                    label: truss.label(joint).map(str::to_string),
                    support: truss.support(joint),
                })
            })
            .collect();
        let members = truss
            .members()
            .filter_map(|member| {
                let (start, end) = truss.member_endpoints(member)?;
                let section = truss.member_section(member)?;
                Some(MemberRecord {
                    id: format!("m{}", member.index()),
                    start: node_id(start),
                    end: node_id(end),
                    area: Some(section.area),
                    moment_of_inertia: Some(section.moment_of_inertia),
                })
            })
            .collect();

        Self {
            version: Some(FILE_VERSION.to_string()),
            metadata: Metadata {
                created_at: None,
                name: name.to_string(),
                description: String::new(),
                software: env!("CARGO_PKG_NAME").to_string(),
            },
            structure: Structure { nodes, members },
            parameters: Parameters {
                loads: *loads,
                material: Some(material.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::Preset;

    #[test]
    fn missing_version_is_rejected() {
        let error = DesignDocument::from_json(r#"{ "structure": { "nodes": [], "members": [] } }"#)
            .expect_err("version required");
        assert!(matches!(error, DesignError::MissingVersion));
        assert_eq!(error.to_string(), "Invalid file format: missing version");
    }

    #[test]
    fn missing_structure_is_a_parse_error() {
        let error = DesignDocument::from_json(r#"{ "version": "1.0.0" }"#)
            .expect_err("structure required");
        assert!(matches!(error, DesignError::Json(_)));
        assert!(error.to_string().starts_with("Failed to import design"));
    }

    #[test]
    fn unknown_node_references_are_rejected() {
        let text = r#"{
            "version": "1.0.0",
            "structure": {
                "nodes": [{ "id": "a", "x": 0, "y": 0 }],
                "members": [{ "id": "m", "start": "a", "end": "ghost" }]
            }
        }"#;
        let error = DesignDocument::from_json(text)
            .expect("document parses")
            .into_model()
            .expect_err("dangling member");
        match error {
            DesignError::UnknownNode { member, node } => {
                assert_eq!(member, "m");
                assert_eq!(node, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let text = r#"{
            "version": "1.0.0",
            "structure": {
                "nodes": [{ "id": "a", "x": 0, "y": 0 }, { "id": "a", "x": 10, "y": 0 }],
                "members": []
            }
        }"#;
        let error = DesignDocument::from_json(text)
            .expect("document parses")
            .into_model()
            .expect_err("duplicate id");
        assert!(matches!(error, DesignError::DuplicateNodeId(id) if id == "a"));
    }

    #[test]
    fn member_sections_default_to_two_by_four() {
        let record = MemberRecord {
            id: "m".to_string(),
            start: "a".to_string(),
            end: "b".to_string(),
            area: Some(8.25),
            moment_of_inertia: None,
        };
        let section = record.section();
        assert_eq!(section.area, 8.25);
        assert_eq!(section.moment_of_inertia, Section::default().moment_of_inertia);
    }

    #[test]
    fn model_survives_a_trip_through_json() {
        let truss = Preset::Fink.build().expect("preset tables are valid");
        let loads = LoadCase::new(10.0, 20.0, 30.0);
        let text = DesignDocument::from_model(&truss, &loads, &Material::default(), "Fink")
            .to_json()
            .expect("serialisable");
        let model = DesignDocument::from_json(&text)
            .expect("document parses")
            .into_model()
            .expect("document is consistent");

        assert_eq!(model.truss.joint_count(), truss.joint_count());
        assert_eq!(model.truss.member_count(), truss.member_count());
        assert_eq!(model.truss.support_joints().len(), 2);
        assert_eq!(model.loads, loads);
        assert_eq!(model.material, Some(Material::default()));
        let joint = model.node_ids["n3"];
        assert_eq!(model.truss.label(joint), Some("D"));
    }
}
