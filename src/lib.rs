#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod config;
pub mod deflection;
pub mod design;
pub mod errors;
pub mod geometry;
pub mod loads;
pub mod material;
pub mod presets;
pub mod report;
pub mod section;
pub mod solver;
pub mod stress;
pub mod truss;

pub use analysis::{analyze, run_analysis, Analysis, AnalysisReport, AnalysisStatus};
pub use config::{AnalysisConfig, DeflectionLimits, DeflectionSettings, Scale, SolverSettings};
pub use deflection::{check_limits, estimate, DeflectionCheck, DeflectionEstimate};
pub use design::{DesignDocument, DesignModel};
pub use errors::{
    AnalysisError, ConfigError, DesignError, LoadError, MaterialError, MemberPropertyError,
    TrussEditError,
};
pub use geometry::{displacement, force, point, Displacement, Force, Point};
pub use loads::{distribute, LoadCase, NodalLoads, Reactions};
pub use material::{Material, WoodSpecies};
pub use presets::Preset;
pub use report::render_summary;
pub use section::{LumberCategory, LumberSize, Section};
pub use solver::{joint_residual, solve_member_forces, JointSolution};
pub use stress::{evaluate, AxialSense, MemberStress, StressCheck};
pub use truss::{JointId, MemberId, Support, Truss};
