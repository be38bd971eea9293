//! Member cross-sections and the sawn-lumber size catalogue.
//!
//! Nominal sizes map to dressed (actual) dimensions. Section properties are
//! computed from the dressed rectangle rather than tabulated.

use serde::{Deserialize, Serialize};

use crate::errors::MemberPropertyError;

/// Axial and flexural properties of a member cross-section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in square inches.
    pub area: f64,
    /// Second moment of area in inches to the fourth.
    pub moment_of_inertia: f64,
}

impl Section {
    /// Create a section, rejecting non-positive properties.
    ///
    /// # Errors
    ///
    /// Returns [`MemberPropertyError`] when either property is zero, negative or not finite.
    pub fn new(area: f64, moment_of_inertia: f64) -> Result<Self, MemberPropertyError> {
        let section = Self {
            area,
            moment_of_inertia,
        };
        section.validate()?;
        Ok(section)
    }

    /// Solid rectangle of width `b` and depth `h` in inches.
    #[must_use]
    pub fn rectangular(width: f64, depth: f64) -> Self {
        Self {
            area: width * depth,
            moment_of_inertia: width * depth.powi(3) / 12.0,
        }
    }

    /// Radius of gyration `sqrt(I / A)` in inches.
    #[must_use]
    pub fn radius_of_gyration(&self) -> f64 {
        (self.moment_of_inertia / self.area).sqrt()
    }

    /// Check both properties are strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`MemberPropertyError`] describing the first invalid property.
    pub fn validate(&self) -> Result<(), MemberPropertyError> {
        if !(self.area.is_finite() && self.area > 0.0) {
            return Err(MemberPropertyError::NonPositiveArea { area: self.area });
        }
        if !(self.moment_of_inertia.is_finite() && self.moment_of_inertia > 0.0) {
            return Err(MemberPropertyError::NonPositiveInertia {
                moment_of_inertia: self.moment_of_inertia,
            });
        }
        Ok(())
    }
}

impl Default for Section {
    /// The 2x4 section the editor assigns to new members.
    fn default() -> Self {
        Self {
            area: 5.25,
            moment_of_inertia: 5.36,
        }
    }
}

/// Grouping used by the size picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LumberCategory {
    /// 2x dimensional lumber.
    Dimensional,
    /// 4x and heavier single-piece timbers.
    Timber,
    /// Deep glulam or special-order members.
    Glulam,
}

/// Standard lumber size designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LumberSize {
    /// 2x4 (1.5" x 3.5")
    #[default]
    L2x4,
    /// 2x6 (1.5" x 5.5")
    L2x6,
    /// 2x8 (1.5" x 7.25")
    L2x8,
    /// 2x10 (1.5" x 9.25")
    L2x10,
    /// 2x12 (1.5" x 11.25")
    L2x12,
    /// 4x6 (3.5" x 5.5")
    L4x6,
    /// 4x8 (3.5" x 7.25")
    L4x8,
    /// 4x10 (3.5" x 9.25")
    L4x10,
    /// 4x12 (3.5" x 11.25")
    L4x12,
    /// 6x8 (5.5" x 7.5")
    L6x8,
    /// 6x10 (5.5" x 9.5")
    L6x10,
    /// 6x12 (5.5" x 11.5")
    L6x12,
    /// 8x10 (7.5" x 9.5")
    L8x10,
    /// 8x12 (7.5" x 11.5")
    L8x12,
    /// 4x24 (3.5" x 23.25")
    L4x24,
    /// 8x24 (7.5" x 23.25")
    L8x24,
    /// 8x48 (7.5" x 47.25")
    L8x48,
}

impl LumberSize {
    /// Every size in picker order.
    pub const ALL: [LumberSize; 17] = [
        LumberSize::L2x4,
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
        LumberSize::L4x6,
        LumberSize::L4x8,
        LumberSize::L4x10,
        LumberSize::L4x12,
        LumberSize::L6x8,
        LumberSize::L6x10,
        LumberSize::L6x12,
        LumberSize::L8x10,
        LumberSize::L8x12,
        LumberSize::L4x24,
        LumberSize::L8x24,
        LumberSize::L8x48,
    ];

    /// Actual (width, depth) in inches.
    pub fn actual_dimensions(&self) -> (f64, f64) {
        match self {
            LumberSize::L2x4 => (1.5, 3.5),
            LumberSize::L2x6 => (1.5, 5.5),
            LumberSize::L2x8 => (1.5, 7.25),
            LumberSize::L2x10 => (1.5, 9.25),
            LumberSize::L2x12 => (1.5, 11.25),
            LumberSize::L4x6 => (3.5, 5.5),
            LumberSize::L4x8 => (3.5, 7.25),
            LumberSize::L4x10 => (3.5, 9.25),
            LumberSize::L4x12 => (3.5, 11.25),
            LumberSize::L6x8 => (5.5, 7.5),
            LumberSize::L6x10 => (5.5, 9.5),
            LumberSize::L6x12 => (5.5, 11.5),
            LumberSize::L8x10 => (7.5, 9.5),
            LumberSize::L8x12 => (7.5, 11.5),
            LumberSize::L4x24 => (3.5, 23.25),
            LumberSize::L8x24 => (7.5, 23.25),
            LumberSize::L8x48 => (7.5, 47.25),
        }
    }

    /// Display name such as `"2x4"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            LumberSize::L2x4 => "2x4",
            LumberSize::L2x6 => "2x6",
            LumberSize::L2x8 => "2x8",
            LumberSize::L2x10 => "2x10",
            LumberSize::L2x12 => "2x12",
            LumberSize::L4x6 => "4x6",
            LumberSize::L4x8 => "4x8",
            LumberSize::L4x10 => "4x10",
            LumberSize::L4x12 => "4x12",
            LumberSize::L6x8 => "6x8",
            LumberSize::L6x10 => "6x10",
            LumberSize::L6x12 => "6x12",
            LumberSize::L8x10 => "8x10",
            LumberSize::L8x12 => "8x12",
            LumberSize::L4x24 => "4x24",
            LumberSize::L8x24 => "8x24",
            LumberSize::L8x48 => "8x48",
        }
    }

    /// Picker grouping.
    pub fn category(&self) -> LumberCategory {
        match self {
            LumberSize::L2x4
            | LumberSize::L2x6
            | LumberSize::L2x8
            | LumberSize::L2x10
            | LumberSize::L2x12 => LumberCategory::Dimensional,
            LumberSize::L4x24 | LumberSize::L8x24 | LumberSize::L8x48 => LumberCategory::Glulam,
            _ => LumberCategory::Timber,
        }
    }

    /// Look up a size by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.display_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Section properties of the dressed rectangle, bending about the strong axis.
    pub fn section(&self) -> Section {
        let (width, depth) = self.actual_dimensions();
        Section::rectangular(width, depth)
    }

    /// Self-weight in pounds per linear foot for a material of `density` pcf.
    pub fn weight_per_foot(&self, density: f64) -> f64 {
        self.section().area / 144.0 * density
    }
}

impl std::fmt::Display for LumberSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
