//! Timber material properties and the species catalogue.

use serde::{Deserialize, Serialize};

use crate::errors::MaterialError;

/// Allowable-stress design values for a timber grade.
///
/// Field names serialise as `E`, `Fb` and `Fc` to match saved design documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Modulus of elasticity in psi.
    #[serde(rename = "E")]
    pub elastic_modulus: f64,
    /// Allowable bending stress in psi; also governs tension members.
    #[serde(rename = "Fb")]
    pub bending_allowable: f64,
    /// Allowable compression parallel to grain in psi.
    #[serde(rename = "Fc")]
    pub compression_allowable: f64,
    /// Density in pounds per cubic foot.
    #[serde(default)]
    pub density: f64,
}

impl Default for Material {
    /// SPF #2 as preset in the editor.
    fn default() -> Self {
        Self {
            name: "SPF (Spruce-Pine-Fir) #2".to_string(),
            elastic_modulus: 1_200_000.0,
            bending_allowable: 775.0,
            compression_allowable: 1_150.0,
            density: 26.0,
        }
    }
}

impl Material {
    /// Allowable stress for a member carrying `force` pounds.
    ///
    /// Tension (`force > 0`) uses `Fb`; compression and zero force use `Fc`.
    #[must_use]
    pub fn allowable_for(&self, force: f64) -> f64 {
        if force > 0.0 {
            self.bending_allowable
        } else {
            self.compression_allowable
        }
    }

    /// Check that `E`, `Fb` and `Fc` are positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError::NonPositiveProperty`] naming the first bad value.
    pub fn validate(&self) -> Result<(), MaterialError> {
        for (property, value) in [
            ("E", self.elastic_modulus),
            ("Fb", self.bending_allowable),
            ("Fc", self.compression_allowable),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MaterialError::NonPositiveProperty { property, value });
            }
        }
        Ok(())
    }
}

/// No. 2 grade species offered by the material picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WoodSpecies {
    /// Hem-Fir #2
    HemFir,
    /// Douglas Fir-Larch #2
    DouglasFirLarch,
    /// Southern Pine #2
    SouthernPine,
    /// Spruce-Pine-Fir #2 (south values)
    SprucePineFir,
}

impl WoodSpecies {
    /// Every species in picker order.
    pub const ALL: [WoodSpecies; 4] = [
        WoodSpecies::HemFir,
        WoodSpecies::DouglasFirLarch,
        WoodSpecies::SouthernPine,
        WoodSpecies::SprucePineFir,
    ];

    /// Display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            WoodSpecies::HemFir => "Hem-Fir #2",
            WoodSpecies::DouglasFirLarch => "Douglas Fir-Larch #2",
            WoodSpecies::SouthernPine => "Southern Pine #2",
            WoodSpecies::SprucePineFir => "SPF (Spruce-Pine-Fir) #2",
        }
    }

    /// Tabulated (E, Fb, Fc, density).
    fn values(&self) -> (f64, f64, f64, f64) {
        match self {
            WoodSpecies::HemFir => (1_300_000.0, 850.0, 1_250.0, 28.0),
            WoodSpecies::DouglasFirLarch => (1_600_000.0, 875.0, 1_300.0, 32.0),
            // Fb varies by size in the NDS supplement; this is the 2x4 value.
            WoodSpecies::SouthernPine => (1_600_000.0, 1_000.0, 1_650.0, 36.0),
            WoodSpecies::SprucePineFir => (1_200_000.0, 875.0, 1_150.0, 26.0),
        }
    }

    /// Design values as a [`Material`].
    pub fn material(&self) -> Material {
        let (elastic_modulus, bending_allowable, compression_allowable, density) = self.values();
        Material {
            name: self.display_name().to_string(),
            elastic_modulus,
            bending_allowable,
            compression_allowable,
            density,
        }
    }

    /// Look up a species by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.display_name() == name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tension_uses_bending_allowable() {
        let material = Material::default();
        assert_eq!(material.allowable_for(10.0), 775.0);
        assert_eq!(material.allowable_for(-10.0), 1_150.0);
        assert_eq!(material.allowable_for(0.0), 1_150.0);
    }

    #[test]
    fn catalogue_materials_are_valid() {
        for species in WoodSpecies::ALL {
            let material = species.material();
            material.validate().expect("catalogue values are positive");
            assert_eq!(WoodSpecies::from_name(&material.name), Some(species));
        }
    }

    #[test]
    fn invalid_modulus_is_named() {
        let material = Material {
            elastic_modulus: 0.0,
            ..Material::default()
        };
        assert_eq!(
            material.validate(),
            Err(MaterialError::NonPositiveProperty {
                property: "E",
                value: 0.0
            })
        );
    }

    #[test]
    fn serde_uses_design_document_field_names() {
        let json = r#"{ "name": "Hem-Fir #2", "E": 1300000, "Fb": 850, "Fc": 1250, "density": 28 }"#;
        let material: Material = serde_json::from_str(json).expect("valid material");
        assert_eq!(material, WoodSpecies::HemFir.material());
        let text = serde_json::to_string(&material).expect("serialisable");
        assert!(text.contains("\"Fc\":1250.0"));
    }
}
