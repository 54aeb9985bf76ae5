//! Product categories and print materials.
//!
//! Both are free-text columns in the provider; values outside the known set
//! are kept verbatim in an `Other` variant instead of failing the whole row.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Storefront category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Miniatures,
    Tools,
    Decorative,
    Functional,
    Educational,
    Automotive,
    Gaming,
    Jewelry,
    Household,
    /// The catch-all `other` bucket, or an unrecognised value.
    Other(String),
}

impl Category {
    /// Every category offered in the storefront filter, in display order.
    pub const ALL: [Category; 9] = [
        Category::Miniatures,
        Category::Tools,
        Category::Decorative,
        Category::Functional,
        Category::Educational,
        Category::Automotive,
        Category::Gaming,
        Category::Jewelry,
        Category::Household,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Miniatures => "miniatures",
            Category::Tools => "tools",
            Category::Decorative => "decorative",
            Category::Functional => "functional",
            Category::Educational => "educational",
            Category::Automotive => "automotive",
            Category::Gaming => "gaming",
            Category::Jewelry => "jewelry",
            Category::Household => "household",
            Category::Other(raw) => raw,
        }
    }

    /// Parse a provider value. Never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "miniatures" => Category::Miniatures,
            "tools" => Category::Tools,
            "decorative" => Category::Decorative,
            "functional" => Category::Functional,
            "educational" => Category::Educational,
            "automotive" => Category::Automotive,
            "gaming" => Category::Gaming,
            "jewelry" => Category::Jewelry,
            "household" => Category::Household,
            _ => Category::Other(s.trim().to_string()),
        }
    }

    /// Label shown to shoppers.
    pub fn display_name(&self) -> &str {
        match self {
            Category::Miniatures => "Miniaturas",
            Category::Tools => "Ferramentas",
            Category::Decorative => "Decorativo",
            Category::Functional => "Funcional",
            Category::Educational => "Educacional",
            Category::Automotive => "Automotivo",
            Category::Gaming => "Gaming",
            Category::Jewelry => "Joias",
            Category::Household => "Casa",
            Category::Other(_) => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::parse(&raw))
    }
}

/// Filament or resin a product is printed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Material {
    Pla,
    Abs,
    Petg,
    Tpu,
    Wood,
    Metal,
    CarbonFiber,
    GlowInDark,
    Transparent,
    /// `Other`, or an unrecognised value such as `Resina`.
    Other(String),
}

impl Material {
    pub const ALL: [Material; 9] = [
        Material::Pla,
        Material::Abs,
        Material::Petg,
        Material::Tpu,
        Material::Wood,
        Material::Metal,
        Material::CarbonFiber,
        Material::GlowInDark,
        Material::Transparent,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Material::Pla => "PLA",
            Material::Abs => "ABS",
            Material::Petg => "PETG",
            Material::Tpu => "TPU",
            Material::Wood => "Wood",
            Material::Metal => "Metal",
            Material::CarbonFiber => "Carbon Fiber",
            Material::GlowInDark => "Glow in Dark",
            Material::Transparent => "Transparent",
            Material::Other(raw) => raw,
        }
    }

    /// Parse a provider value, case-insensitively. Never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pla" => Material::Pla,
            "abs" => Material::Abs,
            "petg" => Material::Petg,
            "tpu" => Material::Tpu,
            "wood" => Material::Wood,
            "metal" => Material::Metal,
            "carbon fiber" => Material::CarbonFiber,
            "glow in dark" => Material::GlowInDark,
            "transparent" => Material::Transparent,
            _ => Material::Other(s.trim().to_string()),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Material {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Material {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Material::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_known_and_unknown() {
        assert_eq!(Category::parse("Decorative"), Category::Decorative);
        assert_eq!(Category::parse("other"), Category::Other("other".to_string()));
        let odd = Category::parse("cosplay");
        assert_eq!(odd.as_str(), "cosplay");
        assert_eq!(odd.display_name(), "Outros");
        assert_eq!(Category::Jewelry.display_name(), "Joias");
    }

    #[test]
    fn test_material_parse_is_case_insensitive() {
        assert_eq!(Material::parse("pla"), Material::Pla);
        assert_eq!(Material::parse("Carbon Fiber"), Material::CarbonFiber);
        assert_eq!(Material::parse("Resina"), Material::Other("Resina".to_string()));
        assert_eq!(Material::GlowInDark.to_string(), "Glow in Dark");
    }

    #[test]
    fn test_serde_uses_provider_strings() {
        let json = serde_json::to_string(&(Category::Gaming, Material::Petg)).unwrap();
        assert_eq!(json, r#"["gaming","PETG"]"#);
        let back: (Category, Material) = serde_json::from_str(r#"["tools","Resina"]"#).unwrap();
        assert_eq!(back, (Category::Tools, Material::Other("Resina".to_string())));
    }
}
