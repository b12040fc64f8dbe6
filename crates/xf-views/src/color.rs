//! Color parsing and the color ↔ category map used by color-encoded charts

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use xf_core::Rgba;

use crate::ConfigError;

/// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with `a` in `0..=1`, or a handful of named colors.
pub fn parse_color(text: &str) -> Result<Rgba, ConfigError> {
    let value = text.trim().to_ascii_lowercase();
    let invalid = || ConfigError::InvalidColor(text.to_string());

    if let Some(hex) = value.strip_prefix('#') {
        let channel = |i: usize| -> Result<u8, ConfigError> {
            u8::from_str_radix(hex.get(i..i + 2).ok_or_else(invalid)?, 16).map_err(|_| invalid())
        };
        return match hex.len() {
            3 => {
                let mut rgba = [255u8; 4];
                for (i, c) in hex.chars().enumerate() {
                    let nibble = c.to_digit(16).ok_or_else(invalid)? as u8;
                    rgba[i] = nibble * 17;
                }
                Ok(rgba)
            }
            6 => Ok([channel(0)?, channel(2)?, channel(4)?, 255]),
            8 => Ok([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
            _ => Err(invalid()),
        };
    }

    if let Some(body) = value.strip_prefix("rgba(").or_else(|| value.strip_prefix("rgb(")) {
        let parts: Vec<&str> = body.strip_suffix(')').ok_or_else(invalid)?.split(',').map(str::trim).collect();
        let byte = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        return match parts.as_slice() {
            [r, g, b] => Ok([byte(r)?, byte(g)?, byte(b)?, 255]),
            [r, g, b, a] => {
                let alpha = a.parse::<f32>().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(invalid());
                }
                Ok([byte(r)?, byte(g)?, byte(b)?, (alpha * 255.0).round() as u8])
            }
            _ => Err(invalid()),
        };
    }

    match value.as_str() {
        "red" => Ok([255, 0, 0, 255]),
        "green" => Ok([0, 128, 0, 255]),
        "blue" => Ok([0, 0, 255, 255]),
        "orange" => Ok([255, 165, 0, 255]),
        "purple" => Ok([128, 0, 128, 255]),
        "gray" | "grey" => Ok([128, 128, 128, 255]),
        "black" => Ok([0, 0, 0, 255]),
        "white" => Ok([255, 255, 255, 255]),
        _ => Err(invalid()),
    }
}

/// `#rrggbb`, with the alpha channel appended only when it is not opaque
pub fn format_color(color: Rgba) -> String {
    let [r, g, b, a] = color;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Injective mapping between categories and the marker colors that encode them.
///
/// Built once from configuration; lookups in either direction never guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CategoryColorMap {
    colors: BTreeMap<String, Rgba>,
    categories: AHashMap<Rgba, String>,
}

impl CategoryColorMap {
    pub fn new<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, Rgba)>,
        S: Into<String>,
    {
        let mut colors = BTreeMap::new();
        let mut categories: AHashMap<Rgba, String> = AHashMap::new();

        for (category, color) in entries {
            let category = category.into();
            if colors.contains_key(&category) {
                return Err(ConfigError::DuplicateCategory(category));
            }
            if let Some(existing) = categories.get(&color) {
                return Err(ConfigError::DuplicateColor {
                    color: format_color(color),
                    first: existing.clone(),
                    second: category,
                });
            }
            categories.insert(color, category.clone());
            colors.insert(category, color);
        }

        Ok(Self { colors, categories })
    }

    /// Build from CSS color strings
    pub fn parse<I, S, C>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: AsRef<str>,
    {
        let parsed = entries
            .into_iter()
            .map(|(category, color)| Ok((category.into(), parse_color(color.as_ref())?)))
            .collect::<Result<Vec<(String, Rgba)>, ConfigError>>()?;
        Self::new(parsed)
    }

    pub fn color_of(&self, category: &str) -> Option<Rgba> {
        self.colors.get(category).copied()
    }

    /// Category encoded by a reported marker color, `None` when the color is
    /// unparsable or not part of the map
    pub fn category_of(&self, color: &str) -> Option<&str> {
        let rgba = parse_color(color).ok()?;
        self.categories.get(&rgba).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Category → color table for the renderer
    pub fn palette(&self) -> BTreeMap<String, Rgba> {
        self.colors.clone()
    }
}

impl PartialEq for CategoryColorMap {
    fn eq(&self, other: &Self) -> bool {
        self.colors == other.colors
    }
}

impl TryFrom<BTreeMap<String, String>> for CategoryColorMap {
    type Error = ConfigError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::parse(entries)
    }
}

impl From<CategoryColorMap> for BTreeMap<String, String> {
    fn from(map: CategoryColorMap) -> Self {
        map.colors.into_iter().map(|(category, color)| (category, format_color(color))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#FF8000").unwrap(), [255, 128, 0, 255]);
        assert_eq!(parse_color("#f80").unwrap(), [255, 136, 0, 255]);
        assert_eq!(parse_color("#00000080").unwrap(), [0, 0, 0, 128]);
        assert_eq!(parse_color("rgb(1, 2, 3)").unwrap(), [1, 2, 3, 255]);
        assert_eq!(parse_color("rgba(1,2,3,0.5)").unwrap(), [1, 2, 3, 128]);
        assert_eq!(parse_color(" Grey ").unwrap(), [128, 128, 128, 255]);
        assert!(matches!(parse_color("#12345"), Err(ConfigError::InvalidColor(_))));
        assert!(parse_color("rgb(300, 0, 0)").is_err());
        assert!(parse_color("chartreuse-ish").is_err());
    }

    #[test]
    fn test_lookup_both_directions() {
        let map = CategoryColorMap::parse([("approved", "#2ca02c"), ("rejected", "red")]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.category_of("rgb(255, 0, 0)"), Some("rejected"));
        assert_eq!(map.category_of("#2CA02C"), Some("approved"));
        assert_eq!(map.category_of("#000000"), None);
        assert_eq!(map.category_of("not a color"), None);
        assert_eq!(map.color_of("approved"), Some([0x2c, 0xa0, 0x2c, 255]));
    }

    #[test]
    fn test_rejects_non_injective_maps() {
        let err = CategoryColorMap::parse([("a", "red"), ("b", "#ff0000")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateColor { ref first, ref second, .. } if first == "a" && second == "b"));

        let err = CategoryColorMap::new([("a", [1, 2, 3, 255]), ("a", [4, 5, 6, 255])]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateCategory(ref c) if c == "a"));
    }

    #[test]
    fn test_serde_as_color_strings() {
        let map: CategoryColorMap = serde_json::from_str(r##"{"approved": "#2ca02c", "pending": "orange"}"##).unwrap();
        assert_eq!(map.category_of("orange"), Some("pending"));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r##"{"approved":"#2ca02c","pending":"#ffa500"}"##);

        let bad: Result<CategoryColorMap, _> = serde_json::from_str(r#"{"a": "red", "b": "red"}"#);
        assert!(bad.is_err());
    }
}
