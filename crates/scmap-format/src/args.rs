use scmap_core::SizeClass;
use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Parameters for a freshly created map, usually parsed from a RON file:
///
/// ```ron
/// (
///     name: "Twin Rivers",
///     author: "mapper",
///     description: "Two rivers, four players.",
///     size: 1,
///     default_height: 10000,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapArgs {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    /// Size class 0-4 (256 to 4096 heightmap samples per side).
    pub size: SizeClass,
    /// Initial value of every heightmap sample.
    pub default_height: u16,
}

impl MapArgs {
    pub fn from_ron(ron_str: &str) -> Result<Self, MapError> {
        let options = ron::Options::default();
        let args: MapArgs = options
            .from_str(ron_str)
            .map_err(|e| MapError::Args(e.to_string()))?;
        args.validate()?;
        Ok(args)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if self.name.trim().is_empty() {
            return Err(MapError::Args("name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_args() {
        let ron = r#"(
            name: "Twin Rivers",
            author: "mapper",
            description: "Two rivers.",
            size: 1,
            default_height: 10000,
        )"#;
        let args = MapArgs::from_ron(ron).expect("should parse");
        assert_eq!(args.name, "Twin Rivers");
        assert_eq!(args.size, SizeClass::S512);
        assert_eq!(args.default_height, 10000);
    }

    #[test]
    fn test_optional_fields_default() {
        let ron = r#"(name: "Flat", size: 0, default_height: 0)"#;
        let args = MapArgs::from_ron(ron).expect("should parse");
        assert!(args.author.is_empty());
        assert!(args.description.is_empty());
    }

    #[test]
    fn test_size_out_of_range_rejected() {
        let ron = r#"(name: "Huge", size: 5, default_height: 0)"#;
        let result = MapArgs::from_ron(ron);
        assert!(matches!(result, Err(MapError::Args(_))));
    }

    #[test]
    fn test_empty_name_rejected() {
        let ron = r#"(name: "  ", size: 0, default_height: 0)"#;
        assert!(matches!(MapArgs::from_ron(ron), Err(MapError::Args(_))));
    }

    #[test]
    fn test_malformed_ron_rejected() {
        assert!(MapArgs::from_ron("{ not valid ron }").is_err());
    }
}
