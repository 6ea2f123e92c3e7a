//! Build parameters for the table, loadable from TOML.
//!
//! ```toml
//! margin = 5.0
//! segments = 32
//! output = "table_with_legs.stl"
//!
//! [[legs]]
//! diameter = 10.0
//! hole_diameter = 5.0
//! hole_depth = 5.0
//! height = 20.0
//! positions = [[30.0, 30.0], [30.0, 70.0], [70.0, 30.0]]
//!
//! [[heat_inserts]]
//! diameter = 5.0
//! hole_diameter = 2.5
//! hole_depth = 2.5
//! height = 5.0
//! positions = [[0.0, 0.0], [0.0, 100.0], [100.0, 0.0], [100.0, 100.0]]
//! ```
//!
//! Missing top-level keys fall back to [`BuildConfig::default`].

use crate::errors::ValidationError;
use crate::float_types::{DEFAULT_SEGMENTS, Real};
use crate::insert::{CylindricalInsert, InsertDimensions};
use crate::table::TableBody;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// One kind of insert and every place it goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InsertGroup {
    pub diameter: Real,
    pub hole_diameter: Real,
    pub hole_depth: Real,
    pub height: Real,
    pub positions: Vec<(Real, Real)>,
}

impl InsertGroup {
    pub const fn dimensions(&self) -> InsertDimensions {
        InsertDimensions::new(self.diameter, self.hole_diameter, self.hole_depth, self.height)
    }

    /// One created insert per position.
    fn build(&self, segments: usize) -> Result<Vec<CylindricalInsert>, ValidationError> {
        let template = CylindricalInsert::from_dimensions(self.dimensions(), segments)?;
        self.positions
            .iter()
            .map(|_| {
                let mut insert = template.clone();
                insert.create()?;
                Ok(insert)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Wall kept around the outermost leg
    pub margin: Real,
    /// Segments per circle
    pub segments: usize,
    /// Where the STL is written
    pub output: PathBuf,
    pub legs: Vec<InsertGroup>,
    pub heat_inserts: Vec<InsertGroup>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            margin: 5.0,
            segments: DEFAULT_SEGMENTS,
            output: PathBuf::from("table_with_legs.stl"),
            legs: vec![InsertGroup {
                diameter: 10.0,
                hole_diameter: 5.0,
                hole_depth: 5.0,
                height: 20.0,
                positions: vec![(30.0, 30.0), (30.0, 70.0), (70.0, 30.0)],
            }],
            heat_inserts: vec![InsertGroup {
                diameter: 5.0,
                hole_diameter: 2.5,
                hole_depth: 2.5,
                height: 5.0,
                positions: vec![(0.0, 0.0), (0.0, 100.0), (100.0, 0.0), (100.0, 100.0)],
            }],
        }
    }
}

impl BuildConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded build config");
        Ok(config)
    }

    /// Validate every group, create all inserts, and lay them out on a table.
    ///
    /// The returned table is ready for [`TableBody::create`].
    pub fn into_table(&self) -> Result<TableBody, ConfigError> {
        let (legs, leg_positions) = self.expand(&self.legs)?;
        let (heat_inserts, heat_insert_positions) = self.expand(&self.heat_inserts)?;
        Ok(TableBody::new(
            self.margin,
            legs,
            leg_positions,
            heat_inserts,
            heat_insert_positions,
        ))
    }

    fn expand(
        &self,
        groups: &[InsertGroup],
    ) -> Result<(Vec<CylindricalInsert>, Vec<(Real, Real)>), ValidationError> {
        let mut inserts = Vec::new();
        let mut positions = Vec::new();
        for group in groups {
            inserts.extend(group.build(self.segments)?);
            positions.extend_from_slice(&group.positions);
        }
        Ok((inserts, positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::InsertRole;

    #[test]
    fn empty_file_is_the_default_table() {
        let config = BuildConfig::from_toml_str("").expect("parses");
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let config = BuildConfig::from_toml_str("margin = 2.0\nsegments = 16\n").expect("parses");
        assert_eq!(config.margin, 2.0);
        assert_eq!(config.segments, 16);
        assert_eq!(config.legs, BuildConfig::default().legs);
    }

    #[test]
    fn groups_parse_from_arrays_of_tables() {
        let text = r#"
            [[legs]]
            diameter = 8.0
            hole_diameter = 3.0
            hole_depth = 4.0
            height = 12.0
            positions = [[1.0, 2.0]]
        "#;
        let config = BuildConfig::from_toml_str(text).expect("parses");
        assert_eq!(config.legs.len(), 1);
        assert_eq!(config.legs[0].positions, vec![(1.0, 2.0)]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            BuildConfig::from_toml_str("margn = 1.0"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn invalid_dimensions_surface_as_validation_errors() {
        let mut config = BuildConfig::default();
        config.legs[0].hole_depth = 30.0;
        assert!(matches!(
            config.into_table(),
            Err(ConfigError::Invalid(ValidationError::HoleTooDeep { .. }))
        ));
    }

    #[test]
    fn default_table_has_created_inserts() {
        let table = BuildConfig::default().into_table().expect("valid");
        assert_eq!(table.legs().len(), 3);
        assert_eq!(table.heat_inserts().len(), 4);
        assert!(table.legs().iter().all(CylindricalInsert::is_created));
    }

    #[test]
    fn table_without_legs_is_rejected_on_assembly() {
        let config = BuildConfig {
            legs: vec![],
            ..BuildConfig::default()
        };
        let table = config.into_table().expect("layout is only checked on assembly");
        assert_eq!(
            table.assemble().unwrap_err(),
            ValidationError::NoInserts(InsertRole::Leg)
        );
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = BuildConfig::from_path("/nonexistent/insertcsg.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/insertcsg.toml"));
    }
}
