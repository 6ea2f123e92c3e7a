//! Parametric **table/bracket** generator built on a small BSP-tree
//! **Constructive Solid Geometry (CSG)** kernel.
//!
//! A table is a rectangular slab with cylindrical legs hanging below it and
//! heat-set insert sockets opening on its top face. Every part is made of
//! [`insert::CylindricalInsert`]s (a cylinder with a blind hole), combined with
//! the slab through Boolean operations (*union*, *difference*, *intersection*)
//! on sets of polygons stored in [BSP](mesh::bsp) trees.
//!
//! ```no_run
//! use insertcsg::config::BuildConfig;
//!
//! let mut table = BuildConfig::default().into_table()?;
//! let solid = table.create()?;
//! solid.write_stl("table_with_legs.stl")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - **viewer**: an HTTP service to upload and inspect STL files in the browser

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod errors;
pub mod float_types;
pub mod insert;
pub mod io;
pub mod mesh;
pub mod shapes;
pub mod sketch;
pub mod table;
pub mod traits;

#[cfg(feature = "viewer")]
pub mod viewer;

pub use insert::CylindricalInsert;
pub use mesh::Mesh;
pub use table::TableBody;
pub use traits::CSGOps;
