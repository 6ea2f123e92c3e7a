//! Table assembly: a slab with legs hanging below it and heat-set insert sockets
//! opening on its top face.
//!
//! The part is modelled in its use orientation. The slab occupies
//! `z ∈ [-T, 0]`, where `T` is the height of the tallest heat insert. Each leg
//! hangs below the slab bottom by its full height with its hole at the free
//! end. Each heat insert sits flush with the top face, hole facing `+Z`.
//!
//! Assembly is a fold over immutable meshes, in a fixed order:
//! 1. the slab on its own,
//! 2. every leg unioned in,
//! 3. for every heat insert, its outer body cut out and then its hollowed body
//!    unioned back in under the same placement, which leaves exactly the
//!    insert's hole as the socket cavity.

use crate::errors::{InsertRole, ValidationError};
use crate::float_types::{PI, Real};
use crate::insert::{CylindricalInsert, InsertSolids};
use crate::mesh::Mesh;
use crate::traits::CSGOps;
use geo::{BoundingRect, MultiPoint, Point};
use nalgebra::{Matrix4, Rotation3, Translation3, Unit, Vector3};

/// Axis-aligned footprint of the slab in the XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: Real,
    pub min_y: Real,
    pub max_x: Real,
    pub max_y: Real,
}

impl Footprint {
    pub fn width(&self) -> Real {
        self.max_x - self.min_x
    }

    pub fn length(&self) -> Real {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (Real, Real) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Rigid placement of an insert: an optional half-turn about the (1, 1, 0)
/// diagonal, then a translation.
///
/// The half-turn swaps X and Y and negates Z, turning an insert upside down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub flipped: bool,
    pub offset: Vector3<Real>,
}

impl Placement {
    /// Leg hanging below a slab whose bottom face is at `slab_bottom`; the hole ends up at the free end.
    pub fn hanging(x: Real, y: Real, slab_bottom: Real) -> Self {
        Self {
            flipped: true,
            offset: Vector3::new(x, y, slab_bottom),
        }
    }

    /// Insert of `height` whose top face is flush with `top`, hole facing `+Z`.
    pub fn flush(x: Real, y: Real, top: Real, height: Real) -> Self {
        Self {
            flipped: false,
            offset: Vector3::new(x, y, top - height),
        }
    }

    pub fn matrix(&self) -> Matrix4<Real> {
        let translation = Translation3::from(self.offset).to_homogeneous();
        if self.flipped {
            let axis = Unit::new_normalize(Vector3::new(1.0, 1.0, 0.0));
            let rotation = Rotation3::from_axis_angle(&axis, PI);
            translation * rotation.to_homogeneous()
        } else {
            translation
        }
    }

    pub fn apply(&self, mesh: &Mesh) -> Mesh {
        mesh.transform(&self.matrix())
    }
}

/// A slab carrying legs and heat-set insert sockets.
#[derive(Debug, Clone)]
pub struct TableBody {
    margin: Real,
    legs: Vec<CylindricalInsert>,
    leg_positions: Vec<(Real, Real)>,
    heat_inserts: Vec<CylindricalInsert>,
    heat_insert_positions: Vec<(Real, Real)>,
    surface: Option<Mesh>,
}

impl TableBody {
    /// `margin` is the wall kept between the outermost leg clearance and the slab edge.
    pub fn new(
        margin: Real,
        legs: Vec<CylindricalInsert>,
        leg_positions: Vec<(Real, Real)>,
        heat_inserts: Vec<CylindricalInsert>,
        heat_insert_positions: Vec<(Real, Real)>,
    ) -> Self {
        Self {
            margin,
            legs,
            leg_positions,
            heat_inserts,
            heat_insert_positions,
            surface: None,
        }
    }

    pub const fn margin(&self) -> Real {
        self.margin
    }

    pub fn legs(&self) -> &[CylindricalInsert] {
        &self.legs
    }

    pub fn heat_inserts(&self) -> &[CylindricalInsert] {
        &self.heat_inserts
    }

    pub fn leg_positions(&self) -> &[(Real, Real)] {
        &self.leg_positions
    }

    pub fn heat_insert_positions(&self) -> &[(Real, Real)] {
        &self.heat_insert_positions
    }

    /// Checks everything except whether the inserts have been created.
    fn validate_layout(&self) -> Result<(), ValidationError> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(ValidationError::NegativeMargin(self.margin));
        }
        check_group(InsertRole::Leg, &self.legs, &self.leg_positions)?;
        check_group(
            InsertRole::HeatInsert,
            &self.heat_inserts,
            &self.heat_insert_positions,
        )
    }

    /// Slab outline: the heat-insert bounding rectangle grown by the largest leg radius plus the margin.
    pub fn footprint(&self) -> Result<Footprint, ValidationError> {
        self.validate_layout()?;

        let max_leg_diameter = self
            .legs
            .iter()
            .map(CylindricalInsert::diameter)
            .fold(Real::MIN, Real::max);
        let pad = max_leg_diameter / 2.0 + self.margin;

        let points: MultiPoint<Real> = self
            .heat_insert_positions
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect();
        let rect = points
            .bounding_rect()
            .ok_or(ValidationError::NoInserts(InsertRole::HeatInsert))?;

        Ok(Footprint {
            min_x: rect.min().x - pad,
            min_y: rect.min().y - pad,
            max_x: rect.max().x + pad,
            max_y: rect.max().y + pad,
        })
    }

    /// Slab thickness: the height of the tallest heat insert.
    pub fn slab_thickness(&self) -> Option<Real> {
        self.heat_inserts
            .iter()
            .map(CylindricalInsert::height)
            .reduce(Real::max)
    }

    /// Validate, then fold the slab, legs and sockets into one solid.
    ///
    /// Nothing is computed unless every precondition holds.
    pub fn assemble(&self) -> Result<Mesh, ValidationError> {
        let footprint = self.footprint()?;
        let leg_solids = created_solids(InsertRole::Leg, &self.legs)?;
        let insert_solids = created_solids(InsertRole::HeatInsert, &self.heat_inserts)?;
        let thickness = self
            .slab_thickness()
            .ok_or(ValidationError::NoInserts(InsertRole::HeatInsert))?;

        let (cx, cy) = footprint.center();
        let slab = Mesh::cuboid(footprint.width(), footprint.length(), thickness)?
            .translate(cx, cy, -thickness / 2.0);
        tracing::debug!(
            width = footprint.width(),
            length = footprint.length(),
            thickness,
            "built slab"
        );

        let with_legs = leg_solids
            .iter()
            .zip(&self.leg_positions)
            .enumerate()
            .fold(slab, |surface, (i, (solids, &(x, y)))| {
                tracing::debug!(leg = i, x, y, "union leg");
                surface.union(&Placement::hanging(x, y, -thickness).apply(&solids.body))
            });

        let finished = insert_solids
            .iter()
            .zip(&self.heat_insert_positions)
            .zip(&self.heat_inserts)
            .enumerate()
            .fold(with_legs, |surface, (i, ((solids, &(x, y)), insert))| {
                let placement = Placement::flush(x, y, 0.0, insert.height());
                tracing::debug!(heat_insert = i, x, y, "cut clearance and seat insert");
                surface
                    .difference(&placement.apply(&solids.outer_body))
                    .union(&placement.apply(&solids.body))
            });

        tracing::info!(
            legs = self.legs.len(),
            heat_inserts = self.heat_inserts.len(),
            polygons = finished.polygons.len(),
            "assembled table"
        );
        Ok(finished)
    }

    /// Assemble and keep the result; see [`TableBody::assemble`].
    pub fn create(&mut self) -> Result<&Mesh, ValidationError> {
        let surface = self.assemble()?;
        Ok(self.surface.insert(surface))
    }

    /// The last assembled solid, if any.
    pub fn surface(&self) -> Option<&Mesh> {
        self.surface.as_ref()
    }
}

fn check_group(
    role: InsertRole,
    inserts: &[CylindricalInsert],
    positions: &[(Real, Real)],
) -> Result<(), ValidationError> {
    if inserts.is_empty() {
        return Err(ValidationError::NoInserts(role));
    }
    if inserts.len() != positions.len() {
        return Err(ValidationError::PositionCountMismatch {
            role,
            inserts: inserts.len(),
            positions: positions.len(),
        });
    }
    if let Some((index, &(x, y))) = positions
        .iter()
        .enumerate()
        .find(|(_, (x, y))| !(x.is_finite() && y.is_finite()))
    {
        return Err(ValidationError::InvalidCoordinate { role, index, x, y });
    }
    Ok(())
}

fn created_solids(
    role: InsertRole,
    inserts: &[CylindricalInsert],
) -> Result<Vec<&InsertSolids>, ValidationError> {
    inserts
        .iter()
        .enumerate()
        .map(|(index, insert)| {
            insert
                .solids()
                .ok_or(ValidationError::NotCreated { role, index })
        })
        .collect()
}
