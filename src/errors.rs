//! Validation errors

use crate::float_types::Real;
use std::fmt::Display;

/// Which group of inserts a validation issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertRole {
    Leg,
    HeatInsert,
}

impl Display for InsertRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertRole::Leg => write!(f, "leg"),
            InsertRole::HeatInsert => write!(f, "heat insert"),
        }
    }
}

/// All the possible validation issues we might encounter while building a part
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (NonPositiveDimension) A length that must be strictly positive is not
    #[error("(NonPositiveDimension) {name} must be positive and finite, got {value}")]
    NonPositiveDimension { name: &'static str, value: Real },
    /// (HoleTooDeep) A blind hole would pierce the opposite face
    #[error("(HoleTooDeep) hole depth {depth} exceeds body height {height}")]
    HoleTooDeep { depth: Real, height: Real },
    /// (HoleTooWide) A hole is at least as wide as the body it is drilled into
    #[error("(HoleTooWide) hole diameter {hole} must be smaller than body diameter {body}")]
    HoleTooWide { hole: Real, body: Real },
    /// (TooFewSegments) A circle needs at least three segments
    #[error("(TooFewSegments) a circle needs at least 3 segments, got {0}")]
    TooFewSegments(usize),
    /// (InvalidCoordinate) A position has a NaN or infinite component
    #[error("(InvalidCoordinate) {role} position #{index} ({x}, {y}) has a NaN or infinite component")]
    InvalidCoordinate { role: InsertRole, index: usize, x: Real, y: Real },
    /// (NegativeMargin) The wall margin is negative or not finite
    #[error("(NegativeMargin) the wall margin must be a finite value >= 0, got {0}")]
    NegativeMargin(Real),
    /// (NotCreated) An insert was referenced before its solids were built
    #[error("(NotCreated) all {role}s must be created before assembling the table ({role} #{index} is not)")]
    NotCreated { role: InsertRole, index: usize },
    /// (PositionCountMismatch) Inserts and positions cannot be paired up
    #[error("(PositionCountMismatch) {inserts} {role}s but {positions} positions")]
    PositionCountMismatch { role: InsertRole, inserts: usize, positions: usize },
    /// (NoInserts) The table needs at least one insert of the given role
    #[error("(NoInserts) a table needs at least one {0}")]
    NoInserts(InsertRole),
}

/// Check that `value` is a finite, strictly positive length.
pub(crate) fn ensure_positive(name: &'static str, value: Real) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveDimension { name, value })
    }
}
