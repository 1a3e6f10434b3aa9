use std::fmt;

use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// HalfInt – angular momentum as twice its value
// ---------------------------------------------------------------------------

/// An integer or half-integer, stored as twice its value so it can be
/// ordered and hashed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfInt(i32);

impl HalfInt {
    pub const fn from_twice(twice: i32) -> Self {
        HalfInt(twice)
    }

    pub const fn twice(self) -> i32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Degeneracy `2J + 1`.
    pub fn multiplicity(self) -> f64 {
        f64::from(self.0) + 1.0
    }
}

impl TryFrom<f64> for HalfInt {
    type Error = DatasetError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let twice = 2.0 * value;
        if !twice.is_finite() || twice.fract() != 0.0 || twice.abs() > f64::from(i32::MAX) {
            return Err(DatasetError::NotHalfInteger(value));
        }
        if twice < 0.0 {
            return Err(DatasetError::NegativeAngularMomentum(value));
        }
        Ok(HalfInt(twice as i32))
    }
}

impl fmt::Display for HalfInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}/2", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Subspace labels and pairs
// ---------------------------------------------------------------------------

/// A `(J, g)` symmetry subspace. Ordered lexicographically, J first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubspaceLabel {
    pub j: HalfInt,
    pub g: u8,
}

impl SubspaceLabel {
    pub const fn new(j: HalfInt, g: u8) -> Self {
        Self { j, g }
    }
}

impl fmt::Display for SubspaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.j, self.g)
    }
}

/// A `(bra, ket)` pair of subspaces, in the order requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubspacePair {
    pub bra: SubspaceLabel,
    pub ket: SubspaceLabel,
}

impl SubspacePair {
    pub const fn new(bra: SubspaceLabel, ket: SubspaceLabel) -> Self {
        Self { bra, ket }
    }

    pub fn is_canonical(&self) -> bool {
        self.bra <= self.ket
    }

    pub fn is_diagonal(&self) -> bool {
        self.bra == self.ket
    }

    pub fn swapped(&self) -> Self {
        Self::new(self.ket, self.bra)
    }
}

impl fmt::Display for SubspacePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<-{}", self.bra, self.ket)
    }
}

// ---------------------------------------------------------------------------
// StateQn – (J, g, n) with a 1-based ordinal
// ---------------------------------------------------------------------------

/// A state: angular momentum, grading, and its 1-based ordinal within the
/// `(J, g)` subspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateQn {
    pub j: HalfInt,
    pub g: u8,
    pub n: usize,
}

impl StateQn {
    pub const fn new(j: HalfInt, g: u8, n: usize) -> Self {
        Self { j, g, n }
    }

    /// Build from a floating-point `J` as found in results files.
    pub fn from_f64(j: f64, g: u8, n: usize) -> Result<Self, DatasetError> {
        Ok(Self::new(HalfInt::try_from(j)?, g, n))
    }

    pub fn subspace(&self) -> SubspaceLabel {
        SubspaceLabel::new(self.j, self.g)
    }

    /// 0-based in-subspace index; `None` for the invalid ordinal 0.
    pub fn index(&self) -> Option<usize> {
        self.n.checked_sub(1)
    }
}

impl fmt::Display for StateQn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.j, self.g, self.n)
    }
}
