use log::trace;
use ndarray::{Array2, ArrayView2};

use super::quantum::{HalfInt, SubspacePair};

// ---------------------------------------------------------------------------
// RME conventions
// ---------------------------------------------------------------------------

/// Normalization convention of reduced matrix elements.
///
/// `<Jf||T||Ji>_Racah = sqrt(2 Jf + 1) <Jf||T||Ji>_gt`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RmeConvention {
    GroupTheory,
    Racah,
}

impl RmeConvention {
    /// Convert a group-theory RME with bra angular momentum `j_bra` into this
    /// convention.
    pub fn convert_group_theory(self, rme_gt: f64, j_bra: HalfInt) -> f64 {
        match self {
            RmeConvention::GroupTheory => rme_gt,
            RmeConvention::Racah => j_bra.multiplicity().sqrt() * rme_gt,
        }
    }

    /// Factor `f` with `<bra||T||ket> = f <ket||T||bra>` in this convention.
    ///
    /// Assumes a hermitian tensor and that `J_ket - J_bra` is an integer.
    pub fn exchange_factor(self, j_bra: HalfInt, j_ket: HalfInt) -> f64 {
        let sign = if (j_ket.twice() - j_bra.twice()).div_euclid(2) % 2 == 0 {
            1.0
        } else {
            -1.0
        };
        match self {
            RmeConvention::Racah => sign,
            RmeConvention::GroupTheory => {
                sign * (j_ket.multiplicity() / j_bra.multiplicity()).sqrt()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

/// Where a requested pair lives in canonical storage and how to recover it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canonicalization {
    pub pair: SubspacePair,
    pub flipped: bool,
    /// Multiplies the transposed canonical matrix when `flipped`; 1 otherwise.
    pub factor: f64,
}

impl Canonicalization {
    /// Recover the requested matrix from the canonically stored one.
    pub fn apply(&self, stored: ArrayView2<'_, f64>) -> Array2<f64> {
        if self.flipped {
            stored.t().mapv(|x| self.factor * x)
        } else {
            stored.to_owned()
        }
    }

    /// Recover the requested element `(row, col)` without materializing the
    /// matrix. `None` when out of range.
    pub fn element(&self, stored: ArrayView2<'_, f64>, row: usize, col: usize) -> Option<f64> {
        if self.flipped {
            stored.get((col, row)).map(|x| self.factor * x)
        } else {
            stored.get((row, col)).copied()
        }
    }
}

/// Decide the canonical storage order for `pair` (non-decreasing labels) and
/// the exchange factor under `convention`. Diagonal pairs are never flipped.
pub fn canonicalize(pair: SubspacePair, convention: RmeConvention) -> Canonicalization {
    let canonicalization = if pair.is_canonical() {
        Canonicalization {
            pair,
            flipped: false,
            factor: 1.0,
        }
    } else {
        Canonicalization {
            pair: pair.swapped(),
            flipped: true,
            factor: convention.exchange_factor(pair.bra.j, pair.ket.j),
        }
    };
    trace!(
        "canonicalize {pair} -> {} flipped={} factor={}",
        canonicalization.pair,
        canonicalization.flipped,
        canonicalization.factor
    );
    canonicalization
}
