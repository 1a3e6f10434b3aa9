use std::str::FromStr;

use log::trace;
use ndarray::{Array1, Array2};

use super::canonical::{canonicalize, RmeConvention};
use super::dataset::ResultsDataset;
use super::quantum::{StateQn, SubspacePair};
use crate::error::QueryError;

/// Squared-radius observables; the group-theory diagonal RME is the
/// squared radius summed over the relevant particles.
pub const R2_INTRINSIC: &str = "r2intr";
pub const R2_PROTON: &str = "r2p";
pub const R2_NEUTRON: &str = "r2n";

/// Which rms radius to derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusKind {
    /// Intrinsic matter radius, averaged over all `A` nucleons.
    Matter,
    Proton,
    Neutron,
}

impl RadiusKind {
    fn observable(self) -> &'static str {
        match self {
            RadiusKind::Matter => R2_INTRINSIC,
            RadiusKind::Proton => R2_PROTON,
            RadiusKind::Neutron => R2_NEUTRON,
        }
    }

    /// Run parameter holding the particle count the sum runs over.
    fn count_param(self) -> &'static str {
        match self {
            RadiusKind::Matter => "A",
            RadiusKind::Proton => "Z",
            RadiusKind::Neutron => "N",
        }
    }
}

impl FromStr for RadiusKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(RadiusKind::Matter),
            "rp" => Ok(RadiusKind::Proton),
            "rn" => Ok(RadiusKind::Neutron),
            other => Err(QueryError::UnsupportedRadiusKind(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

// Every accessor resolves "absent observable", "absent pair", and
// "ordinal out of range" to `None`/default; nothing else is absorbed.
impl ResultsDataset {
    /// RME matrix of `observable` between the subspaces of `pair`, in the
    /// requested order and in group-theory convention. `None` if the
    /// canonical pair is not stored.
    pub fn get_rme_matrix(&self, observable: &str, pair: SubspacePair) -> Option<Array2<f64>> {
        let canonicalization = canonicalize(pair, RmeConvention::GroupTheory);
        let stored = self.stored_observable(observable, &canonicalization.pair)?;
        Some(canonicalization.apply(stored.view()))
    }

    /// Single RME `<bra||observable||ket>` in `convention`, or `None`.
    pub fn rme(
        &self,
        observable: &str,
        bra: StateQn,
        ket: StateQn,
        convention: RmeConvention,
    ) -> Option<f64> {
        let pair = SubspacePair::new(bra.subspace(), ket.subspace());
        let canonicalization = canonicalize(pair, RmeConvention::GroupTheory);
        trace!(
            "looking up {observable} {bra}<-{ket} in {}",
            canonicalization.pair
        );
        let stored = self.stored_observable(observable, &canonicalization.pair)?;
        let rme_gt = canonicalization.element(stored.view(), bra.index()?, ket.index()?)?;
        Some(convention.convert_group_theory(rme_gt, bra.j))
    }

    /// Racah-convention RME, or `default` if it is not available.
    pub fn get_rme(&self, observable: &str, (bra, ket): (StateQn, StateQn), default: f64) -> f64 {
        self.rme(observable, bra, ket, RmeConvention::Racah)
            .unwrap_or(default)
    }

    /// Reduced transition probability `B = <bra||T||ket>_Racah^2 / (2 J_ket + 1)`,
    /// or `default` if the RME is not available.
    pub fn get_rtp(&self, observable: &str, (bra, ket): (StateQn, StateQn), default: f64) -> f64 {
        self.rme(observable, bra, ket, RmeConvention::Racah)
            .map(|rme| rme.powi(2) / ket.j.multiplicity())
            .unwrap_or(default)
    }

    /// RMS radius of state `qn`: `sqrt(<qn||r2||qn>_gt / count)`.
    ///
    /// Fails only for an unrecognized `kind`; missing observables or
    /// particle counts give `default`.
    pub fn get_radius(&self, kind: &str, qn: StateQn, default: f64) -> Result<f64, QueryError> {
        let kind: RadiusKind = kind.parse()?;
        Ok(self.radius(kind, qn).unwrap_or(default))
    }

    pub fn radius(&self, kind: RadiusKind, qn: StateQn) -> Option<f64> {
        let sum_sqr_radius = self.rme(kind.observable(), qn, qn, RmeConvention::GroupTheory)?;
        let count = self.param(kind.count_param())?.as_f64()?;
        Some((sum_sqr_radius / count).sqrt())
    }

    /// Column of decomposition `kind` belonging to state `qn`, or `None`.
    pub fn get_decomposition(&self, kind: &str, qn: StateQn) -> Option<Array1<f64>> {
        let array = self.decompositions.get(kind)?.get(&qn.subspace())?;
        let column = qn.index()?;
        if column >= array.ncols() {
            return None;
        }
        Some(array.column(column).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldValue;
    use crate::results::quantum::{HalfInt, SubspaceLabel};
    use ndarray::array;

    fn qn(j: f64, g: u8, n: usize) -> StateQn {
        StateQn::from_f64(j, g, n).unwrap()
    }

    fn label(j: f64, g: u8) -> SubspaceLabel {
        SubspaceLabel::new(HalfInt::try_from(j).unwrap(), g)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    /// 0+ (two states) and 2+ (one state), with E2 and r2intr matrices.
    fn sample() -> ResultsDataset {
        let mut ds = ResultsDataset::new();
        ds.params.insert("A".to_string(), FieldValue::Int(8));
        ds.params.insert("Z".to_string(), FieldValue::Int(2));
        ds.insert_observable(
            "E2p",
            SubspacePair::new(label(0.0, 0), label(2.0, 0)),
            array![[1.5], [0.5]],
        )
        .unwrap();
        ds.insert_observable(
            R2_INTRINSIC,
            SubspacePair::new(label(0.0, 0), label(0.0, 0)),
            array![[32.0, 0.1], [0.1, 50.0]],
        )
        .unwrap();
        ds.set_decomposition(
            "Nex",
            label(0.0, 0),
            array![[0.9, 0.2], [0.1, 0.8]],
        );
        ds
    }

    #[test]
    fn canonical_request_returns_stored_matrix() {
        let ds = sample();
        let m = ds
            .get_rme_matrix("E2p", SubspacePair::new(label(0.0, 0), label(2.0, 0)))
            .unwrap();
        assert_eq!(m, array![[1.5], [0.5]]);
    }

    #[test]
    fn flipped_request_is_phase_times_transpose() {
        let ds = sample();
        let forward = SubspacePair::new(label(0.0, 0), label(2.0, 0));
        let flipped = ds.get_rme_matrix("E2p", forward.swapped()).unwrap();
        let factor = RmeConvention::GroupTheory
            .exchange_factor(HalfInt::from_twice(4), HalfInt::from_twice(0));
        let expected = ds.get_rme_matrix("E2p", forward).unwrap().t().mapv(|x| factor * x);
        assert_eq!(flipped.dim(), (1, 2));
        for (a, b) in flipped.iter().zip(expected.iter()) {
            assert!(close(*a, *b));
        }
    }

    #[test]
    fn missing_matrix_is_none() {
        let ds = sample();
        assert!(ds
            .get_rme_matrix("M1", SubspacePair::new(label(0.0, 0), label(2.0, 0)))
            .is_none());
        assert!(ds
            .get_rme_matrix("E2p", SubspacePair::new(label(0.0, 0), label(4.0, 0)))
            .is_none());
    }

    #[test]
    fn rme_converts_to_racah() {
        let ds = sample();
        let rme = ds.get_rme("E2p", (qn(0.0, 0, 2), qn(2.0, 0, 1)), f64::NAN);
        assert!(close(rme, 0.5));

        // reverse direction: <2||E2||0>_Racah = <0||E2||2>_Racah for ΔJ = 2
        let rme = ds.get_rme("E2p", (qn(2.0, 0, 1), qn(0.0, 0, 1)), f64::NAN);
        assert!(close(rme, 1.5));

        let gt = ds
            .rme("E2p", qn(2.0, 0, 1), qn(0.0, 0, 1), RmeConvention::GroupTheory)
            .unwrap();
        assert!(close(gt, 1.5 / 5f64.sqrt()));
    }

    #[test]
    fn rtp_divides_by_initial_multiplicity() {
        let ds = sample();
        let b_down = ds.get_rtp("E2p", (qn(0.0, 0, 1), qn(2.0, 0, 1)), f64::NAN);
        assert!(close(b_down, 1.5 * 1.5 / 5.0));
        let b_up = ds.get_rtp("E2p", (qn(2.0, 0, 1), qn(0.0, 0, 1)), f64::NAN);
        assert!(close(b_up, 1.5 * 1.5));
    }

    #[test]
    fn absent_data_yields_default() {
        let ds = sample();
        let pair = (qn(0.0, 0, 1), qn(2.0, 0, 1));
        assert!(ds.get_rme("M1", pair, f64::NAN).is_nan());
        assert!(ds.get_rtp("M1", pair, f64::NAN).is_nan());
        assert_eq!(ds.get_rme("E2p", (qn(0.0, 0, 1), qn(4.0, 0, 1)), -1.0), -1.0);
        // ordinal beyond the subspace, and the invalid ordinal 0
        assert_eq!(ds.get_rme("E2p", (qn(0.0, 0, 3), qn(2.0, 0, 1)), -1.0), -1.0);
        assert_eq!(ds.get_rtp("E2p", (qn(0.0, 0, 0), qn(2.0, 0, 1)), -1.0), -1.0);
    }

    #[test]
    fn matter_radius_averages_over_nucleons() {
        let ds = sample();
        let r = ds.get_radius("r", qn(0.0, 0, 1), f64::NAN).unwrap();
        assert!(close(r, 2.0));
        let r = ds.get_radius("r", qn(0.0, 0, 2), f64::NAN).unwrap();
        assert!(close(r, (50.0f64 / 8.0).sqrt()));
        assert!(ds.get_radius("r", qn(2.0, 0, 1), f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn proton_radius_defaults_without_r2p() {
        let ds = sample();
        assert_eq!(ds.get_radius("rp", qn(0.0, 0, 1), -1.0).unwrap(), -1.0);
        assert_eq!(ds.get_radius("rn", qn(0.0, 0, 1), -1.0).unwrap(), -1.0);

        let mut ds = ds;
        ds.insert_observable(
            R2_PROTON,
            SubspacePair::new(label(0.0, 0), label(0.0, 0)),
            array![[8.0, 0.0], [0.0, 9.0]],
        )
        .unwrap();
        let rp = ds.get_radius("rp", qn(0.0, 0, 1), f64::NAN).unwrap();
        assert!(close(rp, 2.0));
    }

    #[test]
    fn unknown_radius_kind_is_an_error() {
        let ds = sample();
        let err = ds.get_radius("rm", qn(0.0, 0, 1), f64::NAN).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedRadiusKind(ref k) if k == "rm"));
    }

    #[test]
    fn decomposition_column_per_state() {
        let ds = sample();
        assert_eq!(
            ds.get_decomposition("Nex", qn(0.0, 0, 2)),
            Some(array![0.2, 0.8])
        );
        assert_eq!(ds.get_decomposition("Nex", qn(0.0, 0, 3)), None);
        assert_eq!(ds.get_decomposition("Nex", qn(2.0, 0, 1)), None);
        assert_eq!(ds.get_decomposition("omega", qn(0.0, 0, 1)), None);
    }
}
