//! Built-in results filename formats.
//!
//! Each format is a literal, versioned grammar. Changing field order,
//! delimiters, or optional groups means adding a new format name here, never
//! editing an existing grammar.

use super::grammar::{Conversion, RegexFormat};
use super::registry::FormatRegistry;
use crate::error::DescriptorError;

// Shared pieces of the MFDn descriptor.
const MFDN_NUCLIDE_AND_INTERACTION: &str = concat!(
    r"Z(?P<Z>\d+)-N(?P<N>\d+)",
    r"-(?P<interaction>[^\-]+)-coul(?P<coulomb>\d)",
    r"-hw(?P<hw>[\d\.]+)",
    r"-a_cm(?P<lawson>[\d\.]+)",
);
const MFDN_LANCZOS: &str = concat!(
    r"-Mj(?P<Mj>[\d\.]+)",
    r"-lan(?P<lanczos>\d+)",
    r"-tol(?P<tolerance>\d+\.\d+[eE][+-]\d+)",
);
const NATURAL_ORBITALS: &str =
    r"((?P<natural_orbital_flag>-natorb)-no(?P<natural_orbital_iteration>\d+))?";

// ---------------------------------------------------------------------------
// MFDn format 6, harmonic oscillator basis
// ---------------------------------------------------------------------------

/// `run<id>-mfdn-Z<Z>-N<N>-<int>-coul<c>-hw<hw>-a_cm<L>-Nmax<Nmax>[x][-fci]-Mj<Mj>-lan<n>-tol<tol>.res`
pub fn mfdn_format_6_ho() -> RegexFormat {
    const CONVERSIONS: &[(&str, Conversion)] = &[
        ("Z", Conversion::Int),
        ("N", Conversion::Int),
        ("coulomb", Conversion::Int),
        ("hw", Conversion::Float),
        ("lawson", Conversion::Float),
        ("Nmax", Conversion::Int),
        ("mixed_parity_flag", Conversion::Flag("x")),
        ("fci_flag", Conversion::Flag("-fci")),
        ("Mj", Conversion::Float),
        ("lanczos", Conversion::Int),
    ];
    let pattern = format!(
        r"run(?P<run>\w+)-(?P<code_name>mfdn)-(?P<descriptor>{MFDN_NUCLIDE_AND_INTERACTION}-Nmax(?P<Nmax>\d+)(?P<mixed_parity_flag>x)?(?P<fci_flag>-fci)?{MFDN_LANCZOS})\.res"
    );
    RegexFormat::new("mfdn_format_6_ho", &pattern, CONVERSIONS)
        .expect("format 6 grammar is a valid regex")
}

// ---------------------------------------------------------------------------
// MFDn format 7, harmonic oscillator basis (or natural orbitals built on it)
// ---------------------------------------------------------------------------

/// Format 6 with a variable code name (`mfdn`, `mfdn15`, ...) and an optional
/// `-natorb-no<i>` suffix.
pub fn mfdn_format_7_ho() -> RegexFormat {
    const CONVERSIONS: &[(&str, Conversion)] = &[
        ("Z", Conversion::Int),
        ("N", Conversion::Int),
        ("coulomb", Conversion::Int),
        ("hw", Conversion::Float),
        ("lawson", Conversion::Float),
        ("Nmax", Conversion::Int),
        ("mixed_parity_flag", Conversion::Flag("x")),
        ("fci_flag", Conversion::Flag("-fci")),
        ("Mj", Conversion::Float),
        ("lanczos", Conversion::Int),
        ("natural_orbital_flag", Conversion::Flag("-natorb")),
        ("natural_orbital_iteration", Conversion::OptionalInt),
    ];
    let pattern = format!(
        r"run(?P<run>\w+)-(?P<code_name>[^\-]+)-(?P<descriptor>{MFDN_NUCLIDE_AND_INTERACTION}-Nmax(?P<Nmax>\d+)(?P<mixed_parity_flag>x)?(?P<fci_flag>-fci)?{MFDN_LANCZOS}{NATURAL_ORBITALS})\.res"
    );
    RegexFormat::new("mfdn_format_7_ho", &pattern, CONVERSIONS)
        .expect("format 7 grammar is a valid regex")
}

// ---------------------------------------------------------------------------
// MFDn format 8, weight-truncated basis
// ---------------------------------------------------------------------------

/// Basis truncation by weight `an + bl` per orbital, with many-body weight
/// cutoff and explicit parity (`+1`, `-1`, or `0` for both).
pub fn mfdn_format_8() -> RegexFormat {
    const CONVERSIONS: &[(&str, Conversion)] = &[
        ("Z", Conversion::Int),
        ("N", Conversion::Int),
        ("coulomb", Conversion::Int),
        ("hw", Conversion::Float),
        ("lawson", Conversion::Float),
        ("n_coefficient", Conversion::Float),
        ("l_coefficient", Conversion::Float),
        ("sp_weight_max", Conversion::Float),
        ("fci_flag", Conversion::Flag("-FCI")),
        ("mb_weight_max", Conversion::Float),
        ("parity", Conversion::Int),
        ("Mj", Conversion::Float),
        ("lanczos", Conversion::Int),
        ("natural_orbital_flag", Conversion::Flag("-natorb")),
        ("natural_orbital_iteration", Conversion::OptionalInt),
    ];
    let pattern = format!(
        concat!(
            r"run(?P<run>\w+)-(?P<code_name>[^\-]+)-(?P<descriptor>{nuclide}",
            r"-an(?P<n_coefficient>[\d\.]+)-bl(?P<l_coefficient>[\d\.]+)",
            r"-spWTmax(?P<sp_weight_max>[\d\.]+)(?P<fci_flag>-FCI)?",
            r"-WTmax(?P<mb_weight_max>[\d\.]+)-parity(?P<parity>[+\-]1|0)",
            r"{lanczos}{natorb})\.res"
        ),
        nuclide = MFDN_NUCLIDE_AND_INTERACTION,
        lanczos = MFDN_LANCZOS,
        natorb = NATURAL_ORBITALS,
    );
    RegexFormat::new("mfdn_format_8", &pattern, CONVERSIONS)
        .expect("format 8 grammar is a valid regex")
}

// ---------------------------------------------------------------------------
// SpNCCI format 1
// ---------------------------------------------------------------------------

/// `run<id>-spncci-Z<Z>-N<N>-Nsigmamax<n>-Nstep<s>-<int>-coul<c>[-hw<hw>].res`
///
/// The oscillator length is only present for single-mesh-point runs.
pub fn spncci_format_1() -> RegexFormat {
    const CONVERSIONS: &[(&str, Conversion)] = &[
        ("Z", Conversion::Int),
        ("N", Conversion::Int),
        ("Nsigmamax", Conversion::Int),
        ("Nstep", Conversion::Int),
        ("coulomb", Conversion::Int),
        ("hw", Conversion::OptionalFloat),
    ];
    let pattern = concat!(
        r"run(?P<run>\w+)-(?P<code_name>spncci)-(?P<descriptor>",
        r"Z(?P<Z>\d+)-N(?P<N>\d+)-Nsigmamax(?P<Nsigmamax>\d+)-Nstep(?P<Nstep>\d+)",
        r"-(?P<interaction>[^\-]+)-coul(?P<coulomb>\d)(-hw(?P<hw>[\d\.]+))?",
        r")\.res"
    );
    RegexFormat::new("spncci_format_1", pattern, CONVERSIONS)
        .expect("SpNCCI format 1 grammar is a valid regex")
}

/// Register every built-in format. Called once at startup.
pub fn register_builtin(registry: &mut FormatRegistry) -> Result<(), DescriptorError> {
    for format in [
        mfdn_format_6_ho(),
        mfdn_format_7_ho(),
        mfdn_format_8(),
        spncci_format_1(),
    ] {
        registry.register(format.name(), format)?;
    }
    Ok(())
}
