//! siunitx unit, prefix and structural macros.
//!
//! Plain template substitutions. Values are math-mode markup; `#1` marks a
//! positional argument. Some units expand to other unit macros (`\dBV`) and
//! rely on the host re-expanding the result.

use phf::phf_map;

/// SI prefixes
pub static SI_PREFIXES: phf::Map<&'static str, &'static str> = phf_map! {
    "\\tera" => "\\text{T}",
    "\\giga" => "\\text{G}",
    "\\mega" => "\\text{M}",
    "\\kilo" => "\\text{k}",
    "\\dezi" => "\\text{d}",
    "\\centi" => "\\text{c}",
    "\\milli" => "\\text{m}",
    "\\micro" => "\\text{μ}",
    "\\nano" => "\\text{n}",
    "\\pico" => "\\text{p}",
};

/// Units, base and derived
pub static SI_UNITS: phf::Map<&'static str, &'static str> = phf_map! {
    "\\kilogram" => "\\text{kg}",
    "\\gram" => "\\text{g}",
    "\\meter" => "\\text{m}",
    "\\second" => "\\text{s}",
    "\\hour" => "\\text{h}",
    "\\ampere" => "\\text{A}",
    "\\kelvin" => "\\text{K}",
    "\\mol" => "\\text{mol}",
    "\\bel" => "\\text{B}",
    "\\dezibel" => "\\text{dB}",
    "\\dB" => "\\text{dB}",
    "\\dBm" => "\\text{dBm}",
    "\\dBu" => "\\text{dBu}",
    "\\dBV" => "\\text{dB}\\volt",
    "\\dBuV" => "\\text{dB}\\micro\\volt",
    "\\dBW" => "\\text{dBW}",
    "\\dBi" => "\\text{dBi}",
    "\\dBd" => "\\text{dBd}",
    "\\candela" => "\\text{cd}",
    "\\newton" => "\\text{N}",
    "\\hertz" => "\\text{Hz}",
    "\\pascal" => "\\text{Pa}",
    "\\volt" => "\\text{V}",
    "\\watt" => "\\text{W}",
    "\\joule" => "\\text{J}",
    "\\henry" => "\\text{H}",
    "\\farad" => "\\text{F}",
    "\\coulomb" => "\\text{C}",
    "\\ohm" => "\\Omega",
    "\\Ohm" => "\\Omega",
    "\\weber" => "\\text{Wb}",
    "\\tesla" => "\\text{T}",
    "\\bit" => "\\text{b}",
    "\\baud" => "\\text{Bd}",
    "\\degreeCelsius" => "\\,\\degree\\text{C}",
    "\\liter" => "\\text{l}",
    "\\oszidiv" => "\\text{div}",
    "\\sps" => "\\text{sps}",
};

/// Unit composition helpers
pub static SI_STRUCTURE: phf::Map<&'static str, &'static str> = phf_map! {
    "\\unit" => "{\\mathrm{#1}}",
    "\\squared" => "{^{2}}",
    "\\cubed" => "{^{3}}",
    "\\per" => "/",
    "\\percent" => "\\%",
    "\\ppm" => "\\text{ppm}",
};

/// Look up a template in all three tables
pub fn lookup_template(name: &str) -> Option<&'static str> {
    SI_STRUCTURE
        .get(name)
        .or_else(|| SI_PREFIXES.get(name))
        .or_else(|| SI_UNITS.get(name))
        .copied()
}

/// Iterate over every template entry
pub fn templates() -> impl Iterator<Item = (&'static str, &'static str)> {
    SI_STRUCTURE
        .entries()
        .chain(SI_PREFIXES.entries())
        .chain(SI_UNITS.entries())
        .map(|(k, v)| (*k, *v))
}
