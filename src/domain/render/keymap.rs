//! Derived-quantity table: axis, labels and scaling per quantity.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::domain::engine::AxisKind;
use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Linear,
    Log,
}

/// Plot metadata of one derived quantity.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityMeta {
    pub axis: AxisKind,
    pub ylabel: &'static str,
    pub yscale: Scale,
    /// Log base of the y axis; comparison quantities use base 2.
    pub ybase: u32,
    /// Human-readable name shown in the plot-choice selector.
    pub choice_label: &'static str,
}

fn meta(axis: AxisKind, ylabel: &'static str, yscale: Scale, choice_label: &'static str) -> QuantityMeta {
    QuantityMeta {
        axis,
        ylabel,
        yscale,
        ybase: 10,
        choice_label,
    }
}

/// All plain derived quantities, in selector order.
pub static KEYMAP: Lazy<IndexMap<&'static str, QuantityMeta>> = Lazy::new(|| {
    use AxisKind::{K, KHm, M, R};
    use Scale::{Linear, Log};

    let mut map = IndexMap::new();
    let mut add = |key, m| {
        map.insert(key, m);
    };

    add("dndm", meta(M, "Mass Function dn/dM [h^4 Mpc^-3 Msun^-1]", Log, "dn/dm"));
    add("dndlnm", meta(M, "Mass Function dn/dln(M) [h^3 Mpc^-3]", Log, "dn/dln(m)"));
    add("dndlog10m", meta(M, "Mass Function dn/dlog10(M) [h^3 Mpc^-3]", Log, "dn/dlog10(m)"));
    add("fsigma", meta(M, "f(sigma) = nu f(nu)", Linear, "f(sigma)"));
    add("sigma", meta(M, "Mass Variance, sigma", Linear, "sigma (mass variance)"));
    add("lnsigma", meta(M, "ln(1/sigma)", Linear, "ln(1/sigma)"));
    add("n_eff", meta(M, "Effective Spectral Index, n_eff", Linear, "Effective Spectral Index"));
    add("ngtm", meta(M, "n(>M) [h^3 Mpc^-3]", Log, "n(>m)"));
    add("rho_ltm", meta(M, "rho(<M) [Msun h^2 Mpc^-3]", Linear, "rho(<m)"));
    add("rho_gtm", meta(M, "rho(>M) [Msun h^2 Mpc^-3]", Log, "rho(>m)"));
    add("how_big", meta(M, "Box Size, L [Mpc/h]", Log, "Box size for one halo"));
    add("radii", meta(M, "Radius [Mpc/h]", Log, "Radii of spherical regions"));
    add("transfer_function", meta(K, "T(k) [Mpc^3 h^-3]", Log, "Transfer Function"));
    add("power", meta(K, "P(k) [Mpc^3 h^-3]", Log, "Power Spectrum"));
    add("delta_k", meta(K, "Delta(k)", Log, "Dimensionless Power Spectrum"));
    add("nonlinear_delta_k", meta(K, "Delta^2_halofit(k)", Log, "Non-linear dimensionless power spectrum (HALOFIT)"));
    add("nonlinear_power", meta(K, "P_halofit(k) [Mpc^3 h^-3]", Log, "Non-linear power spectrum (HALOFIT)"));
    add("halo_bias", meta(M, "Halo Bias", Log, "Halo Bias"));
    add("cmz_relation", meta(M, "Halo Concentration", Log, "Halo Concentration-Mass Relation"));
    add("tracer_cmz_relation", meta(M, "Tracer Concentration", Log, "Tracer concentration-mass relation"));
    add("central_occupation", meta(M, "Central Tracer Occupation", Log, "Occupation of central component"));
    add("satellite_occupation", meta(M, "Satellite Tracer Occupation", Log, "Occupation of satellite component"));
    add("total_occupation", meta(M, "Total Tracer Occupation", Log, "Tracer occupation"));
    add("corr_linear_mm", meta(R, "Linear matter correlation", Log, "Linear matter correlation function"));
    add("corr_1h_auto_matter", meta(R, "1-halo matter correlation", Log, "1-halo matter-matter correlation function"));
    add("corr_2h_auto_matter", meta(R, "2-halo matter correlation", Log, "2-halo matter-matter correlation function"));
    add("corr_auto_matter", meta(R, "Matter correlation", Log, "Matter-matter correlation function"));
    add("corr_1h_auto_tracer", meta(R, "1-halo tracer correlation", Log, "1-halo tracer-tracer correlation function"));
    add("corr_2h_auto_tracer", meta(R, "2-halo tracer correlation", Log, "2-halo tracer-tracer correlation function"));
    add("corr_auto_tracer", meta(R, "Tracer correlation", Log, "Tracer-tracer correlation function"));
    add("corr_1h_cs_auto_tracer", meta(R, "1-halo central-satellite tracer correlation", Log, "1-halo central-satellite tracer correlation function"));
    add("corr_1h_ss_auto_tracer", meta(R, "1-halo satellite-satellite tracer correlation", Log, "1-halo satellite-satellite tracer correlation function"));
    add("corr_1h_cross_tracer_matter", meta(R, "1-halo matter-tracer correlation", Linear, "1-halo matter-tracer correlation function"));
    add("corr_2h_cross_tracer_matter", meta(R, "2-halo matter-tracer correlation", Log, "2-halo matter-tracer correlation function"));
    add("corr_cross_tracer_matter", meta(R, "Matter-tracer correlation", Log, "Matter-tracer correlation function"));
    add("sd_bias_correction", meta(R, "Scale-dependent bias correction", Linear, "Scale-dependent bias correction"));
    add("power_1h_auto_matter", meta(KHm, "1-halo matter P(k) [Mpc^3 h^-3]", Log, "1-halo matter-matter power spectrum"));
    add("power_2h_auto_matter", meta(KHm, "2-halo matter P(k) [Mpc^3 h^-3]", Log, "2-halo matter-matter power spectrum"));
    add("power_auto_matter", meta(KHm, "Matter P(k) [Mpc^3 h^-3]", Log, "Matter-matter power spectrum"));
    add("power_1h_auto_tracer", meta(KHm, "1-halo tracer P(k) [Mpc^3 h^-3]", Log, "1-halo tracer-tracer power spectrum"));
    add("power_2h_auto_tracer", meta(KHm, "2-halo tracer P(k) [Mpc^3 h^-3]", Log, "2-halo tracer-tracer power spectrum"));
    add("power_auto_tracer", meta(KHm, "Tracer P(k) [Mpc^3 h^-3]", Log, "Tracer power spectrum"));
    add("power_1h_cs_auto_tracer", meta(KHm, "1-halo cen-sat tracer P(k) [Mpc^3 h^-3]", Log, "1-halo central-satellite tracer power spectrum"));
    add("power_1h_ss_auto_tracer", meta(KHm, "1-halo sat-sat tracer P(k) [Mpc^3 h^-3]", Log, "1-halo satellite-satellite tracer power spectrum"));
    add("power_1h_cross_tracer_matter", meta(KHm, "1-halo matter-tracer P(k) [Mpc^3 h^-3]", Log, "1-halo tracer-matter power spectrum"));
    add("power_2h_cross_tracer_matter", meta(KHm, "2-halo matter-tracer P(k) [Mpc^3 h^-3]", Log, "2-halo matter-tracer power spectrum"));
    add("power_cross_tracer_matter", meta(KHm, "Matter-tracer P(k) [Mpc^3 h^-3]", Log, "Matter-tracer power spectrum"));

    map
});

/// A quantity name resolved against the keymap, handling the `comparison_`
/// prefix.
#[derive(Debug, Clone)]
pub struct ResolvedQuantity {
    /// The underlying attribute name on the model instance.
    pub base: String,
    pub comparison: bool,
    pub meta: QuantityMeta,
}

/// Resolve a requested quantity name.
pub fn resolve(quantity: &str) -> Result<ResolvedQuantity, DomainError> {
    let (base, comparison) = match quantity.strip_prefix("comparison_") {
        Some(base) => (base, true),
        None => (quantity, false),
    };

    let meta = KEYMAP
        .get(base)
        .ok_or_else(|| DomainError::not_found(format!("unknown quantity '{quantity}'")))?;

    let mut meta = meta.clone();
    if comparison {
        // Ratios hover around unity; a base-2 log axis reads best.
        meta.yscale = Scale::Log;
        meta.ybase = 2;
    }

    Ok(ResolvedQuantity {
        base: base.to_string(),
        comparison,
        meta,
    })
}
