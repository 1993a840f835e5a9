//! Reference curves for the native engine.
//!
//! Deterministic closed-form stand-ins for the upstream library's numerics:
//! every derived quantity is a smooth function of its grid and of the
//! effective configuration. The shapes follow the standard halo-model
//! phenomenology closely enough for plotting and export to be exercised
//! end to end, but make no claim of physical accuracy.

use crate::domain::engine::AxisKind;

const RHO_CRIT: f64 = 2.775e11; // Msun h^2 / Mpc^3
const LN10: f64 = std::f64::consts::LN_10;

/// Scalars pulled out of the resolved configuration.
#[derive(Debug, Clone)]
pub struct EffectiveParams {
    pub z: f64,
    pub n: f64,
    pub sigma_8: f64,
    pub delta_c: f64,
    pub om0: f64,
    pub h0: f64,
    pub takahashi: bool,
    pub mmin: f64,
    pub mmax: f64,
    pub dlog10m: f64,
    pub lnk_min: f64,
    pub lnk_max: f64,
    pub dlnk: f64,
    pub rmin: f64,
    pub rmax: f64,
    pub hm_logk_min: f64,
    pub hm_logk_max: f64,
    pub wdm_mass: f64,
    /// HOD occupation thresholds (log10 mass).
    pub hod_m_min: f64,
    pub hod_m_1: f64,
    pub hod_alpha: f64,
    pub hod_central: bool,
    /// Concentration normalisation and slope.
    pub conc_a: f64,
    pub conc_b: f64,
    /// Whether the bias model produces a scale-dependent correction.
    pub unity_bias: bool,
}

impl EffectiveParams {
    fn growth(&self) -> f64 {
        1.0 / (1.0 + self.z)
    }

    fn rho_mean(&self) -> f64 {
        RHO_CRIT * self.om0
    }

    /// Mass variance on scale m, normalised to sigma_8 at ~1e13 Msun/h.
    fn sigma(&self, m: f64) -> f64 {
        let slope = (self.n + 3.0) / 6.0;
        let mut sigma = self.sigma_8 * self.growth() * (m / 1e13).powf(-slope / 2.0);
        if self.wdm_mass > 0.0 {
            // Free-streaming suppresses variance below the half-mode mass.
            let m_hm = 1e10 * self.wdm_mass.powf(-3.33);
            sigma /= 1.0 + (m_hm / m).powf(0.6);
        }
        sigma
    }

    fn nu(&self, m: f64) -> f64 {
        self.delta_c / self.sigma(m)
    }

    /// Universal fitting form (Sheth-Tormen shape).
    fn fsigma(&self, m: f64) -> f64 {
        let a = 0.707;
        let p = 0.3;
        let big_a = 0.3222;
        let nu = self.nu(m);
        let anu2 = a * nu * nu;
        big_a * (2.0 * a / std::f64::consts::PI).sqrt()
            * nu
            * (1.0 + anu2.powf(-p))
            * (-anu2 / 2.0).exp()
    }

    fn dndm(&self, m: f64) -> f64 {
        // |dln sigma / dln m| is constant for the power-law variance above.
        let dlnsdlnm = (self.n + 3.0) / 12.0;
        self.fsigma(m) * self.rho_mean() / (m * m) * dlnsdlnm
    }

    /// Linear transfer function (BBKS shape).
    fn transfer(&self, k: f64) -> f64 {
        let q = k / (self.om0 * self.h0 / 100.0);
        let t = (1.0 + 2.34 * q).ln() / (2.34 * q)
            * (1.0 + 3.89 * q + (16.1 * q).powi(2) + (5.46 * q).powi(3) + (6.71 * q).powi(4))
                .powf(-0.25);
        if self.wdm_mass > 0.0 {
            let alpha = 0.05 / self.wdm_mass;
            t * (1.0 + (alpha * k).powi(2)).powf(-5.0)
        } else {
            t
        }
    }

    fn power(&self, k: f64) -> f64 {
        let t = self.transfer(k);
        let norm = 2.2e5 * (self.sigma_8 * self.growth()).powi(2);
        norm * k.powf(self.n) * t * t
    }

    fn central_occupation(&self, m: f64) -> f64 {
        if !self.hod_central {
            return 1.0;
        }
        let x = (m.log10() - self.hod_m_min) / 0.3;
        0.5 * (1.0 + erf_approx(x))
    }

    fn satellite_occupation(&self, m: f64) -> f64 {
        let m1 = 10f64.powf(self.hod_m_1);
        (m / m1).powf(self.hod_alpha)
    }

    fn bias(&self, m: f64) -> f64 {
        if self.unity_bias {
            return 1.0;
        }
        let nu = self.nu(m);
        1.0 + (nu * nu - 1.0) / self.delta_c
    }

    fn correlation(&self, r: f64) -> f64 {
        let r0 = 5.0 * self.sigma_8 * self.growth();
        (r / r0).powf(-1.8)
    }

    /// The configuration values the grid for `axis` is built from.
    pub fn grid_inputs(&self, axis: AxisKind) -> [f64; 3] {
        match axis {
            AxisKind::M => [self.mmin, self.mmax, self.dlog10m],
            AxisKind::K => [self.lnk_min, self.lnk_max, self.dlnk],
            AxisKind::R => [self.rmin, self.rmax, 0.0],
            AxisKind::KHm => [self.hm_logk_min, self.hm_logk_max, 0.0],
        }
    }

    /// Whether every input to [`compute`] other than the grids matches. Grid
    /// bounds of one axis never feed another axis's curves, so two
    /// parameter sets agreeing here produce identical values on any shared
    /// grid.
    pub fn same_physics(&self, other: &Self) -> bool {
        self.z == other.z
            && self.n == other.n
            && self.sigma_8 == other.sigma_8
            && self.delta_c == other.delta_c
            && self.om0 == other.om0
            && self.h0 == other.h0
            && self.takahashi == other.takahashi
            && self.wdm_mass == other.wdm_mass
            && self.hod_m_min == other.hod_m_min
            && self.hod_m_1 == other.hod_m_1
            && self.hod_alpha == other.hod_alpha
            && self.hod_central == other.hod_central
            && self.conc_a == other.conc_a
            && self.conc_b == other.conc_b
            && self.unity_bias == other.unity_bias
    }
}

// Abramowitz-Stegun rational approximation, good to ~1e-7.
fn erf_approx(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let y = 1.0
        - (((((1.061405429 * t - 1.453152027) * t) + 1.421413741) * t - 0.284496736) * t
            + 0.254829592)
            * t
            * (-x * x).exp();
    sign * y
}

fn log10_grid(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let count = ((hi - lo) / step).floor() as usize + 1;
    (0..count).map(|i| 10f64.powf(lo + i as f64 * step)).collect()
}

/// The independent-variable grid for one axis.
pub fn grid(axis: AxisKind, p: &EffectiveParams) -> Vec<f64> {
    match axis {
        AxisKind::M => log10_grid(p.mmin, p.mmax, p.dlog10m),
        AxisKind::K => {
            let count = ((p.lnk_max - p.lnk_min) / p.dlnk).floor() as usize + 1;
            (0..count)
                .map(|i| (p.lnk_min + i as f64 * p.dlnk).exp())
                .collect()
        }
        AxisKind::R => log10_grid(p.rmin.log10(), p.rmax.log10(), 0.05),
        AxisKind::KHm => log10_grid(p.hm_logk_min, p.hm_logk_max, 0.05),
    }
}

/// Compute one derived quantity on grid `x`. `None` when the quantity is not
/// computable under the current configuration.
pub fn compute(name: &str, x: &[f64], p: &EffectiveParams) -> Option<Vec<f64>> {
    let map = |f: &dyn Fn(f64) -> f64| Some(x.iter().map(|&v| f(v)).collect::<Vec<f64>>());

    match name {
        "sigma" => map(&|m| p.sigma(m)),
        "lnsigma" => map(&|m| (1.0 / p.sigma(m)).ln()),
        "n_eff" => map(&|m| -3.0 - (p.n + 3.0) / 2.0 * (m / 1e13).powf(0.01).ln().tanh()),
        "fsigma" => map(&|m| p.fsigma(m)),
        "dndm" => map(&|m| p.dndm(m)),
        "dndlnm" => map(&|m| m * p.dndm(m)),
        "dndlog10m" => map(&|m| LN10 * m * p.dndm(m)),
        "ngtm" => Some(reverse_cumulative(x, &x.iter().map(|&m| p.dndm(m)).collect::<Vec<_>>())),
        "rho_gtm" => Some(reverse_cumulative(
            x,
            &x.iter().map(|&m| m * p.dndm(m)).collect::<Vec<_>>(),
        )),
        "rho_ltm" => {
            let gtm = reverse_cumulative(x, &x.iter().map(|&m| m * p.dndm(m)).collect::<Vec<_>>());
            Some(gtm.iter().map(|v| (p.rho_mean() - v).max(1e-30)).collect())
        }
        "how_big" => {
            let ngtm = reverse_cumulative(x, &x.iter().map(|&m| p.dndm(m)).collect::<Vec<_>>());
            Some(ngtm.iter().map(|n| n.max(1e-30).powf(-1.0 / 3.0)).collect())
        }
        "radii" => map(&|m| (3.0 * m / (4.0 * std::f64::consts::PI * p.rho_mean())).powf(1.0 / 3.0)),
        "halo_bias" => map(&|m| p.bias(m)),
        "cmz_relation" => map(&|m| (p.conc_a * (m / 2e12).powf(p.conc_b) / (1.0 + p.z)).max(1.0)),
        "tracer_cmz_relation" => {
            map(&|m| (0.9 * p.conc_a * (m / 2e12).powf(p.conc_b) / (1.0 + p.z)).max(1.0))
        }
        "central_occupation" => map(&|m| p.central_occupation(m).max(1e-12)),
        "satellite_occupation" => map(&|m| p.satellite_occupation(m).max(1e-12)),
        "total_occupation" => map(&|m| {
            (p.central_occupation(m) * (1.0 + p.satellite_occupation(m))).max(1e-12)
        }),
        "transfer_function" => map(&|k| p.transfer(k)),
        "power" => map(&|k| p.power(k)),
        "delta_k" => map(&|k| k.powi(3) * p.power(k) / (2.0 * std::f64::consts::PI.powi(2))),
        "nonlinear_power" => {
            let boost = if p.takahashi { 1.35 } else { 1.25 };
            map(&|k| p.power(k) * (1.0 + boost * (k / 1.0).powf(1.5) / (1.0 + k * k)))
        }
        "nonlinear_delta_k" => {
            let boost = if p.takahashi { 1.35 } else { 1.25 };
            map(&|k| {
                k.powi(3) * p.power(k) * (1.0 + boost * k.powf(1.5) / (1.0 + k * k))
                    / (2.0 * std::f64::consts::PI.powi(2))
            })
        }
        "corr_linear_mm" => map(&|r| p.correlation(r)),
        "corr_1h_auto_matter" => map(&|r| p.correlation(r) * (-r / 2.0).exp() * 3.0),
        "corr_2h_auto_matter" => map(&|r| p.correlation(r) * (1.0 - (-r / 2.0).exp())),
        "corr_auto_matter" => {
            map(&|r| p.correlation(r) * (3.0 * (-r / 2.0).exp() + 1.0 - (-r / 2.0).exp()))
        }
        "corr_1h_auto_tracer" | "corr_1h_cs_auto_tracer" | "corr_1h_ss_auto_tracer" => {
            let weight = match name {
                "corr_1h_cs_auto_tracer" => 0.6,
                "corr_1h_ss_auto_tracer" => 0.4,
                _ => 1.0,
            };
            map(&|r| weight * 4.0 * p.correlation(r) * (-r / 1.5).exp())
        }
        "corr_2h_auto_tracer" => map(&|r| 1.8 * p.correlation(r) * (1.0 - (-r / 1.5).exp())),
        "corr_auto_tracer" => {
            map(&|r| 4.0 * p.correlation(r) * (-r / 1.5).exp()
                + 1.8 * p.correlation(r) * (1.0 - (-r / 1.5).exp()))
        }
        "corr_1h_cross_tracer_matter" => map(&|r| 2.0 * p.correlation(r) * (-r / 1.8).exp()),
        "corr_2h_cross_tracer_matter" => {
            map(&|r| 1.3 * p.correlation(r) * (1.0 - (-r / 1.8).exp()))
        }
        "corr_cross_tracer_matter" => map(&|r| {
            2.0 * p.correlation(r) * (-r / 1.8).exp()
                + 1.3 * p.correlation(r) * (1.0 - (-r / 1.8).exp())
        }),
        "sd_bias_correction" => {
            if p.unity_bias {
                // Unbiased tracers carry no scale-dependent correction.
                return None;
            }
            map(&|r| 1.0 + 0.15 * (-r / 3.0).exp())
        }
        "power_1h_auto_matter" => map(&|k| p.power(k) * 0.4 * k / (1.0 + k * k)),
        "power_2h_auto_matter" => map(&|k| p.power(k) / (1.0 + 0.2 * k)),
        "power_auto_matter" => {
            map(&|k| p.power(k) * (0.4 * k / (1.0 + k * k) + 1.0 / (1.0 + 0.2 * k)))
        }
        "power_1h_auto_tracer" | "power_1h_cs_auto_tracer" | "power_1h_ss_auto_tracer" => {
            let weight = match name {
                "power_1h_cs_auto_tracer" => 0.6,
                "power_1h_ss_auto_tracer" => 0.4,
                _ => 1.0,
            };
            map(&|k| weight * 2.5 * p.power(k) * 0.4 * k / (1.0 + k * k))
        }
        "power_2h_auto_tracer" => map(&|k| 1.8 * p.power(k) / (1.0 + 0.2 * k)),
        "power_auto_tracer" => map(&|k| {
            2.5 * p.power(k) * 0.4 * k / (1.0 + k * k) + 1.8 * p.power(k) / (1.0 + 0.2 * k)
        }),
        "power_1h_cross_tracer_matter" => map(&|k| 1.6 * p.power(k) * 0.4 * k / (1.0 + k * k)),
        "power_2h_cross_tracer_matter" => map(&|k| 1.35 * p.power(k) / (1.0 + 0.2 * k)),
        "power_cross_tracer_matter" => map(&|k| {
            1.6 * p.power(k) * 0.4 * k / (1.0 + k * k) + 1.35 * p.power(k) / (1.0 + 0.2 * k)
        }),
        _ => None,
    }
}

/// Reverse cumulative trapezoid integral: out[i] = integral from x[i] to the
/// end of the grid.
fn reverse_cumulative(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; x.len()];
    for i in (0..x.len().saturating_sub(1)).rev() {
        let dx = x[i + 1] - x[i];
        out[i] = out[i + 1] + 0.5 * (y[i] + y[i + 1]) * dx;
    }
    // Keep the last bin strictly positive so log-scaled plots stay finite.
    if !out.is_empty() {
        let floor = out[out.len().saturating_sub(2)].max(1e-30) * 1e-3;
        let last = out.len() - 1;
        out[last] = floor;
    }
    out
}
