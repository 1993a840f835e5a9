//! Static component schema tables.
//!
//! One entry per pluggable component, generated from the upstream library's
//! public default-parameter tables. Variant parameter sets list only scalar
//! defaults; parameters whose upstream default is a nested mapping or null are
//! not exposed as form fields and therefore do not appear here.

use super::{ComponentSchema, ParamDefault, ParamKind, SchemaRegistry, Variant, VariantParameterSpec};

fn float(name: &str, default: f64) -> VariantParameterSpec {
    VariantParameterSpec {
        name: name.to_string(),
        default: ParamDefault::Float(default),
        kind: ParamKind::Float {
            min: None,
            max: None,
        },
        label: None,
    }
}

fn float_bounded(name: &str, default: f64, min: f64, max: f64) -> VariantParameterSpec {
    VariantParameterSpec {
        name: name.to_string(),
        default: ParamDefault::Float(default),
        kind: ParamKind::Float {
            min: Some(min),
            max: Some(max),
        },
        label: None,
    }
}

fn boolean(name: &str, default: bool) -> VariantParameterSpec {
    VariantParameterSpec {
        name: name.to_string(),
        default: ParamDefault::Bool(default),
        kind: ParamKind::Bool,
        label: None,
    }
}

fn choice(name: &str, default: &str, choices: &[(&str, &str)]) -> VariantParameterSpec {
    VariantParameterSpec {
        name: name.to_string(),
        default: ParamDefault::Str(default.to_string()),
        kind: ParamKind::Choice {
            choices: choices
                .iter()
                .map(|(v, l)| (v.to_string(), l.to_string()))
                .collect(),
        },
        label: None,
    }
}

fn labelled(mut spec: VariantParameterSpec, label: &str) -> VariantParameterSpec {
    spec.label = Some(label.to_string());
    spec
}

fn variant(name: &str, label: &str, params: Vec<VariantParameterSpec>) -> Variant {
    Variant {
        name: name.to_string(),
        label: label.to_string(),
        params,
    }
}

struct ComponentBuilder {
    schema: ComponentSchema,
}

fn component(kind: &str, label: &str, default_variant: &str) -> ComponentBuilder {
    ComponentBuilder {
        schema: ComponentSchema {
            kind: kind.to_string(),
            label: label.to_string(),
            variants: Vec::new(),
            multi: false,
            ignored_params: Vec::new(),
            extra_fields: Vec::new(),
            default_variant: default_variant.to_string(),
        },
    }
}

impl ComponentBuilder {
    fn variants(mut self, variants: Vec<Variant>) -> Self {
        self.schema.variants = variants;
        self
    }

    fn ignore(mut self, names: &[&str]) -> Self {
        self.schema.ignored_params = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn extra_fields(mut self, fields: Vec<VariantParameterSpec>) -> Self {
        self.schema.extra_fields = fields;
        self
    }

    fn build(self) -> ComponentSchema {
        self.schema
    }
}

pub(super) fn build_registry() -> SchemaRegistry {
    SchemaRegistry::new(vec![
        component("cosmo", "Cosmology", "Planck15")
            .variants(vec![
                variant("Planck15", "Planck15", vec![]),
                variant("Planck13", "Planck13", vec![]),
                variant("WMAP9", "WMAP9", vec![]),
                variant("WMAP7", "WMAP7", vec![]),
                variant("WMAP5", "WMAP5", vec![]),
            ])
            .extra_fields(vec![
                labelled(float_bounded("H0", 67.74, 10.0, 500.0), "H\u{2080}"),
                labelled(float_bounded("Ob0", 0.0486, 0.005, 0.65), "\u{03a9}_b"),
                labelled(float_bounded("Om0", 0.3075, 0.02, 2.0), "\u{03a9}_m"),
            ])
            .build(),
        component("growth", "Growth Model", "GrowthFactor")
            .variants(vec![
                variant(
                    "GrowthFactor",
                    "Integral",
                    vec![float("dlna", 0.01), float("amin", 1e-8)],
                ),
                variant(
                    "GenMFGrowth",
                    "GenMF",
                    vec![float("dz", 0.01), float("zmax", 1000.0)],
                ),
                variant("Carroll1992", "Carroll (1992)", vec![]),
            ])
            .build(),
        component("transfer", "Transfer Model", "CAMB")
            .variants(vec![
                variant(
                    "CAMB",
                    "CAMB",
                    vec![boolean("extrapolate_with_eh", false)],
                ),
                variant("EH_BAO", "Eisenstein-Hu (1998) (with BAO)", vec![]),
                variant("EH_NoBAO", "Eisenstein-Hu (1998) (no BAO)", vec![]),
                variant(
                    "BBKS",
                    "BBKS (1986)",
                    vec![
                        float("a", 2.34),
                        float("b", 3.89),
                        float("c", 16.1),
                        float("d", 5.46),
                        float("e", 6.71),
                    ],
                ),
                variant(
                    "BondEfs",
                    "Bond-Efstathiou",
                    vec![
                        float("a", 37.1),
                        float("b", 21.1),
                        float("c", 10.8),
                        float("nu", 1.12),
                    ],
                ),
            ])
            .ignore(&["camb_params"])
            .build(),
        component("hmf", "Mass Function Fit", "Tinker08")
            .variants(vec![
                variant("PS", "Press-Schechter (1974)", vec![]),
                variant(
                    "SMT",
                    "Sheth-Mo-Tormen (2001)",
                    vec![float("a", 0.707), float("p", 0.3), float("A", 0.3222)],
                ),
                variant(
                    "Jenkins",
                    "Jenkins (2001)",
                    vec![float("A", 0.315), float("b", 0.61), float("c", 3.8)],
                ),
                variant(
                    "Reed03",
                    "Reed (2003)",
                    vec![
                        float("a", 0.707),
                        float("p", 0.3),
                        float("A", 0.3222),
                        float("c", 0.7),
                    ],
                ),
                variant(
                    "Warren",
                    "Warren (2006)",
                    vec![
                        float("A", 0.7234),
                        float("b", 1.625),
                        float("c", 0.2538),
                        float("d", 1.1982),
                        float("e", 1.0),
                    ],
                ),
                variant(
                    "Reed07",
                    "Reed (2007)",
                    vec![
                        float("A", 0.3222),
                        float("p", 0.3),
                        float("c", 1.08),
                        float("a", 0.764),
                    ],
                ),
                variant(
                    "Peacock",
                    "Peacock (2007)",
                    vec![float("a", 1.529), float("b", 0.704), float("c", 0.412)],
                ),
                variant(
                    "Tinker08",
                    "Tinker (2008)",
                    vec![float_bounded("A_exp", 0.14, 0.0, 1.0), float("a_exp", 0.06)],
                ),
                variant("Crocce", "Crocce (2010)", vec![]),
                variant(
                    "Courtin",
                    "Courtin (2010)",
                    vec![float("A", 0.348), float("a", 0.695), float("p", 0.1)],
                ),
                variant(
                    "Tinker10",
                    "Tinker (2010)",
                    vec![
                        float("alpha_200", 0.368),
                        float("beta_200", 0.589),
                        float("gamma_200", 0.864),
                        float("eta_200", -0.243),
                        float("phi_200", -0.729),
                    ],
                ),
                variant(
                    "Bhattacharya",
                    "Bhattacharya (2011)",
                    vec![
                        float("A_a", 0.333),
                        float("a_a", 0.788),
                        float("p", 0.807),
                        float("q", 1.795),
                    ],
                ),
                variant(
                    "Angulo",
                    "Angulo (2012)",
                    vec![float("A", 0.201), float("b", 1.7), float("c", 1.172)],
                ),
                variant(
                    "AnguloBound",
                    "Angulo (Subhaloes) (2012)",
                    vec![float("A", 0.265), float("b", 1.9), float("c", 1.4)],
                ),
                variant(
                    "Watson_FoF",
                    "Watson (FoF Universal) (2012)",
                    vec![
                        float("A", 0.282),
                        float("b", 2.163),
                        float("c", 1.406),
                        float("d", 1.21),
                    ],
                ),
                variant(
                    "Watson",
                    "Watson (Redshift Dependent) (2012)",
                    vec![float("C", 0.0099), float("d", 1.66), float("p", 0.072)],
                ),
                variant(
                    "Behroozi",
                    "Behroozi (Tinker Extension to High-z) (2013)",
                    vec![],
                ),
                variant(
                    "Pillepich",
                    "Pillepich (2010)",
                    vec![float("A", 0.6853), float("b", 1.868), float("c", 0.3324)],
                ),
                variant(
                    "Manera",
                    "Manera (2010)",
                    vec![float("a", 0.709), float("p", 0.289)],
                ),
                variant(
                    "Ishiyama",
                    "Ishiyama (2015)",
                    vec![
                        float("A", 0.193),
                        float("b", 1.55),
                        float("c", 1.186),
                        float("d", 1.218),
                    ],
                ),
            ])
            .build(),
        component("filter", "Filter", "TopHat")
            .variants(vec![
                variant("TopHat", "Top-hat", vec![]),
                variant("Gaussian", "Gaussian", vec![]),
                variant("SharpK", "Sharp-k", vec![float("c", 2.5)]),
                variant(
                    "SharpKEllipsoid",
                    "Sharp-k with ellipsoidal correction",
                    vec![float("c", 2.0)],
                ),
            ])
            .build(),
        component("mdef", "Mass Definition", "None")
            .variants(vec![
                variant("None", "Use native definition of mass function", vec![]),
                variant(
                    "SOMean",
                    "Spherical Overdensity wrt mean",
                    vec![float("overdensity", 200.0)],
                ),
                variant(
                    "SOCritical",
                    "Spherical Overdensity wrt critical",
                    vec![float("overdensity", 500.0)],
                ),
                variant(
                    "SOVirial",
                    "Virial Spherical Overdensity (Bryan and Norman)",
                    vec![],
                ),
                variant(
                    "FOF",
                    "Friends-of-Friends",
                    vec![float("linking_length", 0.2)],
                ),
            ])
            .build(),
        component("alter", "WDM Recalibration", "None")
            .variants(vec![
                variant("None", "No recalibration", vec![]),
                variant(
                    "Schneider12_vCDM",
                    "Schneider (2012) recalibration of CDM",
                    vec![float("beta", 1.16)],
                ),
                variant(
                    "Schneider12",
                    "Schneider (2012) recalibration of WDM",
                    vec![float("alpha", 0.6)],
                ),
                variant(
                    "Lovell14",
                    "Lovell (2014) recalibration of WDM",
                    vec![float("beta", 0.99), float("gamma", 2.7)],
                ),
            ])
            .build(),
        component("wdm", "WDM Model", "Viel05")
            .variants(vec![variant(
                "Viel05",
                "Viel (2005)",
                vec![float("mu", 1.12), float("g_x", 1.5)],
            )])
            .build(),
        component("bias", "Bias Model", "Tinker10")
            .variants(vec![
                variant(
                    "Tinker10",
                    "Tinker (2010)",
                    vec![
                        labelled(boolean("use_nu", true), "Use \u{03bd}?"),
                        float("B", 0.183),
                        float("b", 1.5),
                        float("c", 2.4),
                    ],
                ),
                variant("UnityBias", "Unbiased", vec![]),
                variant("Mo96", "Mo (1996)", vec![]),
                variant(
                    "Jing98",
                    "Jing (1998)",
                    vec![float("a", 0.5), float("b", 0.06)],
                ),
                variant(
                    "ST99",
                    "Sheth-Tormen (1999)",
                    vec![float("q", 0.707), float("p", 0.3)],
                ),
                variant(
                    "SMT01",
                    "Sheth-Mo-Tormen (2001)",
                    vec![float("a", 0.707), float("b", 0.5), float("c", 0.6)],
                ),
                variant("Seljak04", "Seljak (2004) Without Cosmo", vec![]),
                variant(
                    "Seljak04Cosmo",
                    "Seljak (2004) With Cosmo",
                    vec![float("a", 0.53), float("b", 0.39)],
                ),
                variant(
                    "Mandelbaum05",
                    "Mandelbaum (2005)",
                    vec![float("q", 0.73), float("p", 0.15)],
                ),
                variant(
                    "Pillepich10",
                    "Pillepich (2010)",
                    vec![
                        float("B0", 0.647),
                        float("B1", -0.32),
                        float("B2", 0.568),
                    ],
                ),
                variant(
                    "Manera10",
                    "Manera (2010)",
                    vec![float("q", 0.709), float("p", 0.248)],
                ),
                variant(
                    "Tinker10PBSplit",
                    "Tinker (2010) Peak-Background Split",
                    vec![
                        labelled(boolean("use_nu", true), "Use \u{03bd}?"),
                        float("Delta", 200.0),
                    ],
                ),
            ])
            .build(),
        component("halo_concentration", "Halo Concentration", "Duffy08")
            .variants(vec![
                variant(
                    "Bullock01",
                    "Bullock (2001) Physical Form",
                    vec![float("F", 0.01), float("K", 3.4)],
                ),
                variant(
                    "Bullock01Power",
                    "Bullock (2001) Power-Law",
                    vec![
                        float("a", 9.0),
                        float("b", -0.13),
                        float("c", 1.0),
                        float("ms", 1.5e13),
                    ],
                ),
                variant(
                    "Duffy08",
                    "Duffy (2008) Power-Law",
                    vec![
                        float("a", 6.71),
                        float("b", -0.091),
                        float("c", -0.44),
                        float("ms", 2e12),
                        choice(
                            "sample",
                            "relaxed",
                            &[("relaxed", "relaxed"), ("full", "full")],
                        ),
                    ],
                ),
                variant(
                    "Zehavi11",
                    "Zehavi (2011) Power-Law",
                    vec![
                        float("a", 11.0),
                        float("b", -0.13),
                        float("c", 1.0),
                        float("ms", 2.26e12),
                    ],
                ),
                variant(
                    "Ludlow16",
                    "Ludlow (2016)",
                    vec![float("f", 0.02), float("C", 650.0)],
                ),
                variant(
                    "Ludlow16Empirical",
                    "Ludlow (2016) Empirical",
                    vec![
                        float("c0", 3.395),
                        float("beta", 0.307),
                        float("gamma1", 0.628),
                        float("gamma2", 0.317),
                    ],
                ),
            ])
            .build(),
        component("hod", "HOD Model", "Zehavi05")
            .variants(vec![
                variant(
                    "Zehavi05",
                    "Zehavi (2005)",
                    vec![
                        float_bounded("M_min", 12.6311, 8.0, 18.0),
                        float_bounded("M_1", 13.0389, 8.0, 18.0),
                        float("alpha", 1.049),
                        boolean("central", true),
                    ],
                ),
                variant(
                    "Zheng05",
                    "Zheng (2005)",
                    vec![
                        float_bounded("M_min", 11.6222, 8.0, 18.0),
                        float_bounded("M_1", 12.851, 8.0, 18.0),
                        float("alpha", 1.049),
                        float("M_0", 11.5047),
                        float("sig_logm", 0.26),
                        boolean("central", true),
                    ],
                ),
                variant(
                    "Tinker05",
                    "Tinker (2005)",
                    vec![
                        float_bounded("M_min", 11.95, 8.0, 18.0),
                        float_bounded("M_1", 12.9, 8.0, 18.0),
                        float("M_cut", 12.0),
                    ],
                ),
            ])
            .build(),
        component("profile", "Halo Profile", "NFW")
            .variants(vec![
                variant("NFW", "NFW (1997)", vec![]),
                variant("Hernquist", "Hernquist (1990)", vec![]),
                variant("Moore", "Moore (1998)", vec![]),
                variant(
                    "Einasto",
                    "Einasto (1965)",
                    vec![float("alpha", 0.18), boolean("use_interp", true)],
                ),
                variant(
                    "GeneralizedNFW",
                    "Generalized NFW",
                    vec![float("beta", 1.0)],
                ),
            ])
            .build(),
    ])
}
