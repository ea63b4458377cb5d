//! Plain-text calculation report.
//!
//! Three sections (flexure, shear, crack control) written the way a hand
//! calculation sheet reads: each formula, its substituted values and the
//! verdict. `total` joins them under a project header.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculations::{BeamCheck, DuctilityRegime, RatioCondition, RequiredSteel, SectionStatus, Verdict};
use crate::codes::ShearModel;
use crate::project::ProjectInfo;
use crate::section::Section;

/// Width of the `=` rules framing each section
pub const RULE_WIDTH: usize = 75;

/// Rendered report sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReport {
    pub total: String,
    pub flexure: String,
    pub shear: String,
    pub service: String,
}

/// Header information for a report.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub project: &'a ProjectInfo,
    pub beam_label: String,
    pub date: NaiveDate,
}

/// Render the report for one decision record.
pub fn render(check: &BeamCheck, ctx: &ReportContext<'_>) -> TextReport {
    let flexure = flexure_section(check).join("\n");
    let shear = shear_section(check).join("\n");
    let service = service_section(check).join("\n");

    let mut total = header(check, ctx);
    total.push(String::new());
    total.push(flexure.clone());
    total.push(String::new());
    total.push(String::new());
    total.push(shear.clone());
    total.push(String::new());
    total.push(String::new());
    total.push(service.clone());

    TextReport {
        total: total.join("\n"),
        flexure,
        shear,
        service,
    }
}

fn banner(title: &str) -> Vec<String> {
    vec![
        "=".repeat(RULE_WIDTH),
        format!("{:^width$}", title, width = RULE_WIDTH),
        "=".repeat(RULE_WIDTH),
        String::new(),
    ]
}

fn header(check: &BeamCheck, ctx: &ReportContext<'_>) -> Vec<String> {
    let mut lines = vec![format!("Beam section check : {}", ctx.beam_label)];
    if !ctx.project.is_empty() {
        lines.push(format!(
            "Job : {}   Client : {}   Engineer : {}",
            ctx.project.job_id, ctx.project.client, ctx.project.engineer
        ));
    }
    lines.push(format!("Code : {}   Date : {}", check.code.rule().title(), ctx.date.format("%Y-%m-%d")));
    let failed = check.failed_checks();
    if failed.is_empty() {
        lines.push("Result : all checks satisfied".to_string());
    } else {
        lines.push(format!("Result : N.G in {}", failed.join(", ")));
    }
    lines
}

fn degenerate_note(section: &Section) -> String {
    format!(
        "   Section geometry is not valid (H = {:.1}, B = {:.1}, Dc = {:.1}, d = {:.1} mm); no check performed.",
        section.h, section.b, section.dc, section.d_eff
    )
}

// =============================================================================
// FLEXURE
// =============================================================================

fn flexure_section(check: &BeamCheck) -> Vec<String> {
    let s = &check.section;
    let f = &check.flexure;
    let rule = check.code.rule();
    let mut out = banner(&format!("Flexure check - {}", rule.title()));

    if check.status == SectionStatus::Degenerate {
        out.push(degenerate_note(s));
        return out;
    }

    // 1) section and assumptions
    out.push("1) Section and design assumptions".to_string());
    out.push(format!(
        "   fck = {:.1} MPa, fy = {:.1} MPa, Øf = {:.2}, Øv = {:.2}, Es = {:.0} MPa",
        s.fck(),
        s.fy(),
        f.phi,
        check.shear.phi_v,
        s.steel.es_mpa
    ));
    let rule_line = format!("   {}", "-".repeat(RULE_WIDTH));
    out.push(rule_line.clone());
    out.push(format!(
        "   | {:^8} | {:^8} | {:^8} | {:^8} | {:^12} | {:^10} | {:^10} |",
        "B(mm)", "H(mm)", "d(mm)", "Dc(mm)", "Mu(N.mm)", "Vu(N)", "Ms(N.mm)"
    ));
    out.push(rule_line.clone());
    out.push(format!(
        "   | {:^8.0} | {:^8.0} | {:^8.1} | {:^8.1} | {:^12.0} | {:^10.0} | {:^10.0} |",
        s.b, s.h, s.d_eff, s.dc, s.mu_nmm, s.vu_n, s.ms_nmm
    ));
    out.push(rule_line);
    out.push(String::new());

    // 2) material constants
    out.push("2) Concrete constants".to_string());
    out.push(format!("   β1   : equivalent stress block depth factor      = {:.3}", f.beta1));
    out.push(format!("   εcu  : ultimate concrete strain                 = {:.5}", f.ecu));
    if let ShearModel::PartialFactor { phi_c, phi_s } = rule.shear_model() {
        out.push(format!("   φc = {:.2}, φs = {:.2} : material factors applied to fck and fy", phi_c, phi_s));
    }
    out.push(String::new());

    // 3) strength reduction factor
    out.push("3) Strength reduction factor (Ø)".to_string());
    out.push(format!(
        "   T = As x fs = {:.3} x {:.3} = {:.1} N",
        f.as_use, f.fs_design, f.tension_force
    ));
    out.push(format!(
        "   C = {:.3} x a x b = {:.3} x a x {:.3} = {:.1} x a",
        f.block, f.block, s.b, f.compression_per_mm
    ));
    out.push(format!(
        "   T = C, so a = {:.3} mm, c = a / β1 = {:.3} / {:.3} = {:.3} mm",
        f.a, f.a, f.beta1, f.c
    ));
    out.push(format!("   εy = fy / Es = {:.1} / {:.0} = {:.5}", s.fy(), s.steel.es_mpa, f.eps_y));
    out.push(format!(
        "   εt = {:.5} x (dt - c) / c = {:.5} x ({:.3} - {:.3}) / {:.3} = {:.5}",
        f.ecu, f.ecu, f.d_t, f.c, f.c, f.eps_t
    ));
    let compare = if f.eps_t >= 0.005 { "≥" } else { "<" };
    if rule.uses_strain_dependent_phi() {
        out.push(format!(
            "   εt {} 0.0050, {} section, Ø = {:.2}",
            compare,
            f.regime.label(),
            f.phi
        ));
    } else {
        out.push(format!(
            "   εt {} 0.0050, {} section; this code applies a constant Ø = {:.2}",
            compare,
            f.regime.label(),
            f.phi
        ));
    }
    out.push(String::new());

    // 4) required steel
    out.push("4) Required reinforcement".to_string());
    out.push("   Mu / Øf = As x fs x (d - a / 2)              ---------------- ①".to_string());
    out.push("   a = As x fs / (block x b)                    ---------------- ②".to_string());
    out.push("   Substituting ② into ① gives a quadratic in As:".to_string());
    out.push("           fs²                                Mu".to_string());
    match f.required {
        RequiredSteel::Required(area) => out.push(format!(
            "   ------------------ As² - fs x d x As + ------ = 0 ,  Asreq = {:.3} mm²",
            area
        )),
        RequiredSteel::Infeasible => out.push(
            "   ------------------ As² - fs x d x As + ------ = 0 ,  no real root: Mu cannot be developed"
                .to_string(),
        ),
    }
    out.push("      2 x block x b                           Øf".to_string());
    out.push(String::new());

    // 5) provided steel
    out.push(format!(
        "5) Provided reinforcement : Asuse = {:.1} mm², centroid d = {:.1} mm, [ usage = {:.3} ]",
        f.as_use,
        s.d_eff,
        f.usage_ratio()
    ));
    for (i, layer) in s.layers.iter().enumerate() {
        out.push(format!(
            "   Layer {} : {} - {} EA (= {:.1} mm², dc{} = {:.1} mm)",
            i + 1,
            layer.size,
            layer.count,
            layer.area(),
            i + 1,
            layer.dc
        ));
    }
    out.push(String::new());

    // 6) ratio bounds
    let r = &f.ratio;
    out.push("6) Reinforcement ratio".to_string());
    out.push(format!("   ρmin : 1.4 / fy          = {:.6}", r.rho_min_yield));
    out.push(format!(
        "          0.25 x √fck / fy  = {:.6}, ρmin = {:.6} governs",
        r.rho_min_strength, r.rho_min
    ));
    out.push(format!(
        "   ρmax = 0.75 x ρb = 0.75 x (0.85 x β1 x fck / fy) x (6000 / (6000 + fy)) = {:.6}",
        r.rho_max
    ));
    out.push(format!("   ρuse = As / ( b x d ) = {:.6}", r.rho_use));
    let four_thirds = r.rho_req_four_thirds.unwrap_or(0.0);
    let ratio_msg = match (r.condition, r.min_via_fallback) {
        (RatioCondition::Both, false) => "ρmax ≥ ρuse ≥ ρmin --> minimum and maximum ratio satisfied   ∴ O.K".to_string(),
        (RatioCondition::Both, true) => format!(
            "ρuse < ρmin, but ρuse ≥ 4/3 x ρreq ({:.6}) and ρuse ≤ ρmax   ∴ O.K",
            four_thirds
        ),
        (RatioCondition::MinOnly, _) => {
            "ρuse > ρmax --> minimum ratio satisfied, maximum ratio exceeded   ∴ N.G".to_string()
        }
        (RatioCondition::MaxOnly, _) => format!(
            "ρuse < ρmin and ρuse < 4/3 x ρreq ({:.6}) --> minimum ratio not satisfied   ∴ N.G",
            four_thirds
        ),
        (RatioCondition::Neither, _) => "ρuse < ρmin and ρuse > ρmax --> neither bound satisfied   ∴ N.G".to_string(),
    };
    out.push(format!("   {}", ratio_msg));
    if let Some(limit) = &f.ductility {
        let op = if limit.satisfied { "≤" } else { ">" };
        out.push(format!(
            "   c = {:.3} mm {} c_max = {:.3} mm (neutral-axis depth limit, not verified)",
            f.c, op, limit.c_max
        ));
    }
    out.push(String::new());

    // 7) design strength
    out.push("7) Design flexural strength".to_string());
    out.push(format!("   a = As x fs / (block x b) = {:.3} mm", f.a));
    out.push("   Ø Mn = Øf x As x fs x (d - a / 2)".to_string());
    out.push(format!(
        "        = {:.2} x {:.1} x {:.1} x ({:.1} - {:.3} / 2)",
        f.phi, f.as_use, f.fs_design, f.d_eff, f.a
    ));
    let sf = f.safety_factor.unwrap_or(0.0);
    out.push(format!(
        "        = {:.1} N.mm ───> {} (Mu = {:.1} N.mm) [S.F = {:.3}]",
        f.mr_nmm,
        f.verdict.mark(),
        f.mu_nmm,
        sf
    ));
    if f.regime == DuctilityRegime::CompressionControlled && f.as_use > 0.0 {
        out.push("   Note: the section is compression-controlled at nominal strength".to_string());
    }
    out
}

// =============================================================================
// SHEAR
// =============================================================================

fn shear_section(check: &BeamCheck) -> Vec<String> {
    let s = &check.section;
    let v = &check.shear;
    let mut out = banner("Shear check");

    if check.status == SectionStatus::Degenerate {
        out.push(degenerate_note(s));
        return out;
    }

    let stirrups = format!(
        "{}, {} legs, @{}",
        s.stirrups.size, s.stirrups.legs, s.stirrups.spacing
    );

    match &v.partial_factor {
        None => {
            out.push("Φ Vc = Φv x √fck x b x d / 6".to_string());
            out.push(format!(
                "     = {:.2} x √{} x {} x {:.1} / 6 = {:.1} N",
                v.phi_v,
                s.fck(),
                s.b,
                v.d_eff,
                v.phi_vc
            ));
            if !v.stirrups_required {
                out.push(format!("Φ Vc ≥ Vu = {:.1} N  ∴ shear reinforcement not required", v.vu_n));
            } else {
                out.push(format!("Φ Vc < Vu = {:.1} N  ∴ shear reinforcement required", v.vu_n));
                out.push(format!("Av_req = (Vu - Φ Vc) x s / (fy x d x Φv) = {:.3} mm²", v.av_req));
                out.push(format!("Av_use = {:.3} mm² ({})", v.av_use, stirrups));
                out.push(format!("Vs = Av x fy x d / s = {:.1} N (Vs,max = 2/3 x √fck x b x d = {:.1} N)", v.vs, v.vs_max));
                out.push(spacing_line(v.spacing, v.spacing_max, "min(600, d/2)", v.spacing_ok));
            }
            out.push(format!(
                "Φ Vn = Φv x (Vc + Vs) = {:.1} N ───> {} (Vu = {:.1} N)",
                v.phi_vn,
                v.verdict.mark(),
                v.vu_n
            ));
        }
        Some(p) => {
            out.push(format!("k = 1 + √(200 / d) ≤ 2.0 = {:.3}", p.k));
            out.push(format!("ρs = As / (b x d) ≤ 0.02 = {:.5}", p.rho_s));
            out.push(format!("fn = Nu / (b x H) = {:.3} MPa", p.fn_mpa));
            out.push(format!(
                "Vcd = (0.85 x φc x k x (ρs x fck)^(1/3) + 0.15 x fn) x b x d = {:.1} N",
                p.vcd_formula
            ));
            out.push(format!(
                "Vcd,min = (0.4 x φc x fctk + 0.15 x fn) x b x d = {:.1} N",
                p.vcd_min
            ));
            out.push(format!("Vcd = {:.1} N", v.vc));
            if !v.stirrups_required {
                out.push(format!("Vcd ≥ Vu = {:.1} N  ∴ shear reinforcement not required", v.vu_n));
            } else {
                out.push(format!("Vcd < Vu = {:.1} N  ∴ shear reinforcement required", v.vu_n));
                out.push(format!(
                    "Av_req = (Vu - Vcd) x s x tanθ / (φs x fy x z) = {:.3} mm²  (θ = {:.1}°, z = {:.1} mm)",
                    v.av_req, p.theta_deg, p.z
                ));
                out.push(format!("Av_use = {:.3} mm² ({})", v.av_use, stirrups));
                out.push(format!("Vsd = φs x fy x Av x z x cotθ / s = {:.1} N", v.vs));
                out.push(spacing_line(v.spacing, v.spacing_max, "min(600, 0.75d)", v.spacing_ok));
            }
            out.push(format!(
                "Vd,max = ν x φc x fck x b x z / (cotθ + tanθ) = {:.1} N  (ν = {:.3})",
                v.vs_max, p.nu
            ));
            out.push(format!(
                "Vd = min(Vcd + Vsd, Vd,max) = {:.1} N ───> {} (Vu = {:.1} N)",
                v.phi_vn,
                v.verdict.mark(),
                v.vu_n
            ));
        }
    }
    out
}

fn spacing_line(spacing: f64, limit: f64, rule: &str, ok: bool) -> String {
    let op = if ok { "≤" } else { ">" };
    format!("s = {:.1} mm {} smax = {} = {:.1} mm", spacing, op, rule, limit)
}

// =============================================================================
// SERVICE
// =============================================================================

fn service_section(check: &BeamCheck) -> Vec<String> {
    let s = &check.section;
    let c = &check.service;
    let mut out = banner("Serviceability (crack) check");

    if check.status == SectionStatus::Degenerate {
        out.push(degenerate_note(s));
        return out;
    }
    if c.verdict == Verdict::NotChecked {
        out.push(format!(
            "   No tension steel or no concrete modulus (As = {:.1} mm², Ec = {:.1} MPa); crack control not checked.",
            s.as_use, c.ec_mpa
        ));
        return out;
    }

    let outer = s.outer_layer();
    out.push("Crack control".to_string());
    out.push("  ① Steel stress".to_string());
    out.push(format!(
        "    fs = Ms / [As x (d - χ/3)] = {:.1} / [ {:.3} x ( {:.3} - {:.2} / 3 )]",
        c.ms_nmm, s.as_use, s.d_eff, c.chi
    ));
    out.push(format!("       = {:.3} MPa", c.fs));
    out.push("    χ = -n x As / b + n x As / b x √ [ 1 + 2 x b x d / ( n x As ) ]".to_string());
    out.push(format!(
        "      = -{:.1} x {:.1} / {} + {:.1} x {:.1} / {} x √ [1 + 2 x {} x {:.3} / ({:.1} x {:.1})]",
        c.modular_ratio, s.as_use, s.b, c.modular_ratio, s.as_use, s.b, s.b, s.d_eff, c.modular_ratio, s.as_use
    ));
    out.push(format!("      = {:.3} mm", c.chi));
    out.push(format!(
        "    Steel area = {:.3} mm²  (outermost layer centroid : {:.1} mm)",
        s.as_use, outer.dc
    ));
    let layers: Vec<String> = s
        .layers
        .iter()
        .enumerate()
        .map(|(i, l)| format!("layer {} : {} - {} EA", i + 1, l.size, l.count))
        .collect();
    out.push(format!("      {}", layers.join(", ")));
    out.push(String::new());

    out.push("  ② Maximum bar spacing".to_string());
    out.push(format!("    Exposure condition for corrosion : {}", c.exposure.label()));
    out.push(format!(
        "    Cc = {:.1} - {} / 2 = {:.2} mm",
        outer.dc,
        outer.size.diameter_mm(),
        c.cc
    ));
    out.push("    where Cc is the clear cover from the bar surface to the concrete surface (mm)".to_string());
    out.push(String::new());

    match (c.s_limit_1, c.s_limit_2, c.s_allow) {
        (Some(s1), Some(s2), Some(sa)) => {
            out.push(format!(
                "    Sa : 375 x (Kcr / fs) - 2.5 x Cc = 375 x ({} / {:.3}) - 2.5 x {:.3} = {:.3} mm",
                c.kcr, c.fs, c.cc, s1
            ));
            out.push(format!(
                "         300 x (Kcr / fs) = 300 x ({} / {:.3}) = {:.3} mm",
                c.kcr, c.fs, s2
            ));
            out.push(format!("    where Kcr = {} (exposure coefficient for crack control)", c.kcr));
            out.push(format!("    ∴ Sa is the smaller value, {:.3} mm", sa));
            let op = if c.verdict == Verdict::Ok { "≥" } else { "<" };
            out.push(format!(
                "    Sa = {:.3} mm  {} suse = {:.3} mm  ∴ {}",
                sa,
                op,
                c.s_use,
                c.verdict.mark()
            ));
        }
        _ => {
            out.push("    fs ≤ 0 under the service moment: no spacing limit applies".to_string());
            out.push(format!("    suse = {:.3} mm  ∴ {}", c.s_use, c.verdict.mark()));
        }
    }
    out
}
