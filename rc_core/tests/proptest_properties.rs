//! Property tests for the flexure formulas.

use proptest::prelude::*;

use rc_core::calculations::flexure::classify_ratio;
use rc_core::calculations::RatioCondition;
use rc_core::equations::flexure::{
    phi_interpolated, required_steel_area, resisting_moment, stress_block_depth, PHI_COMPRESSION_CONTROLLED,
    TENSION_CONTROLLED_STRAIN,
};

/// Area at the vertex of the moment parabola; below it Mr grows with As
fn vertex_area(fs: f64, block: f64, b: f64, d: f64) -> f64 {
    d * block * b / fs
}

proptest! {
    #[test]
    fn phi_is_bounded_and_monotone(
        eps_y in 0.0010f64..0.0030,
        e1 in -0.001f64..0.02,
        e2 in -0.001f64..0.02,
    ) {
        let (lo, hi) = if e1 <= e2 { (e1, e2) } else { (e2, e1) };
        let p_lo = phi_interpolated(lo, eps_y, 0.85);
        let p_hi = phi_interpolated(hi, eps_y, 0.85);
        prop_assert!(p_lo >= PHI_COMPRESSION_CONTROLLED && p_lo <= 0.85);
        prop_assert!(p_lo <= p_hi + 1e-12);
    }

    #[test]
    fn phi_regions_are_exact(eps_y in 0.0010f64..0.0030, over in 0.0f64..0.05, under in 0.0f64..0.001) {
        prop_assert_eq!(phi_interpolated(TENSION_CONTROLLED_STRAIN + over, eps_y, 0.85), 0.85);
        prop_assert_eq!(phi_interpolated(eps_y - under, eps_y, 0.85), PHI_COMPRESSION_CONTROLLED);
    }

    #[test]
    fn phi_is_continuous_at_region_boundaries(eps_y in 0.0010f64..0.0030) {
        let h = 1e-9;
        let at_yield = phi_interpolated(eps_y + h, eps_y, 0.85);
        prop_assert!((at_yield - PHI_COMPRESSION_CONTROLLED).abs() < 1e-4);
        let at_tension = phi_interpolated(TENSION_CONTROLLED_STRAIN - h, eps_y, 0.85);
        prop_assert!((at_tension - 0.85).abs() < 1e-4);
    }

    #[test]
    fn required_area_round_trips_through_moment(
        fck in 21.0f64..60.0,
        b in 200.0f64..800.0,
        d in 300.0f64..1200.0,
        share in 0.02f64..0.9,
        phi in 0.65f64..0.85,
    ) {
        let fs = 400.0;
        let block = 0.85 * fck;
        let as_mm2 = share * vertex_area(fs, block, b, d);
        let a = stress_block_depth(as_mm2, fs, block, b);
        let mu = resisting_moment(phi, as_mm2, fs, d, a);

        let back = required_steel_area(mu, phi, fs, block, b, d).unwrap();
        prop_assert!((back - as_mm2).abs() < 1e-6 * as_mm2.max(1.0));
    }

    #[test]
    fn moment_strength_increases_with_steel(
        fck in 21.0f64..60.0,
        b in 200.0f64..800.0,
        d in 300.0f64..1200.0,
        s1 in 0.01f64..0.95,
        s2 in 0.01f64..0.95,
    ) {
        prop_assume!((s1 - s2).abs() > 1e-3);
        let fs = 400.0;
        let block = 0.85 * fck;
        let vertex = vertex_area(fs, block, b, d);
        let (small, large) = if s1 < s2 { (s1 * vertex, s2 * vertex) } else { (s2 * vertex, s1 * vertex) };

        let mr = |as_mm2: f64| resisting_moment(0.85, as_mm2, fs, d, stress_block_depth(as_mm2, fs, block, b));
        prop_assert!(mr(large) > mr(small));
    }

    #[test]
    fn ratio_condition_matches_bounds(
        rho_use in 0.0f64..0.05,
        rho_min in 0.001f64..0.01,
        rho_max in 0.01f64..0.04,
        fallback in proptest::option::of(0.0f64..0.02),
    ) {
        let (condition, via_fallback) = classify_ratio(rho_use, rho_min, rho_max, fallback);
        let min_ok = rho_use >= rho_min || fallback.is_some_and(|f| rho_use >= f);
        let max_ok = rho_use <= rho_max;
        let expected = match (min_ok, max_ok) {
            (true, true) => RatioCondition::Both,
            (true, false) => RatioCondition::MinOnly,
            (false, true) => RatioCondition::MaxOnly,
            (false, false) => RatioCondition::Neither,
        };
        prop_assert_eq!(condition, expected);
        prop_assert_eq!(via_fallback, min_ok && rho_use < rho_min);
    }
}
