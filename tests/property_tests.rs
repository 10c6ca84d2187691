//! Property-based tests for fusion, parsing and validation.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chefsense::fusion::text::{find_quantity, normalize_unit, parse_amount};
use chefsense::fusion::{map_fill_ratio, FusionEngine, PerceptionResult, ToolObservation};
use chefsense::validation::{Observation, Severity, Validator};
use chefsense::{CheckClause, EstimationMethod, QuantityEstimate, Unit};
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_unit()(index in 0..Unit::ALL.len()) -> Unit {
        Unit::ALL[index]
    }
}

prop_compose! {
    fn arbitrary_tool()(
        name in prop::sample::select(vec!["teaspoon", "tablespoon", "spoon", "whisk", "cup"]),
        fill_ratio in -0.5f64..1.5,
        heaped in any::<bool>(),
    ) -> ToolObservation {
        ToolObservation::new(name, fill_ratio, heaped)
    }
}

fn check(ingredient: &str, amount: f64, unit: Unit) -> CheckClause {
    CheckClause {
        ingredient: ingredient.to_string(),
        amount,
        unit: unit.as_str().to_string(),
    }
}

fn observed(ingredient: &str, amount: f64, unit: Unit) -> Observation {
    Observation::new(
        ingredient,
        Some(QuantityEstimate::new(amount, unit, 0.8, EstimationMethod::TextMark)),
    )
}

proptest! {
    #[test]
    fn nearly_empty_spoon_is_a_quarter(ratio in 0.0f64..0.2, heaped in any::<bool>()) {
        prop_assert_eq!(map_fill_ratio(ratio, heaped, "teaspoon").amount(), 0.25);
    }

    #[test]
    fn half_spoon_bands(ratio in 0.4f64..=0.6) {
        prop_assert_eq!(map_fill_ratio(ratio, false, "teaspoon").amount(), 0.5);
        prop_assert_eq!(map_fill_ratio(ratio, true, "teaspoon").amount(), 0.75);
    }

    #[test]
    fn full_spoon_bands(ratio in 0.9f64..1.5) {
        prop_assert_eq!(map_fill_ratio(ratio, false, "tablespoon").amount(), 1.0);
        prop_assert_eq!(map_fill_ratio(ratio, true, "tablespoon").amount(), 1.25);
    }

    #[test]
    fn tool_name_picks_spoon_unit(prefix in "[0-9 ]{0,8}", heaped in any::<bool>()) {
        let table = format!("{prefix}table spoon");
        prop_assert_eq!(map_fill_ratio(0.5, heaped, &table).unit(), Unit::Tablespoon);
        let tea = format!("{prefix}tea spoon");
        prop_assert_eq!(map_fill_ratio(0.5, heaped, &tea).unit(), Unit::Teaspoon);
    }

    #[test]
    fn normalizing_is_idempotent(unit in arbitrary_unit()) {
        let once = normalize_unit(unit.as_str());
        prop_assert_eq!(&once, unit.as_str());
        prop_assert_eq!(normalize_unit(&once), once);
    }

    #[test]
    fn slash_fractions_divide(num in 1u32..20, den in 1u32..20) {
        let parsed = parse_amount(&format!("{num}/{den}"));
        prop_assert!((parsed - f64::from(num) / f64::from(den)).abs() < 1e-12);
    }

    #[test]
    fn arbitrary_text_never_fails(text in ".{0,40}") {
        if let Some(mark) = find_quantity(&text) {
            prop_assert!(mark.amount.is_finite());
            prop_assert!(mark.amount >= 0.0);
        }
        prop_assert!(parse_amount(&text).is_finite());
    }

    #[test]
    fn fused_confidence_stays_in_range(
        tools in prop::collection::vec(arbitrary_tool(), 0..3),
        text in prop::sample::select(vec!["", "1/2 tsp", "½ tbsp", "100g", "2 cups", "salt"]),
    ) {
        let perception = PerceptionResult { tools, ..PerceptionResult::default() };
        let estimate = FusionEngine::default().estimate_quantity(&perception, text, None);
        prop_assert!((0.0..=1.0).contains(&estimate.confidence()));
        prop_assert!(estimate.amount() >= 0.0);
    }

    #[test]
    fn estimates_clamp_any_input(amount in any::<f64>(), confidence in any::<f64>()) {
        let estimate =
            QuantityEstimate::new(amount, Unit::Cup, confidence, EstimationMethod::DepthVolume);
        prop_assert!(estimate.amount() >= 0.0);
        prop_assert!((0.0..=1.0).contains(&estimate.confidence()));
    }

    #[test]
    fn unit_mismatch_is_always_major(
        expected in arbitrary_unit(),
        observed_unit in arbitrary_unit(),
        amount in 0.0f64..10.0,
    ) {
        prop_assume!(expected != observed_unit);
        let deviation = Validator::default()
            .validate(
                &check("turmeric", amount, expected),
                &observed("turmeric", amount, observed_unit),
            )
            .unwrap();
        prop_assert_eq!(deviation.severity, Severity::Major);
    }

    #[test]
    fn salt_is_at_least_as_strict_as_turmeric(
        expected in 0.1f64..3.0,
        offset in -1.0f64..1.0,
    ) {
        let observed_amount = (expected + offset).max(0.0);
        let validator = Validator::default();
        let compare = |ingredient: &str| {
            validator
                .validate(
                    &check(ingredient, expected, Unit::Teaspoon),
                    &observed(ingredient, observed_amount, Unit::Teaspoon),
                )
                .unwrap()
        };
        let salt = compare("salt");
        let turmeric = compare("turmeric");
        if turmeric.severity == Severity::Major {
            prop_assert_eq!(salt.severity, Severity::Major);
        }
    }

    #[test]
    fn matching_amount_is_minor(amount in 0.1f64..10.0, unit in arbitrary_unit()) {
        let deviation = Validator::default()
            .validate(&check("water", amount, unit), &observed("water", amount, unit))
            .unwrap();
        prop_assert_eq!(deviation.severity, Severity::Minor);
    }
}

#[test]
fn unicode_and_slash_fractions_agree() {
    assert_eq!(parse_amount("½"), parse_amount("1/2"));
    assert_eq!(parse_amount("¼"), parse_amount("1/4"));
    assert_eq!(parse_amount("¾"), parse_amount("3/4"));
}
