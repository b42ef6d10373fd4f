use proptest::prelude::*;
use rust_decimal::Decimal;
use tempconv::convert::{
    RoundingRule, ValueConversionError, convert_k_to_f, convert_k_to_f_with, kelvin_to_fahrenheit,
};

/// Exact model of `round((K - 273.15) * 1.8 + 32)` for K given in hundredths,
/// computed in thousandths of a degree Fahrenheit.
fn model(hundredths: i64, rule: RoundingRule) -> i64 {
    let thousandths = (hundredths - 27315) * 18 + 32_000;
    let whole = thousandths.div_euclid(1000);
    let rem = thousandths.rem_euclid(1000);
    match rem.cmp(&500) {
        std::cmp::Ordering::Less => whole,
        std::cmp::Ordering::Greater => whole + 1,
        std::cmp::Ordering::Equal => match rule {
            RoundingRule::HalfEven => {
                if whole % 2 == 0 {
                    whole
                } else {
                    whole + 1
                }
            }
            RoundingRule::HalfAwayFromZero => {
                if thousandths >= 0 {
                    whole + 1
                } else {
                    whole
                }
            }
        },
    }
}

fn kelvin_text(hundredths: i64) -> String {
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

#[test]
fn reference_points() {
    assert_eq!(convert_k_to_f("273.15").unwrap(), 32);
    assert_eq!(convert_k_to_f("373.15").unwrap(), 212);
    assert_eq!(convert_k_to_f("0").unwrap(), -460);
    assert_eq!(convert_k_to_f("255.372").unwrap(), 0);
}

#[test]
fn half_boundaries_are_pinned_for_both_rules() {
    let cases = [
        // kelvin, half-even, half-away from zero
        ("275.65", 36, 37),
        ("280.65", 46, 46),
        ("270.65", 28, 28),
        ("265.65", 18, 19),
        ("250.65", -8, -9),
        ("245.65", -18, -18),
        ("0.65", -458, -459),
    ];
    for (kelvin, even, away) in cases {
        assert_eq!(
            convert_k_to_f_with(kelvin, RoundingRule::HalfEven).unwrap(),
            even,
            "half-even for {kelvin}"
        );
        assert_eq!(
            convert_k_to_f_with(kelvin, RoundingRule::HalfAwayFromZero).unwrap(),
            away,
            "half-away for {kelvin}"
        );
    }
}

#[test]
fn default_rule_is_half_even() {
    assert_eq!(RoundingRule::default(), RoundingRule::HalfEven);
    assert_eq!(convert_k_to_f("275.65").unwrap(), 36);
}

#[test]
fn negative_fahrenheit_ties_differ_between_rules() {
    // 250.65K is exactly -8.5F
    assert_eq!(convert_k_to_f_with("250.65", RoundingRule::HalfEven).unwrap(), -8);
    assert_eq!(
        convert_k_to_f_with("250.65", RoundingRule::HalfAwayFromZero).unwrap(),
        -9
    );
    // 17.65K is exactly -427.9F, not a tie
    assert_eq!(convert_k_to_f("17.65").unwrap(), -428);
}

#[test]
fn invalid_text_reports_the_offending_value() {
    let err: ValueConversionError = convert_k_to_f("abc").unwrap_err();
    assert_eq!(err.value, "abc");
    assert!(err.to_string().contains("'abc'"));

    assert!(convert_k_to_f("").is_err());
    assert!(convert_k_to_f("nan").is_err());
    assert!(convert_k_to_f("Infinity").is_err());
}

#[test]
fn tiny_values_convert_in_either_notation() {
    assert_eq!(convert_k_to_f("1e-30").unwrap(), -460);
    assert_eq!(
        convert_k_to_f("0.0000000000000000000000000000001").unwrap(),
        -460
    );
    assert_eq!(convert_k_to_f("3.7315E-35").unwrap(), -460);
}

#[test]
fn huge_values_are_out_of_range_not_invalid() {
    for raw in ["1e30", "1e400", "100000000000000000000000000000000"] {
        let err = convert_k_to_f(raw).unwrap_err();
        assert_eq!(err.value, raw);
        assert!(
            err.reason.contains("out of range"),
            "{raw}: unexpected reason {}",
            err.reason
        );
    }
    assert!(
        convert_k_to_f("inf")
            .unwrap_err()
            .reason
            .contains("not a finite")
    );
}

proptest! {
    #[test]
    fn converter_matches_exact_model(hundredths in 0i64..100_000_000) {
        let text = kelvin_text(hundredths);
        for rule in [RoundingRule::HalfEven, RoundingRule::HalfAwayFromZero] {
            prop_assert_eq!(
                convert_k_to_f_with(text.as_str(), rule).unwrap(),
                model(hundredths, rule)
            );
        }
    }

    #[test]
    fn decimal_and_text_inputs_agree(hundredths in 0i64..10_000_000) {
        let decimal = Decimal::new(hundredths, 2);
        prop_assert_eq!(
            kelvin_to_fahrenheit(decimal, RoundingRule::HalfEven).unwrap(),
            convert_k_to_f(kelvin_text(hundredths).as_str()).unwrap()
        );
    }

    #[test]
    fn conversion_is_monotonic(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let f_low = convert_k_to_f(kelvin_text(low).as_str()).unwrap();
        let f_high = convert_k_to_f(kelvin_text(high).as_str()).unwrap();
        prop_assert!(f_low <= f_high);
    }
}
