//! Tests for the Money module
//!
//! Covers construction, boundary parsing, checked arithmetic and display.

use core_kernel::{Currency, Money, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_kobo() {
        let m = Money::new(dec!(100.129), Currency::NGN);
        assert_eq!(m.amount(), dec!(100.13));
    }

    #[test]
    fn test_from_minor_handles_zero_decimal_currency() {
        let m = Money::from_minor(10000, Currency::XOF);
        assert_eq!(m.amount(), dec!(10000));
    }

    #[test]
    fn test_zero_is_neither_positive_nor_negative() {
        let m = Money::zero(Currency::NGN);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_negative_balance_allowed() {
        let m = Money::new(dec!(-2500.00), Currency::NGN);
        assert!(m.is_negative());
        assert_eq!(m.abs().amount(), dec!(2500.00));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_plain_amount() {
        let m = Money::parse("5000", Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(5000));
    }

    #[test]
    fn test_parse_negative_amount() {
        let m = Money::parse("-12.50", Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(-12.50));
    }

    #[test]
    fn test_parse_rejects_infinity() {
        assert!(matches!(
            Money::parse("Infinity", Currency::NGN),
            Err(MoneyError::NonFinite(_))
        ));
        assert!(matches!(
            Money::parse("-inf", Currency::NGN),
            Err(MoneyError::NonFinite(_))
        ));
    }

    #[test]
    fn test_parse_rejects_sub_kobo_precision() {
        assert!(matches!(
            Money::parse("10.001", Currency::NGN),
            Err(MoneyError::ExcessPrecision { places: 2, .. })
        ));
    }

    #[test]
    fn test_parse_accepts_trailing_zeros_beyond_minor_unit() {
        let m = Money::parse("10.5000", Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(10.50));
    }

    #[test]
    fn test_parse_does_not_default_garbage_to_zero() {
        assert!(Money::parse("N/A", Currency::NGN).is_err());
        assert!(Money::parse("", Currency::NGN).is_err());
    }

    #[test]
    fn test_try_from_f64_rejects_non_finite() {
        assert!(matches!(
            Money::try_from_f64(f64::NAN, Currency::NGN),
            Err(MoneyError::NonFinite(_))
        ));
        assert!(matches!(
            Money::try_from_f64(f64::INFINITY, Currency::NGN),
            Err(MoneyError::NonFinite(_))
        ));
    }

    #[test]
    fn test_try_from_f64_rounds_to_minor_unit() {
        let m = Money::try_from_f64(1500.25, Currency::NGN).unwrap();
        assert_eq!(m.amount(), dec!(1500.25));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("ngn".parse::<Currency>().unwrap(), Currency::NGN);
        assert!(matches!(
            "ABC".parse::<Currency>(),
            Err(MoneyError::UnknownCurrency(_))
        ));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_add_and_sub() {
        let a = Money::new(dec!(100.00), Currency::NGN);
        let b = Money::new(dec!(40.50), Currency::NGN);

        assert_eq!(a.checked_add(&b).unwrap().amount(), dec!(140.50));
        assert_eq!(a.checked_sub(&b).unwrap().amount(), dec!(59.50));
    }

    #[test]
    fn test_checked_sub_mismatch() {
        let a = Money::new(dec!(100.00), Currency::NGN);
        let b = Money::new(dec!(1.00), Currency::GHS);

        assert!(matches!(
            a.checked_sub(&b),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_checked_sum_of_many_small_amounts_is_exact() {
        let tenth = Money::new(dec!(0.10), Currency::NGN);
        let values = vec![tenth; 1000];

        let total = Money::checked_sum(&values, Currency::NGN).unwrap();
        assert_eq!(total.amount(), dec!(100.00));
    }

    #[test]
    fn test_negation() {
        let m = Money::new(dec!(75.00), Currency::NGN);
        assert_eq!((-m).amount(), dec!(-75.00));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_naira_display() {
        let m = Money::new(dec!(14000), Currency::NGN);
        assert_eq!(m.to_string(), "₦14000.00");
    }

    #[test]
    fn test_serde_amount_is_string() {
        let m = Money::new(dec!(15000.00), Currency::NGN);
        let json = serde_json::to_value(m).unwrap();

        assert_eq!(json["currency"], "NGN");
        assert_eq!(json["amount"], "15000.00");
    }
}
