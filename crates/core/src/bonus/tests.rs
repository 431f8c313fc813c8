//! Tests for bonus payouts.

use assessoria_shared::{AdvisorId, YearMonth};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn mission(amount: Decimal, channel: PayoutChannel, is_net: bool, active: bool) -> BonusMission {
    BonusMission {
        id: 1,
        user_id: AdvisorId::new(),
        month: YearMonth::new(2025, 2).unwrap(),
        name: "Campanha".into(),
        amount,
        channel,
        tax_treatment: TaxTreatment::from_net_flag(is_net),
        active,
    }
}

#[test]
fn test_retention_factor_is_eighty_percent() {
    assert_eq!(RETENTION_FACTOR, dec!(0.8));
}

#[rstest]
#[case(dec!(1000), TaxTreatment::Gross, dec!(800))]
#[case(dec!(1000), TaxTreatment::Net, dec!(1000))]
#[case(dec!(123.45), TaxTreatment::Gross, dec!(98.76))]
#[case(dec!(333.33), TaxTreatment::Gross, dec!(266.664))]
#[case(dec!(0.01), TaxTreatment::Gross, dec!(0.008))]
#[case(dec!(0), TaxTreatment::Gross, dec!(0))]
fn test_payable_amount(
    #[case] amount: Decimal,
    #[case] treatment: TaxTreatment,
    #[case] expected: Decimal,
) {
    assert_eq!(payable_amount(amount, treatment), expected);
}

#[test]
fn test_monthly_total_ignores_inactive() {
    let missions = vec![
        mission(dec!(1000), PayoutChannel::Xp, false, true),
        mission(dec!(500), PayoutChannel::Mb, true, true),
        mission(dec!(9999), PayoutChannel::Xp, true, false),
    ];
    assert_eq!(monthly_payable_total(&missions), dec!(1300));
}

#[test]
fn test_summary_by_channel() {
    let missions = vec![
        mission(dec!(1000), PayoutChannel::Xp, false, true),
        mission(dec!(250), PayoutChannel::Xp, true, true),
        mission(dec!(500), PayoutChannel::Mb, false, true),
        mission(dec!(700), PayoutChannel::Mb, true, false),
    ];

    let summary = BonusSummary::from_missions(&missions);

    assert_eq!(summary.active_missions, 3);
    assert_eq!(summary.inactive_missions, 1);
    assert_eq!(summary.informed_total, dec!(1750));
    assert_eq!(summary.payable_total, dec!(1450));
    assert_eq!(summary.payable_by_channel[&PayoutChannel::Xp], dec!(1050));
    assert_eq!(summary.payable_by_channel[&PayoutChannel::Mb], dec!(400));
}

#[rstest]
#[case("XP", PayoutChannel::Xp)]
#[case("mb", PayoutChannel::Mb)]
#[case(" Xp ", PayoutChannel::Xp)]
fn test_channel_parse(#[case] input: &str, #[case] expected: PayoutChannel) {
    assert_eq!(input.parse::<PayoutChannel>().unwrap(), expected);
}

#[test]
fn test_channel_parse_rejects_unknown() {
    assert!(matches!(
        "BTG".parse::<PayoutChannel>(),
        Err(BonusError::InvalidChannel(_))
    ));
}

#[test]
fn test_create_input_validation() {
    let input = CreateMissionInput {
        month: YearMonth::new(2025, 2).unwrap(),
        name: "  Previdência  ".into(),
        amount: dec!(150.005),
        channel: PayoutChannel::Xp,
        is_net: false,
        active: true,
    };
    let valid = input.clone().validate().unwrap();
    assert_eq!(valid.name, "Previdência");

    let blank = CreateMissionInput {
        name: "   ".into(),
        ..input.clone()
    };
    assert_eq!(blank.validate().unwrap_err(), BonusError::EmptyName);

    let negative = CreateMissionInput {
        amount: dec!(-1),
        ..input
    };
    assert_eq!(negative.validate().unwrap_err(), BonusError::NegativeAmount);
}

#[test]
fn test_update_input_empty() {
    assert!(UpdateMissionInput::default().is_empty());
    let update = UpdateMissionInput {
        active: Some(false),
        ..UpdateMissionInput::default()
    };
    assert!(!update.is_empty());
}

proptest! {
    /// Gross payable is exactly 80% of the amount, with no rounding.
    #[test]
    fn test_gross_payable_is_eighty_percent(cents in 0i64..10_000_000_000) {
        let amount = Decimal::new(cents, 2);
        let expected = Decimal::new(cents * 8, 3);
        prop_assert_eq!(payable_amount(amount, TaxTreatment::Gross), expected);
        prop_assert_eq!(payable_amount(amount, TaxTreatment::Net), amount);
    }
}
