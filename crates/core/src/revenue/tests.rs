//! Tests for revenue aggregation.

use assessoria_shared::{ClientId, YearMonth};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn month(m: u32) -> YearMonth {
    YearMonth::new(2025, m).unwrap()
}

fn row(id: i64, m: u32, code: &str, family: Option<&str>, office: Decimal, net: Decimal) -> RevenueRow {
    RevenueRow {
        id,
        month: month(m),
        client_code: Some(code.to_string()),
        family: family.map(str::to_string),
        office_commission: office,
        net_value: net,
    }
}

fn client(code_xp: &str, model: ClientModel, pass_through: Decimal, net: Decimal) -> ClientPosition {
    ClientPosition {
        id: ClientId::new(),
        name: "Cliente".into(),
        code_xp: Some(code_xp.to_string()),
        code_mb: None,
        model,
        pass_through,
        net_total: net,
    }
}

#[rstest]
#[case("Lanc Administrativo", true)]
#[case("LANÇ. ADMINISTRATIVO", true)]
#[case("lanc adm", true)]
#[case("Lanc Adm - Estorno", true)]
#[case("Renda Fixa", false)]
#[case("Administrativo", false)]
#[case("", false)]
fn test_is_admin_family(#[case] family: &str, #[case] expected: bool) {
    assert_eq!(is_admin_family(family), expected);
}

#[rstest]
#[case("XP 123456", "123456")]
#[case("12-3456789", "3456789")]
#[case("A1B22C333", "333")]
#[case("11-22", "11")]
#[case("sem codigo", "")]
fn test_extract_code_digits(#[case] code: &str, #[case] expected: &str) {
    assert_eq!(extract_code_digits(code), expected);
}

#[test]
fn test_normalize_label() {
    assert_eq!(normalize_label("  Consórcio / Seguro  "), "consorcio seguro");
}

#[test]
fn test_monthly_series_zero_fills_and_excludes_admin_from_advisor() {
    let rows = vec![
        row(1, 2, "1", Some("Renda Fixa"), dec!(100), dec!(80)),
        row(2, 2, "2", Some("Lanc Adm"), dec!(50), dec!(40)),
        row(3, 5, "1", None, dec!(10), dec!(8)),
    ];

    let series = monthly_series(&rows, 2025);

    assert_eq!(series.len(), 12);
    assert_eq!(series[0].office_total, Decimal::ZERO);
    assert_eq!(series[1].office_total, dec!(150));
    assert_eq!(series[1].advisor_total, dec!(80));
    assert_eq!(series[1].rows, 2);
    assert_eq!(series[4].advisor_total, dec!(8));
}

#[test]
fn test_monthly_series_ignores_other_years() {
    let mut other = row(1, 2, "1", None, dec!(100), dec!(80));
    other.month = YearMonth::new(2024, 2).unwrap();
    let series = monthly_series(&[other], 2025);
    assert!(series.iter().all(|m| m.rows == 0));
}

#[test]
fn test_revenue_by_client_uses_canonical_codes() {
    let rows = vec![
        row(1, 2, "XP 123", None, dec!(10), dec!(0)),
        row(2, 2, "123", None, dec!(5), dec!(0)),
        row(3, 2, "456", None, dec!(1), dec!(0)),
    ];
    let totals = revenue_by_client(&rows);
    assert_eq!(totals["123"], dec!(15));
    assert_eq!(totals["456"], dec!(1));
}

#[test]
fn test_revenue_by_model_defaults_to_tradicional() {
    let clients = vec![client("XP-111", ClientModel::FeeBased, dec!(50), dec!(1000))];
    let rows = vec![
        row(1, 2, "111", None, dec!(100), dec!(70)),
        row(2, 2, "999", None, dec!(30), dec!(20)),
    ];

    let by_model = revenue_by_model(&rows, &clients);
    let feb = &by_model[&month(2)];

    assert_eq!(feb[&ClientModel::FeeBased].office, dec!(100));
    assert_eq!(feb[&ClientModel::Tradicional].advisor, dec!(20));
}

#[rstest]
#[case("FEE_BASED", ClientModel::FeeBased)]
#[case("fee based sem rv", ClientModel::FeeBasedSemRv)]
#[case("Asset", ClientModel::Asset)]
fn test_client_model_parse(#[case] input: &str, #[case] expected: ClientModel) {
    assert_eq!(input.parse::<ClientModel>().unwrap(), expected);
}

#[test]
fn test_client_model_lenient_default() {
    assert_eq!(ClientModel::parse_lenient(None), ClientModel::Tradicional);
    assert_eq!(ClientModel::parse_lenient(Some("???")), ClientModel::Tradicional);
}

#[test]
fn test_weighted_pass_through() {
    let clients = vec![
        client("1", ClientModel::Tradicional, dec!(35), dec!(1000)),
        client("2", ClientModel::Tradicional, dec!(50), dec!(3000)),
        client("3", ClientModel::Tradicional, dec!(100), dec!(0)),
    ];
    // (1000*0.35 + 3000*0.50) / 4000 = 0.4625
    assert_eq!(weighted_pass_through(&clients), Some(dec!(0.4625)));
}

#[test]
fn test_advisor_revenue_formula() {
    let clients = vec![
        client("1", ClientModel::Tradicional, dec!(35), dec!(1000)),
        client("2", ClientModel::Tradicional, dec!(50), dec!(3000)),
    ];

    let revenue = advisor_revenue(dec!(10000), &clients, dec!(800));

    // 10000 * 0.80 * 0.4625 = 3700
    assert_eq!(revenue.from_office, dec!(3700.00));
    assert_eq!(revenue.total, dec!(4500.00));
}

#[rstest]
#[case::no_clients(dec!(0), vec![], None)]
#[case::negative_office(dec!(-5), vec![client("1", ClientModel::Tradicional, dec!(35), dec!(10))], Some(dec!(0.35)))]
#[case::no_positive_net(dec!(10000), vec![client("1", ClientModel::Tradicional, dec!(35), dec!(0)), client("2", ClientModel::Tradicional, dec!(50), dec!(-200))], None)]
#[case::zero_pass_through(dec!(10000), vec![client("1", ClientModel::Tradicional, dec!(0), dec!(1000))], Some(dec!(0)))]
fn test_advisor_revenue_degenerate_cases_are_zero(
    #[case] office: Decimal,
    #[case] clients: Vec<ClientPosition>,
    #[case] weighted: Option<Decimal>,
) {
    let revenue = advisor_revenue(office, &clients, dec!(500));

    assert_eq!(revenue.weighted_pass_through, weighted);
    assert_eq!(revenue.from_office, Decimal::ZERO);
    assert_eq!(revenue.bonus, Decimal::ZERO);
    assert_eq!(revenue.total, Decimal::ZERO);
}

#[test]
fn test_office_share_constant() {
    assert_eq!(OFFICE_SHARE, dec!(0.80));
}
