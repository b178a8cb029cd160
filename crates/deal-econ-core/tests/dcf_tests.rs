use deal_econ_core::dcf;
use deal_econ_core::DealEconError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// NPV
// ===========================================================================

#[test]
fn test_npv_discounts_later_flows_harder() {
    let near = vec![dec!(-100), dec!(110)];
    let far = vec![dec!(-100), dec!(0), dec!(0), dec!(110)];

    let npv_near = dcf::npv(dec!(0.05), &near).unwrap();
    let npv_far = dcf::npv(dec!(0.05), &far).unwrap();
    assert!(npv_near > npv_far);
}

#[test]
fn test_npv_zero_rate_matches_plain_sum() {
    let flows = vec![dec!(-8000), dec!(1900), dec!(1900), dec!(1900)];
    let sum: Decimal = flows.iter().sum();
    assert_eq!(dcf::npv(Decimal::ZERO, &flows).unwrap(), sum);
}

#[test]
fn test_npv_known_answer() {
    // -1000 + 1100/1.10 = 0 exactly at 10%
    let flows = vec![dec!(-1000), dec!(1100)];
    let result = dcf::npv(dec!(0.10), &flows).unwrap();
    assert!(result.abs() < dec!(0.0000001));
}

#[test]
fn test_npv_rejects_invalid_rate() {
    let flows = vec![dec!(-100), dec!(50)];
    match dcf::npv(dec!(-1.5), &flows) {
        Err(DealEconError::InvalidInput { field, .. }) => assert_eq!(field, "rate"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

// ===========================================================================
// IRR
// ===========================================================================

#[test]
fn test_irr_monthly_root_solves_npv() {
    // The reference deal's flow shape: one outflow, flat recurring inflows
    let mut flows = vec![dec!(-8000)];
    flows.extend(std::iter::repeat(dec!(1900)).take(36));

    let rate = dcf::irr(&flows, dec!(0.10)).unwrap();
    let residual = dcf::npv(rate, &flows).unwrap();
    assert!(residual.abs() < dec!(0.001), "NPV at IRR was {residual}");
    // ~23.7% monthly for this shape
    assert!(rate > dec!(0.20) && rate < dec!(0.30), "rate was {rate}");
}

#[test]
fn test_irr_break_even_deal_is_near_zero() {
    // Pays back exactly its outflow, undiscounted: IRR ≈ 0
    let flows = vec![dec!(-1000), dec!(250), dec!(250), dec!(250), dec!(250)];
    let rate = dcf::irr(&flows, dec!(0.10)).unwrap();
    assert!(rate.abs() < dec!(0.0001), "rate was {rate}");
}

#[test]
fn test_irr_all_outflows_has_no_result() {
    let flows = vec![dec!(-100), dec!(-50), dec!(-25)];
    assert!(matches!(
        dcf::irr(&flows, dec!(0.10)),
        Err(DealEconError::InsufficientData(_))
    ));
}

#[test]
fn test_irr_all_zero_flows_has_no_result() {
    let flows = vec![Decimal::ZERO; 12];
    assert!(dcf::irr(&flows, dec!(0.10)).is_err());
}

#[test]
fn test_irr_handles_extreme_guess() {
    let flows = vec![dec!(-1000), dec!(400), dec!(400), dec!(400)];
    // The guess is clamped into the search domain before iterating
    let from_high = dcf::irr(&flows, dec!(10_000)).unwrap();
    let from_low = dcf::irr(&flows, dec!(-5)).unwrap();

    assert!((from_high - from_low).abs() < dec!(0.001));
}

#[test]
fn test_annualized_irr_of_monthly_flows() {
    // 1% monthly compounds to ~12.68% annually
    let annual = dcf::annualized(dec!(0.01));
    assert!((annual - dec!(0.126825)).abs() < dec!(0.0001));
}
