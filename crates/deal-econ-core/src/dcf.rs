use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::DealEconError;
use crate::types::{Money, Rate};
use crate::DealEconResult;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_NEWTON_ITERATIONS: u32 = 30;
const MAX_BISECTION_ITERATIONS: u32 = 200;

/// Monthly-rate search domain. Early large outflows against modest recurring
/// inflows can push the root toward either extreme.
const RATE_FLOOR: Decimal = dec!(-0.9999);
const RATE_CEILING: Decimal = dec!(10);

/// Candidate lower bounds for bisection. Deep negative rates stop being
/// evaluable in Decimal once the discount factor underflows over a long
/// horizon, so the bracket backs off toward zero until NPV exists.
const FLOOR_LADDER: [Decimal; 5] = [
    dec!(-0.9999),
    dec!(-0.999),
    dec!(-0.99),
    dec!(-0.9),
    dec!(-0.5),
];

/// Convert an annual rate to the equivalent monthly compounding rate.
pub fn monthly_rate(annual: Rate) -> Rate {
    if annual.is_zero() {
        return Decimal::ZERO;
    }
    (Decimal::ONE + annual).powd(Decimal::ONE / dec!(12)) - Decimal::ONE
}

/// Annualize a monthly compounding rate.
pub fn annualized(monthly: Rate) -> Rate {
    if monthly.is_zero() {
        return Decimal::ZERO;
    }
    (Decimal::ONE + monthly).powd(dec!(12)) - Decimal::ONE
}

/// Net Present Value of an ordered cash-flow vector at a periodic rate
/// (index 0 = the inception event, discounted by 1).
pub fn npv(rate: Rate, cash_flows: &[Money]) -> DealEconResult<Money> {
    if rate <= dec!(-1) {
        return Err(DealEconError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    npv_value(rate, cash_flows).ok_or(DealEconError::DivisionByZero {
        context: "NPV discount factor".into(),
    })
}

/// Internal Rate of Return: the periodic rate at which NPV is zero.
///
/// Newton-Raphson from `guess`, falling back to bisection over
/// [-0.9999, 10], then to a coarse scan returning the rate that minimizes
/// |NPV| when no bracketed root exists. Iteration counts are bounded, so the
/// solver always terminates. Multiple roots are not disambiguated; the first
/// root found in the domain wins.
pub fn irr(cash_flows: &[Money], guess: Rate) -> DealEconResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(DealEconError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let has_inflow = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
    let has_outflow = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
    if !has_inflow || !has_outflow {
        return Err(DealEconError::InsufficientData(
            "IRR requires at least one inflow and one outflow".into(),
        ));
    }

    if let Some(rate) = newton_irr(cash_flows, guess) {
        return Ok(rate);
    }
    if let Some(rate) = bisect_irr(cash_flows) {
        return Ok(rate);
    }

    // No sign change in the domain: report the closest approach instead of
    // failing outright.
    scan_irr(cash_flows).ok_or_else(|| DealEconError::ConvergenceFailure {
        function: "IRR".into(),
        iterations: MAX_BISECTION_ITERATIONS,
        last_delta: npv_value(guess, cash_flows).unwrap_or(Decimal::ZERO),
    })
}

/// NPV with checked arithmetic. `None` when the evaluation leaves Decimal
/// range (discount factor underflow near -100%, or overflow of a term).
fn npv_value(rate: Rate, cash_flows: &[Money]) -> Option<Money> {
    let one_plus_r = Decimal::ONE + rate;
    let mut result = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            match discount.checked_mul(one_plus_r) {
                Some(d) => discount = d,
                // Factor overflow: the remaining terms are vanishingly small.
                None => break,
            }
        }
        if discount.is_zero() {
            return None;
        }
        result = result.checked_add(cf.checked_div(discount)?)?;
    }

    Some(result)
}

/// NPV and its derivative with respect to the rate, both via iterative
/// discount factors. `None` when the evaluation leaves Decimal range.
fn npv_and_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            match discount.checked_mul(one_plus_r) {
                Some(d) => discount = d,
                None => break,
            }
        }
        if discount.is_zero() {
            return None;
        }
        npv_val = npv_val.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let t_dec = Decimal::from(t as i64);
            let denom = discount.checked_mul(one_plus_r)?;
            dnpv = dnpv.checked_sub(t_dec.checked_mul(*cf)?.checked_div(denom)?)?;
        }
    }

    Some((npv_val, dnpv))
}

fn clamp_rate(rate: Rate) -> Rate {
    rate.clamp(RATE_FLOOR, RATE_CEILING)
}

fn newton_irr(cash_flows: &[Money], guess: Rate) -> Option<Rate> {
    let mut rate = clamp_rate(guess);

    for _ in 0..MAX_NEWTON_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(rate, cash_flows)?;
        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Some(rate);
        }
        if dnpv.is_zero() {
            return None;
        }
        rate = clamp_rate(rate - npv_val.checked_div(dnpv)?);
    }

    None
}

fn bisect_irr(cash_flows: &[Money]) -> Option<Rate> {
    let (mut lo, mut npv_lo) = FLOOR_LADDER
        .iter()
        .find_map(|&r| npv_value(r, cash_flows).map(|v| (r, v)))?;
    let mut hi = RATE_CEILING;
    let npv_hi = npv_value(hi, cash_flows)?;

    if npv_lo.abs() < CONVERGENCE_THRESHOLD {
        return Some(lo);
    }
    if npv_hi.abs() < CONVERGENCE_THRESHOLD {
        return Some(hi);
    }
    if npv_lo.is_sign_positive() == npv_hi.is_sign_positive() {
        return None;
    }

    let mut mid = lo;
    for _ in 0..MAX_BISECTION_ITERATIONS {
        mid = (lo + hi) / dec!(2);
        let npv_mid = npv_value(mid, cash_flows)?;
        if npv_mid.abs() < CONVERGENCE_THRESHOLD {
            return Some(mid);
        }
        if npv_mid.is_sign_positive() == npv_lo.is_sign_positive() {
            lo = mid;
            npv_lo = npv_mid;
        } else {
            hi = mid;
        }
    }

    // Iteration cap reached: the midpoint is the best bracketed estimate.
    Some(mid)
}

/// Coarse scan over a bounded sub-range, returning the rate minimizing |NPV|.
fn scan_irr(cash_flows: &[Money]) -> Option<Rate> {
    let mut best: Option<(Rate, Decimal)> = None;
    let mut rate = dec!(-0.95);

    while rate <= dec!(3) {
        if let Some(v) = npv_value(rate, cash_flows) {
            let dist = v.abs();
            if best.as_ref().map_or(true, |(_, b)| dist < *b) {
                best = Some((rate, dist));
            }
        }
        rate += dec!(0.01);
    }

    best.map(|(r, _)| r)
}
