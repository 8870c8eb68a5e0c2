//! Investment return metrics over an annual free-cash-flow series
//!
//! Year 0 is the undiscounted base investment; year `t` is discounted by
//! `(1 + rate)^t`.

use super::records::Payback;
use crate::error::{ModelError, Result};

/// Search limits for the IRR solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrConfig {
    /// Newton-Raphson starting rate
    pub initial_guess: f64,
    /// Lower bound of the search bracket
    pub lower_bound: f64,
    /// Upper bound of the search bracket
    pub upper_bound: f64,
    /// Convergence tolerance on the rate
    pub tolerance: f64,
    /// Iteration cap, applied separately to Newton and to bisection
    pub max_iterations: u32,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            lower_bound: -0.99,
            upper_bound: 10.0,
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

/// Net present value at an annual rate
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        value += cf / (1.0 + rate).powi(t as i32);
        if t > 0 {
            derivative -= (t as f64) * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (value, derivative)
}

/// Internal rate of return of an annual cash-flow series.
///
/// Newton-Raphson from `initial_guess`, clamped to the bracket, with a
/// bisection fallback over `[lower_bound, upper_bound]`.
///
/// # Errors
/// `NoConvergence` when the series has no sign change, when the bracket does
/// not contain a root, or when both methods exhaust their iterations.
pub fn calculate_irr(cashflows: &[f64], config: &IrrConfig) -> Result<f64> {
    if cashflows.is_empty() {
        return Err(ModelError::NoConvergence {
            reason: "empty cash-flow series",
        });
    }

    // A root requires at least one inflow and one outflow
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(ModelError::NoConvergence {
            reason: "cash flows never change sign",
        });
    }

    let mut rate = config.initial_guess;

    for _ in 0..config.max_iterations {
        let (value, derivative) = npv_and_derivative(cashflows, rate);

        if derivative.abs() < 1e-20 {
            return calculate_irr_bisection(cashflows, config);
        }

        let new_rate = (rate - value / derivative).clamp(config.lower_bound, config.upper_bound);

        if (new_rate - rate).abs() < config.tolerance {
            // Pinned against a bound is only a root if NPV vanishes there
            let pinned = new_rate <= config.lower_bound || new_rate >= config.upper_bound;
            if pinned && npv(cashflows, new_rate).abs() > config.tolerance {
                break;
            }
            return Ok(new_rate);
        }

        rate = new_rate;
    }

    log::debug!("Newton-Raphson IRR did not settle, falling back to bisection");
    calculate_irr_bisection(cashflows, config)
}

/// Fallback IRR calculation using bisection method
fn calculate_irr_bisection(cashflows: &[f64], config: &IrrConfig) -> Result<f64> {
    let mut low = config.lower_bound;
    let mut high = config.upper_bound;

    let mut npv_low = npv(cashflows, low);
    let npv_high = npv(cashflows, high);

    if npv_low * npv_high > 0.0 {
        return Err(ModelError::NoConvergence {
            reason: "no sign change within the search bracket",
        });
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);

        if npv_mid.abs() < config.tolerance || (high - low) / 2.0 < config.tolerance {
            return Ok(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(ModelError::NoConvergence {
        reason: "iteration cap reached",
    })
}

/// First year whose cumulative cash flow is non-negative
pub fn payback_period(cashflows: &[f64]) -> Payback {
    let mut cumulative = 0.0;
    for (year, &cf) in cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Payback::Year(year as u32);
        }
    }
    Payback::BeyondHorizon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 1000, receive 1100 a year later
        let irr = calculate_irr(&[-1000.0, 1100.0], &IrrConfig::default()).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_irr_zeroes_npv() {
        let cashflows = [-8_000.0, 1_000.0, 2_500.0, 3_500.0, 4_000.0];
        let irr = calculate_irr(&cashflows, &IrrConfig::default()).unwrap();
        assert!(npv(&cashflows, irr).abs() < 1e-6);
    }

    #[test]
    fn test_irr_negative_rate() {
        // Gets back less than invested
        let irr = calculate_irr(&[-1000.0, 500.0, 400.0], &IrrConfig::default()).unwrap();
        assert!(irr < 0.0);
        assert!(npv(&[-1000.0, 500.0, 400.0], irr).abs() < 1e-6);
    }

    #[test]
    fn test_no_sign_change() {
        let result = calculate_irr(&[-1000.0, -10.0, -5.0], &IrrConfig::default());
        assert!(matches!(result, Err(ModelError::NoConvergence { .. })));
        assert!(calculate_irr(&[], &IrrConfig::default()).is_err());
    }

    #[test]
    fn test_root_outside_bracket() {
        // The only root is 10%, below the searched range
        let config = IrrConfig {
            initial_guess: 1.0,
            lower_bound: 0.5,
            upper_bound: 2.0,
            ..IrrConfig::default()
        };
        match calculate_irr(&[-1000.0, 1100.0], &config) {
            Err(ModelError::NoConvergence { reason }) => {
                assert_eq!(reason, "no sign change within the search bracket")
            }
            other => panic!("expected NoConvergence, got {:?}", other),
        }

        // A root on the bound itself is still found
        let config = IrrConfig {
            lower_bound: 0.10,
            ..config
        };
        let irr = calculate_irr(&[-1000.0, 1100.0], &config).unwrap();
        assert_relative_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_npv_year_zero_undiscounted() {
        assert_relative_eq!(npv(&[-100.0], 0.10), -100.0);
        assert_relative_eq!(npv(&[-100.0, 110.0], 0.10), 0.0, epsilon = 1e-9);
        assert_relative_eq!(npv(&[0.0, 0.0, 121.0], 0.10), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_payback() {
        assert_eq!(payback_period(&[-100.0, 40.0, 60.0, 10.0]), Payback::Year(2));
        assert_eq!(payback_period(&[5.0, -1.0]), Payback::Year(0));
        assert_eq!(payback_period(&[-100.0, 10.0, 10.0]), Payback::BeyondHorizon);
        assert_eq!(payback_period(&[]), Payback::BeyondHorizon);
    }
}
