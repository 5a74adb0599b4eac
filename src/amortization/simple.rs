use rust_decimal::Decimal;

use crate::amortization::{
    next_row, overflow, settle_final_row, validate_inputs, AmortizationStrategy, Schedule,
};
use crate::decimal::{Money, Rate};
use crate::errors::Result;

/// flat interest on the original principal, repaid in equal installments
///
/// Interest is spread straight-line across periods: each row carries the
/// difference between consecutive rounded running totals, so the interest
/// column sums to the rounded total interest with no negative entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleInterest {
    precision: u32,
}

impl Default for SimpleInterest {
    fn default() -> Self {
        Self::new(2)
    }
}

impl SimpleInterest {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// principal × rate × periods, unrounded
    fn exact_total_interest(principal: Money, rate: Rate, periods: u32) -> Result<Decimal> {
        principal
            .as_decimal()
            .checked_mul(rate.as_decimal())
            .and_then(|d| d.checked_mul(Decimal::from(periods)))
            .ok_or_else(|| overflow("total interest"))
    }

    fn exact_repayment(principal: Money, rate: Rate, periods: u32) -> Result<Decimal> {
        let interest = Self::exact_total_interest(principal, rate, periods)?;
        principal
            .as_decimal()
            .checked_add(interest)
            .and_then(|total| total.checked_div(Decimal::from(periods)))
            .ok_or_else(|| overflow("repayment amount"))
    }
}

impl AmortizationStrategy for SimpleInterest {
    fn precision(&self) -> u32 {
        self.precision
    }

    fn repayment_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        validate_inputs(principal, rate, periods)?;
        let repayment = Self::exact_repayment(principal, rate, periods)?;
        Ok(Money::from_decimal_dp(repayment, self.precision))
    }

    fn total_interest_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        validate_inputs(principal, rate, periods)?;
        let interest = Self::exact_total_interest(principal, rate, periods)?;
        Ok(Money::from_decimal_dp(interest, self.precision))
    }

    fn schedule(&self, principal: Money, rate: Rate, periods: u32) -> Result<Schedule> {
        let repayment = self.repayment_amount(principal, rate, periods)?;
        let total_interest = Self::exact_total_interest(principal, rate, periods)?;
        let n = Decimal::from(periods);

        let mut rows = Vec::new();
        let mut balance = principal;
        let mut accrued = Money::ZERO;

        for i in 1..=periods {
            let running = total_interest
                .checked_mul(Decimal::from(i))
                .and_then(|d| d.checked_div(n))
                .ok_or_else(|| overflow("interest split"))?;
            let running = Money::from_decimal_dp(running, self.precision);
            let interest = running - accrued;
            accrued = running;

            let row = next_row(i, balance, interest, repayment);
            balance = row.outstanding_amount;
            rows.push(row);
        }

        settle_final_row(&mut rows, principal, accrued);
        Ok(Schedule::from_rows(rows))
    }
}
