use rust_decimal::Decimal;

use crate::amortization::{
    next_row, overflow, settle_final_row, validate_inputs, AmortizationStrategy, Schedule,
};
use crate::decimal::{Money, Rate};
use crate::errors::Result;

/// declining-balance amortization with equal installments
///
/// installment = P × r / (1 − (1 + r)^−n), falling back to P / n when the
/// rate is zero or too small to register at decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundInterest {
    precision: u32,
}

impl Default for CompoundInterest {
    fn default() -> Self {
        Self::new(2)
    }
}

impl CompoundInterest {
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    fn exact_repayment(principal: Money, rate: Rate, periods: u32) -> Result<Decimal> {
        let p = principal.as_decimal();
        let r = rate.as_decimal();
        let n = Decimal::from(periods);

        if r.is_zero() {
            return Ok(p / n);
        }

        let base = Decimal::ONE
            .checked_add(r)
            .and_then(|growth| Decimal::ONE.checked_div(growth))
            .ok_or_else(|| overflow("discount factor"))?;
        let denominator = Decimal::ONE - pow(base, periods);

        if denominator <= Decimal::ZERO {
            return Ok(p / n);
        }

        p.checked_mul(r)
            .and_then(|interest| interest.checked_div(denominator))
            .ok_or_else(|| overflow("repayment amount"))
    }
}

/// base^exp by squaring; `base` is a discount factor in (0, 1]
fn pow(mut base: Decimal, mut exp: u32) -> Decimal {
    let mut acc = Decimal::ONE;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.checked_mul(base).unwrap_or(Decimal::ZERO);
        }
        base = base.checked_mul(base).unwrap_or(Decimal::ZERO);
        exp >>= 1;
    }
    acc
}

impl AmortizationStrategy for CompoundInterest {
    fn precision(&self) -> u32 {
        self.precision
    }

    fn repayment_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        validate_inputs(principal, rate, periods)?;
        let repayment = Self::exact_repayment(principal, rate, periods)?;
        Ok(Money::from_decimal_dp(repayment, self.precision))
    }

    /// installments paid over the term less the principal
    ///
    /// Zero for an interest-free loan, where installments of P / n may round
    /// slightly above or below the principal.
    fn total_interest_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        let repayment = self.repayment_amount(principal, rate, periods)?;
        if rate.is_zero() {
            return Ok(Money::ZERO);
        }

        let interest = repayment
            .as_decimal()
            .checked_mul(Decimal::from(periods))
            .map(|total| total - principal.as_decimal())
            .ok_or_else(|| overflow("total interest"))?;
        Ok(Money::from_decimal_dp(interest.max(Decimal::ZERO), self.precision))
    }

    fn schedule(&self, principal: Money, rate: Rate, periods: u32) -> Result<Schedule> {
        let repayment = self.repayment_amount(principal, rate, periods)?;
        let total_interest = self.total_interest_amount(principal, rate, periods)?;
        let r = rate.as_decimal();

        let mut rows = Vec::new();
        let mut balance = principal;

        for i in 1..=periods {
            let interest = balance
                .as_decimal()
                .checked_mul(r)
                .ok_or_else(|| overflow("period interest"))?;
            let interest = Money::from_decimal_dp(interest, self.precision);
            let row = next_row(i, balance, interest, repayment);
            balance = row.outstanding_amount;
            rows.push(row);
        }

        settle_final_row(&mut rows, principal, total_interest);
        Ok(Schedule::from_rows(rows))
    }
}
