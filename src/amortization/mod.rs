pub mod compound;
pub mod simple;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::InterestMethod;

pub use compound::CompoundInterest;
pub use simple::SimpleInterest;

/// one amortization period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based
    pub period_index: u32,
    pub capital_amount: Money,
    pub interest_amount: Money,
    /// capital + interest
    pub repayment_amount: Money,
    /// balance left after this period's payment
    pub outstanding_amount: Money,
}

/// ordered amortization schedule, period 1 first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub(crate) fn from_rows(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// row for a 1-based period
    pub fn period(&self, period_index: u32) -> Option<&ScheduleRow> {
        let idx = period_index.checked_sub(1)?;
        self.rows.get(idx as usize)
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    pub fn total_capital(&self) -> Money {
        self.rows.iter().map(|r| r.capital_amount).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest_amount).sum()
    }

    pub fn total_repayment(&self) -> Money {
        self.rows.iter().map(|r| r.repayment_amount).sum()
    }

    pub fn into_rows(self) -> Vec<ScheduleRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// scalar figures for one set of loan terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub repayment_amount: Money,
    pub total_interest_amount: Money,
    pub total_payable_amount: Money,
}

/// parameters of a loan to amortize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// rate per repayment period, as a fraction
    pub rate: Rate,
    pub periods: u32,
    pub method: InterestMethod,
}

impl LoanTerms {
    pub fn new(principal: Money, rate: Rate, periods: u32, method: InterestMethod) -> Self {
        Self {
            principal,
            rate,
            periods,
            method,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_inputs(self.principal, self.rate, self.periods)
    }

    /// strategy for these terms at the given currency precision
    pub fn amortizer(&self, precision: u32) -> Amortizer {
        Amortizer::for_method(self.method, precision)
    }

    pub fn summary(&self, precision: u32) -> Result<ScheduleSummary> {
        self.amortizer(precision)
            .summary(self.principal, self.rate, self.periods)
    }

    pub fn schedule(&self, precision: u32) -> Result<Schedule> {
        self.amortizer(precision)
            .schedule(self.principal, self.rate, self.periods)
    }
}

/// capability shared by every interest strategy
///
/// [`SimpleInterest`] accrues interest on the original principal for the
/// whole term and spreads it evenly. [`CompoundInterest`] is classic
/// declining-balance amortization with equal installments. Every figure is
/// rounded to the strategy's currency precision, and [`settle_final_row`]
/// closes each schedule so its columns add up to the scalar totals.
///
/// All operations are pure and fail with [`LoanError::InvalidInput`] when
/// `periods` is zero or `principal`/`rate` is negative.
pub trait AmortizationStrategy {
    /// currency precision results are rounded to
    fn precision(&self) -> u32;

    /// per-period installment
    fn repayment_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money>;

    fn total_interest_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money>;

    /// principal plus total interest
    fn total_payable_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        let interest = self.total_interest_amount(principal, rate, periods)?;
        Ok((principal + interest).round_dp(self.precision()))
    }

    /// full schedule with exactly `periods` rows
    fn schedule(&self, principal: Money, rate: Rate, periods: u32) -> Result<Schedule>;

    fn summary(&self, principal: Money, rate: Rate, periods: u32) -> Result<ScheduleSummary> {
        Ok(ScheduleSummary {
            repayment_amount: self.repayment_amount(principal, rate, periods)?,
            total_interest_amount: self.total_interest_amount(principal, rate, periods)?,
            total_payable_amount: self.total_payable_amount(principal, rate, periods)?,
        })
    }
}

/// the strategy picked for an [`InterestMethod`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amortizer {
    Simple(SimpleInterest),
    Compound(CompoundInterest),
}

impl Amortizer {
    pub fn for_method(method: InterestMethod, precision: u32) -> Self {
        match method {
            InterestMethod::Simple => Amortizer::Simple(SimpleInterest::new(precision)),
            InterestMethod::Compound => Amortizer::Compound(CompoundInterest::new(precision)),
        }
    }

    pub fn method(&self) -> InterestMethod {
        match self {
            Amortizer::Simple(_) => InterestMethod::Simple,
            Amortizer::Compound(_) => InterestMethod::Compound,
        }
    }
}

impl AmortizationStrategy for Amortizer {
    fn precision(&self) -> u32 {
        match self {
            Amortizer::Simple(s) => s.precision(),
            Amortizer::Compound(c) => c.precision(),
        }
    }

    fn repayment_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        match self {
            Amortizer::Simple(s) => s.repayment_amount(principal, rate, periods),
            Amortizer::Compound(c) => c.repayment_amount(principal, rate, periods),
        }
    }

    fn total_interest_amount(&self, principal: Money, rate: Rate, periods: u32) -> Result<Money> {
        match self {
            Amortizer::Simple(s) => s.total_interest_amount(principal, rate, periods),
            Amortizer::Compound(c) => c.total_interest_amount(principal, rate, periods),
        }
    }

    fn schedule(&self, principal: Money, rate: Rate, periods: u32) -> Result<Schedule> {
        let schedule = match self {
            Amortizer::Simple(s) => s.schedule(principal, rate, periods),
            Amortizer::Compound(c) => c.schedule(principal, rate, periods),
        }?;

        debug!(
            "{:?} schedule: {} periods, principal {}, rate {}, total interest {}",
            self.method(),
            schedule.len(),
            principal,
            rate,
            schedule.total_interest()
        );

        Ok(schedule)
    }
}

pub(crate) fn validate_inputs(principal: Money, rate: Rate, periods: u32) -> Result<()> {
    if periods == 0 {
        return Err(LoanError::invalid_input("periods must be greater than zero"));
    }
    if principal.is_negative() {
        return Err(LoanError::invalid_input(format!(
            "principal must not be negative, got {}",
            principal
        )));
    }
    if rate.is_negative() {
        return Err(LoanError::invalid_input(format!(
            "rate must not be negative, got {}",
            rate
        )));
    }
    Ok(())
}

pub(crate) fn overflow(what: &str) -> LoanError {
    LoanError::invalid_input(format!("{} overflows the decimal range", what))
}

/// close the schedule at exactly zero
///
/// The last row's capital becomes whatever principal the earlier rows left
/// unpaid and its interest whatever part of `total_interest` they left
/// unaccrued. When earlier rows already accrued more than `total_interest`,
/// the excess comes back off their interest, latest row first.
pub fn settle_final_row(rows: &mut [ScheduleRow], principal: Money, total_interest: Money) {
    let Some((last, earlier)) = rows.split_last_mut() else {
        return;
    };

    let capital_before: Money = earlier.iter().map(|r| r.capital_amount).sum();
    let interest_before: Money = earlier.iter().map(|r| r.interest_amount).sum();

    let capital = (principal - capital_before).max(Money::ZERO);
    let mut interest = total_interest - interest_before;

    if interest.is_negative() {
        let mut excess = Money::ZERO - interest;
        for row in earlier.iter_mut().rev() {
            if excess.is_zero() {
                break;
            }
            let taken = excess.min(row.interest_amount);
            row.interest_amount -= taken;
            row.repayment_amount -= taken;
            excess -= taken;
        }
        interest = Money::ZERO;
    }

    if capital != last.capital_amount || interest != last.interest_amount {
        debug!(
            "final row {} absorbs rounding remainder: capital {} -> {}, interest {} -> {}",
            last.period_index, last.capital_amount, capital, last.interest_amount, interest
        );
    }

    last.capital_amount = capital;
    last.interest_amount = interest;
    last.repayment_amount = capital + interest;
    last.outstanding_amount = Money::ZERO;
}

/// build a row from its interest and repayment, never paying past `balance`
pub(crate) fn next_row(
    period_index: u32,
    balance: Money,
    interest: Money,
    repayment: Money,
) -> ScheduleRow {
    let capital = (repayment - interest).max(Money::ZERO).min(balance);
    let row = ScheduleRow {
        period_index,
        capital_amount: capital,
        interest_amount: interest,
        repayment_amount: capital + interest,
        outstanding_amount: balance - capital,
    };
    trace!(
        "period {}: capital {}, interest {}, outstanding {}",
        row.period_index,
        row.capital_amount,
        row.interest_amount,
        row.outstanding_amount
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::from_decimal(d)
    }

    fn row(
        period_index: u32,
        capital: Decimal,
        interest: Decimal,
        outstanding: Decimal,
    ) -> ScheduleRow {
        ScheduleRow {
            period_index,
            capital_amount: money(capital),
            interest_amount: money(interest),
            repayment_amount: money(capital + interest),
            outstanding_amount: money(outstanding),
        }
    }

    #[test]
    fn test_amortizer_selection_is_exhaustive() {
        let simple = Amortizer::for_method(InterestMethod::Simple, 2);
        let compound = Amortizer::for_method(InterestMethod::Compound, 2);

        assert_eq!(simple.method(), InterestMethod::Simple);
        assert_eq!(compound.method(), InterestMethod::Compound);
        assert_eq!(compound.precision(), 2);
    }

    #[test]
    fn test_every_operation_rejects_zero_periods() {
        for method in [InterestMethod::Simple, InterestMethod::Compound] {
            let amortizer = Amortizer::for_method(method, 2);
            let p = Money::from_major(1_000);
            let r = Rate::from_percentage(1);

            assert!(matches!(
                amortizer.repayment_amount(p, r, 0),
                Err(LoanError::InvalidInput { .. })
            ));
            assert!(matches!(
                amortizer.total_interest_amount(p, r, 0),
                Err(LoanError::InvalidInput { .. })
            ));
            assert!(matches!(
                amortizer.total_payable_amount(p, r, 0),
                Err(LoanError::InvalidInput { .. })
            ));
            assert!(matches!(
                amortizer.schedule(p, r, 0),
                Err(LoanError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_negative_inputs() {
        for method in [InterestMethod::Simple, InterestMethod::Compound] {
            let amortizer = Amortizer::for_method(method, 2);
            let negative_principal = money(dec!(-1));
            let negative_rate = Rate::from_decimal(dec!(-0.01));

            assert!(amortizer.schedule(negative_principal, Rate::ZERO, 12).is_err());
            assert!(amortizer
                .repayment_amount(Money::from_major(100), negative_rate, 12)
                .is_err());
        }
    }

    #[test]
    fn test_loan_terms_dispatch() {
        let terms = LoanTerms::new(
            Money::from_major(1_000),
            Rate::from_decimal(dec!(0.01)),
            12,
            InterestMethod::Compound,
        );
        let summary = terms.summary(2).unwrap();

        assert_eq!(summary.repayment_amount, money(dec!(88.85)));
        assert_eq!(terms.schedule(2).unwrap().len(), 12);
        assert!(terms.validate().is_ok());

        let bad = LoanTerms { periods: 0, ..terms };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_settle_final_row_zeroes_balance() {
        let mut rows = vec![
            row(1, dec!(33.33), dec!(0), dec!(66.67)),
            row(2, dec!(33.33), dec!(0), dec!(33.34)),
            row(3, dec!(33.33), dec!(1), dec!(0.01)),
        ];

        settle_final_row(&mut rows, Money::from_major(100), Money::from_major(1));

        let last = rows[2];
        assert_eq!(last.capital_amount, money(dec!(33.34)));
        assert_eq!(last.interest_amount, money(dec!(1)));
        assert_eq!(last.repayment_amount, money(dec!(34.34)));
        assert_eq!(last.outstanding_amount, Money::ZERO);
        assert_eq!(
            rows.iter().map(|r| r.capital_amount).sum::<Money>(),
            Money::from_major(100)
        );
    }

    #[test]
    fn test_settle_final_row_reconciles_interest() {
        let mut rows = vec![
            row(1, dec!(50), dec!(2.00), dec!(50)),
            row(2, dec!(50), dec!(1.00), dec!(0)),
        ];

        settle_final_row(&mut rows, Money::from_major(100), money(dec!(2.50)));

        assert_eq!(rows[1].interest_amount, money(dec!(0.50)));
        assert_eq!(rows[1].repayment_amount, money(dec!(50.50)));
        assert_eq!(rows[0], row(1, dec!(50), dec!(2.00), dec!(50)));
    }

    #[test]
    fn test_settle_final_row_returns_excess_interest() {
        let mut rows = vec![
            row(1, dec!(40), dec!(0.02), dec!(60)),
            row(2, dec!(30), dec!(0.01), dec!(30)),
            row(3, dec!(30), dec!(0.01), dec!(0)),
        ];

        // earlier rows accrued 0.03 against a total of 0.02
        settle_final_row(&mut rows, Money::from_major(100), money(dec!(0.02)));

        assert_eq!(rows[2].interest_amount, Money::ZERO);
        assert_eq!(rows[1].interest_amount, Money::ZERO);
        assert_eq!(rows[1].repayment_amount, money(dec!(30)));
        assert_eq!(rows[0].interest_amount, money(dec!(0.02)));

        let schedule = Schedule::from_rows(rows);
        assert_eq!(schedule.total_interest(), money(dec!(0.02)));
        assert_eq!(schedule.total_capital(), Money::from_major(100));
    }

    #[test]
    fn test_settle_final_row_on_empty_slice() {
        let mut rows: Vec<ScheduleRow> = Vec::new();
        settle_final_row(&mut rows, Money::from_major(100), Money::ZERO);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_schedule_accessors() {
        let schedule = SimpleInterest::new(2)
            .schedule(Money::from_major(1_000), Rate::from_decimal(dec!(0.01)), 10)
            .unwrap();

        assert_eq!(schedule.period(1).unwrap().period_index, 1);
        assert_eq!(schedule.period(10), schedule.last());
        assert!(schedule.period(0).is_none());
        assert!(schedule.period(11).is_none());
        assert_eq!(schedule.total_capital(), Money::from_major(1_000));
        assert_eq!(schedule.total_interest(), Money::from_major(100));
        assert_eq!(schedule.total_repayment(), Money::from_major(1_100));
        assert_eq!((&schedule).into_iter().count(), 10);
    }

    fn methods() -> impl Strategy<Value = InterestMethod> {
        prop_oneof![Just(InterestMethod::Simple), Just(InterestMethod::Compound)]
    }

    proptest! {
        #[test]
        fn prop_schedule_fully_amortizes(
            cents in 0i64..100_000_000,
            bps in 0u32..500,
            periods in 1u32..=360,
            method in methods(),
        ) {
            let principal = Money::from_minor(cents, 2);
            let rate = Rate::from_bps(bps);
            let amortizer = Amortizer::for_method(method, 2);

            let schedule = amortizer.schedule(principal, rate, periods).unwrap();

            prop_assert_eq!(schedule.len(), periods as usize);
            for (i, row) in schedule.iter().enumerate() {
                prop_assert_eq!(row.period_index, i as u32 + 1);
                prop_assert_eq!(row.repayment_amount, row.capital_amount + row.interest_amount);
                prop_assert!(!row.outstanding_amount.is_negative());
                prop_assert!(!row.capital_amount.is_negative());
                prop_assert!(!row.interest_amount.is_negative());
            }
            prop_assert_eq!(schedule.total_capital(), principal);
            prop_assert_eq!(schedule.last().unwrap().outstanding_amount, Money::ZERO);
        }

        #[test]
        fn prop_interest_column_matches_total_interest(
            cents in 0i64..100_000_000,
            bps in 0u32..500,
            periods in 1u32..=600,
            method in methods(),
        ) {
            let principal = Money::from_minor(cents, 2);
            let rate = Rate::from_bps(bps);
            let amortizer = Amortizer::for_method(method, 2);

            let schedule = amortizer.schedule(principal, rate, periods).unwrap();
            let total_interest = amortizer
                .total_interest_amount(principal, rate, periods)
                .unwrap();

            prop_assert_eq!(schedule.total_interest(), total_interest);
            prop_assert_eq!(
                schedule.total_repayment(),
                amortizer.total_payable_amount(principal, rate, periods).unwrap()
            );
        }

        #[test]
        fn prop_compound_total_interest_is_installments_less_principal(
            cents in 0i64..100_000_000,
            bps in 1u32..500,
            periods in 1u32..=360,
        ) {
            let principal = Money::from_minor(cents, 2);
            let rate = Rate::from_bps(bps);
            let compound = CompoundInterest::new(2);

            let summary = compound.summary(principal, rate, periods).unwrap();
            let installments = summary.repayment_amount * Decimal::from(periods);

            prop_assert_eq!(
                summary.total_interest_amount,
                (installments - principal).max(Money::ZERO)
            );
            prop_assert_eq!(summary.total_payable_amount, installments.max(principal));
        }

        #[test]
        fn prop_total_payable_matches_installments(
            cents in 0i64..100_000_000,
            bps in 0u32..500,
            periods in 1u32..=360,
            method in methods(),
        ) {
            let principal = Money::from_minor(cents, 2);
            let rate = Rate::from_bps(bps);
            let amortizer = Amortizer::for_method(method, 2);

            let summary = amortizer.summary(principal, rate, periods).unwrap();
            let installments = summary.repayment_amount * Decimal::from(periods);
            let gap = (summary.total_payable_amount - installments).abs();

            prop_assert_eq!(
                summary.total_payable_amount,
                principal + summary.total_interest_amount
            );
            match method {
                // n rounded installments drift up to half a unit each
                InterestMethod::Simple => {
                    prop_assert!(gap <= money(dec!(0.005)) * Decimal::from(periods));
                }
                InterestMethod::Compound if !rate.is_zero() && installments >= principal => {
                    prop_assert_eq!(gap, Money::ZERO);
                }
                InterestMethod::Compound => {
                    prop_assert!(gap <= money(dec!(0.005)) * Decimal::from(periods));
                }
            }
        }
    }
}
