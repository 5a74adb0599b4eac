use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::LoanTerms;
use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{ApplicationStatus, InterestMethod, RepaymentFrequency};

/// request for a loan, before it is originated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: Uuid,
    pub party: String,
    pub requested_gross_amount: Money,
    pub approved_gross_amount: Money,
    /// percentage of the approved gross amount, e.g. 5 for 5%
    pub legal_expenses_rate: Decimal,
    pub repayment_periods: u32,
    pub annual_interest_rate: Rate,
    pub interest_method: InterestMethod,
    pub repayment_frequency: RepaymentFrequency,
    pub status: ApplicationStatus,
}

impl LoanApplication {
    pub fn builder() -> LoanApplicationBuilder {
        LoanApplicationBuilder::new()
    }

    /// fee charged on top of the approved gross amount
    pub fn legal_expenses_amount(&self) -> Money {
        self.approved_gross_amount.percentage(self.legal_expenses_rate)
    }

    pub fn requested_net_amount(&self) -> Money {
        self.requested_gross_amount
            + self.requested_gross_amount.percentage(self.legal_expenses_rate)
    }

    /// amount the borrower owes: gross plus legal expenses
    pub fn approved_net_amount(&self) -> Money {
        self.approved_gross_amount + self.legal_expenses_amount()
    }

    /// annual rate split over the repayment frequency
    pub fn periodic_rate(&self) -> Rate {
        self.annual_interest_rate
            .per_period(self.repayment_frequency.periods_per_year())
    }

    /// terms for the approved amount, principal rounded to `precision`
    pub fn loan_terms(&self, precision: u32) -> LoanTerms {
        LoanTerms::new(
            self.approved_net_amount().round_dp(precision),
            self.periodic_rate(),
            self.repayment_periods,
            self.interest_method,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.legal_expenses_rate <= Decimal::ZERO {
            return Err(invalid("missing legal expenses rate"));
        }

        if !self.approved_gross_amount.is_positive() {
            if !self.requested_gross_amount.is_positive() {
                return Err(invalid("missing requested gross amount"));
            }
            return Err(invalid("missing approved gross amount"));
        }

        if self.repayment_periods == 0 {
            return Err(invalid("missing repayment periods"));
        }

        if self.annual_interest_rate.is_negative() {
            return Err(invalid("interest rate must not be negative"));
        }

        Ok(())
    }

    /// approve as requested
    pub fn approve(&mut self) -> Result<()> {
        self.transition(ApplicationStatus::Approved)
    }

    /// approve a different gross amount than was requested
    pub fn approve_amount(&mut self, approved_gross_amount: Money) -> Result<()> {
        let previous = self.approved_gross_amount;
        self.approved_gross_amount = approved_gross_amount;

        self.transition(ApplicationStatus::Approved).map_err(|e| {
            self.approved_gross_amount = previous;
            e
        })
    }

    pub fn reject(&mut self) -> Result<()> {
        self.transition(ApplicationStatus::Rejected)
    }

    fn transition(&mut self, to: ApplicationStatus) -> Result<()> {
        if self.status != ApplicationStatus::Open {
            return Err(LoanError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }

        if to == ApplicationStatus::Approved {
            self.validate()?;
        }

        log::debug!("loan application {} {:?} -> {:?}", self.id, self.status, to);
        self.status = to;
        Ok(())
    }
}

fn invalid(message: &str) -> LoanError {
    LoanError::InvalidApplication {
        message: message.to_string(),
    }
}

/// builder for loan applications
#[derive(Debug, Clone, Default)]
pub struct LoanApplicationBuilder {
    party: Option<String>,
    requested_amount: Option<Money>,
    legal_expenses_rate: Option<Decimal>,
    periods: Option<u32>,
    annual_rate: Option<Rate>,
    interest_method: Option<InterestMethod>,
    frequency: Option<RepaymentFrequency>,
}

impl LoanApplicationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn requested_amount(mut self, amount: Money) -> Self {
        self.requested_amount = Some(amount);
        self
    }

    /// percentage, e.g. dec!(5) for 5%
    pub fn legal_expenses_rate(mut self, rate: Decimal) -> Self {
        self.legal_expenses_rate = Some(rate);
        self
    }

    pub fn periods(mut self, periods: u32) -> Self {
        self.periods = Some(periods);
        self
    }

    pub fn annual_rate(mut self, rate: Rate) -> Self {
        self.annual_rate = Some(rate);
        self
    }

    pub fn interest_method(mut self, method: InterestMethod) -> Self {
        self.interest_method = Some(method);
        self
    }

    pub fn frequency(mut self, frequency: RepaymentFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// build an open application; unset options come from `config`
    pub fn build(self, config: &LoanConfig) -> Result<LoanApplication> {
        let requested = self.requested_amount.unwrap_or(Money::ZERO);

        let application = LoanApplication {
            id: Uuid::new_v4(),
            party: self.party.unwrap_or_default(),
            requested_gross_amount: requested,
            approved_gross_amount: requested,
            legal_expenses_rate: self.legal_expenses_rate.unwrap_or(Decimal::ZERO),
            repayment_periods: self.periods.unwrap_or(0),
            annual_interest_rate: self.annual_rate.unwrap_or(Rate::ZERO),
            interest_method: self.interest_method.unwrap_or(config.default_interest_method),
            repayment_frequency: self.frequency.unwrap_or(config.default_frequency),
            status: ApplicationStatus::Open,
        };

        application.validate()?;
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::from_decimal(d)
    }

    fn application() -> LoanApplication {
        LoanApplication::builder()
            .party("ACME Supplies")
            .requested_amount(Money::from_major(10_000))
            .legal_expenses_rate(dec!(5))
            .periods(12)
            .annual_rate(Rate::from_percentage(12))
            .build(&LoanConfig::standard())
            .unwrap()
    }

    #[test]
    fn test_amounts() {
        let appl = application();

        assert_eq!(appl.legal_expenses_amount(), Money::from_major(500));
        assert_eq!(appl.requested_net_amount(), Money::from_major(10_500));
        assert_eq!(appl.approved_net_amount(), Money::from_major(10_500));
    }

    #[test]
    fn test_defaults_from_config() {
        let appl = application();

        assert_eq!(appl.status, ApplicationStatus::Open);
        assert_eq!(appl.interest_method, InterestMethod::Compound);
        assert_eq!(appl.repayment_frequency, RepaymentFrequency::Monthly);
        assert_eq!(appl.periodic_rate().as_decimal(), dec!(0.01));
    }

    #[test]
    fn test_loan_terms() {
        let terms = application().loan_terms(2);

        assert_eq!(terms.principal, Money::from_major(10_500));
        assert_eq!(terms.rate, Rate::from_decimal(dec!(0.01)));
        assert_eq!(terms.periods, 12);
    }

    #[test]
    fn test_loan_terms_round_fractional_legal_expenses() {
        let appl = LoanApplication::builder()
            .requested_amount(money(dec!(1234.56)))
            .legal_expenses_rate(dec!(3.3))
            .periods(12)
            .annual_rate(Rate::from_percentage(12))
            .build(&LoanConfig::standard())
            .unwrap();

        // 1234.56 × 3.3% = 40.74048
        assert_eq!(appl.legal_expenses_amount(), money(dec!(40.74048)));
        assert_eq!(appl.loan_terms(2).principal, money(dec!(1275.30)));
        assert_eq!(appl.loan_terms(8).principal, money(dec!(1275.30048)));
    }

    #[test]
    fn test_quarterly_rate() {
        let appl = LoanApplication::builder()
            .requested_amount(Money::from_major(1_000))
            .legal_expenses_rate(dec!(2))
            .periods(4)
            .annual_rate(Rate::from_percentage(8))
            .frequency(RepaymentFrequency::Quarterly)
            .build(&LoanConfig::standard())
            .unwrap();

        assert_eq!(appl.periodic_rate().as_decimal(), dec!(0.02));
    }

    #[test]
    fn test_validation_messages() {
        let config = LoanConfig::standard();

        let err = LoanApplication::builder()
            .requested_amount(Money::from_major(1_000))
            .periods(12)
            .build(&config)
            .unwrap_err();
        assert_eq!(err, invalid("missing legal expenses rate"));

        let err = LoanApplication::builder()
            .legal_expenses_rate(dec!(5))
            .periods(12)
            .build(&config)
            .unwrap_err();
        assert_eq!(err, invalid("missing requested gross amount"));

        let err = LoanApplication::builder()
            .requested_amount(Money::from_major(1_000))
            .legal_expenses_rate(dec!(5))
            .build(&config)
            .unwrap_err();
        assert_eq!(err, invalid("missing repayment periods"));

        let mut appl = application();
        appl.approved_gross_amount = Money::ZERO;
        assert_eq!(appl.validate().unwrap_err(), invalid("missing approved gross amount"));
    }

    #[test]
    fn test_approve_and_reject() {
        let mut appl = application();
        appl.approve().unwrap();
        assert_eq!(appl.status, ApplicationStatus::Approved);

        assert!(matches!(
            appl.reject(),
            Err(LoanError::InvalidStatusTransition {
                from: ApplicationStatus::Approved,
                to: ApplicationStatus::Rejected,
            })
        ));

        let mut appl = application();
        appl.reject().unwrap();
        assert_eq!(appl.status, ApplicationStatus::Rejected);
        assert!(appl.approve().is_err());
    }

    #[test]
    fn test_approve_different_amount() {
        let mut appl = application();
        appl.approve_amount(Money::from_major(8_000)).unwrap();

        assert_eq!(appl.approved_gross_amount, Money::from_major(8_000));
        assert_eq!(appl.requested_gross_amount, Money::from_major(10_000));
        assert_eq!(appl.approved_net_amount(), Money::from_major(8_400));

        let mut appl = application();
        assert!(appl.approve_amount(Money::ZERO).is_err());
        assert_eq!(appl.approved_gross_amount, Money::from_major(10_000));
        assert_eq!(appl.status, ApplicationStatus::Open);
    }
}
