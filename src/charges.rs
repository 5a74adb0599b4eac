use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::{ChargeId, ChargeStatus, ChargeType, LoanId};

/// next collection status of an amount due on `due`
///
/// Rules run in order and later ones win; when none applies the current
/// status is kept (e.g. a part-paid charge due today).
pub fn evaluate_status(
    current: ChargeStatus,
    due: NaiveDate,
    today: NaiveDate,
    total: Money,
    paid: Money,
) -> ChargeStatus {
    let outstanding = total - paid;
    let mut status = current;

    if due >= today && paid.is_zero() {
        status = ChargeStatus::Pending;
    }
    if due > today && paid.is_positive() {
        status = ChargeStatus::Partially;
    }
    if due < today && outstanding.is_positive() {
        status = ChargeStatus::Overdue;
    }
    if paid == total {
        status = ChargeStatus::Paid;
    }

    status
}

/// receivable for the capital or interest part of one installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCharge {
    pub id: ChargeId,
    pub loan_id: LoanId,
    pub period_index: u32,
    pub charge_type: ChargeType,
    pub repayment_date: NaiveDate,
    pub total_amount: Money,
    pub paid_amount: Money,
    pub outstanding_amount: Money,
    pub status: ChargeStatus,
}

impl LoanCharge {
    pub fn new(
        loan_id: LoanId,
        period_index: u32,
        charge_type: ChargeType,
        repayment_date: NaiveDate,
        total_amount: Money,
    ) -> Result<Self> {
        let charge = Self {
            id: Uuid::new_v4(),
            loan_id,
            period_index,
            charge_type,
            repayment_date,
            total_amount,
            paid_amount: Money::ZERO,
            outstanding_amount: total_amount,
            status: ChargeStatus::Pending,
        };
        charge.validate_amounts()?;
        Ok(charge)
    }

    /// a capital and an interest charge per installment
    ///
    /// Zero amounts (interest-free loans, fully rounded-away splits) produce
    /// no charge.
    pub fn for_installments(loan: &Loan) -> Result<Vec<LoanCharge>> {
        let mut charges = Vec::with_capacity(loan.installments.len() * 2);

        for installment in &loan.installments {
            for (charge_type, amount) in [
                (ChargeType::Capital, installment.row.capital_amount),
                (ChargeType::Interest, installment.row.interest_amount),
            ] {
                if amount.is_zero() {
                    continue;
                }
                charges.push(LoanCharge::new(
                    loan.id,
                    installment.period_index(),
                    charge_type,
                    installment.repayment_date,
                    amount,
                )?);
            }
        }

        debug!("loan {}: {} charges created", loan.id, charges.len());
        Ok(charges)
    }

    pub fn validate_amounts(&self) -> Result<()> {
        if !self.total_amount.is_positive() {
            return Err(LoanError::InvalidChargeAmount {
                message: format!("missing amount on {:?} charge", self.charge_type),
            });
        }

        if self.paid_amount > self.total_amount {
            return Err(LoanError::InvalidChargeAmount {
                message: format!(
                    "paid amount {} cannot be greater than total amount {}",
                    self.paid_amount, self.total_amount
                ),
            });
        }

        Ok(())
    }

    /// collect `amount` against this charge, returning the new outstanding
    pub fn apply_payment(&mut self, amount: Money, today: NaiveDate) -> Result<Money> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }
        if amount > self.outstanding_amount {
            return Err(LoanError::PaymentExceedsOutstanding {
                outstanding: self.outstanding_amount,
                provided: amount,
            });
        }

        self.paid_amount += amount;
        self.outstanding_amount = self.total_amount - self.paid_amount;
        self.update_status(today);

        Ok(self.outstanding_amount)
    }

    pub fn update_status(&mut self, today: NaiveDate) {
        self.status = evaluate_status(
            self.status,
            self.repayment_date,
            today,
            self.total_amount,
            self.paid_amount,
        );
    }

    /// update status against the provider's current date
    pub fn refresh_status(&mut self, time_provider: &SafeTimeProvider) {
        self.update_status(time_provider.now().date_naive());
    }
}

/// total still owed on charges of one type
pub fn outstanding_by_type(charges: &[LoanCharge], charge_type: ChargeType) -> Money {
    charges
        .iter()
        .filter(|c| c.charge_type == charge_type)
        .map(|c| c.outstanding_amount)
        .sum()
}

/// a loan can be cancelled only while every charge is pending or overdue
pub fn ensure_cancellable(charges: &[LoanCharge]) -> Result<()> {
    match charges.iter().find(|c| !c.status.is_cancellable()) {
        Some(charge) => Err(LoanError::ChargeNotCancellable {
            charge_id: charge.id,
            charge_type: charge.charge_type,
            status: charge.status,
        }),
        None => Ok(()),
    }
}
