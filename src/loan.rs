use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::{LoanTerms, Schedule, ScheduleRow, ScheduleSummary};
use crate::application::LoanApplication;
use crate::calendar::{normalize, repayment_dates};
use crate::charges::evaluate_status;
use crate::config::LoanConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::types::{ApplicationStatus, ChargeStatus, LoanId, RepaymentFrequency};

/// a scheduled repayment with its due date and collection state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    #[serde(flatten)]
    pub row: ScheduleRow,
    pub repayment_date: NaiveDate,
    pub paid_amount: Money,
    pub status: ChargeStatus,
}

impl Installment {
    pub fn period_index(&self) -> u32 {
        self.row.period_index
    }

    /// unpaid part of this installment's repayment
    pub fn amount_due(&self) -> Money {
        (self.row.repayment_amount - self.paid_amount).max(Money::ZERO)
    }

    pub fn is_paid(&self) -> bool {
        self.status == ChargeStatus::Paid
    }
}

/// originated loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub application_id: Uuid,
    pub party: String,
    pub posting_date: NaiveDate,
    pub repayment_day_of_month: u32,
    pub frequency: RepaymentFrequency,
    pub terms: LoanTerms,
    pub summary: ScheduleSummary,
    pub legal_expenses_amount: Money,
    pub currency_precision: u32,
    pub installments: Vec<Installment>,
    #[serde(skip)]
    pub events: EventStore,
}

impl Loan {
    /// originate a loan from an approved application
    ///
    /// `billing_day` falls back to the configured default.
    pub fn originate(
        application: &LoanApplication,
        posting_date: NaiveDate,
        billing_day: Option<u32>,
        config: &LoanConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        config.validate()?;

        if application.status != ApplicationStatus::Approved {
            return Err(LoanError::ApplicationNotApproved {
                status: application.status,
            });
        }
        application.validate()?;

        let billing_day = billing_day.unwrap_or(config.default_billing_day);
        let precision = config.currency_precision;
        let terms = application.loan_terms(precision);

        let summary = terms.summary(precision)?;
        let schedule = terms.schedule(precision)?;
        let dates = repayment_dates(
            posting_date,
            terms.periods,
            billing_day,
            application.repayment_frequency,
        )?;

        let installments = schedule
            .into_rows()
            .into_iter()
            .zip(dates)
            .map(|(row, repayment_date)| Installment {
                row,
                repayment_date,
                paid_amount: Money::ZERO,
                status: ChargeStatus::Pending,
            })
            .collect::<Vec<_>>();

        let mut loan = Self {
            id: Uuid::new_v4(),
            application_id: application.id,
            party: application.party.clone(),
            posting_date,
            repayment_day_of_month: billing_day,
            frequency: application.repayment_frequency,
            terms,
            summary,
            legal_expenses_amount: application.legal_expenses_amount().round_dp(precision),
            currency_precision: precision,
            installments,
            events: EventStore::new(),
        };

        info!(
            "originated loan {} for {}: {} over {} periods ({:?})",
            loan.id,
            loan.party,
            loan.loan_amount(),
            terms.periods,
            terms.method
        );

        loan.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            loan_amount: loan.loan_amount(),
            lent_amount: loan.lent_amount(),
            interest_method: terms.method,
            periods: terms.periods,
            repayment_amount: summary.repayment_amount,
            first_repayment_date: loan.installments.first().map(|i| i.repayment_date),
            timestamp: time_provider.now(),
        });

        Ok(loan)
    }

    /// principal being amortized
    pub fn loan_amount(&self) -> Money {
        self.terms.principal
    }

    /// cash actually disbursed: loan amount less legal expenses
    pub fn lent_amount(&self) -> Money {
        self.loan_amount() - self.legal_expenses_amount
    }

    pub fn schedule(&self) -> Schedule {
        Schedule::from_rows(self.installments.iter().map(|i| i.row).collect())
    }

    pub fn installment(&self, period_index: u32) -> Option<&Installment> {
        self.installments
            .iter()
            .find(|i| i.period_index() == period_index)
    }

    /// first installment not yet fully paid
    pub fn next_due(&self) -> Option<&Installment> {
        self.installments.iter().find(|i| !i.is_paid())
    }

    /// sum of unpaid repayments
    pub fn amount_due(&self) -> Money {
        self.installments.iter().map(|i| i.amount_due()).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.installments.iter().all(|i| i.is_paid())
    }

    /// move every repayment date onto a new billing day
    pub fn renormalize_dates(
        &mut self,
        billing_day: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<u32> {
        let dates = self
            .installments
            .iter()
            .map(|i| normalize(i.repayment_date, billing_day))
            .collect::<Result<Vec<_>>>()?;

        let mut moved = 0;
        for (installment, date) in self.installments.iter_mut().zip(dates) {
            if installment.repayment_date != date {
                installment.repayment_date = date;
                moved += 1;
            }
        }
        self.repayment_day_of_month = billing_day;

        debug!(
            "loan {}: {} installments moved to billing day {}",
            self.id, moved, billing_day
        );

        self.events.emit(Event::RepaymentDatesNormalized {
            loan_id: self.id,
            billing_day,
            installments_moved: moved,
            timestamp: time_provider.now(),
        });

        Ok(moved)
    }

    /// apply a payment to one installment, returning what is still due on it
    pub fn record_payment(
        &mut self,
        period_index: u32,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Money> {
        if !amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount { amount });
        }

        let now = time_provider.now();
        let loan_id = self.id;
        let installment = self
            .installments
            .iter_mut()
            .find(|i| i.period_index() == period_index)
            .ok_or_else(|| {
                LoanError::invalid_input(format!("loan has no installment {}", period_index))
            })?;

        let outstanding = installment.amount_due();
        if amount > outstanding {
            return Err(LoanError::PaymentExceedsOutstanding {
                outstanding,
                provided: amount,
            });
        }

        installment.paid_amount += amount;
        let amount_due = installment.amount_due();

        self.events.emit(Event::PaymentRecorded {
            loan_id,
            period_index,
            amount,
            amount_due,
            timestamp: now,
        });

        self.refresh_statuses(time_provider);
        Ok(amount_due)
    }

    /// re-evaluate installment statuses against the provider's date
    pub fn refresh_statuses(&mut self, time_provider: &SafeTimeProvider) {
        let now = time_provider.now();
        let today = now.date_naive();

        for installment in &mut self.installments {
            let old_status = installment.status;
            let new_status = evaluate_status(
                old_status,
                installment.repayment_date,
                today,
                installment.row.repayment_amount,
                installment.paid_amount,
            );

            if new_status != old_status {
                installment.status = new_status;
                self.events.emit(Event::InstallmentStatusChanged {
                    loan_id: self.id,
                    period_index: installment.period_index(),
                    old_status,
                    new_status,
                    timestamp: now,
                });
            }
        }
    }

    /// get json representation of current state
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}
