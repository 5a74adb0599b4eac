use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{ChargeStatus, InterestMethod, LoanId};

/// all events that can be emitted by a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LoanOriginated {
        loan_id: LoanId,
        loan_amount: Money,
        lent_amount: Money,
        interest_method: InterestMethod,
        periods: u32,
        repayment_amount: Money,
        first_repayment_date: Option<NaiveDate>,
        timestamp: DateTime<Utc>,
    },
    RepaymentDatesNormalized {
        loan_id: LoanId,
        billing_day: u32,
        installments_moved: u32,
        timestamp: DateTime<Utc>,
    },
    PaymentRecorded {
        loan_id: LoanId,
        period_index: u32,
        amount: Money,
        amount_due: Money,
        timestamp: DateTime<Utc>,
    },
    InstallmentStatusChanged {
        loan_id: LoanId,
        period_index: u32,
        old_status: ChargeStatus,
        new_status: ChargeStatus,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
