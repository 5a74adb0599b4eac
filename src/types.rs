use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a loan charge
pub type ChargeId = Uuid;

/// how interest is computed over the life of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestMethod {
    /// interest on the original principal for the full term
    Simple,
    /// interest on the remaining balance each period
    Compound,
}

/// how often installments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepaymentFrequency {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl RepaymentFrequency {
    /// number of repayment periods in a year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            RepaymentFrequency::Daily => 365,
            RepaymentFrequency::Weekly => 52,
            RepaymentFrequency::BiWeekly => 26,
            RepaymentFrequency::Monthly => 12,
            RepaymentFrequency::Quarterly => 4,
            RepaymentFrequency::SemiAnnual => 2,
            RepaymentFrequency::Annual => 1,
        }
    }

    /// calendar months between installments, for month-aligned frequencies
    pub fn months_per_period(&self) -> Option<u32> {
        match self {
            RepaymentFrequency::Monthly => Some(1),
            RepaymentFrequency::Quarterly => Some(3),
            RepaymentFrequency::SemiAnnual => Some(6),
            RepaymentFrequency::Annual => Some(12),
            RepaymentFrequency::Daily
            | RepaymentFrequency::Weekly
            | RepaymentFrequency::BiWeekly => None,
        }
    }

    /// days between installments, for day-aligned frequencies
    pub fn days_per_period(&self) -> Option<u32> {
        match self {
            RepaymentFrequency::Daily => Some(1),
            RepaymentFrequency::Weekly => Some(7),
            RepaymentFrequency::BiWeekly => Some(14),
            _ => None,
        }
    }
}

/// loan application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Open,
    Approved,
    Rejected,
}

/// component of an installment a charge collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargeType {
    Capital,
    Interest,
}

/// collection status of a charge or installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    /// due today or later, nothing paid
    Pending,
    /// due in the future, partially paid
    Partially,
    /// past due with an outstanding balance
    Overdue,
    /// fully paid
    Paid,
}

impl ChargeStatus {
    /// charges in these states may be rolled back with their loan
    pub fn is_cancellable(&self) -> bool {
        matches!(self, ChargeStatus::Pending | ChargeStatus::Overdue)
    }
}
