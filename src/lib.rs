pub mod amortization;
pub mod application;
pub mod calendar;
pub mod charges;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod types;

// re-export key types
pub use amortization::{
    AmortizationStrategy, Amortizer, CompoundInterest, LoanTerms, Schedule, ScheduleRow,
    ScheduleSummary, SimpleInterest,
};
pub use application::{LoanApplication, LoanApplicationBuilder};
pub use calendar::{add_months, normalize, repayment_dates};
pub use charges::{ensure_cancellable, LoanCharge};
pub use config::LoanConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use loan::{Installment, Loan};
pub use types::{
    ApplicationStatus, ChargeId, ChargeStatus, ChargeType, InterestMethod, LoanId,
    RepaymentFrequency,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
