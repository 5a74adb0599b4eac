use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{ApplicationStatus, ChargeStatus, ChargeType};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    #[error("invalid loan application: {message}")]
    InvalidApplication {
        message: String,
    },

    #[error("loan application not approved: current status is {status:?}")]
    ApplicationNotApproved {
        status: ApplicationStatus,
    },

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("payment exceeds outstanding: outstanding {outstanding}, provided {provided}")]
    PaymentExceedsOutstanding {
        outstanding: Money,
        provided: Money,
    },

    #[error("invalid charge amounts: {message}")]
    InvalidChargeAmount {
        message: String,
    },

    #[error("loan charge {charge_id} ({charge_type:?}) is {status:?}, loan cannot be cancelled")]
    ChargeNotCancellable {
        charge_id: Uuid,
        charge_type: ChargeType,
        status: ChargeStatus,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LoanError {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        LoanError::InvalidInput {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
