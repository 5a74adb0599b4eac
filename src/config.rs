use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};
use crate::types::{InterestMethod, RepaymentFrequency};

/// storage precision of `Money`; rounding beyond it is meaningless
pub const MAX_PRECISION: u32 = 8;

/// loan and schedule configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    /// decimal places every schedule figure is rounded to
    pub currency_precision: u32,
    pub default_frequency: RepaymentFrequency,
    /// day of month installments fall on, clamped to month end
    pub default_billing_day: u32,
    pub default_interest_method: InterestMethod,
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl LoanConfig {
    /// two-decimal currency, monthly installments on the 1st
    pub fn standard() -> Self {
        Self {
            currency_precision: 2,
            default_frequency: RepaymentFrequency::Monthly,
            default_billing_day: 1,
            default_interest_method: InterestMethod::Compound,
        }
    }

    /// full storage precision, for reconciling against reference tables
    pub fn high_precision() -> Self {
        Self {
            currency_precision: MAX_PRECISION,
            ..Self::standard()
        }
    }

    pub fn with_precision(mut self, dp: u32) -> Self {
        self.currency_precision = dp;
        self
    }

    pub fn with_billing_day(mut self, day: u32) -> Self {
        self.default_billing_day = day;
        self
    }

    pub fn with_frequency(mut self, frequency: RepaymentFrequency) -> Self {
        self.default_frequency = frequency;
        self
    }

    pub fn with_interest_method(mut self, method: InterestMethod) -> Self {
        self.default_interest_method = method;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_precision > MAX_PRECISION {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "currency precision {} exceeds maximum of {}",
                    self.currency_precision, MAX_PRECISION
                ),
            });
        }

        if !(1..=31).contains(&self.default_billing_day) {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "default billing day {} is outside 1..=31",
                    self.default_billing_day
                ),
            });
        }

        Ok(())
    }

    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoanConfig =
            serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}
