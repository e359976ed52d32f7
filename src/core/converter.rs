//! USD/CLP conversion.
//!
//! Returns raw amounts; rounding and formatting belong to whoever displays
//! them.

use crate::core::error::QuoteError;
use crate::core::quote::Quote;
use std::fmt::Display;

fn validate(amount: f64, rate: f64) -> Result<(), QuoteError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(QuoteError::InvalidAmount(amount));
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(QuoteError::InvalidRate(rate));
    }
    Ok(())
}

pub fn usd_to_clp(usd_amount: f64, rate: f64) -> Result<f64, QuoteError> {
    validate(usd_amount, rate)?;
    Ok(usd_amount * rate)
}

pub fn clp_to_usd(clp_amount: f64, rate: f64) -> Result<f64, QuoteError> {
    validate(clp_amount, rate)?;
    if rate == 0.0 {
        return Err(QuoteError::DivisionByZero);
    }
    Ok(clp_amount / rate)
}

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    UsdToClp,
    ClpToUsd,
}

impl Conversion {
    pub fn convert(&self, amount: f64, rate: f64) -> Result<f64, QuoteError> {
        match self {
            Conversion::UsdToClp => usd_to_clp(amount, rate),
            Conversion::ClpToUsd => clp_to_usd(amount, rate),
        }
    }

    /// Buying CLP for dollars uses the buy price, buying dollars uses the
    /// sell price.
    pub fn rate_from(&self, quote: &Quote) -> f64 {
        match self {
            Conversion::UsdToClp => quote.buy_price,
            Conversion::ClpToUsd => quote.sell_price,
        }
    }

    pub fn from_currency(&self) -> &'static str {
        match self {
            Conversion::UsdToClp => "USD",
            Conversion::ClpToUsd => "CLP",
        }
    }

    pub fn to_currency(&self) -> &'static str {
        match self {
            Conversion::UsdToClp => "CLP",
            Conversion::ClpToUsd => "USD",
        }
    }
}

impl Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from_currency(), self.to_currency())
    }
}
