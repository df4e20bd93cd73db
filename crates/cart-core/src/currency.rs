//! # Currency
//!
//! Currencies accepted by Mercado Pago and helpers for presenting amounts.
//! Amounts stay `f64` through calculation; rounding happens only here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Mercado Pago `currency_id` values (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    MXN,
    ARS,
    BRL,
    CLP,
    COP,
    PEN,
    UYU,
    USD,
}

impl Currency {
    /// Returns the ISO 4217 code as Mercado Pago expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::MXN => "MXN",
            Currency::ARS => "ARS",
            Currency::BRL => "BRL",
            Currency::CLP => "CLP",
            Currency::COP => "COP",
            Currency::PEN => "PEN",
            Currency::UYU => "UYU",
            Currency::USD => "USD",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (CLP has 0 decimals, the others 2)
    pub fn decimal_places(&self) -> usize {
        match self {
            Currency::CLP => 0,
            _ => 2,
        }
    }

    /// Currency symbol used on receipts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::PEN => "S/",
            Currency::UYU => "$U",
            Currency::USD => "US$",
            _ => "$",
        }
    }

    /// Format an amount for display (e.g., "$232.00")
    pub fn display(&self, amount: f64) -> String {
        format!(
            "{}{:.*}",
            self.symbol(),
            self.decimal_places(),
            amount
        )
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::MXN
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MXN" => Ok(Currency::MXN),
            "ARS" => Ok(Currency::ARS),
            "BRL" => Ok(Currency::BRL),
            "CLP" => Ok(Currency::CLP),
            "COP" => Ok(Currency::COP),
            "PEN" => Ok(Currency::PEN),
            "UYU" => Ok(Currency::UYU),
            "USD" => Ok(Currency::USD),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}

/// Format an amount with two decimals, no symbol
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}
