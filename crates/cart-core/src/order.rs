//! # Order Types
//!
//! Cart payload, validated order, and total calculation.
//!
//! The storefront sends loosely typed items (numbers may arrive as strings).
//! `CartItem::coerce` turns them into `LineItem`s; totals are always
//! recomputed from those items and never rounded until presentation.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Deserializer, Serialize};

/// Tax applied to every order (IVA)
pub const DEFAULT_TAX_RATE: f64 = 0.16;

/// A numeric field as the storefront may send it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    /// Coerce to a finite `f64`. Blank or non-numeric text yields `None`.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

/// An item as received in the checkout request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Product title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Quantity (number or numeric string)
    #[serde(default)]
    pub quantity: Option<NumericInput>,

    /// Unit price (number or numeric string)
    #[serde(default)]
    pub unit_price: Option<NumericInput>,
}

impl CartItem {
    pub fn new(
        title: impl Into<String>,
        quantity: impl Into<NumericInput>,
        unit_price: impl Into<NumericInput>,
    ) -> Self {
        Self {
            title: title.into(),
            quantity: Some(quantity.into()),
            unit_price: Some(unit_price.into()),
        }
    }

    /// Validate and coerce into a `LineItem`.
    ///
    /// `index` is only used to point at the offending item in the error.
    pub fn coerce(&self, index: usize) -> CheckoutResult<LineItem> {
        let quantity = self
            .quantity
            .as_ref()
            .and_then(NumericInput::to_f64)
            .ok_or_else(|| {
                CheckoutError::InvalidItems(format!("item {} has a non-numeric quantity", index))
            })?;

        if quantity < 1.0 || quantity.fract() != 0.0 || quantity > u32::MAX as f64 {
            return Err(CheckoutError::InvalidItems(format!(
                "item {} quantity must be a positive whole number, got {}",
                index, quantity
            )));
        }

        let unit_price = self
            .unit_price
            .as_ref()
            .and_then(NumericInput::to_f64)
            .ok_or_else(|| {
                CheckoutError::InvalidItems(format!("item {} has a non-numeric unit_price", index))
            })?;

        if unit_price < 0.0 {
            return Err(CheckoutError::InvalidItems(format!(
                "item {} unit_price must not be negative, got {}",
                index, unit_price
            )));
        }

        Ok(LineItem {
            title: self.title.clone(),
            quantity: quantity as u32,
            unit_price,
        })
    }
}

/// Coerce every cart item, failing on the first bad one
pub fn coerce_items(items: &[CartItem]) -> CheckoutResult<Vec<LineItem>> {
    if items.is_empty() {
        return Err(CheckoutError::EmptyItems);
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.coerce(i))
        .collect()
}

/// A validated line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(title: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            title: title.into(),
            quantity,
            unit_price,
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Subtotal, tax and total for an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub tax_rate: f64,
    pub total: f64,
}

impl OrderTotals {
    /// Compute totals with the default tax rate
    pub fn compute(items: &[LineItem]) -> CheckoutResult<Self> {
        Self::compute_with_rate(items, DEFAULT_TAX_RATE)
    }

    /// Compute totals with an explicit tax rate
    pub fn compute_with_rate(items: &[LineItem], tax_rate: f64) -> CheckoutResult<Self> {
        if items.is_empty() {
            return Err(CheckoutError::InvalidItems("order has no items".to_string()));
        }

        let subtotal: f64 = items.iter().map(LineItem::total).sum();
        let tax = subtotal * tax_rate;

        Ok(Self {
            subtotal,
            tax,
            tax_rate,
            total: subtotal + tax,
        })
    }

    /// All-zero totals
    pub fn zero(tax_rate: f64) -> Self {
        Self {
            subtotal: 0.0,
            tax: 0.0,
            tax_rate,
            total: 0.0,
        }
    }

    /// Tax rate as a whole percentage for labels (0.16 -> "16")
    pub fn tax_percent_label(&self) -> String {
        let percent = self.tax_rate * 100.0;
        if (percent - percent.round()).abs() < 1e-9 {
            format!("{}", percent.round() as i64)
        } else {
            format!("{:.2}", percent)
        }
    }
}

impl Default for OrderTotals {
    fn default() -> Self {
        Self::zero(DEFAULT_TAX_RATE)
    }
}

/// Checkout request body (`POST /api/create_preference`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Items to purchase
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CartItem>,

    /// Buyer email, used for prefill and for the receipt
    #[serde(default)]
    pub payer_email: Option<String>,

    /// Caller-supplied correlation id
    #[serde(default)]
    pub external_reference: Option<String>,
}

/// A validated order ready to be sent to the provider
#[derive(Debug, Clone)]
pub struct Order {
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub payer_email: Option<String>,
    pub external_reference: Option<String>,
}

impl Order {
    /// Validate a checkout request and compute its totals
    pub fn from_request(request: &CheckoutRequest, tax_rate: f64) -> CheckoutResult<Self> {
        let items = coerce_items(&request.items)?;
        let totals = OrderTotals::compute_with_rate(&items, tax_rate)?;

        Ok(Self {
            items,
            totals,
            payer_email: non_blank(request.payer_email.as_deref()).map(|e| e.trim().to_string()),
            external_reference: non_blank(request.external_reference.as_deref()),
        })
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Drop blank values; anything else is kept as sent
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
}

/// `null` reads the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized checkout response returned to the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Preference id
    pub id: String,
    /// Public checkout URL
    pub init_point: String,
    /// Sandbox checkout URL (test credentials only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_init_point: Option<String>,
}
