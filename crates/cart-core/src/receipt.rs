//! # Receipt
//!
//! HTML purchase receipt sent to the buyer after a preference is created.
//!
//! The "PROCESSING" status line only reflects that the buyer has not paid
//! yet when the receipt is rendered. It is not payment state.

use crate::currency::{format_amount, Currency};
use crate::order::{LineItem, OrderTotals};
use maud::html;

/// Status line printed on every receipt
pub const RECEIPT_STATUS_LINE: &str = "Payment status: PROCESSING";

/// Render the receipt body.
///
/// Never fails: with no items it renders an empty table and whatever
/// totals it is given (zeros for `OrderTotals::default()`).
pub fn render_receipt(items: &[LineItem], totals: &OrderTotals, currency: Currency) -> String {
    let symbol = currency.symbol();

    let markup = html! {
        h2 { "Purchase receipt" }
        table border="1" cellpadding="5" cellspacing="0" {
            tr {
                th { "Product" }
                th { "Quantity" }
                th { "Price" }
            }
            @for item in items {
                tr {
                    td { (item.title) }
                    td { (item.quantity) }
                    td { (symbol) (format_amount(item.unit_price)) }
                }
            }
        }
        p { strong { "Subtotal:" } " " (symbol) (format_amount(totals.subtotal)) }
        p { strong { "Tax (" (totals.tax_percent_label()) "%):" } " " (symbol) (format_amount(totals.tax)) }
        h3 { "Total: " (symbol) (format_amount(totals.total)) " " (currency.as_str()) }
        p { (RECEIPT_STATUS_LINE) }
    };

    markup.into_string()
}

/// A receipt ready to hand to an email transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

impl ReceiptEmail {
    pub fn new(
        to: impl Into<String>,
        from: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            from: from.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}
