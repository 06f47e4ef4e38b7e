//! Validation of incoming invoice payloads
//!
//! Request bodies are first parsed into [`InvoicePayload`], where every field
//! is optional, so that a missing field becomes a readable violation instead
//! of a deserialization failure. [`validate_invoice`] then checks every rule
//! and returns either a [`NewInvoice`] or all the violations at once. It runs
//! before any store call.

pub mod validators;

use crate::core::error::FieldViolation;
use crate::core::invoice::{CustomerInfo, LineItem, MerchantInfo, NewInvoice, ServiceFee};
use serde::Deserialize;
use serde_json::Value;

/// Candidate customer block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Candidate line item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPayload {
    pub id: Option<Value>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<f64>,
    pub total: Option<f64>,
}

/// Candidate invoice as received from a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub invoice_number: Option<String>,
    pub merchant_info: Option<MerchantInfo>,
    pub customer_info: Option<CustomerPayload>,
    pub items: Option<Vec<LineItemPayload>>,
    pub subtotal: Option<f64>,
    pub total: Option<f64>,
    pub service_fee: Option<bool>,
    pub fee_type: Option<String>,
    pub fee_value: Option<f64>,
    pub service_fee_amount: Option<f64>,
    #[serde(rename = "dynamicQRCode")]
    pub dynamic_qr_code: Option<String>,
}

/// Collects violations while walking a payload
#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn check<T>(&mut self, field: impl Into<String>, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.0.push(FieldViolation::new(field, message));
                None
            }
        }
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.0.push(FieldViolation::new(field, message));
    }
}

/// Validate a candidate invoice
///
/// Returns the validated invoice, or every rule violation found.
pub fn validate_invoice(payload: InvoicePayload) -> Result<NewInvoice, Vec<FieldViolation>> {
    let mut violations = Violations::default();

    violations.check(
        "invoiceNumber",
        validators::required_text(payload.invoice_number.as_deref()),
    );

    let customer = match payload.customer_info {
        Some(customer) => {
            violations.check(
                "customerInfo.name",
                validators::required_text(customer.name.as_deref()),
            );
            Some(customer)
        }
        None => {
            violations.reject("customerInfo.name", "is required");
            None
        }
    };

    let mut items = Vec::new();
    match payload.items {
        Some(candidates) if !candidates.is_empty() => {
            for (index, item) in candidates.into_iter().enumerate() {
                if let Some(line) = validate_item(index, item, &mut violations) {
                    items.push(line);
                }
            }
        }
        Some(_) => {
            violations.reject("items", "must contain at least one item");
        }
        None => {
            violations.reject("items", "is required");
        }
    }

    let subtotal = violations.check(
        "subtotal",
        validators::required_non_negative(payload.subtotal),
    );
    let total = violations.check("total", validators::required_non_negative(payload.total));

    if let Some(fee_value) = payload.fee_value {
        violations.check("feeValue", validators::non_negative(fee_value));
    }
    if let Some(amount) = payload.service_fee_amount {
        violations.check("serviceFeeAmount", validators::non_negative(amount));
    }

    match (payload.invoice_number, customer, subtotal, total) {
        (Some(invoice_number), Some(customer), Some(subtotal), Some(total))
            if violations.0.is_empty() =>
        {
            Ok(NewInvoice {
                invoice_number,
                merchant_info: payload.merchant_info,
                customer_info: CustomerInfo {
                    // Checked by required_text above
                    name: customer.name.unwrap_or_default(),
                    email: customer.email,
                    phone: customer.phone,
                    address: customer.address,
                },
                items,
                subtotal,
                total,
                fee: ServiceFee {
                    service_fee: payload.service_fee,
                    fee_type: payload.fee_type,
                    fee_value: payload.fee_value,
                    service_fee_amount: payload.service_fee_amount,
                },
                dynamic_qr_code: payload.dynamic_qr_code,
            })
        }
        _ => Err(violations.0),
    }
}

fn validate_item(
    index: usize,
    item: LineItemPayload,
    violations: &mut Violations,
) -> Option<LineItem> {
    let field = |name: &str| format!("items[{}].{}", index, name);

    let name_ok = violations
        .check(field("name"), validators::required_text(item.name.as_deref()))
        .is_some();
    let quantity = violations.check(field("quantity"), validators::positive_count(item.quantity));
    let price = violations.check(field("price"), validators::required_non_negative(item.price));
    let total = violations.check(field("total"), validators::required_non_negative(item.total));

    match (item.name, quantity, price, total) {
        (Some(name), Some(quantity), Some(price), Some(total)) if name_ok => Some(LineItem {
            id: item.id,
            name,
            quantity,
            price,
            total,
        }),
        _ => None,
    }
}
