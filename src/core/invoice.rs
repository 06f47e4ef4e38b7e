//! Invoice document model
//!
//! An [`Invoice`] is the only entity the service stores. It is addressed from
//! the outside by its `invoiceNumber`; the `id` is assigned by the server and
//! only used as the store-internal key.
//!
//! Listing endpoints never return the encoded QR image, so they work with
//! [`InvoiceSummary`], which carries every field except `dynamicQRCode`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Current time truncated to millisecond precision
///
/// Document stores keep timestamps in milliseconds, so every stamp is
/// truncated up front and reads back unchanged.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Merchant shown on the invoice
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Customer the invoice is addressed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A single invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Client-side identifier, stored verbatim (number or string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub total: f64,
}

/// Optional service-fee metadata attached to an invoice
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee_amount: Option<f64>,
}

/// A validated invoice that has not been persisted yet
///
/// Produced by [`crate::core::validation::validate_invoice`]; turned into an
/// [`Invoice`] by [`Invoice::from_new`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub merchant_info: Option<MerchantInfo>,
    pub customer_info: CustomerInfo,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub total: f64,
    pub fee: ServiceFee,
    pub dynamic_qr_code: Option<String>,
}

/// A stored invoice document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_info: Option<MerchantInfo>,

    pub customer_info: CustomerInfo,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub total: f64,

    #[serde(flatten)]
    pub fee: ServiceFee,

    #[serde(
        rename = "dynamicQRCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamic_qr_code: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a storable invoice from a validated payload
    ///
    /// Assigns a fresh internal id and stamps both timestamps with `now`.
    pub fn from_new(new: NewInvoice, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_number: new.invoice_number,
            merchant_info: new.merchant_info,
            customer_info: new.customer_info,
            items: new.items,
            subtotal: new.subtotal,
            total: new.total,
            fee: new.fee,
            dynamic_qr_code: new.dynamic_qr_code,
            created_at: now,
            updated_at: now,
        }
    }

    /// List view of this invoice (drops the QR image)
    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary::from(self.clone())
    }
}

/// An invoice without its encoded QR image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: Uuid,
    pub invoice_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_info: Option<MerchantInfo>,

    pub customer_info: CustomerInfo,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub total: f64,

    #[serde(flatten)]
    pub fee: ServiceFee,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceSummary {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            merchant_info: invoice.merchant_info,
            customer_info: invoice.customer_info,
            items: invoice.items,
            subtotal: invoice.subtotal,
            total: invoice.total,
            fee: invoice.fee,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}
