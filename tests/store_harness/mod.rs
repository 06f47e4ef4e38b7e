//! Shared test harness for invoice store and API testing
//!
//! Provides builders for invoices and request payloads, plus two macros:
//! `invoice_store_tests!` validates any `InvoiceStore` implementation and
//! `invoice_api_tests!` drives the HTTP API on top of a store.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]


#[macro_use]
pub mod api_contract;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use qr_invoice::config::{AppConfig, Environment, RateLimitConfig};
use qr_invoice::core::invoice::{
    CustomerInfo, Invoice, LineItem, MerchantInfo, NewInvoice, ServiceFee, timestamp_now,
};

/// A fully populated invoice, created `offset_secs` after now
pub fn sample_invoice_at(number: &str, total: f64, offset_secs: i64) -> Invoice {
    let new = NewInvoice {
        invoice_number: number.to_string(),
        merchant_info: Some(MerchantInfo {
            name: Some("Corner Cafe".to_string()),
            location: Some("Main Street 1".to_string()),
        }),
        customer_info: CustomerInfo {
            name: format!("Customer {}", number),
            email: Some("customer@example.com".to_string()),
            phone: None,
            address: None,
        },
        items: vec![
            LineItem {
                id: Some(json!(1)),
                name: "Latte".to_string(),
                quantity: 2,
                price: total / 4.0,
                total: total / 2.0,
            },
            LineItem {
                id: Some(json!("sku-croissant")),
                name: "Croissant".to_string(),
                quantity: 1,
                price: total / 2.0,
                total: total / 2.0,
            },
        ],
        subtotal: total,
        total,
        fee: ServiceFee {
            service_fee: Some(false),
            fee_type: None,
            fee_value: None,
            service_fee_amount: Some(0.0),
        },
        dynamic_qr_code: Some(format!("data:image/png;base64,QR-{}", number)),
    };
    Invoice::from_new(new, timestamp_now() + Duration::seconds(offset_secs))
}

/// A fully populated invoice created now
pub fn sample_invoice(number: &str) -> Invoice {
    sample_invoice_at(number, 12.0, 0)
}

/// A valid create-invoice request body
pub fn sample_payload(number: &str) -> Value {
    json!({
        "invoiceNumber": number,
        "merchantInfo": { "name": "Corner Cafe", "location": "Main Street 1" },
        "customerInfo": { "name": "Alice", "email": "alice@example.com" },
        "items": [
            { "id": 1, "name": "Latte", "quantity": 2, "price": 4.5, "total": 9.0 },
            { "id": "sku-croissant", "name": "Croissant", "quantity": 1, "price": 3.0, "total": 3.0 }
        ],
        "subtotal": 12.0,
        "total": 12.6,
        "serviceFee": true,
        "feeType": "percentage",
        "feeValue": 5.0,
        "serviceFeeAmount": 0.6,
        "dynamicQRCode": "data:image/png;base64,AAAA"
    })
}

/// Parse a timestamp field from a JSON response
pub fn timestamp(value: &Value) -> DateTime<Utc> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| panic!("Expected RFC 3339 timestamp, got {}", value))
}

/// Configuration for API tests: detailed errors and a budget no test exhausts
pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Test,
        rate_limit: RateLimitConfig {
            max_requests: 10_000,
            window: std::time::Duration::from_secs(60),
        },
        ..AppConfig::default()
    }
}
