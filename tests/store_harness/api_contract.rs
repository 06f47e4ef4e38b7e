//! HTTP API test macro for invoice stores.
//!
//! The `invoice_api_tests!` macro generates HTTP-level tests that validate an
//! `InvoiceStore` through full round trips:
//! JSON → HTTP request → handler → InvoiceStore → HTTP response → JSON.

/// Generate an HTTP API test suite for a storage backend.
///
/// `$factory` must produce a fresh `impl InvoiceStore + 'static`.
///
/// # Generated Tests
///
/// ## Create & Get
/// - `test_api_create_then_get`: 201, then the same document comes back
/// - `test_api_duplicate_number`: 409 and still a single invoice
/// - `test_api_duplicate_with_different_body`: 409, original kept
/// - `test_api_validation_failure`: 400 with every violation, nothing stored
/// - `test_api_malformed_body`: 400 for non-JSON
/// - `test_api_get_unknown`: 404
///
/// ## List
/// - `test_api_list_pagination`: 60 invoices over two pages
/// - `test_api_list_clamps_and_defaults`
/// - `test_api_list_omits_qr_code`
///
/// ## Delete
/// - `test_api_delete_then_get`: 200, then 404 for both get and delete
#[macro_export]
macro_rules! invoice_api_tests {
    ($factory:expr) => {
        mod invoice_api_contract_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use qr_invoice::server::ServerBuilder;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                let router = ServerBuilder::new()
                    .with_config(test_config())
                    .with_store($factory)
                    .build()
                    .unwrap();
                TestServer::try_new(router).unwrap()
            }

            async fn create(server: &TestServer, number: &str) -> Value {
                let response = server
                    .post("/api/invoices")
                    .json(&sample_payload(number))
                    .await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()
            }

            // ==============================================================
            // Create & Get
            // ==============================================================

            #[tokio::test]
            async fn test_api_create_then_get() {
                let server = make_server().await;

                let created = create(&server, "INV-1001").await;
                assert_eq!(created["success"], true);
                assert_eq!(created["message"], "Invoice saved successfully");
                assert_eq!(created["invoiceNumber"], "INV-1001");
                let invoice_id = created["invoiceId"].as_str().unwrap().to_string();
                uuid::Uuid::parse_str(&invoice_id).unwrap();

                let response = server.get("/api/invoices/INV-1001").await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["success"], true);

                let invoice = &body["invoice"];
                assert_eq!(invoice["id"], invoice_id.as_str());
                assert_eq!(invoice["invoiceNumber"], "INV-1001");
                assert_eq!(invoice["customerInfo"]["name"], "Alice");
                assert_eq!(invoice["merchantInfo"]["location"], "Main Street 1");
                assert_eq!(invoice["items"][0]["id"], 1);
                assert_eq!(invoice["items"][1]["id"], "sku-croissant");
                assert_eq!(invoice["items"][0]["quantity"], 2);
                assert_eq!(invoice["subtotal"], 12.0);
                assert_eq!(invoice["total"], 12.6);
                assert_eq!(invoice["serviceFee"], true);
                assert_eq!(invoice["feeType"], "percentage");
                assert_eq!(invoice["serviceFeeAmount"], 0.6);
                assert_eq!(invoice["dynamicQRCode"], "data:image/png;base64,AAAA");
                assert_eq!(
                    timestamp(&invoice["createdAt"]),
                    timestamp(&created["createdAt"])
                );
                assert_eq!(
                    timestamp(&invoice["updatedAt"]),
                    timestamp(&invoice["createdAt"])
                );
            }

            #[tokio::test]
            async fn test_api_duplicate_number() {
                let server = make_server().await;
                create(&server, "INV-1001").await;

                let response = server
                    .post("/api/invoices")
                    .json(&sample_payload("INV-1001"))
                    .await;
                response.assert_status(StatusCode::CONFLICT);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["code"], "INVOICE_ALREADY_EXISTS");

                let list: Value = server.get("/api/invoices").await.json();
                assert_eq!(list["pagination"]["total"], 1);
            }

            #[tokio::test]
            async fn test_api_duplicate_with_different_body() {
                let server = make_server().await;
                create(&server, "INV-2002").await;

                let mut payload = sample_payload("INV-2002");
                payload["customerInfo"] = json!({ "name": "Bob" });
                payload["items"] = json!([{ "id": 9, "name": "Tea", "quantity": 1, "price": 2.5, "total": 2.5 }]);
                payload["subtotal"] = json!(2.5);
                payload["total"] = json!(2.5);
                payload["serviceFee"] = json!(false);

                let response = server.post("/api/invoices").json(&payload).await;
                response.assert_status(StatusCode::CONFLICT);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVOICE_ALREADY_EXISTS");

                let stored: Value = server.get("/api/invoices/INV-2002").await.json();
                assert_eq!(stored["invoice"]["customerInfo"]["name"], "Alice");
            }

            #[tokio::test]
            async fn test_api_validation_failure() {
                let server = make_server().await;

                let mut payload = sample_payload("INV-BAD");
                payload["customerInfo"] = json!({ "name": "   " });
                payload["items"][0]["quantity"] = json!(0);
                payload["total"] = json!(-1.0);

                let response = server.post("/api/invoices").json(&payload).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["code"], "VALIDATION_ERROR");

                let fields: Vec<&str> = body["details"]["fields"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|f| f["field"].as_str().unwrap())
                    .collect();
                assert!(fields.contains(&"customerInfo.name"), "{:?}", fields);
                assert!(fields.contains(&"items[0].quantity"), "{:?}", fields);
                assert!(fields.contains(&"total"), "{:?}", fields);

                server
                    .get("/api/invoices/INV-BAD")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_api_empty_items_rejected() {
                let server = make_server().await;

                let mut payload = sample_payload("INV-EMPTY");
                payload["items"] = json!([]);

                let response = server.post("/api/invoices").json(&payload).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert!(body["message"].as_str().unwrap().contains("items"));
            }

            #[tokio::test]
            async fn test_api_malformed_body() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .text("{ not json")
                    .content_type("application/json")
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_BODY");
            }

            #[tokio::test]
            async fn test_api_get_unknown() {
                let server = make_server().await;

                let response = server.get("/api/invoices/NOPE-1").await;
                response.assert_status(StatusCode::NOT_FOUND);
                let body: Value = response.json();
                assert_eq!(body["success"], false);
                assert_eq!(body["code"], "INVOICE_NOT_FOUND");
            }

            // ==============================================================
            // List
            // ==============================================================

            #[tokio::test]
            async fn test_api_list_pagination() {
                let server = make_server().await;
                for i in 0..60 {
                    create(&server, &format!("INV-{:03}", i)).await;
                }

                let first: Value = server.get("/api/invoices").await.json();
                assert_eq!(first["success"], true);
                assert_eq!(first["invoices"].as_array().unwrap().len(), 50);
                assert_eq!(first["pagination"]["total"], 60);
                assert_eq!(first["pagination"]["limit"], 50);
                assert_eq!(first["pagination"]["skip"], 0);
                assert_eq!(first["pagination"]["hasMore"], true);

                let second: Value = server
                    .get("/api/invoices")
                    .add_query_param("skip", 50)
                    .await
                    .json();
                assert_eq!(second["invoices"].as_array().unwrap().len(), 10);
                assert_eq!(second["pagination"]["hasMore"], false);

                let mut seen: Vec<String> = first["invoices"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .chain(second["invoices"].as_array().unwrap())
                    .map(|i| i["invoiceNumber"].as_str().unwrap().to_string())
                    .collect();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), 60);
            }

            #[tokio::test]
            async fn test_api_list_clamps_and_defaults() {
                let server = make_server().await;
                create(&server, "INV-1").await;

                let body: Value = server
                    .get("/api/invoices")
                    .add_query_param("limit", 500)
                    .await
                    .json();
                assert_eq!(body["pagination"]["limit"], 100);

                let response = server
                    .get("/api/invoices")
                    .add_query_param("limit", "abc")
                    .add_query_param("sortBy", "password")
                    .add_query_param("sortOrder", "sideways")
                    .await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["pagination"]["limit"], 50);
                assert_eq!(body["invoices"].as_array().unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_api_list_sorted_by_invoice_number() {
                let server = make_server().await;
                for number in ["INV-B", "INV-C", "INV-A"] {
                    create(&server, number).await;
                }

                let body: Value = server
                    .get("/api/invoices")
                    .add_query_param("sortBy", "invoiceNumber")
                    .add_query_param("sortOrder", "asc")
                    .await
                    .json();
                let numbers: Vec<&str> = body["invoices"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|i| i["invoiceNumber"].as_str().unwrap())
                    .collect();
                assert_eq!(numbers, vec!["INV-A", "INV-B", "INV-C"]);
            }

            #[tokio::test]
            async fn test_api_list_omits_qr_code() {
                let server = make_server().await;
                create(&server, "INV-1").await;

                let body: Value = server.get("/api/invoices").await.json();
                let summary = &body["invoices"][0];
                assert_eq!(summary["invoiceNumber"], "INV-1");
                assert!(summary.get("dynamicQRCode").is_none());
                assert!(summary.get("items").is_some());
            }

            // ==============================================================
            // Delete
            // ==============================================================

            #[tokio::test]
            async fn test_api_delete_then_get() {
                let server = make_server().await;
                let created = create(&server, "INV-1001").await;

                let response = server.delete("/api/invoices/INV-1001").await;
                response.assert_status_ok();
                let body: Value = response.json();
                assert_eq!(body["success"], true);
                assert_eq!(body["message"], "Invoice deleted successfully");
                assert_eq!(body["deletedInvoice"]["id"], created["invoiceId"]);
                assert_eq!(body["deletedInvoice"]["invoiceNumber"], "INV-1001");

                server
                    .get("/api/invoices/INV-1001")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete("/api/invoices/INV-1001")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }
        }
    };
}
