//! End-to-end bulk behaviour against a recording transport

use async_trait::async_trait;
use erply_api_client::endpoints::prices::{
    PriceList, PriceListFilter, PriceListProduct, PriceListRule, ProductPriceList,
};
use erply_api_client::endpoints::suppliers::{Supplier, SupplierFilter};
use erply_api_client::endpoints::Attribute;
use erply_api_client::prelude::*;
use erply_api_client::status::{BulkItemStatus, Status};
use erply_api_client::BatchItemResult;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Single { method: String, params: Params },
    Bulk { requests: Vec<NamedRequest>, shared: Params },
}

/// Transport that records every call and answers with a canned body
struct SpyTransport {
    body: Vec<u8>,
    sent: Mutex<Vec<Sent>>,
}

impl SpyTransport {
    fn new(body: impl Into<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            body: body.into(),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn json(body: &Value) -> Arc<Self> {
        Self::new(serde_json::to_vec(body).unwrap())
    }

    fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn send_request(&self, method: &str, params: &Params) -> ApiResult<Vec<u8>> {
        self.sent.lock().unwrap().push(Sent::Single {
            method: method.to_string(),
            params: params.clone(),
        });
        Ok(self.body.clone())
    }

    async fn send_request_bulk(&self, requests: &[NamedRequest], shared: &Params) -> ApiResult<Vec<u8>> {
        self.sent.lock().unwrap().push(Sent::Bulk {
            requests: requests.to_vec(),
            shared: shared.clone(),
        });
        Ok(self.body.clone())
    }
}

fn client_with(transport: Arc<SpyTransport>) -> ErplyClient {
    ErplyClient::with_transport(ClientConfig::new("104514").with_max_bulk_requests(3), transport)
}

fn ok_status(request: &str) -> Value {
    json!({"request": request, "responseStatus": "ok", "errorCode": 0})
}

fn item(index: usize, ok: bool, records: Value) -> Value {
    let (status, code) = if ok { ("ok", 0) } else { ("error", 1002) };
    json!({
        "status": {
            "requestName": "getSuppliers",
            "requestID": index,
            "responseStatus": status,
            "errorCode": code
        },
        "records": records
    })
}

#[tokio::test]
async fn test_oversize_batch_is_never_sent() {
    let transport = SpyTransport::json(&json!({}));
    let client = client_with(transport.clone());

    let filters = vec![SupplierFilter::new(); 4];
    let result = client.suppliers().get_suppliers_bulk(&filters, &Params::new()).await;

    assert!(matches!(
        result,
        Err(ApiError::BatchSizeExceeded { limit: 3, actual: 4 })
    ));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_batch_at_limit_is_sent() {
    let body = json!({
        "status": ok_status(""),
        "requests": [item(0, true, json!([])), item(1, true, json!([])), item(2, true, json!([]))]
    });
    let transport = SpyTransport::json(&body);
    let client = client_with(transport.clone());

    let filters = vec![SupplierFilter::new(); 3];
    let envelope = client
        .suppliers()
        .get_suppliers_bulk(&filters, &Params::new())
        .await
        .unwrap();

    assert_eq!(envelope.len(), 3);
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_batch_failure_wins_over_items() {
    let body = json!({
        "status": {"request": "", "responseStatus": "error", "errorCode": 1001},
        "requests": [item(0, true, json!([])), item(1, false, json!([]))]
    });
    let client = client_with(SpyTransport::json(&body));

    let filters = vec![SupplierFilter::new(); 2];
    let err = client
        .suppliers()
        .get_suppliers_bulk(&filters, &Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { code: 1001, .. }));
}

#[tokio::test]
async fn test_first_failing_item_is_reported() {
    let body = json!({
        "status": ok_status(""),
        "requests": [
            item(0, true, json!([{"supplierID": 1}])),
            item(1, false, json!([])),
            item(2, true, json!([{"supplierID": 3}]))
        ]
    });
    let client = client_with(SpyTransport::json(&body));

    let filters = vec![SupplierFilter::new(); 3];
    let err = client
        .suppliers()
        .get_suppliers_bulk(&filters, &Params::new())
        .await
        .unwrap_err();

    match err {
        ApiError::ItemStatus { index, code, request, .. } => {
            assert_eq!(index, 1);
            assert_eq!(code, 1002);
            assert_eq!(request, "getSuppliers");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_items_come_back_in_submission_order() {
    let body = json!({
        "status": ok_status(""),
        "requests": [
            item(0, true, json!([{"supplierID": 10, "fullName": "First"}])),
            item(1, true, json!([])),
            item(2, true, json!([{"supplierID": 30}, {"supplierID": 31}]))
        ]
    });
    let transport = SpyTransport::json(&body);
    let client = client_with(transport.clone());

    let filters = [
        SupplierFilter::new().with_id(10),
        SupplierFilter::new().with_search("nothing"),
        SupplierFilter::new().with_page(1, 2),
    ];
    let shared = Params::new().with("recordsOnPage", 20);
    let envelope = client
        .suppliers()
        .get_suppliers_bulk(&filters, &shared)
        .await
        .unwrap();

    let records: Vec<Vec<Supplier>> = envelope.into_records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0][0].supplier_id, 10);
    assert_eq!(records[0][0].full_name, "First");
    assert!(records[1].is_empty());
    assert_eq!(records[2].iter().map(|s| s.supplier_id).collect::<Vec<_>>(), [30, 31]);

    match &transport.sent()[0] {
        Sent::Bulk { requests, shared } => {
            assert_eq!(requests.len(), 3);
            assert!(requests.iter().all(|r| r.method() == "getSuppliers"));
            assert_eq!(requests[0].params().get("supplierID"), Some(&json!(10)));
            assert_eq!(shared.get("recordsOnPage"), Some(&json!(20)));
        }
        other => panic!("expected a bulk call, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_bulk_body_keeps_raw_bytes() {
    let client = client_with(SpyTransport::new("<html>gateway</html>"));

    let err = client
        .suppliers()
        .get_suppliers_bulk(&[SupplierFilter::new()], &Params::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.raw_body(), Some(b"<html>gateway</html>".as_slice()));
}

#[tokio::test]
async fn test_single_call_zero_records_is_none() {
    let body = json!({"status": ok_status("getServiceEndpoints"), "records": []});
    let client = client_with(SpyTransport::json(&body));

    let endpoints = client.service_discovery().get_service_endpoints().await.unwrap();
    assert!(endpoints.is_none());
}

#[tokio::test]
async fn test_single_call_status_error() {
    let body = json!({
        "status": {"request": "getSuppliers", "responseStatus": "error", "errorCode": 1054},
        "records": null
    });
    let transport = SpyTransport::json(&body);
    let client = client_with(transport.clone());

    let err = client
        .suppliers()
        .get_suppliers(&SupplierFilter::new())
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), Some(1054));
    assert!(matches!(&transport.sent()[0], Sent::Single { method, .. } if method == "getSuppliers"));
}

#[tokio::test]
async fn test_change_dispatch_picks_method_per_item() {
    let body = json!({
        "status": ok_status(""),
        "requests": [
            {"status": {"requestName": "addProductToSupplierPriceList", "requestID": 0, "responseStatus": "ok"},
             "records": [{"supplierPriceListProductID": 501}]},
            {"status": {"requestName": "editProductInSupplierPriceList", "requestID": 1, "responseStatus": "ok"},
             "records": [{"supplierPriceListProductID": 77}]}
        ]
    });
    let transport = SpyTransport::json(&body);
    let client = client_with(transport.clone());

    let changes = [
        PriceListProduct {
            price_list_id: Some(3),
            product_id: Some(5),
            price: Some(1.5),
            ..PriceListProduct::default()
        }
        .into_change(),
        PriceListProduct {
            row_id: Some(77),
            price: Some(1.75),
            ..PriceListProduct::default()
        }
        .into_change(),
    ];

    let envelope = client
        .prices()
        .change_product_to_supplier_price_list_bulk(&changes, &Params::new())
        .await
        .unwrap();

    let ids: Vec<i64> = envelope
        .into_flat_records()
        .iter()
        .map(|r| r.supplier_price_list_product_id)
        .collect();
    assert_eq!(ids, [501, 77]);

    match &transport.sent()[0] {
        Sent::Bulk { requests, .. } => {
            let methods: Vec<&str> = requests.iter().map(NamedRequest::method).collect();
            assert_eq!(
                methods,
                ["addProductToSupplierPriceList", "editProductInSupplierPriceList"]
            );
        }
        other => panic!("expected a bulk call, got {other:?}"),
    }
}

#[tokio::test]
async fn test_product_rows_decode_through_bulk() {
    let body = json!({
        "status": ok_status(""),
        "requests": [{
            "status": {"requestName": "getProductsInSupplierPriceList", "requestID": 0, "responseStatus": "ok"},
            "records": [{"supplierPriceListProductID": 9, "productID": 5, "price": 2.25, "amount": 1}]
        }]
    });
    let client = client_with(SpyTransport::json(&body));

    let envelope = client
        .prices()
        .get_product_price_lists_bulk(&[Default::default()], &Params::new())
        .await
        .unwrap();

    let rows: &[ProductPriceList] = envelope.records(0).unwrap();
    assert_eq!(rows[0].price_id, 9);
    assert!((rows[0].price - 2.25).abs() < f64::EPSILON);
}

fn envelope_of<T>(method: &str, pages: Vec<Vec<T>>) -> BatchEnvelope<T> {
    BatchEnvelope {
        status: Status::ok(""),
        items: pages
            .into_iter()
            .enumerate()
            .map(|(i, records)| BatchItemResult {
                status: BulkItemStatus {
                    request_name: method.to_string(),
                    request_id: i.to_string(),
                    status: Status::ok(method),
                },
                records,
            })
            .collect(),
    }
}

fn encoded<T: Serialize>(envelope: &BatchEnvelope<T>) -> Arc<SpyTransport> {
    SpyTransport::new(serde_json::to_vec(envelope).unwrap())
}

#[tokio::test]
async fn test_price_list_records_survive_bulk_round_trip() {
    let autumn = PriceList {
        id: 3,
        supplier_id: 12,
        supplier_name: "Acme".into(),
        name: "Autumn".into(),
        valid_from: "2020-09-01".into(),
        valid_to: "2020-11-30".into(),
        active: "1".into(),
        added_timestamp: 1_598_918_400,
        rules: vec![
            PriceListRule { product_id: 5, price: 1.99, amount: 10 },
            PriceListRule { product_id: 6, price: 0.1, amount: 1 },
        ],
        attributes: vec![Attribute::new("season", "text", "autumn")],
        ..PriceList::default()
    };
    let winter = PriceList {
        id: 4,
        name: "Winter".into(),
        ..PriceList::default()
    };
    let pages = vec![vec![autumn], vec![], vec![winter]];

    let transport = encoded(&envelope_of("getSupplierPriceLists", pages.clone()));
    let wire: Value = serde_json::from_slice(&transport.body).unwrap();
    assert_eq!(wire["requests"][0]["records"][0]["pricelistRules"][0]["price"], json!("1.99"));

    let client = client_with(transport);
    let filters = vec![PriceListFilter::default(); 3];
    let envelope = client
        .prices()
        .get_supplier_price_lists_bulk(&filters, &Params::new())
        .await
        .unwrap();

    assert_eq!(envelope.into_records(), pages);
}

#[tokio::test]
async fn test_supplier_records_survive_bulk_round_trip() {
    let supplier = Supplier {
        supplier_id: 10,
        supplier_type: "COMPANY".into(),
        full_name: "Acme OÜ".into(),
        company_name: "Acme OÜ".into(),
        group_id: 3,
        email: "orders@acme.example".into(),
        vatrate_id: 2,
        currency_code: "EUR".into(),
        gln: "4740000000000".into(),
        attributes: vec![Attribute::new("rating", "int", 5)],
        bank_iban: "EE382200221020145685".into(),
        payment_days: 14,
        added: 1_600_000_000,
        ..Supplier::default()
    };
    let pages = vec![vec![supplier.clone()], vec![Supplier::default(), supplier]];

    let client = client_with(encoded(&envelope_of("getSuppliers", pages.clone())));
    let filters = vec![SupplierFilter::new(); 2];
    let envelope = client
        .suppliers()
        .get_suppliers_bulk(&filters, &Params::new())
        .await
        .unwrap();

    assert_eq!(envelope.into_records(), pages);
}
