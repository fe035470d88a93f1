//! Supplier price list endpoints
//!
//! Covers price list headers (`getSupplierPriceLists`,
//! `saveSupplierPriceList`) and the product rows inside them
//! (`getProductsInSupplierPriceList`, `addProductToSupplierPriceList`,
//! `editProductInSupplierPriceList`, `deleteProductsFromSupplierPriceList`).

use crate::bulk::{BatchEnvelope, Change, ChangeMethods, NamedRequest, Operation};
use crate::client::ErplyClient;
use crate::endpoints::{insert_attributes, Attribute};
use crate::error::ApiResult;
use crate::params::Params;
use serde::{Deserialize, Serialize};

const GET_SUPPLIER_PRICE_LISTS: &str = "getSupplierPriceLists";
const SAVE_SUPPLIER_PRICE_LIST: &str = "saveSupplierPriceList";
const GET_PRODUCTS_IN_SUPPLIER_PRICE_LIST: &str = "getProductsInSupplierPriceList";
const ADD_PRODUCT_TO_SUPPLIER_PRICE_LIST: &str = "addProductToSupplierPriceList";
const EDIT_PRODUCT_IN_SUPPLIER_PRICE_LIST: &str = "editProductInSupplierPriceList";
const DELETE_PRODUCTS_FROM_SUPPLIER_PRICE_LIST: &str = "deleteProductsFromSupplierPriceList";

/// Price list API interface
#[derive(Clone)]
pub struct PricesApi {
    client: ErplyClient,
}

impl PricesApi {
    /// Create a new price list API interface
    pub(crate) fn new(client: ErplyClient) -> Self {
        Self { client }
    }

    /// List supplier price lists
    pub async fn get_supplier_price_lists(
        &self,
        filter: &PriceListFilter,
    ) -> ApiResult<Vec<PriceList>> {
        self.client.call_list(filter).await
    }

    /// Run several price list queries in one request
    pub async fn get_supplier_price_lists_bulk(
        &self,
        filters: &[PriceListFilter],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<PriceList>> {
        self.client.call_bulk(filters, shared).await
    }

    /// List product rows of supplier price lists
    pub async fn get_product_price_lists(
        &self,
        filter: &ProductPriceListFilter,
    ) -> ApiResult<Vec<ProductPriceList>> {
        self.client.call_list(filter).await
    }

    /// Run several product row queries in one request
    pub async fn get_product_price_lists_bulk(
        &self,
        filters: &[ProductPriceListFilter],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<ProductPriceList>> {
        self.client.call_bulk(filters, shared).await
    }

    /// Add a product row to a price list
    pub async fn add_product_to_supplier_price_list(
        &self,
        product: &PriceListProduct,
    ) -> ApiResult<Option<ChangeProductResult>> {
        self.persist_product(ADD_PRODUCT_TO_SUPPLIER_PRICE_LIST, product)
            .await
    }

    /// Edit an existing product row
    pub async fn edit_product_in_supplier_price_list(
        &self,
        product: &PriceListProduct,
    ) -> ApiResult<Option<ChangeProductResult>> {
        self.persist_product(EDIT_PRODUCT_IN_SUPPLIER_PRICE_LIST, product)
            .await
    }

    async fn persist_product(
        &self,
        method: &str,
        product: &PriceListProduct,
    ) -> ApiResult<Option<ChangeProductResult>> {
        let request = NamedRequest::new(method, product.change_params());
        self.client.call_first(&request).await
    }

    /// Add and edit product rows in one request
    ///
    /// [`Change::Create`] items are sent as `addProductToSupplierPriceList`,
    /// [`Change::Update`] items as `editProductInSupplierPriceList`.
    pub async fn change_product_to_supplier_price_list_bulk(
        &self,
        changes: &[Change<PriceListProduct>],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<ChangeProductResult>> {
        self.client.call_bulk(changes, shared).await
    }

    /// Remove products from a price list
    pub async fn delete_products_from_supplier_price_list(
        &self,
        request: &DeletePriceListProducts,
    ) -> ApiResult<Option<DeleteProductsResult>> {
        self.client.call_first(request).await
    }

    /// Remove products from several price lists in one request
    pub async fn delete_products_from_supplier_price_list_bulk(
        &self,
        requests: &[DeletePriceListProducts],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<DeleteProductsResult>> {
        self.client.call_bulk(requests, shared).await
    }

    /// Create or update a price list header
    pub async fn save_supplier_price_list(
        &self,
        price_list: &PriceListInput,
    ) -> ApiResult<Option<SavePriceListResult>> {
        self.client.call_first(price_list).await
    }

    /// Create or update several price lists in one request
    pub async fn save_supplier_price_list_bulk(
        &self,
        price_lists: &[PriceListInput],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<SavePriceListResult>> {
        self.client.call_bulk(price_lists, shared).await
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Filters for `getSupplierPriceLists`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceListFilter {
    /// Return a single price list
    pub price_list_id: Option<i64>,
    /// Only price lists of this supplier
    pub supplier_id: Option<i64>,
    /// Only price lists added or changed since this Unix time
    pub changed_since: Option<i64>,
    /// Include product rows in each record
    pub get_rules: Option<bool>,
    /// Page size, at most 100
    pub records_on_page: Option<u32>,
    /// Page number, starting at 1
    pub page_no: Option<u32>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl Operation for PriceListFilter {
    fn method(&self) -> &str {
        GET_SUPPLIER_PRICE_LISTS
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierPriceListID", self.price_list_id);
        params.insert_opt("supplierID", self.supplier_id);
        params.insert_opt("changedSince", self.changed_since);
        if self.get_rules == Some(true) {
            params.insert("getPriceListRules", 1);
        }
        params.insert_opt("recordsOnPage", self.records_on_page);
        params.insert_opt("pageNo", self.page_no);
        params
    }
}

/// Filters for `getProductsInSupplierPriceList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPriceListFilter {
    /// Price list whose rows to return
    pub price_list_id: Option<i64>,
    /// Only rows for these products
    pub product_ids: Vec<i64>,
    /// Only rows added or changed since this Unix time
    pub changed_since: Option<i64>,
    /// Page size, at most 100
    pub records_on_page: Option<u32>,
    /// Page number, starting at 1
    pub page_no: Option<u32>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl Operation for ProductPriceListFilter {
    fn method(&self) -> &str {
        GET_PRODUCTS_IN_SUPPLIER_PRICE_LIST
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierPriceListID", self.price_list_id);
        params.insert_ids("productIDs", &self.product_ids);
        params.insert_opt("changedSince", self.changed_since);
        params.insert_opt("recordsOnPage", self.records_on_page);
        params.insert_opt("pageNo", self.page_no);
        params
    }
}

/// Product row to add to or edit in a price list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceListProduct {
    /// Existing row, required when editing
    pub row_id: Option<i64>,
    /// Price list the row belongs to, required when adding
    pub price_list_id: Option<i64>,
    /// Product, required when adding
    pub product_id: Option<i64>,
    /// Purchase price
    pub price: Option<f64>,
    /// Minimum quantity the price applies from
    pub amount: Option<i64>,
    /// Country of origin
    pub country_id: Option<i64>,
    /// Supplier's own product code
    pub supplier_code: Option<String>,
    /// Code used when importing supplier invoices
    pub import_code: Option<String>,
    /// Units in a master pack
    pub master_pack_quantity: Option<i64>,
    /// Minimum order quantity
    pub minimum_order_quantity: Option<i64>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl ChangeMethods for PriceListProduct {
    const CREATE_METHOD: &'static str = ADD_PRODUCT_TO_SUPPLIER_PRICE_LIST;
    const UPDATE_METHOD: &'static str = EDIT_PRODUCT_IN_SUPPLIER_PRICE_LIST;

    fn change_params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierPriceListProductID", self.row_id);
        params.insert_opt("supplierPriceListID", self.price_list_id);
        params.insert_opt("productID", self.product_id);
        params.insert_opt("price", self.price);
        params.insert_opt("amount", self.amount);
        params.insert_opt("countryID", self.country_id);
        params.insert_opt("supplierCode", self.supplier_code.clone());
        params.insert_opt("importCode", self.import_code.clone());
        params.insert_opt("masterPackQuantity", self.master_pack_quantity);
        params.insert_opt("minimumOrderQuantity", self.minimum_order_quantity);
        params
    }
}

impl PriceListProduct {
    /// Tag as an edit when a row ID is set, as an addition otherwise
    #[must_use]
    pub fn into_change(self) -> Change<Self> {
        Change::from_key_presence(self, "supplierPriceListProductID")
    }
}

/// Input for `deleteProductsFromSupplierPriceList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletePriceListProducts {
    /// Price list to remove rows from
    pub price_list_id: i64,
    /// Products whose rows to remove
    pub product_ids: Vec<i64>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl Operation for DeletePriceListProducts {
    fn method(&self) -> &str {
        DELETE_PRODUCTS_FROM_SUPPLIER_PRICE_LIST
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert("supplierPriceListID", self.price_list_id);
        params.insert_ids("productIDs", &self.product_ids);
        params
    }
}

/// Input for `saveSupplierPriceList`
///
/// Setting `price_list_id` updates that price list; leaving it empty creates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceListInput {
    /// Existing price list to update
    pub price_list_id: Option<i64>,
    /// Supplier the price list belongs to
    pub supplier_id: Option<i64>,
    /// Price list name
    pub name: Option<String>,
    /// First day the list is valid, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Last day the list is valid, `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Whether the list is in use
    pub active: Option<bool>,
    /// Product rows, sent as numbered `productID{n}` / `price{n}` / `amount{n}`
    pub rules: Vec<PriceListRule>,
    /// Custom attributes
    pub attributes: Vec<Attribute>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl Operation for PriceListInput {
    fn method(&self) -> &str {
        SAVE_SUPPLIER_PRICE_LIST
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierPriceListID", self.price_list_id);
        params.insert_opt("supplierID", self.supplier_id);
        params.insert_opt("name", self.name.clone());
        params.insert_opt("startDate", self.start_date.clone());
        params.insert_opt("endDate", self.end_date.clone());
        params.insert_flag("active", self.active);
        for (i, rule) in self.rules.iter().enumerate() {
            let n = i + 1;
            params.insert(format!("productID{n}"), rule.product_id);
            params.insert(format!("price{n}"), rule.price);
            params.insert(format!("amount{n}"), rule.amount);
        }
        insert_attributes(&mut params, &self.attributes);
        params
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Product row embedded in a price list record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceListRule {
    #[serde(rename = "productID")]
    pub product_id: i64,
    /// Encoded as a JSON string on the wire
    #[serde(with = "string_f64")]
    pub price: f64,
    pub amount: i64,
}

/// Supplier price list record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceList {
    #[serde(rename = "supplierPriceListID")]
    pub id: i64,
    #[serde(rename = "supplierID")]
    pub supplier_id: i64,
    #[serde(rename = "supplierName")]
    pub supplier_name: String,
    pub name: String,
    #[serde(rename = "startDate")]
    pub valid_from: String,
    #[serde(rename = "endDate")]
    pub valid_to: String,
    pub active: String,
    #[serde(rename = "added")]
    pub added_timestamp: i64,
    #[serde(rename = "lastModified")]
    pub last_modified_timestamp: i64,
    #[serde(rename = "addedByUserName")]
    pub added_by_user_name: String,
    #[serde(rename = "lastModifiedByUserName")]
    pub last_modified_by_user_name: String,
    #[serde(rename = "pricelistRules")]
    pub rules: Vec<PriceListRule>,
    pub attributes: Vec<Attribute>,
}

/// Product row of a supplier price list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPriceList {
    #[serde(rename = "supplierPriceListProductID")]
    pub price_id: i64,
    #[serde(rename = "productID")]
    pub product_id: i64,
    pub price: f64,
    pub amount: i64,
    #[serde(rename = "countryID")]
    pub country_id: i64,
    #[serde(rename = "supplierCode")]
    pub product_supplier_code: String,
    #[serde(rename = "importCode")]
    pub import_code: String,
    #[serde(rename = "masterPackQuantity")]
    pub master_pack_quantity: i64,
    #[serde(rename = "minimumOrderQuantity")]
    pub minimum_order_quantity: i64,
}

/// Result record of adding or editing a product row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeProductResult {
    #[serde(rename = "supplierPriceListProductID")]
    pub supplier_price_list_product_id: i64,
}

/// Result record of `deleteProductsFromSupplierPriceList`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteProductsResult {
    /// Comma separated IDs that were removed
    #[serde(rename = "deletedIDs")]
    pub deleted_ids: String,
    /// Comma separated IDs that were not on the list
    #[serde(rename = "nonExistingIDs")]
    pub non_existing_ids: String,
}

/// Result record of `saveSupplierPriceList`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavePriceListResult {
    #[serde(rename = "supplierPriceListID")]
    pub supplier_price_list_id: i64,
}

/// Float carried as a JSON string, e.g. `"12.50"`
mod string_f64 {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number encoded as a string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
                v.trim().parse().map_err(E::custom)
            }

            // Some accounts send the price unquoted
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
                Ok(v as f64)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
                Ok(v as f64)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_list_rule_price_is_string() {
        let rule: PriceListRule =
            serde_json::from_str(r#"{"productID": 5, "price": "12.5", "amount": 1}"#).unwrap();
        assert!((rule.price - 12.5).abs() < f64::EPSILON);

        let encoded = serde_json::to_value(&rule).unwrap();
        assert_eq!(encoded["price"], json!("12.5"));
    }

    #[test]
    fn test_price_list_deserialize() {
        let json = r#"{
            "supplierPriceListID": 3,
            "supplierID": 12,
            "supplierName": "Acme",
            "name": "Autumn",
            "startDate": "2020-09-01",
            "endDate": "2020-11-30",
            "active": "1",
            "added": 1598918400,
            "lastModified": 1598918400,
            "pricelistRules": [{"productID": 5, "price": "1.99", "amount": 10}],
            "attributes": []
        }"#;

        let list: PriceList = serde_json::from_str(json).unwrap();
        assert_eq!(list.id, 3);
        assert_eq!(list.valid_from, "2020-09-01");
        assert_eq!(list.rules.len(), 1);
        assert_eq!(list.rules[0].amount, 10);
    }

    #[test]
    fn test_product_row_change_dispatch() {
        let add = PriceListProduct {
            price_list_id: Some(3),
            product_id: Some(5),
            price: Some(1.5),
            ..PriceListProduct::default()
        }
        .into_change();
        let edit = PriceListProduct {
            row_id: Some(77),
            price: Some(1.75),
            ..PriceListProduct::default()
        }
        .into_change();

        assert_eq!(add.method(), "addProductToSupplierPriceList");
        assert_eq!(edit.method(), "editProductInSupplierPriceList");
        assert_eq!(edit.params().get("supplierPriceListProductID"), Some(&json!(77)));
    }

    #[test]
    fn test_price_list_input_rules() {
        let input = PriceListInput {
            supplier_id: Some(12),
            name: Some("Winter".into()),
            active: Some(true),
            rules: vec![
                PriceListRule { product_id: 5, price: 1.5, amount: 1 },
                PriceListRule { product_id: 6, price: 2.0, amount: 10 },
            ],
            ..PriceListInput::default()
        };

        let params = input.params();
        assert_eq!(input.method(), "saveSupplierPriceList");
        assert_eq!(params.get("active"), Some(&json!(1)));
        assert_eq!(params.get("productID2"), Some(&json!(6)));
        assert_eq!(params.get("amount2"), Some(&json!(10)));
        assert!(!params.contains("supplierPriceListID"));
    }

    #[test]
    fn test_delete_products_params() {
        let request = DeletePriceListProducts {
            price_list_id: 3,
            product_ids: vec![5, 6],
            ..DeletePriceListProducts::default()
        };

        let params = request.params();
        assert_eq!(params.get("supplierPriceListID"), Some(&json!(3)));
        assert_eq!(params.get("productIDs"), Some(&json!("5,6")));
    }
}
