//! Supplier endpoints
//!
//! Maps to the `getSuppliers`, `saveSupplier` and `deleteSupplier` API
//! methods, each with a bulk variant.

use crate::bulk::{BatchEnvelope, Operation};
use crate::client::ErplyClient;
use crate::endpoints::{insert_attributes, Attribute};
use crate::error::ApiResult;
use crate::params::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Supplier API interface
#[derive(Clone)]
pub struct SuppliersApi {
    client: ErplyClient,
}

impl SuppliersApi {
    /// Create a new supplier API interface
    pub(crate) fn new(client: ErplyClient) -> Self {
        Self { client }
    }

    /// List suppliers matching a filter
    pub async fn get_suppliers(&self, filter: &SupplierFilter) -> ApiResult<Vec<Supplier>> {
        self.client.call_list(filter).await
    }

    /// Run several supplier queries in one request, e.g. to page past the
    /// per-request record limit
    pub async fn get_suppliers_bulk(
        &self,
        filters: &[SupplierFilter],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<Supplier>> {
        self.client.call_bulk(filters, shared).await
    }

    /// Create or update a supplier
    ///
    /// Returns `None` when the API answered without a result record.
    pub async fn save_supplier(
        &self,
        supplier: &SupplierInput,
    ) -> ApiResult<Option<SaveSupplierResult>> {
        self.client.call_first(supplier).await
    }

    /// Create or update several suppliers in one request
    pub async fn save_supplier_bulk(
        &self,
        suppliers: &[SupplierInput],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<SaveSupplierResult>> {
        self.client.call_bulk(suppliers, shared).await
    }

    /// Delete a supplier
    pub async fn delete_supplier(&self, supplier_id: i64) -> ApiResult<()> {
        let _: Value = self
            .client
            .call(DELETE_SUPPLIER, &DeleteSupplier { supplier_id }.params())
            .await?;
        Ok(())
    }

    /// Delete several suppliers in one request
    pub async fn delete_supplier_bulk(
        &self,
        supplier_ids: &[i64],
        shared: &Params,
    ) -> ApiResult<BatchEnvelope<Value>> {
        let items: Vec<DeleteSupplier> = supplier_ids
            .iter()
            .map(|&supplier_id| DeleteSupplier { supplier_id })
            .collect();
        self.client.call_bulk(&items, shared).await
    }
}

const GET_SUPPLIERS: &str = "getSuppliers";
const SAVE_SUPPLIER: &str = "saveSupplier";
const DELETE_SUPPLIER: &str = "deleteSupplier";

// ============================================================================
// Request Types
// ============================================================================

/// Filters for `getSuppliers`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierFilter {
    /// Return a single supplier by ID
    pub supplier_id: Option<i64>,
    /// Return only these suppliers
    pub supplier_ids: Vec<i64>,
    /// Match against name, code or registry number
    pub search_name: Option<String>,
    /// Only suppliers in this supplier group
    pub group_id: Option<i64>,
    /// Only suppliers added or changed since this Unix time
    pub changed_since: Option<i64>,
    /// Include detail fields (bank account, manager, notes)
    pub detailed: Option<bool>,
    /// Page size, at most 100
    pub records_on_page: Option<u32>,
    /// Page number, starting at 1
    pub page_no: Option<u32>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl SupplierFilter {
    /// Create new filter with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by supplier ID
    #[must_use]
    pub fn with_id(mut self, supplier_id: i64) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }

    /// Search by name
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search_name = Some(search.into());
        self
    }

    /// Set page and page size
    #[must_use]
    pub fn with_page(mut self, page_no: u32, records_on_page: u32) -> Self {
        self.page_no = Some(page_no);
        self.records_on_page = Some(records_on_page);
        self
    }
}

impl Operation for SupplierFilter {
    fn method(&self) -> &str {
        GET_SUPPLIERS
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierID", self.supplier_id);
        params.insert_ids("supplierIDs", &self.supplier_ids);
        params.insert_opt("searchName", self.search_name.clone());
        params.insert_opt("groupID", self.group_id);
        params.insert_opt("changedSince", self.changed_since);
        if self.detailed == Some(true) {
            params.insert("responseMode", "detail");
        }
        params.insert_opt("recordsOnPage", self.records_on_page);
        params.insert_opt("pageNo", self.page_no);
        params
    }
}

/// Input for `saveSupplier`
///
/// Setting `supplier_id` updates that supplier; leaving it empty creates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierInput {
    /// Existing supplier to update
    pub supplier_id: Option<i64>,
    /// `PERSON` or `COMPANY`
    pub supplier_type: Option<String>,
    /// Company name, for company suppliers
    pub company_name: Option<String>,
    /// First name, for person suppliers
    pub first_name: Option<String>,
    /// Last name, for person suppliers
    pub last_name: Option<String>,
    /// Supplier group
    pub group_id: Option<i64>,
    /// Registry code
    pub code: Option<String>,
    /// VAT number
    pub vat_number: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Mobile number
    pub mobile: Option<String>,
    /// Country
    pub country_id: Option<i64>,
    /// Default currency for purchases
    pub currency_code: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Custom attributes
    pub attributes: Vec<Attribute>,
    /// Parameters not covered by the fields above
    pub extra: Params,
}

impl Operation for SupplierInput {
    fn method(&self) -> &str {
        SAVE_SUPPLIER
    }

    fn params(&self) -> Params {
        let mut params = self.extra.clone();
        params.insert_opt("supplierID", self.supplier_id);
        params.insert_opt("supplierType", self.supplier_type.clone());
        params.insert_opt("companyName", self.company_name.clone());
        params.insert_opt("firstName", self.first_name.clone());
        params.insert_opt("lastName", self.last_name.clone());
        params.insert_opt("groupID", self.group_id);
        params.insert_opt("code", self.code.clone());
        params.insert_opt("vatNumber", self.vat_number.clone());
        params.insert_opt("email", self.email.clone());
        params.insert_opt("phone", self.phone.clone());
        params.insert_opt("mobile", self.mobile.clone());
        params.insert_opt("countryID", self.country_id);
        params.insert_opt("currencyCode", self.currency_code.clone());
        params.insert_opt("notes", self.notes.clone());
        insert_attributes(&mut params, &self.attributes);
        params
    }
}

/// Input for `deleteSupplier`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeleteSupplier {
    supplier_id: i64,
}

impl Operation for DeleteSupplier {
    fn method(&self) -> &str {
        DELETE_SUPPLIER
    }

    fn params(&self) -> Params {
        Params::new().with("supplierID", self.supplier_id)
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Supplier record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplier {
    #[serde(rename = "supplierID")]
    pub supplier_id: i64,
    #[serde(rename = "supplierType")]
    pub supplier_type: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "groupID")]
    pub group_id: i64,
    #[serde(rename = "groupName")]
    pub group_name: String,
    pub phone: String,
    pub mobile: String,
    pub email: String,
    pub fax: String,
    pub code: String,
    #[serde(rename = "integrationCode")]
    pub integration_code: String,
    #[serde(rename = "vatrateID")]
    pub vatrate_id: i64,
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    #[serde(rename = "deliveryTermsID")]
    pub delivery_terms_id: i64,
    #[serde(rename = "countryID")]
    pub country_id: i64,
    #[serde(rename = "countryName")]
    pub country_name: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub address: String,
    #[serde(rename = "GLN")]
    pub gln: String,
    pub attributes: Vec<Attribute>,

    // Detail fields, present with `responseMode=detail`
    #[serde(rename = "vatNumber")]
    pub vat_number: String,
    pub skype: String,
    pub website: String,
    #[serde(rename = "bankName")]
    pub bank_name: String,
    #[serde(rename = "bankAccountNumber")]
    pub bank_account_number: String,
    #[serde(rename = "bankIBAN")]
    pub bank_iban: String,
    #[serde(rename = "bankSWIFT")]
    pub bank_swift: String,
    pub birthday: String,
    #[serde(rename = "companyID")]
    pub company_id: i64,
    #[serde(rename = "parentCompanyName")]
    pub parent_company_name: String,
    #[serde(rename = "supplierManagerID")]
    pub supplier_manager_id: i64,
    #[serde(rename = "supplierManagerName")]
    pub supplier_manager_name: String,
    #[serde(rename = "paymentDays")]
    pub payment_days: i64,
    pub notes: String,
    #[serde(rename = "lastModified")]
    pub last_modified: String,
    pub added: i64,
}

/// Result record of `saveSupplier`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveSupplierResult {
    #[serde(rename = "supplierID")]
    pub supplier_id: i64,
    #[serde(rename = "alreadyExists")]
    pub already_exists: bool,
}
