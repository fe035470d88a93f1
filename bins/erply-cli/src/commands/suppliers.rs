//! Suppliers command - list suppliers, several pages per request

use crate::output;
use anyhow::{bail, Result};
use erply_api_client::endpoints::suppliers::{Supplier, SupplierFilter};
use erply_api_client::{ErplyClient, Params};
use owo_colors::OwoColorize;

/// Run suppliers command
pub async fn run(search: Option<&str>, page_size: u32, pages: u32, format: &str) -> Result<()> {
    if pages == 0 {
        bail!("--pages must be at least 1");
    }

    let client = ErplyClient::new()?;

    let filters: Vec<SupplierFilter> = (1..=pages)
        .map(|page| {
            let filter = SupplierFilter::new().with_page(page, page_size);
            match search {
                Some(name) => filter.with_search(name),
                None => filter,
            }
        })
        .collect();

    let envelope = client
        .suppliers()
        .get_suppliers_bulk(&filters, &Params::new())
        .await?;
    let suppliers: Vec<Supplier> = envelope.into_flat_records();

    if format == "json" {
        return output::json(&suppliers);
    }

    output::header("Suppliers");

    if suppliers.is_empty() {
        println!("  {}", "No suppliers found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<8} {:<36} {:<24} {}",
        "ID".dimmed(),
        "Name".dimmed(),
        "Group".dimmed(),
        "Email".dimmed()
    );
    for supplier in &suppliers {
        println!(
            "  {:<8} {:<36} {:<24} {}",
            supplier.supplier_id,
            supplier.full_name,
            output::or_dash(&supplier.group_name),
            output::or_dash(&supplier.email)
        );
    }
    println!();
    println!("  {} supplier(s)", suppliers.len().to_string().green());
    println!();

    Ok(())
}
