//! Price lists command - list supplier price lists

use crate::output;
use anyhow::Result;
use erply_api_client::endpoints::prices::{PriceList, PriceListFilter};
use erply_api_client::{ErplyClient, Params};
use owo_colors::OwoColorize;

/// Run price lists command
///
/// With supplier IDs given, one bulk item is sent per supplier.
pub async fn run(supplier_ids: &[i64], rules: bool, format: &str) -> Result<()> {
    let client = ErplyClient::new()?;
    let prices = client.prices();

    let price_lists: Vec<PriceList> = if supplier_ids.is_empty() {
        let filter = PriceListFilter {
            get_rules: Some(rules),
            ..PriceListFilter::default()
        };
        prices.get_supplier_price_lists(&filter).await?
    } else {
        let filters: Vec<PriceListFilter> = supplier_ids
            .iter()
            .map(|&id| PriceListFilter {
                supplier_id: Some(id),
                get_rules: Some(rules),
                ..PriceListFilter::default()
            })
            .collect();
        prices
            .get_supplier_price_lists_bulk(&filters, &Params::new())
            .await?
            .into_flat_records()
    };

    if format == "json" {
        return output::json(&price_lists);
    }

    output::header("Supplier Price Lists");

    if price_lists.is_empty() {
        println!("  {}", "No price lists found".yellow());
        println!();
        return Ok(());
    }

    for list in &price_lists {
        let active = if list.active == "1" {
            "active".green().to_string()
        } else {
            "inactive".dimmed().to_string()
        };
        println!(
            "  {:<6} {:<30} {:<24} {} .. {}  {}",
            list.id,
            list.name.bold(),
            output::or_dash(&list.supplier_name),
            output::or_dash(&list.valid_from),
            output::or_dash(&list.valid_to),
            active
        );

        if rules {
            for rule in &list.rules {
                println!(
                    "         product {:<10} {:>10.2} from {}",
                    rule.product_id, rule.price, rule.amount
                );
            }
        }
    }
    println!();

    Ok(())
}
