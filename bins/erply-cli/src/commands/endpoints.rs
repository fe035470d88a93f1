//! Endpoints command - show service discovery results

use crate::output;
use anyhow::Result;
use erply_api_client::ErplyClient;
use owo_colors::OwoColorize;

/// Run endpoints command
pub async fn run(format: &str) -> Result<()> {
    let client = ErplyClient::new()?;
    let endpoints = client.service_discovery().get_service_endpoints().await?;

    if format == "json" {
        return output::json(&endpoints);
    }

    output::header("Service Endpoints");

    let Some(endpoints) = endpoints else {
        println!("  {}", "No endpoints returned for this account".yellow());
        return Ok(());
    };

    for (name, endpoint) in endpoints.entries() {
        println!("  {:<12} {}", name.bold(), output::or_dash(&endpoint.url));
        if !endpoint.documentation.is_empty() {
            println!("  {:<12} {}", "", endpoint.documentation.dimmed());
        }
    }
    println!();

    Ok(())
}
