//! Search and digest commands.

use std::sync::Arc;

use console::style;

use eventscout::discovery::{SearchReport, Tier};
use eventscout::{Credentials, EventConfig, EventSearchClient};

use super::icons::{bullet, dim_arrow, error, skipped, success, warn};

const TIERS: [Tier; 4] = [
    Tier::Scrape,
    Tier::StructuredSearch,
    Tier::GenerativeSearch,
    Tier::Reference,
];

fn build_client(config: Arc<EventConfig>) -> anyhow::Result<EventSearchClient> {
    let credentials = Credentials::from_env();
    Ok(EventSearchClient::new(config, &credentials)?)
}

/// Run discovery and print the candidates.
pub async fn cmd_search(
    config: Arc<EventConfig>,
    json: bool,
    show_report: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let report = client.search_events_with_report().await;

    if show_report {
        print_report(&report);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report.candidates)?);
        return Ok(());
    }

    if report.candidates.is_empty() {
        println!("{} No events found", warn());
        return Ok(());
    }

    println!(
        "\n{} ({})",
        style("Candidates").bold(),
        report.candidates.len()
    );
    for candidate in &report.candidates {
        println!("  {} {}", bullet(), style(&candidate.title).cyan());
        if !candidate.snippet.is_empty() {
            let first_line = candidate.snippet.lines().next().unwrap_or_default();
            println!("      {}", style(first_line).dim());
        }
        if !candidate.link.is_empty() {
            println!("      {} {}", dim_arrow(), candidate.link);
        }
        println!("      {}", style(&candidate.source).dim());
    }

    Ok(())
}

fn print_report(report: &SearchReport) {
    println!("\n{}", style("Discovery Report").bold());
    println!("{}", "-".repeat(50));

    for tier in TIERS {
        if report.skipped.contains(&tier) {
            println!("  {:<20} {}", tier, style("not configured").dim());
            continue;
        }
        let mut outcomes = report.tier_outcomes(tier).peekable();
        if outcomes.peek().is_none() {
            println!("  {:<20} {}", tier, style("not needed").dim());
            continue;
        }
        println!("  {:<20} {} items", tier, report.tier_count(tier));
        for outcome in outcomes {
            match &outcome.result {
                Ok(items) if items.is_empty() => {
                    println!("    {} {} {}", skipped(), outcome.unit, style("(0)").dim())
                }
                Ok(items) => println!(
                    "    {} {} {}",
                    success(),
                    outcome.unit,
                    style(format!("({})", items.len())).dim()
                ),
                Err(e) => println!(
                    "    {} {} {}",
                    error(),
                    outcome.unit,
                    style(e.to_string()).red()
                ),
            }
        }
    }
}

/// Run discovery, then shape the candidates into notification events.
pub async fn cmd_digest(config: Arc<EventConfig>, max: usize, json: bool) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let candidates = client.search_events().await;
    let digest = client.resolve_events(None, candidates, max).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
        return Ok(());
    }

    println!(
        "\n{} {}",
        style("Weekend Events").bold(),
        style(format!("({})", digest.origin.as_str())).dim()
    );

    if digest.events.is_empty() {
        println!("{} No events found", warn());
    }
    for event in &digest.events {
        println!(
            "  {} {} {}",
            bullet(),
            style(&event.date).yellow(),
            style(&event.title).cyan()
        );
        println!(
            "      {} / {}",
            event.location,
            style(&event.target_audience).dim()
        );
        if !event.description.is_empty() {
            println!("      {}", event.description);
        }
        if !event.url.is_empty() {
            println!("      {} {}", dim_arrow(), event.url);
        }
    }

    if !digest.footer.is_empty() {
        println!("{}", digest.footer);
    }

    Ok(())
}
