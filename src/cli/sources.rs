//! Config inspection commands.

use std::path::Path;

use console::style;

use eventscout::config::browser::BrowserConfig;
use eventscout::pipeline::format_reference_links;
use eventscout::scrapers::browser::find_chrome;
use eventscout::{Credentials, EventConfig, ScrapeStrategy};

use super::icons::{bullet, dim_arrow, skipped, success, warn};

/// Print the reference link footer.
pub fn cmd_references(config: &EventConfig) -> anyhow::Result<()> {
    if config.reference_links.is_empty() {
        println!("{} No reference links configured", warn());
        return Ok(());
    }
    println!("{}", format_reference_links(&config.reference_links).trim_start());
    Ok(())
}

/// List sources, search topics and credential status.
pub fn cmd_sources(config: &EventConfig, path: &Path) -> anyhow::Result<()> {
    println!("{} {}", style("Config:").bold(), path.display());

    println!("\n{}", style("Sources").bold());
    println!("{}", "-".repeat(50));
    if config.sources.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for source in &config.sources {
        let strategy = match source.strategy() {
            ScrapeStrategy::Static => "static".to_string(),
            ScrapeStrategy::Dynamic { wait_time } => {
                format!("dynamic, settle {:.1}s", wait_time.as_secs_f64())
            }
        };
        println!(
            "  {:>3} {} {}",
            source.priority,
            style(&source.name).cyan(),
            style(format!("({})", strategy)).dim()
        );
        println!("      {} {}", dim_arrow(), source.url);
    }

    let credentials = Credentials::from_env();
    let browser = config.browser.clone().with_env_overrides();

    println!("\n{}", style("Tiers").bold());
    println!("{}", "-".repeat(50));
    println!(
        "  {:<20} {}",
        "browser",
        availability(browser_available(&browser))
    );
    println!(
        "  {:<20} {}",
        "google search",
        availability(credentials.google().is_some())
    );
    for topic in &config.search.queries {
        println!("      {} {}", bullet(), topic);
    }
    println!(
        "  {:<20} {}",
        "perplexity",
        availability(credentials.perplexity().is_some())
    );
    println!(
        "  {:<20} {} links",
        "reference",
        config.reference_links.len()
    );

    Ok(())
}

fn browser_available(config: &BrowserConfig) -> bool {
    cfg!(feature = "browser") && (config.remote_url.is_some() || find_chrome(config).is_some())
}

fn availability(available: bool) -> String {
    if available {
        format!("{} available", success())
    } else {
        format!("{} not configured", skipped())
    }
}
