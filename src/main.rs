//! iap-sweep - Worldwide App Store in-app-purchase price sweep CLI
//!
//! Checks every App Store storefront for one in-app purchase and ranks the
//! localized prices against a home currency.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::console::style;
use iap_sweep::appstore::{Region, StorefrontClient, StorefrontFetch};
use iap_sweep::config::Config;
use iap_sweep::matching::MatchTarget;
use iap_sweep::normalize::normalize;
use iap_sweep::prompt;
use iap_sweep::rates::{RateClient, RateSource};
use iap_sweep::report::write_report;
use iap_sweep::sweep::{sweep_with_fallback, SweepOutcome};
use iap_sweep::PriceRecord;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "iap-sweep",
    version,
    about = "Worldwide App Store in-app-purchase price sweep",
    long_about = "Sweeps all App Store storefronts for one in-app purchase, converts the \
                  localized prices into your home currency, and writes a ranked pricing.json."
)]
struct Cli {
    /// App Store link or app id (prompted for when omitted)
    app: Option<String>,

    /// Home region storefront code (e.g. US, GB)
    #[arg(short, long)]
    region: Option<String>,

    /// Home currency as a 3-letter code (e.g. USD)
    #[arg(short, long)]
    currency: Option<String>,

    /// Fallback keywords, used when the exact sweep finds nothing
    #[arg(short, long, value_delimiter = ',')]
    keywords: Option<Vec<String>>,

    /// Where to write the pricing report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Delay between storefront requests in milliseconds
    #[arg(long, env = "IAP_DELAY")]
    delay: Option<u64>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip confirmations (scripted use)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported storefront regions
    Regions,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }

    if let Some(Commands::Regions) = &cli.command {
        print_regions();
        return Ok(ExitCode::SUCCESS);
    }

    run(cli, config).await
}

async fn run(cli: Cli, config: Config) -> Result<ExitCode> {
    let (app_id, home) = gather_details(&cli)?;

    let client = StorefrontClient::new(&config).context("Failed to create storefront client")?;

    // The home-region snapshot drives purchase selection; absence here is fatal.
    let snapshot = match client.product_snapshot(&app_id, home).await {
        Ok(snapshot) => snapshot.filter(|s| !s.is_empty()),
        Err(e) => {
            warn!("Home region fetch failed: {:#}", e);
            None
        }
    };

    let Some(snapshot) = snapshot else {
        eprintln!(
            "{}",
            style(
                "It looks like this app offers no in-app purchases \
                 or is not available in your home region."
            )
            .red()
        );
        return Ok(ExitCode::FAILURE);
    };

    let purchase = if snapshot.purchases.len() == 1 || cli.yes {
        info!("Using purchase '{}'", snapshot.purchases[0].display_name);
        &snapshot.purchases[0]
    } else {
        prompt::select_purchase(&snapshot.purchases)?
    };

    println!(
        "{}",
        style("Starting worldwide pricing check for the selected purchase...\n").yellow()
    );

    let outcome = sweep_with_fallback(
        &client,
        &app_id,
        home,
        MatchTarget::exact(purchase),
        config.sweep_pause_ms,
        || fallback_keywords(&cli),
    )
    .await?;

    // Nothing has been written yet, so both terminal outcomes exit clean.
    let mut records = match outcome {
        SweepOutcome::Matched { mode, records } => {
            info!("Sweep matched in {} mode", mode);
            records
        }
        SweepOutcome::FallbackDeclined => {
            eprintln!("{}", style("No storefront offered the selected purchase.").red());
            return Ok(ExitCode::FAILURE);
        }
        SweepOutcome::NoKeywordMatches => {
            eprintln!(
                "{}",
                style("No purchases matched your keywords in any storefront.").red()
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "\n{}",
        style(format!("All regions checked ({} successful matches).", records.len())).green()
    );

    let currency = home_currency(&cli)?;

    let rate_client = RateClient::new().context("Failed to create rate client")?;
    let rates = match rate_client.latest(&currency).await {
        Ok(rates) => rates,
        Err(e) => {
            warn!("Rate fetch failed: {:#}", e);
            None
        }
    };

    let Some(rates) = rates else {
        // Recoverable degradation: persist the raw sweep, flag partial success.
        write_report(&config.output, &records, None)?;
        eprintln!(
            "{}",
            style("Could not retrieve conversion rates; check the currency code.").red()
        );
        println!(
            "{}",
            style(format!(
                "Pricing data saved to {} without conversion rates.",
                config.output.display()
            ))
            .yellow()
        );
        return Ok(ExitCode::FAILURE);
    };

    normalize(&mut records, &rates);
    write_report(&config.output, &records, Some(&currency))?;

    println!(
        "{}",
        style(format!(
            "Conversion rates applied. Pricing data saved to {}.",
            config.output.display()
        ))
        .green()
    );

    if !cli.yes && prompt::confirm("Would you like to preview the pricing data?")? {
        print_preview(&purchase.display_name, &records, &currency);
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolves the app id and home region from flags, prompting for what is
/// missing and re-prompting until the operator confirms the details.
fn gather_details(cli: &Cli) -> Result<(String, &'static Region)> {
    loop {
        let app_id = match &cli.app {
            Some(raw) => prompt::parse_app_id(raw)
                .with_context(|| format!("'{}' is not an App Store URL or app id", raw))?,
            None => prompt::app_id()?,
        };

        let home: &'static Region = match &cli.region {
            Some(code) => Region::parse(code)?,
            None => prompt::home_region()?,
        };

        println!("\nApp id: {}  Home region: {}\n", style(&app_id).yellow(), style(home).yellow());

        // Nothing to re-ask when everything came from flags.
        let from_flags = cli.app.is_some() && cli.region.is_some();
        if from_flags || cli.yes || prompt::confirm("Are these details correct?")? {
            return Ok((app_id, home));
        }
    }
}

/// Returns the fallback keywords, or None when fallback was declined.
fn fallback_keywords(cli: &Cli) -> Result<Option<Vec<String>>> {
    if let Some(keywords) = &cli.keywords {
        let cleaned = prompt::parse_keywords(&keywords.join(","));
        if !cleaned.is_empty() {
            return Ok(Some(cleaned));
        }
    }

    if cli.yes {
        // Scripted runs cannot be prompted; no keywords means no fallback.
        return Ok(None);
    }

    if !prompt::confirm("No regions matched the selected purchase. Search by keywords instead?")? {
        return Ok(None);
    }

    Ok(Some(prompt::keywords()?))
}

fn home_currency(cli: &Cli) -> Result<String> {
    match &cli.currency {
        Some(code) => {
            let code = code.trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("'{}' is not a 3-letter currency code", code);
            }
            Ok(code.to_uppercase())
        }
        None => prompt::home_currency(),
    }
}

fn print_preview(purchase_name: &str, records: &[PriceRecord], currency: &str) {
    println!("\n{}", style(format!("-------- {} --------\n", purchase_name)).yellow());

    for record in records {
        let converted = match record.home_price {
            Some(value) => style(format!("{:.2} {}", value, currency)).green().to_string(),
            None => style("no rate available").red().to_string(),
        };
        println!("{}: {} {} → {}", record.region, record.price, record.currency, converted);
    }
}

fn print_regions() {
    println!("Supported App Store regions:\n");
    println!("{:<6} {:<30}", "Code", "Name");
    println!("{:-<6} {:-<30}", "", "");

    for region in Region::all() {
        println!("{:<6} {:<30}", region.code, region.name);
    }
}
