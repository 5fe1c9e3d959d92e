// Plain-text output for the CLI commands
use chrono::NaiveDateTime;
use shelflife_core::{Config, Expiry, ExpiryStatus, ListRow, Product, ProductStats};
use std::path::Path;
use termimad::crossterm::style::{Color, Stylize};
use termimad::MadSkin;

const BAR_WIDTH: usize = 30;

fn status_color(status: ExpiryStatus) -> Color {
    match status {
        ExpiryStatus::Expired => Color::Rgb { r: 239, g: 68, b: 68 },
        ExpiryStatus::ExpiringSoon => Color::Rgb { r: 245, g: 158, b: 11 },
        ExpiryStatus::Valid => Color::Rgb { r: 16, g: 185, b: 129 },
    }
}

pub fn status_badge(expiry: &Expiry) -> String {
    expiry
        .status_text()
        .with(status_color(expiry.status))
        .bold()
        .to_string()
}

pub fn overview(stats: &ProductStats) {
    println!("{}", "Overview".bold());
    println!();
    println!(
        "  {} {:>4}   Action needed",
        format!("{:<14}", "Expired").with(status_color(ExpiryStatus::Expired)),
        stats.expired
    );
    println!(
        "  {} {:>4}   Next 30 days",
        format!("{:<14}", "Soon").with(status_color(ExpiryStatus::ExpiringSoon)),
        stats.expiring_soon
    );
    println!(
        "  {} {:>4}   Items in good condition",
        format!("{:<14}", "Good to go").with(status_color(ExpiryStatus::Valid)),
        stats.valid
    );
    println!();

    let chart = stats.chart_data();
    if chart.is_empty() {
        println!("  No data available");
        return;
    }

    println!("{}", "Inventory Status".bold());
    for slice in chart {
        // Non-empty buckets always get at least one block
        let width = (slice.value * BAR_WIDTH / stats.total.max(1)).max(1);
        println!(
            "  {:<14} {} {}",
            slice.label,
            "█".repeat(width).with(status_color(slice.status)),
            slice.value
        );
    }
}

pub fn product_rows(rows: &[ListRow]) {
    if rows.is_empty() {
        println!("No items found.");
        return;
    }

    for row in rows {
        let product = &row.product;
        println!(
            "{}  {}",
            product.name.as_str().bold(),
            status_badge(&row.expiry)
        );
        println!(
            "    {} • {} • expires {}",
            product.category, product.location, product.expiry_date
        );
        println!("    id: {}", product.id.as_str().dark_grey());
    }
}

pub fn added(product: &Product, now: NaiveDateTime) {
    println!(
        "Added {} ({}) - {}",
        product.name,
        product.id,
        status_badge(&product.expiry(now))
    );
}

pub fn advice(markdown: &str) {
    println!();
    MadSkin::default().print_text(markdown);
}

pub fn config(config: &Config, path: &Path) -> anyhow::Result<()> {
    let db_path = config.storage.resolved_db_path()?;
    let api_key = match config.advice.api_key() {
        Some(key) => mask(key),
        None => "(not set)".to_string(),
    };

    println!("config file: {}", path.display());
    println!("database:    {}", db_path.display());
    println!("api url:     {}", config.advice.api_url);
    println!("model:       {}", config.advice.model);
    println!("timeout:     {}s", config.advice.timeout_secs);
    println!("api key:     {}", api_key);
    Ok(())
}

/// Show just enough of the key to tell which one it is
fn mask(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "****".to_string();
    }

    let tail: String = key.chars().skip(count - 4).collect();
    format!("****{}", tail)
}
