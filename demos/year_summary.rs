use dotenv::dotenv;
use freelance_dashboard::{
    current_year, format_amount, years_to_fetch, AirtableClient, Dashboard, StoreConfig, YearView,
};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let year = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<i32>()?,
        None => current_year(),
    };

    println!("📅 Available years: {:?}\n", years_to_fetch(current_year()));

    let client = AirtableClient::new(StoreConfig::from_env()?)?;
    let dashboard = Dashboard::new(client);

    println!("☁️  Fetching transactions from Airtable...");
    let summary = dashboard.summarize_year(year).await?;
    let view = YearView::build(&summary, None, "");

    println!("\n📊 Année {}", view.year);
    for card in view.cards.iter().flatten() {
        println!("  {} {:<12} {:>14}", card.icon, card.title, format_amount(card.amount));
    }

    println!("\n🗓️  Trimestres");
    for quarter in view.quarters.iter().flatten() {
        println!(
            "  {} {:<15} {:>12}  cotisation {:>10}",
            quarter.card.icon,
            quarter.card.title,
            format_amount(quarter.card.amount),
            format_amount(quarter.card.amount_second.unwrap_or_default())
        );
    }

    println!("\n🧾 Transactions ({})", view.rows.len());
    for row in &view.rows {
        println!(
            "  [{:<7}] {:<50} {:>12}  {}",
            format!("{:?}", row.status).to_lowercase(),
            row.title,
            format_amount(row.total),
            row.status_label
        );
    }

    Ok(())
}
