use freelance_dashboard::{
    format_amount, Dashboard, InMemoryStore, RecordFields, StoreRecord, YearView,
};

fn record(
    reference: &str,
    client: &str,
    total: f64,
    kind: &str,
    date_facturation: Option<&str>,
    date_paiement: Option<&str>,
) -> StoreRecord {
    StoreRecord {
        id: format!("rec{}", reference),
        fields: RecordFields {
            reference: Some(reference.to_string()),
            client: Some(client.to_string()),
            mission: Some("Mission".to_string()),
            total: Some(total),
            kind: Some(kind.to_string()),
            prix: None,
            date_facturation: date_facturation.map(String::from),
            date_paiement: date_paiement.map(String::from),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("📊 Offline dashboard demo\n");

    let store = InMemoryStore::new(vec![
        record("F-03", "Acme", 2400.0, "Développement", Some("2023-05-02"), Some("2023-06-01")),
        record("F-02", "École 42", 900.0, "École", Some("2023-02-01"), Some("2023-03-15")),
        record("AV-01", "Acme", -150.0, "Développement", Some("2023-02-10"), Some("2023-02-20")),
        record("F-04", "Initech", 1200.0, "Formation", Some("2023-06-20"), None),
    ])
    .with_page_size(2);

    let dashboard = Dashboard::new(store);
    let summary = dashboard.summarize_year_at(2023, 2023).await?;

    for quarter in &summary.quarters_details {
        println!(
            "  {:<15} à déclarer {:>10}  cotisation {:>8}",
            quarter.label,
            format_amount(quarter.amount_to_declare),
            format_amount(quarter.planned_cotisation)
        );
    }

    println!(
        "\n  CA projeté {} / réel {}",
        format_amount(summary.chiffres_affaires.projete),
        format_amount(summary.chiffres_affaires.realise)
    );
    println!(
        "  Net projeté {} / réel {}",
        format_amount(summary.nets.projete),
        format_amount(summary.nets.realise)
    );

    let view = YearView::build(&summary, None, "acme");
    println!("\n🔎 'acme': {} transaction(s)", view.rows.len());
    for row in &view.rows {
        println!("  {} → {}", row.title, row.status_label);
    }

    println!("\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
