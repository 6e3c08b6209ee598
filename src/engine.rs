use crate::error::Result;
use crate::fetcher::TransactionFetcher;
use crate::schema::Transaction;
use crate::store::{RecordStore, SelectOptions};
use crate::utils::{current_year, is_in_range, quarter_date_range};
use chrono::Datelike;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Social contribution rate on declared revenue, in percent.
pub const COTISATION_RATE: f64 = 22.2;

/// Professional training contribution rate on declared revenue, in percent.
pub const FORMATION_PRO_RATE: f64 = 0.2;

pub const QUARTER_LABELS: [&str; 4] = [
    "1er trimestre",
    "2ème trimestre",
    "3ème trimestre",
    "4ème trimestre",
];

/// Rounds half-way values toward positive infinity, like `Math.round`.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Contribution owed on `amount_to_declare`.
///
/// The two rates are separate line items on the declaration, each rounded
/// to the euro on its own before being added.
pub fn calc_cotisation(amount_to_declare: f64) -> f64 {
    round_half_up(amount_to_declare * COTISATION_RATE / 100.0)
        + round_half_up(amount_to_declare * FORMATION_PRO_RATE / 100.0)
}

/// The contribution as an outflow: negated, except that nothing owed stays `0`
/// rather than `-0`.
pub fn planned_cotisation(amount_to_declare: f64) -> f64 {
    let cotisation = calc_cotisation(amount_to_declare);
    if cotisation == 0.0 {
        0.0
    } else {
        -cotisation
    }
}

/// Whether a transaction counts as declarable revenue: a positive amount in a
/// revenue category.
pub fn is_versement(transaction: &Transaction) -> bool {
    transaction.kind.is_revenue_category() && transaction.total > 0.0
}

pub fn sum_totals<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    // fold from +0.0: an empty `sum()` of floats yields -0.0
    transactions.into_iter().fold(0.0, |acc, t| acc + t.total)
}

/// Fiscal year membership: the payment year, else the invoicing year. A
/// transaction with neither date only ever shows up in the current year.
pub fn belongs_to_year(transaction: &Transaction, year: i32, current_year: i32) -> bool {
    match (transaction.date_paiement, transaction.date_facturation) {
        (Some(paid), _) => paid.year() == year,
        (None, Some(invoiced)) => invoiced.year() == year,
        (None, None) => year == current_year,
    }
}

pub fn quarter_label(quarter: u32) -> Option<&'static str> {
    quarter
        .checked_sub(1)
        .and_then(|idx| QUARTER_LABELS.get(idx as usize))
        .copied()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuarterDetails {
    pub quarter: u32,

    pub label: String,

    #[schemars(description = "Revenue transactions paid during the quarter")]
    pub transactions: Vec<Transaction>,

    #[schemars(description = "Sum of the quarter's revenue, to be declared")]
    pub amount_to_declare: f64,

    #[schemars(
        description = "Estimated contribution for the quarter, negative as it is an outflow (0 when nothing is owed)"
    )]
    pub planned_cotisation: f64,
}

/// Builds the declaration bucket of one quarter.
///
/// Only revenue transactions whose payment date falls in the quarter window
/// are kept; unpaid work is never declared.
pub fn quarter_details(
    transactions: &[Transaction],
    quarter: u32,
    year: i32,
) -> Result<QuarterDetails> {
    let (start, end) = quarter_date_range(quarter, year)?;

    let quarter_transactions: Vec<Transaction> = transactions
        .iter()
        .filter(|t| is_versement(t) && is_in_range(t.date_paiement, start, end))
        .cloned()
        .collect();

    let amount_to_declare = sum_totals(&quarter_transactions);
    let label = quarter_label(quarter).unwrap_or_default().to_string();

    debug!(
        "{} {}: {} transaction(s), {} to declare",
        label,
        year,
        quarter_transactions.len(),
        amount_to_declare
    );

    Ok(QuarterDetails {
        quarter,
        label,
        transactions: quarter_transactions,
        amount_to_declare,
        planned_cotisation: planned_cotisation(amount_to_declare),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Amounts {
    #[schemars(description = "Including invoiced and draft work not paid yet")]
    pub projete: f64,

    #[schemars(description = "Only what has actually been paid")]
    pub realise: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct YearSummary {
    pub year: i32,

    #[schemars(description = "Every transaction of the year, drafts first, then waiting, then paid")]
    pub transactions: Vec<Transaction>,

    #[schemars(description = "The four quarters, in order")]
    pub quarters_details: Vec<QuarterDetails>,

    #[schemars(description = "Revenue (chiffre d'affaires)")]
    pub chiffres_affaires: Amounts,

    #[schemars(description = "Net amounts after contributions")]
    pub nets: Amounts,
}

impl YearSummary {
    pub fn quarter(&self, quarter: u32) -> Option<&QuarterDetails> {
        self.quarters_details.iter().find(|q| q.quarter == quarter)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(YearSummary)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Aggregates already-fetched transactions into the summary of `year`.
///
/// `current_year` decides where transactions with no date at all go.
pub fn summarize(
    transactions: Vec<Transaction>,
    year: i32,
    current_year: i32,
) -> Result<YearSummary> {
    let transactions: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| belongs_to_year(t, year, current_year))
        .collect();

    let versements: Vec<Transaction> = transactions
        .iter()
        .filter(|t| is_versement(t))
        .cloned()
        .collect();

    let quarters_details = (1..=4)
        .map(|quarter| quarter_details(&versements, quarter, year))
        .collect::<Result<Vec<_>>>()?;

    let chiffre_affaires_projete = sum_totals(&versements);
    let chiffres_affaires = Amounts {
        projete: chiffre_affaires_projete,
        realise: sum_totals(versements.iter().filter(|t| t.is_paid())),
    };

    let nets = Amounts {
        projete: chiffre_affaires_projete - calc_cotisation(chiffre_affaires_projete),
        realise: sum_totals(transactions.iter().filter(|t| t.is_paid())),
    };

    info!(
        "Summarized {}: {} transaction(s), CA projeté {}, CA réel {}",
        year,
        transactions.len(),
        chiffres_affaires.projete,
        chiffres_affaires.realise
    );

    Ok(YearSummary {
        year,
        transactions,
        quarters_details,
        chiffres_affaires,
        nets,
    })
}

/// Fetches from a record store and summarizes on demand. Nothing is cached:
/// every call re-reads the store.
pub struct Dashboard<S> {
    fetcher: TransactionFetcher<S>,
    options: SelectOptions,
}

impl<S: RecordStore> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            fetcher: TransactionFetcher::new(store),
            options: SelectOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SelectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetcher(&self) -> &TransactionFetcher<S> {
        &self.fetcher
    }

    pub async fn summarize_year(&self, year: i32) -> Result<YearSummary> {
        self.summarize_year_at(year, current_year()).await
    }

    pub async fn summarize_current_year(&self) -> Result<YearSummary> {
        let year = current_year();
        self.summarize_year_at(year, year).await
    }

    /// Same as [`Dashboard::summarize_year`] with an explicit current year.
    pub async fn summarize_year_at(&self, year: i32, current_year: i32) -> Result<YearSummary> {
        let transactions = self.fetcher.fetch_transactions(&self.options).await?;
        summarize(transactions, year, current_year)
    }
}
