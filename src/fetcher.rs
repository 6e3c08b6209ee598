use crate::error::{DashboardError, Result};
use crate::schema::{Transaction, TransactionType};
use crate::store::{RecordStore, SelectOptions, StoreRecord};
use crate::utils::parse_store_date;
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Reads every transaction from a record store and orders them for display:
/// drafts first, then invoices waiting for payment, then paid invoices.
pub struct TransactionFetcher<S> {
    store: S,
}

impl<S: RecordStore> TransactionFetcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches all pages matching `options` and returns the partitioned
    /// transactions. Any page failure or malformed record aborts the fetch.
    pub async fn fetch_transactions(&self, options: &SelectOptions) -> Result<Vec<Transaction>> {
        let mut transactions = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.store.list_page(options, offset.as_deref()).await?;
            pages += 1;
            debug!(
                "Fetched page {} with {} records (more: {})",
                pages,
                page.records.len(),
                page.offset.is_some()
            );

            for record in &page.records {
                transactions.push(normalize_record(record)?);
            }

            match page.offset {
                Some(next) if offset.as_deref() == Some(next.as_str()) => {
                    return Err(DashboardError::StoreError(format!(
                        "Record store returned the same offset '{}' twice",
                        next
                    )));
                }
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        info!(
            "Fetched {} transactions in {} page(s)",
            transactions.len(),
            pages
        );

        Ok(partition_by_status(transactions))
    }
}

/// Maps a raw store record onto a [`Transaction`].
///
/// Records with a missing reference, a missing total, an unknown type or an
/// unreadable date are rejected.
pub fn normalize_record(record: &StoreRecord) -> Result<Transaction> {
    let fields = &record.fields;
    let malformed = |details: String| DashboardError::MalformedRecord {
        record_id: record.id.clone(),
        details,
    };

    let reference = fields
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| malformed("missing 'Ref'".to_string()))?
        .to_string();

    let total = fields
        .total
        .filter(|t| t.is_finite())
        .ok_or_else(|| malformed(format!("missing or invalid 'Total' on {}", reference)))?;

    let raw_type = fields
        .kind
        .as_deref()
        .ok_or_else(|| malformed(format!("missing 'Type' on {}", reference)))?;
    let kind = raw_type
        .parse::<TransactionType>()
        .map_err(|e| malformed(format!("{} on {}", e, reference)))?;

    let parse_date = |raw: Option<&String>, field: &str| -> Result<Option<NaiveDate>> {
        match raw.map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(value) => parse_store_date(value)
                .map(Some)
                .map_err(|e| malformed(format!("'{}' on {}: {}", field, reference, e))),
            None => Ok(None),
        }
    };

    let date_facturation = parse_date(fields.date_facturation.as_ref(), "Date Facturation")?;
    let date_paiement = parse_date(fields.date_paiement.as_ref(), "Date Paiement")?;

    Ok(Transaction {
        reference,
        client: fields.client.clone().unwrap_or_default(),
        mission: fields.mission.clone().unwrap_or_default(),
        total,
        prix: fields.prix.clone().unwrap_or_default(),
        kind,
        date_facturation,
        date_paiement,
    })
}

/// Stable three-way partition: not invoiced, invoiced but unpaid, then
/// invoiced and paid. The store order is kept inside each group.
///
/// A paid transaction without an invoicing date belongs to no group and is
/// dropped.
pub fn partition_by_status(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut drafts = Vec::new();
    let mut waiting = Vec::new();
    let mut paid = Vec::new();

    for transaction in transactions {
        match (transaction.date_facturation, transaction.date_paiement) {
            (None, None) => drafts.push(transaction),
            (Some(_), None) => waiting.push(transaction),
            (Some(_), Some(_)) => paid.push(transaction),
            (None, Some(_)) => warn!(
                "Dropping transaction {}: paid but never invoiced",
                transaction.reference
            ),
        }
    }

    drafts.extend(waiting);
    drafts.extend(paid);
    drafts
}
