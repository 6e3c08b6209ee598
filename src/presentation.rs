//! View models for the yearly dashboard page.
//!
//! Amounts stay numeric and dates stay dates up to the last step; only the
//! labels meant to be read as-is (status, titles) are formatted here.

use crate::engine::YearSummary;
use crate::schema::{Transaction, TransactionStatus, TransactionType};
use crate::utils::format_date_fr;
use serde::{Deserialize, Serialize};

impl TransactionStatus {
    pub fn badge_class(&self) -> &'static str {
        match self {
            TransactionStatus::Draft => "bg-gray-100 text-gray-800",
            TransactionStatus::Waiting => "bg-yellow-100 text-yellow-800",
            TransactionStatus::Done => "bg-green-100 text-green-800",
        }
    }
}

impl TransactionType {
    /// Heroicons outline icon shown next to the transaction.
    pub fn icon(&self) -> &'static str {
        match self {
            TransactionType::Ecole => "academic-cap",
            TransactionType::Developpement => "terminal",
            TransactionType::Formation => "presentation-chart-bar",
            TransactionType::Cotisation | TransactionType::Subvention => "library",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub reference: String,
    pub title: String,
    pub status: TransactionStatus,
    pub status_label: String,
    pub total: f64,
    pub prix: String,
    pub kind: TransactionType,
}

impl TransactionRow {
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            reference: transaction.reference.clone(),
            title: format!(
                "{} - {} ({})",
                transaction.client, transaction.mission, transaction.reference
            ),
            status: transaction.status(),
            status_label: status_label(transaction),
            total: transaction.total,
            prix: transaction.prix.clone(),
            kind: transaction.kind,
        }
    }

    pub fn is_income(&self) -> bool {
        self.total > 0.0
    }

    /// Every word of `query` must appear in the row's text, ignoring case and
    /// accents. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let total = self.total.to_string();
        let haystack = fold_accents(
            &[
                self.title.as_str(),
                self.status_label.as_str(),
                status_key(self.status),
                total.as_str(),
                self.prix.as_str(),
                self.kind.label(),
                self.reference.as_str(),
            ]
            .join(" ")
            .to_lowercase(),
        );

        fold_accents(&query.to_lowercase())
            .split(' ')
            .all(|word| haystack.contains(word))
    }
}

fn status_key(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Draft => "draft",
        TransactionStatus::Waiting => "waiting",
        TransactionStatus::Done => "done",
    }
}

pub fn status_label(transaction: &Transaction) -> String {
    match (transaction.date_paiement, transaction.date_facturation) {
        (Some(paid), _) => format!("Versé le {}", format_date_fr(Some(paid))),
        (None, Some(invoiced)) => {
            let verb = if transaction.total > 0.0 {
                "Facturé"
            } else {
                "Réglé"
            };
            format!("{} le {}", verb, format_date_fr(Some(invoiced)))
        }
        (None, None) => "À facturer".to_string(),
    }
}

/// Strips the diacritics found in French text.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
            'ç' => 'c',
            'Ç' => 'C',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'È' | 'É' | 'Ê' | 'Ë' => 'E',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
            'ý' | 'ÿ' => 'y',
            'Ý' | 'Ÿ' => 'Y',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub icon: String,
    pub title: String,
    pub amount: f64,
    /// Secondary figure under the main amount, when the card has one.
    pub amount_second: Option<f64>,
}

impl SummaryCard {
    fn new(icon: &str, title: &str, amount: f64, amount_second: Option<f64>) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            amount,
            amount_second,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterCard {
    pub quarter: u32,
    pub card: SummaryCard,
    pub selected: bool,
}

pub fn year_cards(summary: &YearSummary) -> Vec<SummaryCard> {
    vec![
        SummaryCard::new("💰", "CA projeté", summary.chiffres_affaires.projete, None),
        SummaryCard::new("💵", "CA réel", summary.chiffres_affaires.realise, None),
        SummaryCard::new("🤑", "Net projeté", summary.nets.projete, None),
        SummaryCard::new("🏦", "Net réel", summary.nets.realise, None),
    ]
}

pub fn quarter_cards(summary: &YearSummary, selected: Option<u32>) -> Vec<QuarterCard> {
    summary
        .quarters_details
        .iter()
        .map(|details| QuarterCard {
            quarter: details.quarter,
            card: SummaryCard::new(
                "💸",
                &details.label,
                details.amount_to_declare,
                Some(details.planned_cotisation),
            ),
            selected: selected == Some(details.quarter),
        })
        .collect()
}

/// Clicking the selected quarter clears the selection; any other selects it.
pub fn toggle_quarter(selected: Option<u32>, clicked: u32) -> Option<u32> {
    if selected == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearView {
    pub year: i32,
    /// Year cards, hidden while searching.
    pub cards: Option<Vec<SummaryCard>>,
    /// Quarter cards, hidden while searching.
    pub quarters: Option<Vec<QuarterCard>>,
    pub rows: Vec<TransactionRow>,
}

impl YearView {
    pub fn build(summary: &YearSummary, selected_quarter: Option<u32>, search_query: &str) -> Self {
        let source = selected_quarter
            .and_then(|q| summary.quarter(q))
            .map_or(&summary.transactions, |details| &details.transactions);

        let rows = source
            .iter()
            .map(TransactionRow::from_transaction)
            .filter(|row| row.matches(search_query))
            .collect();

        let searching = !search_query.is_empty();

        Self {
            year: summary.year,
            cards: (!searching).then(|| year_cards(summary)),
            quarters: (!searching).then(|| quarter_cards(summary, selected_quarter)),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::summarize;
    use chrono::NaiveDate;

    fn transaction(
        reference: &str,
        total: f64,
        date_facturation: Option<NaiveDate>,
        date_paiement: Option<NaiveDate>,
    ) -> Transaction {
        Transaction {
            reference: reference.to_string(),
            client: "Société Générale".to_string(),
            mission: "Refonte API".to_string(),
            total,
            prix: "10 jours".to_string(),
            kind: TransactionType::Developpement,
            date_facturation,
            date_paiement,
        }
    }

    #[test]
    fn test_status_labels() {
        let invoiced = NaiveDate::from_ymd_opt(2023, 3, 5);
        let paid = NaiveDate::from_ymd_opt(2023, 4, 12);

        assert_eq!(
            status_label(&transaction("a", 100.0, invoiced, paid)),
            "Versé le 12 Avril 2023"
        );
        assert_eq!(
            status_label(&transaction("b", 100.0, invoiced, None)),
            "Facturé le 05 Mars 2023"
        );
        assert_eq!(
            status_label(&transaction("c", -100.0, invoiced, None)),
            "Réglé le 05 Mars 2023"
        );
        assert_eq!(status_label(&transaction("d", 100.0, None, None)), "À facturer");
    }

    #[test]
    fn test_row_title_and_badge() {
        let row = TransactionRow::from_transaction(&transaction("F-12", 100.0, None, None));
        assert_eq!(row.title, "Société Générale - Refonte API (F-12)");
        assert_eq!(row.status, TransactionStatus::Draft);
        assert_eq!(row.status.badge_class(), "bg-gray-100 text-gray-800");
        assert_eq!(row.kind.icon(), "terminal");
        assert!(row.is_income());
    }

    #[test]
    fn test_search_ignores_case_and_accents() {
        let row = TransactionRow::from_transaction(&transaction("F-12", 1500.0, None, None));

        assert!(row.matches(""));
        assert!(row.matches("societe"));
        assert!(row.matches("SOCIÉTÉ api"));
        assert!(row.matches("developpement 1500"));
        assert!(row.matches("a facturer"));
        assert!(!row.matches("societe formation"));
    }

    #[test]
    fn test_toggle_quarter() {
        assert_eq!(toggle_quarter(None, 2), Some(2));
        assert_eq!(toggle_quarter(Some(2), 2), None);
        assert_eq!(toggle_quarter(Some(1), 3), Some(3));
    }

    #[test]
    fn test_year_view() {
        let paid_q1 = transaction(
            "paid",
            1000.0,
            NaiveDate::from_ymd_opt(2023, 1, 5),
            NaiveDate::from_ymd_opt(2023, 2, 5),
        );
        let waiting = transaction("waiting", 400.0, NaiveDate::from_ymd_opt(2023, 6, 1), None);
        let summary = summarize(vec![waiting, paid_q1], 2023, 2025).unwrap();

        let view = YearView::build(&summary, None, "");
        assert_eq!(view.rows.len(), 2);
        let cards = view.cards.unwrap();
        assert_eq!(cards[0].title, "CA projeté");
        assert_eq!(cards[0].amount, 1400.0);
        let quarters = view.quarters.unwrap();
        assert_eq!(quarters.len(), 4);
        assert_eq!(quarters[0].card.amount_second, Some(-224.0));
        assert!(!quarters[0].selected);

        let view = YearView::build(&summary, Some(1), "");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].reference, "paid");
        assert!(view.quarters.unwrap()[0].selected);

        let view = YearView::build(&summary, None, "facture");
        assert!(view.cards.is_none());
        assert!(view.quarters.is_none());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].reference, "waiting");
    }
}
