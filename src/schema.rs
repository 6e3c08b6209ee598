use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a transaction.
///
/// Serialized with a stable key; the French label is what the record store
/// holds and what the dashboard displays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub enum TransactionType {
    #[serde(rename = "ecole")]
    #[schemars(description = "Teaching work for schools")]
    Ecole,

    #[serde(rename = "dev")]
    #[schemars(description = "Software development missions")]
    Developpement,

    #[serde(rename = "formation")]
    #[schemars(description = "Training sessions")]
    Formation,

    #[serde(rename = "cotisation")]
    #[schemars(description = "Membership or social contribution movements, never counted as revenue")]
    Cotisation,

    #[serde(rename = "subvention")]
    #[schemars(description = "Subsidies received, never counted as revenue")]
    Subvention,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        TransactionType::Ecole,
        TransactionType::Developpement,
        TransactionType::Formation,
        TransactionType::Cotisation,
        TransactionType::Subvention,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TransactionType::Ecole => "ecole",
            TransactionType::Developpement => "dev",
            TransactionType::Formation => "formation",
            TransactionType::Cotisation => "cotisation",
            TransactionType::Subvention => "subvention",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Ecole => "École",
            TransactionType::Developpement => "Développement",
            TransactionType::Formation => "Formation",
            TransactionType::Cotisation => "Cotisation",
            TransactionType::Subvention => "Subvention",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Whether this category can ever count as declarable revenue.
    pub fn is_revenue_category(&self) -> bool {
        !matches!(self, TransactionType::Cotisation | TransactionType::Subvention)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    /// Accepts either the French label or the stable key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_label(s)
            .or_else(|| Self::ALL.into_iter().find(|t| t.key() == s))
            .ok_or_else(|| format!("Unknown transaction type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Not invoiced yet.
    Draft,
    /// Invoiced, waiting for payment.
    Waiting,
    /// Paid.
    Done,
}

pub fn derive_status(
    date_facturation: Option<NaiveDate>,
    date_paiement: Option<NaiveDate>,
) -> TransactionStatus {
    match (date_facturation, date_paiement) {
        (_, Some(_)) => TransactionStatus::Done,
        (Some(_), None) => TransactionStatus::Waiting,
        (None, None) => TransactionStatus::Draft,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    #[serde(rename = "ref")]
    #[schemars(description = "Unique reference of the transaction in the record store")]
    pub reference: String,

    pub client: String,

    #[schemars(description = "Project or engagement label")]
    pub mission: String,

    #[schemars(
        description = "Signed amount in euros. Positive is income, negative is a credit or refund."
    )]
    pub total: f64,

    #[schemars(description = "Display-only price annotation, e.g. '5 jours x 500 €'")]
    pub prix: String,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub date_facturation: Option<NaiveDate>,

    pub date_paiement: Option<NaiveDate>,
}

impl Transaction {
    pub fn status(&self) -> TransactionStatus {
        derive_status(self.date_facturation, self.date_paiement)
    }

    pub fn is_paid(&self) -> bool {
        self.date_paiement.is_some()
    }

    pub fn is_invoiced(&self) -> bool {
        self.date_facturation.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_derived_from_dates() {
        let d = NaiveDate::from_ymd_opt(2023, 5, 2);

        assert_eq!(derive_status(None, None), TransactionStatus::Draft);
        assert_eq!(derive_status(d, None), TransactionStatus::Waiting);
        assert_eq!(derive_status(d, d), TransactionStatus::Done);
        assert_eq!(derive_status(None, d), TransactionStatus::Done);
    }

    #[test]
    fn test_type_labels_and_keys() {
        for kind in TransactionType::ALL {
            assert_eq!(TransactionType::from_label(kind.label()), Some(kind));
            assert_eq!(kind.key().parse::<TransactionType>().unwrap(), kind);
        }

        assert_eq!(
            "Développement".parse::<TransactionType>().unwrap(),
            TransactionType::Developpement
        );
        assert!("Freelance".parse::<TransactionType>().is_err());
        assert_eq!(TransactionType::Ecole.to_string(), "École");
    }

    #[test]
    fn test_revenue_categories() {
        assert!(TransactionType::Developpement.is_revenue_category());
        assert!(TransactionType::Ecole.is_revenue_category());
        assert!(TransactionType::Formation.is_revenue_category());
        assert!(!TransactionType::Cotisation.is_revenue_category());
        assert!(!TransactionType::Subvention.is_revenue_category());
    }

    #[test]
    fn test_serialization_uses_stable_keys() {
        let transaction = Transaction {
            reference: "F-2023-004".to_string(),
            client: "Acme".to_string(),
            mission: "API".to_string(),
            total: 1500.0,
            prix: "3 jours".to_string(),
            kind: TransactionType::Developpement,
            date_facturation: NaiveDate::from_ymd_opt(2023, 2, 1),
            date_paiement: None,
        };

        let json = serde_json::to_value(&transaction).unwrap();
        assert_eq!(json["ref"], "F-2023-004");
        assert_eq!(json["type"], "dev");
        assert_eq!(json["date_facturation"], "2023-02-01");
        assert!(json["date_paiement"].is_null());

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, transaction);
    }
}
