//! Seam between the fetcher and the external record store.
//!
//! The store is paginated: every call returns one page of raw records plus an
//! optional `offset` cursor pointing at the next page.

use crate::error::{DashboardError, Result};
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};

pub const FIELD_DATE_PAIEMENT: &str = "Date Paiement";
pub const FIELD_DATE_FACTURATION: &str = "Date Facturation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }
}

/// Query sent to the record store.
///
/// The default sorts by payment date then invoicing date, both descending.
/// Callers override individual fields with struct update syntax:
/// `SelectOptions { view: Some("2023".into()), ..Default::default() }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOptions {
    pub sort: Vec<SortField>,
    pub filter_by_formula: Option<String>,
    pub view: Option<String>,
    pub page_size: Option<u32>,
    pub max_records: Option<u32>,
    pub fields: Vec<String>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            sort: vec![
                SortField::desc(FIELD_DATE_PAIEMENT),
                SortField::desc(FIELD_DATE_FACTURATION),
            ],
            filter_by_formula: None,
            view: None,
            page_size: None,
            max_records: None,
            fields: Vec::new(),
        }
    }
}

impl SelectOptions {
    /// Flattens the options into Airtable list-records query parameters.
    pub fn to_query_pairs(&self, offset: Option<&str>) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (idx, sort) in self.sort.iter().enumerate() {
            pairs.push((format!("sort[{}][field]", idx), sort.field.clone()));
            pairs.push((
                format!("sort[{}][direction]", idx),
                sort.direction.as_str().to_string(),
            ));
        }
        if let Some(formula) = &self.filter_by_formula {
            pairs.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(view) = &self.view {
            pairs.push(("view".to_string(), view.clone()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(max_records) = self.max_records {
            pairs.push(("maxRecords".to_string(), max_records.to_string()));
        }
        for field in &self.fields {
            pairs.push(("fields[]".to_string(), field.clone()));
        }
        if let Some(offset) = offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }

        pairs
    }
}

/// Fields of a transaction row as the record store names them. Everything is
/// optional here; validation happens in the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "Date Paiement", default, skip_serializing_if = "Option::is_none")]
    pub date_paiement: Option<String>,

    #[serde(rename = "Date Facturation", default, skip_serializing_if = "Option::is_none")]
    pub date_facturation: Option<String>,

    #[serde(rename = "Mission", default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<String>,

    #[serde(rename = "Client", default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(rename = "Total", default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    #[serde(rename = "Ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "Prix", default, skip_serializing_if = "Option::is_none")]
    pub prix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    #[serde(default)]
    pub fields: RecordFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub records: Vec<StoreRecord>,
    #[serde(default)]
    pub offset: Option<String>,
}

pub trait RecordStore: Send + Sync {
    /// Fetches one page. `offset` is the cursor returned by the previous page,
    /// `None` for the first one.
    fn list_page<'a>(
        &'a self,
        options: &'a SelectOptions,
        offset: Option<&'a str>,
    ) -> BoxFuture<'a, Result<RecordPage>>;
}

/// A record store held in memory. It serves records in insertion order and
/// ignores sorting and formulas.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    records: Vec<StoreRecord>,
    page_size: usize,
}

impl InMemoryStore {
    pub const DEFAULT_PAGE_SIZE: usize = 100;

    pub fn new(records: Vec<StoreRecord>) -> Self {
        Self {
            records,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn page(&self, options: &SelectOptions, offset: Option<&str>) -> Result<RecordPage> {
        let start = match offset {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| DashboardError::StoreError(format!("Invalid offset '{}'", raw)))?,
            None => 0,
        };

        let limit = options
            .max_records
            .map_or(self.records.len(), |max| (max as usize).min(self.records.len()));
        let page_size = options
            .page_size
            .map_or(self.page_size, |size| (size as usize).max(1));

        let start = start.min(limit);
        let end = (start + page_size).min(limit);

        Ok(RecordPage {
            records: self.records[start..end].to_vec(),
            offset: (end < limit).then(|| end.to_string()),
        })
    }
}

impl RecordStore for InMemoryStore {
    fn list_page<'a>(
        &'a self,
        options: &'a SelectOptions,
        offset: Option<&'a str>,
    ) -> BoxFuture<'a, Result<RecordPage>> {
        Box::pin(future::ready(self.page(options, offset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn record(id: &str) -> StoreRecord {
        StoreRecord {
            id: id.to_string(),
            fields: RecordFields::default(),
        }
    }

    #[test]
    fn test_default_sort() {
        let options = SelectOptions::default();
        assert_eq!(
            options.sort,
            vec![
                SortField::desc("Date Paiement"),
                SortField::desc("Date Facturation")
            ]
        );
    }

    #[test]
    fn test_query_pairs() {
        let options = SelectOptions {
            filter_by_formula: Some("{Client} = 'Acme'".to_string()),
            page_size: Some(50),
            fields: vec!["Ref".to_string()],
            ..Default::default()
        };

        let pairs = options.to_query_pairs(Some("itr123"));
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("sort[0][field]"), Some("Date Paiement"));
        assert_eq!(get("sort[0][direction]"), Some("desc"));
        assert_eq!(get("sort[1][field]"), Some("Date Facturation"));
        assert_eq!(get("filterByFormula"), Some("{Client} = 'Acme'"));
        assert_eq!(get("pageSize"), Some("50"));
        assert_eq!(get("fields[]"), Some("Ref"));
        assert_eq!(get("offset"), Some("itr123"));
        assert_eq!(get("view"), None);
    }

    #[test]
    fn test_record_page_deserializes_store_json() {
        let json = r#"{
            "records": [
                {
                    "id": "rec1",
                    "createdTime": "2023-01-01T00:00:00.000Z",
                    "fields": {
                        "Ref": "F-001",
                        "Client": "Acme",
                        "Mission": "Audit",
                        "Total": 1200.5,
                        "Type": "Formation",
                        "Prix": "2 jours",
                        "Date Facturation": "2023-01-10"
                    }
                }
            ],
            "offset": "itrNext/rec1"
        }"#;

        let page: RecordPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.offset.as_deref(), Some("itrNext/rec1"));
        let fields = &page.records[0].fields;
        assert_eq!(fields.reference.as_deref(), Some("F-001"));
        assert_eq!(fields.total, Some(1200.5));
        assert_eq!(fields.kind.as_deref(), Some("Formation"));
        assert_eq!(fields.date_facturation.as_deref(), Some("2023-01-10"));
        assert_eq!(fields.date_paiement, None);
    }

    #[test]
    fn test_in_memory_store_pages() {
        let store = InMemoryStore::new((0..5).map(|i| record(&format!("rec{}", i))).collect())
            .with_page_size(2);
        let options = SelectOptions::default();

        let first = block_on(store.list_page(&options, None)).unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.offset.as_deref(), Some("2"));

        let last = block_on(store.list_page(&options, Some("4"))).unwrap();
        assert_eq!(last.records.len(), 1);
        assert_eq!(last.records[0].id, "rec4");
        assert!(last.offset.is_none());

        assert!(block_on(store.list_page(&options, Some("bogus"))).is_err());
    }

    #[test]
    fn test_in_memory_store_respects_max_records() {
        let store = InMemoryStore::new((0..5).map(|i| record(&format!("rec{}", i))).collect());
        let options = SelectOptions {
            max_records: Some(3),
            ..Default::default()
        };

        let page = block_on(store.list_page(&options, None)).unwrap();
        assert_eq!(page.records.len(), 3);
        assert!(page.offset.is_none());
    }
}
