use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Which side of the pipeline a prospect sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProspectKind {
    Seller,
    Buyer,
    Partner,
    Employee,
}

impl ProspectKind {
    /// Path segment the API uses for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectKind::Seller => "seller",
            ProspectKind::Buyer => "buyer",
            ProspectKind::Partner => "partner",
            ProspectKind::Employee => "employee",
        }
    }
}

impl Display for ProspectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProspectKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seller" => Ok(ProspectKind::Seller),
            "buyer" => Ok(ProspectKind::Buyer),
            "partner" => Ok(ProspectKind::Partner),
            "employee" => Ok(ProspectKind::Employee),
            _ => Err(anyhow::anyhow!("Invalid prospect kind: {}", s)),
        }
    }
}

/// Search and pagination criteria for prospect listings. All fields optional;
/// an empty filter lists the first page unfiltered.
#[derive(Debug, Clone, Default)]
pub struct ProspectFilter {
    pub search: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProspectFilter {
    /// Query parameters in the order the API documents them. Empty search
    /// strings are dropped rather than sent as `search=`.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref() {
            if !search.trim().is_empty() {
                query.push(("search", search.trim().to_string()));
            }
        }
        if let Some(industry) = &self.industry {
            query.push(("industry", industry.clone()));
        }
        if let Some(currency) = &self.currency {
            query.push(("currency", currency.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        query
    }
}

/// One row of a prospect listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectSummary {
    pub id: Uuid,
    pub name: String,
    pub kind: ProspectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Paginated prospect listing as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectPage {
    pub items: Vec<ProspectSummary>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
