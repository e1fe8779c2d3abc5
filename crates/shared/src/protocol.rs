use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FormId, TemplateId, UserId};

/// Status value the backend assigns to templates that are live for users.
pub const TEMPLATE_STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: FormId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: TemplateId,
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TemplateRecord {
    pub fn is_active(&self) -> bool {
        self.status == TEMPLATE_STATUS_ACTIVE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormListResponse {
    pub data: Vec<FormRecord>,
    pub pagination: PaginationStats,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationStats {
    #[serde(rename = "totalResults")]
    pub total_results: u64,
}

/// Envelope of the template endpoint; `data` decodes to `None` when the
/// field is missing or null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TemplateRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
