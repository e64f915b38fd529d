use crate::models::PermissionResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleStatus {
    Active,
    Inactive,
    Invited,
    Suspended,
}

impl RoleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleStatus::Active => "active",
            RoleStatus::Inactive => "inactive",
            RoleStatus::Invited => "invited",
            RoleStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(RoleStatus::Active),
            "inactive" => Some(RoleStatus::Inactive),
            "invited" => Some(RoleStatus::Invited),
            "suspended" => Some(RoleStatus::Suspended),
            _ => None,
        }
    }
}

/// One appended status-history entry. The history is append-only and the
/// role's current status is always the highest-position entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: RoleStatus,
    pub remarks: Option<String>,
    pub actor_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub company: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Role {
    pub fn new(name: String, icon: String, company: Option<String>, created_by: String) -> Self {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            icon,
            company,
            created_by,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// DTOs for API
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub icon: String,
    pub company: Option<String>,
    #[serde(default)]
    pub permissions: Vec<crate::models::PermissionItem>,
}

#[derive(Debug, Deserialize)]
pub struct ReplacePermissionsRequest {
    pub permissions: Vec<crate::models::PermissionItem>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: RoleStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchStatusRequest {
    pub ids: Vec<String>,
    pub status: RoleStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub reason: String,
}

/// Per-item outcome of a batch operation. Batches are not atomic, so the
/// response always identifies which ids succeeded and which did not.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub updated: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub company: Option<String>,
    pub created_by: String,
    pub status: RoleStatus,
    pub status_history: Vec<StatusEntry>,
    pub permissions: Vec<PermissionResponse>,
    pub created_at: String,
    pub updated_at: String,
}
