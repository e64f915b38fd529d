use crate::models::ModuleResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed action taxonomy. Variant order is the canonical
/// (lexicographic) order used when storing and comparing action sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Delete,
    Read,
    Update,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Read => "read",
            Action::Update => "update",
        }
    }

    /// Parses one of the four canonical action names, case-insensitively.
    /// Synonyms ("get", "post", ...) are handled only by the access
    /// evaluator, not here: stored action sets contain canonical names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Some(Action::Create),
            "delete" => Some(Action::Delete),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            _ => None,
        }
    }
}

/// Lower-cases, filters to the fixed enumeration, deduplicates and sorts
/// into canonical order. The canonical order is part of the permission
/// dedup key: the same set in any request order yields the same result.
pub fn canonical_access(raw: &[String]) -> Vec<Action> {
    let mut actions: Vec<Action> = raw.iter().filter_map(|s| Action::parse(s)).collect();
    actions.sort();
    actions.dedup();
    actions
}

/// Canonical JSON encoding of an action set, used as the stored
/// representation and as the uniqueness key alongside the module id.
pub fn access_to_json(actions: &[Action]) -> String {
    serde_json::to_string(&actions.iter().map(|a| a.as_str()).collect::<Vec<_>>())
        .unwrap_or_else(|_| "[]".to_string())
}

pub fn access_from_json(json: &str) -> Vec<Action> {
    let names: Vec<String> = serde_json::from_str(json).unwrap_or_default();
    canonical_access(&names)
}

/// Display label, e.g. "read/update".
pub fn access_label(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// A (module, action-set) grant. Permissions are value objects keyed by
/// (module_id, canonical action set); role creation reuses an existing
/// matching record instead of inserting a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub module_id: String,
    pub access: Vec<Action>,
    pub created_at: String,
    pub updated_at: String,
}

impl Permission {
    pub fn new(name: String, module_id: String, access: Vec<Action>) -> Self {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            module_id,
            access,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// DTOs for API

/// One requested grant inside a role create/update call.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionItem {
    pub module_id: String,
    pub access: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
    pub name: Option<String>,
    pub module_id: String,
    pub access: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub module_id: Option<String>,
    pub access: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub module: Option<ModuleResponse>,
    pub access: Vec<Action>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_access_dedups_and_sorts() {
        let raw = vec![
            "update".to_string(),
            "READ".to_string(),
            "read".to_string(),
            "create".to_string(),
        ];
        assert_eq!(
            canonical_access(&raw),
            vec![Action::Create, Action::Read, Action::Update]
        );
    }

    #[test]
    fn test_canonical_access_filters_unknown_tokens() {
        let raw = vec!["read".to_string(), "List".to_string(), "fly".to_string()];
        assert_eq!(canonical_access(&raw), vec![Action::Read]);
    }

    #[test]
    fn test_canonical_access_order_independent() {
        let a = vec!["read".to_string(), "update".to_string()];
        let b = vec!["update".to_string(), "read".to_string()];
        assert_eq!(canonical_access(&a), canonical_access(&b));
        assert_eq!(
            access_to_json(&canonical_access(&a)),
            access_to_json(&canonical_access(&b))
        );
    }

    #[test]
    fn test_access_json_round_trip() {
        let actions = vec![Action::Create, Action::Read];
        let json = access_to_json(&actions);
        assert_eq!(json, r#"["create","read"]"#);
        assert_eq!(access_from_json(&json), actions);
    }

    #[test]
    fn test_access_label() {
        assert_eq!(access_label(&[Action::Read, Action::Update]), "read/update");
    }
}
