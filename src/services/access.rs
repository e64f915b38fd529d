//! Access evaluation: decides whether a caller may perform an action on a
//! resource. Stateless; the caller's role/permission graph is re-resolved
//! from the store on every call, one batched query per level.

use crate::api::middleware::error::ApiResult;
use crate::database::permissions::Grant;
use crate::database::Database;
use crate::models::Action;

/// Maps a free-form action token onto the closed taxonomy. Tokens outside
/// the synonym table never match any grant.
pub fn normalize_action(raw: &str) -> Option<Action> {
    match raw.trim().to_lowercase().as_str() {
        "create" | "post" | "add" | "new" => Some(Action::Create),
        "read" | "get" | "list" | "fetch" | "view" => Some(Action::Read),
        "update" | "put" | "patch" | "edit" => Some(Action::Update),
        "delete" | "del" | "remove" => Some(Action::Delete),
        _ => None,
    }
}

/// A role named "admin" or "superadmin" (case-insensitive) grants
/// unconditional access.
pub fn is_bypass_role(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("admin") || name.eq_ignore_ascii_case("superadmin")
}

/// Pure matching step over the already-expanded grant list. Allows iff some
/// grant carries the action and either no resource matcher was given or one
/// matches the grant's module by exact id or case-insensitive name.
pub fn grants_allow(grants: &[Grant], action: Action, resources: &[String]) -> bool {
    grants.iter().any(|grant| {
        if !grant.access.contains(&action) {
            return false;
        }

        resources.is_empty()
            || resources.iter().any(|r| {
                r == &grant.module_id
                    || grant.module_name.trim().eq_ignore_ascii_case(r.trim())
            })
    })
}

/// Evaluates (caller, action, resources) to allow/deny.
///
/// An unknown caller id is a denial, not a lookup error; store faults
/// propagate as errors and are never treated as allow. The bypass check
/// runs before action normalization and before any grant is read, so a
/// bypass role allows even malformed actions and nonexistent resources.
pub async fn evaluate(
    db: &Database,
    customer_id: &str,
    action: &str,
    resources: &[String],
) -> ApiResult<bool> {
    if db.get_customer_by_id(customer_id).await?.is_none() {
        return Ok(false);
    }

    let roles = db.get_roles_for_customer(customer_id).await?;

    if roles.iter().any(|r| is_bypass_role(&r.name)) {
        return Ok(true);
    }

    let Some(action) = normalize_action(action) else {
        return Ok(false);
    };

    if roles.is_empty() {
        return Ok(false);
    }

    let role_ids: Vec<String> = roles.into_iter().map(|r| r.id).collect();
    let grants = db.get_grants_for_roles(&role_ids).await?;

    Ok(grants_allow(&grants, action, resources))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(access: &[Action], module_id: &str, module_name: &str) -> Grant {
        Grant {
            access: access.to_vec(),
            module_id: module_id.to_string(),
            module_name: module_name.to_string(),
        }
    }

    #[test]
    fn test_normalize_action_synonyms() {
        for raw in ["read", "get", "list", "fetch", "view", "GET", "List"] {
            assert_eq!(normalize_action(raw), Some(Action::Read), "{}", raw);
        }
        for raw in ["create", "post", "add", "new"] {
            assert_eq!(normalize_action(raw), Some(Action::Create), "{}", raw);
        }
        for raw in ["update", "put", "patch", "edit"] {
            assert_eq!(normalize_action(raw), Some(Action::Update), "{}", raw);
        }
        for raw in ["delete", "del", "remove", " DELETE "] {
            assert_eq!(normalize_action(raw), Some(Action::Delete), "{}", raw);
        }
    }

    #[test]
    fn test_normalize_action_rejects_unknown() {
        assert_eq!(normalize_action("fly"), None);
        assert_eq!(normalize_action(""), None);
        assert_eq!(normalize_action("readall"), None);
    }

    #[test]
    fn test_is_bypass_role() {
        assert!(is_bypass_role("admin"));
        assert!(is_bypass_role("Admin"));
        assert!(is_bypass_role("SUPERADMIN"));
        assert!(is_bypass_role(" superadmin "));
        assert!(!is_bypass_role("administrator"));
        assert!(!is_bypass_role("admins"));
        assert!(!is_bypass_role("viewer"));
    }

    #[test]
    fn test_grants_allow_action_and_module() {
        let grants = vec![grant(&[Action::Read, Action::Update], "m1", "Customer")];

        assert!(grants_allow(&grants, Action::Read, &["m1".to_string()]));
        assert!(grants_allow(&grants, Action::Update, &["m1".to_string()]));
        assert!(!grants_allow(&grants, Action::Create, &["m1".to_string()]));
        assert!(!grants_allow(&grants, Action::Delete, &["m1".to_string()]));
    }

    #[test]
    fn test_grants_allow_module_name_case_insensitive() {
        let grants = vec![grant(&[Action::Read], "m1", "Customer")];

        assert!(grants_allow(&grants, Action::Read, &["customer".to_string()]));
        assert!(grants_allow(&grants, Action::Read, &["CUSTOMER".to_string()]));
        assert!(!grants_allow(&grants, Action::Read, &["role".to_string()]));
    }

    #[test]
    fn test_grants_allow_module_id_exact() {
        let grants = vec![grant(&[Action::Read], "m1", "Customer")];

        assert!(grants_allow(&grants, Action::Read, &["m1".to_string()]));
        // Ids match exactly, but an unmatched token can still match by name.
        assert!(!grants_allow(&grants, Action::Read, &["M1".to_string()]));
    }

    #[test]
    fn test_grants_allow_empty_resources_matches_any_module() {
        let grants = vec![grant(&[Action::Read], "m1", "Customer")];

        assert!(grants_allow(&grants, Action::Read, &[]));
        assert!(!grants_allow(&grants, Action::Delete, &[]));
    }

    #[test]
    fn test_grants_allow_any_of_several_matchers() {
        let grants = vec![grant(&[Action::Read], "m2", "Report")];
        let resources = vec!["customer".to_string(), "report".to_string()];

        assert!(grants_allow(&grants, Action::Read, &resources));
    }

    #[test]
    fn test_grants_allow_no_grants_denies() {
        assert!(!grants_allow(&[], Action::Read, &[]));
    }
}
