use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{access_from_json, access_to_json, Action, Permission};
use sqlx::Row;

const PERMISSION_COLUMNS: &str = "id, name, module_id, access, created_at, updated_at";

fn permission_from_row(row: &sqlx::any::AnyRow) -> Result<Permission, sqlx::Error> {
    let access_json: String = row.try_get("access")?;

    Ok(Permission {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        module_id: row.try_get("module_id")?,
        access: access_from_json(&access_json),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// One permission joined with its module, as consumed by the access
/// evaluator. Module name is matched case-insensitively; module id exactly.
#[derive(Debug, Clone)]
pub struct Grant {
    pub access: Vec<Action>,
    pub module_id: String,
    pub module_name: String,
}

impl Database {
    pub async fn create_permission(&self, permission: &Permission) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO permissions (id, name, module_id, access, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&permission.id)
        .bind(&permission.name)
        .bind(&permission.module_id)
        .bind(access_to_json(&permission.access))
        .bind(&permission.created_at)
        .bind(&permission.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_permission_by_id(&self, id: &str) -> ApiResult<Option<Permission>> {
        let row = sqlx::query(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(permission_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Lookup by the value-object key: module id plus canonical action-set
    /// encoding.
    pub async fn find_permission_by_module_and_access(
        &self,
        module_id: &str,
        access_json: &str,
    ) -> ApiResult<Option<Permission>> {
        let row = sqlx::query(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE module_id = ? AND access = ?"
        ))
        .bind(module_id)
        .bind(access_json)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(permission_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_permissions(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> ApiResult<(Vec<Permission>, i64)> {
        let mut count_builder = sqlx::QueryBuilder::<sqlx::Any>::new(
            "SELECT COUNT(*) AS total FROM permissions WHERE 1=1",
        );
        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE 1=1"
        ));

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            for b in [&mut count_builder, &mut builder] {
                b.push(" AND name LIKE ");
                b.push_bind(pattern.clone());
            }
        }

        let total: i64 = count_builder
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        builder.push(" ORDER BY name LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind((page - 1) * limit);

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut permissions = Vec::with_capacity(rows.len());
        for row in &rows {
            permissions.push(permission_from_row(row)?);
        }

        Ok((permissions, total))
    }

    pub async fn update_permission(&self, permission: &Permission) -> ApiResult<()> {
        sqlx::query(
            "UPDATE permissions SET name = ?, module_id = ?, access = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&permission.name)
        .bind(&permission.module_id)
        .bind(access_to_json(&permission.access))
        .bind(&permission.updated_at)
        .bind(&permission.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_permission(&self, id: &str) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Single batched fetch of every permission reachable through the given
    /// roles, joined with its module (levels two and three of the caller
    /// graph expansion). Avoids per-role N+1 lookups.
    pub async fn get_grants_for_roles(&self, role_ids: &[String]) -> ApiResult<Vec<Grant>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(
            "SELECT p.access, p.module_id, m.name AS module_name
             FROM permissions p
             INNER JOIN role_permissions rp ON rp.permission_id = p.id
             INNER JOIN modules m ON m.id = p.module_id
             WHERE rp.role_id IN (",
        );

        let mut separated = builder.separated(", ");
        for role_id in role_ids {
            separated.push_bind(role_id.clone());
        }
        builder.push(")");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut grants = Vec::with_capacity(rows.len());
        for row in rows {
            let access_json: String = row.try_get("access")?;
            grants.push(Grant {
                access: access_from_json(&access_json),
                module_id: row.try_get("module_id")?,
                module_name: row.try_get("module_name")?,
            });
        }

        Ok(grants)
    }
}
