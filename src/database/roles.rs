use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{Role, RoleStatus, StatusEntry};
use sqlx::Row;
use uuid::Uuid;

const ROLE_COLUMNS: &str = "id, name, icon, company, created_by, created_at, updated_at";

fn role_from_row(row: &sqlx::any::AnyRow) -> Result<Role, sqlx::Error> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        icon: row.try_get("icon")?,
        company: row.try_get::<Option<String>, _>("company").ok().flatten(),
        created_by: row.try_get("created_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_role(&self, role: &Role) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO roles (id, name, icon, company, created_by, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&role.id)
        .bind(&role.name)
        .bind(&role.icon)
        .bind(&role.company)
        .bind(&role.created_by)
        .bind(&role.created_at)
        .bind(&role.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_role_by_id(&self, id: &str) -> ApiResult<Option<Role>> {
        let row = sqlx::query(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(role_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_role_by_name(&self, name: &str) -> ApiResult<Option<Role>> {
        let row = sqlx::query(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(role_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_roles(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
        status: Option<RoleStatus>,
        company: Option<&str>,
    ) -> ApiResult<(Vec<Role>, i64)> {
        let mut count_builder =
            sqlx::QueryBuilder::<sqlx::Any>::new("SELECT COUNT(*) AS total FROM roles WHERE 1=1");
        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE 1=1"
        ));

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            for b in [&mut count_builder, &mut builder] {
                b.push(" AND name LIKE ");
                b.push_bind(pattern.clone());
            }
        }

        if let Some(company) = company {
            for b in [&mut count_builder, &mut builder] {
                b.push(" AND company = ");
                b.push_bind(company.to_string());
            }
        }

        // Current status is the highest-position history entry.
        if let Some(status) = status {
            for b in [&mut count_builder, &mut builder] {
                b.push(
                    " AND (SELECT h.status FROM role_status_history h
                           WHERE h.role_id = roles.id
                           ORDER BY h.position DESC LIMIT 1) = ",
                );
                b.push_bind(status.as_str());
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
        let mut roles = Vec::with_capacity(rows.len());
        for row in &rows {
            roles.push(role_from_row(row)?);
        }

        Ok((roles, total))
    }

    pub async fn delete_role(&self, id: &str) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Appends a status-history entry. The per-role position sequence is
    /// assigned inside the INSERT so entries stay totally ordered even when
    /// several land within the same timestamp.
    pub async fn append_status_entry(
        &self,
        role_id: &str,
        status: RoleStatus,
        remarks: Option<&str>,
        actor_id: &str,
    ) -> ApiResult<()> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        sqlx::query(
            "INSERT INTO role_status_history (id, role_id, position, status, remarks, actor_id, created_at)
             VALUES (?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM role_status_history WHERE role_id = ?), ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(role_id)
        .bind(role_id)
        .bind(status.as_str())
        .bind(remarks)
        .bind(actor_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_status_history(&self, role_id: &str) -> ApiResult<Vec<StatusEntry>> {
        let rows = sqlx::query(
            "SELECT status, remarks, actor_id, created_at
             FROM role_status_history
             WHERE role_id = ?
             ORDER BY position",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            let status_str: String = row.try_get("status")?;
            history.push(StatusEntry {
                status: RoleStatus::parse(&status_str).unwrap_or(RoleStatus::Inactive),
                remarks: row.try_get::<Option<String>, _>("remarks").ok().flatten(),
                actor_id: row.try_get("actor_id")?,
                created_at: row.try_get("created_at")?,
            });
        }

        Ok(history)
    }

    /// Replaces a role's permission references.
    pub async fn set_role_permissions(
        &self,
        role_id: &str,
        permission_ids: &[String],
    ) -> ApiResult<()> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        for permission_id in permission_ids {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id, created_at)
                 VALUES (?, ?, ?)",
            )
            .bind(role_id)
            .bind(permission_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    pub async fn get_role_permission_ids(&self, role_id: &str) -> ApiResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT permission_id FROM role_permissions WHERE role_id = ? ORDER BY created_at",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("permission_id")?);
        }

        Ok(ids)
    }

    /// Single batched fetch of a customer's roles (level one of the
    /// caller → roles → permissions → module expansion).
    pub async fn get_roles_for_customer(&self, customer_id: &str) -> ApiResult<Vec<Role>> {
        let rows = sqlx::query(
            "SELECT r.id, r.name, r.icon, r.company, r.created_by, r.created_at, r.updated_at
             FROM roles r
             INNER JOIN customer_roles cr ON r.id = cr.role_id
             WHERE cr.customer_id = ?",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut roles = Vec::with_capacity(rows.len());
        for row in &rows {
            roles.push(role_from_row(row)?);
        }

        Ok(roles)
    }

    pub async fn count_roles_referencing_permission(&self, permission_id: &str) -> ApiResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(DISTINCT role_id) AS total FROM role_permissions WHERE permission_id = ?",
        )
        .bind(permission_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("total").unwrap_or(0))
    }
}
