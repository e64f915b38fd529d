use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{Module, ModuleType};
use sqlx::Row;

const MODULE_COLUMNS: &str = "id, name, description, module_type, created_at, updated_at";

fn module_from_row(row: &sqlx::any::AnyRow) -> Result<Module, sqlx::Error> {
    let module_type = row
        .try_get::<Option<String>, _>("module_type")
        .ok()
        .flatten()
        .and_then(|s| ModuleType::parse(&s));

    Ok(Module {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row
            .try_get::<Option<String>, _>("description")
            .ok()
            .flatten(),
        module_type,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_module(&self, module: &Module) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO modules (id, name, description, module_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&module.id)
        .bind(&module.name)
        .bind(&module.description)
        .bind(module.module_type.map(|t| t.as_str()))
        .bind(&module.created_at)
        .bind(&module.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_module_by_id(&self, id: &str) -> ApiResult<Option<Module>> {
        let row = sqlx::query(&format!("SELECT {MODULE_COLUMNS} FROM modules WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(module_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_modules(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
    ) -> ApiResult<(Vec<Module>, i64)> {
        let mut count_builder =
            sqlx::QueryBuilder::<sqlx::Any>::new("SELECT COUNT(*) AS total FROM modules WHERE 1=1");
        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(format!(
            "SELECT {MODULE_COLUMNS} FROM modules WHERE 1=1"
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
        let mut modules = Vec::with_capacity(rows.len());
        for row in &rows {
            modules.push(module_from_row(row)?);
        }

        Ok((modules, total))
    }

    /// Batched lookup used when assembling permission responses.
    pub async fn get_modules_by_ids(&self, ids: &[String]) -> ApiResult<Vec<Module>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(format!(
            "SELECT {MODULE_COLUMNS} FROM modules WHERE id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        builder.push(")");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut modules = Vec::with_capacity(rows.len());
        for row in &rows {
            modules.push(module_from_row(row)?);
        }

        Ok(modules)
    }

    pub async fn update_module(&self, module: &Module) -> ApiResult<()> {
        sqlx::query(
            "UPDATE modules SET name = ?, description = ?, module_type = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&module.name)
        .bind(&module.description)
        .bind(module.module_type.map(|t| t.as_str()))
        .bind(&module.updated_at)
        .bind(&module.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_module(&self, id: &str) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM modules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_permissions_referencing_module(&self, module_id: &str) -> ApiResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM permissions WHERE module_id = ?")
            .bind(module_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("total").unwrap_or(0))
    }
}
