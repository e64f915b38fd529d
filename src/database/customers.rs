use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::Customer;
use sqlx::Row;

const CUSTOMER_COLUMNS: &str = "id, name, username, email, phone, password_hash, company, profile_url, about, created_at, updated_at";

fn customer_from_row(row: &sqlx::any::AnyRow) -> Result<Customer, sqlx::Error> {
    let phone_json: String = row.try_get("phone")?;
    let phone: Vec<String> = serde_json::from_str(&phone_json).unwrap_or_default();

    Ok(Customer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        username: row.try_get::<Option<String>, _>("username").ok().flatten(),
        email: row.try_get("email")?,
        phone,
        password_hash: row.try_get("password_hash")?,
        company: row.try_get::<Option<String>, _>("company").ok().flatten(),
        profile_url: row
            .try_get::<Option<String>, _>("profile_url")
            .ok()
            .flatten(),
        about: row.try_get::<Option<String>, _>("about").ok().flatten(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

impl Database {
    pub async fn create_customer(&self, customer: &Customer) -> ApiResult<()> {
        let phone_json = serde_json::to_string(&customer.phone).unwrap_or_else(|_| "[]".into());

        sqlx::query(
            "INSERT INTO customers (id, name, username, email, phone, password_hash, company, profile_url, about, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.username)
        .bind(&customer.email)
        .bind(&phone_json)
        .bind(&customer.password_hash)
        .bind(&customer.company)
        .bind(&customer.profile_url)
        .bind(&customer.about)
        .bind(&customer.created_at)
        .bind(&customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_customer_by_id(&self, id: &str) -> ApiResult<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_customer_by_name(&self, name: &str) -> ApiResult<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_customer_by_email(&self, email: &str) -> ApiResult<Option<Customer>> {
        let row = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_customers(
        &self,
        page: i64,
        limit: i64,
        search: Option<&str>,
        company: Option<&str>,
    ) -> ApiResult<(Vec<Customer>, i64)> {
        let mut count_builder =
            sqlx::QueryBuilder::<sqlx::Any>::new("SELECT COUNT(*) AS total FROM customers WHERE 1=1");
        let mut builder = sqlx::QueryBuilder::<sqlx::Any>::new(format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE 1=1"
        ));

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            for b in [&mut count_builder, &mut builder] {
                b.push(" AND (name LIKE ");
                b.push_bind(pattern.clone());
                b.push(" OR email LIKE ");
                b.push_bind(pattern.clone());
                b.push(" OR username LIKE ");
                b.push_bind(pattern.clone());
                b.push(")");
            }
        }

        if let Some(company) = company {
            for b in [&mut count_builder, &mut builder] {
                b.push(" AND company = ");
                b.push_bind(company.to_string());
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
        let mut customers = Vec::with_capacity(rows.len());
        for row in &rows {
            customers.push(customer_from_row(row)?);
        }

        Ok((customers, total))
    }

    pub async fn update_customer(&self, customer: &Customer) -> ApiResult<()> {
        let phone_json = serde_json::to_string(&customer.phone).unwrap_or_else(|_| "[]".into());

        sqlx::query(
            "UPDATE customers
             SET name = ?, username = ?, email = ?, phone = ?, password_hash = ?,
                 company = ?, profile_url = ?, about = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&customer.name)
        .bind(&customer.username)
        .bind(&customer.email)
        .bind(&phone_json)
        .bind(&customer.password_hash)
        .bind(&customer.company)
        .bind(&customer.profile_url)
        .bind(&customer.about)
        .bind(&customer.updated_at)
        .bind(&customer.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_customer(&self, id: &str) -> ApiResult<u64> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Replaces a customer's role references.
    pub async fn set_customer_roles(&self, customer_id: &str, role_ids: &[String]) -> ApiResult<()> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        sqlx::query("DELETE FROM customer_roles WHERE customer_id = ?")
            .bind(customer_id)
            .execute(&self.pool)
            .await?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT INTO customer_roles (customer_id, role_id, created_at)
                 VALUES (?, ?, ?)",
            )
            .bind(customer_id)
            .bind(role_id)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    pub async fn get_customer_role_ids(&self, customer_id: &str) -> ApiResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT role_id FROM customer_roles WHERE customer_id = ? ORDER BY created_at",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.try_get("role_id")?);
        }

        Ok(ids)
    }
}
