use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{
    BatchFailure, BatchResult, CreateCustomerRequest, Customer, CustomerResponse, Paginated,
    UpdateCustomerRequest,
};
use crate::services::{auth, role_service};

pub fn validate_and_normalize_email(email: &str) -> ApiResult<String> {
    let trimmed = email.trim();

    if !email_address::EmailAddress::is_valid(trimmed) {
        return Err(ApiError::BadRequest(
            "Invalid email format. Must be in format user@domain.tld".to_string(),
        ));
    }

    // Require a TLD (dot after @)
    if let Some(at_pos) = trimmed.find('@') {
        let domain_part = &trimmed[at_pos + 1..];
        if !domain_part.contains('.') {
            return Err(ApiError::BadRequest(
                "Invalid email format. Domain must include a TLD (e.g., .com, .org)".to_string(),
            ));
        }
    }

    Ok(trimmed.to_lowercase())
}

/// Assembles the customer view with roles (and, through them, permissions
/// and modules) populated.
pub async fn build_customer_response(
    db: &Database,
    customer: Customer,
) -> ApiResult<CustomerResponse> {
    let roles = db.get_roles_for_customer(&customer.id).await?;
    let mut role_responses = Vec::with_capacity(roles.len());
    for role in roles {
        role_responses.push(role_service::build_role_response(db, role).await?);
    }

    Ok(CustomerResponse {
        id: customer.id,
        name: customer.name,
        username: customer.username,
        email: customer.email,
        phone: customer.phone,
        company: customer.company,
        profile_url: customer.profile_url,
        about: customer.about,
        roles: role_responses,
        created_at: customer.created_at,
        updated_at: customer.updated_at,
    })
}

async fn validate_role_ids(db: &Database, role_ids: &[String]) -> ApiResult<()> {
    for role_id in role_ids {
        if db.get_role_by_id(role_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("Role '{}' not found", role_id)));
        }
    }
    Ok(())
}

pub async fn create_customer(
    db: &Database,
    request: CreateCustomerRequest,
) -> ApiResult<CustomerResponse> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let email = validate_and_normalize_email(&request.email)?;
    if db.get_customer_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    auth::validate_password_complexity(&request.password)?;
    validate_role_ids(db, &request.roles).await?;

    let password_hash = auth::hash_password(&request.password)?;
    let customer = Customer::new(
        request.name.trim().to_string(),
        request.username,
        email,
        request.phone,
        password_hash,
        request.company,
        request.profile_url,
        request.about,
    );

    db.create_customer(&customer).await?;
    db.set_customer_roles(&customer.id, &request.roles).await?;

    build_customer_response(db, customer).await
}

pub async fn list_customers(
    db: &Database,
    page: i64,
    limit: i64,
    search: Option<&str>,
    company: Option<&str>,
) -> ApiResult<Paginated<CustomerResponse>> {
    let (customers, total) = db.list_customers(page, limit, search, company).await?;

    let mut items = Vec::with_capacity(customers.len());
    for customer in customers {
        items.push(build_customer_response(db, customer).await?);
    }

    Ok(Paginated {
        items,
        total,
        page,
        limit,
    })
}

pub async fn get_customer(db: &Database, id: &str) -> ApiResult<CustomerResponse> {
    let customer = db
        .get_customer_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    build_customer_response(db, customer).await
}

pub async fn update_customer(
    db: &Database,
    id: &str,
    request: UpdateCustomerRequest,
) -> ApiResult<CustomerResponse> {
    let mut customer = db
        .get_customer_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_string()))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        customer.name = name.trim().to_string();
    }

    if let Some(email) = request.email {
        let email = validate_and_normalize_email(&email)?;
        if let Some(existing) = db.get_customer_by_email(&email).await? {
            if existing.id != customer.id {
                return Err(ApiError::Conflict("Email already in use".to_string()));
            }
        }
        customer.email = email;
    }

    if let Some(password) = request.password {
        auth::validate_password_complexity(&password)?;
        customer.password_hash = auth::hash_password(&password)?;
    }

    if let Some(phone) = request.phone {
        customer.phone = phone;
    }

    if let Some(company) = request.company {
        customer.company = Some(company);
    }

    if let Some(profile_url) = request.profile_url {
        customer.profile_url = Some(profile_url);
    }

    if let Some(about) = request.about {
        customer.about = Some(about);
    }

    customer.updated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap();

    db.update_customer(&customer).await?;

    if let Some(roles) = request.roles {
        validate_role_ids(db, &roles).await?;
        db.set_customer_roles(&customer.id, &roles).await?;
    }

    build_customer_response(db, customer).await
}

pub async fn delete_customer(db: &Database, id: &str) -> ApiResult<()> {
    let deleted = db.delete_customer(id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    Ok(())
}

pub async fn batch_delete(db: &Database, ids: &[String]) -> ApiResult<BatchResult> {
    let mut updated = Vec::new();
    let mut failed = Vec::new();

    for id in ids {
        match db.delete_customer(id).await? {
            0 => failed.push(BatchFailure {
                id: id.clone(),
                reason: "Customer not found".to_string(),
            }),
            _ => updated.push(id.clone()),
        }
    }

    Ok(BatchResult { updated, failed })
}
