use crate::api::middleware::{ApiError, AppState};
use crate::config::Config;
use crate::database::Database;
use crate::models::{Customer, Role, RoleStatus};
use crate::services::auth::{hash_password, validate_password_complexity};
use crate::services::customer_service::validate_and_normalize_email;

pub async fn build_app_state(db: Database, config: &Config) -> Result<AppState, ApiError> {
    Ok(AppState {
        db,
        session_duration_hours: config.session_duration_hours,
    })
}

/// Seed the superadmin role and the admin account on first boot. Safe to
/// call on every startup; existing records are left untouched.
pub async fn initialize_admin(db: &Database, config: &Config) -> Result<(), ApiError> {
    tracing::info!("Checking for admin initialization");

    let superadmin = match db.get_role_by_name("superadmin").await? {
        Some(role) => role,
        None => {
            tracing::info!("Creating superadmin role");
            let role = Role::new(
                "superadmin".to_string(),
                "shield".to_string(),
                None,
                "system".to_string(),
            );
            db.create_role(&role).await?;
            db.append_status_entry(&role.id, RoleStatus::Active, None, "system")
                .await?;
            role
        }
    };

    if db.get_customer_by_name(&config.admin_name).await?.is_some() {
        tracing::info!("Admin account already exists: {}", config.admin_name);
        return Ok(());
    }

    tracing::info!("Creating admin account: {}", config.admin_name);

    validate_password_complexity(&config.admin_password)?;
    let email = validate_and_normalize_email(&config.admin_email)?;
    let password_hash = hash_password(&config.admin_password)?;

    let admin = Customer::new(
        config.admin_name.clone(),
        None,
        email,
        Vec::new(),
        password_hash,
        None,
        None,
        None,
    );
    db.create_customer(&admin).await?;
    db.set_customer_roles(&admin.id, std::slice::from_ref(&superadmin.id))
        .await?;

    tracing::info!("Admin account created: {}", config.admin_name);

    Ok(())
}
