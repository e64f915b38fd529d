use crate::api::middleware::error::{ApiError, ApiResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};

/// Validates password complexity requirements:
/// - 10-72 characters long
/// - Contains uppercase letter
/// - Contains lowercase letter
/// - Contains digit
/// - Contains special character
pub fn validate_password_complexity(password: &str) -> ApiResult<()> {
    let len = password.len();
    if !(10..=72).contains(&len) {
        return Err(ApiError::BadRequest(
            "Password must be 10-72 characters long".to_string(),
        ));
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());
    let has_special = password
        .chars()
        .any(|c| "!@#$%^&*()_+-=[]{}|;:,.<>?".contains(c));

    if !has_uppercase {
        return Err(ApiError::BadRequest(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !has_lowercase {
        return Err(ApiError::BadRequest(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !has_digit {
        return Err(ApiError::BadRequest(
            "Password must contain at least one digit".to_string(),
        ));
    }

    if !has_special {
        return Err(ApiError::BadRequest(
            "Password must contain at least one special character (!@#$%^&*()_+-=[]{}|;:,.<>?)"
                .to_string(),
        ));
    }

    Ok(())
}

/// Hash password using Argon2id with parameters:
/// - m_cost = 19456 KiB (19 MiB)
/// - t_cost = 2 iterations
/// - p_cost = 1 thread
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(19456)
        .t_cost(2)
        .p_cost(1)
        .build()
        .map_err(|_| ApiError::Internal("Failed to build Argon2 params".to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify password against Argon2id hash
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| ApiError::Internal("Invalid password hash format".to_string()))?;

    let argon2 = Argon2::default();

    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate secure random token for sessions (32 bytes = 64 hex characters)
pub fn generate_session_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// Result of a successful authentication
pub struct AuthResult {
    pub session: crate::models::Session,
    pub customer: crate::models::Customer,
}

/// Authenticate a customer with name and password:
/// 1. Find customer by name
/// 2. Verify password
/// 3. Create session
///
/// Both unknown name and bad password produce the same generic error.
pub async fn authenticate(
    db: &crate::database::Database,
    name: &str,
    password: &str,
    session_duration_hours: i64,
) -> ApiResult<AuthResult> {
    use crate::models::Session;

    let customer = db
        .get_customer_by_name(name)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let password_valid = verify_password(password, &customer.password_hash)?;

    if !password_valid {
        return Err(ApiError::Unauthorized);
    }

    let token = generate_session_token();
    let session = Session::new(customer.id.clone(), token, session_duration_hours);
    db.create_session(&session).await?;

    Ok(AuthResult { session, customer })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = validate_password_complexity("Short1!");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_too_long() {
        let long_password = "a".repeat(73) + "A1!";
        let result = validate_password_complexity(&long_password);
        assert!(result.is_err());
    }

    #[test]
    fn test_password_no_uppercase() {
        let result = validate_password_complexity("lowercase123!");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_no_lowercase() {
        let result = validate_password_complexity("UPPERCASE123!");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_no_digit() {
        let result = validate_password_complexity("Lowercase!");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_no_special() {
        let result = validate_password_complexity("Lowercase123");
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_password() {
        let result = validate_password_complexity("SecureP@ssw0rd");
        assert!(result.is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let password = "SecureP@ssw0rd123";
        let hash = hash_password(password).unwrap();

        let verify_result = verify_password(password, &hash).unwrap();
        assert!(verify_result);

        let verify_wrong = verify_password("WrongPassword1!", &hash).unwrap();
        assert!(!verify_wrong);
    }

    #[test]
    fn test_session_token_generation() {
        let token1 = generate_session_token();
        let token2 = generate_session_token();

        assert_eq!(token1.len(), 64);
        assert_eq!(token2.len(), 64);
        assert_ne!(token1, token2);
        assert!(token1.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
