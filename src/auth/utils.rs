use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

pub fn require_owner_or_admin(claims: &Claims, resource_owner: &str) -> AppResult<()> {
    if !claims.is_admin() && claims.sub != resource_owner {
        return Err(AppError::Forbidden(
            "You can only access your own resources".to_string(),
        ));
    }
    Ok(())
}

/// Guest attempts are reachable by anyone holding the attempt id; owned
/// attempts only by their owner or an admin.
pub fn can_access_attempt(caller: Option<&Claims>, attempt: &QuizAttempt) -> AppResult<()> {
    let Some(owner) = attempt.user_id.as_deref() else {
        return Ok(());
    };

    match caller {
        Some(claims) => require_owner_or_admin(claims, owner),
        None => Err(AppError::Unauthorized(
            "Sign in to access this attempt".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::UserRole;

    fn create_test_claims(sub: &str, role: UserRole) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: Some(format!("{}@example.com", sub)),
            role,
            iat: 0,
            exp: 9999999999,
        }
    }

    #[test]
    fn test_require_admin_success() {
        let claims = create_test_claims("admin", UserRole::Admin);
        assert!(require_admin(&claims).is_ok());
    }

    #[test]
    fn test_require_admin_failure() {
        let claims = create_test_claims("user", UserRole::User);
        assert!(matches!(require_admin(&claims), Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_require_owner_or_admin() {
        let john = create_test_claims("john", UserRole::User);
        let admin = create_test_claims("admin", UserRole::Admin);

        assert!(require_owner_or_admin(&john, "john").is_ok());
        assert!(require_owner_or_admin(&admin, "jane").is_ok());
        assert!(require_owner_or_admin(&john, "jane").is_err());
    }

    #[test]
    fn test_guest_attempt_is_open() {
        let attempt = QuizAttempt::start("quiz-1", None, 3);
        assert!(can_access_attempt(None, &attempt).is_ok());

        let jane = create_test_claims("jane", UserRole::User);
        assert!(can_access_attempt(Some(&jane), &attempt).is_ok());
    }

    #[test]
    fn test_owned_attempt_is_private() {
        let attempt = QuizAttempt::start("quiz-1", Some("john"), 3);
        let john = create_test_claims("john", UserRole::User);
        let jane = create_test_claims("jane", UserRole::User);
        let admin = create_test_claims("admin", UserRole::Admin);

        assert!(matches!(can_access_attempt(None, &attempt), Err(AppError::Unauthorized(_))));
        assert!(matches!(can_access_attempt(Some(&jane), &attempt), Err(AppError::Forbidden(_))));
        assert!(can_access_attempt(Some(&john), &attempt).is_ok());
        assert!(can_access_attempt(Some(&admin), &attempt).is_ok());
    }
}
