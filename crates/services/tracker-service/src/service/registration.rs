//! Registration - creates user accounts.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{CreateUser, Password, User};

use crate::clock::Clock;
use crate::repository::UserRepository;

/// Registration service trait for dependency injection.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account. Email must be unused; role defaults to USER.
    async fn register(&self, input: CreateUser) -> AppResult<User>;
}

/// Repository-backed registration.
pub struct Registrar {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl Registrar {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl RegistrationService for Registrar {
    async fn register(&self, input: CreateUser) -> AppResult<User> {
        let email = input.email.trim().to_string();
        if email.is_empty() || input.password.trim().is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User with this email"));
        }

        let password_hash = Password::new(&input.password)?.into_string();
        let user = User::new(
            email,
            password_hash,
            input.full_name,
            input.role.unwrap_or_default(),
            self.clock.now(),
        );

        let user = self.users.insert(user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::clock::SystemClock;
    use crate::repository::MockUserRepository;
    use domain::UserRole;

    fn input(email: &str, password: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "New User".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_defaults_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|u| Ok(u));

        let service = Registrar::new(Arc::new(repo), Arc::new(SystemClock));
        let user = service
            .register(input("new@example.com", "password123"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_keeps_requested_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|u| Ok(u));

        let service = Registrar::new(Arc::new(repo), Arc::new(SystemClock));
        let mut request = input("admin@example.com", "password123");
        request.role = Some(UserRole::Admin);
        let user = service.register(request).await.unwrap();

        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|email| {
            Ok(Some(User::new(
                email.to_string(),
                "hash".to_string(),
                "Existing".to_string(),
                UserRole::User,
                Utc::now(),
            )))
        });
        repo.expect_insert().never();

        let service = Registrar::new(Arc::new(repo), Arc::new(SystemClock));
        let result = service.register(input("taken@example.com", "password123")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_blank_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();

        let service = Registrar::new(Arc::new(repo), Arc::new(SystemClock));

        let result = service.register(input("  ", "password123")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service.register(input("a@example.com", "   ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert().never();

        let service = Registrar::new(Arc::new(repo), Arc::new(SystemClock));
        let result = service.register(input("a@example.com", "short")).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
