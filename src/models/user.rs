use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{PasswordError, PasswordHasher};

/// Role claim carried by users and their tokens.
/// Stored as lowercase text in the `users.role` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// A user row as stored in the database.
///
/// `password_hash` is never serialized; client-facing output goes through
/// [`crate::dto::UserDto`].
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A user ready to be inserted.
///
/// The only way to obtain one is [`NewUser::new`], which hashes the password,
/// so a plaintext credential can never be persisted.
#[derive(Debug)]
pub struct NewUser {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: Role,
}

impl NewUser {
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        hasher: &PasswordHasher,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hasher.hash(password)?,
            role,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Payload for `POST /api/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    /// Defaults to [`Role::User`] when omitted.
    #[serde(default)]
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_new_user_hashes_password() {
        let hasher = PasswordHasher::new(4);
        let user = NewUser::new("Ada", "ada@example.com", "password123", Role::User, &hasher)
            .unwrap();

        assert_ne!(user.password_hash(), "password123");
        assert!(hasher.verify(user.password_hash(), "password123").is_ok());
        assert!(Uuid::parse_str(user.id()).is_ok());
        assert_eq!(user.role(), Role::User);
    }

    #[test]
    fn test_user_never_serializes_password() {
        let now = Utc::now();
        let user = User {
            id: "user-1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$2b$04$secret".into(),
            role: Role::Admin,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("secret"));
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_create_user_request_defaults_role() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "password123"
        }))
        .unwrap();

        assert_eq!(request.role, Role::User);
        assert!(request.validate().is_ok());

        let invalid = CreateUserRequest {
            name: "".into(),
            email: "bad".into(),
            password: "short".into(),
            role: Role::Admin,
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
