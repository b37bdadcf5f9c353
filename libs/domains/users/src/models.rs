use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Permission tiers for directory callers.
///
/// `Guest` is only reachable at record creation; no update path may set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Guest,
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Guest => write!(f, "GUEST"),
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GUEST" => Ok(Role::Guest),
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// User record. The identity store is the sole owner; callers only ever
/// receive clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, immutable after creation, never reused
    pub id: Uuid,
    /// Unique across all records, compared case-sensitively
    pub email: String,
    /// Opaque pre-hashed credential (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

impl User {
    /// Overwrite only the fields present in the patch.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Full field set for a record, without the store-assigned id.
///
/// Used both for creation (`add`) and full replacement (`replace`). The
/// credential arrives already hashed; the core never sees raw passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

/// Partial field set for in-place patching. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

/// DTO for creating a new user (registration path)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Defaults to `USER` when unspecified
    pub role: Option<Role>,
}

impl CreateUser {
    /// Pair the request with an already-hashed credential.
    pub fn into_record(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role.unwrap_or_default(),
        }
    }
}

/// DTO for full replacement of an existing user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceUser {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl ReplaceUser {
    pub fn into_record(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
        }
    }
}

/// DTO for partially updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUser {
    /// Pair the request with an already-hashed credential, if one was supplied.
    pub fn into_patch(self, password_hash: Option<String>) -> UserPatch {
        UserPatch {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_format() {
        for (role, wire) in [
            (Role::Guest, "\"GUEST\""),
            (Role::User, "\"USER\""),
            (Role::Admin, "\"ADMIN\""),
        ] {
            assert_eq!(serde_json::to_string(&role).unwrap(), wire);
            assert_eq!(serde_json::from_str::<Role>(wire).unwrap(), role);
        }
    }

    #[test]
    fn test_role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
        let input = CreateUser {
            email: "a@example.com".to_string(),
            password: "pw".to_string(),
            first_name: None,
            last_name: None,
            role: None,
        };
        assert_eq!(input.into_record("hash".to_string()).role, Role::User);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::now_v7(),
            email: "a@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            first_name: None,
            last_name: None,
            role: Role::User,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_apply_patch_leaves_absent_fields_untouched() {
        let mut user = User {
            id: Uuid::now_v7(),
            email: "a@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            role: Role::User,
        };
        user.apply_patch(UserPatch {
            last_name: Some("Byron".to_string()),
            ..Default::default()
        });
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.last_name.as_deref(), Some("Byron"));
        assert_eq!(user.role, Role::User);
    }
}
