use nexo_core::domain::entities::{AccountChanges, NewAccount, Role, UserFilter};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Admin-created account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    pub password: String,

    pub role: Option<Role>,
    pub phone: Option<String>,
    pub phone_country: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<CreateUserRequest> for NewAccount {
    fn from(request: CreateUserRequest) -> Self {
        NewAccount {
            role: request.role,
            phone: request.phone,
            phone_country: request.phone_country,
            avatar_url: request.avatar_url,
            ..NewAccount::new(request.name, request.email, request.password)
        }
    }
}

/// Partial profile update; the role is changed through its own endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,

    pub password: Option<String>,
    pub phone: Option<String>,
    pub phone_country: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UpdateUserRequest> for AccountChanges {
    fn from(request: UpdateUserRequest) -> Self {
        AccountChanges {
            name: request.name,
            email: request.email,
            password: request.password,
            phone: request.phone,
            phone_country: request.phone_country,
            avatar_url: request.avatar_url,
        }
    }
}

/// Body of `PATCH /users/{id}/role`; `role` is accepted as an alias
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[serde(alias = "role")]
    pub new_role: Role,
}

/// Query string of `GET /users`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
}

impl From<UserQuery> for UserFilter {
    fn from(query: UserQuery) -> Self {
        UserFilter::new(query.search, query.role)
    }
}
