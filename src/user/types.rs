use serde::{Deserialize, Serialize};

/// Request payload for creating or renaming a user.
/// A missing `name` deserializes as empty so it is rejected as a bad request;
/// any `id` the client sends is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub name: String,
}

/// Response for a successful deletion
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DeleteUserResponse {
    pub message: String,
}
