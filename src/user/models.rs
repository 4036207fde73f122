use serde::{Deserialize, Serialize};

/// A stored user record; the id is assigned by the repository on insertion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserModel {
    pub id: i64,
    pub name: String,
}

impl UserModel {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Location of this record relative to the service root
    pub fn location(&self) -> String {
        format!("/users/{}", self.id)
    }
}
