use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
}

impl User {
    /// The crew lead every successful login resolves to.
    pub fn foreman() -> Self {
        Self {
            id: "u1".to_string(),
            name: "Mike Foreman".to_string(),
            role: "Foreman".to_string(),
            email: "mike@fenceapp.com".to_string(),
        }
    }
}
