use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}
