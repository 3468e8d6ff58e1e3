mod models;
mod repo_client;

pub use models::*;
pub use repo_client::RepoClient;
pub use repo_client::RepoClientError;
pub use repo_client::DEFAULT_API_URL;
