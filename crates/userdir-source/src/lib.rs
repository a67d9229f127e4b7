mod error;
mod http;

pub use error::*;
pub use http::*;

use async_trait::async_trait;
use userdir_types::ProfileRecord;

/// Anything that can produce the record list for a view.
///
/// The view calls this exactly once per lifetime.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<ProfileRecord>, FetchError>;
}
