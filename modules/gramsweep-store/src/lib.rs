pub mod error;
pub mod object;
pub mod outcome;
pub mod queue;
pub mod secrets;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use error::{Result, StoreError};
pub use object::{ObjectStore, S3Objects};
pub use outcome::{record_or_warn, DynamoOutcomeLog, OutcomeLog};
pub use queue::{first_n, CandidateQueue, DynamoCandidateQueue, ScanPage};
pub use secrets::{CredentialSource, Credentials, SecretsManagerCredentials};
pub use session::{S3SessionStore, SessionLoad, SessionStore};
