//! Provisioning outcome classification.

use shared_types::{RemoteError, UserRecord};

/// Result of one check-then-create provisioning run.
///
/// None of these is fatal. `Failed` is retried at the next sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    /// The lookup found an existing record.
    AlreadyProvisioned(UserRecord),
    /// This run created the record.
    Created(UserRecord),
    /// A concurrent run created the record first. `record` holds the winner
    /// when it could be re-read.
    DuplicateIgnored { record: Option<UserRecord> },
    /// Lookup or creation failed.
    Failed(RemoteError),
    /// The session changed before the result could be applied.
    Stale,
    /// The provisioning task was cancelled before finishing.
    Aborted,
}

impl ProvisioningOutcome {
    /// Metric and log label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyProvisioned(_) => "existing",
            Self::Created(_) => "created",
            Self::DuplicateIgnored { .. } => "duplicate",
            Self::Failed(_) => "failed",
            Self::Stale => "stale",
            Self::Aborted => "aborted",
        }
    }

    /// The record this outcome established, if any.
    #[must_use]
    pub fn record(&self) -> Option<&UserRecord> {
        match self {
            Self::AlreadyProvisioned(record) | Self::Created(record) => Some(record),
            Self::DuplicateIgnored { record } => record.as_ref(),
            Self::Failed(_) | Self::Stale | Self::Aborted => None,
        }
    }

    /// Whether a user record is known to exist afterwards.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        matches!(
            self,
            Self::AlreadyProvisioned(_) | Self::Created(_) | Self::DuplicateIgnored { .. }
        )
    }
}

/// Classify the lookup step. `Ok(None)` means creation must be attempted.
pub fn classify_lookup(
    result: Result<Option<UserRecord>, RemoteError>,
) -> Result<Option<ProvisioningOutcome>, ProvisioningOutcome> {
    match result {
        Ok(Some(record)) => Ok(Some(ProvisioningOutcome::AlreadyProvisioned(record))),
        Ok(None) => Ok(None),
        Err(e) => Err(ProvisioningOutcome::Failed(e)),
    }
}

/// Classify the creation step. A duplicate key is success-equivalent.
#[must_use]
pub fn classify_create(result: Result<UserRecord, RemoteError>) -> ProvisioningOutcome {
    match result {
        Ok(record) => ProvisioningOutcome::Created(record),
        Err(e) if e.is_duplicate_key() => ProvisioningOutcome::DuplicateIgnored { record: None },
        Err(e) => ProvisioningOutcome::Failed(e),
    }
}
