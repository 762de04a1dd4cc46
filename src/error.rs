// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for the store contract and the service facade.
//!
//! [`StoreError`] is what an [`EntityStore`](crate::store::EntityStore) reports.
//! [`ServiceError`] is the taxonomy exposed to transport adapters; store causes
//! only ever reach adapters wrapped in [`ServiceError::Storage`].

use crate::base::{Entity, TournamentId, UserId};
use crate::store::Table;
use thiserror::Error;
use tracing::warn;

/// Failures reported by an entity store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The caller cancelled the operation before commit
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before commit
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A row lock could not be acquired within the configured timeout
    #[error("timed out waiting for lock on {table} row {id}")]
    LockTimeout { table: Table, id: i64 },

    /// Insert would duplicate a unique key
    #[error("unique constraint violated on {table}")]
    UniqueViolation { table: Table },

    /// Insert references a parent row that does not exist
    #[error("{table} row {id} referenced but missing")]
    ForeignKeyViolation { table: Table, id: i64 },

    /// Arithmetic on a stored quantity left its representable range
    #[error("value out of range for {table}.{column}")]
    OutOfRange { table: Table, column: &'static str },

    /// The store could not be reached or failed unexpectedly
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Stable classification of [`ServiceError`] for adapters.
///
/// Adapters map a kind to their wire format (HTTP status, GraphQL error code)
/// once, instead of matching on error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    AlreadyFinished,
    AlreadyJoined,
    Integrity,
    Storage,
}

/// Errors returned by the service facade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Referenced user or tournament does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: i64 },

    /// Caller input violates a constraint
    #[error("invalid input: {0}")]
    Validation(String),

    /// Join attempted on a finished tournament
    #[error("tournament {0} has already finished")]
    AlreadyFinished(TournamentId),

    /// The user is already a participant of the tournament
    #[error("user {user_id} has already joined tournament {tournament_id}")]
    AlreadyJoined {
        tournament_id: TournamentId,
        user_id: UserId,
    },

    /// The store holds a state the invariants rule out
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// The store failed; the caller may retry
    #[error("storage failure during {operation}: {source}")]
    Storage {
        operation: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    pub(crate) fn user_not_found(id: UserId) -> Self {
        ServiceError::NotFound {
            entity: Entity::User,
            id: id.0,
        }
    }

    pub(crate) fn tournament_not_found(id: TournamentId) -> Self {
        ServiceError::NotFound {
            entity: Entity::Tournament,
            id: id.0,
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotFound { .. } => ErrorKind::NotFound,
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::AlreadyFinished(_) => ErrorKind::AlreadyFinished,
            ServiceError::AlreadyJoined { .. } => ErrorKind::AlreadyJoined,
            ServiceError::Integrity(_) => ErrorKind::Integrity,
            ServiceError::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Only storage failures are worth retrying; everything else is terminal.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }

    /// Names the operation a storage failure happened in and logs it.
    ///
    /// Other variants already identify their subject and pass through untouched.
    pub(crate) fn during<F>(self, operation: F) -> Self
    where
        F: FnOnce() -> String,
    {
        match self {
            ServiceError::Storage { source, .. } => {
                let operation = operation();
                warn!(%operation, error = %source, "storage failure");
                ServiceError::Storage { operation, source }
            }
            other => other,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(source: StoreError) -> Self {
        ServiceError::Storage {
            operation: "transaction".to_owned(),
            source,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            ServiceError::user_not_found(UserId(3)).to_string(),
            "user 3 not found"
        );
        assert_eq!(
            ServiceError::tournament_not_found(TournamentId(9)).to_string(),
            "tournament 9 not found"
        );
        assert_eq!(
            ServiceError::AlreadyFinished(TournamentId(1)).to_string(),
            "tournament 1 has already finished"
        );
        assert_eq!(
            ServiceError::AlreadyJoined {
                tournament_id: TournamentId(2),
                user_id: UserId(5),
            }
            .to_string(),
            "user 5 has already joined tournament 2"
        );
        assert_eq!(
            StoreError::LockTimeout {
                table: Table::Tournaments,
                id: 4
            }
            .to_string(),
            "timed out waiting for lock on tournaments row 4"
        );
        assert_eq!(
            StoreError::OutOfRange {
                table: Table::Users,
                column: "balance"
            }
            .to_string(),
            "value out of range for users.balance"
        );
    }

    #[test]
    fn kinds_and_retryability() {
        let storage = ServiceError::from(StoreError::Unavailable("down".into()));
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert!(storage.is_retryable());

        let finished = ServiceError::AlreadyFinished(TournamentId(1));
        assert_eq!(finished.kind(), ErrorKind::AlreadyFinished);
        assert!(!finished.is_retryable());
        assert!(!ServiceError::Validation("x".into()).is_retryable());
    }

    #[test]
    fn during_only_rewrites_storage_failures() {
        let err = ServiceError::from(StoreError::Cancelled).during(|| "get user 1".to_owned());
        assert_eq!(
            err.to_string(),
            "storage failure during get user 1: operation cancelled"
        );
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("operation cancelled".to_owned())
        );

        let not_found = ServiceError::user_not_found(UserId(1)).during(|| unreachable!());
        assert_eq!(not_found, ServiceError::user_not_found(UserId(1)));
    }
}
