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

//! Error types for ledger operations.
//!
//! Every [`LedgerError`] falls into one of two [`ErrorKind`]s: the caller
//! passed something malformed, or the account's current state forbids the
//! operation. Both are detected before any balance is touched.

use thiserror::Error;

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input to an operation.
    InvalidArgument,
    /// Operation not permitted in the account's current state.
    InvalidState,
}

/// Ledger operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Account id is empty or only whitespace
    #[error("account id cannot be blank")]
    BlankAccountId,

    /// Initial balance is below zero
    #[error("initial balance cannot be negative")]
    NegativeBalance,

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Amount field is missing for deposit, withdrawal or transfer
    #[error("missing amount for deposit/withdrawal/transfer")]
    MissingAmount,

    /// Transfer has no target account
    #[error("transfer target is required")]
    MissingTarget,

    /// Referenced account does not exist
    #[error("account not found")]
    AccountNotFound,

    /// An account with this id already exists
    #[error("account already exists")]
    DuplicateAccount,

    /// Operation name is not recognised
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Account is closed
    #[error("account is closed")]
    AccountClosed,

    /// Transfer target is closed
    #[error("target account is closed")]
    TargetAccountClosed,

    /// Withdrawal would exceed the balance
    #[error("insufficient funds")]
    InsufficientFunds,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountClosed | Self::TargetAccountClosed | Self::InsufficientFunds => {
                ErrorKind::InvalidState
            }
            Self::BlankAccountId
            | Self::NegativeBalance
            | Self::InvalidAmount
            | Self::MissingAmount
            | Self::MissingTarget
            | Self::AccountNotFound
            | Self::DuplicateAccount
            | Self::UnknownOperation(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }
}
