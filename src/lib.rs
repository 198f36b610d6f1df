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

//! # Account Ledger
//!
//! This library models bank accounts with a non-negative balance and a
//! one-way active/closed lifecycle, supporting deposits, withdrawals and
//! transfers between accounts.
//!
//! ## Core Components
//!
//! - [`Account`]: A single account with balance and lifecycle rules
//! - [`Ledger`]: Id-keyed registry that routes [`Command`]s to accounts
//! - [`LedgerError`]: Errors, each classified by [`ErrorKind`]
//!
//! ## Example
//!
//! ```
//! use account_ledger::{Account, ErrorKind};
//! use rust_decimal_macros::dec;
//!
//! let source = Account::with_balance("ACC001", dec!(100.0)).unwrap();
//! let target = Account::with_balance("ACC002", dec!(50.0)).unwrap();
//!
//! source.transfer(&target, dec!(30.0)).unwrap();
//! assert_eq!(source.balance(), dec!(70.0));
//! assert_eq!(target.balance(), dec!(80.0));
//!
//! source.close();
//! let err = source.deposit(dec!(10.0)).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidState);
//! ```
//!
//! ## Thread Safety
//!
//! Each account guards its state with its own mutex. Transfers lock both
//! accounts in id order, so concurrent transfers never deadlock and are
//! atomic across the pair.

pub mod account;
mod base;
mod command;
pub mod error;
mod ledger;

pub use account::{Account, AccountStatus};
pub use base::AccountId;
pub use command::Command;
pub use error::{ErrorKind, LedgerError};
pub use ledger::Ledger;
