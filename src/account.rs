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

//! Account management.
//!
//! Implemented State Machine
//!
//! ```text
//!  Active ──close──► Closed
//!    │ ▲              (terminal, read-only)
//!    └─┘ deposit / withdraw / transfer
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use account_ledger::Account;
//!
//! let account = Account::with_balance("ACC001", dec!(100.00)).unwrap();
//! account.deposit(dec!(50.00)).unwrap();
//! assert_eq!(account.balance(), dec!(150.00));
//! ```

use crate::LedgerError;
use crate::base::AccountId;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

/// Lifecycle state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    Active,
    Closed,
}

#[derive(Debug)]
struct AccountData {
    balance: Decimal,
    active: bool,
}

impl AccountData {
    fn new(balance: Decimal) -> Self {
        Self {
            balance,
            active: true,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Increases balance.
    fn deposit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if !self.active {
            return Err(LedgerError::AccountClosed);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        self.balance += amount;
        self.assert_invariants();
        Ok(())
    }

    /// Decreases balance.
    fn withdraw(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if !self.active {
            return Err(LedgerError::AccountClosed);
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance -= amount;
        self.assert_invariants();
        Ok(())
    }

    /// Flips to closed. Closing twice is a no-op.
    fn close(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

/// Ledger account.
///
/// All operations take `&self`; the mutable part lives behind a mutex so an
/// account can be shared across threads through an `Arc`.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    inner: Mutex<AccountData>,
}

impl Account {
    const DECIMAL_PRECISION: u32 = 4;

    /// Opens an active account with a zero balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::BlankAccountId`] - `id` is empty or whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, LedgerError> {
        Self::with_balance(id, Decimal::ZERO)
    }

    /// Opens an active account holding `initial_balance`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::BlankAccountId`] - `id` is empty or whitespace.
    /// - [`LedgerError::NegativeBalance`] - `initial_balance` is below zero.
    pub fn with_balance(
        id: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<Self, LedgerError> {
        let id = AccountId::new(id)?;
        Self::open(id, initial_balance)
    }

    /// Same as [`Account::with_balance`] for an already validated id.
    pub fn open(id: AccountId, initial_balance: Decimal) -> Result<Self, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::NegativeBalance);
        }
        Ok(Self {
            id,
            inner: Mutex::new(AccountData::new(initial_balance)),
        })
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().active
    }

    pub fn status(&self) -> AccountStatus {
        if self.is_active() {
            AccountStatus::Active
        } else {
            AccountStatus::Closed
        }
    }

    /// Credits `amount`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AccountClosed`] - account is closed.
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero or negative.
    pub fn deposit(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.inner.lock().deposit(amount)
    }

    /// Debits `amount`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AccountClosed`] - account is closed.
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`LedgerError::InsufficientFunds`] - `amount` exceeds the balance.
    pub fn withdraw(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.inner.lock().withdraw(amount)
    }

    /// Moves `amount` from this account to `target`.
    ///
    /// Both accounts stay locked for the whole withdraw + deposit, so either
    /// both balances change or neither does. Locks are always taken in id
    /// order, which keeps opposing transfers between the same pair from
    /// deadlocking.
    ///
    /// Transferring to the same account runs the withdraw and deposit under
    /// its single lock, leaving the balance unchanged on success.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// - [`LedgerError::AccountClosed`] - this account is closed.
    /// - [`LedgerError::TargetAccountClosed`] - `target` is closed.
    /// - [`LedgerError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`LedgerError::InsufficientFunds`] - `amount` exceeds this balance.
    pub fn transfer(&self, target: &Account, amount: Decimal) -> Result<(), LedgerError> {
        if std::ptr::eq(self, target) {
            let mut data = self.inner.lock();
            data.withdraw(amount)?;
            data.deposit(amount)?;
            debug!(account = %self.id, %amount, "self transfer applied");
            return Ok(());
        }

        let (mut source, mut dest) = self.lock_pair(target);
        if !source.active {
            return Err(LedgerError::AccountClosed);
        }
        if !dest.active {
            return Err(LedgerError::TargetAccountClosed);
        }

        source.withdraw(amount)?;
        // Cannot fail: target is active and amount was validated by withdraw.
        dest.deposit(amount)?;

        debug!(from = %self.id, to = %target.id, %amount, "transfer applied");
        Ok(())
    }

    /// Closes the account. Irreversible; closing a closed account is a no-op.
    pub fn close(&self) {
        if self.inner.lock().close() {
            debug!(account = %self.id, "account closed");
        }
    }

    /// Locks `self` and `other`, returned in that order, acquiring them by
    /// ascending id. Distinct accounts sharing an id are ordered by address.
    fn lock_pair<'a>(
        &'a self,
        other: &'a Account,
    ) -> (MutexGuard<'a, AccountData>, MutexGuard<'a, AccountData>) {
        if self.lock_order() <= other.lock_order() {
            let first = self.inner.lock();
            let second = other.inner.lock();
            (first, second)
        } else {
            let second = other.inner.lock();
            let first = self.inner.lock();
            (first, second)
        }
    }

    fn lock_order(&self) -> (&AccountId, usize) {
        (&self.id, self as *const Self as usize)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Account", 3)?;
        state.serialize_field("account", &self.id)?;
        state.serialize_field(
            "balance",
            &data.balance.round_dp(Account::DECIMAL_PRECISION),
        )?;
        state.serialize_field("active", &data.active)?;
        state.end()
    }
}
