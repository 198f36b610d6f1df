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

//! Account registry.
//!
//! The [`Ledger`] maps account ids to shared [`Account`]s and routes
//! [`Command`]s to them. It adds id lookup and duplicate-id rejection; every
//! balance rule lives in [`Account`].
//!
//! # Thread Safety
//!
//! Accounts are kept in a [`DashMap`] as `Arc<Account>`. A lookup clones the
//! `Arc` and releases the map shard before any account lock is taken, so map
//! access never nests inside an account lock.

use crate::account::Account;
use crate::base::AccountId;
use crate::{Command, LedgerError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

/// Id-keyed collection of accounts.
pub struct Ledger {
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            accounts: DashMap::new(),
        }
    }

    /// Applies a command to the account(s) it names.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched operation returns; see [`Ledger::open`],
    /// [`Ledger::deposit`], [`Ledger::withdraw`], [`Ledger::transfer`] and
    /// [`Ledger::close`].
    pub fn apply(&self, command: Command) -> Result<(), LedgerError> {
        match command {
            Command::Open {
                account,
                initial_balance,
            } => self.open(account, initial_balance).map(|_| ()),
            Command::Deposit { account, amount } => self.deposit(&account, amount),
            Command::Withdraw { account, amount } => self.withdraw(&account, amount),
            Command::Transfer { from, to, amount } => self.transfer(&from, &to, amount),
            Command::Close { account } => self.close(&account),
        }
    }

    /// Opens a new account under `id`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DuplicateAccount`] - `id` is already taken.
    /// - [`LedgerError::NegativeBalance`] - `initial_balance` is below zero.
    pub fn open(
        &self,
        id: AccountId,
        initial_balance: Decimal,
    ) -> Result<Arc<Account>, LedgerError> {
        // Entry API keeps check-and-insert atomic under concurrent opens.
        match self.accounts.entry(id) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateAccount),
            Entry::Vacant(entry) => {
                let account = Account::open(entry.key().clone(), initial_balance)?;
                let account = Arc::new(account);
                entry.insert(Arc::clone(&account));
                debug!(account = %account.id(), %initial_balance, "account opened");
                Ok(account)
            }
        }
    }

    pub fn deposit(&self, id: &AccountId, amount: Decimal) -> Result<(), LedgerError> {
        self.lookup(id)?.deposit(amount)
    }

    pub fn withdraw(&self, id: &AccountId, amount: Decimal) -> Result<(), LedgerError> {
        self.lookup(id)?.withdraw(amount)
    }

    /// Moves `amount` between two registered accounts.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AccountNotFound`] - either id is unknown.
    /// - anything [`Account::transfer`] returns.
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;
        source.transfer(&target, amount)
    }

    pub fn close(&self, id: &AccountId) -> Result<(), LedgerError> {
        self.lookup(id)?.close();
        Ok(())
    }

    /// Retrieves an account by id.
    ///
    /// Returns `None` if no account exists for the given id.
    pub fn get(&self, id: &AccountId) -> Option<Arc<Account>> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Returns every account, sorted by id.
    pub fn accounts(&self) -> Vec<Arc<Account>> {
        let mut accounts: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    /// Sum of all balances, open and closed.
    pub fn total_balance(&self) -> Decimal {
        self.accounts().iter().map(|account| account.balance()).sum()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn lookup(&self, id: &AccountId) -> Result<Arc<Account>, LedgerError> {
        self.get(id).ok_or(LedgerError::AccountNotFound)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
