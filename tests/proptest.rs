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

//! Property-based tests for accounts and the ledger.
//!
//! These tests verify invariants that should hold for any sequence of
//! operations, valid or not.

use account_ledger::{Account, AccountId, Command, ErrorKind, Ledger, LedgerError};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.0001 to 1000 with 4 decimal places).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Generate a non-negative balance, zero included.
fn arb_balance() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000_000i64).prop_map(|units| Decimal::new(units, 4))
}

/// Generate a zero or negative amount.
fn arb_non_positive() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..=0i64).prop_map(|units| Decimal::new(units, 4))
}

/// Generate an id that is not blank.
fn arb_id() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-z0-9]{1,12}[ ]{0,2}"
}

#[derive(Debug, Clone)]
enum Op {
    Deposit(Decimal),
    Withdraw(Decimal),
    Close,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1_000_000i64..=10_000_000i64).prop_map(|u| Op::Deposit(Decimal::new(u, 4))),
        4 => (-1_000_000i64..=10_000_000i64).prop_map(|u| Op::Withdraw(Decimal::new(u, 4))),
        1 => Just(Op::Close),
    ]
}

// =============================================================================
// Construction Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Valid construction keeps the id and balance and starts active.
    #[test]
    fn construction_preserves_balance(id in arb_id(), balance in arb_balance()) {
        let account = Account::with_balance(id.clone(), balance).unwrap();
        prop_assert_eq!(account.balance(), balance);
        prop_assert_eq!(account.id().as_str(), id.as_str());
        prop_assert!(account.is_active());
    }

    /// Blank ids are always rejected as invalid arguments.
    #[test]
    fn blank_ids_are_rejected(id in "[ \t]{0,8}", balance in arb_balance()) {
        let err = Account::with_balance(id, balance).unwrap_err();
        prop_assert_eq!(err, LedgerError::BlankAccountId);
    }

    /// Negative initial balances are always rejected as invalid arguments.
    #[test]
    fn negative_balances_are_rejected(id in arb_id(), units in 1i64..=10_000_000i64) {
        let err = Account::with_balance(id, Decimal::new(-units, 4)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

// =============================================================================
// Balance Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Deposits add exactly their amounts.
    #[test]
    fn deposits_sum_to_balance(
        initial in arb_balance(),
        amounts in prop::collection::vec(arb_amount(), 1..20),
    ) {
        let account = Account::with_balance("ACC001", initial).unwrap();
        for amount in &amounts {
            account.deposit(*amount).unwrap();
        }
        let expected: Decimal = initial + amounts.iter().copied().sum::<Decimal>();
        prop_assert_eq!(account.balance(), expected);
    }

    /// Withdrawals within the balance subtract exactly; larger ones change nothing.
    #[test]
    fn withdraw_is_exact_or_rejected(balance in arb_balance(), amount in arb_amount()) {
        let account = Account::with_balance("ACC001", balance).unwrap();
        let result = account.withdraw(amount);

        if amount <= balance {
            prop_assert!(result.is_ok());
            prop_assert_eq!(account.balance(), balance - amount);
        } else {
            prop_assert_eq!(result, Err(LedgerError::InsufficientFunds));
            prop_assert_eq!(account.balance(), balance);
        }
    }

    /// Non-positive amounts are rejected without touching the balance.
    #[test]
    fn non_positive_amounts_are_rejected(balance in arb_balance(), amount in arb_non_positive()) {
        let account = Account::with_balance("ACC001", balance).unwrap();
        prop_assert_eq!(account.deposit(amount), Err(LedgerError::InvalidAmount));
        prop_assert_eq!(account.withdraw(amount), Err(LedgerError::InvalidAmount));
        prop_assert_eq!(account.balance(), balance);
    }

    /// Balance never goes negative and closed accounts never change, for any
    /// sequence of operations.
    #[test]
    fn arbitrary_sequences_keep_invariants(
        initial in arb_balance(),
        ops in prop::collection::vec(arb_op(), 0..40),
    ) {
        let account = Account::with_balance("ACC001", initial).unwrap();
        let mut model = initial;
        let mut active = true;

        for op in ops {
            match op {
                Op::Deposit(amount) => {
                    let result = account.deposit(amount);
                    if active && amount > Decimal::ZERO {
                        prop_assert!(result.is_ok());
                        model += amount;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Withdraw(amount) => {
                    let result = account.withdraw(amount);
                    if active && amount > Decimal::ZERO && amount <= model {
                        prop_assert!(result.is_ok());
                        model -= amount;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Op::Close => {
                    account.close();
                    active = false;
                }
            }
            prop_assert!(account.balance() >= Decimal::ZERO);
            prop_assert_eq!(account.balance(), model);
            prop_assert_eq!(account.is_active(), active);
        }
    }
}

// =============================================================================
// Transfer Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Transfers conserve the pair's total whether they succeed or fail.
    #[test]
    fn transfer_conserves_total(
        from_balance in arb_balance(),
        to_balance in arb_balance(),
        amount in arb_amount(),
    ) {
        let source = Account::with_balance("ACC001", from_balance).unwrap();
        let target = Account::with_balance("ACC002", to_balance).unwrap();
        let before = source.balance() + target.balance();

        let result = source.transfer(&target, amount);

        prop_assert_eq!(source.balance() + target.balance(), before);
        if amount <= from_balance {
            prop_assert!(result.is_ok());
            prop_assert_eq!(source.balance(), from_balance - amount);
            prop_assert_eq!(target.balance(), to_balance + amount);
        } else {
            prop_assert_eq!(result, Err(LedgerError::InsufficientFunds));
            prop_assert_eq!(target.balance(), to_balance);
        }
    }

    /// Transfers touching a closed account never move money.
    #[test]
    fn closed_participant_blocks_transfer(
        close_source in any::<bool>(),
        amount in arb_amount(),
    ) {
        let source = Account::with_balance("ACC001", Decimal::new(10_000_000, 4)).unwrap();
        let target = Account::with_balance("ACC002", Decimal::ZERO).unwrap();
        if close_source { source.close() } else { target.close() }

        let err = source.transfer(&target, amount).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidState);
        prop_assert_eq!(source.balance(), Decimal::new(10_000_000, 4));
        prop_assert_eq!(target.balance(), Decimal::ZERO);
    }
}

// =============================================================================
// Ledger Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of transfers between registered accounts keeps the total.
    #[test]
    fn ledger_total_is_conserved(
        balances in prop::collection::vec(arb_balance(), 2..6),
        transfers in prop::collection::vec((0usize..6, 0usize..6, arb_amount()), 0..50),
    ) {
        let ledger = Ledger::new();
        let ids: Vec<AccountId> = (0..balances.len())
            .map(|i| AccountId::new(format!("ACC{i:03}")).unwrap())
            .collect();
        for (id, balance) in ids.iter().zip(&balances) {
            ledger.apply(Command::Open { account: id.clone(), initial_balance: *balance }).unwrap();
        }
        let total = ledger.total_balance();

        for (from, to, amount) in transfers {
            let from = ids[from % ids.len()].clone();
            let to = ids[to % ids.len()].clone();
            let _ = ledger.apply(Command::Transfer { from, to, amount });
        }

        prop_assert_eq!(ledger.total_balance(), total);
        for account in ledger.accounts() {
            prop_assert!(account.balance() >= Decimal::ZERO);
        }
    }
}
