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

//! Ledger commands, addressed by account id.

use crate::base::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Command {
    Open {
        account: AccountId,
        initial_balance: Decimal,
    },
    Deposit {
        account: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account: AccountId,
        amount: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
    Close {
        account: AccountId,
    },
}

impl Command {
    /// The account the command acts on; the source for transfers.
    pub fn account(&self) -> &AccountId {
        match self {
            Self::Open { account, .. } => account,
            Self::Deposit { account, .. } => account,
            Self::Withdraw { account, .. } => account,
            Self::Transfer { from, .. } => from,
            Self::Close { account } => account,
        }
    }

    /// The amount moved by the command; `None` for close.
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Open {
                initial_balance, ..
            } => Some(*initial_balance),
            Self::Deposit { amount, .. } => Some(*amount),
            Self::Withdraw { amount, .. } => Some(*amount),
            Self::Transfer { amount, .. } => Some(*amount),
            Self::Close { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open",
            Self::Deposit { .. } => "deposit",
            Self::Withdraw { .. } => "withdraw",
            Self::Transfer { .. } => "transfer",
            Self::Close { .. } => "close",
        }
    }
}
