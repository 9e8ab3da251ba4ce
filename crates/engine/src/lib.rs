//! Wallet ledger engine for Grova.
//!
//! The [`Engine`] is the only writer of wallet balances. Every
//! balance-affecting operation runs inside a single database transaction
//! whose first statement is a conditional debit, so concurrent requests
//! against one wallet are serialized by the store and can never overdraw it.

pub use cash_agents::CashAgent;
pub use coaching_sessions::CoachingSession;
pub use commands::{
    ContributionCmd, ConvertCmd, MoneyRequestCmd, RequestResponseCmd, TransferCmd,
};
pub use community_groups::CommunityGroup;
pub use community_members::{GroupMember, MemberRole};
pub use community_proposals::{Proposal, ProposalStatus};
pub use currency::{Currency, WalletKind};
pub use error::EngineError;
pub use goals::FinancialGoal;
pub use money::{Money, parse_rate};
pub use ops::{Engine, EngineBuilder, MAX_HISTORY_LIMIT};
pub use transactions::{Transaction, TransactionKind, TransactionStatus};
pub use wallets::Wallet;

mod cash_agents;
mod coaching_sessions;
mod commands;
mod community_groups;
mod community_members;
mod community_proposals;
mod currency;
mod error;
mod goals;
mod money;
mod ops;
mod proposal_votes;
mod transactions;
pub mod users;
mod util;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
