//! Request and response bodies of the Grova HTTP API.
//!
//! Field names are camelCase on the wire. Money travels as decimal strings
//! (`"5000.00"`) in the currency's precision so clients never round through
//! floating point.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Kes,
    Usd,
    Eur,
    Ngn,
    Ghs,
    Zar,
    Btc,
    Eth,
    Usdt,
    Credits,
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum WalletKind {
        Fiat,
        Crypto,
        Credits,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Wallet {
        pub id: Uuid,
        pub kind: WalletKind,
        pub currency: Currency,
        /// Decimal string with every fraction digit of the currency.
        pub balance: String,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletList {
        pub wallets: Vec<Wallet>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub kind: WalletKind,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub active: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Send,
        Receive,
        Convert,
        Mesh,
        CommunityContribution,
        Request,
        Deposit,
        Withdrawal,
        Payment,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
    }

    /// Body of `POST /transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferNew {
        pub from_wallet_id: Uuid,
        pub amount: String,
        pub currency: Currency,
        /// Defaults to `send`.
        #[serde(default, rename = "type")]
        pub kind: Option<TransactionKind>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub metadata: Option<serde_json::Value>,
        /// Username to credit in the same currency.
        #[serde(default)]
        pub recipient: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ConvertNew {
        pub from_wallet_id: Uuid,
        pub to_wallet_id: Uuid,
        pub amount: String,
        pub rate: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyRequestNew {
        pub payer: String,
        pub amount: String,
        pub currency: Currency,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestAnswer {
        pub accept: bool,
        /// Wallet to pay from; required to accept.
        #[serde(default)]
        pub wallet_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        pub from_user_id: Option<String>,
        pub to_user_id: Option<String>,
        pub from_wallet_id: Option<Uuid>,
        pub to_wallet_id: Option<Uuid>,
        pub amount: String,
        pub currency: Currency,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub status: TransactionStatus,
        pub description: Option<String>,
        pub metadata: serde_json::Value,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod coach {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DailyTipQuery {
        pub language: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DailyTip {
        pub tip: String,
        pub category: String,
        pub actionable_steps: Vec<String>,
        pub confidence: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Question {
        pub question: String,
        #[serde(default)]
        pub language: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Answer {
        pub response: String,
        pub category: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SessionListQuery {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Session {
        pub id: Uuid,
        pub question: String,
        pub response: String,
        pub category: String,
        pub language: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionList {
        pub sessions: Vec<Session>,
    }
}

pub mod voice {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VoiceCommand {
        /// Speech-to-text output of the client.
        #[serde(alias = "transcript")]
        pub audio_text: String,
        #[serde(default)]
        pub language: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct VoiceParameters {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recipient: Option<String>,
    }

    /// The parsed intent. Nothing is executed on the server's side.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoiceResult {
        pub intent: String,
        pub action: String,
        pub parameters: VoiceParameters,
        pub confidence: f64,
    }
}

pub mod agent {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashAgentQuery {
        pub location: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CashAgent {
        pub id: Uuid,
        pub name: String,
        pub phone: String,
        pub location: String,
        pub currency: Currency,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CashAgentList {
        pub cash_agents: Vec<CashAgent>,
    }
}

pub mod community {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MemberRole {
        Admin,
        Member,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ProposalStatus {
        Open,
        Approved,
        Rejected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        pub currency: Currency,
        /// Savings target as a decimal string.
        #[serde(default)]
        pub target: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Group {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub currency: Currency,
        pub pool: String,
        pub target: Option<String>,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupList {
        pub groups: Vec<Group>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Member {
        pub user_id: String,
        pub role: MemberRole,
        pub contributed: String,
        pub joined_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContributionNew {
        pub wallet_id: Uuid,
        pub amount: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProposalNew {
        pub title: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub amount: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Proposal {
        pub id: Uuid,
        pub group_id: Uuid,
        pub title: String,
        pub description: String,
        pub amount: Option<String>,
        pub votes_for: i64,
        pub votes_against: i64,
        pub status: ProposalStatus,
        pub created_by: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProposalList {
        pub proposals: Vec<Proposal>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VoteNew {
        pub approve: bool,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub title: String,
        pub target: String,
        pub currency: Currency,
        #[serde(default)]
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Goal {
        pub id: Uuid,
        pub title: String,
        pub target: String,
        pub current: String,
        pub currency: Currency,
        pub deadline: Option<NaiveDate>,
        /// Percent of the target reached, capped at 100.
        pub progress: u8,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalList {
        pub goals: Vec<Goal>,
    }

    /// Overwrites the saved amount.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub current: String,
    }
}
