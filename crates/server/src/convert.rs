//! Mapping between engine values and their wire representations.

use api_types::{
    Currency as ApiCurrency,
    agent::CashAgent,
    coach::Session,
    community::{Group, Member, MemberRole as ApiRole, Proposal, ProposalStatus as ApiProposalStatus},
    goal::Goal,
    transaction::{TransactionKind as ApiKind, TransactionStatus as ApiStatus, TransactionView},
    wallet::{Wallet, WalletKind as ApiWalletKind},
};
use engine::Money;

pub(crate) fn currency_from_api(currency: ApiCurrency) -> engine::Currency {
    match currency {
        ApiCurrency::Kes => engine::Currency::Kes,
        ApiCurrency::Usd => engine::Currency::Usd,
        ApiCurrency::Eur => engine::Currency::Eur,
        ApiCurrency::Ngn => engine::Currency::Ngn,
        ApiCurrency::Ghs => engine::Currency::Ghs,
        ApiCurrency::Zar => engine::Currency::Zar,
        ApiCurrency::Btc => engine::Currency::Btc,
        ApiCurrency::Eth => engine::Currency::Eth,
        ApiCurrency::Usdt => engine::Currency::Usdt,
        ApiCurrency::Credits => engine::Currency::Credits,
    }
}

pub(crate) fn map_currency(currency: engine::Currency) -> ApiCurrency {
    match currency {
        engine::Currency::Kes => ApiCurrency::Kes,
        engine::Currency::Usd => ApiCurrency::Usd,
        engine::Currency::Eur => ApiCurrency::Eur,
        engine::Currency::Ngn => ApiCurrency::Ngn,
        engine::Currency::Ghs => ApiCurrency::Ghs,
        engine::Currency::Zar => ApiCurrency::Zar,
        engine::Currency::Btc => ApiCurrency::Btc,
        engine::Currency::Eth => ApiCurrency::Eth,
        engine::Currency::Usdt => ApiCurrency::Usdt,
        engine::Currency::Credits => ApiCurrency::Credits,
    }
}

pub(crate) fn wallet_kind_from_api(kind: ApiWalletKind) -> engine::WalletKind {
    match kind {
        ApiWalletKind::Fiat => engine::WalletKind::Fiat,
        ApiWalletKind::Crypto => engine::WalletKind::Crypto,
        ApiWalletKind::Credits => engine::WalletKind::Credits,
    }
}

fn map_wallet_kind(kind: engine::WalletKind) -> ApiWalletKind {
    match kind {
        engine::WalletKind::Fiat => ApiWalletKind::Fiat,
        engine::WalletKind::Crypto => ApiWalletKind::Crypto,
        engine::WalletKind::Credits => ApiWalletKind::Credits,
    }
}

pub(crate) fn kind_from_api(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Send => engine::TransactionKind::Send,
        ApiKind::Receive => engine::TransactionKind::Receive,
        ApiKind::Convert => engine::TransactionKind::Convert,
        ApiKind::Mesh => engine::TransactionKind::Mesh,
        ApiKind::CommunityContribution => engine::TransactionKind::CommunityContribution,
        ApiKind::Request => engine::TransactionKind::Request,
        ApiKind::Deposit => engine::TransactionKind::Deposit,
        ApiKind::Withdrawal => engine::TransactionKind::Withdrawal,
        ApiKind::Payment => engine::TransactionKind::Payment,
    }
}

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Send => ApiKind::Send,
        engine::TransactionKind::Receive => ApiKind::Receive,
        engine::TransactionKind::Convert => ApiKind::Convert,
        engine::TransactionKind::Mesh => ApiKind::Mesh,
        engine::TransactionKind::CommunityContribution => ApiKind::CommunityContribution,
        engine::TransactionKind::Request => ApiKind::Request,
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Withdrawal => ApiKind::Withdrawal,
        engine::TransactionKind::Payment => ApiKind::Payment,
    }
}

fn map_status(status: engine::TransactionStatus) -> ApiStatus {
    match status {
        engine::TransactionStatus::Pending => ApiStatus::Pending,
        engine::TransactionStatus::Completed => ApiStatus::Completed,
        engine::TransactionStatus::Failed => ApiStatus::Failed,
    }
}

fn map_role(role: engine::MemberRole) -> ApiRole {
    match role {
        engine::MemberRole::Admin => ApiRole::Admin,
        engine::MemberRole::Member => ApiRole::Member,
    }
}

fn map_proposal_status(status: engine::ProposalStatus) -> ApiProposalStatus {
    match status {
        engine::ProposalStatus::Open => ApiProposalStatus::Open,
        engine::ProposalStatus::Approved => ApiProposalStatus::Approved,
        engine::ProposalStatus::Rejected => ApiProposalStatus::Rejected,
    }
}

pub(crate) fn wallet_view(wallet: engine::Wallet) -> Wallet {
    Wallet {
        id: wallet.id,
        kind: map_wallet_kind(wallet.kind),
        currency: map_currency(wallet.currency),
        balance: wallet.money().amount_string(),
        active: wallet.active,
        created_at: wallet.created_at,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        amount: tx.amount().amount_string(),
        currency: map_currency(tx.currency),
        kind: map_kind(tx.kind),
        status: map_status(tx.status),
        from_user_id: tx.from_user_id,
        to_user_id: tx.to_user_id,
        from_wallet_id: tx.from_wallet_id,
        to_wallet_id: tx.to_wallet_id,
        description: tx.description,
        metadata: tx.metadata,
        created_at: tx.created_at,
    }
}

pub(crate) fn group_view(group: engine::CommunityGroup) -> Group {
    Group {
        id: group.id,
        pool: group.pool().amount_string(),
        target: group
            .target_minor
            .map(|minor| Money::new(minor, group.currency).amount_string()),
        currency: map_currency(group.currency),
        name: group.name,
        description: group.description,
        created_by: group.created_by,
        created_at: group.created_at,
    }
}

pub(crate) fn member_view(member: engine::GroupMember, currency: engine::Currency) -> Member {
    Member {
        user_id: member.user_id,
        role: map_role(member.role),
        contributed: Money::new(member.contributed_minor, currency).amount_string(),
        joined_at: member.joined_at,
    }
}

pub(crate) fn proposal_view(proposal: engine::Proposal, currency: engine::Currency) -> Proposal {
    Proposal {
        id: proposal.id,
        group_id: proposal.group_id,
        title: proposal.title,
        description: proposal.description,
        amount: proposal
            .amount_minor
            .map(|minor| Money::new(minor, currency).amount_string()),
        votes_for: proposal.votes_for,
        votes_against: proposal.votes_against,
        status: map_proposal_status(proposal.status),
        created_by: proposal.created_by,
        created_at: proposal.created_at,
    }
}

pub(crate) fn goal_view(goal: engine::FinancialGoal) -> Goal {
    Goal {
        id: goal.id,
        target: goal.target().amount_string(),
        current: goal.current().amount_string(),
        currency: map_currency(goal.currency),
        progress: goal.progress_percent(),
        title: goal.title,
        deadline: goal.deadline,
        created_at: goal.created_at,
    }
}

pub(crate) fn session_view(session: engine::CoachingSession) -> Session {
    Session {
        id: session.id,
        question: session.question,
        response: session.response,
        category: session.category,
        language: session.language,
        created_at: session.created_at,
    }
}

pub(crate) fn cash_agent_view(agent: engine::CashAgent) -> CashAgent {
    CashAgent {
        id: agent.id,
        name: agent.name,
        phone: agent.phone,
        location: agent.location,
        currency: map_currency(agent.currency),
        active: agent.active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currencies_map_both_ways() {
        for currency in [
            ApiCurrency::Kes,
            ApiCurrency::Btc,
            ApiCurrency::Usdt,
            ApiCurrency::Credits,
        ] {
            assert_eq!(map_currency(currency_from_api(currency)), currency);
        }
    }

    #[test]
    fn wallet_balance_uses_currency_precision() {
        let wallet = engine::Wallet::new("amina".to_string(), engine::Currency::Btc, 250_000);
        let view = wallet_view(wallet);
        assert_eq!(view.balance, "0.00250000");
        assert_eq!(view.kind, ApiWalletKind::Crypto);
    }
}
