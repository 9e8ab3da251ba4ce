//! Initial schema for Grova.
//!
//! - `users`: credentials checked by the server
//! - `wallets`: one balance per user, kind and currency
//! - `transactions`: append-only money movement log
//! - `community_groups`, `community_members`, `community_proposals`,
//!   `proposal_votes`: savings groups
//! - `financial_goals`: personal targets, not linked to wallets
//! - `ai_coaching_sessions`: advisor question log

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    DisplayName,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    UserId,
    Kind,
    Currency,
    Balance,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    FromUserId,
    ToUserId,
    FromWalletId,
    ToWalletId,
    AmountMinor,
    Currency,
    Kind,
    Status,
    Description,
    Metadata,
    CreatedAt,
}

#[derive(Iden)]
enum CommunityGroups {
    Table,
    Id,
    Name,
    Description,
    Currency,
    PoolMinor,
    TargetMinor,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum CommunityMembers {
    Table,
    GroupId,
    UserId,
    Role,
    ContributedMinor,
    JoinedAt,
}

#[derive(Iden)]
enum CommunityProposals {
    Table,
    Id,
    GroupId,
    Title,
    Description,
    AmountMinor,
    VotesFor,
    VotesAgainst,
    Status,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ProposalVotes {
    Table,
    ProposalId,
    UserId,
    Approve,
    VotedAt,
}

#[derive(Iden)]
enum FinancialGoals {
    Table,
    Id,
    UserId,
    Title,
    TargetMinor,
    CurrentMinor,
    Currency,
    Deadline,
    CreatedAt,
}

#[derive(Iden)]
enum AiCoachingSessions {
    Table,
    Id,
    UserId,
    Question,
    Response,
    Category,
    Language,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wallets::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Wallets::UserId).string().not_null())
                    .col(ColumnDef::new(Wallets::Kind).string().not_null())
                    .col(ColumnDef::new(Wallets::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Wallets::Balance).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Wallets::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Wallets::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallets-user_id")
                            .from(Wallets::Table, Wallets::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-user_id-kind-currency-unique")
                    .table(Wallets::Table)
                    .col(Wallets::UserId)
                    .col(Wallets::Kind)
                    .col(Wallets::Currency)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::FromUserId).string())
                    .col(ColumnDef::new(Transactions::ToUserId).string())
                    .col(ColumnDef::new(Transactions::FromWalletId).string())
                    .col(ColumnDef::new(Transactions::ToWalletId).string())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Transactions::AmountMinor).gt(0)),
                    )
                    .col(ColumnDef::new(Transactions::Currency).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(ColumnDef::new(Transactions::Description).string())
                    .col(ColumnDef::new(Transactions::Metadata).json().not_null())
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-from_wallet_id")
                            .from(Transactions::Table, Transactions::FromWalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-to_wallet_id")
                            .from(Transactions::Table, Transactions::ToWalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-from_user_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::FromUserId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-to_user_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::ToUserId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Community groups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CommunityGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommunityGroups::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommunityGroups::Name).string().not_null())
                    .col(ColumnDef::new(CommunityGroups::Description).string())
                    .col(ColumnDef::new(CommunityGroups::Currency).string().not_null())
                    .col(
                        ColumnDef::new(CommunityGroups::PoolMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CommunityGroups::TargetMinor).big_integer())
                    .col(ColumnDef::new(CommunityGroups::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(CommunityGroups::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-community_groups-created_by")
                            .from(CommunityGroups::Table, CommunityGroups::CreatedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommunityMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CommunityMembers::GroupId).string().not_null())
                    .col(ColumnDef::new(CommunityMembers::UserId).string().not_null())
                    .col(ColumnDef::new(CommunityMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(CommunityMembers::ContributedMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CommunityMembers::JoinedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CommunityMembers::GroupId)
                            .col(CommunityMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-community_members-group_id")
                            .from(CommunityMembers::Table, CommunityMembers::GroupId)
                            .to(CommunityGroups::Table, CommunityGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-community_members-user_id")
                            .from(CommunityMembers::Table, CommunityMembers::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-community_members-user_id")
                    .table(CommunityMembers::Table)
                    .col(CommunityMembers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommunityProposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommunityProposals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommunityProposals::GroupId).string().not_null())
                    .col(ColumnDef::new(CommunityProposals::Title).string().not_null())
                    .col(
                        ColumnDef::new(CommunityProposals::Description)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommunityProposals::AmountMinor).big_integer())
                    .col(
                        ColumnDef::new(CommunityProposals::VotesFor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CommunityProposals::VotesAgainst)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CommunityProposals::Status).string().not_null())
                    .col(
                        ColumnDef::new(CommunityProposals::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommunityProposals::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-community_proposals-group_id")
                            .from(CommunityProposals::Table, CommunityProposals::GroupId)
                            .to(CommunityGroups::Table, CommunityGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-community_proposals-group_id")
                    .table(CommunityProposals::Table)
                    .col(CommunityProposals::GroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProposalVotes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProposalVotes::ProposalId).string().not_null())
                    .col(ColumnDef::new(ProposalVotes::UserId).string().not_null())
                    .col(ColumnDef::new(ProposalVotes::Approve).boolean().not_null())
                    .col(ColumnDef::new(ProposalVotes::VotedAt).timestamp().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProposalVotes::ProposalId)
                            .col(ProposalVotes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-proposal_votes-proposal_id")
                            .from(ProposalVotes::Table, ProposalVotes::ProposalId)
                            .to(CommunityProposals::Table, CommunityProposals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Goals and coaching log
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FinancialGoals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FinancialGoals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FinancialGoals::UserId).string().not_null())
                    .col(ColumnDef::new(FinancialGoals::Title).string().not_null())
                    .col(
                        ColumnDef::new(FinancialGoals::TargetMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FinancialGoals::CurrentMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(FinancialGoals::Currency).string().not_null())
                    .col(ColumnDef::new(FinancialGoals::Deadline).date())
                    .col(
                        ColumnDef::new(FinancialGoals::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-financial_goals-user_id")
                            .from(FinancialGoals::Table, FinancialGoals::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-financial_goals-user_id")
                    .table(FinancialGoals::Table)
                    .col(FinancialGoals::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AiCoachingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiCoachingSessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AiCoachingSessions::UserId).string().not_null())
                    .col(ColumnDef::new(AiCoachingSessions::Question).text().not_null())
                    .col(ColumnDef::new(AiCoachingSessions::Response).text().not_null())
                    .col(ColumnDef::new(AiCoachingSessions::Category).string().not_null())
                    .col(ColumnDef::new(AiCoachingSessions::Language).string().not_null())
                    .col(
                        ColumnDef::new(AiCoachingSessions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ai_coaching_sessions-user_id")
                            .from(AiCoachingSessions::Table, AiCoachingSessions::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ai_coaching_sessions-user_id-created_at")
                    .table(AiCoachingSessions::Table)
                    .col(AiCoachingSessions::UserId)
                    .col(AiCoachingSessions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order so foreign keys never dangle.
        for table in [
            AiCoachingSessions::Table.into_iden(),
            FinancialGoals::Table.into_iden(),
            ProposalVotes::Table.into_iden(),
            CommunityProposals::Table.into_iden(),
            CommunityMembers::Table.into_iden(),
            CommunityGroups::Table.into_iden(),
            Transactions::Table.into_iden(),
            Wallets::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
