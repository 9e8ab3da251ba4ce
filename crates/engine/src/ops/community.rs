//! Savings groups: membership, pooled contributions and proposal votes.

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait, prelude::*, sea_query::Expr,
};
use serde_json::json;

use crate::{
    CommunityGroup, ContributionCmd, Currency, EngineError, GroupMember, MemberRole, Money,
    Proposal, ProposalStatus, ResultEngine, Transaction, TransactionKind, TransactionStatus,
    community_groups, community_members, community_proposals, proposal_votes,
    util::{ensure_currency, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a group and enrolls the creator as its admin.
    pub async fn create_group(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        currency: Currency,
        target: Option<&str>,
    ) -> ResultEngine<CommunityGroup> {
        let name = normalize_required_text(name, "group name")?;
        let target_minor = target
            .map(|target| Money::parse_positive(target, currency).map(Money::minor))
            .transpose()?;
        let group = CommunityGroup::new(
            name,
            normalize_optional_text(description),
            currency,
            target_minor,
            user_id,
        );

        with_tx!(self, |db_tx| {
            community_groups::ActiveModel::from(&group)
                .insert(&db_tx)
                .await?;
            community_members::ActiveModel::joining(
                &group.id.to_string(),
                user_id,
                MemberRole::Admin,
            )
            .insert(&db_tx)
            .await?;
            Ok::<(), EngineError>(())
        })?;

        tracing::info!(user_id, group_id = %group.id, %currency, "group created");
        Ok(group)
    }

    /// Groups the caller belongs to, oldest first.
    pub async fn groups(&self, user_id: &str) -> ResultEngine<Vec<CommunityGroup>> {
        community_groups::Entity::find()
            .inner_join(community_members::Entity)
            .filter(community_members::Column::UserId.eq(user_id))
            .order_by_asc(community_groups::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(CommunityGroup::try_from)
            .collect()
    }

    /// A group the caller belongs to.
    pub async fn group(&self, user_id: &str, group_id: Uuid) -> ResultEngine<CommunityGroup> {
        self.member_group(&self.database, user_id, group_id).await
    }

    /// Members of a group the caller belongs to.
    pub async fn members(&self, user_id: &str, group_id: Uuid) -> ResultEngine<Vec<GroupMember>> {
        self.member_group(&self.database, user_id, group_id).await?;
        community_members::Entity::find()
            .filter(community_members::Column::GroupId.eq(group_id.to_string()))
            .order_by_asc(community_members::Column::JoinedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(GroupMember::try_from)
            .collect()
    }

    pub async fn join_group(&self, user_id: &str, group_id: Uuid) -> ResultEngine<GroupMember> {
        self.group_model(&self.database, group_id).await?;

        let model = community_members::ActiveModel::joining(
            &group_id.to_string(),
            user_id,
            MemberRole::Member,
        );
        let member = match model.insert(&self.database).await {
            Ok(model) => GroupMember::try_from(model)?,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(EngineError::ExistingKey(format!("{user_id} in group {group_id}")));
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user_id, %group_id, "joined group");
        Ok(member)
    }

    /// Moves money from a member's wallet into the group pool.
    ///
    /// The debit, pool increase, member total and the
    /// `community_contribution` row commit together.
    pub async fn contribute(&self, cmd: ContributionCmd) -> ResultEngine<Transaction> {
        let group = self
            .member_group(&self.database, &cmd.user_id, cmd.group_id)
            .await?;
        let amount = Money::parse_positive(&cmd.amount, group.currency)?;

        let source = self
            .owned_wallet(&self.database, &cmd.user_id, cmd.from_wallet_id)
            .await?;
        ensure_currency(source.currency, group.currency)?;
        source.ensure_active()?;

        let tx = Transaction::new(
            TransactionKind::CommunityContribution,
            TransactionStatus::Completed,
            amount,
            normalize_optional_text(cmd.description.as_deref()),
            json!({ "group_id": group.id.to_string() }),
        )?
        .from_wallet(&cmd.user_id, source.id);

        with_tx!(self, |db_tx| {
            self.debit(&db_tx, &source, amount).await?;

            community_groups::Entity::update_many()
                .col_expr(
                    community_groups::Column::PoolMinor,
                    Expr::cust_with_values("pool_minor + ?", [amount.minor()]),
                )
                .filter(community_groups::Column::Id.eq(group.id.to_string()))
                .exec(&db_tx)
                .await?;

            let member = community_members::Entity::update_many()
                .col_expr(
                    community_members::Column::ContributedMinor,
                    Expr::cust_with_values("contributed_minor + ?", [amount.minor()]),
                )
                .filter(community_members::Column::GroupId.eq(group.id.to_string()))
                .filter(community_members::Column::UserId.eq(cmd.user_id.as_str()))
                .exec(&db_tx)
                .await?;
            if member.rows_affected == 0 {
                return Err(EngineError::Forbidden(format!(
                    "{} left group {}",
                    cmd.user_id, group.id
                )));
            }

            self.record(&db_tx, &tx).await?;
            Ok::<(), EngineError>(())
        })?;

        tracing::info!(
            user_id = %cmd.user_id,
            group_id = %group.id,
            transaction_id = %tx.id,
            %amount,
            "contribution recorded"
        );
        Ok(tx)
    }

    pub async fn create_proposal(
        &self,
        user_id: &str,
        group_id: Uuid,
        title: &str,
        description: &str,
        amount: Option<&str>,
    ) -> ResultEngine<Proposal> {
        let group = self.member_group(&self.database, user_id, group_id).await?;
        let title = normalize_required_text(title, "proposal title")?;
        let amount_minor = amount
            .map(|amount| Money::parse_positive(amount, group.currency).map(Money::minor))
            .transpose()?;

        let proposal = Proposal::new(
            group.id,
            title,
            description.trim().to_string(),
            amount_minor,
            user_id,
        );
        community_proposals::ActiveModel::from(&proposal)
            .insert(&self.database)
            .await?;

        tracing::info!(user_id, %group_id, proposal_id = %proposal.id, "proposal created");
        Ok(proposal)
    }

    /// Proposals of a group the caller belongs to, newest first.
    pub async fn proposals(&self, user_id: &str, group_id: Uuid) -> ResultEngine<Vec<Proposal>> {
        self.member_group(&self.database, user_id, group_id).await?;
        community_proposals::Entity::find()
            .filter(community_proposals::Column::GroupId.eq(group_id.to_string()))
            .order_by_desc(community_proposals::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Proposal::try_from)
            .collect()
    }

    /// Casts the caller's single vote on an open proposal.
    ///
    /// The proposal closes as soon as one side holds a strict majority of
    /// the group's members.
    pub async fn vote(
        &self,
        user_id: &str,
        proposal_id: Uuid,
        approve: bool,
    ) -> ResultEngine<Proposal> {
        let proposal = community_proposals::Entity::find_by_id(proposal_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("proposal not exists".to_string()))?;
        let proposal = Proposal::try_from(proposal)?;
        self.member_group(&self.database, user_id, proposal.group_id)
            .await?;
        if proposal.status != ProposalStatus::Open {
            return Err(EngineError::InvalidTransition(format!(
                "proposal is {}",
                proposal.status.as_str()
            )));
        }

        let proposal = match self.cast_vote(user_id, &proposal, approve).await {
            Err(EngineError::Database(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                return Err(EngineError::ExistingKey(format!(
                    "vote of {user_id} on {proposal_id}"
                )));
            }
            other => other?,
        };

        tracing::info!(
            user_id,
            %proposal_id,
            approve,
            status = proposal.status.as_str(),
            "vote cast"
        );
        Ok(proposal)
    }

    async fn cast_vote(
        &self,
        user_id: &str,
        proposal: &Proposal,
        approve: bool,
    ) -> ResultEngine<Proposal> {
        let proposal_id = proposal.id.to_string();
        with_tx!(self, |db_tx| {
            proposal_votes::ActiveModel {
                proposal_id: ActiveValue::Set(proposal_id.clone()),
                user_id: ActiveValue::Set(user_id.to_string()),
                approve: ActiveValue::Set(approve),
                voted_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            let counter = if approve {
                (community_proposals::Column::VotesFor, "votes_for + 1")
            } else {
                (community_proposals::Column::VotesAgainst, "votes_against + 1")
            };
            let result = community_proposals::Entity::update_many()
                .col_expr(counter.0, Expr::cust(counter.1))
                .filter(community_proposals::Column::Id.eq(proposal_id.as_str()))
                .filter(community_proposals::Column::Status.eq(ProposalStatus::Open.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::InvalidTransition(
                    "proposal already closed".to_string(),
                ));
            }

            let members = community_members::Entity::find()
                .filter(community_members::Column::GroupId.eq(proposal.group_id.to_string()))
                .count(&db_tx)
                .await?;
            let model = community_proposals::Entity::find_by_id(proposal_id.clone())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("proposal not exists".to_string()))?;
            let mut updated = Proposal::try_from(model)?;

            let members = i64::try_from(members).unwrap_or(i64::MAX);
            let status = ProposalStatus::tally(updated.votes_for, updated.votes_against, members);
            if status != updated.status {
                community_proposals::ActiveModel {
                    id: ActiveValue::Set(proposal_id.clone()),
                    status: ActiveValue::Set(status.as_str().to_string()),
                    ..Default::default()
                }
                .update(&db_tx)
                .await?;
                updated.status = status;
            }
            Ok(updated)
        })
    }

    async fn group_model<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: Uuid,
    ) -> ResultEngine<community_groups::Model> {
        community_groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))
    }

    /// Loads a group, requiring the caller to be a member.
    async fn member_group<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        group_id: Uuid,
    ) -> ResultEngine<CommunityGroup> {
        let group = self.group_model(db, group_id).await?;
        let is_member = community_members::Entity::find_by_id((group.id.clone(), user_id.to_string()))
            .one(db)
            .await?
            .is_some();
        if !is_member {
            return Err(EngineError::Forbidden(format!(
                "{user_id} is not a member of group {group_id}"
            )));
        }
        CommunityGroup::try_from(group)
    }
}
