//! Group proposals and their vote counters.
//!
//! A proposal is free-form text voted on by group members. Reaching a
//! majority only changes its status; nothing is paid out.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Open,
    Approved,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Status after a vote, given the counters and the group size.
    ///
    /// A side wins with strictly more than half of the members.
    pub fn tally(votes_for: i64, votes_against: i64, members: i64) -> Self {
        if votes_for * 2 > members {
            Self::Approved
        } else if votes_against * 2 > members {
            Self::Rejected
        } else {
            Self::Open
        }
    }
}

impl TryFrom<&str> for ProposalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::InvalidTransition(format!(
                "invalid proposal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub description: String,
    pub amount_minor: Option<i64>,
    pub votes_for: i64,
    pub votes_against: i64,
    pub status: ProposalStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    pub fn new(
        group_id: Uuid,
        title: String,
        description: String,
        amount_minor: Option<i64>,
        created_by: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            title,
            description,
            amount_minor,
            votes_for: 0,
            votes_against: 0,
            status: ProposalStatus::Open,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "community_proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub description: String,
    pub amount_minor: Option<i64>,
    pub votes_for: i64,
    pub votes_against: i64,
    pub status: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::community_groups::Entity",
        from = "Column::GroupId",
        to = "super::community_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
}

impl Related<super::community_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Proposal> for ActiveModel {
    fn from(p: &Proposal) -> Self {
        Self {
            id: ActiveValue::Set(p.id.to_string()),
            group_id: ActiveValue::Set(p.group_id.to_string()),
            title: ActiveValue::Set(p.title.clone()),
            description: ActiveValue::Set(p.description.clone()),
            amount_minor: ActiveValue::Set(p.amount_minor),
            votes_for: ActiveValue::Set(p.votes_for),
            votes_against: ActiveValue::Set(p.votes_against),
            status: ActiveValue::Set(p.status.as_str().to_string()),
            created_by: ActiveValue::Set(p.created_by.clone()),
            created_at: ActiveValue::Set(p.created_at),
        }
    }
}

impl TryFrom<Model> for Proposal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "proposal")?,
            group_id: parse_uuid(&model.group_id, "group")?,
            title: model.title,
            description: model.description,
            amount_minor: model.amount_minor,
            votes_for: model.votes_for,
            votes_against: model.votes_against,
            status: ProposalStatus::try_from(model.status.as_str())?,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_needs_more_than_half() {
        assert_eq!(ProposalStatus::tally(2, 0, 4), ProposalStatus::Open);
        assert_eq!(ProposalStatus::tally(3, 0, 4), ProposalStatus::Approved);
        assert_eq!(ProposalStatus::tally(1, 2, 3), ProposalStatus::Rejected);
        assert_eq!(ProposalStatus::tally(1, 0, 1), ProposalStatus::Approved);
    }
}
