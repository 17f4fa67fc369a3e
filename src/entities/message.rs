use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{JoinType, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

pub const MAX_TEXT_LEN: usize = 140;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(Some(140))")]
    pub text: String,
    pub timestamp: DateTimeUtc,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::likes::Entity")]
    Likes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// An unsaved message stamped with the current time.
    pub fn post(user_id: i32, text: &str) -> Self {
        ActiveModel {
            text: Set(text.to_string()),
            timestamp: Set(Utc::now()),
            user_id: Set(user_id),
            ..Default::default()
        }
    }
}

impl Entity {
    /// Newest messages written by any of `author_ids`, each with its author.
    pub async fn timeline<C: ConnectionTrait>(
        db: &C,
        author_ids: Vec<i32>,
        limit: u64,
    ) -> Result<Vec<(Model, super::user::Model)>, DbErr> {
        let rows = Entity::find()
            .find_also_related(super::user::Entity)
            .filter(Column::UserId.is_in(author_ids))
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await?;
        Ok(with_author(rows))
    }

    /// Messages liked by `user_id`, newest first, each with its author.
    pub async fn liked_by<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
    ) -> Result<Vec<(Model, super::user::Model)>, DbErr> {
        let rows = Entity::find()
            .find_also_related(super::user::Entity)
            .join(JoinType::InnerJoin, super::likes::Relation::Message.def().rev())
            .filter(super::likes::Column::UserId.eq(user_id))
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .all(db)
            .await?;
        Ok(with_author(rows))
    }
}

// The author FK is non-null, so a missing author only means a concurrent delete.
fn with_author(rows: Vec<(Model, Option<super::user::Model>)>) -> Vec<(Model, super::user::Model)> {
    rows.into_iter()
        .filter_map(|(message, author)| author.map(|a| (message, a)))
        .collect()
}
