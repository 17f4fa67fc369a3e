use crate::auth::{hash_password, verify_password};
use crate::error::{is_unique_violation, WarblerError};
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, JoinType, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{follows, likes, message};

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(nullable)]
    pub location: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

impl Entity {
    /// Hashes the password and builds an unsaved user. Uniqueness of
    /// username and email is only checked when the record is inserted.
    pub fn signup(
        username: &str,
        email: &str,
        password: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<ActiveModel, WarblerError> {
        let password = match password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(WarblerError::InvalidPassword),
        };

        let password_hash = hash_password(password)?;
        let image_url = image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL);

        Ok(ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            image_url: Set(image_url.to_string()),
            header_image_url: Set(DEFAULT_HEADER_IMAGE_URL.to_string()),
            bio: Set(None),
            location: Set(None),
            ..Default::default()
        })
    }

    /// Returns the user only if the username exists and the password matches.
    pub async fn authenticate<C: ConnectionTrait>(
        db: &C,
        username: &str,
        password: &str,
    ) -> Result<Option<Model>, DbErr> {
        let user = Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await?;

        Ok(user.filter(|u| verify_password(password, &u.password_hash)))
    }

    /// Users whose username contains `query`, ordered by username.
    pub async fn search<C: ConnectionTrait>(
        db: &C,
        query: Option<&str>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut select = Entity::find().order_by_asc(Column::Username);
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(Column::Username.contains(q));
        }
        select.all(db).await
    }
}

impl Model {
    fn follow_edge(follower_id: i32, followed_id: i32) -> Condition {
        Condition::all()
            .add(follows::Column::UserFollowingId.eq(follower_id))
            .add(follows::Column::UserBeingFollowedId.eq(followed_id))
    }

    pub async fn is_following<C: ConnectionTrait>(&self, db: &C, other: &Model) -> Result<bool, DbErr> {
        let edge = follows::Entity::find()
            .filter(Self::follow_edge(self.id, other.id))
            .one(db)
            .await?;
        Ok(edge.is_some())
    }

    pub async fn is_followed_by<C: ConnectionTrait>(
        &self,
        db: &C,
        other: &Model,
    ) -> Result<bool, DbErr> {
        other.is_following(db, self).await
    }

    /// Inserts the edge self → other. A second insert of the same pair is a
    /// uniqueness violation.
    pub async fn follow<C: ConnectionTrait>(&self, db: &C, other: &Model) -> Result<(), DbErr> {
        follows::ActiveModel {
            user_being_followed_id: Set(other.id),
            user_following_id: Set(self.id),
        }
        .insert(db)
        .await?;
        Ok(())
    }

    /// Follows `other` unless the edge already exists. Returns whether an
    /// edge was added; a concurrent duplicate counts as already present.
    pub async fn follow_if_absent<C: ConnectionTrait>(
        &self,
        db: &C,
        other: &Model,
    ) -> Result<bool, DbErr> {
        match self.follow(db, other).await {
            Ok(()) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn unfollow<C: ConnectionTrait>(&self, db: &C, other: &Model) -> Result<(), DbErr> {
        follows::Entity::delete_many()
            .filter(Self::follow_edge(self.id, other.id))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Users this user follows.
    pub async fn following<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, follows::Relation::Followed.def().rev())
            .filter(follows::Column::UserFollowingId.eq(self.id))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    /// Users following this user.
    pub async fn followers<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .join(JoinType::InnerJoin, follows::Relation::Follower.def().rev())
            .filter(follows::Column::UserBeingFollowedId.eq(self.id))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    pub async fn following_ids<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<i32>, DbErr> {
        let edges = follows::Entity::find()
            .filter(follows::Column::UserFollowingId.eq(self.id))
            .all(db)
            .await?;
        Ok(edges.into_iter().map(|e| e.user_being_followed_id).collect())
    }

    /// Messages written by this user, newest first.
    pub async fn messages<C: ConnectionTrait>(
        &self,
        db: &C,
        limit: Option<u64>,
    ) -> Result<Vec<message::Model>, DbErr> {
        let mut select = self
            .find_related(message::Entity)
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id);
        if let Some(limit) = limit {
            select = select.limit(limit);
        }
        select.all(db).await
    }

    /// Messages this user has liked, newest first.
    pub async fn likes<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<message::Model>, DbErr> {
        message::Entity::find()
            .join(JoinType::InnerJoin, likes::Relation::Message.def().rev())
            .filter(likes::Column::UserId.eq(self.id))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .all(db)
            .await
    }

    pub async fn liked_message_ids<C: ConnectionTrait>(&self, db: &C) -> Result<Vec<i32>, DbErr> {
        let rows = likes::Entity::find()
            .filter(likes::Column::UserId.eq(self.id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|l| l.message_id).collect())
    }

    fn like_edge(user_id: i32, message_id: i32) -> Condition {
        Condition::all()
            .add(likes::Column::UserId.eq(user_id))
            .add(likes::Column::MessageId.eq(message_id))
    }

    pub async fn has_liked<C: ConnectionTrait>(
        &self,
        db: &C,
        message: &message::Model,
    ) -> Result<bool, DbErr> {
        let like = likes::Entity::find()
            .filter(Self::like_edge(self.id, message.id))
            .one(db)
            .await?;
        Ok(like.is_some())
    }

    pub async fn like<C: ConnectionTrait>(
        &self,
        db: &C,
        message: &message::Model,
    ) -> Result<(), DbErr> {
        likes::ActiveModel {
            user_id: Set(self.id),
            message_id: Set(message.id),
        }
        .insert(db)
        .await?;
        Ok(())
    }

    pub async fn like_if_absent<C: ConnectionTrait>(
        &self,
        db: &C,
        message: &message::Model,
    ) -> Result<bool, DbErr> {
        match self.like(db, message).await {
            Ok(()) => Ok(true),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn unlike<C: ConnectionTrait>(
        &self,
        db: &C,
        message: &message::Model,
    ) -> Result<(), DbErr> {
        likes::Entity::delete_many()
            .filter(Self::like_edge(self.id, message.id))
            .exec(db)
            .await?;
        Ok(())
    }
}
