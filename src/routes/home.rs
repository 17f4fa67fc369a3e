use super::{profile_counts, render};
use crate::auth::{MaybeUser, Session};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::message;
use crate::error::WebResult;
use crate::templates;
use actix_web::{web, HttpResponse};

const TIMELINE_LIMIT: u64 = 100;

/// Anonymous visitors get the landing page; logged-in users get the newest
/// messages of everyone they follow plus their own.
pub async fn homepage(
    current: MaybeUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let Some(me) = current.user() else {
        return render(session, &config, None, "Warbler", &templates::home_anon());
    };
    let pool = pool.get_ref();

    let mut author_ids = me.following_ids(pool).await?;
    author_ids.push(me.id);

    let timeline = message::Entity::timeline(pool, author_ids, TIMELINE_LIMIT).await?;
    let liked_ids = me.liked_message_ids(pool).await?;
    let counts = profile_counts(pool, me).await?;

    let body = templates::home(me, &counts, &timeline, &liked_ids);
    render(session, &config, Some(me), "Warbler", &body)
}
