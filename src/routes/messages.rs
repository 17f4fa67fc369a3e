use super::{find_user, redirect, render};
use crate::auth::{CurrentUser, FlashCategory, MaybeUser, Session, ACCESS_UNAUTHORIZED};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::message;
use crate::error::{WarblerError, WebResult};
use crate::models::{FieldErrors, MessageForm};
use crate::templates;
use actix_web::{web, HttpResponse};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait};

async fn find_message(pool: &DbPool, message_id: i32) -> WebResult<message::Model> {
    message::Entity::find_by_id(message_id)
        .one(pool)
        .await?
        .ok_or(WarblerError::NotFound)
}

pub async fn new_message_form(
    current: CurrentUser,
    session: Session,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let body = templates::messages::new_message_form(&MessageForm::default(), &FieldErrors::default());
    render(session, &config, Some(&current.user), "New Message", &body)
}

/// Posts a message as the session user.
pub async fn add_message(
    current: CurrentUser,
    form: web::Form<MessageForm>,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        let body = templates::messages::new_message_form(&form, &errors);
        return render(session, &config, Some(&current.user), "New Message", &body);
    }

    let msg = message::ActiveModel::post(current.id(), form.text.trim())
        .insert(pool.get_ref())
        .await?;
    log::debug!("User {} posted message {}", current.id(), msg.id);

    redirect(&session, &config, &format!("/users/{}", current.id()))
}

pub async fn show_message(
    path: web::Path<i32>,
    current: MaybeUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let viewer = current.user();
    let msg = find_message(pool, path.into_inner()).await?;
    let author = find_user(pool, msg.user_id).await?;

    let body = templates::messages::show_message(&msg, &author, viewer);
    render(session, &config, viewer, "Message", &body)
}

/// Only the author may delete a message.
pub async fn delete_message(
    path: web::Path<i32>,
    current: CurrentUser,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let msg = find_message(pool, path.into_inner()).await?;

    if msg.user_id != current.id() {
        log::warn!(
            "User {} tried to delete message {} owned by {}",
            current.id(),
            msg.id,
            msg.user_id
        );
        session.flash(FlashCategory::Danger, ACCESS_UNAUTHORIZED);
        return redirect(&session, &config, "/");
    }

    msg.delete(pool).await?;
    redirect(&session, &config, &format!("/users/{}", current.id()))
}

/// Likes the message, or unlikes it if already liked. Users cannot like
/// their own messages.
pub async fn toggle_like(
    path: web::Path<i32>,
    current: CurrentUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let msg = find_message(pool, path.into_inner()).await?;
    let me = &current.user;

    if msg.user_id == me.id {
        return Err(WarblerError::Forbidden);
    }

    if me.has_liked(pool, &msg).await? {
        me.unlike(pool, &msg).await?;
    } else {
        me.like_if_absent(pool, &msg).await?;
    }

    redirect(&session, &config, "/")
}
