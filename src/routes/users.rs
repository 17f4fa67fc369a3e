use super::{find_user, profile_counts, redirect, render};
use crate::auth::{CurrentUser, FlashCategory, MaybeUser, Session};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::{message, user};
use crate::error::{is_unique_violation, WebResult};
use crate::models::{non_blank, FieldErrors, SearchQuery, UserEditForm};
use crate::templates;
use crate::templates::users::FollowState;
use actix_web::{web, HttpResponse};
use sea_orm::{ActiveModelTrait, IntoActiveModel, ModelTrait, Set};

const PROFILE_MESSAGE_LIMIT: u64 = 100;

async fn follow_state(
    pool: &DbPool,
    viewer: Option<&user::Model>,
    target: &user::Model,
) -> WebResult<FollowState> {
    let Some(viewer) = viewer else {
        return Ok(FollowState::Anonymous);
    };

    if viewer.id == target.id {
        Ok(FollowState::Myself)
    } else if viewer.is_following(pool, target).await? {
        Ok(FollowState::Following)
    } else {
        Ok(FollowState::NotFollowing)
    }
}

async fn with_follow_states(
    pool: &DbPool,
    viewer: Option<&user::Model>,
    users: Vec<user::Model>,
) -> WebResult<Vec<(user::Model, FollowState)>> {
    let mut listed = Vec::with_capacity(users.len());
    for u in users {
        let state = follow_state(pool, viewer, &u).await?;
        listed.push((u, state));
    }
    Ok(listed)
}

/// `GET /users?q=`: everyone, or those whose username contains `q`.
pub async fn list_users(
    query: web::Query<SearchQuery>,
    current: MaybeUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let viewer = current.user();
    let q = non_blank(&query.q);

    let users = user::Entity::search(pool.get_ref(), q).await?;
    let users = with_follow_states(pool.get_ref(), viewer, users).await?;

    render(session, &config, viewer, "Users", &templates::users::index(&users, q))
}

pub async fn show_user(
    path: web::Path<i32>,
    current: MaybeUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let viewer = current.user();
    let u = find_user(pool, path.into_inner()).await?;

    let messages = u.messages(pool, Some(PROFILE_MESSAGE_LIMIT)).await?;
    let messages: Vec<_> = messages.into_iter().map(|m| (m, u.clone())).collect();
    let liked_ids = match viewer {
        Some(v) => v.liked_message_ids(pool).await?,
        None => Vec::new(),
    };

    let counts = profile_counts(pool, &u).await?;
    let state = follow_state(pool, viewer, &u).await?;
    let content = templates::users::messages_content(&messages, viewer, &liked_ids);
    let body = templates::users::profile(&u, &counts, state, &content);

    render(session, &config, viewer, &format!("@{}", u.username), &body)
}

#[derive(Clone, Copy)]
enum Connection {
    Following,
    Followers,
}

async fn show_connections(
    which: Connection,
    user_id: i32,
    current: CurrentUser,
    session: Session,
    pool: &DbPool,
    config: &Config,
) -> WebResult<HttpResponse> {
    let viewer = Some(&current.user);
    let u = find_user(pool, user_id).await?;

    let users = match which {
        Connection::Following => u.following(pool).await?,
        Connection::Followers => u.followers(pool).await?,
    };
    let users = with_follow_states(pool, viewer, users).await?;

    let counts = profile_counts(pool, &u).await?;
    let state = follow_state(pool, viewer, &u).await?;
    let content = templates::users::user_cards(&users);
    let body = templates::users::profile(&u, &counts, state, &content);

    render(session, config, viewer, &format!("@{}", u.username), &body)
}

pub async fn show_following(
    path: web::Path<i32>,
    current: CurrentUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    show_connections(
        Connection::Following,
        path.into_inner(),
        current,
        session,
        pool.get_ref(),
        &config,
    )
    .await
}

pub async fn show_followers(
    path: web::Path<i32>,
    current: CurrentUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    show_connections(
        Connection::Followers,
        path.into_inner(),
        current,
        session,
        pool.get_ref(),
        &config,
    )
    .await
}

/// Messages liked by a user.
pub async fn show_likes(
    path: web::Path<i32>,
    current: CurrentUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let viewer = Some(&current.user);
    let u = find_user(pool, path.into_inner()).await?;

    let liked = message::Entity::liked_by(pool, u.id).await?;
    let viewer_liked = current.user.liked_message_ids(pool).await?;

    let counts = profile_counts(pool, &u).await?;
    let state = follow_state(pool, viewer, &u).await?;
    let content = templates::users::messages_content(&liked, viewer, &viewer_liked);
    let body = templates::users::profile(&u, &counts, state, &content);

    render(session, &config, viewer, &format!("@{}", u.username), &body)
}

pub async fn add_follow(
    path: web::Path<i32>,
    current: CurrentUser,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let followee = find_user(pool, path.into_inner()).await?;
    let me = &current.user;

    if followee.id == me.id {
        session.flash(FlashCategory::Danger, "You cannot follow yourself.");
    } else if me.follow_if_absent(pool, &followee).await? {
        log::debug!("User {} now follows {}", me.id, followee.id);
    }

    redirect(&session, &config, &format!("/users/{}/following", me.id))
}

pub async fn stop_following(
    path: web::Path<i32>,
    current: CurrentUser,
    session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let followee = find_user(pool, path.into_inner()).await?;
    current.user.unfollow(pool, &followee).await?;

    redirect(&session, &config, &format!("/users/{}/following", current.id()))
}

pub async fn edit_profile_form(
    current: CurrentUser,
    session: Session,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let form = UserEditForm::from_user(&current.user);
    let body = templates::users::edit_form(current.id(), &form, &FieldErrors::default());
    render(session, &config, Some(&current.user), "Edit Profile", &body)
}

/// Saves profile changes after re-checking the current password.
pub async fn edit_profile(
    current: CurrentUser,
    form: web::Form<UserEditForm>,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let pool = pool.get_ref();
    let form = form.into_inner();
    let me = &current.user;

    if let Err(errors) = form.validate() {
        let body = templates::users::edit_form(me.id, &form, &errors);
        return render(session, &config, Some(me), "Edit Profile", &body);
    }

    if user::Entity::authenticate(pool, &me.username, &form.password)
        .await?
        .is_none()
    {
        session.flash(FlashCategory::Danger, "Wrong password, please try again.");
        return redirect(&session, &config, "/");
    }

    let mut active = me.clone().into_active_model();
    active.username = Set(form.username.trim().to_string());
    active.email = Set(form.email.trim().to_string());
    active.image_url = Set(non_blank(&form.image_url)
        .unwrap_or(user::DEFAULT_IMAGE_URL)
        .to_string());
    active.header_image_url = Set(non_blank(&form.header_image_url)
        .unwrap_or(user::DEFAULT_HEADER_IMAGE_URL)
        .to_string());
    active.bio = Set(non_blank(&form.bio).map(str::to_string));
    active.location = Set(non_blank(&form.location).map(str::to_string));

    match active.update(pool).await {
        Ok(updated) => redirect(&session, &config, &format!("/users/{}", updated.id)),
        Err(e) if is_unique_violation(&e) => {
            session.flash(FlashCategory::Danger, "Username or email already taken");
            let body = templates::users::edit_form(me.id, &form, &FieldErrors::default());
            render(session, &config, Some(me), "Edit Profile", &body)
        }
        Err(e) => Err(e.into()),
    }
}

/// Deletes the current user; messages, follows and likes go with it.
pub async fn delete_user(
    current: CurrentUser,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    session.logout();
    log::info!("Deleting {}", current.user);
    current.user.delete(pool.get_ref()).await?;

    redirect(&session, &config, "/signup")
}
