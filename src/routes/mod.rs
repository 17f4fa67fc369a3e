pub mod auth;
pub mod home;
pub mod messages;
pub mod users;

use crate::auth::Session;
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::user;
use crate::error::{WarblerError, WebResult};
use crate::templates;
use crate::templates::users::ProfileCounts;
use actix_web::http::header::{self, ContentType};
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpResponse};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{follows, likes, message};

/// Registers every Warbler route. Shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home::homepage))
        .route("/signup", web::get().to(auth::signup_form))
        .route("/signup", web::post().to(auth::signup))
        .route("/login", web::get().to(auth::login_form))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::get().to(auth::logout))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("/profile", web::get().to(users::edit_profile_form))
                .route("/profile", web::post().to(users::edit_profile))
                .route("/delete", web::post().to(users::delete_user))
                .route("/follow/{follow_id}", web::post().to(users::add_follow))
                .route(
                    "/stop-following/{follow_id}",
                    web::post().to(users::stop_following),
                )
                .route("/{user_id}", web::get().to(users::show_user))
                .route("/{user_id}/following", web::get().to(users::show_following))
                .route("/{user_id}/followers", web::get().to(users::show_followers))
                .route("/{user_id}/likes", web::get().to(users::show_likes)),
        )
        .service(
            web::scope("/messages")
                .route("/new", web::get().to(messages::new_message_form))
                .route("/new", web::post().to(messages::add_message))
                .route("/{message_id}", web::get().to(messages::show_message))
                .route("/{message_id}/delete", web::post().to(messages::delete_message))
                .route("/{message_id}/like", web::post().to(messages::toggle_like)),
        )
        .default_service(web::route().to(not_found));
}

/// Pages must never be served from a cache; they depend on the session.
pub fn no_cache_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .add((header::PRAGMA, "no-cache"))
        .add((header::EXPIRES, "0"))
}

async fn not_found() -> WebResult<HttpResponse> {
    Err(WarblerError::NotFound)
}

/// Renders `body` inside the layout, draining the session's flashes into it.
pub(crate) fn render(
    mut session: Session,
    config: &Config,
    current: Option<&user::Model>,
    title: &str,
    body: &str,
) -> WebResult<HttpResponse> {
    let flashes = session.take_flashes();
    let html = templates::layout(title, current, &flashes, body);
    let cookie = session.to_cookie(&config.session)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .cookie(cookie)
        .body(html))
}

pub(crate) fn redirect(session: &Session, config: &Config, location: &str) -> WebResult<HttpResponse> {
    let cookie = session.to_cookie(&config.session)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish())
}

pub(crate) async fn find_user(pool: &DbPool, user_id: i32) -> WebResult<user::Model> {
    user::Entity::find_by_id(user_id)
        .one(pool)
        .await?
        .ok_or(WarblerError::NotFound)
}

pub(crate) async fn profile_counts(pool: &DbPool, u: &user::Model) -> WebResult<ProfileCounts> {
    let messages = message::Entity::find()
        .filter(message::Column::UserId.eq(u.id))
        .count(pool)
        .await?;
    let following = follows::Entity::find()
        .filter(follows::Column::UserFollowingId.eq(u.id))
        .count(pool)
        .await?;
    let followers = follows::Entity::find()
        .filter(follows::Column::UserBeingFollowedId.eq(u.id))
        .count(pool)
        .await?;
    let likes = likes::Entity::find()
        .filter(likes::Column::UserId.eq(u.id))
        .count(pool)
        .await?;

    Ok(ProfileCounts {
        messages,
        following,
        followers,
        likes,
    })
}
