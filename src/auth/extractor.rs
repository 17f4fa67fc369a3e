use crate::auth::{FlashCategory, Session};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::user;
use crate::error::WarblerError;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{web, Error, FromRequest, HttpRequest, HttpResponse};
use sea_orm::EntityTrait;
use std::future::Future;
use std::pin::Pin;

pub const ACCESS_UNAUTHORIZED: &str = "Access unauthorized.";

/// The logged-in user, loaded from the id stored in the session.
///
/// Extraction fails when there is no session user (or it no longer exists);
/// the rejection flashes "Access unauthorized." and redirects home. Routes
/// open to anonymous visitors take [`MaybeUser`] instead.
pub struct CurrentUser {
    pub user: user::Model,
}

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }
}

/// The session user if there is one. Database failures still reject the
/// request; only a missing or stale session reads as anonymous.
pub struct MaybeUser(pub Option<user::Model>);

impl MaybeUser {
    pub fn user(&self) -> Option<&user::Model> {
        self.0.as_ref()
    }
}

async fn session_user(req: &HttpRequest) -> Result<Option<user::Model>, WarblerError> {
    let session = Session::from_http_request(req);
    let (Some(user_id), Some(pool)) = (session.user_id(), req.app_data::<web::Data<DbPool>>()) else {
        return Ok(None);
    };

    let found = user::Entity::find_by_id(user_id).one(pool.get_ref()).await?;
    if found.is_none() {
        log::debug!("Session refers to missing user {}", user_id);
    }
    Ok(found)
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            match session_user(&req).await {
                Ok(Some(user)) => Ok(CurrentUser { user }),
                Ok(None) => Err(unauthorized(&req)),
                Err(e) => Err(e.into()),
            }
        })
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move { Ok(MaybeUser(session_user(&req).await?)) })
    }
}

fn unauthorized(req: &HttpRequest) -> Error {
    let mut session = Session::default();
    session.flash(FlashCategory::Danger, ACCESS_UNAUTHORIZED);

    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, "/"));
    if let Some(config) = req.app_data::<web::Data<Config>>() {
        match session.to_cookie(&config.session) {
            Ok(cookie) => {
                response.cookie(cookie);
            }
            Err(e) => log::error!("Failed to sign session cookie: {:?}", e),
        }
    }

    InternalError::from_response(ACCESS_UNAUTHORIZED, response.finish()).into()
}
