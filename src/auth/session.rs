use crate::config::{Config, SessionConfig};
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, Error, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

/// Per-browser state carried in a signed cookie: the logged-in user id and
/// flash messages waiting for the next rendered page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    curr_user: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    flashes: Vec<Flash>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    session: Session,
    exp: i64,
    iat: i64,
}

impl Session {
    pub fn for_user(user_id: i32) -> Self {
        Session {
            curr_user: Some(user_id),
            flashes: Vec::new(),
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.curr_user
    }

    pub fn login(&mut self, user_id: i32) {
        self.curr_user = Some(user_id);
    }

    pub fn logout(&mut self) {
        self.curr_user = None;
    }

    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.flashes.push(Flash {
            category,
            message: message.into(),
        });
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn encode(&self, config: &SessionConfig) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            session: self.clone(),
            exp: (now + Duration::hours(config.expiration_hours)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_ref()),
        )
    }

    pub fn decode(token: &str, config: &SessionConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.secret.as_ref()),
            &Validation::default(),
        )?;
        Ok(token_data.claims.session)
    }

    pub fn to_cookie(
        &self,
        config: &SessionConfig,
    ) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
        let token = self.encode(config)?;
        Ok(Cookie::build(config.cookie_name.clone(), token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .finish())
    }

    /// The session carried by the request. Missing, tampered or expired
    /// cookies all read as an empty session.
    pub fn from_http_request(req: &HttpRequest) -> Self {
        let Some(config) = req.app_data::<web::Data<Config>>() else {
            return Session::default();
        };

        match req.cookie(&config.session.cookie_name) {
            Some(cookie) => match Session::decode(cookie.value(), &config.session) {
                Ok(session) => session,
                Err(e) => {
                    log::debug!("Discarding unreadable session cookie: {:?}", e);
                    Session::default()
                }
            },
            None => Session::default(),
        }
    }
}

impl FromRequest for Session {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Session::from_http_request(req)))
    }
}
