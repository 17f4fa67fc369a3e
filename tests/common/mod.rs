// Shared fixtures for the integration tests. Every test gets its own
// in-memory SQLite database, so ids start at 1 in each test.
#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{test, web, App};
use sea_orm::ActiveModelTrait;
use warbler::{
    auth::Session,
    config::Config,
    db::{self, DbPool},
    entities::user,
    routes,
};

pub async fn setup() -> (Config, DbPool) {
    let config = Config::in_memory();
    let pool = db::create_pool(&config)
        .await
        .expect("Failed to create in-memory database");
    (config, pool)
}

/// Helper function to create a test app
pub fn create_test_app(
    config: Config,
    pool: DbPool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(routes::no_cache_headers())
        .app_data(web::Data::new(config))
        .app_data(web::Data::new(pool))
        .configure(routes::configure)
}

pub async fn signup(pool: &DbPool, username: &str, email: &str, password: &str) -> user::Model {
    user::Entity::signup(username, email, Some(password), None)
        .expect("signup should build a user")
        .insert(pool)
        .await
        .expect("signup should insert")
}

/// The cookie a browser would hold after `user_id` logged in.
pub fn session_cookie(config: &Config, user_id: i32) -> Cookie<'static> {
    Session::for_user(user_id)
        .to_cookie(&config.session)
        .expect("session should sign")
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("response should redirect")
        .to_str()
        .unwrap()
        .to_string()
}

/// A GET to the redirect target carrying the cookies the response set,
/// like a browser following the redirect.
pub fn follow_redirect<B>(resp: &ServiceResponse<B>) -> test::TestRequest {
    let mut req = test::TestRequest::get().uri(&location(resp));
    for cookie in resp.response().cookies() {
        req = req.cookie(cookie.into_owned());
    }
    req
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}
