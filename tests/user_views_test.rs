// User view tests.
// Run with: cargo test --test user_views_test

mod common;

use actix_web::{http::header, http::StatusCode, test};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait};
use warbler::{
    config::Config,
    db::DbPool,
    entities::{message, user},
};

/// testuser1 (id 1) follows testuser2 (id 2); testuser3 (id 3) is alone.
async fn setup_users() -> (Config, DbPool, user::Model, user::Model) {
    let (config, pool) = common::setup().await;

    let u1 = common::signup(&pool, "testuser1", "test1@test.com", "HASHED_PASSWORD").await;
    let u2 = common::signup(&pool, "testuser2", "test2@test.com", "HASHED_PASSWORD").await;
    u1.follow(&pool, &u2).await.unwrap();
    common::signup(&pool, "testuser3", "test3@test.com", "HASHED_PASSWORD3").await;

    (config, pool, u1, u2)
}

#[actix_web::test]
async fn test_list_users() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/users").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    for name in ["@testuser1", "@testuser2", "@testuser3"] {
        assert!(body.contains(name), "{} should be listed", name);
    }
}

#[actix_web::test]
async fn test_search_users() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let req = test::TestRequest::get().uri("/users?q=user2").to_request();
    let body = common::body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("@testuser2"));
    assert!(!body.contains("@testuser1"));

    let req = test::TestRequest::get().uri("/users?q=nobody").to_request();
    let body = common::body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Sorry, no users found"));
}

#[actix_web::test]
async fn test_show_user() {
    let (config, pool, u1, _) = setup_users().await;
    message::ActiveModel::post(u1.id, "warble warble")
        .insert(&pool)
        .await
        .unwrap();
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/users/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    assert!(body.contains("@testuser1"));
    assert!(body.contains("warble warble"));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/users/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_following_page() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool)).await;

    let req = test::TestRequest::get()
        .uri("/users/1/following")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    assert!(body.contains("@testuser2"));
    assert!(!body.contains("@testuser3"));
    assert!(body.contains("/users/stop-following/2"));
}

#[actix_web::test]
async fn test_followers_page() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool)).await;

    let req = test::TestRequest::get()
        .uri("/users/2/followers")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    assert!(body.contains("@testuser1"));
    assert!(!body.contains("@testuser3"));
}

#[actix_web::test]
async fn test_following_pages_require_login() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    for uri in ["/users/1/following", "/users/2/followers", "/users/1/likes"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{} should redirect", uri);

        let resp = test::call_service(&app, common::follow_redirect(&resp).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(common::body_text(resp).await.contains("Access unauthorized"));
    }
}

#[actix_web::test]
async fn test_follow_and_stop_following() {
    let (config, pool, _, _) = setup_users().await;
    let u3 = user::Entity::find_by_id(3).one(&pool).await.unwrap().unwrap();
    let u1 = user::Entity::find_by_id(1).one(&pool).await.unwrap().unwrap();
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/follow/1")
        .cookie(common::session_cookie(&config, u3.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/users/3/following");
    assert!(u3.is_following(&pool, &u1).await.unwrap());

    // Following again leaves a single edge.
    let req = test::TestRequest::post()
        .uri("/users/follow/1")
        .cookie(common::session_cookie(&config, u3.id))
        .to_request();
    test::call_service(&app, req).await;
    assert_eq!(u1.followers(&pool).await.unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri("/users/stop-following/1")
        .cookie(common::session_cookie(&config, u3.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!u3.is_following(&pool, &u1).await.unwrap());
}

#[actix_web::test]
async fn test_cannot_follow_self() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/follow/1")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let resp = test::call_service(&app, common::follow_redirect(&resp).to_request()).await;
    assert!(common::body_text(resp).await.contains("You cannot follow yourself."));
    assert!(!u1.is_following(&pool, &u1).await.unwrap());
}

#[actix_web::test]
async fn test_likes_page() {
    let (config, pool, u1, u2) = setup_users().await;
    let msg = message::ActiveModel::post(u2.id, "worth a like")
        .insert(&pool)
        .await
        .unwrap();
    u1.like(&pool, &msg).await.unwrap();
    let app = test::init_service(common::create_test_app(config.clone(), pool)).await;

    let req = test::TestRequest::get()
        .uri("/users/1/likes")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::body_text(resp).await;
    assert!(body.contains("worth a like"));
    assert!(body.contains("Unlike"));
}

#[actix_web::test]
async fn test_home_timeline() {
    let (config, pool, u1, u2) = setup_users().await;
    let u3 = user::Entity::find_by_id(3).one(&pool).await.unwrap().unwrap();
    for (author, text) in [(&u1, "from me"), (&u2, "from a friend"), (&u3, "from a stranger")] {
        message::ActiveModel::post(author.id, text)
            .insert(&pool)
            .await
            .unwrap();
    }
    let app = test::init_service(common::create_test_app(config.clone(), pool)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let body = common::body_text(test::call_service(&app, req).await).await;

    assert!(body.contains("from me"));
    assert!(body.contains("from a friend"));
    assert!(!body.contains("from a stranger"));
}

#[actix_web::test]
async fn test_edit_profile() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/profile")
        .cookie(common::session_cookie(&config, u1.id))
        .set_form([
            ("username", "renamed"),
            ("email", "renamed@test.com"),
            ("bio", "Hello there"),
            ("location", ""),
            ("password", "HASHED_PASSWORD"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/users/1");

    let stored = user::Entity::find_by_id(1).one(&pool).await.unwrap().unwrap();
    assert_eq!(stored.username, "renamed");
    assert_eq!(stored.email, "renamed@test.com");
    assert_eq!(stored.bio.as_deref(), Some("Hello there"));
    assert_eq!(stored.location, None);
    assert_eq!(stored.password_hash, u1.password_hash);
}

#[actix_web::test]
async fn test_edit_profile_wrong_password() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/profile")
        .cookie(common::session_cookie(&config, u1.id))
        .set_form([
            ("username", "renamed"),
            ("email", "renamed@test.com"),
            ("password", "not-my-password"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let resp = test::call_service(&app, common::follow_redirect(&resp).to_request()).await;
    assert!(common::body_text(resp)
        .await
        .contains("Wrong password, please try again."));

    let stored = user::Entity::find_by_id(1).one(&pool).await.unwrap().unwrap();
    assert_eq!(stored.username, "testuser1");
}

#[actix_web::test]
async fn test_edit_profile_duplicate_username() {
    let (config, pool, u1, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/profile")
        .cookie(common::session_cookie(&config, u1.id))
        .set_form([
            ("username", "testuser2"),
            ("email", "test1@test.com"),
            ("password", "HASHED_PASSWORD"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::body_text(resp)
        .await
        .contains("Username or email already taken"));

    let stored = user::Entity::find_by_id(1).one(&pool).await.unwrap().unwrap();
    assert_eq!(stored.username, "testuser1");
}

#[actix_web::test]
async fn test_edit_profile_no_session_no_body() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let req = test::TestRequest::post().uri("/users/profile").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/");
}

#[actix_web::test]
async fn test_session_lookup_failure_is_server_error() {
    let (config, pool, u1, _) = setup_users().await;
    for table in ["likes", "follows", "messages", "users"] {
        pool.execute_unprepared(&format!("DROP TABLE {}", table))
            .await
            .unwrap();
    }
    let app = test::init_service(common::create_test_app(config.clone(), pool)).await;

    for uri in ["/", "/users/profile"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(common::session_cookie(&config, u1.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        let body = common::body_text(resp).await;
        assert!(body.contains("Something went wrong"));
        assert!(!body.contains("Sign up now"));
    }
}

#[actix_web::test]
async fn test_delete_user() {
    let (config, pool, u1, _) = setup_users().await;
    message::ActiveModel::post(u1.id, "last words")
        .insert(&pool)
        .await
        .unwrap();
    let app = test::init_service(common::create_test_app(config.clone(), pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/users/delete")
        .cookie(common::session_cookie(&config, u1.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/signup");

    assert!(user::Entity::find_by_id(1).one(&pool).await.unwrap().is_none());
    assert_eq!(message::Entity::find().count(&pool).await.unwrap(), 0);
    assert_eq!(user::Entity::find().count(&pool).await.unwrap(), 2);
}

#[actix_web::test]
async fn test_responses_are_not_cached() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(
        resp.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(resp.headers().get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(resp.headers().get(header::EXPIRES).unwrap(), "0");
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let (config, pool, _, _) = setup_users().await;
    let app = test::init_service(common::create_test_app(config, pool)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(common::body_text(resp).await.contains("404"));
}
