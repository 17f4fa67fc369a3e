use super::{redirect, render};
use crate::auth::{FlashCategory, Session};
use crate::config::Config;
use crate::db::DbPool;
use crate::entities::user;
use crate::error::{WarblerError, WebResult};
use crate::models::{non_blank, FieldErrors, LoginForm, SignupForm};
use crate::templates;
use actix_web::{web, HttpResponse};
use sea_orm::ActiveModelTrait;

/// Visiting the signup page ends any current session.
pub async fn signup_form(mut session: Session, config: web::Data<Config>) -> WebResult<HttpResponse> {
    session.logout();
    let body = templates::auth::signup_form(&SignupForm::default(), &FieldErrors::default());
    render(session, &config, None, "Sign up", &body)
}

pub async fn signup(
    form: web::Form<SignupForm>,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        let body = templates::auth::signup_form(&form, &errors);
        return render(session, &config, None, "Sign up", &body);
    }

    let new_user = user::Entity::signup(
        form.username.trim(),
        form.email.trim(),
        Some(&form.password),
        non_blank(&form.image_url),
    )?;

    match new_user.insert(pool.get_ref()).await.map_err(WarblerError::from) {
        Ok(user) => {
            log::info!("New user signed up: {}", user);
            session.login(user.id);
            redirect(&session, &config, "/")
        }
        Err(e) if e.is_unique_violation() => {
            session.flash(FlashCategory::Danger, "Username already taken");
            let body = templates::auth::signup_form(&form, &FieldErrors::default());
            render(session, &config, None, "Sign up", &body)
        }
        Err(e) => Err(e),
    }
}

pub async fn login_form(session: Session, config: web::Data<Config>) -> WebResult<HttpResponse> {
    let body = templates::auth::login_form(&LoginForm::default(), &FieldErrors::default());
    render(session, &config, None, "Log in", &body)
}

pub async fn login(
    form: web::Form<LoginForm>,
    mut session: Session,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> WebResult<HttpResponse> {
    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        let body = templates::auth::login_form(&form, &errors);
        return render(session, &config, None, "Log in", &body);
    }

    match user::Entity::authenticate(pool.get_ref(), form.username.trim(), &form.password).await? {
        Some(user) => {
            session.login(user.id);
            session.flash(FlashCategory::Success, format!("Hello, {}!", user.username));
            redirect(&session, &config, "/")
        }
        None => {
            session.flash(FlashCategory::Danger, "Invalid credentials.");
            let body = templates::auth::login_form(&form, &FieldErrors::default());
            render(session, &config, None, "Log in", &body)
        }
    }
}

pub async fn logout(mut session: Session, config: web::Data<Config>) -> WebResult<HttpResponse> {
    session.logout();
    session.flash(FlashCategory::Success, "You have successfully logged out.");
    redirect(&session, &config, "/login")
}
