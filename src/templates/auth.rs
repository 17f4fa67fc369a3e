use super::text_input;
use crate::models::{FieldErrors, LoginForm, SignupForm};

pub fn signup_form(form: &SignupForm, errors: &FieldErrors) -> String {
    format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Join Warbler today.</h2>
    <form method="POST" id="user_form">
      {username}
      {email}
      {password}
      {image_url}
      <button class="btn btn-primary btn-lg btn-block">Sign me up!</button>
    </form>
  </div>
</div>"#,
        username = text_input("username", "Username", "text", &form.username, errors),
        email = text_input("email", "E-mail", "email", &form.email, errors),
        password = text_input("password", "Password", "password", "", errors),
        image_url = text_input(
            "image_url",
            "(Optional) Image URL",
            "text",
            form.image_url.as_deref().unwrap_or(""),
            errors
        ),
    )
}

pub fn login_form(form: &LoginForm, errors: &FieldErrors) -> String {
    format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Welcome back.</h2>
    <form method="POST" id="user_form">
      {username}
      {password}
      <button class="btn btn-primary btn-block btn-lg">Log in</button>
    </form>
    <p>New here? <a href="/signup">Sign up</a></p>
  </div>
</div>"#,
        username = text_input("username", "Username", "text", &form.username, errors),
        password = text_input("password", "Password", "password", "", errors),
    )
}
