use super::{email_shaped, min_length, require, FieldErrors};
use crate::entities::user;
use serde::Deserialize;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub image_url: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        require(&mut errors, "username", &self.username);
        require(&mut errors, "email", &self.email);
        email_shaped(&mut errors, "email", &self.email);
        min_length(&mut errors, "password", &self.password, MIN_PASSWORD_LEN);
        errors.into_result()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        require(&mut errors, "username", &self.username);
        min_length(&mut errors, "password", &self.password, MIN_PASSWORD_LEN);
        errors.into_result()
    }
}

/// Profile edit; `password` is the current password, re-checked before saving.
#[derive(Debug, Default, Deserialize)]
pub struct UserEditForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub password: String,
}

impl UserEditForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        require(&mut errors, "username", &self.username);
        require(&mut errors, "email", &self.email);
        email_shaped(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password);
        errors.into_result()
    }

    /// The form pre-filled from the stored profile.
    pub fn from_user(u: &user::Model) -> Self {
        UserEditForm {
            username: u.username.clone(),
            email: u.email.clone(),
            image_url: Some(u.image_url.clone()),
            header_image_url: Some(u.header_image_url.clone()),
            bio: u.bio.clone(),
            location: u.location.clone(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
