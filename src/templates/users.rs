use super::{escape, message_list, text_input};
use crate::entities::{message, user};
use crate::models::{FieldErrors, UserEditForm};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCounts {
    pub messages: u64,
    pub following: u64,
    pub followers: u64,
    pub likes: u64,
}

/// How the logged-in visitor relates to a listed user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowState {
    Anonymous,
    Myself,
    Following,
    NotFollowing,
}

fn follow_button(target: &user::Model, state: FollowState) -> String {
    match state {
        FollowState::Following => format!(
            r#"<form method="POST" action="/users/stop-following/{}">
  <button class="btn btn-primary btn-sm">Unfollow</button>
</form>"#,
            target.id
        ),
        FollowState::NotFollowing => format!(
            r#"<form method="POST" action="/users/follow/{}">
  <button class="btn btn-outline-primary btn-sm">Follow</button>
</form>"#,
            target.id
        ),
        FollowState::Anonymous | FollowState::Myself => String::new(),
    }
}

fn user_card(u: &user::Model, state: FollowState) -> String {
    format!(
        r#"<div class="col-lg-4 col-md-6 col-12">
  <div class="card user-card">
    <div class="card-inner">
      <div class="image-wrapper"><img src="{header}" alt="" class="card-hero"></div>
      <div class="card-contents">
        <a href="/users/{id}" class="card-link">
          <img src="{image}" alt="Image for {username}" class="card-image">
          <p>@{username}</p>
        </a>
        {button}
      </div>
      <p class="card-bio">{bio}</p>
    </div>
  </div>
</div>"#,
        id = u.id,
        header = escape(&u.header_image_url),
        image = escape(&u.image_url),
        username = escape(&u.username),
        button = follow_button(u, state),
        bio = escape(u.bio.as_deref().unwrap_or("")),
    )
}

/// Grid of user cards, each with the visitor's follow state.
pub fn user_cards(users: &[(user::Model, FollowState)]) -> String {
    let cards: String = users.iter().map(|(u, s)| user_card(u, *s)).collect();
    format!(r#"<div class="row justify-content-end">{}</div>"#, cards)
}

pub fn index(users: &[(user::Model, FollowState)], query: Option<&str>) -> String {
    if users.is_empty() {
        return format!(
            r#"<h3>Sorry, no users found{}</h3>"#,
            query
                .map(|q| format!(" matching &quot;{}&quot;", escape(q)))
                .unwrap_or_default()
        );
    }
    user_cards(users)
}

/// Profile header, stats bar and sidebar around `content`.
pub fn profile(
    u: &user::Model,
    counts: &ProfileCounts,
    state: FollowState,
    content: &str,
) -> String {
    let action = match state {
        FollowState::Myself => r#"<a href="/users/profile" class="btn btn-outline-secondary">Edit Profile</a>
        <form method="POST" action="/users/delete" class="form-inline">
          <button class="btn btn-outline-danger ml-2">Delete Profile</button>
        </form>"#
            .to_string(),
        other => follow_button(u, other),
    };

    format!(
        r#"<div id="warbler-hero" class="full-width" style="background-image: url('{header}');"></div>
<img src="{image}" alt="Image for {username}" id="profile-avatar">
<div class="row full-width">
  <div class="container">
    <ul class="user-stats nav nav-pills">
      <li class="stat"><p class="small">Messages</p><h4><a href="/users/{id}">{messages}</a></h4></li>
      <li class="stat"><p class="small">Following</p><h4><a href="/users/{id}/following">{following}</a></h4></li>
      <li class="stat"><p class="small">Followers</p><h4><a href="/users/{id}/followers">{followers}</a></h4></li>
      <li class="stat"><p class="small">Likes</p><h4><a href="/users/{id}/likes">{likes}</a></h4></li>
      <div class="ml-auto">{action}</div>
    </ul>
  </div>
</div>
<div class="row">
  <div class="col-sm-3">
    <h4 id="sidebar-username">@{username}</h4>
    <p class="user-bio">{bio}</p>
    <p class="user-location"><span class="fa fa-map-marker"></span>{location}</p>
  </div>
  <div class="col-sm-9">
    {content}
  </div>
</div>"#,
        id = u.id,
        header = escape(&u.header_image_url),
        image = escape(&u.image_url),
        username = escape(&u.username),
        bio = escape(u.bio.as_deref().unwrap_or("")),
        location = escape(u.location.as_deref().unwrap_or("")),
        messages = counts.messages,
        following = counts.following,
        followers = counts.followers,
        likes = counts.likes,
    )
}

pub fn messages_content(
    items: &[(message::Model, user::Model)],
    viewer: Option<&user::Model>,
    liked_ids: &[i32],
) -> String {
    message_list(items, viewer, liked_ids)
}

pub fn edit_form(user_id: i32, form: &UserEditForm, errors: &FieldErrors) -> String {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();

    format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Edit Your Profile.</h2>
    <form method="POST" id="user_form">
      {username}
      {email}
      {image_url}
      {header_image_url}
      <div class="form-group">
        <label for="bio">Bio</label>
        <textarea id="bio" name="bio" class="form-control">{bio}</textarea>
      </div>
      {location}
      <p>To confirm changes, enter your password:</p>
      {password}
      <div class="edit-btn-area">
        <button class="btn btn-success">Edit this user!</button>
        <a href="/users/{user_id}" class="btn btn-outline-secondary">Cancel</a>
      </div>
    </form>
  </div>
</div>"#,
        username = text_input("username", "Username", "text", &form.username, errors),
        email = text_input("email", "E-mail", "email", &form.email, errors),
        image_url = text_input("image_url", "Image URL", "text", &optional(&form.image_url), errors),
        header_image_url = text_input(
            "header_image_url",
            "Header Image URL",
            "text",
            &optional(&form.header_image_url),
            errors
        ),
        bio = escape(&optional(&form.bio)),
        location = text_input("location", "Location", "text", &optional(&form.location), errors),
        password = text_input("password", "Password", "password", "", errors),
    )
}
