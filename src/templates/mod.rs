//! Server-rendered pages. Every value interpolated into markup goes
//! through [`escape`].

pub mod auth;
pub mod errors;
pub mod messages;
pub mod users;

use crate::auth::Flash;
use crate::entities::{message, user};
use crate::models::FieldErrors;
use std::fmt::Write;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps page content in the document shell: navbar and pending flashes.
pub fn layout(title: &str, current: Option<&user::Model>, flashes: &[Flash], body: &str) -> String {
    let nav = match current {
        Some(u) => format!(
            r#"<li><a href="/users/{id}">@{username}</a></li>
      <li><a href="/messages/new">New Message</a></li>
      <li><a href="/logout">Log out</a></li>"#,
            id = u.id,
            username = escape(&u.username),
        ),
        None => r#"<li><a href="/signup">Sign up</a></li>
      <li><a href="/login">Log in</a></li>"#
            .to_string(),
    };

    let mut alerts = String::new();
    for flash in flashes {
        let _ = write!(
            alerts,
            r#"<div class="alert alert-{}">{}</div>"#,
            flash.category.as_str(),
            escape(&flash.message)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
</head>
<body>
  <nav class="navbar">
    <a href="/" class="navbar-brand">Warbler</a>
    <form class="navbar-form" action="/users">
      <input name="q" placeholder="Search Warbler" aria-label="Search">
    </form>
    <ul class="nav">
      {nav}
    </ul>
  </nav>
  <div class="container">
    {alerts}
    {body}
  </div>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub(crate) fn field_errors(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .map(|e| format!(r#"<span class="text-danger">{}</span>"#, escape(e)))
        .collect()
}

pub(crate) fn text_input(
    name: &str,
    label: &str,
    kind: &str,
    value: &str,
    errors: &FieldErrors,
) -> String {
    format!(
        r#"<div class="form-group">
  <label for="{name}">{label}</label>
  <input type="{kind}" id="{name}" name="{name}" value="{value}">
  {errors}
</div>"#,
        value = escape(value),
        errors = field_errors(errors, name),
    )
}

/// A timeline entry. The like button is shown only to logged-in users and
/// never on their own messages.
pub(crate) fn message_item(
    msg: &message::Model,
    author: &user::Model,
    viewer: Option<&user::Model>,
    liked: bool,
) -> String {
    let like_button = match viewer {
        Some(v) if v.id != author.id => format!(
            r#"<form method="POST" action="/messages/{id}/like" class="messages-like">
      <button class="btn {class}">{label}</button>
    </form>"#,
            id = msg.id,
            class = if liked { "btn-primary" } else { "btn-secondary" },
            label = if liked { "Unlike" } else { "Like" },
        ),
        _ => String::new(),
    };

    format!(
        r#"<li class="list-group-item">
  <a href="/messages/{id}" class="message-link"></a>
  <a href="/users/{author_id}"><img src="{image}" alt="" class="timeline-image"></a>
  <div class="message-area">
    <a href="/users/{author_id}">@{username}</a>
    <span class="text-muted">{timestamp}</span>
    <p>{text}</p>
    {like_button}
  </div>
</li>"#,
        id = msg.id,
        author_id = author.id,
        image = escape(&author.image_url),
        username = escape(&author.username),
        timestamp = msg.timestamp.format("%d %B %Y"),
        text = escape(&msg.text),
    )
}

pub(crate) fn message_list(
    items: &[(message::Model, user::Model)],
    viewer: Option<&user::Model>,
    liked_ids: &[i32],
) -> String {
    let entries: String = items
        .iter()
        .map(|(msg, author)| message_item(msg, author, viewer, liked_ids.contains(&msg.id)))
        .collect();
    format!(r#"<ul class="list-group" id="messages">{}</ul>"#, entries)
}

/// Landing page for anonymous visitors.
pub fn home_anon() -> String {
    r#"<div class="home-hero">
  <h1>What's Happening?</h1>
  <h4>New to Warbler?</h4>
  <a href="/signup" class="btn btn-primary">Sign up now</a>
</div>"#
        .to_string()
}

/// Timeline of the logged-in user.
pub fn home(
    current: &user::Model,
    counts: &users::ProfileCounts,
    timeline: &[(message::Model, user::Model)],
    liked_ids: &[i32],
) -> String {
    format!(
        r#"<div class="row">
  <aside class="col-md-4" id="home-aside">
    <div class="card user-card">
      <img src="{header}" alt="" class="card-hero">
      <a href="/users/{id}"><img src="{image}" alt="Image for {username}" class="card-image"></a>
      <p>@{username}</p>
      <ul class="user-stats">
        <li><a href="/users/{id}">Messages <strong>{messages}</strong></a></li>
        <li><a href="/users/{id}/following">Following <strong>{following}</strong></a></li>
        <li><a href="/users/{id}/followers">Followers <strong>{followers}</strong></a></li>
      </ul>
    </div>
  </aside>
  <div class="col-md-8">
    {list}
  </div>
</div>"#,
        id = current.id,
        header = escape(&current.header_image_url),
        image = escape(&current.image_url),
        username = escape(&current.username),
        messages = counts.messages,
        following = counts.following,
        followers = counts.followers,
        list = message_list(timeline, Some(current), liked_ids),
    )
}
