use super::{escape, field_errors};
use crate::entities::{message, user};
use crate::models::{FieldErrors, MessageForm};

pub fn new_message_form(form: &MessageForm, errors: &FieldErrors) -> String {
    format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <form method="POST">
      <div class="form-group">
        <textarea name="text" class="form-control" rows="3" placeholder="What's happening?">{text}</textarea>
        {errors}
      </div>
      <button class="btn btn-outline-success btn-block">Add my message!</button>
    </form>
  </div>
</div>"#,
        text = escape(&form.text),
        errors = field_errors(errors, "text"),
    )
}

/// Single message page; the owner gets a delete button.
pub fn show_message(
    msg: &message::Model,
    author: &user::Model,
    viewer: Option<&user::Model>,
) -> String {
    let delete_button = match viewer {
        Some(v) if v.id == author.id => format!(
            r#"<form method="POST" action="/messages/{}/delete">
        <button class="btn btn-outline-danger">Delete</button>
      </form>"#,
            msg.id
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="bg"></div>
<div class="row justify-content-center">
  <div class="col-md-6">
    <ul class="list-group no-hover" id="messages">
      <li class="list-group-item">
        <a href="/users/{author_id}"><img src="{image}" alt="" class="timeline-image"></a>
        <div class="message-area">
          <div class="message-heading">
            <a href="/users/{author_id}">@{username}</a>
            {delete_button}
          </div>
          <p class="single-message">{text}</p>
          <span class="text-muted">{timestamp}</span>
        </div>
      </li>
    </ul>
  </div>
</div>"#,
        author_id = author.id,
        image = escape(&author.image_url),
        username = escape(&author.username),
        text = escape(&msg.text),
        timestamp = msg.timestamp.format("%d %B %Y"),
    )
}
