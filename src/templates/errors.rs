use super::layout;

fn error_page(title: &str, heading: &str, detail: &str) -> String {
    let body = format!(
        r#"<div class="error-page">
  <h1>{heading}</h1>
  <p>{detail}</p>
  <a href="/" class="btn btn-primary">Go home</a>
</div>"#,
        heading = super::escape(heading),
        detail = super::escape(detail),
    );
    layout(title, None, &[], &body)
}

pub fn not_found() -> String {
    error_page("Page not found", "404", "Sorry, we couldn't find that page.")
}

pub fn forbidden() -> String {
    error_page("Forbidden", "403", "You can't do that.")
}

pub fn bad_request(detail: &str) -> String {
    error_page("Bad request", "400", detail)
}

pub fn server_error() -> String {
    error_page("Server error", "500", "Something went wrong on our end.")
}
