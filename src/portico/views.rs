//! HTML rendering for pages and HTMX fragments.
//!
//! Markup is built with plain functions returning strings; every
//! user-supplied value goes through [`escape`].

/// Public fields of the signed-in user passed to the views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUser {
    pub email: String,
    pub name: String,
}

/// Minimal HTML entity escaping for text and attribute positions.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(user: Option<&PageUser>) -> String {
    match user {
        Some(user) => format!(
            r#"<nav><a href="/">Home</a> <span>{}</span> <a href="/logout">Log out</a></nav>"#,
            escape(&user.email)
        ),
        None => {
            r#"<nav><a href="/">Home</a> <a href="/login">Log in</a> <a href="/register">Register</a></nav>"#
                .to_string()
        }
    }
}

fn layout(title: &str, user: Option<&PageUser>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/public/styles.css">
<script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body>
{nav}
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(user),
        body = body,
    )
}

#[must_use]
pub fn home(user: Option<&PageUser>) -> String {
    let body = match user {
        Some(user) => format!(
            "<h1>Welcome back, {}</h1><p>You are signed in as {}.</p>",
            escape(&user.name),
            escape(&user.email)
        ),
        None => "<h1>Welcome</h1><p>Log in or register to get started.</p>".to_string(),
    };
    layout("Home", user, &body)
}

#[must_use]
pub fn register(user: Option<&PageUser>) -> String {
    let body = r##"<h1>Register</h1>
<form hx-post="/api/register" hx-target="#result" hx-swap="innerHTML">
  <label>Name <input type="text" name="name"></label>
  <label>Email <input type="email" name="email"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Create account</button>
</form>
<div id="result"></div>"##;
    layout("Register", user, body)
}

#[must_use]
pub fn login(user: Option<&PageUser>) -> String {
    let body = r##"<h1>Log in</h1>
<form hx-post="/api/login" hx-target="#result" hx-swap="innerHTML">
  <label>Email <input type="email" name="email"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Log in</button>
</form>
<div id="result"></div>"##;
    layout("Log in", user, body)
}

#[must_use]
pub fn not_found() -> String {
    layout(
        "Not found",
        None,
        r#"<h1>404</h1><p>This page does not exist. <a href="/">Go home</a>.</p>"#,
    )
}

/// Fragment swapped into the form's result area by HTMX.
#[must_use]
pub fn auth_result(success: bool, message: &str) -> String {
    let class = if success { "result ok" } else { "result err" };
    format!(r#"<p class="{class}">{}</p>"#, escape(message))
}
