//! # Server-rendered pages
//!
//! Each function returns a complete HTML document. All user-supplied text goes
//! through [`escape`] before it is written into the markup. `now` comes from the
//! application clock and only feeds the footer.

use std::collections::HashMap;
use std::fmt::Write;

use api::{Note, User, UserInfo};
use axum::response::Html;
use chrono::{DateTime, Utc};
use store::TokenStatus;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(title: &str, flash: Option<&str>, body: &str, now: DateTime<Utc>) -> Html<String> {
    let flash = flash
        .map(|message| format!(r#"<p class="flash">{}</p>"#, escape(message)))
        .unwrap_or_default();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Jotter</title>
</head>
<body>
<nav><a href="/">Jotter</a> · <a href="/notes">Notes</a> · <a href="/login">Log in</a> · <a href="/register">Register</a> · <a href="/logout">Log out</a></nav>
<main>
{flash}
{body}
</main>
<footer>&copy; {year} Jotter</footer>
</body>
</html>
"#,
        title = escape(title),
        year = now.format("%Y"),
    ))
}

pub fn index(now: DateTime<Utc>) -> Html<String> {
    layout(
        "Welcome",
        None,
        r#"<h1>Jotter</h1>
<p>Keep short personal notes. <a href="/notes">Open your notes</a>.</p>"#,
        now,
    )
}

pub fn home(now: DateTime<Utc>) -> Html<String> {
    layout(
        "Home",
        None,
        r#"<h1>Jotter</h1>
<p><a href="/login">Log in</a> or <a href="/register">create an account</a>.</p>"#,
        now,
    )
}

pub fn register(flash: Option<&str>, now: DateTime<Utc>) -> Html<String> {
    layout(
        "Register",
        flash,
        r#"<h1>Register</h1>
<form method="post" action="/register">
<label>Username <input name="username" required maxlength="80"></label>
<label>Email <input name="email" type="email" required maxlength="120"></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Register</button>
</form>"#,
        now,
    )
}

pub fn login(flash: Option<&str>, now: DateTime<Utc>) -> Html<String> {
    layout(
        "Log in",
        flash,
        r#"<h1>Log in</h1>
<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>"#,
        now,
    )
}

fn note_article(note: &Note) -> String {
    let subtitle = note
        .subtitle
        .as_deref()
        .map(|s| format!("<h3>{}</h3>", escape(s)))
        .unwrap_or_default();
    format!(
        r#"<article class="note">
<h2>{title}</h2>
{subtitle}
<p>{content}</p>
<time datetime="{iso}">{display}</time>
</article>
"#,
        title = escape(&note.title),
        content = escape(&note.content),
        iso = note.created_at.to_rfc3339(),
        display = note.created_at.format("%Y-%m-%d %H:%M"),
    )
}

pub fn notes(
    user: &User,
    notes: &[Note],
    flash: Option<&str>,
    now: DateTime<Utc>,
) -> Html<String> {
    let mut body = format!(
        r#"<h1>{}'s notes</h1>
<form method="post" action="/notes">
<label>Title <input name="title" required maxlength="100"></label>
<label>Subtitle <input name="subtitle" maxlength="100"></label>
<label>Content <textarea name="content" required></textarea></label>
<button type="submit">Add note</button>
</form>
"#,
        escape(&user.username)
    );
    if notes.is_empty() {
        body.push_str(r#"<p class="empty">No notes yet.</p>"#);
    }
    for note in notes {
        body.push_str(&note_article(note));
    }
    layout("Notes", flash, &body, now)
}

pub fn view_db(users: &[UserInfo], notes: &[Note], now: DateTime<Utc>) -> Html<String> {
    let usernames: HashMap<_, _> = users.iter().map(|u| (u.id, u.username.as_str())).collect();

    let mut body = String::from(
        "<h1>Database</h1>\n<h2>Users</h2>\n<table class=\"users\">\n\
         <tr><th>ID</th><th>Username</th><th>Email</th><th>Token</th></tr>\n",
    );
    for user in users {
        let token = match &user.token {
            TokenStatus::None => "none".to_string(),
            TokenStatus::Active { expires_at } => format!("active until {expires_at}"),
            TokenStatus::Expired { expired_at } => format!("expired at {expired_at}"),
        };
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            user.id,
            escape(&user.username),
            escape(&user.email),
            token,
        );
    }
    body.push_str(
        "</table>\n<h2>Notes</h2>\n<table class=\"notes\">\n\
         <tr><th>ID</th><th>Title</th><th>Author</th><th>Created</th></tr>\n",
    );
    for note in notes {
        let author = usernames.get(&note.user_id).copied().unwrap_or("?");
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            note.id,
            escape(&note.title),
            escape(author),
            note.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    body.push_str("</table>");
    layout("Database", None, &body, now)
}
