//! Server-rendered pages. All user- and model-supplied text goes through
//! [`escape`] or [`render_markdown`] before it reaches the markup.

use crate::service::CreditPackage;
use axum::response::Html;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};

const STYLE: &str = r#"
body { font-family: Arial, sans-serif; background: #f8f8ff; padding: 40px; }
.container { max-width: 600px; margin: auto; background: #fff; border-radius: 8px; box-shadow: 0 2px 8px #ddd; padding: 30px; }
h1 { color: #2ecc40; }
input[type=text], input[type=password] { width: 80%; padding: 8px; }
button { background: #2ecc40; color: #fff; border: none; padding: 10px 18px; border-radius: 4px; font-weight: bold; }
button:hover { background: #27ae35; }
.result { margin-top: 30px; }
.credits { float: right; color: #888; }
.flash { color: red; }
.packages form { display: inline-block; margin: 4px 6px 4px 0; }
"#;

/// Generated article shown under the form.
pub struct GeneratedView<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

pub struct IndexView<'a> {
    pub username: &'a str,
    pub credits: i64,
    pub flash: Option<&'a str>,
    pub packages: &'a [CreditPackage],
    pub generated: Option<GeneratedView<'a>>,
}

/// HTML-escape `text` for use in element content or quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render model output as Markdown. Raw HTML is shown as text and
/// script-capable link targets are dropped.
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Link {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => Event::Start(Tag::Image {
                link_type,
                dest_url: safe_url(dest_url),
                title,
                id,
            }),
            other => other,
        });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let scheme = url.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("data:") || scheme.starts_with("vbscript:") {
        CowStr::from("#")
    } else {
        url
    }
}

fn flash_block(flash: Option<&str>) -> String {
    flash
        .map(|msg| format!(r#"<div class="flash">{}</div>"#, escape(msg)))
        .unwrap_or_default()
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
<div class="container">
{body}
</div>
</body>
</html>"#,
        title = escape(title),
    ))
}

pub fn index_page(view: &IndexView<'_>) -> Html<String> {
    let mut body = format!(
        r#"<div class="credits">{user} · Credits: {credits}</div>
<h1>AI Content Generator</h1>
<form method="POST" action="/">
    <label for="topic">Thema/Nische:</label><br>
    <input type="text" name="topic" id="topic" required placeholder="z.B. Affiliate Marketing, Fitness, ..."><br><br>
    <button type="submit">Content generieren (1 Credit)</button>
</form>
{flash}"#,
        user = escape(view.username),
        credits = view.credits,
        flash = flash_block(view.flash),
    );

    if let Some(generated) = &view.generated {
        body.push_str(&format!(
            r#"
<div class="result">
    <hr>
    <h2>{}</h2>
    {}
</div>"#,
            escape(generated.title),
            render_markdown(generated.body),
        ));
    }

    if !view.packages.is_empty() {
        body.push_str("\n<hr>\n<h3>Credits aufladen</h3>\n<div class=\"packages\">\n");
        for pkg in view.packages {
            body.push_str(&format!(
                r#"<form method="POST" action="/create_checkout_session">
    <input type="hidden" name="lookup_key" value="{key}">
    <button type="submit">{name}{credits} Credits – {amount}</button>
</form>
"#,
                key = escape(&pkg.lookup_key),
                name = pkg
                    .product_name
                    .as_deref()
                    .map(|n| format!("{}: ", escape(n)))
                    .unwrap_or_default(),
                credits = pkg.credits,
                amount = escape(&pkg.amount_display()),
            ));
        }
        body.push_str("</div>\n");
    }

    body.push_str("\n<br>\n<a href=\"/logout\">Logout</a>");
    page("AI Content Generator", &body)
}

fn credentials_form(heading: &str, action: &str, flash: Option<&str>, other: (&str, &str)) -> String {
    format!(
        r#"<h2>{heading}</h2>
<form method="POST" action="{action}">
    <input name="username" placeholder="Benutzername" required><br>
    <input name="password" type="password" placeholder="Passwort" required><br>
    <button type="submit">{heading}</button>
</form>
<a href="{href}">{label}</a>
{flash}"#,
        href = other.0,
        label = other.1,
        flash = flash_block(flash),
    )
}

pub fn login_page(flash: Option<&str>) -> Html<String> {
    page(
        "Login",
        &credentials_form("Login", "/login", flash, ("/register", "Registrieren")),
    )
}

pub fn register_page(flash: Option<&str>) -> Html<String> {
    page(
        "Registrieren",
        &credentials_form("Registrieren", "/register", flash, ("/login", "Zum Login")),
    )
}
