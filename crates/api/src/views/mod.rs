//! Server-rendered HTML shells.
//!
//! Markup is deliberately minimal: the pages either explain why access is
//! missing or hand off to the client bundle with the resolved context
//! embedded as JSON.

use serde::Serialize;

use brandkit_auth::PermissionSnapshot;

pub mod auth_context;

pub use auth_context::{AuthContext, AuthPhase};

const CREATION_BUNDLE: &str = "/assets/ip-kit-creation.js";

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

fn layout(title: &str, ctx: &AuthContext, main: &str, tail: &str) -> String {
    let account = match ctx.user() {
        Some(user) => format!(
            r#"<span class="account">Signed in as {}</span>"#,
            escape_html(&user.email)
        ),
        None => r#"<a class="account" href="/login">Sign in</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<header><a href="/">Brandkit</a> {account}</header>
{main}
{tail}</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Fallback shown when the access gate denies IP-kit creation.
pub fn no_brand_access(ctx: &AuthContext) -> String {
    let main = r#"<main class="no-brand-access">
<h1>No Brand Access</h1>
<p>You are not associated with any brand yet, so you cannot create an IP kit.</p>
<p>Ask a brand administrator to add you to their brand, then try again.</p>
<a href="/">Back to dashboard</a>
</main>"#;
    layout("No Brand Access", ctx, main, "")
}

/// Shell that mounts the client-rendered IP-kit creation flow.
pub fn ip_kit_creation(ctx: &AuthContext, snapshot: &PermissionSnapshot) -> Result<String, serde_json::Error> {
    let main = r#"<main id="ip-kit-creation" data-component="ip-kit-creation-client">
<h1>Create IP Kit</h1>
<noscript>The IP kit creation flow needs JavaScript enabled.</noscript>
</main>"#;

    let tail = format!(
        r#"<script id="auth-context" type="application/json">{ctx_json}</script>
<script id="permissions" type="application/json">{perm_json}</script>
<script type="module" src="{CREATION_BUNDLE}"></script>
"#,
        ctx_json = script_json(ctx)?,
        perm_json = script_json(snapshot)?,
    );

    Ok(layout("Create IP Kit", ctx, main, &tail))
}

/// Generic failure page; never carries error detail.
pub fn error_page(ctx: &AuthContext) -> String {
    let main = r#"<main class="error">
<h1>Something went wrong</h1>
<p>Internal server error. Please try again later.</p>
</main>"#;
    layout("Error", ctx, main, "")
}
