use axum::response::Html;
use tera::{Context, Tera};

use crate::error::AppError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("profile.html", include_str!("../templates/profile.html")),
    ("steps.html", include_str!("../templates/steps.html")),
    ("diet.html", include_str!("../templates/diet.html")),
    ("result.html", include_str!("../templates/result.html")),
    ("quotes.html", include_str!("../templates/quotes.html")),
    ("reminder.html", include_str!("../templates/reminder.html")),
    ("contact.html", include_str!("../templates/contact.html")),
];

/// Compiled HTML templates. `.html` templates are autoescaped.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, ctx: &Context) -> Result<Html<String>, AppError> {
        Ok(Html(self.tera.render(name, ctx)?))
    }
}

/// Context every page starts from; `signed_in` drives the nav bar.
pub fn page_context(signed_in: bool) -> Context {
    let mut ctx = Context::new();
    ctx.insert("signed_in", &signed_in);
    ctx.insert("error", &Option::<String>::None);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_renders_with_the_base_context() {
        let pages = Pages::new().expect("templates compile");
        for name in ["login.html", "register.html", "contact.html"] {
            let Html(body) = pages.render(name, &page_context(false)).unwrap();
            assert!(body.contains("<!DOCTYPE html>"), "{name}");
        }
    }

    #[test]
    fn signed_in_nav_offers_logout() {
        let pages = Pages::new().unwrap();
        let Html(body) = pages.render("contact.html", &page_context(true)).unwrap();
        assert!(body.contains("/logout"));
        let Html(body) = pages.render("contact.html", &page_context(false)).unwrap();
        assert!(!body.contains("/logout"));
    }

    #[test]
    fn user_text_is_escaped() {
        let pages = Pages::new().unwrap();
        let mut ctx = page_context(true);
        ctx.insert(
            "reminders",
            &vec![serde_json::json!({ "message": "<script>alert(1)</script>", "time": "now" })],
        );
        let Html(body) = pages.render("reminder.html", &ctx).unwrap();
        assert!(!body.contains("<script>alert(1)</script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn error_message_is_shown_when_present() {
        let pages = Pages::new().unwrap();
        let mut ctx = page_context(false);
        ctx.insert("error", "Username already exists");
        let Html(body) = pages.render("register.html", &ctx).unwrap();
        assert!(body.contains("Username already exists"));
    }
}
