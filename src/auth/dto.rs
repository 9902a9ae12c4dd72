use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::auth::repo_types::Profile;

/// Form body for both login and registration.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// Raw profile form; numbers arrive as text and are checked in [`ProfileForm::parse`].
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub height: String,
    pub weight: String,
    pub age: String,
}

pub(crate) fn normalize_username(raw: &str) -> Result<String, &'static str> {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.@-]{1,64}$").unwrap();
    }
    let username = raw.trim();
    if username.is_empty() {
        return Err("Username is required");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may only contain letters, digits and _ . @ -");
    }
    Ok(username.to_owned())
}

impl ProfileForm {
    pub fn parse(&self) -> Result<Profile, String> {
        let height = positive("Height", &self.height)?;
        let weight = positive("Weight", &self.weight)?;
        let age = self
            .age
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|a| (1..=150).contains(a))
            .ok_or_else(|| "Age must be a whole number between 1 and 150".to_string())?;
        Ok(Profile { height, weight, age })
    }
}

fn positive(field: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| format!("{field} must be a positive number"))
}
