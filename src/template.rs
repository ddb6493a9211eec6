//! Engage-message content rendering — substitutes customer and user fields
//! into `{{customer.*}}` / `{{user.*}}` placeholders.
//!
//! Placeholder names are case-insensitive and tolerate whitespace inside the
//! braces. Unrecognized placeholders are left untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::store::models::{Customer, User};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\{\{\s*(customer\.name|customer\.email|user\.fullName|user\.position|user\.email)\s*\}\}",
    )
    .unwrap()
});

/// Render an engage-message template against a customer/user pair.
pub fn render(content: &str, customer: &Customer, user: &User) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| {
            match caps[1].to_ascii_lowercase().as_str() {
                "customer.name" => customer.name.clone(),
                "customer.email" => customer.email.clone(),
                "user.fullname" => user.full_name.clone(),
                "user.position" => user.position.clone(),
                "user.email" => user.email.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}
