//! Contact values.
//!
//! Contacts may carry an email annotation in either `Name <email>` or
//! `Name [email]` form. Both normalize to `Name <email>`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: Option<String>,
}

impl Contact {
    /// Parse one contact element; `None` when the annotation is malformed.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        let Some(open) = input.find(['<', '[']) else {
            if input.contains(['>', ']']) {
                return None;
            }
            return Some(Self {
                name: input.to_string(),
                email: None,
            });
        };
        let close = if input[open..].starts_with('<') {
            '>'
        } else {
            ']'
        };
        let inner = input[open + 1..].strip_suffix(close)?;
        let name = input[..open].trim();
        let email = inner.trim();
        if name.is_empty() || !is_email(email) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            email: Some(email.to_string()),
        })
    }

    /// `mailto:` link for the annotated email.
    pub fn mailto(&self) -> Option<String> {
        self.email.as_ref().map(|email| format!("mailto:{email}"))
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.name, email),
            None => f.write_str(&self.name),
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
}
