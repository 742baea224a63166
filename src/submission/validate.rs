use regex::Regex;
use std::sync::LazyLock;

use crate::site::{FieldRule, Rule};

use super::fields::FormSubmission;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    /// One message per failed rule, in field declaration order.
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Check a submission against the site's field rules.
pub fn validate(submission: &FormSubmission, rules: &[FieldRule]) -> ValidationResult {
    let errors: Vec<String> = rules
        .iter()
        .filter(|rule| !passes(rule.rule, submission.get(rule.field)))
        .map(|rule| rule.message.to_string())
        .collect();

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Permissive check: something, an `@`, something, a dot, something. No whitespace.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

fn passes(rule: Rule, value: Option<&str>) -> bool {
    let Some(value) = value else {
        return false;
    };

    match rule {
        Rule::MinLength(min) => value.trim().encode_utf16().count() >= min,
        Rule::Email => is_valid_email(value),
        Rule::Required => !value.is_empty(),
    }
}
