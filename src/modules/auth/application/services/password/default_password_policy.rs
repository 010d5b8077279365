use regex::Regex;
use std::sync::LazyLock;

use super::common_passwords::COMMON_PASSWORDS;
use crate::auth::application::ports::incoming::password_policy::{
    PasswordContext, PasswordPolicy, PasswordPolicyError,
};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("valid regex"));

/// Length, numeric-only, common-list and similarity-to-account checks.
#[derive(Debug, Clone)]
pub struct DefaultPasswordPolicy {
    min_length: usize,
    max_similarity: f64,
}

impl Default for DefaultPasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_similarity: 0.7,
        }
    }
}

impl DefaultPasswordPolicy {
    pub fn new(min_length: usize, max_similarity: f64) -> Self {
        Self {
            min_length,
            max_similarity,
        }
    }

    fn is_too_similar(&self, password: &str, value: &str) -> bool {
        let value = value.trim().to_lowercase();
        if value.is_empty() {
            return false;
        }

        let password: Vec<char> = password.to_lowercase().chars().collect();

        // The whole attribute plus each word of it ("jane.doe@x.io" -> jane, doe, x, io)
        std::iter::once(value.as_str())
            .chain(NON_WORD.split(&value))
            .filter(|part| !part.is_empty())
            .any(|part| {
                let part: Vec<char> = part.chars().collect();
                similarity_ratio(&password, &part) >= self.max_similarity
            })
    }
}

impl PasswordPolicy for DefaultPasswordPolicy {
    fn validate(
        &self,
        password: &str,
        context: &PasswordContext<'_>,
    ) -> Result<(), Vec<PasswordPolicyError>> {
        let mut errors = Vec::new();

        let attributes: [(&'static str, &str); 3] = [
            ("email address", context.email),
            ("first name", context.first_name),
            ("last name", context.last_name),
        ];
        if let Some((attribute, _)) = attributes
            .iter()
            .find(|(_, value)| self.is_too_similar(password, value))
        {
            errors.push(PasswordPolicyError::TooSimilar { attribute });
        }

        if password.chars().count() < self.min_length {
            errors.push(PasswordPolicyError::TooShort {
                min: self.min_length,
            });
        }

        if COMMON_PASSWORDS.contains(&password.trim().to_lowercase().as_str()) {
            errors.push(PasswordPolicyError::TooCommon);
        }

        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            errors.push(PasswordPolicyError::EntirelyNumeric);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Ratcliff/Obershelp ratio: `2 * matches / (len(a) + len(b))`.
fn similarity_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * matching_chars(a, b)) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Earliest longest common substring as `(start_in_a, start_in_b, len)`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut row = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let k = prev[j] + 1;
                row[j + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = row;
    }

    best
}
