//! `${VAR}` and `%VAR%` substitution.

use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;
use std::collections::HashMap;
use std::str::FromStr;

#[allow(clippy::expect_used)]
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$][{](.+?)[}]|[%](.+?)[%]").expect("valid variable pattern"));

/// How path separators inside substituted values are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorMode {
    /// `\` becomes `/`.
    Slash,
    /// `/` becomes `\`.
    BackSlash,
    /// Every separator becomes `\\`, for values embedded in escaped
    /// strings.
    DoubleBackSlash,
}

impl SeparatorMode {
    /// Rewrites the separators of `value`.
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::Slash => value.replace('\\', "/"),
            Self::BackSlash => value.replace('/', "\\"),
            Self::DoubleBackSlash => value.replace(['/', '\\'], "\\\\"),
        }
    }
}

impl FromStr for SeparatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slash" => Ok(Self::Slash),
            "backslash" => Ok(Self::BackSlash),
            "double-backslash" | "doublebackslash" => Ok(Self::DoubleBackSlash),
            other => Err(format!("unknown separator mode: {other}")),
        }
    }
}

/// Replaces `${VAR}` and `%VAR%` in `text`.
///
/// `overrides` holds `KEY=VALUE` pairs. When at least one pair parses, only
/// the pairs are consulted; otherwise values come from the process
/// environment. Variables without a value are left as written.
///
/// # Examples
///
/// ```
/// use cachepack_core::env::template::replace_vars;
///
/// let text = "${TDP_HOME}/lib/%ARCH%/${MISSING}";
/// assert_eq!(
///     replace_vars(text, &["TDP_HOME=/opt/tdp", "ARCH = x86_64"]),
///     "/opt/tdp/lib/x86_64/${MISSING}"
/// );
/// ```
#[must_use]
pub fn replace_vars(text: &str, overrides: &[&str]) -> String {
    substitute(text, overrides, None)
}

/// Same as [`replace_vars`], rewriting separators in each substituted
/// value.
#[must_use]
pub fn replace_vars_with_mode(text: &str, overrides: &[&str], mode: SeparatorMode) -> String {
    substitute(text, overrides, Some(mode))
}

/// Replaces variables using an arbitrary lookup.
pub fn replace_vars_with<F>(text: &str, lookup: F, mode: Option<SeparatorMode>) -> String
where
    F: Fn(&str) -> Option<String>,
{
    VARIABLE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            match (lookup(name), mode) {
                (Some(value), Some(mode)) => mode.apply(&value),
                (Some(value), None) => value,
                (None, _) => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn substitute(text: &str, overrides: &[&str], mode: Option<SeparatorMode>) -> String {
    let pairs = parse_overrides(overrides);
    if pairs.is_empty() {
        replace_vars_with(text, |name| std::env::var(name).ok(), mode)
    } else {
        replace_vars_with(text, |name| pairs.get(name).cloned(), mode)
    }
}

fn parse_overrides(overrides: &[&str]) -> HashMap<String, String> {
    overrides
        .iter()
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => {
                    Some((key.trim().to_string(), value.trim().to_string()))
                }
                _ => None,
            }
        })
        .collect()
}
