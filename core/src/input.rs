use std::collections::HashMap;
use anyhow::{anyhow, Result};

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub positional: Vec<String>,
    pub params: HashMap<String, String>,
}

/// Splits `key:value` tokens from plain arguments. Later duplicates win.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut positional = Vec::new();
    let mut params = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                params.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        positional.push(arg.clone());
    }

    ParsedInput { positional, params }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Expands every key of `params` to its full name. Unknown, ambiguous or
/// repeated keys are errors.
pub fn normalize_params(
    params: HashMap<String, String>,
    candidates: &[&str],
) -> Result<HashMap<String, String>> {
    let mut normalized = HashMap::new();
    for (key, value) in params {
        let full_key = expand_key(&key, candidates)?;
        if normalized.insert(full_key.clone(), value).is_some() {
            return Err(anyhow!("Parameter '{}' given more than once", full_key));
        }
    }
    Ok(normalized)
}
