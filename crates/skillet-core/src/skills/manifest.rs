//! `SKILL.md` front-matter parsing.
//!
//! Manifests start with a `---` delimited block of `key: value` lines
//! (arrays written as `[a, b, c]`), followed by a freeform body.

use std::collections::BTreeMap;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontMatterValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrontMatterValue::Scalar(value) => Some(value),
            FrontMatterValue::List(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub fields: BTreeMap<String, FrontMatterValue>,
    pub body: String,
}

impl Manifest {
    pub fn parse(content: &str) -> Self {
        let Some((front, body)) = split_front_matter(content) else {
            return Self {
                fields: BTreeMap::new(),
                body: content.to_string(),
            };
        };
        Self {
            fields: parse_fields(front),
            body: body.to_string(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(FrontMatterValue::as_str)
    }

    /// Check the required `name` and `description` keys.
    pub fn validate(&self) -> anyhow::Result<()> {
        for key in ["name", "description"] {
            if self.get_str(key).is_none_or(str::is_empty) {
                anyhow::bail!("Manifest is missing required front-matter key '{}'", key);
            }
        }
        Ok(())
    }
}

fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content
        .strip_prefix(DELIMITER)?
        .strip_prefix("\r\n")
        .or_else(|| content.strip_prefix(DELIMITER)?.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let front = &rest[..offset];
            let body = rest[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Some((front, body));
        }
        offset += line.len();
    }
    None
}

fn parse_fields(front: &str) -> BTreeMap<String, FrontMatterValue> {
    let mut fields = BTreeMap::new();
    let mut last_key: Option<String> = None;

    for line in front.lines() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        // Indented lines continue the previous scalar
        if line.starts_with([' ', '\t']) {
            if let Some(FrontMatterValue::Scalar(value)) =
                last_key.as_ref().and_then(|key| fields.get_mut(key))
            {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
            }
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_string();
        fields.insert(key.clone(), parse_value(value.trim()));
        last_key = Some(key);
    }
    fields
}

fn parse_value(raw: &str) -> FrontMatterValue {
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return FrontMatterValue::List(items);
    }
    // Block scalar indicators; the text follows on indented lines
    if raw == "|" || raw == ">" {
        return FrontMatterValue::Scalar(String::new());
    }
    FrontMatterValue::Scalar(unquote(raw).to_string())
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    raw
}
