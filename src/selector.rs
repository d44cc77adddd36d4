use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty() {
            self.id.as_deref()
        } else {
            None
        }
    }
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<SelectorStep>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    let mut groups = Vec::new();
    for group in split_groups(selector)? {
        groups.push(parse_step(&group, selector)?);
    }
    Ok(groups)
}

fn split_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                let trimmed = current.trim();
                if trimmed.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                groups.push(trimmed.to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn parse_step(group: &str, original: &str) -> Result<SelectorStep> {
    let chars = group.chars().collect::<Vec<_>>();
    let mut step = SelectorStep::default();
    let mut i = 0usize;

    if i < chars.len() && is_ident_start(chars[i]) {
        let start = i;
        while i < chars.len() && is_ident_char(chars[i]) {
            i += 1;
        }
        step.tag = Some(chars[start..i].iter().collect::<String>().to_ascii_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                i += 1;
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                if start == i {
                    return Err(Error::UnsupportedSelector(original.into()));
                }
                step.id = Some(chars[start..i].iter().collect());
            }
            '.' => {
                i += 1;
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                if start == i {
                    return Err(Error::UnsupportedSelector(original.into()));
                }
                step.classes.push(chars[start..i].iter().collect());
            }
            '[' => {
                let (condition, next) = parse_attr_condition(&chars, i, original)?;
                step.attrs.push(condition);
                i = next;
            }
            // Combinators and pseudo-classes are outside this engine's subset.
            _ => return Err(Error::UnsupportedSelector(original.into())),
        }
    }

    if step.tag.is_none() && step.id.is_none() && step.classes.is_empty() && step.attrs.is_empty() {
        return Err(Error::UnsupportedSelector(original.into()));
    }
    Ok(step)
}

fn parse_attr_condition(
    chars: &[char],
    at: usize,
    original: &str,
) -> Result<(AttrCondition, usize)> {
    let mut i = at + 1;
    skip_spaces(chars, &mut i);

    let name_start = i;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    if name_start == i {
        return Err(Error::UnsupportedSelector(original.into()));
    }
    let key = chars[name_start..i]
        .iter()
        .collect::<String>()
        .to_ascii_lowercase();

    skip_spaces(chars, &mut i);
    if i < chars.len() && chars[i] == ']' {
        return Ok((AttrCondition::Exists { key }, i + 1));
    }

    let contains = i < chars.len() && chars[i] == '*';
    if contains {
        i += 1;
    }
    if i >= chars.len() || chars[i] != '=' {
        return Err(Error::UnsupportedSelector(original.into()));
    }
    i += 1;
    skip_spaces(chars, &mut i);

    let value = if i < chars.len() && (chars[i] == '"' || chars[i] == '\'') {
        let quote = chars[i];
        i += 1;
        let start = i;
        while i < chars.len() && chars[i] != quote {
            i += 1;
        }
        if i >= chars.len() {
            return Err(Error::UnsupportedSelector(original.into()));
        }
        let value = chars[start..i].iter().collect::<String>();
        i += 1;
        value
    } else {
        let start = i;
        while i < chars.len() && chars[i] != ']' && !chars[i].is_whitespace() {
            i += 1;
        }
        if start == i {
            return Err(Error::UnsupportedSelector(original.into()));
        }
        chars[start..i].iter().collect()
    };

    skip_spaces(chars, &mut i);
    if i >= chars.len() || chars[i] != ']' {
        return Err(Error::UnsupportedSelector(original.into()));
    }

    let condition = if contains {
        AttrCondition::Contains { key, value }
    } else {
        AttrCondition::Eq { key, value }
    };
    Ok((condition, i + 1))
}

fn skip_spaces(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}
