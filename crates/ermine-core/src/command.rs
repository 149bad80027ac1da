//! Strict parsers for single entity / relationship commands.
//!
//! These are the interactive entry points: malformed input is a hard
//! [`Error::Parse`] naming the offending fragment, never a silent coercion.
//! Whole-document loading wraps them with a lenient policy in
//! [`crate::document`].

use crate::error::{Error, Result};
use crate::model::{Attribute, AttrRole, Cardinality, Entity, EntityKind, NodeId, RelStyle, Relationship};
use crate::utils::{format_attr_name, split_outside_parens};

/// Parses one entity command: `name[.kind[.opt1[.opt2...]]] [attr[, attr]*]`.
///
/// The kind defaults to `strong`. Attribute prefixes: `u.` primary key,
/// `du.` partial key; names are title-cased for display. An absent attribute
/// tail yields an empty list, not an error.
pub fn parse_entity_command(text: &str) -> Result<Entity> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::parse(
            "Entity command is empty. Expected something like: \"User.strong u.id, name\".",
        ));
    }

    let (header, attr_tail) = match text.split_once(char::is_whitespace) {
        Some((header, tail)) => (header, tail.trim()),
        None => (text, ""),
    };

    let mut segments = header.split('.');
    let name = segments.next().unwrap_or_default().to_lowercase();
    if name.is_empty() {
        return Err(Error::parse(format!(
            "Missing entity name at the start of: \"{text}\"."
        )));
    }

    let kind = match segments.next() {
        None => EntityKind::Strong,
        Some(token) => EntityKind::from_token(&token.to_lowercase()).ok_or_else(|| {
            Error::parse(format!("Unknown entity kind \"{token}\" in \"{header}\"."))
        })?,
    };
    let options: Vec<String> = segments.map(|s| s.trim().to_lowercase()).collect();

    Ok(Entity {
        name,
        kind,
        options,
        attributes: parse_attribute_list(attr_tail),
    })
}

fn parse_attribute_list(tail: &str) -> Vec<Attribute> {
    if tail.is_empty() {
        return Vec::new();
    }
    split_outside_parens(tail, ',')
        .into_iter()
        .map(|raw| {
            let raw = raw.trim();
            for (prefix, role) in [("u.", AttrRole::Primary), ("du.", AttrRole::Partial)] {
                if raw.starts_with(prefix) {
                    // The display name is the second dot segment.
                    let name = raw.split('.').nth(1).unwrap_or_default();
                    return Attribute::new(format_attr_name(name), role);
                }
            }
            Attribute::plain(format_attr_name(raw))
        })
        .collect()
}

/// Parses one relationship command:
/// `from cardBA name cardAB to [style] [{attr[, attr]*}]`.
///
/// Endpoint tokens are qualified to `entity:<name>` unless they already
/// carry a namespace tag; only end-user input is ever bare.
pub fn parse_relationship_command(text: &str) -> Result<Relationship> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::parse(
            "Relationship command is empty. Expected: \"<from> <card_to_from> <name> <card_from_to> <to> [style]\".",
        ));
    }

    let clause = text.split('{').next().unwrap_or_default().trim();
    if clause.is_empty() {
        return Err(Error::parse(format!(
            "Missing relationship clause in \"{text}\"."
        )));
    }

    let tokens: Vec<&str> = clause.split_whitespace().collect();
    if tokens.len() < 5 {
        return Err(Error::parse(format!(
            "Relationship command is incomplete near \"{clause}\". \
             Expected: \"<from> <card_to_from> <name> <card_from_to> <to> [style]\"."
        )));
    }

    let style = match tokens.get(5) {
        None => RelStyle::Single,
        Some(token) => RelStyle::from_token(token)
            .ok_or_else(|| Error::parse(format!("Unknown relationship style \"{token}\".")))?,
    };

    let mut rel = Relationship::between(
        tokens[2],
        style,
        NodeId::qualify(tokens[0]),
        NodeId::qualify(tokens[4]),
        parse_cardinality(tokens[3])?,
        parse_cardinality(tokens[1])?,
    );
    rel.attributes = parse_block_attributes(text);
    Ok(rel)
}

fn parse_cardinality(token: &str) -> Result<Cardinality> {
    Cardinality::from_code(token).ok_or_else(|| {
        Error::parse(format!(
            "Unknown cardinality \"{token}\"; expected one of 11, 01, 0m, 1m."
        ))
    })
}

/// Plain attributes from an optional `{a, b}` block: trimmed, not
/// title-cased.
fn parse_block_attributes(text: &str) -> Vec<Attribute> {
    let Some(open) = text.find('{') else {
        return Vec::new();
    };
    let Some(len) = text[open + 1..].find('}') else {
        return Vec::new();
    };
    text[open + 1..open + 1 + len]
        .split(',')
        .map(|attr| Attribute::plain(attr.trim()))
        .collect()
}
