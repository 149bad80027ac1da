//! Whole-document parsing and serialization of diagram-code text.
//!
//! Documents load best-effort: a malformed command anywhere degrades the
//! whole result to an empty model (with a warning) instead of failing the
//! load, so a corrupt or partial file can never take the editor down. The
//! strict per-command policy lives in [`crate::command`]; the two entry
//! points are deliberately not unified.

use indexmap::IndexMap;

use crate::command::{parse_entity_command, parse_relationship_command};
use crate::error::Result;
use crate::model::{AttrRole, Attribute, Diagram, Entity, EntityKind, RelStyle, Relationship};

/// Parses a diagram-code document into a raw (underived) model. A missing
/// section yields an empty list on that side; any parse failure yields an
/// empty model.
pub fn parse_document(text: &str) -> Diagram {
    match parse_document_strict(text) {
        Ok(diagram) => diagram,
        Err(err) => {
            tracing::warn!(error = %err, "diagram-code document failed to parse; loading empty model");
            Diagram::default()
        }
    }
}

fn parse_document_strict(text: &str) -> Result<Diagram> {
    // Accumulate by lowercased name: the first occurrence wins, later
    // duplicates are dropped.
    let mut entities: IndexMap<String, Entity> = IndexMap::new();
    if let Some(body) = section_body(text, "entities:") {
        for command in commands(body) {
            let entity = parse_entity_command(command)?;
            if entities.contains_key(&entity.name) {
                tracing::warn!(name = %entity.name, "duplicate entity ignored (first occurrence wins)");
                continue;
            }
            entities.insert(entity.name.clone(), entity);
        }
    }

    let mut relationships = Vec::new();
    if let Some(body) = section_body(text, "relationships:") {
        for command in commands(body) {
            relationships.push(parse_relationship_command(command)?);
        }
    }

    Ok(Diagram {
        entities: entities.into_values().collect(),
        relationships,
    })
}

/// The section starting at `header`, running to the next `identifier:`
/// header line or end of input.
fn section_body<'a>(text: &'a str, header: &str) -> Option<&'a str> {
    let start = text.find(header)? + header.len();
    let body = &text[start..];
    let end = next_header_offset(body).unwrap_or(body.len());
    Some(&body[..end])
}

/// Byte offset of the next line (beyond the current one) holding only an
/// `identifier:` section header.
fn next_header_offset(text: &str) -> Option<usize> {
    let mut offset = 0;
    for (ix, line) in text.split_inclusive('\n').enumerate() {
        if ix > 0 && is_section_header(line) {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    let ident_len = trimmed
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    ident_len > 0 && trimmed[ident_len..] == *":"
}

/// Individual `;`-terminated commands. The trailing semicolon is required:
/// whatever follows the last one is discarded.
fn commands(body: &str) -> impl Iterator<Item = &str> {
    let mut segments: Vec<&str> = body.split(';').collect();
    segments.pop();
    segments.into_iter().map(str::trim)
}

/// Renders the model back to diagram-code text. Derived elements (the
/// `connector` entities and headless relationships) are skipped: re-parsing
/// the document regenerates them.
///
/// Round trip: `parse_document(serialize_document(E, R))` reproduces the
/// non-derived subset of `(E, R)` exactly.
pub fn serialize_document(entities: &[Entity], relationships: &[Relationship]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("entities:".to_string());
    for entity in entities {
        if entity.kind == EntityKind::Connector {
            continue;
        }
        let mut code = entity.name.to_lowercase();
        if entity.kind != EntityKind::Strong {
            code.push('.');
            code.push_str(entity.kind.as_str());
        }
        for option in &entity.options {
            code.push('.');
            code.push_str(option);
        }
        if !entity.attributes.is_empty() {
            let attrs: Vec<String> = entity.attributes.iter().map(serialize_attr).collect();
            code.push(' ');
            code.push_str(&attrs.join(", "));
        }
        code.push(';');
        lines.push(code);
    }

    lines.push("relationships:".to_string());
    for rel in relationships {
        if rel.style.is_headless() {
            continue;
        }
        let (from, to) = rel.endpoints();
        // Persisted text refers to plain entity names; the namespace tags
        // come back at parse time.
        let mut code = format!(
            "{} {} {} {} {}",
            from.name(),
            rel.arrows[1].cardinality,
            rel.name,
            rel.arrows[0].cardinality,
            to.name(),
        );
        if rel.style != RelStyle::Single {
            code.push(' ');
            code.push_str(rel.style.as_token());
        }
        if !rel.attributes.is_empty() {
            let attrs: Vec<&str> = rel.attributes.iter().map(|a| a.name.as_str()).collect();
            code.push_str(&format!(" {{{}}}", attrs.join(", ")));
        }
        code.push(';');
        lines.push(code);
    }

    lines.join("\n")
}

fn serialize_attr(attr: &Attribute) -> String {
    match attr.role {
        AttrRole::Primary => format!("u.{}", attr.name),
        AttrRole::Partial => format!("du.{}", attr.name),
        AttrRole::Plain => attr.name.clone(),
    }
}
