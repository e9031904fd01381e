//! Parser for the outline notation → ComponentTree.
//!
//! Built on `winnow` 0.7. The notation is one component per line, with
//! containers opening a brace block:
//!
//! ```text
//! # Contact details
//! row @name_row {
//!   input @first [width: 0.5]
//!   input @last [width: 0.5, align: end]
//! }
//! custom "signature" @sig
//! ```
//!
//! Components without an `@id` get a generated `_<kind>_N` id.

use crate::id::ComponentId;
use crate::model::*;
use std::collections::HashSet;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse an outline document into a `ComponentTree`.
///
/// # Errors
/// Returns a message with the 1-based line of the failure for syntax
/// errors, unknown keywords, leaves with children, reserved or duplicate ids.
#[must_use = "parsing result should be used"]
pub fn parse_outline(input: &str) -> Result<ComponentTree, String> {
    let mut rest = input;
    let mut roots = Vec::new();

    skip_ws_and_comments(&mut rest);

    while !rest.is_empty() {
        let line = line_of(input, rest);
        let parsed = parse_node
            .parse_next(&mut rest)
            .map_err(|e| format!("Node parse error at line {}: {e}", line_of(input, rest)))?;
        roots.push(build_node(parsed).map_err(|e| format!("line {line}: {e}"))?);
        skip_ws_and_comments(&mut rest);
    }

    let tree = ComponentTree::from_roots(roots);
    check_unique_ids(&tree)?;
    Ok(tree)
}

fn line_of(full: &str, rest: &str) -> usize {
    let consumed = &full[..full.len() - rest.len()];
    consumed.matches('\n').count() + 1
}

fn check_unique_ids(tree: &ComponentTree) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in tree.ids() {
        if !seen.insert(id) {
            return Err(format!("duplicate id {id}"));
        }
    }
    Ok(())
}

/// Internal representation during parsing, before keyword resolution.
#[derive(Debug)]
struct ParsedNode {
    keyword: String,
    custom_name: Option<String>,
    id: Option<ComponentId>,
    hints: LayoutHints,
    /// `None` when no brace block followed.
    children: Option<Vec<ParsedNode>>,
}

fn build_node(parsed: ParsedNode) -> Result<ComponentNode, String> {
    let kind = match parsed.keyword.as_str() {
        "row" => ComponentKind::ROW,
        "column" => ComponentKind::COLUMN,
        "custom" => {
            let name = parsed
                .custom_name
                .ok_or("`custom` needs a quoted field type, e.g. custom \"signature\"")?;
            ComponentKind::Leaf(FieldType::Custom(name))
        }
        other => FieldType::from_keyword(other)
            .map(ComponentKind::Leaf)
            .ok_or_else(|| format!("unknown component keyword `{other}`"))?,
    };

    let id = parsed
        .id
        .unwrap_or_else(|| ComponentId::with_prefix(&format!("_{}", kind.id_prefix())));
    if id.is_root() {
        return Err("`@root` is reserved for the top level".to_string());
    }

    let mut node = ComponentNode::new(id, kind).with_hints(parsed.hints);
    if let Some(children) = parsed.children {
        if node.kind.is_leaf() {
            return Err(format!("leaf {id} cannot have children"));
        }
        node.children = children
            .into_iter()
            .map(build_node)
            .collect::<Result<_, _>>()?;
    }
    Ok(node)
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with('#') {
            if let Some(pos) = input.find('\n') {
                *input = &input[pos + 1..];
            } else {
                *input = "";
            }
            continue;
        }
        if *input == before {
            break;
        }
    }
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    use winnow::ascii::space0;
    let _: Result<&str, winnow::error::ErrMode<ContextError>> = space0.parse_next(input);
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Can `s` be written as a bare identifier (`@s`, keywords, hint keys)?
pub fn is_outline_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_identifier_char)
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., is_identifier_char).parse_next(input)
}

fn parse_component_id(input: &mut &str) -> ModalResult<ComponentId> {
    let _ = '@'.parse_next(input)?;
    parse_identifier.map(ComponentId::intern).parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f32>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

/// `"..."` with `\"` and `\\` escapes.
fn parse_quoted_string(input: &mut &str) -> ModalResult<String> {
    let _ = '"'.parse_next(input)?;
    let text: &str = *input;
    let mut out = String::new();
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                *input = &text[i + 1..];
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(winnow::error::ErrMode::Cut(ContextError::new()))
}

// ─── Hints parser ───────────────────────────────────────────────────────

/// `[width: 0.5, align: center]`
fn parse_hints(input: &mut &str) -> ModalResult<LayoutHints> {
    let _ = '['.parse_next(input)?;
    let mut hints = LayoutHints::default();
    skip_space(input);

    while !input.starts_with(']') {
        let key = parse_identifier.parse_next(input)?;
        skip_space(input);
        let _ = ':'.parse_next(input)?;
        skip_space(input);

        match key {
            "width" | "w" => {
                hints.width = Some(parse_number.parse_next(input)?);
            }
            "align" => {
                let value = parse_identifier.parse_next(input)?;
                hints.alignment = Some(
                    Alignment::from_keyword(value)
                        .ok_or_else(|| winnow::error::ErrMode::Backtrack(ContextError::new()))?,
                );
            }
            _ => return Err(winnow::error::ErrMode::Backtrack(ContextError::new())),
        }

        skip_space(input);
        if input.starts_with(',') {
            *input = &input[1..];
            skip_space(input);
        }
    }

    let _ = ']'.parse_next(input)?;
    Ok(hints)
}

// ─── Node parser ─────────────────────────────────────────────────────────

fn parse_node(input: &mut &str) -> ModalResult<ParsedNode> {
    let keyword = parse_identifier.parse_next(input)?.to_string();
    skip_space(input);

    let custom_name = if input.starts_with('"') {
        let name = parse_quoted_string.parse_next(input)?;
        skip_space(input);
        Some(name)
    } else {
        None
    };

    let id = if input.starts_with('@') {
        Some(parse_component_id.parse_next(input)?)
    } else {
        None
    };
    skip_space(input);

    let hints = if input.starts_with('[') {
        parse_hints.parse_next(input)?
    } else {
        LayoutHints::default()
    };
    skip_space(input);

    let children = if input.starts_with('{') {
        let _ = '{'.parse_next(input)?;
        let mut children = Vec::new();
        skip_ws_and_comments(input);
        while !input.starts_with('}') {
            if input.is_empty() {
                // Unterminated block
                return Err(winnow::error::ErrMode::Cut(ContextError::new()));
            }
            children.push(parse_node.parse_next(input)?);
            skip_ws_and_comments(input);
        }
        let _ = '}'.parse_next(input)?;
        Some(children)
    } else {
        None
    };

    Ok(ParsedNode {
        keyword,
        custom_name,
        id,
        hints,
        children,
    })
}
