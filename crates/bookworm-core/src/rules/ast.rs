//! Small query helpers over the tree-sitter Ruby AST.
//!
//! Chef files are mostly receiverless method calls (`include_recipe 'x'`,
//! `cookbook 'y'`, `depends 'z'`), so most rules reduce to "find calls named
//! N and read their literal arguments".

use tree_sitter::Node;

use crate::parse::RubyAst;

/// Named nodes under `root` (inclusive), in pre-order.
pub fn descendants<'a>(root: Node<'a>) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        if node.is_named() {
            out.push(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return out;
            }
        }
    }
}

/// Method name of a call without an explicit receiver.
pub fn receiverless_method<'a>(ast: &'a RubyAst, node: Node<'a>) -> Option<&'a str> {
    if node.kind() != "call" || node.child_by_field_name("receiver").is_some() {
        return None;
    }
    let method = node.child_by_field_name("method")?;
    Some(ast.text(method))
}

/// Receiverless calls to any of `names` under `root`, in source order.
pub fn calls_named<'a>(ast: &'a RubyAst, root: Node<'a>, names: &[&str]) -> Vec<Node<'a>> {
    descendants(root)
        .into_iter()
        .filter(|n| receiverless_method(ast, *n).is_some_and(|m| names.contains(&m)))
        .collect()
}

/// Receiverless calls to any of `names` among the direct children of `root`.
pub fn top_level_calls_named<'a>(
    ast: &'a RubyAst,
    root: Node<'a>,
    names: &[&str],
) -> Vec<Node<'a>> {
    let mut cursor = root.walk();
    let calls: Vec<Node<'a>> = root
        .named_children(&mut cursor)
        .filter(|n| receiverless_method(ast, *n).is_some_and(|m| names.contains(&m)))
        .collect();
    calls
}

/// Arguments of a call, skipping interleaved comments.
pub fn call_arguments<'a>(call: Node<'a>) -> Vec<Node<'a>> {
    let Some(args) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = args.walk();
    let out: Vec<Node<'a>> = args
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    out
}

/// The `do ... end` or `{ ... }` block attached to a call.
pub fn call_block<'a>(call: Node<'a>) -> Option<Node<'a>> {
    if let Some(block) = call.child_by_field_name("block") {
        return Some(block);
    }
    let mut cursor = call.walk();
    let block = call
        .named_children(&mut cursor)
        .find(|n| matches!(n.kind(), "do_block" | "block"));
    block
}

/// Value of a string literal without interpolation.
///
/// Returns `None` for anything else, including interpolated strings.
pub fn string_literal(ast: &RubyAst, node: Node<'_>) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    literal_content(ast, node)
}

/// Name of a symbol literal (`:run` → `run`).
pub fn symbol_name(ast: &RubyAst, node: Node<'_>) -> Option<String> {
    match node.kind() {
        "simple_symbol" | "symbol" => {
            Some(ast.text(node).trim_start_matches(':').to_string())
        }
        "delimited_symbol" => literal_content(ast, node),
        _ => None,
    }
}

/// Elements of a literal list: `'a'`, `['a', 'b']` or `%w{a b}`.
///
/// Returns `None` as soon as one element is not a literal.
pub fn string_list(ast: &RubyAst, node: Node<'_>) -> Option<Vec<String>> {
    match node.kind() {
        "string" => string_literal(ast, node).map(|s| vec![s]),
        "array" | "string_array" => {
            let mut cursor = node.walk();
            let elements: Vec<Node<'_>> = node
                .named_children(&mut cursor)
                .filter(|n| n.kind() != "comment")
                .collect();
            elements
                .into_iter()
                .map(|el| match el.kind() {
                    "bare_string" => literal_content(ast, el),
                    _ => string_literal(ast, el),
                })
                .collect()
        }
        _ => None,
    }
}

fn literal_content(ast: &RubyAst, node: Node<'_>) -> Option<String> {
    let mut value = String::new();
    let mut cursor = node.walk();
    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "string_content" => value.push_str(ast.text(part)),
            "escape_sequence" => value.push_str(&unescape(ast.text(part))),
            _ => return None,
        }
    }
    Some(value)
}

fn unescape(seq: &str) -> String {
    match seq {
        "\\n" => "\n".to_string(),
        "\\t" => "\t".to_string(),
        "\\s" => " ".to_string(),
        "\\0" => "\0".to_string(),
        other => other.strip_prefix('\\').unwrap_or(other).to_string(),
    }
}
