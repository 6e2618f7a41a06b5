use std::fmt;
use std::sync::Arc;

use tree_sitter::{Node, Parser, Tree};

use crate::error::{BookwormError, Result};
use crate::parse::ParsedSource;

/// A parsed Ruby file: the syntax tree plus the text it points into.
#[derive(Clone)]
pub struct RubyAst {
    tree: Tree,
    source: Arc<str>,
}

impl RubyAst {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

impl fmt::Debug for RubyAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RubyAst")
            .field("root", &self.root().to_sexp())
            .finish()
    }
}

/// Reusable tree-sitter parser loaded with the Ruby grammar.
pub struct RubyParser {
    parser: Parser,
}

impl RubyParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .map_err(|e| BookwormError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse Ruby source. Never fails: anything without a clean, non-empty
    /// tree becomes [`ParsedSource::Empty`].
    pub fn parse(&mut self, text: &str) -> ParsedSource {
        let Some(tree) = self.parser.parse(text, None) else {
            return ParsedSource::Empty;
        };

        let root = tree.root_node();
        if root.has_error() || !has_statements(root) || has_stray_keyword(root, text) {
            return ParsedSource::Empty;
        }

        ParsedSource::Ruby(RubyAst {
            tree,
            source: Arc::from(text),
        })
    }
}

fn has_statements(root: Node<'_>) -> bool {
    let mut cursor = root.walk();
    let found = root
        .named_children(&mut cursor)
        .any(|child| child.kind() != "comment");
    found
}

/// Keywords the grammar accepts as bare identifiers when they appear
/// outside the construct they belong to (`end` on its own, for example).
const RESERVED_WORDS: &[&str] = &[
    "BEGIN", "END", "alias", "and", "begin", "break", "case", "class", "def", "do", "else",
    "elsif", "end", "ensure", "for", "if", "in", "module", "next", "not", "or", "redo",
    "rescue", "retry", "return", "then", "undef", "unless", "until", "when", "while", "yield",
];

/// True when some identifier is a reserved word. Method names stay legal:
/// `range.end` and `def begin` are valid Ruby.
fn has_stray_keyword(root: Node<'_>, text: &str) -> bool {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "identifier"
            && !is_method_name(node)
            && text
                .get(node.byte_range())
                .is_some_and(|word| RESERVED_WORDS.contains(&word))
        {
            return true;
        }

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return false;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn is_method_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let field = match parent.kind() {
        "call" => "method",
        "method" | "singleton_method" => "name",
        _ => return false,
    };
    parent.child_by_field_name(field) == Some(node)
}
