use std::fmt;
use std::io::{self, Write as _};

use kotoba_common::warning::warn_once;
use kotoba_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::error::ParseError;
use crate::tokenizer::{TagData, Token};

/// A recoverable condition noticed while building the tree.
///
/// These never stop the parse; the tree is still complete and valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What happened.
    pub message: String,
    /// Index into the token sequence where this was noticed. For unclosed
    /// elements this is the index of the open tag.
    pub token_index: usize,
}

/// Builds a [`DomTree`] from a token sequence with an explicit stack of open
/// elements.
///
/// - Every node except the root gets the current stack top as its parent.
/// - Open tags are pushed; solo and irregular tags never are.
/// - A close tag must name the innermost open element, otherwise parsing
///   stops with [`ParseError::UnbalancedMarkup`].
/// - The first open tag becomes the root.
///
/// Elements still open at end of input are accepted (a warning is logged and
/// a [`ParseIssue`] recorded) unless strict mode is enabled.
pub struct TreeBuilder {
    /// Open elements, outermost first, with the index of their open tag.
    stack_of_open_elements: Vec<(NodeId, usize)>,

    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in the token stream.
    token_index: usize,

    /// First element created outside any open element. Becomes the root if
    /// the document has no open tag at all.
    first_top_level_element: Option<(NodeId, usize)>,

    issues: Vec<ParseIssue>,

    /// If true, unclosed elements at end of input are an error.
    strict_mode: bool,
}

impl TreeBuilder {
    /// Create a tree builder over a token sequence.
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self {
            stack_of_open_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            first_top_level_element: None,
            issues: Vec::new(),
            strict_mode: false,
        }
    }

    /// Enable strict mode: elements left open at end of input become
    /// [`ParseError::UnclosedTags`].
    #[must_use]
    pub const fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Get all issues recorded so far.
    #[must_use]
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Run the tree builder and return the tree.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on the first close tag that does not match
    /// the innermost open element, or (in strict mode) if elements remain
    /// open at end of input.
    pub fn run(self) -> Result<DomTree, ParseError> {
        self.run_with_issues().map(|(tree, _)| tree)
    }

    /// Run the tree builder and return the tree with any recoverable issues.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub fn run_with_issues(mut self) -> Result<(DomTree, Vec<ParseIssue>), ParseError> {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            self.token_index = index;
            self.process_token(token)?;
        }
        self.finish()?;
        Ok((self.tree, self.issues))
    }

    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().map(|&(id, _)| id)
    }

    fn process_token(&mut self, token: Token) -> Result<(), ParseError> {
        match token {
            Token::Data { text, .. } => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(());
                }
                let id = self.tree.alloc(NodeType::Data(text.to_string()));
                self.attach(id);
            }
            Token::OpenTag(tag) => {
                let id = self.create_element(tag);
                if self.current_node().is_none() && self.tree.set_root(id) {
                    log::debug!("root <{}>", self.element_name(id));
                } else {
                    self.attach(id);
                }
                self.stack_of_open_elements.push((id, self.token_index));
            }
            Token::SoloTag(tag) | Token::IrregularTag(tag) => {
                let id = self.create_element(tag);
                if self.current_node().is_none() && self.first_top_level_element.is_none() {
                    self.first_top_level_element = Some((id, self.token_index));
                }
                self.attach(id);
            }
            Token::CloseTag(tag) => self.close_element(&tag.name)?,
        }
        Ok(())
    }

    fn create_element(&mut self, tag: TagData) -> NodeId {
        self.tree
            .alloc(NodeType::Element(ElementData::new(tag.name, tag.attributes)))
    }

    /// Append `id` to the current node, or record it as lying outside the tree.
    fn attach(&mut self, id: NodeId) {
        match self.current_node() {
            Some(parent) => {
                let _ = self.tree.append_child(parent, id);
            }
            None => {
                let message = match self.tree.as_element(id) {
                    Some(element) => format!("<{}> outside the root element", element.tag_name),
                    None => "text outside the root element".to_string(),
                };
                log::debug!("{message} (token {})", self.token_index);
                self.issues.push(ParseIssue {
                    message,
                    token_index: self.token_index,
                });
            }
        }
    }

    fn close_element(&mut self, name: &str) -> Result<(), ParseError> {
        let Some(current) = self.current_node() else {
            return Err(ParseError::UnexpectedCloseTag {
                found: name.to_string(),
                token_index: self.token_index,
            });
        };
        let expected = self.element_name(current);
        if !expected.eq_ignore_ascii_case(name) {
            return Err(ParseError::UnbalancedMarkup {
                expected: expected.to_string(),
                found: name.to_string(),
                token_index: self.token_index,
            });
        }
        let _ = self.stack_of_open_elements.pop();
        Ok(())
    }

    fn element_name(&self, id: NodeId) -> &str {
        self.tree
            .as_element(id)
            .map_or("", |element| element.tag_name.as_str())
    }

    /// Apply the end-of-input policy for elements that are still open.
    fn finish(&mut self) -> Result<(), ParseError> {
        if self.tree.root().is_none()
            && let Some((id, index)) = self.first_top_level_element
            && self.tree.set_root(id)
        {
            self.issues.retain(|issue| issue.token_index != index);
        }

        if self.stack_of_open_elements.is_empty() {
            return Ok(());
        }

        let open: Vec<(String, usize)> = self
            .stack_of_open_elements
            .iter()
            .map(|&(id, index)| (self.element_name(id).to_string(), index))
            .collect();
        if self.strict_mode {
            return Err(ParseError::UnclosedTags {
                open: open.into_iter().map(|(name, _)| name).collect(),
            });
        }
        for (name, token_index) in open {
            let message = format!("unclosed <{name}> at end of input");
            let _ = warn_once("Tree Builder", &message);
            self.issues.push(ParseIssue {
                message,
                token_index,
            });
        }
        Ok(())
    }
}

/// Build a tree from `tokens` with default settings.
///
/// # Errors
///
/// Returns a [`ParseError`] on unbalanced markup.
pub fn parse(tokens: Vec<Token>) -> Result<DomTree, ParseError> {
    TreeBuilder::new(tokens).run()
}

/// Write an indented dump of the subtree rooted at `id`.
///
/// # Errors
///
/// Propagates errors from the writer.
pub fn write_tree(out: &mut impl fmt::Write, tree: &DomTree, id: NodeId, indent: usize) -> fmt::Result {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    match &node.node_type {
        NodeType::Element(data) => {
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{}>", data.tag_name)?;
            } else {
                writeln!(out, "{prefix}<{} {}>", data.tag_name, data.attrs)?;
            }
        }
        NodeType::Data(text) => {
            let display = text.replace('\n', "\\n");
            writeln!(out, "{prefix}\"{display}\"")?;
        }
    }
    for &child_id in tree.children(id) {
        write_tree(out, tree, child_id, indent + 1)?;
    }
    Ok(())
}

/// Displays the subtree rooted at one node as an indented outline.
#[derive(Debug, Clone, Copy)]
pub struct TreeOutline<'a> {
    tree: &'a DomTree,
    id: NodeId,
    indent: usize,
}

impl<'a> TreeOutline<'a> {
    /// Outline the subtree at `id`, starting `indent` levels in.
    #[must_use]
    pub const fn new(tree: &'a DomTree, id: NodeId, indent: usize) -> Self {
        Self { tree, id, indent }
    }
}

impl fmt::Display for TreeOutline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self.tree, self.id, self.indent)
    }
}

/// Render the whole tree from its root as a string. A tree without a root
/// renders as an empty string.
#[must_use]
pub fn tree_to_string(tree: &DomTree) -> String {
    tree.root()
        .map(|root| TreeOutline::new(tree, root, 0).to_string())
        .unwrap_or_default()
}

/// Print the subtree rooted at `id` to stdout.
///
/// # Errors
///
/// Returns any error from writing to stdout.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", TreeOutline::new(tree, id, indent))
}
