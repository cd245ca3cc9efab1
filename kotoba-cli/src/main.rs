//! Kotoba CLI - markup tokenizing and tree-building tool
//!
//! Usage:
//!   kotoba <file>              Parse and display the element tree
//!   kotoba <file> --json       Output the tree as JSON
//!   kotoba <file> --tokens     Show the token stream before the tree
//!   kotoba <file> --strict     Treat elements left open at end of input as an error
//!
//! Examples:
//!   kotoba res/simple.html
//!   kotoba --html '<ul><li>One</li></ul>' --tokens

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use kotoba_dom::DomTree;
use kotoba_html::tokenizer::DEFAULT_MAX_TAG_LENGTH;
use kotoba_html::{MarkupTokenizer, ParseIssue, Token, TokenKind, TreeBuilder, print_tree};
use owo_colors::OwoColorize;

/// Kotoba - tokenize markup and build its element tree
#[derive(Parser, Debug)]
#[command(name = "kotoba")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the document to parse
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse a markup string directly instead of a file
    #[arg(long, value_name = "MARKUP", conflicts_with = "path")]
    html: Option<String>,

    /// Print the token stream
    #[arg(short, long)]
    tokens: bool,

    /// Print the tree as JSON instead of an indented outline
    #[arg(short, long)]
    json: bool,

    /// Fail if any element is still open at end of input
    #[arg(long)]
    strict: bool,

    /// Keep whitespace-only text between tags as data tokens
    #[arg(long)]
    keep_whitespace: bool,

    /// How far past a `<` to look for its `>` (0 for no limit)
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_TAG_LENGTH)]
    max_tag_length: usize,

    /// Log debug output (tokens, root selection) to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let source = load_source(&cli)?;

    let max_tag_length = (cli.max_tag_length > 0).then_some(cli.max_tag_length);
    let mut tokenizer = MarkupTokenizer::new(source)
        .with_max_tag_length(max_tag_length)
        .with_whitespace_data(cli.keep_whitespace);
    tokenizer.run().context("tokenization failed")?;
    let tokens = tokenizer.into_tokens();
    log::info!("{} tokens", tokens.len());

    if cli.tokens {
        print_tokens(&tokens);
    }

    let mut builder = TreeBuilder::new(tokens);
    if cli.strict {
        builder = builder.with_strict_mode();
    }
    let (tree, issues) = builder.run_with_issues().context("tree building failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print_outline(&tree)?;
    }
    print_issues(&issues);

    Ok(())
}

/// Read the document from `--html` or the positional path.
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(ref markup) = cli.html {
        Ok(markup.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
    } else {
        bail!("no input: pass a file path or --html")
    }
}

fn print_tokens(tokens: &[Token]) {
    println!("{}", format!("=== Tokens ({}) ===", tokens.len()).bold());
    for (i, token) in tokens.iter().enumerate() {
        let kind = format!("{:<12}", token.kind().to_string());
        let raw = token.raw().replace('\n', "\\n");
        let kind = match token.kind() {
            TokenKind::Data => kind.dimmed().to_string(),
            TokenKind::OpenTag => kind.green().to_string(),
            TokenKind::CloseTag => kind.red().to_string(),
            TokenKind::SoloTag => kind.cyan().to_string(),
            TokenKind::IrregularTag => kind.magenta().to_string(),
        };
        println!("  {i:4}: {kind} {raw}");
    }
    println!();
}

fn print_outline(tree: &DomTree) -> Result<()> {
    match tree.root() {
        Some(root) => print_tree(tree, root, 0).context("writing tree to stdout")?,
        None => println!("{}", "(no root element)".dimmed()),
    }
    Ok(())
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("{}", format!("=== Issues ({}) ===", issues.len()).yellow().bold());
    for issue in issues {
        eprintln!("  token {:4}: {}", issue.token_index, issue.message);
    }
}
