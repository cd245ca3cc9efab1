//! Integration tests for the tree builder.

use std::collections::HashSet;
use std::thread;

use kotoba_dom::{DomTree, NodeId};
use kotoba_html::{
    Error, ParseError, TokenizeError, TreeBuilder, TreeOutline, parse, parse_document, print_tree,
    tokenize, tree_to_string,
};

/// Helper to tokenize and parse a string with default settings
fn parse_html(html: &str) -> DomTree {
    parse_document(html).expect("document should parse")
}

fn tag_name(tree: &DomTree, id: NodeId) -> &str {
    tree.as_element(id).map_or("", |e| e.tag_name.as_str())
}

fn child_names(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&child| match tree.as_element(child) {
            Some(element) => element.tag_name.clone(),
            None => format!("\"{}\"", tree.as_data(child).unwrap_or_default()),
        })
        .collect()
}

#[test]
fn test_nested_elements() {
    let tree = parse_html("<a><b></b></a>");
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "a");
    assert_eq!(tree.children(root).len(), 1);

    let b = tree.children(root)[0];
    assert_eq!(tag_name(&tree, b), "b");
    assert!(tree.children(b).is_empty());
    assert_eq!(tree.parent(b), Some(root));
    assert_eq!(tree.parent(root), None);
}

#[test]
fn test_mismatched_close_tag() {
    let err = parse_document("<a><b></a>").unwrap_err();
    assert_eq!(
        err,
        Error::Parse(ParseError::UnbalancedMarkup {
            expected: "b".to_string(),
            found: "a".to_string(),
            token_index: 2,
        })
    );
    assert_eq!(
        err.to_string(),
        "unbalanced markup: expected close of `<b>`, found `</a>` (token 2)"
    );
}

#[test]
fn test_close_tag_with_nothing_open() {
    let err = parse(tokenize("text</p>").unwrap()).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnexpectedCloseTag {
            found: "p".to_string(),
            token_index: 1,
        }
    );
}

#[test]
fn test_extra_close_after_root() {
    let err = parse_document("<div></div></div>").unwrap_err();
    assert!(matches!(
        err,
        Error::Parse(ParseError::UnexpectedCloseTag { token_index: 2, .. })
    ));
}

#[test]
fn test_close_tag_matching_ignores_case() {
    let tree = parse_html("<DIV><Span>x</SPAN></div>");
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "DIV");
    assert_eq!(child_names(&tree, root), ["Span"]);
}

#[test]
fn test_text_only_document_has_no_root() {
    let (tree, issues) = TreeBuilder::new(tokenize("just some text").unwrap())
        .run_with_issues()
        .unwrap();
    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "text outside the root element");
    assert_eq!(tree_to_string(&tree), "");
}

#[test]
fn test_empty_document() {
    let tree = parse_html("");
    assert!(tree.root().is_none());
    assert!(tree.is_empty());
}

#[test]
fn test_data_is_trimmed_and_mixed_with_elements() {
    let tree = parse_html("<p>  Hello <b>bold</b> world  </p>");
    let root = tree.root().unwrap();
    assert_eq!(child_names(&tree, root), ["\"Hello\"", "b", "\"world\""]);
    assert_eq!(tree.text_content(root), "Hello bold world");
}

#[test]
fn test_void_elements_take_no_children() {
    let tree = parse_html("<p>a<br>b<img src=\"x.png\">c</p>");
    let root = tree.root().unwrap();
    assert_eq!(
        child_names(&tree, root),
        ["\"a\"", "br", "\"b\"", "img", "\"c\""]
    );
    let img = tree.find_element(root, "img").unwrap();
    assert!(tree.children(img).is_empty());
    assert_eq!(tree.as_element(img).unwrap().attrs.len(), 1);
}

#[test]
fn test_irregular_elements_are_leaves() {
    let tree = parse_html("<div><ng-app><p>x</p></div>");
    let root = tree.root().unwrap();
    assert_eq!(child_names(&tree, root), ["ng-app", "p"]);
    let ng_app = tree.children(root)[0];
    assert!(tree.children(ng_app).is_empty());
}

#[test]
fn test_irregular_close_tag_is_not_required_to_balance() {
    let tree = parse_html("<div><ng-app></ng-app><x-widget></div>");
    let root = tree.root().unwrap();
    // `</ng-app>` is itself irregular, so it attaches as a leaf.
    assert_eq!(child_names(&tree, root), ["ng-app", "ng-app", "x-widget"]);
}

#[test]
fn test_script_content_is_one_data_child() {
    let tree = parse_html("<html><script>if (a < b) { c(); }</script></html>");
    let root = tree.root().unwrap();
    let script = tree.find_element(root, "script").unwrap();
    assert_eq!(child_names(&tree, script), ["\"if (a < b) { c(); }\""]);
}

#[test]
fn test_comments_do_not_create_nodes() {
    let tree = parse_html("<!DOCTYPE html><ul><!-- <li>gone</li> --><li>kept</li></ul>");
    let root = tree.root().unwrap();
    assert_eq!(child_names(&tree, root), ["li"]);
    assert_eq!(tree.text_content(root), "kept");
}

#[test]
fn test_attributes_are_carried_onto_elements() {
    let tree = parse_html(r#"<a href="/home" class="nav main" id="top" hidden>x</a>"#);
    let element = tree.as_element(tree.root().unwrap()).unwrap();
    assert_eq!(element.id(), Some("top"));
    assert_eq!(element.classes(), ["nav", "main"]);
    let names: Vec<&str> = element.attrs.names().collect();
    assert_eq!(names, ["href", "class", "id", "hidden"]);
}

#[test]
fn test_every_node_reaches_the_root() {
    let tree = parse_html("<html><body><div><p>a<em>b</em></p><hr/></div></body></html>");
    let root = tree.root().unwrap();
    let mut count = 0;
    for id in tree.descendants(root) {
        count += 1;
        assert!(tree.is_descendant_of(id, root));
        assert_eq!(tree.ancestors(id).last(), Some(root));
        let parent = tree.parent(id).unwrap();
        assert!(tree.children(parent).contains(&id));
    }
    assert_eq!(count, tree.len() - 1);
}

#[test]
fn test_close_tags_do_not_allocate_nodes() {
    let tree = parse_html("<a><b></b><c></c></a>");
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_unclosed_elements_are_issues_by_default() {
    let builder = TreeBuilder::new(tokenize("<html><body><p>text").unwrap());
    let (tree, issues) = builder.run_with_issues().unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "html");
    assert_eq!(tree.text_content(root), "text");

    let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "unclosed <html> at end of input",
            "unclosed <body> at end of input",
            "unclosed <p> at end of input",
        ]
    );
    assert_eq!(issues[2].token_index, 2);
}

#[test]
fn test_unclosed_elements_are_errors_in_strict_mode() {
    let err = TreeBuilder::new(tokenize("<html><body></body>").unwrap())
        .with_strict_mode()
        .run()
        .unwrap_err();
    assert_eq!(
        err,
        ParseError::UnclosedTags {
            open: vec!["html".to_string()],
        }
    );
    assert_eq!(err.to_string(), "unclosed tags at end of input: html");
}

#[test]
fn test_strict_mode_accepts_balanced_markup() {
    let tree = TreeBuilder::new(tokenize("<a><b/></a>").unwrap())
        .with_strict_mode()
        .run()
        .unwrap();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_content_before_root_is_recorded() {
    let (tree, issues) = TreeBuilder::new(tokenize("lead <main>x</main>").unwrap())
        .run_with_issues()
        .unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "main");
    assert_eq!(child_names(&tree, root), ["\"x\""]);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].token_index, 0);
}

#[test]
fn test_second_top_level_element_is_orphaned() {
    let (tree, issues) = TreeBuilder::new(tokenize("<a></a><b></b>").unwrap())
        .run_with_issues()
        .unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "a");
    assert!(tree.children(root).is_empty());
    assert_eq!(tree.len(), 2);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "<b> outside the root element");
}

#[test]
fn test_solo_only_document_uses_first_element_as_root() {
    let (tree, issues) = TreeBuilder::new(tokenize("<br><hr>").unwrap())
        .run_with_issues()
        .unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tag_name(&tree, root), "br");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "<hr> outside the root element");
}

#[test]
fn test_attribute_errors_surface_through_parse_document() {
    let err = parse_document(r#"<div class="a" class="b"></div>"#).unwrap_err();
    assert!(matches!(
        err,
        Error::Tokenize(TokenizeError::DuplicateAttribute { .. })
    ));
}

#[test]
fn test_tree_to_string() {
    let tree = parse_html("<ul class=\"menu\"><li>One</li><li>Two<br/></li></ul>");
    let expected = "\
<ul class=\"menu\">
  <li>
    \"One\"
  <li>
    \"Two\"
    <br>
";
    assert_eq!(tree_to_string(&tree), expected);
}

#[test]
fn test_outline_of_subtree_is_indented() {
    let tree = parse_html("<div><p>a</p><p>b</p></div>");
    let root = tree.root().unwrap();
    let second = tree.children(root)[1];
    assert_eq!(TreeOutline::new(&tree, second, 1).to_string(), "  <p>\n    \"b\"\n");
    assert_eq!(TreeOutline::new(&tree, root, 0).to_string(), tree_to_string(&tree));
}

#[test]
fn test_print_tree_reports_success() {
    let tree = parse_html("<p>printed</p>");
    assert!(print_tree(&tree, tree.root().unwrap(), 0).is_ok());
}

#[test]
fn test_uids_are_unique_and_increasing() {
    let tree = parse_html("<a><b>x</b><c/></a>");
    let uids: Vec<u64> = (0..tree.len())
        .map(|i| tree.get(NodeId(i)).unwrap().uid.get())
        .collect();
    assert!(uids.windows(2).all(|pair| pair[0] < pair[1]));

    let uid = tree.get(NodeId(2)).unwrap().uid;
    assert_eq!(tree.find_by_uid(uid), Some(NodeId(2)));
}

#[test]
fn test_concurrent_parses_never_share_uids() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let tree = parse_html("<div><p>a</p><p>b</p><br></div>");
                (0..tree.len())
                    .map(|i| tree.get(NodeId(i)).unwrap().uid)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for uid in handle.join().unwrap() {
            assert!(seen.insert(uid), "uid {uid:?} allocated twice");
        }
    }
    assert_eq!(seen.len(), 4 * 6);
}
