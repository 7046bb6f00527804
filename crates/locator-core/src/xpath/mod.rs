//! XPath 1.0 subset used to verify and resolve locators.
//!
//! Supported: absolute, descendant and relative location paths, top-level
//! unions, the child/descendant/self/parent/ancestor/sibling axes with their
//! abbreviations, name, `*`, `text()` and `node()` tests, positional and
//! boolean predicates, comparisons and a small function library
//! (`contains`, `starts-with`, `normalize-space`, `string`, `string-length`,
//! `concat`, `not`, `true`, `false`, `position`, `last`, `count`).

pub mod eval;
pub mod lexer;
pub mod parser;

use dom_snapshot::{DomTree, NodeId};

use crate::errors::XPathError;

pub use eval::{Evaluator, Value};
pub use parser::{parse, Axis, CompareOp, Expr, LocationPath, NodeTest, Step};

/// Parses and evaluates `expression` against the whole tree.
pub fn select(tree: &DomTree, expression: &str) -> Result<Vec<NodeId>, XPathError> {
    let expr = parse(expression)?;
    Evaluator::new(tree).select(&expr)
}

/// Quotes `value` as an XPath string literal.
///
/// Single quotes are preferred; double quotes are used when the value holds an
/// apostrophe, and `concat()` when it holds both.
pub fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use dom_snapshot::TreeBuilder;

    use super::*;

    struct Page {
        tree: DomTree,
        body: NodeId,
        items: Vec<NodeId>,
        button: NodeId,
    }

    fn page() -> Page {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let list = b.element(body, "ul", &[("id", "menu")]);
        let items = vec![
            b.element_with_text(list, "li", &[("class", "item first")], "Home"),
            b.element_with_text(list, "li", &[("class", "item")], "About us"),
            b.element_with_text(list, "li", &[("class", "item")], "Contact"),
        ];
        let button = b.element_with_text(body, "button", &[("type", "submit")], "  Sign \n in ");
        Page {
            tree: b.build(),
            body,
            items,
            button,
        }
    }

    #[test]
    fn selects_by_id_and_attribute() {
        let p = page();
        assert_eq!(select(&p.tree, "//*[@id='menu']").unwrap().len(), 1);
        assert_eq!(
            select(&p.tree, "//button[@type='submit']").unwrap(),
            vec![p.button]
        );
        assert!(select(&p.tree, "//*[@id='missing']").unwrap().is_empty());
    }

    #[test]
    fn positional_predicates_are_per_parent() {
        let p = page();
        assert_eq!(select(&p.tree, "//li[2]").unwrap(), vec![p.items[1]]);
        assert_eq!(select(&p.tree, "//li[last()]").unwrap(), vec![p.items[2]]);
        assert_eq!(
            select(&p.tree, "/html/body/ul/li[position() > 1]").unwrap(),
            vec![p.items[1], p.items[2]]
        );
        assert_eq!(select(&p.tree, "(//li)[1]").unwrap(), vec![p.items[0]]);
    }

    #[test]
    fn text_functions() {
        let p = page();
        assert_eq!(
            select(&p.tree, "//*[normalize-space(text())='Sign in']").unwrap(),
            vec![p.button]
        );
        assert_eq!(
            select(&p.tree, "//*[contains(text(),'About')]").unwrap(),
            vec![p.items[1]]
        );
        assert_eq!(
            select(&p.tree, "//li[starts-with(., 'Con')]").unwrap(),
            vec![p.items[2]]
        );
        assert_eq!(
            select(&p.tree, "//li[string-length(text()) = 4]").unwrap(),
            vec![p.items[0]]
        );
    }

    #[test]
    fn class_attribute_matches_whole_value_or_token() {
        let p = page();
        assert_eq!(select(&p.tree, "//*[@class='item']").unwrap().len(), 2);
        let token = "//*[contains(concat(' ', normalize-space(@class), ' '), ' item ')]";
        assert_eq!(select(&p.tree, token).unwrap().len(), 3);
    }

    #[test]
    fn axes_navigate_the_tree() {
        let p = page();
        assert_eq!(
            select(&p.tree, "//li[1]/following-sibling::li[1]").unwrap(),
            vec![p.items[1]]
        );
        assert_eq!(
            select(&p.tree, "//li[3]/preceding-sibling::li[1]").unwrap(),
            vec![p.items[1]]
        );
        assert_eq!(
            select(&p.tree, "//li[1]/ancestor::body").unwrap(),
            vec![p.body]
        );
        assert_eq!(select(&p.tree, "//li/..").unwrap().len(), 1);
        assert_eq!(select(&p.tree, "//ul[count(li) = 3]").unwrap().len(), 1);
    }

    #[test]
    fn unions_are_sorted_and_deduplicated() {
        let p = page();
        let found = select(&p.tree, "//button | //li[1] | //li[@class='item first']").unwrap();
        assert_eq!(found, vec![p.items[0], p.button]);
    }

    #[test]
    fn names_are_case_insensitive() {
        let p = page();
        assert_eq!(select(&p.tree, "//BUTTON[@TYPE='submit']").unwrap(), vec![p.button]);
    }

    #[test]
    fn attribute_results_are_unsupported() {
        let p = page();
        assert!(matches!(
            select(&p.tree, "//li/@class"),
            Err(XPathError::Unsupported(_))
        ));
        assert!(matches!(
            select(&p.tree, "count(//li)"),
            Err(XPathError::Unsupported(_))
        ));
    }

    #[test]
    fn literal_quoting() {
        assert_eq!(literal("plain"), "'plain'");
        assert_eq!(literal("it's"), "\"it's\"");
        assert_eq!(
            literal(r#"say "it's""#),
            r#"concat('say "it', "'", 's"')"#
        );
    }

    #[test]
    fn concat_literal_round_trips_through_the_evaluator() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let value = r#"5' 11" tall"#;
        let node = b.element(html, "span", &[("title", value)]);
        let tree = b.build();
        let expression = format!("//*[@title={}]", literal(value));
        assert_eq!(select(&tree, &expression).unwrap(), vec![node]);
    }
}
