//! Index-based locators, unique by construction.

use dom_snapshot::{DomTree, NodeId};

use crate::oracle::Oracle;
use crate::xpath::literal;

/// One path step: the bare tag when the node is its parent's only child with
/// that tag, `tag[i]` otherwise.
fn step(tree: &DomTree, node: NodeId) -> Option<String> {
    let tag = tree.tag_name(node)?;
    if tree.siblings_of_same_tag(node).len() == 1 {
        Some(tag.to_string())
    } else {
        Some(format!("{tag}[{}]", tree.same_tag_index(node)?))
    }
}

/// Walks from `node` towards the root, anchoring at the first strict ancestor
/// whose id selects exactly that ancestor. Without such an anchor the path
/// starts at the root element, e.g. `/html/body/div[2]/span[3]`.
pub fn anchored_path(oracle: &Oracle<'_>, node: NodeId) -> Option<String> {
    let tree = oracle.tree();
    if !tree.is_element(node) || !tree.is_attached(node) {
        return None;
    }

    let mut segments = Vec::new();
    let mut current = node;
    loop {
        segments.push(step(tree, current)?);
        let parent = tree.parent(current)?;
        if tree.is_document(parent) {
            segments.reverse();
            return Some(format!("/{}", segments.join("/")));
        }
        if let Some(id) = tree.id_attribute(parent) {
            let anchor = format!("//*[@id={}]", literal(id));
            if oracle.identifies(&anchor, parent) {
                segments.reverse();
                return Some(format!("{anchor}/{}", segments.join("/")));
            }
        }
        current = parent;
    }
}

/// Fully indexed path from the root element: `/html[1]/body[1]/...`.
pub fn absolute_path(tree: &DomTree, node: NodeId) -> Option<String> {
    if !tree.is_element(node) || !tree.is_attached(node) {
        return None;
    }
    let mut segments = Vec::new();
    let mut current = Some(node);
    while let Some(element) = current.filter(|n| tree.is_element(*n)) {
        let tag = tree.tag_name(element)?;
        let index = tree.same_tag_index(element)?;
        segments.push(format!("{tag}[{index}]"));
        current = tree.parent(element);
    }
    segments.reverse();
    Some(format!("/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use dom_snapshot::TreeBuilder;

    use super::*;

    #[test]
    fn anchors_on_unique_ancestor_id() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let nav = b.element(body, "nav", &[("id", "top")]);
        b.element(nav, "a", &[]);
        let link = b.element(nav, "a", &[]);
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        assert_eq!(
            anchored_path(&oracle, link).as_deref(),
            Some("//*[@id='top']/a[2]")
        );
    }

    #[test]
    fn duplicated_ancestor_ids_are_skipped() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let first = b.element(body, "div", &[("id", "dup")]);
        let second = b.element(body, "div", &[("id", "dup")]);
        b.element(first, "p", &[]);
        let target = b.element(second, "p", &[]);
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        assert_eq!(
            anchored_path(&oracle, target).as_deref(),
            Some("/html/body/div[2]/p")
        );
    }

    #[test]
    fn root_element_path() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[("id", "root")]);
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        assert_eq!(anchored_path(&oracle, html).as_deref(), Some("/html"));
        assert_eq!(absolute_path(&tree, html).as_deref(), Some("/html[1]"));
    }

    #[test]
    fn absolute_path_indexes_every_step() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        b.element(body, "div", &[]);
        let div = b.element(body, "div", &[]);
        let span = b.element(div, "span", &[]);
        let tree = b.build();
        assert_eq!(
            absolute_path(&tree, span).as_deref(),
            Some("/html[1]/body[1]/div[2]/span[1]")
        );
    }

    #[test]
    fn detached_nodes_have_no_path() {
        let mut b = TreeBuilder::new();
        b.element(b.document(), "html", &[]);
        let orphan = b.detached_element("div", &[]);
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        assert_eq!(anchored_path(&oracle, orphan), None);
        assert_eq!(absolute_path(&tree, orphan), None);
    }
}
