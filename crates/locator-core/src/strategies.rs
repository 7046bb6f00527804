//! Strategy bank
//!
//! Initial generation runs, in order:
//! 1. unique-id
//! 2. unique-attribute (name, data-testid, data-test, aria-label, role)
//! 3. exact-text
//! 4. unique-class
//! 5. position
//! 6. absolute
//!
//! Regeneration draws from the extended chain instead, see
//! [`StrategyKind::extended_chain`].

use std::fmt;
use std::str::FromStr;

use dom_snapshot::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::oracle::Oracle;
use crate::positional;
use crate::types::{Candidate, ClassMatch, ConfidenceTier, LocatorOptions};
use crate::xpath::literal;

const UNIQUE_ATTRIBUTES: &[&str] = &["name", "data-testid", "data-test", "aria-label", "role"];
const TAG_ATTRIBUTES: &[&str] = &[
    "data-testid",
    "data-test",
    "name",
    "role",
    "aria-label",
    "title",
    "placeholder",
];
const PAIR_ATTRIBUTES: &[&str] = &["class", "type", "role", "title"];
const OTHER_ATTRIBUTES: &[&str] = &["type", "role", "title", "placeholder", "value"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    UniqueId,
    UniqueAttribute,
    ExactText,
    UniqueClass,
    Position,
    Absolute,
    TagAttribute,
    AttributePair,
    PartialText,
    TagClass,
    TagOtherAttribute,
    TagPartialClass,
}

impl StrategyKind {
    const INITIAL: [StrategyKind; 6] = [
        StrategyKind::UniqueId,
        StrategyKind::UniqueAttribute,
        StrategyKind::ExactText,
        StrategyKind::UniqueClass,
        StrategyKind::Position,
        StrategyKind::Absolute,
    ];

    const EXTENDED: [StrategyKind; 7] = [
        StrategyKind::TagAttribute,
        StrategyKind::AttributePair,
        StrategyKind::PartialText,
        StrategyKind::TagClass,
        StrategyKind::TagOtherAttribute,
        StrategyKind::TagPartialClass,
        StrategyKind::Absolute,
    ];

    /// Strategy id as string
    pub fn id(&self) -> &'static str {
        match self {
            StrategyKind::UniqueId => "unique-id",
            StrategyKind::UniqueAttribute => "unique-attribute",
            StrategyKind::ExactText => "exact-text",
            StrategyKind::UniqueClass => "unique-class",
            StrategyKind::Position => "position",
            StrategyKind::Absolute => "absolute",
            StrategyKind::TagAttribute => "tag-attribute",
            StrategyKind::AttributePair => "attribute-pair",
            StrategyKind::PartialText => "partial-text",
            StrategyKind::TagClass => "tag-class",
            StrategyKind::TagOtherAttribute => "tag-other-attribute",
            StrategyKind::TagPartialClass => "tag-partial-class",
        }
    }

    /// Tier every candidate of this strategy is reported at.
    pub fn min_tier(&self) -> ConfidenceTier {
        match self {
            StrategyKind::UniqueId
            | StrategyKind::UniqueAttribute
            | StrategyKind::TagAttribute => ConfidenceTier::Reliable,
            StrategyKind::ExactText
            | StrategyKind::UniqueClass
            | StrategyKind::AttributePair
            | StrategyKind::PartialText
            | StrategyKind::TagClass
            | StrategyKind::TagOtherAttribute => ConfidenceTier::Caution,
            StrategyKind::Position
            | StrategyKind::Absolute
            | StrategyKind::TagPartialClass => ConfidenceTier::Weak,
        }
    }

    /// First-time generation order
    pub fn initial_chain() -> &'static [StrategyKind] {
        &Self::INITIAL
    }

    /// Regeneration order
    pub fn extended_chain() -> &'static [StrategyKind] {
        &Self::EXTENDED
    }

    /// Runs the strategy against `node`. Sub-variants (attribute names, class
    /// tokens, attribute pairs) are tried in order and the first one that
    /// identifies the node wins.
    pub fn synthesize(
        &self,
        oracle: &Oracle<'_>,
        options: &LocatorOptions,
        node: NodeId,
    ) -> Option<Candidate> {
        let tree = oracle.tree();
        let tag = tree.tag_name(node)?;
        let first_hit = |expressions: Vec<(String, String)>| {
            expressions.into_iter().find(|(expression, _)| {
                let hit = oracle.identifies(expression, node);
                debug!(strategy = self.id(), expression = expression.as_str(), hit, "tried variant");
                hit
            })
        };

        let (expression, rationale) = match self {
            StrategyKind::UniqueId => {
                let id = tree.id_attribute(node)?;
                first_hit(vec![(
                    format!("//*[@id={}]", literal(id)),
                    "unique id attribute".to_string(),
                )])?
            }
            StrategyKind::UniqueAttribute => first_hit(
                present_attributes(oracle, node, UNIQUE_ATTRIBUTES)
                    .map(|(name, value)| {
                        (
                            format!("//*[@{name}={}]", literal(value)),
                            format!("unique '{name}' attribute"),
                        )
                    })
                    .collect(),
            )?,
            StrategyKind::ExactText => {
                let text = tree.text(node);
                let len = text.chars().count();
                if len <= 2 || len >= 50 {
                    return None;
                }
                first_hit(vec![(
                    format!("//*[normalize-space(text())={}]", literal(&text)),
                    "exact text content; changes with copy edits".to_string(),
                )])?
            }
            StrategyKind::UniqueClass => first_hit(
                tree.class_tokens(node)
                    .into_iter()
                    .map(|token| {
                        (
                            format!("//*[{}]", class_predicate(token, options.class_match)),
                            format!("unique class '{token}'; check it is not generated"),
                        )
                    })
                    .collect(),
            )?,
            StrategyKind::Position => {
                let expression = positional::anchored_path(oracle, node)?;
                (
                    expression,
                    "position in the tree; breaks when the structure changes".to_string(),
                )
            }
            StrategyKind::Absolute => {
                let expression = positional::absolute_path(tree, node)?;
                (
                    expression,
                    "absolute indexed path; breaks easily".to_string(),
                )
            }
            StrategyKind::TagAttribute => first_hit(
                present_attributes(oracle, node, TAG_ATTRIBUTES)
                    .map(|(name, value)| {
                        (
                            format!("//{tag}[@{name}={}]", literal(value)),
                            format!("<{tag}> with unique '{name}' attribute"),
                        )
                    })
                    .collect(),
            )?,
            StrategyKind::AttributePair => {
                let present: Vec<(&str, &str)> =
                    present_attributes(oracle, node, PAIR_ATTRIBUTES).collect();
                let mut pairs = Vec::new();
                for (i, (first, first_value)) in present.iter().enumerate() {
                    for (second, second_value) in &present[i + 1..] {
                        pairs.push((
                            format!(
                                "//{tag}[@{first}={} and @{second}={}]",
                                literal(first_value),
                                literal(second_value)
                            ),
                            format!("combination of '{first}' and '{second}'"),
                        ));
                    }
                }
                first_hit(pairs)?
            }
            StrategyKind::PartialText => {
                let text = tree.text(node);
                if text.chars().count() <= 10 {
                    return None;
                }
                let words = text.split(' ').take(3).collect::<Vec<_>>().join(" ");
                first_hit(vec![(
                    format!("//*[contains(normalize-space(text()),{})]", literal(&words)),
                    "partial text content; changes with copy edits".to_string(),
                )])?
            }
            StrategyKind::TagClass => first_hit(
                tree.class_tokens(node)
                    .into_iter()
                    .map(|token| {
                        (
                            format!("//{tag}[{}]", class_predicate(token, options.class_match)),
                            format!("<{tag}> with class '{token}'"),
                        )
                    })
                    .collect(),
            )?,
            StrategyKind::TagOtherAttribute => first_hit(
                present_attributes(oracle, node, OTHER_ATTRIBUTES)
                    .map(|(name, value)| {
                        (
                            format!("//{tag}[@{name}={}]", literal(value)),
                            format!("<{tag}> with '{name}' attribute"),
                        )
                    })
                    .collect(),
            )?,
            StrategyKind::TagPartialClass => {
                let token = tree.class_tokens(node).into_iter().next()?;
                first_hit(vec![(
                    format!("//{tag}[contains(@class,{})]", literal(token)),
                    format!("<{tag}> with partial class '{token}'"),
                )])?
            }
        };

        Some(Candidate::new(
            expression,
            self.min_tier(),
            rationale,
            Some(*self),
        ))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::INITIAL
            .iter()
            .chain(Self::EXTENDED.iter())
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Non-empty values of `names` on `node`, in the order given.
fn present_attributes<'t>(
    oracle: &Oracle<'t>,
    node: NodeId,
    names: &'static [&'static str],
) -> impl Iterator<Item = (&'static str, &'t str)> {
    let tree = oracle.tree();
    names.iter().filter_map(move |name| {
        tree.attribute(node, name)
            .filter(|value| !value.is_empty())
            .map(|value| (*name, value))
    })
}

fn class_predicate(token: &str, class_match: ClassMatch) -> String {
    match class_match {
        ClassMatch::Exact => format!("@class={}", literal(token)),
        ClassMatch::Token => format!(
            "contains(concat(' ', normalize-space(@class), ' '), {})",
            literal(&format!(" {token} "))
        ),
    }
}

#[cfg(test)]
mod tests {
    use dom_snapshot::{DomTree, TreeBuilder};

    use super::*;

    fn form() -> (DomTree, NodeId, NodeId) {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let input = b.element(
            body,
            "input",
            &[
                ("class", "field wide"),
                ("type", "email"),
                ("placeholder", "Email address"),
                ("role", "textbox"),
            ],
        );
        b.element(body, "input", &[("class", "field"), ("type", "password")]);
        let button = b.element_with_text(
            body,
            "button",
            &[("class", "btn primary"), ("type", "submit")],
            "Sign in to your account",
        );
        (b.build(), input, button)
    }

    #[test]
    fn chains_have_expected_order() {
        let ids: Vec<&str> = StrategyKind::initial_chain().iter().map(|s| s.id()).collect();
        assert_eq!(
            ids,
            vec![
                "unique-id",
                "unique-attribute",
                "exact-text",
                "unique-class",
                "position",
                "absolute"
            ]
        );
        assert_eq!(StrategyKind::extended_chain().last(), Some(&StrategyKind::Absolute));
        assert_eq!("tag-class".parse::<StrategyKind>(), Ok(StrategyKind::TagClass));
    }

    #[test]
    fn unique_attribute_prefers_declared_order() {
        let (tree, input, _) = form();
        let oracle = Oracle::new(&tree);
        let candidate = StrategyKind::UniqueAttribute
            .synthesize(&oracle, &LocatorOptions::default(), input)
            .expect("role attribute");
        assert_eq!(candidate.expression(), "//*[@role='textbox']");
        assert_eq!(candidate.tier(), ConfidenceTier::Reliable);
    }

    #[test]
    fn exact_class_needs_whole_attribute_match() {
        let (tree, input, button) = form();
        let oracle = Oracle::new(&tree);
        let exact = LocatorOptions::default();
        assert!(StrategyKind::UniqueClass
            .synthesize(&oracle, &exact, input)
            .is_none());
        assert!(StrategyKind::UniqueClass
            .synthesize(&oracle, &exact, button)
            .is_none());

        let token = LocatorOptions::default().with_class_match(ClassMatch::Token);
        let candidate = StrategyKind::UniqueClass
            .synthesize(&oracle, &token, input)
            .expect("wide token");
        assert_eq!(
            candidate.expression(),
            "//*[contains(concat(' ', normalize-space(@class), ' '), ' wide ')]"
        );
    }

    #[test]
    fn attribute_pair_combines_in_declared_order() {
        let (tree, input, _) = form();
        let oracle = Oracle::new(&tree);
        let candidate = StrategyKind::AttributePair
            .synthesize(&oracle, &LocatorOptions::default(), input)
            .expect("pair");
        assert_eq!(
            candidate.expression(),
            "//input[@class='field wide' and @type='email']"
        );
        assert_eq!(candidate.tier(), ConfidenceTier::Caution);
    }

    #[test]
    fn partial_text_uses_first_three_words() {
        let (tree, _, button) = form();
        let oracle = Oracle::new(&tree);
        let candidate = StrategyKind::PartialText
            .synthesize(&oracle, &LocatorOptions::default(), button)
            .expect("partial text");
        assert_eq!(
            candidate.expression(),
            "//*[contains(normalize-space(text()),'Sign in to')]"
        );
        assert_eq!(candidate.tier(), ConfidenceTier::Caution);
        assert!(StrategyKind::ExactText
            .synthesize(&oracle, &LocatorOptions::default(), button)
            .is_some());
    }

    #[test]
    fn partial_text_matches_text_wrapped_over_lines() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let note = b.element_with_text(
            body,
            "p",
            &[],
            "Free shipping\n        on orders over $50",
        );
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        let candidate = StrategyKind::PartialText
            .synthesize(&oracle, &LocatorOptions::default(), note)
            .expect("partial text");
        assert_eq!(
            candidate.expression(),
            "//*[contains(normalize-space(text()),'Free shipping on')]"
        );
        assert!(oracle.identifies(candidate.expression(), note));
    }

    fn text_tree(texts: &[String]) -> (DomTree, Vec<NodeId>) {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let body = b.element(html, "body", &[]);
        let nodes = texts
            .iter()
            .map(|text| b.element_with_text(body, "span", &[], text))
            .collect();
        (b.build(), nodes)
    }

    #[test]
    fn exact_text_length_is_exclusive_of_2_and_50() {
        let texts: Vec<String> = [2, 3, 49, 50]
            .iter()
            .enumerate()
            .map(|(i, len)| format!("{i}{}", "x".repeat(len - 1)))
            .collect();
        let (tree, nodes) = text_tree(&texts);
        let oracle = Oracle::new(&tree);
        let options = LocatorOptions::default();
        let produced: Vec<bool> = nodes
            .iter()
            .map(|node| {
                StrategyKind::ExactText
                    .synthesize(&oracle, &options, *node)
                    .is_some()
            })
            .collect();
        assert_eq!(produced, vec![false, true, true, false]);
    }

    #[test]
    fn partial_text_needs_more_than_10_characters() {
        let (tree, nodes) = text_tree(&[
            "abcdefghij".to_string(),
            "zy xwvutsrq".to_string(),
        ]);
        let oracle = Oracle::new(&tree);
        let options = LocatorOptions::default();
        assert!(StrategyKind::PartialText
            .synthesize(&oracle, &options, nodes[0])
            .is_none());
        let candidate = StrategyKind::PartialText
            .synthesize(&oracle, &options, nodes[1])
            .expect("eleven characters");
        assert_eq!(
            candidate.expression(),
            "//*[contains(normalize-space(text()),'zy xwvutsrq')]"
        );
    }

    #[test]
    fn text_strategy_rejects_text_of_a_descendant() {
        let mut b = TreeBuilder::new();
        let html = b.element(b.document(), "html", &[]);
        let button = b.element(html, "button", &[]);
        b.element_with_text(button, "span", &[], "Continue");
        let tree = b.build();
        let oracle = Oracle::new(&tree);
        assert!(StrategyKind::ExactText
            .synthesize(&oracle, &LocatorOptions::default(), button)
            .is_none());
    }

    #[test]
    fn partial_class_uses_first_token() {
        let (tree, _, button) = form();
        let oracle = Oracle::new(&tree);
        let candidate = StrategyKind::TagPartialClass
            .synthesize(&oracle, &LocatorOptions::default(), button)
            .expect("btn");
        assert_eq!(candidate.expression(), "//button[contains(@class,'btn')]");
        assert_eq!(candidate.strategy(), Some(StrategyKind::TagPartialClass));
    }
}
