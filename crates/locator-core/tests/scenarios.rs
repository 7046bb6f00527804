use dom_snapshot::{DomTree, NodeId, TreeBuilder};
use locator_core::{
    ConfidenceTier, ExternalVerdict, LocatorEngine, StrategyKind,
};

struct Checkout {
    tree: DomTree,
    submit: NodeId,
    profile: NodeId,
    nested_span: NodeId,
    cta: NodeId,
}

fn checkout_page() -> Checkout {
    let mut b = TreeBuilder::new();
    let html = b.element(b.document(), "html", &[]);
    let body = b.element(html, "body", &[]);

    let header = b.element(body, "div", &[("class", "header")]);
    let profile = b.element(header, "div", &[("data-testid", "user-profile")]);
    b.element_with_text(profile, "span", &[], "Ada");

    let content = b.element(body, "div", &[]);
    let row = b.element(content, "div", &[]);
    b.element(row, "span", &[]);
    b.element(row, "span", &[]);
    let nested_span = b.element(row, "span", &[]);
    b.element(content, "div", &[]);

    let form = b.element(body, "form", &[]);
    let submit = b.element_with_text(
        form,
        "button",
        &[("id", "submit-button"), ("class", "btn")],
        "Pay now",
    );
    let cta = b.element(form, "button", &[("class", "cta"), ("type", "button")]);
    b.element(form, "button", &[("class", "ghost"), ("type", "button")]);

    Checkout {
        tree: b.build(),
        submit,
        profile,
        nested_span,
        cta,
    }
}

#[test]
fn unique_id_button() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let session = engine.on_node_selected(&page.tree, page.submit).expect("session");

    assert_eq!(session.current().expression(), "//*[@id='submit-button']");
    assert_eq!(session.current().tier(), ConfidenceTier::Reliable);
    assert_eq!(session.current().strategy(), Some(StrategyKind::UniqueId));
}

#[test]
fn test_id_attribute() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let session = engine.on_node_selected(&page.tree, page.profile).expect("session");

    assert_eq!(
        session.current().expression(),
        "//*[@data-testid='user-profile']"
    );
    assert_eq!(session.current().tier(), ConfidenceTier::Reliable);
}

#[test]
fn anonymous_nested_span_gets_positional_path() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let session = engine
        .on_node_selected(&page.tree, page.nested_span)
        .expect("session");

    assert_eq!(
        session.current().expression(),
        "/html/body/div[2]/div[1]/span[3]"
    );
    assert_eq!(session.current().tier(), ConfidenceTier::Weak);
    assert_eq!(
        engine
            .resolve(&page.tree, session.current().expression())
            .expect("resolve"),
        vec![page.nested_span]
    );
}

#[test]
fn regeneration_after_class_candidate() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let mut session = engine.on_node_selected(&page.tree, page.cta).expect("session");
    assert_eq!(session.current().expression(), "//*[@class='cta']");
    assert_eq!(session.current().tier(), ConfidenceTier::Caution);

    let pair = engine
        .on_regenerate_requested(&page.tree, &mut session)
        .expect("attribute pair");
    assert_eq!(pair.strategy(), Some(StrategyKind::AttributePair));
    assert_eq!(pair.expression(), "//button[@class='cta' and @type='button']");
    assert!(pair.tier() >= ConfidenceTier::Caution);

    let tag_class = engine
        .on_regenerate_requested(&page.tree, &mut session)
        .expect("tag and class");
    assert_eq!(tag_class.expression(), "//button[@class='cta']");

    // `type` is shared with another button and the remaining strategies are Weak.
    assert!(engine
        .on_regenerate_requested(&page.tree, &mut session)
        .is_none());
    assert_eq!(session.current(), &tag_class);
    assert_eq!(
        session.history(),
        [
            "//*[@class='cta']".to_string(),
            "//button[@class='cta' and @type='button']".to_string(),
            "//button[@class='cta']".to_string(),
        ]
    );
}

#[test]
fn new_selection_resets_strategy_memory() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let mut first = engine.on_node_selected(&page.tree, page.cta).expect("session");
    engine.on_regenerate_requested(&page.tree, &mut first);
    assert!(first.used_strategies().len() > 1);

    let second = engine.on_node_selected(&page.tree, page.cta).expect("session");
    assert_eq!(second.used_strategies().len(), 1);
    assert_eq!(second.history().len(), 1);
    assert_ne!(first.id(), second.id());
}

#[test]
fn external_suggestions_are_gated() {
    let page = checkout_page();
    let engine = LocatorEngine::default();
    let mut session = engine.on_node_selected(&page.tree, page.cta).expect("session");

    let verdict = engine.submit_external(&page.tree, &mut session, "//button[@type='button']");
    assert!(matches!(verdict, ExternalVerdict::Rejected { .. }));

    let verdict = engine.submit_external(&page.tree, &mut session, "//*[@id='submit-button']");
    assert!(matches!(verdict, ExternalVerdict::Rejected { .. }));

    let verdict = engine.submit_external(&page.tree, &mut session, "//form/button[2]");
    match verdict {
        ExternalVerdict::Accepted(candidate) => {
            assert_eq!(candidate.tier(), ConfidenceTier::Weak);
            assert_eq!(session.current(), &candidate);
        }
        other => panic!("unexpected verdict {other:?}"),
    }
}

#[test]
fn wrapped_paragraph_regenerates_to_partial_text() {
    let mut b = TreeBuilder::new();
    let html = b.element(b.document(), "html", &[]);
    let body = b.element(html, "body", &[]);
    let note = b.element_with_text(
        body,
        "p",
        &[],
        "Free shipping\n        on orders over fifty dollars",
    );
    let tree = b.build();
    let engine = LocatorEngine::default();

    let mut session = engine.on_node_selected(&tree, note).expect("session");
    assert_eq!(session.current().strategy(), Some(StrategyKind::ExactText));

    let next = engine
        .on_regenerate_requested(&tree, &mut session)
        .expect("partial text");
    assert_eq!(next.strategy(), Some(StrategyKind::PartialText));
    assert_eq!(
        next.expression(),
        "//*[contains(normalize-space(text()),'Free shipping on')]"
    );
    assert_eq!(next.tier(), ConfidenceTier::Caution);
}
