//! Property-based tests for the diff engine.
//!
//! Uses proptest to verify, over arbitrary trees:
//! 1. Diffing a tree against an identical copy mutates nothing
//! 2. In `Remount` mode, diff(old, next) leaves the same markup as a fresh
//!    mount of `next`, and every node of `next` carries a handle

use proptest::prelude::*;
use spark_view::config::set_replace_mode;
use spark_view::{diff, h, mount, Attributes, Children, Document, ReplaceMode, VNode};

fn arb_tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["div", "span", "li"]).prop_map(String::from)
}

fn arb_attrs() -> impl Strategy<Value = Attributes> {
    prop::collection::btree_map(
        prop::sample::select(vec!["id", "class", "title"]).prop_map(String::from),
        "[a-c]{0,2}",
        0..3,
    )
}

fn arb_text() -> impl Strategy<Value = Children> {
    prop_oneof![
        "[a-z]{0,3}".prop_map(Children::from),
        (0i32..5).prop_map(Children::from),
    ]
}

fn arb_node() -> impl Strategy<Value = VNode> {
    let leaf = (arb_tag(), arb_attrs(), arb_text()).prop_map(|(tag, attrs, children)| h(tag, attrs, children));
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            arb_tag(),
            arb_attrs(),
            prop_oneof![
                arb_text(),
                prop::collection::vec(inner, 0..4).prop_map(Children::from),
            ],
        )
            .prop_map(|(tag, attrs, children)| h(tag, attrs, children))
    })
}

fn mount_fresh(tree: &mut VNode) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    mount(&mut doc, tree, root).unwrap();
    doc.take_mutations();
    doc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: an identical copy produces zero live mutations
    #[test]
    fn test_identical_tree_is_a_no_op(tree in arb_node()) {
        let mut old = tree.clone();
        let mut doc = mount_fresh(&mut old);
        let before = doc.to_html(doc.root());

        let mut next = tree;
        diff(&mut doc, &old, &mut next).unwrap();

        prop_assert_eq!(doc.mutation_count(), 0);
        prop_assert!(next.is_fully_mounted());
        prop_assert_eq!(doc.to_html(doc.root()), before);
    }

    /// Property: with remounting replacement, diff converges to a fresh mount
    #[test]
    fn test_remount_diff_matches_fresh_mount(old in arb_node(), next in arb_node()) {
        set_replace_mode(ReplaceMode::Remount);

        let mut expected_tree = next.clone();
        let expected = mount_fresh(&mut expected_tree);

        let mut old = old;
        let mut doc = mount_fresh(&mut old);
        let mut next = next;
        diff(&mut doc, &old, &mut next).unwrap();

        prop_assert_eq!(
            doc.inner_html(doc.root()),
            expected.inner_html(expected.root())
        );
        prop_assert!(next.is_fully_mounted());
    }
}
