//! Application driver - mount a component and keep it in sync with its state.
//!
//! The driver runs a single effect over the component:
//!
//! ```text
//! first run   render(ctx) ──► mount(tree, container)
//! later runs  render(ctx) ──► diff(previous, next) ──► previous = next
//! ```
//!
//! Every reactive read made by `render` registers the effect, so a write
//! to that state re-renders and patches the live structure inline, on the
//! writer's call stack.
//!
//! # Example
//!
//! ```ignore
//! struct Counter;
//!
//! impl Component for Counter {
//!     type Context = Reactive;
//!
//!     fn setup(&self) -> Reactive {
//!         create_reactive([("count", Scalar::from(1))])
//!     }
//!
//!     fn render(&self, state: &Reactive) -> VNode {
//!         h("h1", attrs! {}, state.get("count").unwrap_or_default())
//!     }
//! }
//!
//! let doc = Rc::new(RefCell::new(Document::new()));
//! let root = doc.borrow().root();
//! let app = create_app(Counter).mount(doc.clone(), root)?;
//!
//! app.context().set("count", 2); // <h1>2</h1>
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error};

use crate::engine::{run_effect, EffectHandle};
use crate::error::{RenderError, Result};
use crate::primitives::VNode;
use crate::renderer::{diff, mount, Host};
use crate::types::ElementId;

// =============================================================================
// Component
// =============================================================================

/// An application: state built once, and a tree derived from it.
pub trait Component {
    /// State shared by every render, usually reactive handles.
    type Context: 'static;

    /// Build the context. Called once per mount.
    fn setup(&self) -> Self::Context;

    /// Derive the current tree from the context.
    fn render(&self, ctx: &Self::Context) -> VNode;
}

/// A component ready to be mounted.
pub struct App<C: Component> {
    component: C,
}

/// Wrap a component for mounting.
pub fn create_app<C: Component + 'static>(component: C) -> App<C> {
    App { component }
}

impl<C: Component + 'static> App<C> {
    /// Mount into `container` and start re-rendering on state changes.
    ///
    /// The container's existing content is cleared first. Fails with the
    /// error of the initial mount, in which case no effect stays alive.
    ///
    /// A render that changes a node's tag is patched according to
    /// [`replace_mode`](crate::config::replace_mode). Under the default
    /// [`ReplaceMode::Empty`](crate::config::ReplaceMode::Empty) the new
    /// element stays empty: later text that renders the same is never
    /// written, and child lists fail every re-render with `MissingHandle`.
    /// Components that switch tags should run with
    /// [`ReplaceMode::Remount`](crate::config::ReplaceMode::Remount).
    pub fn mount<H: Host + 'static>(
        self,
        host: Rc<RefCell<H>>,
        container: ElementId,
    ) -> Result<MountHandle<C>> {
        host.borrow_mut().set_text_content(container, "")?;

        let context = self.component.setup();
        let state = Rc::new(MountState {
            component: self.component,
            context,
            tree: RefCell::new(None),
            last_error: RefCell::new(None),
            renders: Cell::new(0),
        });

        let body_state = Rc::clone(&state);
        let effect = run_effect(move || body_state.render_into(&host, container));

        let initial_error = state.last_error.borrow_mut().take();
        if let Some(err) = initial_error {
            effect.stop();
            return Err(err);
        }

        debug!(%container, effect = %effect.id(), "app mounted");
        Ok(MountHandle { state, effect })
    }
}

// =============================================================================
// Mount State
// =============================================================================

struct MountState<C: Component> {
    component: C,
    context: C::Context,
    /// Tree of the last successful render, carrying live handles.
    tree: RefCell<Option<VNode>>,
    last_error: RefCell<Option<RenderError>>,
    renders: Cell<u64>,
}

impl<C: Component> MountState<C> {
    fn render_into<H: Host>(&self, host: &RefCell<H>, container: ElementId) {
        // Render outside every borrow: reads here register the effect, and
        // a write made during render may re-enter this function.
        let mut next = self.component.render(&self.context);
        self.renders.set(self.renders.get() + 1);

        let previous = self.tree.borrow_mut().take();
        let result = {
            let mut host = host.borrow_mut();
            match &previous {
                None => mount(&mut *host, &mut next, container),
                Some(previous) => diff(&mut *host, previous, &mut next),
            }
        };

        match result {
            Ok(()) => {
                *self.tree.borrow_mut() = Some(next);
            }
            // mount and diff fail before touching the host, so the previous
            // tree still describes the live structure.
            Err(err) => {
                if previous.is_some() {
                    error!(%err, render = self.renders.get(), "re-render failed");
                }
                *self.tree.borrow_mut() = previous;
                *self.last_error.borrow_mut() = Some(err);
            }
        }
    }
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`App::mount`].
///
/// Dropping the handle stops re-rendering. The live structure is left as
/// it was after the last render.
pub struct MountHandle<C: Component> {
    state: Rc<MountState<C>>,
    effect: EffectHandle,
}

impl<C: Component> MountHandle<C> {
    /// The context built by [`Component::setup`].
    pub fn context(&self) -> &C::Context {
        &self.state.context
    }

    /// A copy of the last successfully rendered tree.
    pub fn tree(&self) -> Option<VNode> {
        self.state.tree.borrow().clone()
    }

    /// Number of renders so far, including the initial one.
    pub fn render_count(&self) -> u64 {
        self.state.renders.get()
    }

    /// Error of the most recent failed re-render, if any.
    pub fn last_error(&self) -> Option<RenderError> {
        self.state.last_error.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.effect.is_active()
    }

    /// Stop re-rendering.
    pub fn unmount(self) {
        self.effect.stop();
    }
}

impl<C: Component> Drop for MountHandle<C> {
    fn drop(&mut self) {
        self.effect.stop();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::engine::{create_reactive, Reactive};
    use crate::primitives::h;
    use crate::renderer::Document;
    use crate::types::{MutationKind, Scalar};

    struct Counter;

    impl Component for Counter {
        type Context = Reactive;

        fn setup(&self) -> Reactive {
            create_reactive([("count", Scalar::from(1))])
        }

        fn render(&self, state: &Reactive) -> VNode {
            h(
                "div",
                attrs! { "id" => "div-wrapper" },
                vec![h("h1", attrs! {}, state.get("count").unwrap_or_default())],
            )
        }
    }

    fn document() -> (Rc<RefCell<Document>>, ElementId) {
        let doc = Document::new();
        let root = doc.root();
        (Rc::new(RefCell::new(doc)), root)
    }

    #[test]
    fn test_mount_renders_once() {
        let (doc, root) = document();
        let app = create_app(Counter).mount(doc.clone(), root).unwrap();

        assert_eq!(app.render_count(), 1);
        assert!(app.tree().is_some_and(|t| t.is_fully_mounted()));
        assert_eq!(
            doc.borrow().inner_html(root),
            r#"<div id="div-wrapper"><h1>1</h1></div>"#
        );
    }

    #[test]
    fn test_write_rerenders_and_patches() {
        let (doc, root) = document();
        let app = create_app(Counter).mount(doc.clone(), root).unwrap();
        doc.borrow_mut().take_mutations();

        app.context().set("count", 2);

        assert_eq!(app.render_count(), 2);
        assert_eq!(doc.borrow().text_content(root), "2");
        assert_eq!(doc.borrow().mutation_kinds(), MutationKind::SET_TEXT);
    }

    #[test]
    fn test_mount_clears_container() {
        let (doc, root) = document();
        {
            let mut doc = doc.borrow_mut();
            let stale = doc.create_element("p").unwrap();
            doc.append_child(root, stale).unwrap();
        }

        let _app = create_app(Counter).mount(doc.clone(), root).unwrap();
        assert_eq!(doc.borrow().children(root).len(), 1);
        assert_eq!(doc.borrow().tag(doc.borrow().children(root)[0]), Some("div"));
    }

    #[test]
    fn test_unmount_stops_updates() {
        let (doc, root) = document();
        let app = create_app(Counter).mount(doc.clone(), root).unwrap();
        let state = app.context().clone();

        app.unmount();
        state.set("count", 5);

        assert_eq!(doc.borrow().text_content(root), "1");
    }

    struct Broken;

    impl Component for Broken {
        type Context = Reactive;

        fn setup(&self) -> Reactive {
            create_reactive([("tag", Scalar::from("div"))])
        }

        fn render(&self, state: &Reactive) -> VNode {
            let tag = state.get("tag").unwrap_or_default();
            h(tag.to_string(), attrs! {}, "x")
        }
    }

    struct Invalid;

    impl Component for Invalid {
        type Context = ();

        fn setup(&self) {}

        fn render(&self, _: &()) -> VNode {
            h("not a tag", attrs! {}, "x")
        }
    }

    #[test]
    fn test_initial_mount_error_is_returned() {
        let (doc, root) = document();
        let result = create_app(Invalid).mount(doc.clone(), root);

        assert!(matches!(result, Err(RenderError::MalformedNode { .. })));
        assert!(doc.borrow().children(root).is_empty());
    }

    #[test]
    fn test_rerender_error_is_kept() {
        let (doc, root) = document();
        let app = create_app(Broken).mount(doc.clone(), root).unwrap();

        app.context().set("tag", "bad tag");

        assert!(matches!(
            app.last_error(),
            Some(RenderError::MalformedNode { .. })
        ));
        assert_eq!(doc.borrow().inner_html(root), "<div>x</div>");

        // The last good tree is still the diff base.
        app.context().set("tag", "div");
        assert_eq!(app.render_count(), 3);
        assert_eq!(doc.borrow().inner_html(root), "<div>x</div>");
    }

    struct Siblings;

    impl Component for Siblings {
        type Context = Reactive;

        fn setup(&self) -> Reactive {
            create_reactive([("mode", Scalar::from(1))])
        }

        fn render(&self, state: &Reactive) -> VNode {
            let broken = state.get("mode") == Some(Scalar::from(2));
            let (text, tag) = if broken { ("changed", "bad tag") } else { ("x", "p") };
            h(
                "div",
                attrs! {},
                vec![h("span", attrs! {}, text), h(tag, attrs! {}, "y")],
            )
        }
    }

    #[test]
    fn test_failed_sibling_leaves_live_tree_in_sync() {
        let (doc, root) = document();
        let app = create_app(Siblings).mount(doc.clone(), root).unwrap();

        app.context().set("mode", 2);
        assert!(matches!(
            app.last_error(),
            Some(RenderError::MalformedNode { .. })
        ));
        assert_eq!(doc.borrow().inner_html(root), "<div><span>x</span><p>y</p></div>");

        app.context().set("mode", 1);
        assert_eq!(doc.borrow().inner_html(root), "<div><span>x</span><p>y</p></div>");

        app.context().set("mode", 3);
        assert_eq!(doc.borrow().inner_html(root), "<div><span>x</span><p>y</p></div>");
    }

    struct Toggle;

    impl Component for Toggle {
        type Context = Reactive;

        fn setup(&self) -> Reactive {
            create_reactive([("tag", Scalar::from("span"))])
        }

        fn render(&self, state: &Reactive) -> VNode {
            let tag = state.get("tag").unwrap_or_default();
            h(
                "div",
                attrs! {},
                vec![h(tag.to_string(), attrs! {}, vec![h("b", attrs! {}, "x")])],
            )
        }
    }

    #[test]
    fn test_tag_switch_keeps_rendering_with_remount() {
        crate::config::set_replace_mode(crate::config::ReplaceMode::Remount);
        let (doc, root) = document();
        let app = create_app(Toggle).mount(doc.clone(), root).unwrap();

        app.context().set("tag", "i");
        app.context().set("tag", "span");

        assert!(app.last_error().is_none());
        assert_eq!(doc.borrow().inner_html(root), "<div><span><b>x</b></span></div>");
        crate::config::reset_config();
    }

    #[test]
    fn test_tag_switch_with_child_list_fails_under_empty_mode() {
        crate::config::reset_config();
        let (doc, root) = document();
        let app = create_app(Toggle).mount(doc.clone(), root).unwrap();

        app.context().set("tag", "i");
        assert!(app.last_error().is_none());
        assert_eq!(doc.borrow().inner_html(root), "<div><i></i></div>");

        app.context().set("tag", "i");
        assert_eq!(
            app.last_error(),
            Some(RenderError::MissingHandle { tag: "b".into() })
        );
    }
}
