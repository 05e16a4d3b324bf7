//! Attach and detach notifications
//!
//! When a subtree enters or leaves a tree rooted at a [`Ui`](super::Ui), every
//! component in it receives an event. Children are always notified before
//! their parent, so a parent's listener can rely on its children having
//! already seen the change.

use crate::component::Component;
use crate::events::event::component_event;

/// The component was attached to a UI
#[derive(Debug, Clone)]
pub struct AttachEvent {
    source: Component,
    from_client: bool,
    initial_attach: bool,
}

impl AttachEvent {
    pub(crate) fn new(source: &Component, initial_attach: bool) -> Self {
        Self {
            source: source.clone(),
            from_client: false,
            initial_attach,
        }
    }

    /// Whether this is the first time the component is attached
    pub fn is_initial_attach(&self) -> bool {
        self.initial_attach
    }
}

component_event!(AttachEvent);

/// The component is being detached from a UI
#[derive(Debug, Clone)]
pub struct DetachEvent {
    source: Component,
    from_client: bool,
}

impl DetachEvent {
    pub(crate) fn new(source: &Component) -> Self {
        Self {
            source: source.clone(),
            from_client: false,
        }
    }
}

component_event!(DetachEvent);

/// Components of a subtree, deepest first, root last
fn post_order(root: &Component) -> Vec<Component> {
    fn visit(node: &Component, out: &mut Vec<Component>) {
        for child in node.children() {
            visit(&child, out);
        }
        out.push(node.clone());
    }

    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

/// Fire attach events over a subtree that was just linked under an attached parent
pub(crate) fn fire_attach(root: &Component) {
    let nodes = post_order(root);
    log::debug!("Attaching {} ({} components)", root.id(), nodes.len());

    for node in nodes {
        let initial = !node.inner.attached_once.replace(true);
        node.fire_event(&AttachEvent::new(&node, initial));
    }
}

/// Fire detach events over a subtree that is about to be unlinked
pub(crate) fn fire_detach(root: &Component) {
    let nodes = post_order(root);
    log::debug!("Detaching {} ({} components)", root.id(), nodes.len());

    for node in nodes {
        node.fire_event(&DetachEvent::new(&node));
    }
}
