// Copyright (c) 2026 rezky_nightky

use std::collections::VecDeque;

use crate::bit::Bit;
use crate::surface::{NodeId, Surface};

#[derive(Clone, Copy, Debug)]
pub struct Symbol {
    pub bit: Bit,
    pub node: NodeId,
}

// Newest-first: front = head (most recent emission), back = tail
// (oldest, next to be evicted).
#[derive(Clone, Debug)]
pub struct Column {
    pub node: NodeId,
    pub symbols: VecDeque<Symbol>,
}

impl Column {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            symbols: VecDeque::new(),
        }
    }

    pub fn tail(&self) -> Option<&Symbol> {
        self.symbols.back()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// Grows or shrinks the live column set to the desired count. Equal count is
// an identity no-op. Shrinking truncates at the new length so the
// earliest-created columns survive; every structural change is mirrored on
// the surface immediately.
pub fn reconcile(
    columns: &mut Vec<Column>,
    desired: usize,
    surface: &mut dyn Surface,
    container: NodeId,
) {
    let current = columns.len();
    if desired == current {
        return;
    }

    if desired < current {
        for column in columns.drain(desired..) {
            surface.detach(container, column.node);
        }
        return;
    }

    for _ in current..desired {
        let node = surface.create_node();
        surface.attach(container, node);
        columns.push(Column::new(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::ColorMode;
    use crate::surface::{Rect, SurfaceStyle, TextSurface};

    // Counts every structural mutation so no-op reconciles can be pinned.
    struct Probe {
        inner: TextSurface,
        mutations: usize,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                inner: TextSurface::new(10, 6, ColorMode::Mono),
                mutations: 0,
            }
        }
    }

    impl Surface for Probe {
        fn create_node(&mut self) -> NodeId {
            self.mutations += 1;
            self.inner.create_node()
        }

        fn attach(&mut self, parent: NodeId, node: NodeId) {
            self.mutations += 1;
            self.inner.attach(parent, node);
        }

        fn attach_front(&mut self, parent: NodeId, node: NodeId) {
            self.mutations += 1;
            self.inner.attach_front(parent, node);
        }

        fn detach(&mut self, parent: NodeId, node: NodeId) {
            self.mutations += 1;
            self.inner.detach(parent, node);
        }

        fn bounding_box(&self, node: NodeId) -> Option<Rect> {
            self.inner.bounding_box(node)
        }

        fn set_content(&mut self, node: NodeId, ch: char) {
            self.inner.set_content(node, ch);
        }

        fn set_style(&mut self, container: NodeId, style: SurfaceStyle) {
            self.inner.set_style(container, style);
        }
    }

    fn grown(surface: &mut Probe, count: usize) -> Vec<Column> {
        let container = surface.inner.root();
        let mut columns = Vec::new();
        reconcile(&mut columns, count, surface, container);
        columns
    }

    #[test]
    fn reconcile_to_same_count_is_identity_with_zero_mutations() {
        let mut surface = Probe::new();
        let container = surface.inner.root();
        let mut columns = grown(&mut surface, 5);
        let ids: Vec<NodeId> = columns.iter().map(|c| c.node).collect();

        surface.mutations = 0;
        reconcile(&mut columns, 5, &mut surface, container);

        assert_eq!(surface.mutations, 0);
        assert_eq!(columns.len(), 5);
        let after: Vec<NodeId> = columns.iter().map(|c| c.node).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn growing_appends_new_empty_columns_and_keeps_the_rest() {
        let mut surface = Probe::new();
        let container = surface.inner.root();
        let mut columns = grown(&mut surface, 5);
        let ids: Vec<NodeId> = columns.iter().map(|c| c.node).collect();

        reconcile(&mut columns, 8, &mut surface, container);

        assert_eq!(columns.len(), 8);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(columns[i].node, *id);
        }
        for column in &columns[5..] {
            assert!(column.is_empty());
        }
        assert_eq!(surface.inner.child_count(container), 8);
    }

    #[test]
    fn shrinking_keeps_the_earliest_columns_and_detaches_the_rest() {
        let mut surface = Probe::new();
        let container = surface.inner.root();
        let mut columns = grown(&mut surface, 8);
        let ids: Vec<NodeId> = columns.iter().map(|c| c.node).collect();

        reconcile(&mut columns, 3, &mut surface, container);

        assert_eq!(columns.len(), 3);
        for (i, column) in columns.iter().enumerate() {
            assert_eq!(column.node, ids[i]);
        }
        assert_eq!(surface.inner.child_count(container), 3);
        for id in &ids[3..] {
            assert_eq!(surface.bounding_box(*id), None);
        }
    }

    #[test]
    fn shrinking_to_zero_empties_the_store() {
        let mut surface = Probe::new();
        let container = surface.inner.root();
        let mut columns = grown(&mut surface, 4);

        reconcile(&mut columns, 0, &mut surface, container);

        assert!(columns.is_empty());
        assert_eq!(surface.inner.child_count(container), 0);
    }
}
