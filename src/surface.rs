// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::{resolve, Rgb};
use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub top: i32,
    pub bottom: i32,
}

impl Rect {
    // Fully above or fully below the container's current vertical bounds.
    pub fn outside_of(self, container: Rect) -> bool {
        container.top >= self.bottom || container.bottom <= self.top
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceStyle {
    pub text: Rgb,
    pub background: Rgb,
}

pub trait Surface {
    fn create_node(&mut self) -> NodeId;
    fn attach(&mut self, parent: NodeId, node: NodeId);
    fn attach_front(&mut self, parent: NodeId, node: NodeId);
    fn detach(&mut self, parent: NodeId, node: NodeId);
    fn bounding_box(&self, node: NodeId) -> Option<Rect>;
    fn set_content(&mut self, node: NodeId, ch: char);
    fn set_style(&mut self, container: NodeId, style: SurfaceStyle);
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: char,
    alive: bool,
}

impl Node {
    fn fresh() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            content: ' ',
            alive: true,
        }
    }
}

// Projects the scene graph onto a character grid: container children are
// columns spread across the width, column children are symbols stacked
// top-down in child order. Detached nodes are recycled with their subtree.
pub struct TextSurface {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: NodeId,
    width: u16,
    height: u16,
    mode: ColorMode,
    style: SurfaceStyle,
}

impl TextSurface {
    pub fn new(width: u16, height: u16, mode: ColorMode) -> Self {
        Self {
            nodes: vec![Node::fresh()],
            free: Vec::new(),
            root: NodeId(0),
            width,
            height,
            mode,
            style: SurfaceStyle {
                text: Rgb::new(0, 255, 65),
                background: Rgb::new(0, 0, 0),
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn style(&self) -> SurfaceStyle {
        self.style
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    #[allow(dead_code)]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.children.len()).unwrap_or(0)
    }

    pub fn render(&self, frame: &mut Frame) {
        let fg = resolve(self.style.text, self.mode);
        let bg = resolve(self.style.background, self.mode);
        frame.clear_with_bg(bg);

        let Some(root) = self.node(self.root) else {
            return;
        };
        let count = root.children.len();
        if count == 0 {
            return;
        }

        for (i, &col_id) in root.children.iter().enumerate() {
            let Some(col) = self.node(col_id) else {
                continue;
            };
            let x = (i * self.width as usize / count) as u16;
            for (row, &sym_id) in col.children.iter().enumerate() {
                if row >= self.height as usize {
                    break;
                }
                let Some(sym) = self.node(sym_id) else {
                    continue;
                };
                frame.set(
                    x,
                    row as u16,
                    Cell {
                        ch: sym.content,
                        fg,
                        bg,
                    },
                );
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| n.alive)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).filter(|n| n.alive)
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(NodeId(i)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(i) else {
                continue;
            };
            if !node.alive {
                continue;
            }
            node.alive = false;
            node.parent = None;
            stack.extend(node.children.drain(..));
            self.free.push(i);
        }
    }

    fn link(&mut self, parent: NodeId, node: NodeId, front: bool) {
        if parent == node || self.node(parent).is_none() {
            return;
        }
        match self.node_mut(node) {
            Some(n) if n.parent.is_none() => n.parent = Some(parent),
            _ => return,
        }
        let parent_node = self.node_mut(parent).expect("checked above");
        if front {
            parent_node.children.insert(0, node);
        } else {
            parent_node.children.push(node);
        }
    }
}

impl Surface for TextSurface {
    fn create_node(&mut self) -> NodeId {
        if let Some(i) = self.free.pop() {
            self.nodes[i] = Node::fresh();
            NodeId(i)
        } else {
            self.nodes.push(Node::fresh());
            NodeId(self.nodes.len() - 1)
        }
    }

    fn attach(&mut self, parent: NodeId, node: NodeId) {
        self.link(parent, node, false);
    }

    fn attach_front(&mut self, parent: NodeId, node: NodeId) {
        self.link(parent, node, true);
    }

    fn detach(&mut self, parent: NodeId, node: NodeId) {
        let linked = self
            .node(node)
            .is_some_and(|n| n.parent == Some(parent));
        if !linked {
            return;
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        self.release(node);
    }

    fn bounding_box(&self, id: NodeId) -> Option<Rect> {
        let node = self.node(id)?;
        if id == self.root {
            return Some(Rect {
                top: 0,
                bottom: self.height as i32,
            });
        }
        let parent_id = node.parent?;
        let parent = self.node(parent_id)?;
        if parent_id == self.root {
            return Some(Rect {
                top: 0,
                bottom: node.children.len() as i32,
            });
        }
        let row = parent.children.iter().position(|&c| c == id)? as i32;
        Some(Rect {
            top: row,
            bottom: row + 1,
        })
    }

    fn set_content(&mut self, id: NodeId, ch: char) {
        if let Some(n) = self.node_mut(id) {
            n.content = ch;
        }
    }

    fn set_style(&mut self, container: NodeId, style: SurfaceStyle) {
        if container == self.root {
            self.style = style;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> TextSurface {
        TextSurface::new(8, 6, ColorMode::Mono)
    }

    #[test]
    fn container_box_spans_viewport_height() {
        let s = surface();
        assert_eq!(
            s.bounding_box(s.root()),
            Some(Rect { top: 0, bottom: 6 })
        );
    }

    #[test]
    fn symbol_rows_follow_child_order() {
        let mut s = surface();
        let root = s.root();
        let col = s.create_node();
        s.attach(root, col);

        let a = s.create_node();
        let b = s.create_node();
        let c = s.create_node();
        s.attach_front(col, a);
        s.attach_front(col, b);
        s.attach_front(col, c);

        // c was prepended last, so it sits at the head row
        assert_eq!(s.bounding_box(c), Some(Rect { top: 0, bottom: 1 }));
        assert_eq!(s.bounding_box(a), Some(Rect { top: 2, bottom: 3 }));
    }

    #[test]
    fn outside_test_matches_vertical_overflow() {
        let container = Rect { top: 0, bottom: 6 };
        assert!(Rect { top: 6, bottom: 7 }.outside_of(container));
        assert!(Rect { top: -2, bottom: 0 }.outside_of(container));
        assert!(!Rect { top: 5, bottom: 6 }.outside_of(container));
        assert!(!Rect { top: -1, bottom: 1 }.outside_of(container));
    }

    #[test]
    fn detach_recycles_the_subtree() {
        let mut s = surface();
        let root = s.root();
        let col = s.create_node();
        s.attach(root, col);
        let sym = s.create_node();
        s.attach(col, sym);

        s.detach(root, col);
        assert_eq!(s.bounding_box(col), None);
        assert_eq!(s.bounding_box(sym), None);
        assert_eq!(s.child_count(root), 0);

        // recycled slots are reused
        let reused = s.create_node();
        assert!(reused == col || reused == sym);
    }

    #[test]
    fn detach_of_unrelated_node_is_a_no_op() {
        let mut s = surface();
        let root = s.root();
        let col = s.create_node();
        s.attach(root, col);
        let stray = s.create_node();

        s.detach(root, stray);
        s.detach(col, stray);
        assert_eq!(s.child_count(root), 1);
        assert!(s.bounding_box(stray).is_some());
    }

    #[test]
    fn render_places_glyphs_on_the_grid() {
        let mut s = TextSurface::new(4, 3, ColorMode::Mono);
        let root = s.root();
        for ch in ['0', '1'] {
            let col = s.create_node();
            s.attach(root, col);
            let sym = s.create_node();
            s.set_content(sym, ch);
            s.attach_front(col, sym);
        }

        let mut frame = Frame::new(4, 3, None);
        s.render(&mut frame);
        assert_eq!(frame.get(0, 0).unwrap().ch, '0');
        assert_eq!(frame.get(2, 0).unwrap().ch, '1');
    }

    #[test]
    fn set_style_on_non_container_is_ignored() {
        let mut s = surface();
        let col = s.create_node();
        let before = s.style();
        s.set_style(
            col,
            SurfaceStyle {
                text: Rgb::new(1, 2, 3),
                background: Rgb::new(4, 5, 6),
            },
        );
        assert_eq!(s.style(), before);
    }
}
