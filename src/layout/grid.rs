//! Grid layout: fixed column count, row-major placement.

use super::{fit_cells, Layout};
use crate::geometry::{Rect, Size};
use crate::tree::{ComponentId, ComponentTree};

/// Arranges visible children row by row into `cols` columns.
///
/// Columns are as wide as the widest child and a row as tall as its tallest
/// child. When the container is larger or smaller than that, the difference
/// is spread over the columns and rows, so children never leave the content
/// rect. Every child fills its cell.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
    h_gap: i32,
    v_gap: i32,
}

impl GridLayout {
    /// `rows` is a minimum: extra children open new rows.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols: cols.max(1),
            h_gap: 0,
            v_gap: 0,
        }
    }

    pub fn gaps(mut self, h_gap: i32, v_gap: i32) -> Self {
        self.h_gap = h_gap.max(0);
        self.v_gap = v_gap.max(0);
        self
    }

    fn row_count(&self, children: usize) -> usize {
        self.rows.max(children.div_ceil(self.cols))
    }

    /// Column widths and row heights from the children's preferred sizes.
    ///
    /// Occupied columns share the widest child's width; each row is as tall
    /// as its tallest child.
    fn cell_metrics(&self, tree: &ComponentTree, children: &[ComponentId]) -> (Vec<i32>, Vec<i32>) {
        let mut heights = vec![0; self.row_count(children.len())];
        let mut widest = 0;
        for (i, &child) in children.iter().enumerate() {
            let size = tree.preferred_size(child);
            widest = widest.max(size.width);
            heights[i / self.cols] = heights[i / self.cols].max(size.height);
        }
        let occupied = children.len().min(self.cols);
        let widths = (0..self.cols)
            .map(|col| if col < occupied { widest } else { 0 })
            .collect();
        (widths, heights)
    }

    fn gaps_total(gap: i32, cells: usize) -> i32 {
        gap * (cells.saturating_sub(1) as i32)
    }
}

impl Layout for GridLayout {
    fn calc_preferred_size(&self, tree: &ComponentTree, container: ComponentId) -> Size {
        let children = tree.visible_children(container);
        if children.is_empty() {
            return Size::zero();
        }
        let (widths, heights) = self.cell_metrics(tree, &children);
        Size::new(
            widths.iter().sum::<i32>() + Self::gaps_total(self.h_gap, widths.len()),
            heights.iter().sum::<i32>() + Self::gaps_total(self.v_gap, heights.len()),
        )
    }

    fn layout(&mut self, tree: &mut ComponentTree, container: ComponentId) {
        let children = tree.visible_children(container);
        if children.is_empty() {
            return;
        }
        let area = tree.content_rect(container);
        let (widths, heights) = self.cell_metrics(tree, &children);
        let widths = fit_cells(
            &widths,
            area.width - Self::gaps_total(self.h_gap, widths.len()),
        );
        let heights = fit_cells(
            &heights,
            area.height - Self::gaps_total(self.v_gap, heights.len()),
        );

        for (i, &child) in children.iter().enumerate() {
            let (row, col) = (i / self.cols, i % self.cols);
            let x = area.x + widths[..col].iter().sum::<i32>() + self.h_gap * col as i32;
            let y = area.y + heights[..row].iter().sum::<i32>() + self.v_gap * row as i32;
            tree.place(child, Rect::new(x, y, widths[col], heights[row]));
        }
    }

    fn is_contained(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentFlags, ComponentState, Widget};

    struct Fixed(Size);
    impl Widget for Fixed {
        fn calc_preferred_size(&self, _: &ComponentState) -> Size {
            self.0
        }
    }

    fn grid_2x2(tree: &mut ComponentTree) -> (ComponentId, Vec<ComponentId>) {
        let root = tree.insert_container(Fixed(Size::zero()), GridLayout::new(2, 2));
        let sizes = [
            Size::new(10, 10),
            Size::new(20, 10),
            Size::new(10, 20),
            Size::new(20, 20),
        ];
        let children: Vec<_> = sizes
            .iter()
            .map(|&s| {
                let id = tree.insert(Fixed(s));
                tree.add(root, id, None).unwrap();
                id
            })
            .collect();
        (root, children)
    }

    #[test]
    fn test_grid_preferred_size() {
        let mut tree = ComponentTree::new();
        let (root, children) = grid_2x2(&mut tree);
        let (widths, heights) = GridLayout::new(2, 2).cell_metrics(&tree, &children);
        assert_eq!(widths, vec![20, 20]);
        assert_eq!(heights, vec![10, 20]);
        assert_eq!(tree.preferred_size(root), Size::new(40, 30));
    }

    #[test]
    fn test_grid_assigns_cells_at_preferred_size() {
        let mut tree = ComponentTree::new();
        let (root, children) = grid_2x2(&mut tree);
        tree.place(root, Rect::new(0, 0, 40, 30));
        tree.validate(root);

        assert_eq!(tree.bounds(children[0]), Rect::new(0, 0, 20, 10));
        assert_eq!(tree.bounds(children[1]), Rect::new(20, 0, 20, 10));
        assert_eq!(tree.bounds(children[2]), Rect::new(0, 10, 20, 20));
        assert_eq!(tree.bounds(children[3]), Rect::new(20, 10, 20, 20));
    }

    #[test]
    fn test_grid_children_stay_inside_smaller_container() {
        let mut tree = ComponentTree::new();
        let (root, children) = grid_2x2(&mut tree);
        tree.place(root, Rect::new(0, 0, 25, 17));
        tree.validate(root);

        let content = tree.content_rect(root);
        let union = children
            .iter()
            .fold(Rect::default(), |acc, &c| acc.union(&tree.bounds(c)));
        assert!(content.contains_rect(&union));
    }

    #[test]
    fn test_grid_with_gaps_and_hidden_child() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Fixed(Size::zero()), GridLayout::new(1, 3).gaps(2, 0));
        let a = tree.insert(Fixed(Size::new(10, 10)));
        let hidden = tree.insert(Fixed(Size::new(99, 99)));
        let b = tree.insert(Fixed(Size::new(10, 10)));
        for id in [a, hidden, b] {
            tree.add(root, id, None).unwrap();
        }
        tree.state_mut(hidden)
            .unwrap()
            .flags
            .remove(ComponentFlags::VISIBLE);

        // Hidden children take no cell; the third column stays empty.
        assert_eq!(tree.preferred_size(root), Size::new(24, 10));
    }

    #[test]
    fn test_grid_grows_rows_for_extra_children() {
        let layout = GridLayout::new(1, 2);
        assert_eq!(layout.row_count(5), 3);
        assert_eq!(layout.row_count(0), 1);
    }
}
