//! Border layout: up to five children keyed by compass constraint tokens.

use std::collections::HashMap;

use super::Layout;
use crate::error::{Error, Result};
use crate::geometry::{Rect, Size};
use crate::tree::{ComponentId, ComponentTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    North,
    South,
    East,
    West,
    Center,
}

impl Region {
    /// Parse a constraint token, case-insensitively.
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "north" => Ok(Region::North),
            "south" => Ok(Region::South),
            "east" => Ok(Region::East),
            "west" => Ok(Region::West),
            "center" => Ok(Region::Center),
            _ => Err(Error::UnknownConstraint(token.to_string())),
        }
    }
}

/// North and south span the full width at their preferred height; west and
/// east take their preferred width between them; center gets the rest.
/// A child added without a constraint goes to the center.
#[derive(Debug, Default, Clone)]
pub struct BorderLayout {
    regions: HashMap<Region, ComponentId>,
    gap: i32,
}

impl BorderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    /// The child occupying `region`, if visible.
    fn visible(&self, tree: &ComponentTree, region: Region) -> Option<ComponentId> {
        self.regions
            .get(&region)
            .copied()
            .filter(|&c| tree.state(c).map(|s| s.is_visible()).unwrap_or(false))
    }

    fn preferred(&self, tree: &ComponentTree, region: Region) -> Option<Size> {
        self.visible(tree, region).map(|c| tree.preferred_size(c))
    }
}

impl Layout for BorderLayout {
    fn calc_preferred_size(&self, tree: &ComponentTree, _container: ComponentId) -> Size {
        let mut middle = Size::zero();
        let mut middle_count = 0;
        for region in [Region::West, Region::Center, Region::East] {
            if let Some(size) = self.preferred(tree, region) {
                middle.width += size.width;
                middle.height = middle.height.max(size.height);
                middle_count += 1;
            }
        }
        if middle_count > 1 {
            middle.width += self.gap * (middle_count - 1);
        }

        let mut total = middle;
        let mut bands = i32::from(middle_count > 0);
        for region in [Region::North, Region::South] {
            if let Some(size) = self.preferred(tree, region) {
                total.width = total.width.max(size.width);
                total.height += size.height;
                bands += 1;
            }
        }
        if bands > 1 {
            total.height += self.gap * (bands - 1);
        }
        total
    }

    fn layout(&mut self, tree: &mut ComponentTree, container: ComponentId) {
        let area = tree.content_rect(container);
        let (mut top, mut bottom) = (area.y, area.bottom());
        let (mut left, mut right) = (area.x, area.right());

        if let Some(child) = self.visible(tree, Region::North) {
            let h = tree.preferred_size(child).height.min(bottom - top);
            tree.place(child, Rect::new(left, top, right - left, h));
            top += h + self.gap;
        }
        if let Some(child) = self.visible(tree, Region::South) {
            let h = tree.preferred_size(child).height.min((bottom - top).max(0));
            tree.place(child, Rect::new(left, bottom - h, right - left, h));
            bottom -= h + self.gap;
        }
        let middle_height = (bottom - top).max(0);
        if let Some(child) = self.visible(tree, Region::East) {
            let w = tree.preferred_size(child).width.min((right - left).max(0));
            tree.place(child, Rect::new(right - w, top, w, middle_height));
            right -= w + self.gap;
        }
        if let Some(child) = self.visible(tree, Region::West) {
            let w = tree.preferred_size(child).width.min((right - left).max(0));
            tree.place(child, Rect::new(left, top, w, middle_height));
            left += w + self.gap;
        }
        if let Some(child) = self.visible(tree, Region::Center) {
            tree.place(
                child,
                Rect::new(left, top, (right - left).max(0), middle_height),
            );
        }
    }

    fn component_added(
        &mut self,
        constraint: Option<&str>,
        child: ComponentId,
        _index: usize,
    ) -> Result<()> {
        let region = match constraint {
            Some(token) => Region::parse(token)?,
            None => Region::Center,
        };
        if self.regions.contains_key(&region) {
            return Err(Error::ConstraintTaken(
                constraint.unwrap_or("center").to_string(),
            ));
        }
        self.regions.insert(region, child);
        Ok(())
    }

    fn component_removed(&mut self, child: ComponentId, _index: usize) {
        self.regions.retain(|_, c| *c != child);
    }

    fn is_contained(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentState, Widget};

    struct Fixed(Size);
    impl Widget for Fixed {
        fn calc_preferred_size(&self, _: &ComponentState) -> Size {
            self.0
        }
    }

    #[test]
    fn test_region_parse() {
        assert_eq!(Region::parse("North"), Ok(Region::North));
        assert_eq!(Region::parse("CENTER"), Ok(Region::Center));
        assert_eq!(
            Region::parse("up"),
            Err(Error::UnknownConstraint("up".into()))
        );
    }

    #[test]
    fn test_border_layout_arrangement() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Fixed(Size::zero()), BorderLayout::new());
        let north = tree.insert(Fixed(Size::new(10, 5)));
        let west = tree.insert(Fixed(Size::new(8, 10)));
        let center = tree.insert(Fixed(Size::new(20, 20)));
        tree.add(root, north, Some("north")).unwrap();
        tree.add(root, west, Some("west")).unwrap();
        tree.add(root, center, None).unwrap();

        assert_eq!(tree.preferred_size(root), Size::new(28, 25));

        tree.place(root, Rect::new(0, 0, 100, 50));
        tree.validate(root);
        assert_eq!(tree.bounds(north), Rect::new(0, 0, 100, 5));
        assert_eq!(tree.bounds(west), Rect::new(0, 5, 8, 45));
        assert_eq!(tree.bounds(center), Rect::new(8, 5, 92, 45));
    }

    #[test]
    fn test_border_region_taken_and_freed() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_container(Fixed(Size::zero()), BorderLayout::new());
        let a = tree.insert(Fixed(Size::zero()));
        let b = tree.insert(Fixed(Size::zero()));
        tree.add(root, a, Some("east")).unwrap();
        assert_eq!(
            tree.add(root, b, Some("east")),
            Err(Error::ConstraintTaken("east".into()))
        );

        tree.remove(root, a).unwrap();
        assert!(tree.add(root, b, Some("east")).is_ok());
    }
}
