//! Structural container operations.
//!
//! Every insertion and removal updates the child's parent link, notifies the
//! container's layout and invalidates the container, in that order. Layouts
//! vet constraints before anything is attached, so a rejected add leaves the
//! tree untouched.

use crate::error::{Error, Result};
use crate::tree::{ComponentId, ComponentTree};

impl ComponentTree {
    /// Append `child` to `parent`.
    pub fn add(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        constraint: Option<&str>,
    ) -> Result<()> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child, constraint)
    }

    /// Insert `child` at `index` in `parent`'s child list.
    pub fn insert_child(
        &mut self,
        parent: ComponentId,
        index: usize,
        child: ComponentId,
        constraint: Option<&str>,
    ) -> Result<()> {
        self.require(parent)?;
        self.require(child)?;
        if !self.is_container(parent) {
            return Err(Error::NotAContainer(parent));
        }
        if self.parent(child).is_some() {
            return Err(Error::AlreadyHasParent(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        let len = self.children(parent).len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.with_layout_mut(parent, |layout, _| {
            layout.component_added(constraint, child, index)
        })
        .unwrap_or(Err(Error::NotAContainer(parent)))?;

        self.attach(parent, child, index);
        self.invalidate(parent);
        log::trace!("added {:?} to {:?} at {}", child, parent, index);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive in the arena and
    /// may be added elsewhere. Returns the index it occupied.
    pub fn remove(&mut self, parent: ComponentId, child: ComponentId) -> Result<usize> {
        self.require(parent)?;
        self.require(child)?;
        if self.parent(child) != Some(parent) {
            return Err(Error::NotAChild { parent, child });
        }
        let index = self
            .detach(child)
            .ok_or(Error::NotAChild { parent, child })?;
        self.with_layout_mut(parent, |layout, _| layout.component_removed(child, index));
        self.invalidate(parent);
        log::trace!("removed {:?} from {:?} at {}", child, parent, index);
        Ok(index)
    }

    /// Index of `child` within its parent.
    pub fn index_of(&self, child: ComponentId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }
}
