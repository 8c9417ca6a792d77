use thiserror::Error;

use crate::tree::ComponentId;

/// Errors raised by the component core.
///
/// Every variant is a precondition violation by the caller. Soft conditions
/// (repainting a hidden component, re-focusing the focus owner, validating a
/// valid subtree) are not errors and never show up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown layout constraint `{0}`")]
    UnknownConstraint(String),

    #[error("layout does not accept a constraint (got `{0}`)")]
    UnsupportedConstraint(String),

    #[error("layout constraint `{0}` is already taken")]
    ConstraintTaken(String),

    #[error("component {0:?} already has a parent")]
    AlreadyHasParent(ComponentId),

    #[error("adding {child:?} to {parent:?} would make a container its own descendant")]
    WouldCreateCycle {
        parent: ComponentId,
        child: ComponentId,
    },

    #[error("component {0:?} is not a container")]
    NotAContainer(ComponentId),

    #[error("component {child:?} is not a child of {parent:?}")]
    NotAChild {
        parent: ComponentId,
        child: ComponentId,
    },

    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("component {0:?} does not exist (removed or never created)")]
    StaleComponent(ComponentId),

    #[error("window {0:?} was never opened")]
    WindowNotOpened(ComponentId),

    #[error("window {0:?} is already open")]
    WindowAlreadyOpen(ComponentId),

    #[error("window {0:?} is an info window and cannot be activated")]
    NotActivatable(ComponentId),

    #[error("window {window:?} is below modal window {modal:?}")]
    ActivationBlocked {
        window: ComponentId,
        modal: ComponentId,
    },

    #[error("modal window {0:?} cannot be deactivated directly")]
    ModalDeactivation(ComponentId),

    #[error("layer {0:?} is not a window layer")]
    NotAWindowLayer(ComponentId),

    #[error("layer {0:?} is permanent and cannot be removed")]
    PermanentLayer(ComponentId),

    #[error("layout of layer {0:?} is owned by the desktop")]
    LayerLayout(ComponentId),

    #[error("layer {0:?} is a desktop root and cannot be added to a container")]
    LayerNotAttachable(ComponentId),

    #[error("timer backend: {0}")]
    Timer(String),
}

pub type Result<T> = std::result::Result<T, Error>;
