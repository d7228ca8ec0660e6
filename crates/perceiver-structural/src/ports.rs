use std::sync::Arc;

use screenpilot_core_types::NodeAttributes;

/// Handle to one node of a live UI tree.
///
/// Handles are cheap to clone and read attributes on demand, so a value
/// read twice may differ if the screen changed in between.
pub trait UiNode: Clone + Send + Sync {
    fn attributes(&self) -> NodeAttributes;

    /// Children in left-to-right order.
    fn children(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;
}

/// Platform inspection port.
pub trait ScreenSource: Send + Sync {
    type Node: UiNode;

    /// Root of the active window, if any.
    fn active_root(&self) -> Option<Self::Node>;

    /// Identifier of the app owning the active window.
    fn foreground_app(&self) -> Option<String>;
}

impl<S> ScreenSource for Arc<S>
where
    S: ScreenSource + ?Sized,
{
    type Node = S::Node;

    fn active_root(&self) -> Option<Self::Node> {
        (**self).active_root()
    }

    fn foreground_app(&self) -> Option<String> {
        (**self).foreground_app()
    }
}
