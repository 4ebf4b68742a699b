use slotmap::new_key_type;

use crate::core::window::ClientId;

new_key_type! {
    /// A handle to a workspace record held by the [`Desktop`](super::Desktop).
    pub struct WorkspaceId;
}

/// One link of the workspace chain.
///
/// A workspace owns two lists of clients, tiled and floating, by
/// holding the id of each list's head. `current` is the focused client,
/// and is `None` only while both lists are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub(crate) tiled: Option<ClientId>,
    pub(crate) floating: Option<ClientId>,
    pub(crate) n_tiled: usize,
    pub(crate) n_floating: usize,
    pub(crate) current: Option<ClientId>,
    pub(crate) prev: Option<WorkspaceId>,
    pub(crate) next: Option<WorkspaceId>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the workspace holds no clients at all.
    pub fn is_empty(&self) -> bool {
        self.n_tiled == 0 && self.n_floating == 0
    }

    pub fn tiled_count(&self) -> usize {
        self.n_tiled
    }

    pub fn floating_count(&self) -> usize {
        self.n_floating
    }

    pub fn current(&self) -> Option<ClientId> {
        self.current
    }

    pub fn prev(&self) -> Option<WorkspaceId> {
        self.prev
    }

    pub fn next(&self) -> Option<WorkspaceId> {
        self.next
    }
}
