use slotmap::new_key_type;

use crate::x::core::XWindowID;

new_key_type! {
    /// A handle to a client record held by the [`Desktop`](super::Desktop).
    pub struct ClientId;
}

/// A managed application window.
///
/// Every client sits in exactly one list: the tiled list of a workspace,
/// the floating list of that workspace, or the hidden store. The list
/// links are keys into the desktop's client map.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub(crate) id: XWindowID,
    pub(crate) name: Option<String>,
    pub(crate) floating: bool,
    pub(crate) prev: Option<ClientId>,
    pub(crate) next: Option<ClientId>,
}

impl Client {
    /// Creates a new, unlinked tiled client.
    pub fn new(id: XWindowID, name: Option<String>) -> Self {
        Self {
            id,
            name,
            floating: false,
            prev: None,
            next: None,
        }
    }

    /// The X window backing this client.
    #[inline]
    pub fn id(&self) -> XWindowID {
        self.id
    }

    /// The window title, if the client has set one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_floating(&self) -> bool {
        self.floating
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}
