//! Types used for desktop management.
//!
//! This module exports `Desktop` and `Screen`.
//!
//! `Desktop` is the window registry and workspace model in one: it
//! owns every client record and every workspace, links them together
//! through slotmap keys, and implements the mutations the dispatcher
//! performs on them. It never talks to the X server itself; each
//! mutation reports what changed so that the `WindowManager` can issue
//! the matching requests.
//!
//! `Screen` holds the dimensions of the single screen being managed.

use tracing::{debug, trace};

use slotmap::SlotMap;

use crate::core::window::{Client, ClientId};
use crate::core::workspace::{Workspace, WorkspaceId};
use crate::types::Direction;
use crate::x::XWindowID;

/// The dimensions of the managed screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Screen {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// One of the lists a client can live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    Tiled(WorkspaceId),
    Floating(WorkspaceId),
    Hidden,
}

impl Container {
    /// The workspace owning the list, `None` for the hidden store.
    pub fn workspace(&self) -> Option<WorkspaceId> {
        match self {
            Container::Tiled(w) | Container::Floating(w) => Some(*w),
            Container::Hidden => None,
        }
    }
}

/// The result of [`Desktop::locate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Found {
    pub client: ClientId,
    pub container: Container,
}

impl Found {
    /// The owning workspace, `None` if the client is hidden.
    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.container.workspace()
    }

    pub fn is_floating(&self) -> bool {
        matches!(self.container, Container::Floating(_))
    }
}

/// What happened to the workspace a client was taken out of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Detached {
    /// The workspace was emptied and unlinked from the chain.
    pub workspace_removed: bool,
    /// The removed workspace was the active one, so another took its place.
    pub active_changed: bool,
}

/// A client taken out of the desktop by [`Desktop::unmanage`].
#[derive(Clone, Debug, PartialEq)]
pub struct Unmanaged {
    pub client: Client,
    /// `None` if the client was hidden.
    pub detached: Option<Detached>,
}

/// The window registry and workspace chain.
///
/// The chain always holds at least one workspace, and its tail is
/// always empty: it is the staging workspace that forward navigation
/// can always reach.
#[derive(Debug, Clone)]
pub struct Desktop {
    clients: SlotMap<ClientId, Client>,
    workspaces: SlotMap<WorkspaceId, Workspace>,
    first: WorkspaceId,
    active: WorkspaceId,
    hidden: Option<ClientId>,
    n_hidden: usize,
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new()
    }
}

impl Desktop {
    /// Creates a desktop with a single, empty workspace.
    pub fn new() -> Self {
        let mut workspaces = SlotMap::with_key();
        let first = workspaces.insert(Workspace::new());

        Self {
            clients: SlotMap::with_key(),
            workspaces,
            first,
            active: first,
            hidden: None,
            n_hidden: 0,
        }
    }

    //* Retrieval and Convenience Methods *//

    /// The id of the active workspace.
    pub fn active(&self) -> WorkspaceId {
        self.active
    }

    /// The active workspace.
    pub fn active_workspace(&self) -> &Workspace {
        self.ws(self.active)
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.get(id)
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Looks up a client by its window.
    pub fn client_by_window(&self, window: XWindowID) -> Option<&Client> {
        self.locate(window).and_then(|f| self.clients.get(f.client))
    }

    /// The focused client of the active workspace.
    pub fn current_client(&self) -> Option<&Client> {
        self.active_workspace()
            .current
            .and_then(|c| self.clients.get(c))
    }

    /// The window of the focused client of the active workspace.
    pub fn current_window(&self) -> Option<XWindowID> {
        self.current_client().map(|c| c.id)
    }

    /// The workspaces of the chain, first to last.
    pub fn workspace_ids(&self) -> Vec<WorkspaceId> {
        let mut ret = Vec::new();
        let mut cur = Some(self.first);
        while let Some(id) = cur {
            ret.push(id);
            cur = self.ws(id).next;
        }
        ret
    }

    /// The number of workspaces in the chain.
    pub fn workspace_count(&self) -> usize {
        self.workspaces.len()
    }

    /// The number of managed clients, hidden ones included.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn hidden_count(&self) -> usize {
        self.n_hidden
    }

    /// The windows of the tiled list of a workspace, head first.
    pub fn tiled(&self, ws: WorkspaceId) -> Vec<XWindowID> {
        self.windows(Container::Tiled(ws))
    }

    /// The windows of the floating list of a workspace, head first.
    pub fn floating(&self, ws: WorkspaceId) -> Vec<XWindowID> {
        self.windows(Container::Floating(ws))
    }

    /// The hidden clients, head first.
    pub fn hidden(&self) -> impl Iterator<Item = &Client> + '_ {
        self.iter(Container::Hidden)
            .filter_map(move |id| self.clients.get(id))
    }

    /// Every client of a workspace, tiled first.
    pub fn windows_of(&self, ws: WorkspaceId) -> Vec<XWindowID> {
        let mut ret = self.tiled(ws);
        ret.extend(self.floating(ws));
        ret
    }

    //* Window registry *//

    /// Finds the client managing `window`.
    ///
    /// Scans the tiled and floating lists of every workspace in chain
    /// order, then the hidden store.
    pub fn locate(&self, window: XWindowID) -> Option<Found> {
        for ws in self.workspace_ids() {
            for container in [Container::Tiled(ws), Container::Floating(ws)] {
                if let Some(client) = self.find_in(container, window) {
                    return Some(Found { client, container });
                }
            }
        }

        self.find_in(Container::Hidden, window)
            .map(|client| Found { client, container: Container::Hidden })
    }

    /// Whether `window` is managed.
    pub fn is_managed(&self, window: XWindowID) -> bool {
        self.locate(window).is_some()
    }

    //* Workspace model mutations *//

    /// Inserts a new client at the head of the active workspace's tiled
    /// list and focuses it.
    ///
    /// Returns `None` if the window is already managed.
    pub fn manage(&mut self, window: XWindowID, name: Option<String>) -> Option<ClientId> {
        if self.is_managed(window) {
            debug!("window {} is already managed", window);
            return None
        }

        let id = self.clients.insert(Client::new(window, name));
        let active = self.active;
        self.push_front(Container::Tiled(active), id);
        self.ws_mut(active).current = Some(id);
        self.ensure_staging(active);

        debug!("managing window {} on workspace {:?}", window, active);
        Some(id)
    }

    /// Removes the client managing `window` from wherever it is, and
    /// frees its record.
    pub fn unmanage(&mut self, window: XWindowID) -> Option<Unmanaged> {
        let found = self.locate(window)?;

        let detached = match found.container {
            Container::Hidden => {
                self.unlink(Container::Hidden, found.client);
                None
            }
            container => Some(self.detach(container, found.client)),
        };

        let client = self.clients.remove(found.client)?;
        debug!("unmanaged window {}", window);

        Some(Unmanaged { client, detached })
    }

    /// Moves a client between the tiled and floating lists of its
    /// workspace, inserting it at the head of the destination.
    ///
    /// Returns the new floating state, or `None` if the window is not
    /// in a workspace.
    pub fn toggle_float(&mut self, window: XWindowID) -> Option<bool> {
        let found = self.locate(window)?;
        let ws = found.workspace()?;

        let dest = match found.container {
            Container::Tiled(w) => Container::Floating(w),
            _ => Container::Tiled(ws),
        };

        self.unlink(found.container, found.client);
        self.push_front(dest, found.client);
        let floating = matches!(dest, Container::Floating(_));
        if let Some(c) = self.clients.get_mut(found.client) {
            c.floating = floating;
        }
        self.ws_mut(ws).current = Some(found.client);
        self.ensure_staging(ws);

        debug!("window {} is now floating: {}", window, floating);
        Some(floating)
    }

    /// Moves a client to the head of its workspace's tiled list,
    /// converting it to tiled if it was floating.
    ///
    /// Returns `false` if nothing changed.
    pub fn promote(&mut self, window: XWindowID) -> bool {
        let Some(found) = self.locate(window) else {
            return false
        };
        let Some(ws) = found.workspace() else {
            return false
        };

        if self.ws(ws).tiled == Some(found.client) {
            return false
        }

        self.unlink(found.container, found.client);
        self.push_front(Container::Tiled(ws), found.client);
        if let Some(c) = self.clients.get_mut(found.client) {
            c.floating = false;
        }
        self.ws_mut(ws).current = Some(found.client);
        self.ensure_staging(ws);

        debug!("promoted window {}", window);
        true
    }

    /// Focuses a client inside its workspace.
    pub fn focus(&mut self, window: XWindowID) -> bool {
        match self.locate(window) {
            Some(found) => match found.workspace() {
                Some(ws) => {
                    self.ws_mut(ws).current = Some(found.client);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Takes a client out of its workspace and pushes it to the head
    /// of the hidden store.
    pub fn hide(&mut self, window: XWindowID) -> Option<Detached> {
        let found = self.locate(window)?;
        found.workspace()?;

        let detached = self.detach(found.container, found.client);
        if let Some(c) = self.clients.get_mut(found.client) {
            c.floating = false;
        }
        self.push_front(Container::Hidden, found.client);

        debug!("hid window {}", window);
        Some(detached)
    }

    /// Recalls the hidden client at `index` (0-based from the head) into
    /// the active workspace as its tiled head and current client.
    ///
    /// Returns the recalled window, or `None` if `index` is out of range.
    pub fn unhide(&mut self, index: usize) -> Option<XWindowID> {
        let id = self.iter(Container::Hidden).nth(index)?;

        self.unlink(Container::Hidden, id);
        let active = self.active;
        self.push_front(Container::Tiled(active), id);
        self.ws_mut(active).current = Some(id);
        self.ensure_staging(active);

        let window = self.clients.get(id)?.id;
        debug!("unhid window {} from slot {}", window, index);
        Some(window)
    }

    /// Moves the active pointer one workspace along the chain.
    ///
    /// Returns the previously active workspace, or `None` if there is
    /// no workspace in that direction.
    pub fn switch_workspace(&mut self, direction: Direction) -> Option<WorkspaceId> {
        let old = self.active;
        let new = match direction {
            Direction::Forward => self.ws(old).next?,
            Direction::Backward => self.ws(old).prev?,
        };

        self.active = new;
        debug!("switched workspace {:?} -> {:?}", old, new);
        Some(old)
    }

    /// Replaces the name of a managed client.
    pub fn rename(&mut self, window: XWindowID, name: Option<String>) -> bool {
        let Some(found) = self.locate(window) else {
            return false
        };
        match self.clients.get_mut(found.client) {
            Some(c) => {
                c.set_name(name);
                true
            }
            None => false,
        }
    }

    //* Internal list plumbing *//

    fn ws(&self, id: WorkspaceId) -> &Workspace {
        // workspace ids are only handed out for live workspaces and
        // removal unlinks them from every place that stores them
        &self.workspaces[id]
    }

    fn ws_mut(&mut self, id: WorkspaceId) -> &mut Workspace {
        &mut self.workspaces[id]
    }

    fn head(&self, container: Container) -> Option<ClientId> {
        match container {
            Container::Tiled(w) => self.ws(w).tiled,
            Container::Floating(w) => self.ws(w).floating,
            Container::Hidden => self.hidden,
        }
    }

    fn set_head(&mut self, container: Container, head: Option<ClientId>) {
        match container {
            Container::Tiled(w) => self.ws_mut(w).tiled = head,
            Container::Floating(w) => self.ws_mut(w).floating = head,
            Container::Hidden => self.hidden = head,
        }
    }

    fn count_mut(&mut self, container: Container) -> &mut usize {
        match container {
            Container::Tiled(w) => &mut self.ws_mut(w).n_tiled,
            Container::Floating(w) => &mut self.ws_mut(w).n_floating,
            Container::Hidden => &mut self.n_hidden,
        }
    }

    fn iter(&self, container: Container) -> ListIter<'_> {
        ListIter {
            clients: &self.clients,
            cur: self.head(container),
        }
    }

    fn windows(&self, container: Container) -> Vec<XWindowID> {
        self.iter(container)
            .filter_map(|id| self.clients.get(id).map(|c| c.id))
            .collect()
    }

    fn find_in(&self, container: Container, window: XWindowID) -> Option<ClientId> {
        self.iter(container)
            .find(|id| self.clients.get(*id).map(|c| c.id) == Some(window))
    }

    fn push_front(&mut self, container: Container, id: ClientId) {
        let old = self.head(container);
        if let Some(old) = old {
            self.clients[old].prev = Some(id);
        }
        {
            let c = &mut self.clients[id];
            c.prev = None;
            c.next = old;
        }
        self.set_head(container, Some(id));
        *self.count_mut(container) += 1;
    }

    fn unlink(&mut self, container: Container, id: ClientId) {
        let (prev, next) = {
            let c = &self.clients[id];
            (c.prev, c.next)
        };

        if let Some(p) = prev {
            self.clients[p].next = next;
        }
        if let Some(n) = next {
            self.clients[n].prev = prev;
        }
        if self.head(container) == Some(id) {
            self.set_head(container, next);
        }

        let c = &mut self.clients[id];
        c.prev = None;
        c.next = None;

        let count = self.count_mut(container);
        *count = count.saturating_sub(1);
    }

    /// Takes a client out of a workspace list, refocusing and removing
    /// the workspace as needed.
    fn detach(&mut self, container: Container, id: ClientId) -> Detached {
        let Some(ws) = container.workspace() else {
            self.unlink(container, id);
            return Detached::default()
        };
        let (prev, next) = {
            let c = &self.clients[id];
            (c.prev, c.next)
        };

        self.unlink(container, id);

        if self.ws(ws).current == Some(id) {
            let w = self.ws(ws);
            let current = prev.or(next).or(w.floating).or(w.tiled);
            self.ws_mut(ws).current = current;
        }

        self.remove_if_empty(ws)
    }

    /// Unlinks an emptied workspace from the chain.
    ///
    /// The tail is never removed, which also keeps the chain non-empty.
    fn remove_if_empty(&mut self, id: WorkspaceId) -> Detached {
        let (prev, next) = {
            let w = self.ws(id);
            if !w.is_empty() {
                return Detached::default()
            }
            (w.prev, w.next)
        };
        let Some(next) = next else {
            trace!("workspace {:?} is the staging workspace, keeping it", id);
            return Detached::default()
        };

        match prev {
            Some(p) => self.ws_mut(p).next = Some(next),
            None => self.first = next,
        }
        self.ws_mut(next).prev = prev;

        let active_changed = self.active == id;
        if active_changed {
            self.active = next;
        }
        self.workspaces.remove(id);

        debug!("removed empty workspace {:?}", id);
        Detached {
            workspace_removed: true,
            active_changed,
        }
    }

    /// Appends a fresh staging workspace if `id` is the tail and
    /// no longer empty.
    fn ensure_staging(&mut self, id: WorkspaceId) {
        if self.ws(id).next.is_some() || self.ws(id).is_empty() {
            return
        }

        let new = self.workspaces.insert(Workspace {
            prev: Some(id),
            ..Workspace::new()
        });
        self.ws_mut(id).next = Some(new);

        debug!("appended staging workspace {:?}", new);
    }
}

/// Walks one client list from its head.
struct ListIter<'a> {
    clients: &'a SlotMap<ClientId, Client>,
    cur: Option<ClientId>,
}

impl Iterator for ListIter<'_> {
    type Item = ClientId;

    fn next(&mut self) -> Option<ClientId> {
        let id = self.cur?;
        self.cur = self.clients.get(id).and_then(|c| c.next);
        Some(id)
    }
}
