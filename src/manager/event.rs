use tracing::{debug, trace};

use super::bar::BarAction;
use super::WmState;
use crate::bindings::KeyAction;
use crate::x::{
    event::{ButtonEvent, ConfigureRequestData, PropertyEvent},
    XEvent, XWindowID,
};

/// Actions that should be taken by the `WindowManager`.
///
/// These are translated within the `WindowManager` from
/// [`XEvent`]s that no modal state has claimed.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    /// Map the specified client and manage it.
    MapTrackedClient(XWindowID),
    /// Forget the specified client, its window is gone.
    DestroyClient(XWindowID),
    /// Re-read the status string from the root window.
    UpdateStatus,
    /// Change the WM_NAME property of the specified client.
    ClientNameChange(XWindowID),
    /// Apply a configure request to a floating client.
    ConfigureClient(ConfigureRequestData),
    /// Repaint the bar.
    RedrawBar,
    /// Run the action under a click on the bar.
    RunBarAction(BarAction),
    /// Focus the specified client, then let the click through to it.
    ClientFocus(XWindowID),
    /// Run the specified key binding.
    RunKeybind(KeyAction),
}

impl EventAction {
    pub(crate) fn from_xevent(event: XEvent, state: WmState<'_>) -> Option<Vec<EventAction>> {
        use EventAction::*;
        use XEvent::*;

        match event {
            MapRequest(id, override_redirect) => {
                if override_redirect {
                    trace!("window {} is override-redirect, not managing", id);
                    None
                } else if state.desktop.is_managed(id) || state.is_wm_window(id) {
                    debug!("window {} is already managed", id);
                    None
                } else {
                    Some(vec![MapTrackedClient(id)])
                }
            }
            DestroyNotify(id) => {
                if state.desktop.is_managed(id) {
                    Some(vec![DestroyClient(id)])
                } else {
                    None
                }
            }
            PropertyNotify(event) => process_property_notify(event, state),
            ConfigureRequest(data) => process_configure_request(data, state),
            Expose(id) => {
                if id == state.bar {
                    Some(vec![RedrawBar])
                } else {
                    None
                }
            }
            ButtonPress(event) => process_button_press(event, state),
            KeyPress(event) => state
                .keybinds
                .lookup(event)
                .map(|action| vec![RunKeybind(action)]),
            Error(e) => {
                debug!("ignoring X error: {}", e);
                None
            }
            MotionNotify(_) => None,
            Unknown(ev) => {
                trace!("unhandled event: {}", ev);
                None
            }
        }
    }
}

fn process_property_notify(event: PropertyEvent, state: WmState<'_>) -> Option<Vec<EventAction>> {
    trace!("property {} changed on window {}", event.atom, event.id);

    if event.is_root {
        Some(vec![EventAction::UpdateStatus])
    } else {
        state
            .lookup_client(event.id)
            .map(|c| vec![EventAction::ClientNameChange(c.id())])
    }
}

fn process_configure_request(
    data: ConfigureRequestData,
    state: WmState<'_>,
) -> Option<Vec<EventAction>> {
    match state.desktop.locate(data.id) {
        Some(found) if found.is_floating() => Some(vec![EventAction::ConfigureClient(data)]),
        Some(_) => {
            debug!("ignoring configure request for tiled window {}", data.id);
            None
        }
        None => {
            trace!("ignoring configure request for unmanaged window {}", data.id);
            None
        }
    }
}

fn process_button_press(event: ButtonEvent, state: WmState<'_>) -> Option<Vec<EventAction>> {
    if event.id == state.bar {
        return state
            .hotspots
            .hit(event.rel.x, event.button)
            .map(|action| vec![EventAction::RunBarAction(action)])
    }

    state
        .desktop
        .locate(event.id)
        .and_then(|found| found.workspace())
        .map(|_| vec![EventAction::ClientFocus(event.id)])
}
