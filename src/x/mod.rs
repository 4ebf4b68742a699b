//! Types and traits providing a unified interface with the X server.
//!
//! This module provides tsukiwm's main interface to the X server.
//! The core of this module is the `XConn` trait, which combines
//! [`XCore`], the requests the window manager issues, with
//! [`Renderer`], the text drawing used by the bar. For a concrete
//! implementation, see the [`x11rb`](self::x11rb) submodule.
//!
//! ## Connection Object Initialization
//!
//! `X11RBConn` has two states: unitialized, and initialized, marked
//! in its type constructor. An uninitialized connection has only
//! established a connection to the server and has not yet loaded the
//! font and keyboard mapping it needs. `XConn` is only implemented for
//! initialized connections, so users will have to call the `init`
//! method for a connection object to be usable.

pub mod core;
pub mod cursor;
pub mod event;
pub mod input;
pub mod render;

/// Implementation of `XConn` backed by the `x11rb` library.
pub mod x11rb;

#[doc(inline)]
pub use self::core::{CursorID, Result, WindowAttributes, XConn, XCore, XError, XWindowID};
#[doc(inline)]
pub use event::XEvent;
#[doc(inline)]
pub use render::{Renderer, TextExtents};

#[doc(inline)]
pub use self::x11rb::X11RBConn;
#[doc(inline)]
pub use status::ConnStatus;
pub(crate) use status::{Initialized, Uninitialized};

/* the dummy connection is used for testing higher-level
code and does not interact with an actual X server */
#[cfg(test)]
pub(crate) mod dummy;

pub mod status {
    //! Types for representing connection status.
    //!
    //! This module contains the [`ConnStatus`] sealed trait,
    //! as well as its two implementors, [`Initialized`] and
    //! [`Uninitialized`]. These are used to mark the state of
    //! the connection object, and act as guards to only
    //! expose [`XConn`](crate::x::XConn) methods when safe
    //! to do so.
    mod private {
        pub trait Sealed {}
    }

    /// A trait defining marker types `Unitialized` and `Initialized`.
    pub trait ConnStatus: private::Sealed {}

    /// A marker struct indicating a connection is uninitialized.
    ///
    /// Uninitialized connections do not expose any methods.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Uninitialized;

    impl ConnStatus for Uninitialized {}
    impl private::Sealed for Uninitialized {}

    /// A marker type indicating a connection is initialized and can be used.
    ///
    /// Initialized connections expose all available methods.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Initialized;

    impl ConnStatus for Initialized {}
    impl private::Sealed for Initialized {}
}
