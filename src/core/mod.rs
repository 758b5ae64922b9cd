//! Core window manager state and the main event loop
use crate::{
    pure::{geometry::Rect, Registry},
    x::{MapState, XConn, XEvent},
    Result,
};
use nix::sys::signal::{signal, SigHandler, Signal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

pub mod actions;
pub mod bindings;
pub mod config;
pub mod drag;
pub mod focus;
pub mod handle;
pub mod maximize;
pub mod workspace;

pub use config::Config;
pub use drag::Drag;

/// The mutable state of a running window manager.
///
/// All event handlers operate on a `State` along with an [XConn]: nothing else is shared
/// between them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct State {
    /// The user provided configuration
    pub config: Config,
    /// The clients of every workspace
    pub registry: Registry,
    /// Index of the workspace currently on screen
    pub current: usize,
    /// The pointer drag in progress, if any
    pub drag: Drag,
    /// The area available for placing clients
    pub screen: Rect,
    /// Cleared to stop the event loop once the current event has been handled
    pub running: bool,
}

impl State {
    /// Create the initial state for a screen of the given size, showing the first workspace.
    pub fn new(config: Config, screen: Rect) -> Self {
        let registry = Registry::new(config.workspaces);

        Self {
            config,
            registry,
            current: 0,
            drag: Drag::Idle,
            screen,
            running: false,
        }
    }
}

/// A top level struct holding all of the state required to run as an X11 window manager.
#[derive(Debug)]
pub struct WindowManager<X>
where
    X: XConn,
{
    x: X,
    /// The mutable state of the window manager
    pub state: State,
}

impl<X> WindowManager<X>
where
    X: XConn,
{
    /// Construct a new [WindowManager] with the provided config and X connection.
    ///
    /// The config is validated before anything else is done.
    pub fn new(config: Config, x: X) -> Result<Self> {
        config.validate()?;
        let screen = x.screen_size()?;
        debug!(?screen, workspaces = config.workspaces, "initialising state");

        Ok(Self {
            x,
            state: State::new(config, screen),
        })
    }

    /// The X connection being used by this window manager
    pub fn conn(&self) -> &X {
        &self.x
    }

    /// Start the WindowManager and run it until told to exit.
    ///
    /// Any existing windows that are visible and have not asked to bypass the window manager
    /// are adopted onto the first workspace before the main event loop begins. Errors from
    /// handling individual events are logged and do not stop the event loop: only a failure to
    /// read the next event from the X server does.
    pub fn run(mut self) -> Result<()> {
        // ignore SIGCHLD so that spawned programs are reaped by init
        trace!("ignoring SIGCHLD");
        // SAFETY: SigIgn installs no handler code so there is nothing to be async-signal-safe
        if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            warn!(%e, "unable to ignore SIGCHLD: spawned programs will not be reaped");
        }

        let keys: Vec<_> = self.state.config.key_bindings.iter().map(|b| b.key).collect();
        self.x.grab_keys(&keys)?;
        self.adopt_existing_clients()?;
        self.x.flush();

        info!("entering main event loop");
        self.state.running = true;
        while self.state.running {
            let event = self.x.next_event()?;
            self.handle_xevent(event);
            self.x.flush();
        }

        info!("exiting");
        Ok(())
    }

    fn adopt_existing_clients(&mut self) -> Result<()> {
        for id in self.x.existing_clients()? {
            let attrs = match self.x.get_window_attributes(id) {
                Ok(attrs) => attrs,
                Err(e) => {
                    debug!(%id, %e, "unable to read attributes of existing window");
                    continue;
                }
            };

            if attrs.override_redirect || attrs.map_state != MapState::Viewable {
                trace!(%id, ?attrs, "skipping existing window");
                continue;
            }

            info!(%id, "adopting existing client");
            handle::manage(id, &mut self.state, &self.x)?;
        }

        Ok(())
    }

    /// Process a single event, logging any error returned by its handler.
    pub fn handle_xevent(&mut self, event: XEvent) {
        use XEvent::*;

        let (state, x) = (&mut self.state, &self.x);

        let res = match &event {
            KeyPress(k) => handle::keypress(*k, state, x),
            ButtonPress(e) => handle::button_press(e, state, x),
            ButtonRelease(_) => drag::release(state, x),
            MotionNotify(e) => drag::motion(e.root, state, x),
            MapRequest(id) => handle::map_request(*id, state, x),
            Destroy(id) => handle::destroy(*id, state, x),
            UnmapNotify(e) => handle::unmap_notify(e, state, x),
            ConfigureRequest(e) => handle::configure_request(e, state, x),
            Unhandled { code } => {
                trace!(code, "ignoring unhandled event");
                Ok(())
            }
        };

        if let Err(e) = res {
            error!(%e, ?event, "error handling event");
        }
    }
}
