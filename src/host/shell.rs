//! Host tab/stack controller.
//!
//! The [`Shell`] owns every piece of host-side navigation state: the docked
//! tab registry, the full-screen presentation stack, chrome visibility, and
//! each live [`Screen`]'s gesture and lifecycle state.
//!
//! # Concurrency
//!
//! All mutation is serialized onto one spawned event-loop task — the host's
//! single UI-update path. Public methods and the signal receiver only ever
//! enqueue commands; signals arriving from transport tasks can never race a
//! concurrent screen transition. Commands are processed strictly in arrival
//! order; the only permitted drop is a duplicate close while a dismissal is
//! already in flight.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::ScreenId;
use crate::protocol::Signal;

use super::loader::{ContentLoader, LoadRequest, LoadedContent, NullLoader};
use super::receiver::SignalReceiver;
use super::screen::{NavigationPolicy, Screen, ScreenPhase, ScreenPresentation};

// ============================================================================
// Types
// ============================================================================

/// Callback invoked for `customMessage` payloads.
pub type CustomMessageHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Outcome of a native back action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The topmost full-screen screen began dismissal.
    Dismissing,
    /// Content is below its root; the platform glue should forward the back
    /// action into the embedded history instead.
    DelegatedToContent,
    /// Nothing to do (no full-screen screen, or dismissal already in flight).
    Ignored,
}

// ============================================================================
// ShellCommand
// ============================================================================

/// Commands processed by the shell event loop.
pub(crate) enum ShellCommand {
    /// Inbound signal from embedded content.
    Signal(Signal),
    /// Present embedded content full-screen over the tabs.
    Present {
        target: Url,
        reply: oneshot::Sender<ScreenId>,
    },
    /// Embed content inside the active tab.
    EmbedDocked {
        target: Url,
        reply: oneshot::Sender<ScreenId>,
    },
    /// Native back gesture/button on the host.
    NativeBack { reply: oneshot::Sender<BackAction> },
    /// Platform reports the dismissal transition finished.
    FinishTransition { screen_id: ScreenId },
    /// A content load task completed.
    LoadFinished {
        screen_id: ScreenId,
        result: Result<LoadedContent>,
    },
    /// Evaluate an embedded navigation request.
    EvaluateNavigation {
        screen_id: ScreenId,
        reply: oneshot::Sender<NavigationPolicy>,
    },
    /// Switch the active docked tab.
    SelectTab {
        index: usize,
        reply: oneshot::Sender<bool>,
    },
    /// Read a consistent snapshot of shell state.
    Snapshot { reply: oneshot::Sender<ShellSnapshot> },
    /// Stop the event loop.
    Shutdown,
}

// ============================================================================
// Snapshots
// ============================================================================

/// Point-in-time view of one screen, read through the event loop.
#[derive(Debug, Clone)]
pub struct ScreenSnapshot {
    /// Screen instance ID.
    pub id: ScreenId,
    /// Fixed presentation mode.
    pub presentation: ScreenPresentation,
    /// Current lifecycle phase.
    pub phase: ScreenPhase,
    /// Whether the native back/swipe gesture is enabled.
    pub gesture_enabled: bool,
    /// Whether content finished loading.
    pub loaded: bool,
}

/// Point-in-time view of the shell, read through the event loop.
#[derive(Debug, Clone)]
pub struct ShellSnapshot {
    /// Whether host chrome (tab bar et al.) is visible.
    pub chrome_visible: bool,
    /// Index of the active docked tab.
    pub active_tab: usize,
    /// Full-screen stack, bottom to top.
    pub stack: Vec<ScreenSnapshot>,
    /// Docked screens by tab index.
    pub docked: Vec<(usize, ScreenSnapshot)>,
}

impl ShellSnapshot {
    /// Returns the topmost full-screen screen, if any.
    #[must_use]
    pub fn top(&self) -> Option<&ScreenSnapshot> {
        self.stack.last()
    }
}

// ============================================================================
// ShellBuilder
// ============================================================================

/// Builder for [`Shell`] instances.
///
/// # Example
///
/// ```ignore
/// let shell = Shell::builder()
///     .tab("Manage")
///     .tab("Loyalty")
///     .loader(Arc::new(NullLoader))
///     .build()?;
/// ```
pub struct ShellBuilder {
    /// Docked tab titles, in bar order.
    tabs: Vec<String>,
    /// Content loader driven by the shell.
    loader: Arc<dyn ContentLoader>,
    /// Optional `customMessage` callback.
    on_custom: Option<CustomMessageHandler>,
}

impl ShellBuilder {
    /// Creates a builder with no tabs and the [`NullLoader`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            loader: Arc::new(NullLoader),
            on_custom: None,
        }
    }

    /// Adds a docked tab.
    #[must_use]
    pub fn tab(mut self, title: impl Into<String>) -> Self {
        self.tabs.push(title.into());
        self
    }

    /// Sets the content loader.
    #[must_use]
    pub fn loader(mut self, loader: Arc<dyn ContentLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Sets the `customMessage` callback.
    #[must_use]
    pub fn on_custom_message(mut self, handler: impl Fn(Value) + Send + Sync + 'static) -> Self {
        self.on_custom = Some(Box::new(handler));
        self
    }

    /// Builds the shell and spawns its event loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no tabs were configured.
    pub fn build(self) -> Result<Shell> {
        if self.tabs.is_empty() {
            return Err(Error::config("shell needs at least one tab"));
        }

        let (commands, rx) = mpsc::unbounded_channel();
        let state = ShellState {
            tabs: self.tabs,
            active_tab: 0,
            chrome_visible: true,
            screens: FxHashMap::default(),
            stack: Vec::new(),
            docked: FxHashMap::default(),
            loader: self.loader,
            on_custom: self.on_custom,
            commands: commands.clone(),
        };

        tokio::spawn(run_event_loop(state, rx));

        Ok(Shell { commands })
    }
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Shell
// ============================================================================

/// Handle to the host tab/stack controller.
///
/// Cheap to clone; all clones talk to the same event loop.
#[derive(Clone)]
pub struct Shell {
    /// Command channel into the event loop.
    commands: mpsc::UnboundedSender<ShellCommand>,
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell").finish_non_exhaustive()
    }
}

impl Shell {
    /// Returns a builder.
    #[must_use]
    pub fn builder() -> ShellBuilder {
        ShellBuilder::new()
    }

    /// Returns the signal receiver for this shell.
    ///
    /// The receiver is the single entry point for inbound content signals;
    /// it marshals everything onto the shell's event loop.
    #[must_use]
    pub fn receiver(&self) -> SignalReceiver {
        SignalReceiver::new(self.commands.clone())
    }

    /// Presents embedded content full-screen over the tabs.
    ///
    /// The screen starts with gesture enabled and chrome hidden; its content
    /// load begins immediately.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTarget`] if the target is not a valid URL
    /// - [`Error::ShellClosed`] if the shell has shut down
    pub async fn present_full_screen(&self, target: &str) -> Result<ScreenId> {
        let url = parse_target(target)?;
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::Present { target: url, reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Embeds content inside the active tab, replacing any previous embed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTarget`] if the target is not a valid URL
    /// - [`Error::ShellClosed`] if the shell has shut down
    pub async fn embed_docked(&self, target: &str) -> Result<ScreenId> {
        let url = parse_target(target)?;
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::EmbedDocked { target: url, reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Performs a native back action.
    ///
    /// Shares the dismissal code path with the `closeWebview` signal; the
    /// per-screen phase guard deduplicates simultaneous triggers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellClosed`] if the shell has shut down.
    pub async fn native_back(&self) -> Result<BackAction> {
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::NativeBack { reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Reports that the platform dismissal transition completed.
    ///
    /// The screen is torn down completely; re-entry always means a fresh
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellClosed`] if the shell has shut down.
    pub fn finish_transition(&self, screen_id: ScreenId) -> Result<()> {
        self.send(ShellCommand::FinishTransition { screen_id })
    }

    /// Evaluates an embedded navigation request for a screen.
    ///
    /// Returns [`NavigationPolicy::Cancel`] for unknown screens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellClosed`] if the shell has shut down.
    pub async fn evaluate_navigation(&self, screen_id: ScreenId) -> Result<NavigationPolicy> {
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::EvaluateNavigation { screen_id, reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Switches the active docked tab.
    ///
    /// Returns `false` when the index is out of range or a full-screen
    /// screen currently owns the display.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellClosed`] if the shell has shut down.
    pub async fn select_tab(&self, index: usize) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::SelectTab { index, reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Reads a consistent snapshot of shell state.
    ///
    /// The read goes through the event loop, so it observes every command
    /// enqueued before it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShellClosed`] if the shell has shut down.
    pub async fn snapshot(&self) -> Result<ShellSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(ShellCommand::Snapshot { reply })?;
        rx.await.map_err(|_| Error::ShellClosed)
    }

    /// Stops the event loop.
    ///
    /// All later commands fail with [`Error::ShellClosed`].
    pub fn shutdown(&self) {
        let _ = self.commands.send(ShellCommand::Shutdown);
    }

    /// Enqueues a command, mapping a dead loop to [`Error::ShellClosed`].
    fn send(&self, command: ShellCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::ShellClosed)
    }
}

/// Parses a launch target string.
fn parse_target(target: &str) -> Result<Url> {
    Url::parse(target).map_err(|e| Error::invalid_target(target, e.to_string()))
}

// ============================================================================
// Event Loop
// ============================================================================

/// State owned exclusively by the event-loop task.
struct ShellState {
    /// Docked tab titles.
    tabs: Vec<String>,
    /// Active docked tab index.
    active_tab: usize,
    /// Whether host chrome is visible.
    chrome_visible: bool,
    /// Every live screen by ID.
    screens: FxHashMap<ScreenId, Screen>,
    /// Full-screen presentation stack, bottom to top.
    stack: Vec<ScreenId>,
    /// Docked screen per tab index.
    docked: FxHashMap<usize, ScreenId>,
    /// Content loader.
    loader: Arc<dyn ContentLoader>,
    /// Optional `customMessage` callback.
    on_custom: Option<CustomMessageHandler>,
    /// Loop's own command sender, handed to load tasks.
    commands: mpsc::UnboundedSender<ShellCommand>,
}

/// Processes commands until shutdown.
async fn run_event_loop(mut state: ShellState, mut rx: mpsc::UnboundedReceiver<ShellCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            ShellCommand::Signal(signal) => state.handle_signal(signal),

            ShellCommand::Present { target, reply } => {
                let _ = reply.send(state.present(target));
            }

            ShellCommand::EmbedDocked { target, reply } => {
                let _ = reply.send(state.embed_docked(target));
            }

            ShellCommand::NativeBack { reply } => {
                let _ = reply.send(state.native_back());
            }

            ShellCommand::FinishTransition { screen_id } => state.finish_transition(screen_id),

            ShellCommand::LoadFinished { screen_id, result } => {
                state.load_finished(screen_id, result);
            }

            ShellCommand::EvaluateNavigation { screen_id, reply } => {
                let policy = state
                    .screens
                    .get(&screen_id)
                    .map_or(NavigationPolicy::Cancel, Screen::navigation_policy);
                let _ = reply.send(policy);
            }

            ShellCommand::SelectTab { index, reply } => {
                let _ = reply.send(state.select_tab(index));
            }

            ShellCommand::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }

            ShellCommand::Shutdown => {
                debug!("Shutdown command received");
                break;
            }
        }
    }

    debug!("Shell event loop terminated");
}

// ============================================================================
// ShellState - Signal Handling
// ============================================================================

impl ShellState {
    /// Applies one inbound signal, in arrival order.
    fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::EnableSwipeBack => self.apply_gesture(true),
            Signal::DisableSwipeBack => self.apply_gesture(false),
            Signal::Close => self.handle_close(),
            Signal::Custom(value) => {
                if let Some(ref handler) = self.on_custom {
                    handler(value);
                } else {
                    debug!("customMessage with no handler; dropped");
                }
            }
        }
    }

    /// Sets the gesture state of the topmost screen.
    fn apply_gesture(&mut self, enabled: bool) {
        let Some(screen_id) = self.topmost() else {
            debug!(enabled, "Gesture signal with no live screen; dropped");
            return;
        };
        if let Some(screen) = self.screens.get_mut(&screen_id)
            && screen.set_gesture(enabled)
        {
            debug!(screen_id = %screen_id, enabled, "Gesture state set");
        }
    }

    /// Handles a `closeWebview` signal.
    fn handle_close(&mut self) {
        let Some(screen_id) = self.topmost() else {
            debug!("Close signal with no live screen; dropped");
            return;
        };

        let Some(screen) = self.screens.get(&screen_id) else {
            return;
        };
        if screen.presentation != ScreenPresentation::FullScreen {
            debug!(screen_id = %screen_id, "Close signal from docked screen ignored");
            return;
        }

        if !self.begin_dismissal(screen_id) {
            debug!(screen_id = %screen_id, "Duplicate close dropped; dismissal in flight");
        }
    }

    /// Returns the screen that signals currently target: top of the stack,
    /// or the active tab's docked screen.
    fn topmost(&self) -> Option<ScreenId> {
        self.stack
            .last()
            .copied()
            .or_else(|| self.docked.get(&self.active_tab).copied())
    }
}

// ============================================================================
// ShellState - Lifecycle
// ============================================================================

impl ShellState {
    /// Launches embedded content full-screen: `Docked → FullScreenActive`.
    fn present(&mut self, target: Url) -> ScreenId {
        let screen_id = ScreenId::generate();
        let mut screen = Screen::full_screen(screen_id, target.clone());

        self.spawn_load(&mut screen, target.clone());
        self.screens.insert(screen_id, screen);
        self.stack.push(screen_id);
        self.chrome_visible = false;

        info!(screen_id = %screen_id, target = %target, "Full-screen content presented");
        screen_id
    }

    /// Embeds content inside the active tab, tearing down any previous embed.
    fn embed_docked(&mut self, target: Url) -> ScreenId {
        if let Some(old) = self.docked.remove(&self.active_tab)
            && self.screens.remove(&old).is_some()
        {
            debug!(screen_id = %old, "Previous docked screen torn down");
        }

        let screen_id = ScreenId::generate();
        let mut screen = Screen::docked(screen_id, target.clone());

        self.spawn_load(&mut screen, target.clone());
        self.screens.insert(screen_id, screen);
        self.docked.insert(self.active_tab, screen_id);

        info!(screen_id = %screen_id, tab = self.active_tab, target = %target, "Docked content embedded");
        screen_id
    }

    /// Spawns the content load task for a screen.
    fn spawn_load(&self, screen: &mut Screen, url: Url) {
        let loader = Arc::clone(&self.loader);
        let commands = self.commands.clone();
        let screen_id = screen.id;

        let handle = tokio::spawn(async move {
            let result = loader.load(LoadRequest { screen_id, url }).await;
            let _ = commands.send(ShellCommand::LoadFinished { screen_id, result });
        });

        screen.attach_load(handle);
    }

    /// Begins dismissal of a full-screen screen.
    ///
    /// Single code path shared by the close signal and the native back
    /// action; the per-screen phase guard makes it fire at most once.
    fn begin_dismissal(&mut self, screen_id: ScreenId) -> bool {
        let Some(screen) = self.screens.get_mut(&screen_id) else {
            return false;
        };
        if !screen.begin_leaving() {
            return false;
        }

        self.chrome_visible = true;
        info!(screen_id = %screen_id, "Screen dismissal started; chrome restored");
        true
    }

    /// Resolves a native back action.
    fn native_back(&mut self) -> BackAction {
        let Some(&screen_id) = self.stack.last() else {
            return BackAction::Ignored;
        };
        let Some((phase, gesture_enabled)) = self
            .screens
            .get(&screen_id)
            .map(|s| (s.phase, s.gesture_enabled))
        else {
            return BackAction::Ignored;
        };

        match phase {
            ScreenPhase::FullScreenActive if gesture_enabled => {
                if self.begin_dismissal(screen_id) {
                    BackAction::Dismissing
                } else {
                    BackAction::Ignored
                }
            }
            // Content is below its root: back belongs to the embedded
            // history, mirroring the hardware-back behavior of the hosts.
            ScreenPhase::FullScreenActive => BackAction::DelegatedToContent,
            _ => BackAction::Ignored,
        }
    }

    /// Completes dismissal once the platform transition has finished.
    fn finish_transition(&mut self, screen_id: ScreenId) {
        let Some(screen) = self.screens.get_mut(&screen_id) else {
            debug!(screen_id = %screen_id, "Transition finish for unknown screen; dropped");
            return;
        };
        if !screen.finish_dismissal() {
            debug!(screen_id = %screen_id, "Transition finish out of phase; dropped");
            return;
        }

        self.stack.retain(|id| *id != screen_id);
        self.screens.remove(&screen_id);
        info!(screen_id = %screen_id, "Screen dismissed and torn down");
    }

    /// Records a content load result.
    fn load_finished(&mut self, screen_id: ScreenId, result: Result<LoadedContent>) {
        let Some(screen) = self.screens.get_mut(&screen_id) else {
            debug!(screen_id = %screen_id, "Load result for dead screen discarded");
            return;
        };
        if !screen.accepts_signals() {
            // The screen began leaving; a finished load must never re-show
            // content.
            debug!(screen_id = %screen_id, "Load result for leaving screen discarded");
            return;
        }

        match result {
            Ok(content) => {
                screen.loaded = true;
                info!(screen_id = %screen_id, url = %content.final_url, "Content loaded");
            }
            Err(e) => {
                // Passive report only; reload is user-initiated.
                warn!(screen_id = %screen_id, error = %e, "Content load failed");
            }
        }
    }

    /// Switches the active docked tab.
    fn select_tab(&mut self, index: usize) -> bool {
        if !self.stack.is_empty() {
            debug!(index, "Tab switch rejected while full-screen content is up");
            return false;
        }
        if index >= self.tabs.len() {
            debug!(index, "Tab switch rejected; index out of range");
            return false;
        }
        self.active_tab = index;
        debug!(index, tab = %self.tabs[index], "Tab selected");
        true
    }

    /// Builds a snapshot of current state.
    fn snapshot(&self) -> ShellSnapshot {
        let snap = |screen: &Screen| ScreenSnapshot {
            id: screen.id,
            presentation: screen.presentation,
            phase: screen.phase,
            gesture_enabled: screen.gesture_enabled,
            loaded: screen.loaded,
        };

        ShellSnapshot {
            chrome_visible: self.chrome_visible,
            active_tab: self.active_tab,
            stack: self
                .stack
                .iter()
                .filter_map(|id| self.screens.get(id))
                .map(snap)
                .collect(),
            docked: self
                .docked
                .iter()
                .filter_map(|(tab, id)| self.screens.get(id).map(|s| (*tab, snap(s))))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
