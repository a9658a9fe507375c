//! Async driver that runs a hook against a transport on one task.
//!
//! The hook itself is a synchronous state machine. The driver owns it together
//! with its render tree, feeds it commands from the host, delivers requests
//! through the transport without blocking the loop, routes replies back and
//! keeps the hook's timer queue in step with wall time. Everything runs on a
//! single task, so hook state is never touched concurrently.

use reorder_dom::ListDom;
use reorder_types::{ItemId, MoveId};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::behavior::ReorderBehavior;
use crate::drag::{DragEnd, DragStart};
use crate::error::{HookError, HookResult};
use crate::hook::{ReorderHook, SettleOutcome};
use crate::protocol::{ReorderRequest, Reply, Signal};
use crate::transport::ReorderTransport;

/// Capacity of the host command channel.
pub const COMMAND_BUFFER: usize = 64;

/// Input from the host page.
#[derive(Debug, Clone)]
pub enum HookCommand {
    DragStart(DragStart),
    DragEnd(DragEnd),
    /// A named inbound event from the server or transport.
    Event { name: String, payload: Value },
    /// Destroy the hook and stop the driver.
    Shutdown,
}

/// What the driver did, for observers.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    RequestSent(ReorderRequest),
    Settled(SettleOutcome),
    /// The dragged item was deleted and its gesture abandoned.
    Cancelled(ItemId),
    ConnectivityChanged { online: bool },
}

/// The host's end of a running driver.
pub struct DriverHandle {
    commands: mpsc::Sender<HookCommand>,
    events: mpsc::UnboundedReceiver<HookEvent>,
}

impl DriverHandle {
    /// Sends a command to the driver.
    pub async fn send(&self, command: HookCommand) -> HookResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HookError::ChannelClosed)
    }

    /// Sends an inbound event.
    pub async fn event(&self, name: impl Into<String>, payload: Value) -> HookResult<()> {
        self.send(HookCommand::Event {
            name: name.into(),
            payload,
        })
        .await
    }

    /// Asks the driver to stop.
    pub async fn shutdown(&self) -> HookResult<()> {
        self.send(HookCommand::Shutdown).await
    }

    /// Waits for the next driver event. Returns `None` once the driver stopped.
    pub async fn next_event(&mut self) -> Option<HookEvent> {
        self.events.recv().await
    }
}

/// Owns a hook and its render tree and runs them until shutdown.
pub struct HookDriver<B: ReorderBehavior, D: ListDom + Send> {
    hook: ReorderHook<B>,
    dom: D,
    transport: Arc<dyn ReorderTransport>,
    commands: mpsc::Receiver<HookCommand>,
    events: mpsc::UnboundedSender<HookEvent>,
    in_flight: JoinSet<(MoveId, HookResult<Value>)>,
}

impl<B, D> HookDriver<B, D>
where
    B: ReorderBehavior + 'static,
    D: ListDom + Send + 'static,
{
    /// Creates a driver and the handle used to feed it.
    pub fn new(
        hook: ReorderHook<B>,
        dom: D,
        transport: Arc<dyn ReorderTransport>,
    ) -> (Self, DriverHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let driver = Self {
            hook,
            dom,
            transport,
            commands: command_rx,
            events: event_tx,
            in_flight: JoinSet::new(),
        };
        let handle = DriverHandle {
            commands: command_tx,
            events: event_rx,
        };
        (driver, handle)
    }

    /// Runs until a `Shutdown` command arrives or every handle is dropped,
    /// then destroys the hook and returns it with its render tree. Replies
    /// still in flight are abandoned.
    pub async fn run(mut self) -> (ReorderHook<B>, D) {
        let mut last_tick = Instant::now();
        loop {
            let deadline = self.hook.next_deadline();
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(HookCommand::Shutdown) => break,
                    Some(command) => self.handle_command(command),
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok((move_id, result)) => self.handle_reply(move_id, result),
                        Err(e) => warn!("Reorder delivery task failed: {}", e),
                    }
                }
                _ = tokio::time::sleep(deadline.unwrap_or_default()), if deadline.is_some() => {}
            }
            let now = Instant::now();
            self.hook.advance(&mut self.dom, now - last_tick);
            last_tick = now;
        }

        self.in_flight.abort_all();
        self.hook.destroy(&mut self.dom);
        info!("Reorder driver for {} stopped", self.hook.root());
        (self.hook, self.dom)
    }

    fn handle_command(&mut self, command: HookCommand) {
        match command {
            HookCommand::DragStart(evt) => self.hook.drag_started(&mut self.dom, &evt),
            HookCommand::DragEnd(evt) => {
                if let Some(request) = self.hook.drag_ended(&mut self.dom, &evt) {
                    self.deliver(request);
                }
            }
            HookCommand::Event { name, payload } => self.handle_event(&name, &payload),
            HookCommand::Shutdown => {}
        }
    }

    fn deliver(&mut self, request: ReorderRequest) {
        self.emit(HookEvent::RequestSent(request.clone()));
        let transport = Arc::clone(&self.transport);
        let move_id = request.move_id;
        self.in_flight
            .spawn(async move { (move_id, transport.push(request).await) });
        debug!("Reorder {} handed to transport", move_id);
    }

    fn handle_reply(&mut self, move_id: MoveId, result: HookResult<Value>) {
        let reply = match result {
            Ok(value) => Reply::from_value(&value),
            Err(e) => {
                warn!("Reorder {} not delivered: {}", move_id, e);
                Reply::error(e.to_string())
            }
        };
        let outcome = self.hook.settle(&mut self.dom, move_id, &reply);
        self.emit(HookEvent::Settled(outcome));
    }

    fn handle_event(&mut self, name: &str, payload: &Value) {
        let Some(signal) = Signal::from_event(self.hook.config(), name, payload) else {
            debug!("Ignoring event {:?}", name);
            return;
        };
        let applied = self.hook.apply_signal(&mut self.dom, &signal);
        match signal {
            Signal::Disconnected => self.emit(HookEvent::ConnectivityChanged { online: false }),
            Signal::Reconnected => self.emit(HookEvent::ConnectivityChanged { online: true }),
            Signal::ItemDeleted(id) if applied => self.emit(HookEvent::Cancelled(id)),
            Signal::ItemDeleted(id) => debug!("Deleted item {} was not being dragged", id),
        }
    }

    fn emit(&self, event: HookEvent) {
        // Observers are optional.
        let _ = self.events.send(event);
    }
}
