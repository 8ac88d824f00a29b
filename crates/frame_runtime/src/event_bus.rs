//! Typed synchronous pub/sub for frame lifecycle events.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    panic::{catch_unwind, AssertUnwindSafe},
    rc::{Rc, Weak},
};

use leptos::logging;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of events kept by [`EventHistory`].
pub const MAX_HISTORY_EVENTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Frame lifecycle event kinds.
pub enum FrameEventType {
    /// A handshake attempt started.
    FrameReady,
    /// The app was added to the user's host.
    FrameAdded,
    /// The app closed its frame.
    FrameRemoved,
    /// The host dropped a ready connection.
    ConnectionLost,
    /// The host acknowledged the app.
    ConnectionRestored,
    /// A handshake attempt failed.
    Error,
    /// The document became visible.
    Focus,
    /// The document became hidden.
    Blur,
    /// Document visibility changed.
    VisibilityChange,
}

impl FrameEventType {
    /// Every event type.
    pub const ALL: [Self; 9] = [
        Self::FrameReady,
        Self::FrameAdded,
        Self::FrameRemoved,
        Self::ConnectionLost,
        Self::ConnectionRestored,
        Self::Error,
        Self::Focus,
        Self::Blur,
        Self::VisibilityChange,
    ];

    /// Stable snake_case token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::FrameReady => "frame_ready",
            Self::FrameAdded => "frame_added",
            Self::FrameRemoved => "frame_removed",
            Self::ConnectionLost => "connection_lost",
            Self::ConnectionRestored => "connection_restored",
            Self::Error => "error",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::VisibilityChange => "visibility_change",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One published event.
pub struct FrameEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: FrameEventType,
    /// Publication time in unix milliseconds.
    pub timestamp_unix_ms: u64,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Event callback.
pub type FrameEventListener = Rc<dyn Fn(&FrameEvent)>;

struct ListenerEntry {
    id: u64,
    active: Rc<Cell<bool>>,
    listener: FrameEventListener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<FrameEventType, Vec<ListenerEntry>>,
}

impl Registry {
    fn remove(&mut self, event_type: FrameEventType, id: u64) {
        if let Some(listeners) = self.listeners.get_mut(&event_type) {
            listeners.retain(|entry| entry.id != id);
            if listeners.is_empty() {
                self.listeners.remove(&event_type);
            }
        }
    }
}

#[derive(Clone)]
/// Synchronous event bus.
///
/// Listeners run in subscription order on the publisher's stack. A listener subscribed from inside
/// a delivery first hears the next publication. A listener unsubscribed from inside a delivery is
/// skipped for the rest of it. Events are not replayed to late subscribers.
///
/// A panicking listener is logged and skipped on targets that unwind. `wasm32-unknown-unknown`
/// builds abort on panic, so browser listeners must not panic.
pub struct EventBus {
    registry: Rc<RefCell<Registry>>,
    clock: Rc<dyn Fn() -> u64>,
}

impl EventBus {
    /// Creates a bus that stamps events with `clock`.
    pub fn new(clock: impl Fn() -> u64 + 'static) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            clock: Rc::new(clock),
        }
    }

    /// Registers `listener` for `event_type`.
    pub fn subscribe(
        &self,
        event_type: FrameEventType,
        listener: impl Fn(&FrameEvent) + 'static,
    ) -> EventSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let active = Rc::new(Cell::new(true));
        registry
            .listeners
            .entry(event_type)
            .or_default()
            .push(ListenerEntry {
                id,
                active: active.clone(),
                listener: Rc::new(listener),
            });

        EventSubscription {
            registry: Rc::downgrade(&self.registry),
            event_type,
            id,
            active,
        }
    }

    /// Delivers a new event to every current listener of `event_type` and returns it.
    pub fn publish(&self, event_type: FrameEventType, data: Option<Value>) -> FrameEvent {
        let event = FrameEvent {
            event_type,
            timestamp_unix_ms: (self.clock)(),
            data,
        };
        let listeners: Vec<(Rc<Cell<bool>>, FrameEventListener)> = self
            .registry
            .borrow()
            .listeners
            .get(&event_type)
            .map(|listeners| {
                listeners
                    .iter()
                    .map(|entry| (entry.active.clone(), entry.listener.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (active, listener) in listeners {
            if !active.get() {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                logging::error!("event listener for `{}` panicked", event_type.token());
            }
        }
        event
    }

    /// Number of listeners registered for `event_type`.
    pub fn listener_count(&self, event_type: FrameEventType) -> usize {
        self.registry
            .borrow()
            .listeners
            .get(&event_type)
            .map_or(0, Vec::len)
    }

    /// Drops every listener, including the ones still waiting in an ongoing delivery.
    pub fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        for entry in registry.listeners.values().flatten() {
            entry.active.set(false);
        }
        registry.listeners.clear();
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Dropping the handle keeps the listener registered; call [`unsubscribe`](Self::unsubscribe).
pub struct EventSubscription {
    registry: Weak<RefCell<Registry>>,
    event_type: FrameEventType,
    id: u64,
    active: Rc<Cell<bool>>,
}

impl EventSubscription {
    /// Removes the listener. Further calls do nothing.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.event_type, self.id);
        }
    }

    /// Whether the listener is still registered through this handle.
    pub fn is_active(&self) -> bool {
        self.active.get() && self.registry.strong_count() > 0
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("event_type", &self.event_type)
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

/// Bounded diagnostic log of published events, oldest first.
pub struct EventHistory {
    events: Rc<RefCell<VecDeque<FrameEvent>>>,
    subscriptions: Vec<EventSubscription>,
}

impl EventHistory {
    /// Records events of `event_types` from `bus`, keeping at most `capacity`.
    pub fn attach(
        bus: &EventBus,
        event_types: impl IntoIterator<Item = FrameEventType>,
        capacity: usize,
    ) -> Self {
        let events = Rc::new(RefCell::new(VecDeque::new()));
        let subscriptions = event_types
            .into_iter()
            .map(|event_type| {
                let events = events.clone();
                bus.subscribe(event_type, move |event| {
                    let mut events = events.borrow_mut();
                    events.push_back(event.clone());
                    while events.len() > capacity {
                        events.pop_front();
                    }
                })
            })
            .collect();
        Self {
            events,
            subscriptions,
        }
    }

    /// Records every event type with the default capacity.
    pub fn attach_all(bus: &EventBus) -> Self {
        Self::attach(bus, FrameEventType::ALL, MAX_HISTORY_EVENTS)
    }

    /// Copies the recorded events.
    pub fn events(&self) -> Vec<FrameEvent> {
        self.events.borrow().iter().cloned().collect()
    }

    /// Recorded event types in order.
    pub fn event_types(&self) -> Vec<FrameEventType> {
        self.events
            .borrow()
            .iter()
            .map(|event| event.event_type)
            .collect()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Stops recording. Already recorded events stay available.
    pub fn detach(&self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}
