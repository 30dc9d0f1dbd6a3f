#![forbid(unsafe_code)]

//! Operation dispatcher and animation sequencing.
//!
//! The [`Dispatcher`] owns the stack, the renderer, and the operation state,
//! and guarantees that at most one animated operation is in flight.
//!
//! # State machine
//!
//! Two independent axes: `Idle`/`Animating` and `Closed`/`Open`, starting
//! at `Idle, Closed`.
//!
//! ```text
//! dispatch(req) ── Animating? ──yes──> queue (or reject if full)
//!       │no
//!       ▼
//!   Open? ──yes──> close phase ──all settled──> action phases ──> Finish
//!       │no                                          ▲
//!       └────────────────────────────────────────────┘
//! ```
//!
//! Each phase arms a [`CompletionBatch`]. Items whose style change starts a
//! transition register a wait; the host resolves it with
//! [`Dispatcher::transition_end`], or [`Dispatcher::tick`] resolves it once
//! its deadline passes. Items that will not animate settle on the spot.
//! When a batch is complete the next phase runs; after the last one the
//! stack is normalized, the state goes back to `Idle`, the ticket resolves,
//! and the next queued request starts.
//!
//! # Failure Modes
//!
//! - A host that never signals: every wait expires after the transition's
//!   expected length plus `completion_timeout_ms`; the operation completes
//!   with `degraded = true`.
//! - Stray signals (no pending wait for that item) are ignored.
//! - Unknown item handles are ignored.

use std::collections::VecDeque;
use std::fmt;

use baraja_core::{
    BarajaOptions, Easing, FanSettings, InitializationError, ItemId, RandomScatter,
    ResolvedFanSettings, ScatterSource, Stack, StepDirection, StylePatch, Transform,
    TransformOrigin, Transition, TransitionProperty, compute_layout,
};
use tracing::{debug, debug_span, trace, warn};
use web_time::Duration;

use crate::completion::{self, CompletionBatch, OperationKind, Ticket, TicketSender};
use crate::config::{BarajaConfig, DispatchConfig};
use crate::host::{ElementSource, Renderer};
use crate::stage::Stage;
use crate::waits::{WaitKey, WaitTable};

/// Rotation applied to a card sliding off during navigation.
const NAV_ROTATION_DEG: f64 = 5.0;
/// Extra travel beyond the card width during navigation.
const NAV_GAP_PX: f64 = 15.0;
/// Where a card brought to the front starts from.
const FRONT_ENTRY: Transform = Transform::scaled(2.0, 100.0, 20.0);
/// Where an appended card starts from.
const ADD_ENTRY: Transform = Transform::scaled(1.8, 200.0, 15.0);
const ADD_DURATION: Duration = Duration::from_millis(500);
const ADD_STAGGER: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A request for one animated operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// Spread the fan; `None` uses the configured defaults.
    Fan(Option<FanSettings>),
    Close,
    Next,
    Previous,
    /// Bring an item to the top of the stack.
    Front(ItemId),
    /// Append markup to the container and animate the new items in.
    Add(String),
}

impl Request {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Fan(_) => OperationKind::Fan,
            Self::Close => OperationKind::Close,
            Self::Next => OperationKind::Next,
            Self::Previous => OperationKind::Previous,
            Self::Front(_) => OperationKind::Front,
            Self::Add(_) => OperationKind::Add,
        }
    }
}

/// What happened to a request.
#[derive(Debug)]
pub enum Dispatch {
    /// The operation started now.
    Started(Ticket),
    /// The operation will start after the ones ahead of it.
    Queued(Ticket),
    /// Nothing to do (item already on top, or unknown item).
    Ignored,
    /// Refused while animating.
    Rejected,
}

impl Dispatch {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            Self::Started(t) | Self::Queued(t) => Some(t),
            Self::Ignored | Self::Rejected => None,
        }
    }

    pub fn into_ticket(self) -> Option<Ticket> {
        match self {
            Self::Started(t) | Self::Queued(t) => Some(t),
            Self::Ignored | Self::Rejected => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.ticket().is_some()
    }
}

/// Closed/open and idle/animating flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationState {
    pub is_closed: bool,
    pub is_animating: bool,
}

impl Default for OperationState {
    fn default() -> Self {
        Self {
            is_closed: true,
            is_animating: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal sequencing types
// ---------------------------------------------------------------------------

/// What to do when a wait resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    /// Count towards the current batch.
    Plain,
    /// A closing item: clear its transition, recenter its origin, count.
    Closed(ItemId),
    /// An appended item: clear its transition, count.
    ClearTransition(ItemId),
    /// Timer: start the restore transition of a card brought to the front.
    RestoreFront(ItemId),
}

/// Phase to run once the current batch completes.
#[derive(Debug, Clone, PartialEq)]
enum Then {
    Finish,
    /// The close that preceded a request is done; run the request.
    Run(Request),
    /// A navigated card is off to the side; restack it and bring it back.
    NavigateReturn {
        item: ItemId,
        direction: StepDirection,
    },
}

#[derive(Debug)]
struct InFlight {
    sender: TicketSender,
    batch: CompletionBatch,
    then: Then,
    degraded: bool,
    /// Nothing was animated; leave the open/closed flag as it was.
    untouched: bool,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Serializes operations over one stack and drives the renderer.
pub struct Dispatcher<S, R> {
    stack: Stack,
    source: S,
    stage: Stage<R>,
    options: BarajaOptions,
    fan_defaults: ResolvedFanSettings,
    config: DispatchConfig,
    scatter: Box<dyn ScatterSource>,
    state: OperationState,
    now: Duration,
    waits: WaitTable<Settle>,
    in_flight: Option<InFlight>,
    queue: VecDeque<(Request, TicketSender)>,
}

impl<S, R> fmt::Debug for Dispatcher<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("stack", &self.stack)
            .field("state", &self.state)
            .field("now", &self.now)
            .field("pending_waits", &self.waits.len())
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl<S: ElementSource, R: Renderer> Dispatcher<S, R> {
    /// Build a dispatcher over the source's current items.
    pub fn new(source: S, renderer: R, options: BarajaOptions) -> Result<Self, InitializationError> {
        let config = BarajaConfig {
            options,
            ..BarajaConfig::default()
        };
        Self::with_config(source, renderer, config)
    }

    /// Build a dispatcher with full configuration.
    pub fn with_config(
        source: S,
        renderer: R,
        config: BarajaConfig,
    ) -> Result<Self, InitializationError> {
        let items = source.items();
        let stack = Stack::new(&items, config.dispatch.z_index_min)?;
        let mut stage = Stage::new(renderer);
        stage.sync_z(&stack);
        debug!(items = stack.len(), "baraja initialized");

        Ok(Self {
            stack,
            source,
            stage,
            options: config.options,
            fan_defaults: config.fan,
            config: config.dispatch,
            scatter: Box::new(RandomScatter::new()),
            state: OperationState::default(),
            now: Duration::ZERO,
            waits: WaitTable::new(),
            in_flight: None,
            queue: VecDeque::new(),
        })
    }

    /// Replace the scatter random source.
    pub fn set_scatter(&mut self, scatter: impl ScatterSource + 'static) {
        self.scatter = Box::new(scatter);
    }

    // -- Accessors -----------------------------------------------------------

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn options(&self) -> &BarajaOptions {
        &self.options
    }

    pub fn fan_defaults(&self) -> &ResolvedFanSettings {
        &self.fan_defaults
    }

    /// Virtual clock, advanced only by [`tick`](Self::tick).
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn stage(&self) -> &Stage<R> {
        &self.stage
    }

    pub fn renderer(&self) -> &R {
        self.stage.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.stage.renderer_mut()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Items the dispatcher expects a transition-end signal from.
    pub fn pending_transitions(&self) -> Vec<ItemId> {
        self.waits.transition_items()
    }

    /// Earliest pending deadline (timer or timeout).
    pub fn next_deadline(&self) -> Option<Duration> {
        self.waits.next_deadline()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    // -- Requests ------------------------------------------------------------

    /// Start, queue, or refuse `request`.
    pub fn dispatch(&mut self, request: Request) -> Dispatch {
        let kind = request.kind();
        let _span = debug_span!("baraja.dispatch", op = %kind).entered();

        if self.state.is_animating {
            // Unreachable while `Stack` requires two items; single-item decks reject.
            if self.stack.len() <= 1 {
                debug!("rejected while animating");
                return Dispatch::Rejected;
            }
            if self.queue.len() >= self.config.max_queued {
                warn!(queued = self.queue.len(), "dispatch queue full, dropping request");
                return Dispatch::Rejected;
            }
            let (sender, ticket) = completion::ticket(kind);
            self.queue.push_back((request, sender));
            debug!(queued = self.queue.len(), "queued behind in-flight operation");
            return Dispatch::Queued(ticket);
        }

        if let Request::Front(item) = request {
            if !self.stack.contains(item) {
                debug!(%item, "unknown item");
                return Dispatch::Ignored;
            }
            if self.stack.top() == item {
                debug!(%item, "already on top");
                return Dispatch::Ignored;
            }
        }

        let (sender, ticket) = completion::ticket(kind);
        self.begin(request, sender);
        self.pump();
        Dispatch::Started(ticket)
    }

    /// The item click handler: the top card toggles the fan, any other card
    /// comes to the front. Clicks while animating are dropped.
    pub fn click(&mut self, item: ItemId) -> Dispatch {
        if self.state.is_animating {
            trace!(%item, "click while animating");
            return Dispatch::Rejected;
        }
        if !self.stack.contains(item) {
            return Dispatch::Ignored;
        }
        if self.stack.top() != item {
            return self.dispatch(Request::Front(item));
        }
        if self.state.is_closed {
            self.dispatch(Request::Fan(None))
        } else {
            self.dispatch(Request::Close)
        }
    }

    // -- Host signals --------------------------------------------------------

    /// The host reports that `item`'s transition ended.
    ///
    /// Returns `false` when no wait was pending for the item.
    pub fn transition_end(&mut self, item: ItemId) -> bool {
        let Some(wait) = self.waits.take_transition(item) else {
            trace!(%item, "transition end without pending wait");
            return false;
        };
        trace!(%item, "transition end");
        self.on_settle(wait.action);
        self.pump();
        true
    }

    /// Advance the clock, firing timers and settling overdue transitions.
    pub fn tick(&mut self, dt: Duration) {
        self.now += dt;
        while let Some(wait) = self.waits.pop_expired(self.now) {
            if let WaitKey::Transition(item) = wait.key {
                warn!(%item, "transition end not signalled before deadline, settling by timeout");
                if let Some(flight) = self.in_flight.as_mut() {
                    flight.degraded = true;
                }
            }
            self.on_settle(wait.action);
            self.pump();
        }
    }

    // -- Sequencing ----------------------------------------------------------

    fn begin(&mut self, request: Request, sender: TicketSender) {
        self.state.is_animating = true;
        self.in_flight = Some(InFlight {
            sender,
            batch: CompletionBatch::new(0),
            then: Then::Finish,
            degraded: false,
            untouched: false,
        });

        match request {
            Request::Front(item) => self.start_front(item),
            Request::Close => self.start_close(None),
            request if !self.state.is_closed => {
                debug!("closing open fan first");
                self.start_close(None);
                self.set_then(Then::Run(request));
            }
            request => self.run(request),
        }
    }

    fn run(&mut self, request: Request) {
        match request {
            Request::Fan(settings) => self.start_fan(&settings.unwrap_or_default()),
            Request::Close => self.start_close(None),
            Request::Next => self.start_navigate(StepDirection::Next),
            Request::Previous => self.start_navigate(StepDirection::Prev),
            Request::Front(item) => self.start_front(item),
            Request::Add(markup) => self.start_add(&markup),
        }
    }

    /// Advance phases whose batches are complete, then start queued work.
    fn pump(&mut self) {
        loop {
            let Some(flight) = self.in_flight.as_mut() else {
                let Some((request, sender)) = self.queue.pop_front() else {
                    return;
                };
                debug!(op = %sender.kind(), "starting queued operation");
                self.begin(request, sender);
                continue;
            };
            if !flight.batch.is_complete() {
                return;
            }
            flight.batch = CompletionBatch::new(0);
            match std::mem::replace(&mut flight.then, Then::Finish) {
                Then::Finish => self.finish(),
                Then::Run(request) => self.run(request),
                Then::NavigateReturn { item, direction } => self.navigate_return(item, direction),
            }
        }
    }

    fn finish(&mut self) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        let kind = flight.sender.kind();
        if !flight.untouched {
            self.state.is_closed = kind != OperationKind::Fan;
        }
        self.stack.normalize();
        self.stage.sync_z(&self.stack);
        self.state.is_animating = false;

        if flight.degraded {
            warn!(op = %kind, "operation completed after timeout");
        } else {
            debug!(op = %kind, "operation complete");
        }
        flight.sender.complete(flight.degraded);
    }

    fn expect_settles(&mut self, count: usize) {
        if let Some(flight) = self.in_flight.as_mut() {
            flight.batch.expect_more(count);
        }
    }

    fn count(&mut self) {
        if let Some(flight) = self.in_flight.as_mut() {
            flight.batch.settle();
        }
    }

    fn set_then(&mut self, then: Then) {
        if let Some(flight) = self.in_flight.as_mut() {
            flight.then = then;
        }
    }

    /// Apply `patch` and arrange for `settle` to run once the item is at
    /// rest. The caller must have reserved a batch slot with `expect_settles`.
    fn animate(&mut self, item: ItemId, patch: StylePatch, settle: Settle) {
        match self.stage.apply(item, &patch) {
            Some(expected) => {
                let deadline = self.now + expected + self.config.completion_timeout();
                trace!(%item, ?expected, "awaiting transition end");
                self.waits.arm_transition(item, deadline, settle);
            }
            None => self.on_settle(settle),
        }
    }

    fn on_settle(&mut self, settle: Settle) {
        match settle {
            Settle::Plain => self.count(),
            Settle::Closed(item) => {
                self.state.is_closed = true;
                self.stage.apply(
                    item,
                    &StylePatch::new()
                        .no_transition()
                        .origin(TransformOrigin::CENTER),
                );
                self.count();
            }
            Settle::ClearTransition(item) => {
                self.stage.apply(item, &StylePatch::new().no_transition());
                self.count();
            }
            Settle::RestoreFront(item) => {
                let transition = Transition::new(
                    TransitionProperty::All,
                    self.options.speed_duration(),
                    Easing::EASE_IN,
                );
                let patch = StylePatch::new()
                    .transition(transition)
                    .opacity(1.0)
                    .transform(Transform::None);
                self.animate(item, patch, Settle::Plain);
            }
        }
    }

    // -- Phases --------------------------------------------------------------

    /// Return every item (but `except`) to rest.
    fn start_close(&mut self, except: Option<ItemId>) {
        let items: Vec<ItemId> = self
            .stack
            .items()
            .into_iter()
            .filter(|&item| Some(item) != except)
            .collect();
        self.expect_settles(items.len());
        for item in items {
            self.animate(
                item,
                StylePatch::new().transform(Transform::None),
                Settle::Closed(item),
            );
        }
    }

    fn start_fan(&mut self, settings: &FanSettings) {
        let resolved = settings.resolve(&self.fan_defaults);
        self.state.is_closed = false;
        let layout = compute_layout(&self.stack, &resolved, self.scatter.as_mut());
        debug!(items = layout.len(), direction = ?resolved.direction, "fan out");
        self.expect_settles(layout.len());
        for target in layout {
            let patch = target.patch();
            self.animate(target.item, patch, Settle::Plain);
        }
    }

    fn start_navigate(&mut self, direction: StepDirection) {
        self.state.is_closed = false;
        let item = match direction {
            StepDirection::Next => self.stack.top(),
            StepDirection::Prev => self.stack.bottom(),
        };
        let width = self.stage.measure_width(item);
        let (rotation, translation) = match direction {
            StepDirection::Next => (NAV_ROTATION_DEG, width + NAV_GAP_PX),
            StepDirection::Prev => (-NAV_ROTATION_DEG, -width - NAV_GAP_PX),
        };
        let transition = Transition::new(
            TransitionProperty::Transform,
            self.options.speed_duration(),
            self.options.easing.clone(),
        );

        self.expect_settles(1);
        self.set_then(Then::NavigateReturn { item, direction });
        self.animate(
            item,
            StylePatch::new()
                .transition(transition)
                .transform(Transform::fan(translation, rotation)),
            Settle::Plain,
        );
    }

    fn navigate_return(&mut self, item: ItemId, direction: StepDirection) {
        self.stack.displace(item, direction);
        self.stage.sync_z(&self.stack);
        self.expect_settles(1);
        self.animate(
            item,
            StylePatch::new().transform(Transform::fan(0.0, 0.0)),
            Settle::Plain,
        );
    }

    fn start_front(&mut self, item: ItemId) {
        if !self.stack.contains(item) {
            debug!(%item, "front: unknown item");
            if let Some(flight) = self.in_flight.as_mut() {
                flight.untouched = true;
            }
            return;
        }
        if self.stack.top() == item {
            if self.state.is_closed {
                debug!(%item, "front: already on top");
            } else {
                debug!(%item, "front: already on top, closing fan");
                self.start_close(None);
            }
            return;
        }
        if !self.state.is_closed {
            self.start_close(Some(item));
        }

        self.stage.apply(
            item,
            &StylePatch::new()
                .no_transition()
                .origin(TransformOrigin::CENTER)
                .opacity(0.0)
                .transform(FRONT_ENTRY),
        );
        self.stack.displace(item, StepDirection::Prev);
        self.stage.sync_z(&self.stack);

        self.expect_settles(1);
        let delay = self.options.speed_duration() / 2;
        self.waits
            .arm_timer(self.now + delay, Settle::RestoreFront(item));
    }

    fn start_add(&mut self, markup: &str) {
        let appended = self.source.append_markup(markup);
        let added = self.stack.push_below(&appended);
        if added.is_empty() {
            debug!("markup produced no new items");
            return;
        }
        for &item in &added {
            self.stage.apply(item, &StylePatch::new().opacity(0.0));
        }
        self.stack.normalize();
        self.stage.sync_z(&self.stack);
        debug!(added = added.len(), total = self.stack.len(), "add items");

        self.expect_settles(added.len());
        for (index, &item) in added.iter().rev().enumerate() {
            self.stage
                .apply(item, &StylePatch::new().transform(ADD_ENTRY));
            let transition = Transition::new(TransitionProperty::All, ADD_DURATION, Easing::EASE_OUT)
                .with_delay(ADD_STAGGER * index as u32);
            self.animate(
                item,
                StylePatch::new()
                    .transition(transition)
                    .opacity(1.0)
                    .transform(Transform::None),
                Settle::ClearTransition(item),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baraja_core::{Direction, FixedScatter};

    #[derive(Default)]
    struct Log {
        patches: Vec<(ItemId, StylePatch)>,
    }

    impl Renderer for Log {
        fn apply(&mut self, item: ItemId, patch: &StylePatch) {
            self.patches.push((item, patch.clone()));
        }

        fn measure_width(&self, _item: ItemId) -> f64 {
            200.0
        }
    }

    struct Container {
        items: Vec<ItemId>,
    }

    impl ElementSource for Container {
        fn items(&self) -> Vec<ItemId> {
            self.items.clone()
        }

        fn append_markup(&mut self, markup: &str) -> Vec<ItemId> {
            let start = self.items.len() as u64;
            let added: Vec<ItemId> = (0..markup.matches("<li").count() as u64)
                .map(|i| ItemId(start + i))
                .collect();
            self.items.extend(&added);
            added
        }
    }

    const A: ItemId = ItemId(0);
    const B: ItemId = ItemId(1);
    const C: ItemId = ItemId(2);

    fn deck() -> Dispatcher<Container, Log> {
        let source = Container {
            items: vec![A, B, C],
        };
        Dispatcher::new(source, Log::default(), BarajaOptions::default()).unwrap()
    }

    /// Deliver every pending transition end until nothing is waiting.
    fn settle(d: &mut Dispatcher<Container, Log>) {
        while let Some(&item) = d.pending_transitions().first() {
            assert!(d.transition_end(item));
        }
    }

    fn last_transform(d: &Dispatcher<Container, Log>, item: ItemId) -> Transform {
        d.stage().visual(item).map(|v| v.transform).unwrap_or(Transform::None)
    }

    #[test]
    fn too_few_items_fails() {
        let source = Container { items: vec![A] };
        let err = Dispatcher::new(source, Log::default(), BarajaOptions::default()).unwrap_err();
        assert_eq!(err, InitializationError::TooFewItems { found: 1 });
    }

    #[test]
    fn initial_state_is_closed_and_idle() {
        let d = deck();
        assert_eq!(d.state(), OperationState::default());
        assert_eq!(d.stack().top(), A);
        assert_eq!(d.stage().visual(C).unwrap().z_index, Some(1000));
    }

    #[test]
    fn next_moves_top_to_bottom_and_completes_once() {
        let mut d = deck();
        let ticket = d.dispatch(Request::Next).into_ticket().unwrap();
        assert!(d.state().is_animating);
        assert_eq!(d.pending_transitions(), vec![A]);
        assert_eq!(last_transform(&d, A), Transform::fan(215.0, 5.0));

        assert!(d.transition_end(A));
        // A is restacked while it slides back.
        assert_eq!(d.stack().items_top_down(), vec![B, C, A]);
        assert!(!ticket.is_complete());

        assert!(d.transition_end(A));
        assert!(ticket.is_complete());
        assert_eq!(ticket.completion_count(), 1);
        assert_eq!(
            d.state(),
            OperationState {
                is_closed: true,
                is_animating: false
            }
        );
        assert!(d.stack().is_canonical());
    }

    #[test]
    fn previous_slides_bottom_card_left() {
        let mut d = deck();
        d.dispatch(Request::Previous);
        assert_eq!(d.pending_transitions(), vec![C]);
        assert_eq!(last_transform(&d, C), Transform::fan(-215.0, -5.0));
        settle(&mut d);
        assert_eq!(d.stack().items_top_down(), vec![C, A, B]);
    }

    #[test]
    fn stray_transition_end_is_ignored() {
        let mut d = deck();
        assert!(!d.transition_end(B));
        d.dispatch(Request::Next);
        assert!(!d.transition_end(B));
        assert!(!d.transition_end(ItemId(99)));
        assert!(d.state().is_animating);
    }

    #[test]
    fn requests_while_animating_are_queued_in_order() {
        let mut d = deck();
        let first = d.dispatch(Request::Next).into_ticket().unwrap();
        let second = d.dispatch(Request::Next);
        assert!(matches!(second, Dispatch::Queued(_)));
        assert_eq!(d.queued(), 1);

        // First next: A slides out and back.
        d.transition_end(A);
        d.transition_end(A);
        assert!(first.is_complete());
        // Second next started right away on B.
        assert_eq!(d.pending_transitions(), vec![B]);
        settle(&mut d);
        assert!(second.ticket().unwrap().is_complete());
        assert_eq!(d.stack().items_top_down(), vec![C, A, B]);
    }

    #[test]
    fn full_queue_rejects() {
        let config = BarajaConfig {
            dispatch: DispatchConfig {
                max_queued: 1,
                ..DispatchConfig::default()
            },
            ..BarajaConfig::default()
        };
        let source = Container {
            items: vec![A, B, C],
        };
        let mut d = Dispatcher::with_config(source, Log::default(), config).unwrap();
        d.dispatch(Request::Next);
        assert!(d.dispatch(Request::Next).is_accepted());
        assert!(matches!(d.dispatch(Request::Next), Dispatch::Rejected));
    }

    #[test]
    fn fan_then_close() {
        let mut d = deck();
        let fan = d.dispatch(Request::Fan(None)).into_ticket().unwrap();
        assert!(!d.state().is_closed);
        assert_eq!(last_transform(&d, A).rotation_deg(), 45.0);
        assert_eq!(last_transform(&d, B).rotation_deg(), 0.0);
        assert_eq!(last_transform(&d, C).rotation_deg(), -45.0);
        // B's rotate(0deg) renders like none, so only A and C are awaited.
        assert_eq!(d.pending_transitions(), vec![A, C]);
        settle(&mut d);
        assert!(fan.is_complete());

        let close = d.dispatch(Request::Close).into_ticket().unwrap();
        settle(&mut d);
        assert!(close.is_complete());
        assert!(d.state().is_closed);
        let visual = d.stage().visual(A).unwrap();
        assert_eq!(visual.transition, None);
        assert_eq!(visual.origin, Some(TransformOrigin::CENTER));
    }

    #[test]
    fn next_while_open_closes_first() {
        let mut d = deck();
        d.dispatch(Request::Fan(Some(FanSettings::new().direction(Direction::Left))));
        settle(&mut d);

        let next = d.dispatch(Request::Next).into_ticket().unwrap();
        // Close phase is awaited before the card slides.
        assert_eq!(d.pending_transitions(), vec![A, C]);
        d.transition_end(A);
        d.transition_end(C);
        assert_eq!(d.pending_transitions(), vec![A]);
        assert_eq!(last_transform(&d, A), Transform::fan(215.0, 5.0));
        settle(&mut d);
        assert!(next.is_complete());
        assert!(d.state().is_closed);
    }

    #[test]
    fn front_restores_after_half_speed() {
        let mut d = deck();
        let ticket = d.dispatch(Request::Front(C)).into_ticket().unwrap();
        assert_eq!(d.stack().top(), C);
        let visual = d.stage().visual(C).unwrap();
        assert_eq!(visual.opacity, 0.0);
        assert_eq!(visual.transform, FRONT_ENTRY);
        assert_eq!(d.next_deadline(), Some(Duration::from_millis(150)));

        d.tick(Duration::from_millis(149));
        assert!(d.pending_transitions().is_empty());
        d.tick(Duration::from_millis(1));
        assert_eq!(d.pending_transitions(), vec![C]);
        assert_eq!(
            d.stage().visual(C).unwrap().transition.as_ref().map(|t| t.to_string()),
            Some("all 300ms ease-in 0ms".to_owned())
        );
        settle(&mut d);
        assert!(ticket.is_complete());
        assert_eq!(d.stack().items_top_down(), vec![C, A, B]);
    }

    #[test]
    fn front_of_top_or_unknown_is_ignored() {
        let mut d = deck();
        assert!(matches!(d.dispatch(Request::Front(A)), Dispatch::Ignored));
        assert!(matches!(d.dispatch(Request::Front(ItemId(7))), Dispatch::Ignored));
        assert!(!d.state().is_animating);
    }

    fn at_rest(d: &Dispatcher<Container, Log>) -> bool {
        [A, B, C].iter().all(|&i| last_transform(d, i).is_identity())
    }

    #[test]
    fn queued_front_of_top_item_closes_open_fan() {
        let mut d = deck();
        d.dispatch(Request::Fan(None));
        let front = d.dispatch(Request::Front(A));
        assert!(matches!(front, Dispatch::Queued(_)));
        settle(&mut d);

        assert!(front.ticket().unwrap().is_complete());
        assert!(d.state().is_closed);
        assert!(at_rest(&d));
        assert_eq!(d.stack().top(), A);

        d.dispatch(Request::Next);
        settle(&mut d);
        assert!(at_rest(&d));
        assert_eq!(d.stack().items_top_down(), vec![B, C, A]);
    }

    #[test]
    fn queued_front_of_unknown_item_leaves_fan_open() {
        let mut d = deck();
        d.dispatch(Request::Fan(None));
        let front = d.dispatch(Request::Front(ItemId(9))).into_ticket().unwrap();
        settle(&mut d);

        assert!(front.is_complete());
        assert!(!d.state().is_closed);
        assert_eq!(last_transform(&d, A).rotation_deg(), 45.0);

        // The next request still closes the fan before acting.
        d.dispatch(Request::Next);
        assert_eq!(d.pending_transitions(), vec![A, C]);
        settle(&mut d);
        assert!(d.state().is_closed);
        assert!(at_rest(&d));
    }

    #[test]
    fn front_on_open_fan_leaves_target_out_of_close() {
        let mut d = deck();
        d.dispatch(Request::Fan(None));
        settle(&mut d);

        d.dispatch(Request::Front(C));
        // B sits at rotate(0deg) and settles at once; C is not closed.
        assert_eq!(d.pending_transitions(), vec![A]);
        assert_eq!(last_transform(&d, C), FRONT_ENTRY);
        settle(&mut d);
        d.tick(Duration::from_millis(150));
        settle(&mut d);
        assert!(!d.state().is_animating);
        assert!(d.state().is_closed);
        assert!(at_rest(&d));
        assert_eq!(d.stack().items_top_down(), vec![C, A, B]);
    }

    #[test]
    fn click_toggles_fan_on_top_item() {
        let mut d = deck();
        let fan = d.click(A).into_ticket().unwrap();
        assert_eq!(fan.kind(), OperationKind::Fan);
        assert!(matches!(d.click(A), Dispatch::Rejected));
        settle(&mut d);

        let close = d.click(A).into_ticket().unwrap();
        assert_eq!(close.kind(), OperationKind::Close);
        settle(&mut d);

        let front = d.click(B).into_ticket().unwrap();
        assert_eq!(front.kind(), OperationKind::Front);
    }

    #[test]
    fn add_places_items_below_and_fades_them_in() {
        let mut d = deck();
        let ticket = d
            .dispatch(Request::Add("<li>d</li><li>e</li>".into()))
            .into_ticket()
            .unwrap();
        let (dd, ee) = (ItemId(3), ItemId(4));
        assert_eq!(d.stack().items_top_down(), vec![A, B, C, dd, ee]);
        assert!(d.stack().is_canonical());
        // Reversed order: the last added item animates first.
        let delay = |item| {
            d.stage()
                .visual(item)
                .and_then(|v| v.transition.as_ref())
                .map(|t| t.delay)
        };
        assert_eq!(delay(ee), Some(Duration::ZERO));
        assert_eq!(delay(dd), Some(Duration::from_millis(200)));

        settle(&mut d);
        assert!(ticket.is_complete());
        assert_eq!(d.stage().visual(dd).unwrap().transition, None);
        assert_eq!(d.stage().visual(dd).unwrap().opacity, 1.0);
    }

    #[test]
    fn add_without_items_completes_immediately() {
        let mut d = deck();
        let ticket = d.dispatch(Request::Add("<p>no items</p>".into())).into_ticket().unwrap();
        assert!(ticket.is_complete());
        assert!(!d.state().is_animating);
    }

    #[test]
    fn silent_host_completes_degraded_after_timeout() {
        let mut d = deck();
        let ticket = d.dispatch(Request::Next).into_ticket().unwrap();
        d.tick(Duration::from_millis(300 + 4999));
        assert!(!ticket.is_complete());
        d.tick(Duration::from_millis(1));
        // Return phase armed; let it time out too.
        d.tick(Duration::from_millis(5300));
        let done = ticket.try_completion().unwrap();
        assert!(done.degraded);
        assert_eq!(d.stack().items_top_down(), vec![B, C, A]);
    }

    #[test]
    fn scatter_source_is_injectable() {
        let mut d = deck();
        d.set_scatter(FixedScatter::new(0.0));
        d.dispatch(Request::Fan(Some(FanSettings::new().scatter(true))));
        // A zero draw adds no offset.
        assert_eq!(last_transform(&d, A).rotation_deg(), 45.0);
    }
}
