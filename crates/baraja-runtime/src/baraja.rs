#![forbid(unsafe_code)]

//! The widget instance.
//!
//! [`Baraja`] is the public face of one managed container: it owns a
//! [`Dispatcher`] and exposes the widget operations by name.
//!
//! ```ignore
//! let mut deck = Baraja::initialize(source, renderer, BarajaOptions::default())?;
//! let fan = deck.fan(Some(FanSettings::new().direction(Direction::Left)));
//! // host: deliver transition ends with deck.transition_end(item)
//! //       and advance time with deck.tick(dt)
//! assert!(fan.ticket().is_some());
//! ```

use baraja_core::{
    BarajaOptions, FanSettings, InitializationError, ItemId, ScatterSource, Stack,
};
use web_time::Duration;

use crate::config::BarajaConfig;
use crate::dispatcher::{Dispatch, Dispatcher, OperationState, Request};
use crate::host::{ElementSource, Renderer};

/// A card stack bound to a host container.
#[derive(Debug)]
pub struct Baraja<S, R> {
    dispatcher: Dispatcher<S, R>,
}

impl<S: ElementSource, R: Renderer> Baraja<S, R> {
    /// Take over the items currently in `source`.
    ///
    /// # Errors
    ///
    /// [`InitializationError::TooFewItems`] when the container holds fewer
    /// than two items.
    pub fn initialize(
        source: S,
        renderer: R,
        options: BarajaOptions,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            dispatcher: Dispatcher::new(source, renderer, options)?,
        })
    }

    /// Like [`initialize`](Self::initialize), with fan defaults and
    /// sequencing limits from `config`.
    pub fn from_config(
        source: S,
        renderer: R,
        config: BarajaConfig,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            dispatcher: Dispatcher::with_config(source, renderer, config)?,
        })
    }

    /// Use `scatter` for the random offsets of scattered fans.
    pub fn with_scatter(mut self, scatter: impl ScatterSource + 'static) -> Self {
        self.dispatcher.set_scatter(scatter);
        self
    }

    /// Append `markup` to the container and animate the new items in at the
    /// bottom of the stack.
    pub fn add(&mut self, markup: &str) -> Dispatch {
        self.dispatcher.dispatch(Request::Add(markup.to_owned()))
    }

    /// Spread the items out.
    pub fn fan(&mut self, settings: Option<FanSettings>) -> Dispatch {
        self.dispatcher.dispatch(Request::Fan(settings))
    }

    /// Send the top item to the bottom.
    pub fn next(&mut self) -> Dispatch {
        self.dispatcher.dispatch(Request::Next)
    }

    /// Bring the bottom item to the top.
    pub fn previous(&mut self) -> Dispatch {
        self.dispatcher.dispatch(Request::Previous)
    }

    /// Return every item to the resting pile.
    pub fn close(&mut self) -> Dispatch {
        self.dispatcher.dispatch(Request::Close)
    }

    /// Bring `item` to the top.
    pub fn front(&mut self, item: ItemId) -> Dispatch {
        self.dispatcher.dispatch(Request::Front(item))
    }

    /// Handle a click on `item`.
    pub fn click(&mut self, item: ItemId) -> Dispatch {
        self.dispatcher.click(item)
    }

    /// Report a finished transition on `item`.
    pub fn transition_end(&mut self, item: ItemId) -> bool {
        self.dispatcher.transition_end(item)
    }

    /// Advance the widget clock.
    pub fn tick(&mut self, dt: Duration) {
        self.dispatcher.tick(dt);
    }

    pub fn stack(&self) -> &Stack {
        self.dispatcher.stack()
    }

    pub fn state(&self) -> OperationState {
        self.dispatcher.state()
    }

    pub fn is_closed(&self) -> bool {
        self.dispatcher.state().is_closed
    }

    pub fn is_animating(&self) -> bool {
        self.dispatcher.state().is_animating
    }

    pub fn pending_transitions(&self) -> Vec<ItemId> {
        self.dispatcher.pending_transitions()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.dispatcher.next_deadline()
    }

    pub fn renderer(&self) -> &R {
        self.dispatcher.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.dispatcher.renderer_mut()
    }

    pub fn source(&self) -> &S {
        self.dispatcher.source()
    }

    pub fn dispatcher(&self) -> &Dispatcher<S, R> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<S, R> {
        &mut self.dispatcher
    }
}
