#![forbid(unsafe_code)]

//! Host collaborator traits.
//!
//! Baraja never touches a document directly. A host provides:
//!
//! - a [`Renderer`] that applies [`StylePatch`]es to items and measures them,
//! - an [`ElementSource`] that enumerates a container's items and turns
//!   appended markup into new item handles.
//!
//! Completion of a visual transition is reported back through
//! [`Dispatcher::transition_end`](crate::Dispatcher::transition_end), and
//! time is advanced with [`Dispatcher::tick`](crate::Dispatcher::tick).

use baraja_core::{ItemId, StylePatch};

/// Applies visual state to items.
pub trait Renderer {
    /// Apply a partial style update, fields in declaration order.
    fn apply(&mut self, item: ItemId, patch: &StylePatch);

    /// Rendered width of the item in pixels.
    fn measure_width(&self, item: ItemId) -> f64;
}

/// Enumerates and extends the managed container.
pub trait ElementSource {
    /// Current child items in container order.
    fn items(&self) -> Vec<ItemId>;

    /// Append raw markup to the container and return the new items, in
    /// container order.
    fn append_markup(&mut self, markup: &str) -> Vec<ItemId>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn apply(&mut self, item: ItemId, patch: &StylePatch) {
        (**self).apply(item, patch);
    }

    fn measure_width(&self, item: ItemId) -> f64 {
        (**self).measure_width(item)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn apply(&mut self, item: ItemId, patch: &StylePatch) {
        (**self).apply(item, patch);
    }

    fn measure_width(&self, item: ItemId) -> f64 {
        (**self).measure_width(item)
    }
}

impl<S: ElementSource + ?Sized> ElementSource for Box<S> {
    fn items(&self) -> Vec<ItemId> {
        (**self).items()
    }

    fn append_markup(&mut self, markup: &str) -> Vec<ItemId> {
        (**self).append_markup(markup)
    }
}
