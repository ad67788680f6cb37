// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press resolution: custom handler first, then the topmost child under the point.
//!
//! ## Semantics
//!
//! 1. If a [`LongPressHandler`] is installed it sees the point first. Returning
//!    [`Disposition::Handled`] consumes the long press.
//! 2. Otherwise children are hit-tested by bounding box, front to back. The first child whose
//!    bounds contain the point (edges included) receives a long click, for example to start a
//!    text selection in a terminal view.
//! 3. If nothing claims it, the long press is dropped.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use terminput_shell::{ChildRegion, Disposition, LongPressResolution, resolve_long_press};
//!
//! // Paint order: the status bar is drawn over the scrollback.
//! let children = [
//!     ChildRegion { id: "scrollback", bounds: Rect::new(0.0, 0.0, 100.0, 100.0) },
//!     ChildRegion { id: "status", bounds: Rect::new(0.0, 90.0, 100.0, 100.0) },
//! ];
//!
//! let mut declines = |_: Point| Disposition::Pass;
//! let resolved = resolve_long_press(Some(&mut declines), &children, Point::new(50.0, 95.0));
//! assert_eq!(resolved, LongPressResolution::Child("status"));
//! ```

use kurbo::{Point, Rect};

/// Whether a handler consumed an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The handler consumed the event; stop here.
    Handled,
    /// The handler declined; fall through to the default behavior.
    Pass,
}

/// Custom long-press callback installed by the application.
///
/// Implemented for any `FnMut(Point) -> Disposition`.
pub trait LongPressHandler {
    /// Called with the pointer-down position of a long press, in the shell's local coordinates.
    fn on_long_press(&mut self, at: Point) -> Disposition;
}

impl<F: FnMut(Point) -> Disposition> LongPressHandler for F {
    fn on_long_press(&mut self, at: Point) -> Disposition {
        self(at)
    }
}

/// A child element's bounding box in the shell's local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChildRegion<K> {
    /// Host identifier of the child.
    pub id: K,
    /// Bounding box.
    pub bounds: Rect,
}

/// Children of the shell that can receive forwarded long clicks.
pub trait ChildLayer {
    /// Child identifier.
    type Id: Copy;

    /// Children in paint order: later entries are drawn on top.
    fn child_regions(&self) -> &[ChildRegion<Self::Id>];

    /// Deliver a long click to `child`.
    fn perform_long_click(&mut self, child: Self::Id);
}

/// A [`ChildLayer`] with no children.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoChildren;

impl ChildLayer for NoChildren {
    type Id = ();

    fn child_regions(&self) -> &[ChildRegion<()>] {
        &[]
    }

    fn perform_long_click(&mut self, _child: ()) {}
}

/// Who claimed a long press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LongPressResolution<K> {
    /// The custom handler consumed it.
    Handler,
    /// Forward a long click to this child.
    Child(K),
    /// Nobody claimed it.
    Unclaimed,
}

/// Whether `point` lies within `bounds`, edges included.
fn contains_inclusive(bounds: Rect, point: Point) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

/// Topmost child whose bounds contain `point`.
///
/// `children` is in paint order, so the search runs from the last entry to the first.
pub fn hit_test_children<K: Copy>(children: &[ChildRegion<K>], point: Point) -> Option<K> {
    children
        .iter()
        .rev()
        .find(|child| contains_inclusive(child.bounds, point))
        .map(|child| child.id)
}

/// Decide who receives a long press at `at`. See the [module docs](self).
pub fn resolve_long_press<K: Copy>(
    handler: Option<&mut dyn LongPressHandler>,
    children: &[ChildRegion<K>],
    at: Point,
) -> LongPressResolution<K> {
    if let Some(handler) = handler
        && handler.on_long_press(at) == Disposition::Handled
    {
        return LongPressResolution::Handler;
    }
    match hit_test_children(children, at) {
        Some(child) => LongPressResolution::Child(child),
        None => LongPressResolution::Unclaimed,
    }
}
