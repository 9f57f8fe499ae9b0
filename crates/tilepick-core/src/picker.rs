//! Frame-paced pick requests.

use std::collections::VecDeque;
use std::fmt;

use crate::error::Result;
use crate::feature::PickResult;
use crate::group::GroupIndex;
use crate::item::RenderableItem;
use crate::options::{Aggregation, PickOptions, SchedulePolicy};
use crate::pass::{self, PickContext, PickSurface, PickTarget};

/// Completion handler of a pick request. Called exactly once.
pub type PickCallback = Box<dyn FnOnce(Option<PickResult>)>;

struct PickRequest {
    x: f32,
    y: f32,
    on_complete: PickCallback,
}

/// Owns a pick surface and runs pick requests at the host's frame tick.
///
/// [`pick`](Self::pick) only records the request and never calls back. The
/// host calls [`on_frame`](Self::on_frame) once per frame, outside its own
/// render pass, with the state of that frame; every pending request then runs
/// as one complete pass. Passes never interleave because each needs the
/// surface exclusively.
pub struct Picker<S> {
    surface: S,
    options: PickOptions,
    pending: VecDeque<PickRequest>,
    superseded: Vec<PickCallback>,
}

impl<S> Picker<S> {
    /// Creates a picker around `surface`.
    pub fn new(surface: S, options: PickOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            surface,
            options,
            pending: VecDeque::new(),
            superseded: Vec::new(),
        })
    }

    /// The options this picker was created with.
    pub fn options(&self) -> &PickOptions {
        &self.options
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of requests waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Requests a pick at viewport point `(x, y)` (pixels, origin top-left).
    ///
    /// Returns immediately. `on_complete` runs during the next
    /// [`on_frame`](Self::on_frame) with the result, or with `None` when
    /// nothing is hit or a newer request superseded it.
    pub fn pick<F>(&mut self, x: f32, y: f32, on_complete: F)
    where
        F: FnOnce(Option<PickResult>) + 'static,
    {
        if self.options.schedule == SchedulePolicy::LatestOnly {
            let superseded = self.pending.drain(..).map(|request| request.on_complete);
            self.superseded.extend(superseded);
        }
        self.pending.push_back(PickRequest {
            x,
            y,
            on_complete: Box::new(on_complete),
        });
    }

    /// Runs every pending request against the state of this frame.
    pub fn on_frame<I>(&mut self, ctx: &PickContext<'_, I>)
    where
        I: RenderableItem,
        S: PickSurface<I>,
    {
        for on_complete in self.superseded.drain(..) {
            on_complete(None);
        }
        if self.pending.is_empty() {
            return;
        }

        let requests = std::mem::take(&mut self.pending);
        let property = self.options.grouping_property.as_str();
        let groups = match self.options.aggregation {
            Aggregation::Indexed => Some(GroupIndex::build(ctx.items, property)),
            Aggregation::Rescan => None,
        };

        log::debug!("running {} pick passes", requests.len());
        for request in requests {
            let result = pass::run_pass(
                &mut self.surface,
                ctx,
                request.x,
                request.y,
                property,
                groups.as_ref(),
            );
            (request.on_complete)(result);
        }
    }

    /// Runs one pass right away, bypassing the frame queue.
    ///
    /// Only call this where the host is not rendering, e.g. in tools and tests.
    pub fn pick_now<I>(&mut self, ctx: &PickContext<'_, I>, x: f32, y: f32) -> Option<PickResult>
    where
        I: RenderableItem,
        S: PickSurface<I>,
    {
        let property = self.options.grouping_property.as_str();
        let groups = match self.options.aggregation {
            Aggregation::Indexed => Some(GroupIndex::build(ctx.items, property)),
            Aggregation::Rescan => None,
        };
        pass::run_pass(&mut self.surface, ctx, x, y, property, groups.as_ref())
    }

    /// Releases the surface. Requests still pending, superseded ones
    /// included, complete with `None`.
    ///
    /// Takes the picker by value, so it cannot be used or destroyed again.
    pub fn destroy(mut self)
    where
        S: PickTarget,
    {
        for on_complete in self.superseded.drain(..) {
            on_complete(None);
        }
        for request in self.pending.drain(..) {
            (request.on_complete)(None);
        }
        self.surface.release();
        log::info!("picker destroyed");
    }
}

impl<S> fmt::Debug for Picker<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Picker")
            .field("options", &self.options)
            .field("pending", &self.pending.len())
            .field("superseded", &self.superseded.len())
            .finish_non_exhaustive()
    }
}
