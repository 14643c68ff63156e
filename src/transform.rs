//! Screen to canvas coordinate mapping under an aspect-fit ("contain") policy.
//!
//! The canvas is scaled uniformly to fit inside the view and centred along
//! the axis with leftover space. All functions are pure over explicit
//! parameters; [`TransformCache`] keeps the last computed parameters for one
//! owner and recomputes them when the view is resized.

use crate::{
    host::{AnimationHost, CanvasBounds},
    Error, Result,
};
use log::debug;

/// Aspect-fit mapping from view pixels to canvas-local units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformParameters {
    /// Uniform scale from canvas units to view pixels
    pub scale: f32,
    /// Horizontal padding of the scaled canvas inside the view
    pub offset_x: f32,
    /// Vertical padding of the scaled canvas inside the view
    pub offset_y: f32,
    /// View width the parameters were computed for
    pub view_width: u32,
    /// View height the parameters were computed for
    pub view_height: u32,
    /// Left edge of the canvas bounds
    pub bounds_left: f32,
    /// Top edge of the canvas bounds
    pub bounds_top: f32,
}

/// Position and size of the hosting view in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewGeometry {
    /// Screen x of the view's left edge
    pub left: f32,
    /// Screen y of the view's top edge
    pub top: f32,
    /// Laid-out width (0 before layout)
    pub width: u32,
    /// Laid-out height (0 before layout)
    pub height: u32,
}

impl ViewGeometry {
    /// Geometry of a view at the given screen origin
    #[must_use]
    pub const fn new(left: f32, top: f32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether layout has produced a non-empty view
    #[must_use]
    pub const fn is_laid_out(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Convert a screen coordinate into view-local pixels
    #[must_use]
    pub fn screen_to_view(&self, x_screen: f32, y_screen: f32) -> (f32, f32) {
        (x_screen - self.left, y_screen - self.top)
    }
}

/// Compute the aspect-fit transform of a canvas inside a view.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when the canvas size is not positive and
/// [`Error::TransformUnavailable`] when the view has not been laid out.
#[allow(clippy::cast_precision_loss)] // View sizes are far below f32 precision limits
pub fn compute_transform(
    canvas_width: f32,
    canvas_height: f32,
    canvas_left: f32,
    canvas_top: f32,
    view_width: u32,
    view_height: u32,
) -> Result<TransformParameters> {
    if !(canvas_width.is_finite() && canvas_height.is_finite()) || canvas_width <= 0.0 || canvas_height <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "Canvas size must be positive, got {canvas_width}x{canvas_height}"
        )));
    }
    if view_width == 0 || view_height == 0 {
        return Err(Error::TransformUnavailable(format!(
            "View not laid out ({view_width}x{view_height})"
        )));
    }

    let width = view_width as f32;
    let height = view_height as f32;
    let scale = (width / canvas_width).min(height / canvas_height);

    Ok(TransformParameters {
        scale,
        offset_x: (width - canvas_width * scale) / 2.0,
        offset_y: (height - canvas_height * scale) / 2.0,
        view_width,
        view_height,
        bounds_left: canvas_left,
        bounds_top: canvas_top,
    })
}

/// Map a view-local coordinate into canvas-local units
#[must_use]
pub fn screen_to_canvas(params: &TransformParameters, x_view: f32, y_view: f32) -> (f32, f32) {
    (
        (x_view - params.offset_x) / params.scale + params.bounds_left,
        (y_view - params.offset_y) / params.scale + params.bounds_top,
    )
}

/// Whether cached parameters no longer match the current view size
#[must_use]
pub fn is_stale(params: &TransformParameters, view_width: u32, view_height: u32) -> bool {
    params.view_width != view_width || params.view_height != view_height || params.scale <= 0.0
}

/// Last computed transform, owned by a single consumer
#[derive(Debug, Default)]
pub struct TransformCache {
    params: Option<TransformParameters>,
    bounds: Option<CanvasBounds>,
}

impl TransformCache {
    /// Empty cache
    #[must_use]
    pub const fn new() -> Self {
        Self {
            params: None,
            bounds: None,
        }
    }

    /// Cached parameters, if any
    #[must_use]
    pub const fn params(&self) -> Option<&TransformParameters> {
        self.params.as_ref()
    }

    /// Drop the cached parameters
    pub fn invalidate(&mut self) {
        self.params = None;
        self.bounds = None;
    }

    /// Parameters valid for `view` and the host's current canvas.
    ///
    /// The cache is reused only while both the view size and the canvas
    /// bounds are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransformUnavailable`] while the view has no size or
    /// the host has no canvas loaded; the caller defers its update.
    pub fn resolve(&mut self, host: &dyn AnimationHost, view: &ViewGeometry) -> Result<TransformParameters> {
        if !view.is_laid_out() {
            self.invalidate();
            return Err(Error::TransformUnavailable("View not laid out".to_string()));
        }

        let Some(bounds) = host.canvas_bounds() else {
            self.invalidate();
            return Err(Error::TransformUnavailable("Canvas not loaded".to_string()));
        };

        if let Some(params) = self.params {
            if self.bounds == Some(bounds) && !is_stale(&params, view.width, view.height) {
                return Ok(params);
            }
        }

        let params = compute_transform(
            bounds.width(),
            bounds.height(),
            bounds.left,
            bounds.top,
            view.width,
            view.height,
        )
        .map_err(|e| match e {
            Error::InvalidInput(msg) => Error::TransformUnavailable(msg),
            other => other,
        })?;

        debug!(
            "Transform recomputed for {}x{} view over {}x{} canvas: scale={:.4}, offset=({:.1}, {:.1})",
            view.width,
            view.height,
            bounds.width(),
            bounds.height(),
            params.scale,
            params.offset_x,
            params.offset_y
        );
        self.params = Some(params);
        self.bounds = Some(bounds);
        Ok(params)
    }
}
