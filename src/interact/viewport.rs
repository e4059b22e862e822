use crate::foundation::core::{Canvas, Point, Vec2};

/// Where the canvas is displayed on the host's screen.
///
/// The displayed size may differ from the raster size (CSS scaling); pointer positions
/// arrive in client coordinates and are mapped back to raster pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Client-space position of the canvas's top-left corner.
    pub client_origin: Point,
    /// Displayed width and height in client units.
    pub client_size: Vec2,
    /// Raster size.
    pub canvas: Canvas,
}

impl Viewport {
    /// A viewport showing `canvas` at 1:1 scale at the client origin.
    pub fn identity(canvas: Canvas) -> Self {
        Self {
            client_origin: Point::ORIGIN,
            client_size: Vec2::new(f64::from(canvas.width), f64::from(canvas.height)),
            canvas,
        }
    }

    /// Raster pixels per client unit on each axis.
    pub fn scale(&self) -> Vec2 {
        let axis = |raster: u32, shown: f64| {
            if shown.is_finite() && shown > 0.0 {
                f64::from(raster) / shown
            } else {
                1.0
            }
        };
        Vec2::new(
            axis(self.canvas.width, self.client_size.x),
            axis(self.canvas.height, self.client_size.y),
        )
    }

    /// Map a client-space pointer position to canvas pixels.
    pub fn to_canvas(&self, client: Point) -> Point {
        let s = self.scale();
        let d = client - self.client_origin;
        Point::new(d.x * s.x, d.y * s.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/viewport.rs"]
mod tests;
