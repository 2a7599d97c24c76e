// Size of the page viewport in CSS pixels plus the device pixel ratio,
// the two inputs every resize recomputes the surface and camera from.

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Viewport {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    // Backing store size in device pixels, never zero
    pub fn drawing_buffer(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0);
        let h = (self.height * self.pixel_ratio).round().max(1.0);
        (w as u32, h as u32)
    }
}
