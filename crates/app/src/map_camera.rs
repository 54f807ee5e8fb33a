//! Flat lat/lng projection for the map panel, with pan and zoom.
//!
//! Screen coordinates are panel-local pixels: `(0, 0)` is the panel's top-left
//! corner, x grows east and y grows south.

use cellcraft_core::{GeoBounds, LatLng};

pub const DEFAULT_PIXELS_PER_CELL: f64 = 32.0;
pub const MIN_PIXELS_PER_CELL: f64 = 4.0;
pub const MAX_PIXELS_PER_CELL: f64 = 128.0;
/// Zoom factor applied per wheel notch.
pub const ZOOM_STEP: f64 = 1.15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapCamera {
    center: LatLng,
    cell_size_deg: f64,
    pixels_per_cell: f64,
}

impl MapCamera {
    pub fn new(center: LatLng, cell_size_deg: f64) -> Self {
        Self { center, cell_size_deg, pixels_per_cell: DEFAULT_PIXELS_PER_CELL }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn pixels_per_cell(&self) -> f64 {
        self.pixels_per_cell
    }

    fn pixels_per_degree(&self) -> f64 {
        self.pixels_per_cell / self.cell_size_deg
    }

    pub fn center_on(&mut self, position: LatLng) {
        self.center = position;
    }

    /// Geographic rectangle shown by a panel of the given size.
    pub fn view_bounds(&self, width: f32, height: f32) -> GeoBounds {
        let half_lng = f64::from(width) / 2.0 / self.pixels_per_degree();
        let half_lat = f64::from(height) / 2.0 / self.pixels_per_degree();
        GeoBounds::new(
            self.center.lat - half_lat,
            self.center.lng - half_lng,
            self.center.lat + half_lat,
            self.center.lng + half_lng,
        )
    }

    pub fn geo_to_screen(&self, position: LatLng, width: f32, height: f32) -> (f32, f32) {
        let ppd = self.pixels_per_degree();
        let x = f64::from(width) / 2.0 + (position.lng - self.center.lng) * ppd;
        let y = f64::from(height) / 2.0 - (position.lat - self.center.lat) * ppd;
        (x as f32, y as f32)
    }

    pub fn screen_to_geo(&self, x: f32, y: f32, width: f32, height: f32) -> LatLng {
        let ppd = self.pixels_per_degree();
        LatLng::new(
            self.center.lat - (f64::from(y) - f64::from(height) / 2.0) / ppd,
            self.center.lng + (f64::from(x) - f64::from(width) / 2.0) / ppd,
        )
    }

    /// Moves the map with the pointer: dragging right reveals what lies west.
    pub fn pan_pixels(&mut self, dx: f32, dy: f32) {
        let ppd = self.pixels_per_degree();
        self.center.lng -= f64::from(dx) / ppd;
        self.center.lat += f64::from(dy) / ppd;
    }

    /// Zooms by `notches` wheel steps, keeping the point under `(x, y)` fixed.
    pub fn zoom_at(&mut self, notches: f32, x: f32, y: f32, width: f32, height: f32) {
        let anchor = self.screen_to_geo(x, y, width, height);
        let zoomed = self.pixels_per_cell * ZOOM_STEP.powf(f64::from(notches));
        self.pixels_per_cell = zoomed.clamp(MIN_PIXELS_PER_CELL, MAX_PIXELS_PER_CELL);

        let drifted = self.screen_to_geo(x, y, width, height);
        self.center.lat += anchor.lat - drifted.lat;
        self.center.lng += anchor.lng - drifted.lng;
    }
}
