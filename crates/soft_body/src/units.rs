use glam::Vec2;

pub const PIXELS_PER_METER: f32 = 100.;
pub const METERS_PER_PIXEL: f32 = 1. / PIXELS_PER_METER;

#[inline]
pub fn to_meters(pixels: f32) -> f32 {
    pixels * METERS_PER_PIXEL
}

#[inline]
pub fn to_pixels(meters: f32) -> f32 {
    meters * PIXELS_PER_METER
}

#[inline]
pub fn vec_to_meters(pixels: Vec2) -> Vec2 {
    pixels * METERS_PER_PIXEL
}

#[inline]
pub fn vec_to_pixels(meters: Vec2) -> Vec2 {
    meters * PIXELS_PER_METER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_maps_to_eight_by_six_meters() {
        assert_eq!(vec_to_meters(Vec2::new(800., 600.)), Vec2::new(8., 6.));
        assert_eq!(to_pixels(1.5), 150.);
    }

    #[test]
    fn sub_pixel_values_are_not_truncated() {
        assert!((to_meters(1.) - 0.01).abs() < 1e-7);
        assert!((to_meters(to_pixels(0.37)) - 0.37).abs() < 1e-6);
    }
}
