use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};

const LIGHT: [u8; 4] = [245, 190, 70, 255];
const DARK: [u8; 4] = [215, 85, 60, 255];

/// Square checkerboard with `cells` squares per side, generated in memory.
pub fn checkerboard(size: u32, cells: u32) -> Image {
    let cell = (size / cells.max(1)).max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let color = if (x / cell + y / cell) % 2 == 0 { LIGHT } else { DARK };
            data.extend_from_slice(&color);
        }
    }
    Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_alternate() {
        let image = checkerboard(8, 2);
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.len(), 8 * 8 * 4);
        let pixel = |x: usize, y: usize| &data[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
        assert_eq!(pixel(0, 0), &LIGHT);
        assert_eq!(pixel(4, 0), &DARK);
        assert_eq!(pixel(4, 4), &LIGHT);
    }
}
