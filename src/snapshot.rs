//! Software preview of a recorded frame.
//!
//! Each draw call is splatted as a flat disc at its projected origin, sized
//! by how far the projected unit-X point lands from it. Later calls paint
//! over earlier ones, so draw order decides overlap.

use glam::{Mat4, Vec2, Vec4};

use crate::render_queue::{DrawCall, RenderQueue};
use crate::texture::Texture;

pub fn render(queue: &RenderQueue, width: u32, height: u32) -> Texture {
    let mut image = Texture::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }
    let viewport = Vec2::new(width as f32, height as f32);

    for call in queue.calls() {
        if let Some((center, radius)) = project_disc(call, viewport) {
            splat(&mut image, center, radius, call.color);
        }
    }

    image
}

fn to_screen(mvp: &Mat4, point: Vec4, viewport: Vec2) -> Option<Vec2> {
    let clip = *mvp * point;
    if clip.w <= f32::EPSILON {
        return None;
    }

    let ndc = Vec2::new(clip.x, clip.y) / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    ))
}

fn project_disc(call: &DrawCall, viewport: Vec2) -> Option<(Vec2, f32)> {
    let mvp = &call.model_view_projection;
    let center = to_screen(mvp, Vec4::W, viewport)?;
    let edge = to_screen(mvp, Vec4::new(1.0, 0.0, 0.0, 1.0), viewport).unwrap_or(center);
    let radius = center.distance(edge).clamp(1.0, viewport.max_element().max(1.0));

    Some((center, radius))
}

fn splat(image: &mut Texture, center: Vec2, radius: f32, color: [u8; 3]) {
    let min_x = (center.x - radius).floor().max(0.0) as u32;
    let min_y = (center.y - radius).floor().max(0.0) as u32;
    let max_x = (center.x + radius).ceil().min(image.width() as f32) as u32;
    let max_y = (center.y + radius).ceil().min(image.height() as f32) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if pixel_center.distance_squared(center) <= radius * radius {
                image.put_pixel_clipped(x, y, color);
            }
        }
    }
}
