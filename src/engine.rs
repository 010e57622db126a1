use crate::{demo::SolarSystem, render_queue::RenderQueue};

/// Runs one frame: animate local transforms, propagate world transforms
/// from the root, then record the draw pass into `queue`.
pub fn frame(state: &mut SolarSystem, queue: &mut RenderQueue, dt: f32) -> anyhow::Result<()> {
    state.update(dt)?;

    let projection = state.projection.matrix();
    state.scene.update(state.root, &projection, &state.camera)?;

    queue.clear();
    state.scene.draw(state.root, queue)?;

    log::trace!(
        "Frame at {:.3}s submitted {} draw calls",
        state.elapsed(),
        queue.len()
    );

    Ok(())
}
