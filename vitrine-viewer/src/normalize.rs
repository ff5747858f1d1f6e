//! Model normalization
//!
//! Every model is shown at the same size, centred horizontally and resting
//! on the floor, whatever units it was authored in.

use vitrine_core::{Aabb, ModelNode, Point3f};

/// Uniform scale that makes the largest extent of `bounds` equal to
/// `target_size`. Falls back to 1 when that is not a usable number.
pub fn scale_factor(bounds: &Aabb, target_size: f32) -> f32 {
    let max_dim = bounds.max_dimension();
    let scale = target_size / max_dim;
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Scale the model to `target_size`, centre it on the vertical axis and
/// rest it on `y = 0`. Returns the centre of the result, which is where the
/// orbit should look.
pub fn normalize_model(model: &mut ModelNode, target_size: f32) -> Point3f {
    let bounds = model.world_bounds();
    let scale = scale_factor(&bounds, target_size);
    model.transform.scale *= scale;
    model.transform.translation *= scale;

    let bounds = model.world_bounds();
    if bounds.is_empty() {
        log::warn!("model {} has no vertices, skipping placement", model.name);
        return Point3f::origin();
    }
    let center = bounds.center();
    model.transform.translation.x -= center.x;
    model.transform.translation.y -= bounds.min.y;
    model.transform.translation.z -= center.z;

    let center = model.world_bounds().center();
    log::debug!(
        "normalized {}: scale {:.4}, center ({:.3}, {:.3}, {:.3})",
        model.name,
        model.transform.scale,
        center.x,
        center.y,
        center.z
    );
    center
}
