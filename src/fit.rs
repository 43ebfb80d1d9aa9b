use leptos::logging::warn;

use crate::bounds::{self, BBox};
use crate::scene::Model;

/// Extent the largest side of a fitted model is scaled to.
pub const TARGET_SIZE: f32 = 3.0;

/// What [`fit`] did to a model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedModel {
    /// Box before fitting.
    pub original: BBox,
    /// Uniform factor applied, 1 when scaling was skipped.
    pub scale: f32,
}

/// Recenters `model` on the origin and scales it uniformly so its largest
/// side measures `target_size`.
///
/// The scale is applied about the origin after recentering, so the fitted
/// box stays centered. Must run once per load: refitting shrinks again.
pub fn fit(model: &mut Model, target_size: f32) -> FittedModel {
    let original = bounds::compute(model);
    if original.is_empty() {
        warn!("model has no geometry, leaving it unfitted");
        return FittedModel {
            original,
            scale: 1.0,
        };
    }

    model.position -= original.center();

    let max_dim = original.max_len();
    let scale = if max_dim > 0.0 && max_dim.is_finite() {
        target_size / max_dim
    } else {
        warn!("degenerate model bounds ({max_dim}), skipping scale");
        1.0
    };

    model.position *= scale;
    model.scale *= scale;

    FittedModel { original, scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Mesh, Node};
    use cgmath::{InnerSpace, Vector3};

    const EPS: f32 = 1e-5;

    fn model_spanning(min: [f32; 3], max: [f32; 3]) -> Model {
        let mesh = Mesh::from_positions(vec![min, max, [min[0], max[1], min[2]]], vec![0, 1, 2]);
        Model::new(vec![Node::with_mesh(0)], vec![mesh])
    }

    #[test]
    fn reference_box_is_centered_and_halved() {
        let mut model = model_spanning([-2.0, -1.0, -4.0], [4.0, 3.0, 2.0]);
        let fitted = fit(&mut model, TARGET_SIZE);

        assert_eq!(fitted.original.center(), Vector3::new(1.0, 1.0, -1.0));
        assert_eq!(fitted.original.extent(), Vector3::new(6.0, 4.0, 6.0));
        assert_eq!(fitted.original.max_len(), 6.0);
        assert!((fitted.scale - 0.5).abs() < EPS);

        let after = bounds::compute(&model);
        assert!(after.center().magnitude() < EPS);
        assert!((after.max_len() - 3.0).abs() < EPS);
    }

    #[test]
    fn offset_model_lands_on_origin() {
        let mut model = model_spanning([100.0, 200.0, 300.0], [100.5, 200.25, 300.1]);
        model.position = Vector3::new(-7.0, 3.0, 1.0);
        fit(&mut model, TARGET_SIZE);

        let after = bounds::compute(&model);
        assert!(after.center().magnitude() < 1e-3);
        assert!((after.max_len() - TARGET_SIZE).abs() < 1e-3);
    }

    #[test]
    fn flat_model_recentres_without_scaling() {
        let mesh = Mesh::from_positions(vec![[2.0, 2.0, 2.0]; 3], vec![0, 1, 2]);
        let mut model = Model::new(vec![Node::with_mesh(0)], vec![mesh]);
        let fitted = fit(&mut model, TARGET_SIZE);

        assert_eq!(fitted.scale, 1.0);
        assert_eq!(model.scale, 1.0);
        assert_eq!(model.position, Vector3::new(-2.0, -2.0, -2.0));
    }

    #[test]
    fn empty_model_is_untouched() {
        let mut model = Model::new(vec![Node::default()], vec![]);
        let fitted = fit(&mut model, TARGET_SIZE);
        assert!(fitted.original.is_empty());
        assert_eq!(model.position, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(model.scale, 1.0);
    }

    #[test]
    fn refitting_is_not_a_no_op_on_scale() {
        let mut model = model_spanning([0.0; 3], [6.0, 1.0, 1.0]);
        fit(&mut model, TARGET_SIZE);
        let first = model.scale;
        fit(&mut model, 1.0);
        assert!(model.scale < first);
    }
}
