use cgmath::{EuclideanSpace, Matrix4, Point3, Transform, Vector3};

use crate::scene::{Model, Node};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }
}

impl BBox {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn merge(&mut self, point: &Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    #[inline]
    pub fn merge_box(&mut self, other: &BBox) {
        if other.is_empty() {
            return;
        }
        self.merge(&other.min);
        self.merge(&other.max);
    }

    /// True when no point has been merged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Largest side of the box, zero for an empty box.
    pub fn max_len(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let extent = self.extent();
        extent.x.max(extent.y).max(extent.z)
    }
}

/// Tight box around every vertex of `model`, in the space of the model's
/// current transform.
pub fn compute(model: &Model) -> BBox {
    let mut bbox = BBox::default();
    let root = model.transform();
    for node in &model.nodes {
        merge_node(model, node, &root, &mut bbox);
    }
    bbox
}

fn merge_node(model: &Model, node: &Node, parent: &Matrix4<f32>, bbox: &mut BBox) {
    let world = parent * node.transform.matrix();
    if let Some(mesh) = node.mesh.and_then(|idx| model.meshes.get(idx)) {
        for p in &mesh.positions {
            let point = world.transform_point(Point3::new(p[0], p[1], p[2]));
            bbox.merge(&point.to_vec());
        }
    }
    for child in &node.children {
        merge_node(model, child, &world, bbox);
    }
}
