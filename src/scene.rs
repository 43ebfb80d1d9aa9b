use cgmath::{Matrix4, One, Quaternion, Rad, Vector3};

/// Triangle geometry of one glTF mesh, all primitives merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub colors: Vec<[f32; 4]>,
}

impl Mesh {
    pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

    pub fn from_positions(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let n = positions.len();
        Self {
            positions,
            normals: vec![[0.0, 1.0, 0.0]; n],
            indices,
            colors: vec![Self::DEFAULT_COLOR; n],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl NodeTransform {
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub transform: NodeTransform,
    pub mesh: Option<usize>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn with_mesh(mesh: usize) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::default()
        }
    }
}

/// A loaded scene graph plus the placement the viewer applies on top of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub position: Vector3<f32>,
    pub scale: f32,
    pub rotation_y: Rad<f32>,
}

impl Model {
    pub fn new(nodes: Vec<Node>, meshes: Vec<Mesh>) -> Self {
        Self {
            nodes,
            meshes,
            position: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            rotation_y: Rad(0.0),
        }
    }

    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_y(self.rotation_y)
            * Matrix4::from_scale(self.scale)
    }

    /// Visits every node carrying a mesh with its transform relative to the
    /// model root.
    pub fn for_each_mesh<F>(&self, mut f: F)
    where
        F: FnMut(&Mesh, &Matrix4<f32>),
    {
        fn visit<F: FnMut(&Mesh, &Matrix4<f32>)>(
            meshes: &[Mesh],
            node: &Node,
            parent: &Matrix4<f32>,
            f: &mut F,
        ) {
            let local = parent * node.transform.matrix();
            if let Some(mesh) = node.mesh.and_then(|idx| meshes.get(idx)) {
                f(mesh, &local);
            }
            for child in &node.children {
                visit(meshes, child, &local, f);
            }
        }

        let identity = Matrix4::one();
        for node in &self.nodes {
            visit(&self.meshes, node, &identity, &mut f);
        }
    }

    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.for_each_mesh(|mesh, _| count += mesh.indices.len() / 3);
        count
    }

    /// Advances the turntable rotation, keeping the angle in one turn.
    pub fn spin(&mut self, step: f32) {
        let full = std::f32::consts::TAU;
        self.rotation_y = Rad((self.rotation_y.0 + step) % full);
    }
}
