use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use cgmath::{Quaternion, Vector3};
use gltf::buffer::Source;
use gltf::mesh::Mode;
use leptos::logging::{log, warn};

use crate::error::ViewerError;
use crate::scene::{Mesh, Model, Node, NodeTransform};

/// Bytes received so far for a load in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Fraction in `[0, 1]`, unknown when the server sent no length.
    pub fn fraction(&self) -> Option<f32> {
        match self.total {
            Some(total) if total > 0 => Some((self.loaded as f32 / total as f32).min(1.0)),
            _ => None,
        }
    }
}

/// Identifies one load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Resolves overlapping loads: the most recently started request wins and
/// completions of earlier ones are dropped.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    latest: u64,
}

impl LoadSequencer {
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_latest(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// Decodes a GLB (or self-contained glTF) into a [`Model`] using the
/// document's default scene.
pub fn parse_model(bytes: &[u8]) -> Result<Model, ViewerError> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let buffers = resolve_buffers(&gltf)?;
    let document = &gltf.document;

    let mut meshes = Vec::with_capacity(document.meshes().len());
    for mesh in document.meshes() {
        meshes.push(read_mesh(&mesh, &buffers)?);
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ViewerError::decode("document has no scene"))?;
    let nodes: Vec<Node> = scene.nodes().map(|node| read_node(&node)).collect();

    let model = Model::new(nodes, meshes);
    log!(
        "decoded model: {} meshes, {} triangles",
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

fn resolve_buffers(gltf: &gltf::Gltf) -> Result<Vec<Vec<u8>>, ViewerError> {
    let mut buffers = Vec::new();
    for buffer in gltf.document.buffers() {
        let mut data = match buffer.source() {
            Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| ViewerError::decode("GLB binary chunk is missing"))?,
            Source::Uri(uri) => decode_data_uri(uri)?,
        };
        if data.len() < buffer.length() {
            return Err(ViewerError::decode(format!(
                "buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        // GLB chunks are padded to 4 bytes.
        data.truncate(buffer.length());
        buffers.push(data);
    }
    Ok(buffers)
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ViewerError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, data)| data)
        .ok_or_else(|| ViewerError::decode(format!("external buffer '{uri}' is not supported")))?;
    BASE64.decode(payload).map_err(ViewerError::decode)
}

fn read_mesh(mesh: &gltf::Mesh<'_>, buffers: &[Vec<u8>]) -> Result<Mesh, ViewerError> {
    let mut out = Mesh::default();
    for prim in mesh.primitives() {
        if prim.mode() != Mode::Triangles {
            warn!("skipping {:?} primitive in mesh {}", prim.mode(), mesh.index());
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).map(|data| data.as_slice()));
        let positions: Vec<[f32; 3]> = match reader.read_positions() {
            Some(it) => it.collect(),
            None => continue,
        };
        let indices: Vec<u32> = match reader.read_indices() {
            Some(it) => it.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(it) => it.collect(),
            None => vertex_normals(&positions, &indices),
        };
        if normals.len() != positions.len() {
            return Err(ViewerError::decode("normal count does not match positions"));
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(ViewerError::decode(format!("index {bad} out of range")));
        }
        let color = prim.material().pbr_metallic_roughness().base_color_factor();

        let base = out.positions.len() as u32;
        out.indices.extend(indices.iter().map(|i| i + base));
        out.colors.extend(std::iter::repeat(color).take(positions.len()));
        out.positions.extend(positions);
        out.normals.extend(normals);
    }
    Ok(out)
}

/// Area-weighted vertex normals for primitives that ship without any.
fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    use cgmath::InnerSpace;

    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len()];
    for tri in indices.chunks_exact(3) {
        let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if idx.iter().any(|&i| i >= positions.len()) {
            continue;
        }
        let [a, b, c] = idx.map(|i| Vector3::from(positions[i]));
        let n = (b - a).cross(c - a);
        for i in idx {
            sums[i] += n;
        }
    }
    sums.into_iter()
        .map(|n| -> [f32; 3] {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

fn read_node(node: &gltf::Node<'_>) -> Node {
    let (translation, rotation, scale) = node.transform().decomposed();
    Node {
        name: node.name().map(str::to_owned),
        transform: NodeTransform {
            translation: Vector3::from(translation),
            rotation: Quaternion::new(rotation[3], rotation[0], rotation[1], rotation[2]),
            scale: Vector3::from(scale),
        },
        mesh: node.mesh().map(|mesh| mesh.index()),
        children: node.children().map(|child| read_node(&child)).collect(),
    }
}
