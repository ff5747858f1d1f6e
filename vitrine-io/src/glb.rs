//! glTF 2.0 / GLB support
//!
//! Walks the default scene (or the first one), bakes every node's world
//! transform into its mesh vertices and keeps only triangle-list
//! primitives. Materials collapse to a per-vertex base colour.

use crate::error::IoError;
use crate::registry::ModelReader;
use nalgebra::Matrix4;
use std::path::Path;
use vitrine_core::{ModelNode, Point3f, Result, Rgb, Transform3D, Transformable, TriangleMesh, Vector3f};

/// Reader for `.glb` and `.gltf` files
#[derive(Debug, Default, Clone, Copy)]
pub struct GlbReader;

impl GlbReader {
    /// Parse a model from an in-memory GLB (or self-contained glTF) blob
    pub fn read_slice(&self, name: &str, bytes: &[u8]) -> std::result::Result<ModelNode, IoError> {
        self.read_document(name, bytes, None)
    }

    /// Parse a document whose relative buffer URIs resolve against `base`.
    /// Images are never fetched; materials only contribute their colour factor.
    fn read_document(
        &self,
        name: &str,
        bytes: &[u8],
        base: Option<&Path>,
    ) -> std::result::Result<ModelNode, IoError> {
        let parse_error = |e: gltf::Error| IoError::ParseError { message: e.to_string() };
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(parse_error)?;
        let buffers = gltf::import_buffers(&document, base, blob).map_err(parse_error)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| IoError::ParseError {
                message: "document has no scenes".to_string(),
            })?;

        let mut meshes = Vec::new();
        for node in scene.nodes() {
            collect_node(&node, Matrix4::identity(), &buffers, &mut meshes);
        }

        if meshes.iter().all(TriangleMesh::is_empty) {
            return Err(IoError::NoGeometry { path: name.to_string() });
        }

        log::debug!(
            "parsed {}: {} meshes, {} faces",
            name,
            meshes.len(),
            meshes.iter().map(TriangleMesh::face_count).sum::<usize>()
        );
        Ok(ModelNode::new(name, meshes))
    }
}

impl ModelReader for GlbReader {
    fn read_model(&self, path: &Path) -> Result<ModelNode> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        Ok(self.read_document(name, &bytes, path.parent())?)
    }

    fn can_read(&self, path: &Path) -> bool {
        use std::io::Read;

        let Ok(mut file) = std::fs::File::open(path) else {
            return false;
        };
        let mut magic = [0u8; 4];
        match file.read_exact(&mut magic) {
            // Binary container, or a JSON document
            Ok(()) => &magic == b"glTF" || magic[0] == b'{',
            Err(_) => false,
        }
    }

    fn format_name(&self) -> &'static str {
        "gltf"
    }

    fn extensions(&self) -> &[&'static str] {
        &["glb", "gltf"]
    }
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Matrix4<f32>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<TriangleMesh>,
) {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!("skipping non-triangle primitive in mesh {:?}", mesh.name());
                continue;
            }
            if let Some(mut triangles) = read_primitive(&primitive, buffers) {
                triangles.transform(&Transform3D::from(world));
                out.push(triangles);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn read_primitive(primitive: &gltf::Primitive<'_>, buffers: &[gltf::buffer::Data]) -> Option<TriangleMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let vertices: Vec<Point3f> = reader
        .read_positions()?
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();
    if vertices.is_empty() {
        return None;
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };
    let faces: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
        .filter(|f| f.iter().all(|&i| i < vertices.len()))
        .collect();

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);

    match reader.read_normals() {
        Some(normals) => {
            mesh.set_normals(normals.map(|n| Vector3f::new(n[0], n[1], n[2])).collect());
        }
        None => {
            let normals = mesh.calculate_vertex_normals();
            mesh.set_normals(normals);
        }
    }

    let base = primitive.material().pbr_metallic_roughness().base_color_factor();
    let color = linear_to_srgb([base[0], base[1], base[2]]);
    mesh.set_colors(vec![color; mesh.vertex_count()]);

    Some(mesh)
}

/// glTF colour factors are linear; vertex colours are stored sRGB-encoded
fn linear_to_srgb(rgb: [f32; 3]) -> Rgb {
    let encode = |c: f32| {
        let c = c.clamp(0.0, 1.0);
        if c <= 0.003_130_8 {
            c * 12.92
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        }
    };
    Rgb::from_f32([encode(rgb[0]), encode(rgb[1]), encode(rgb[2])])
}
