//! Builds tiny GLB files in memory so reader tests do not need assets on disk

use std::path::{Path, PathBuf};

/// Knobs for the single-triangle fixture
#[derive(Debug, Clone)]
pub struct GlbFixture {
    pub translation: [f32; 3],
    pub base_color: Option<[f32; 4]>,
}

impl Default for GlbFixture {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 0.0],
            base_color: None,
        }
    }
}

/// Positions then u16 indices for the fixture triangle, unpadded
fn triangle_buffer() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

/// glTF JSON for the fixture triangle. `buffer` is the buffer object, which
/// carries a `uri` for separate-file documents and none for GLB.
fn triangle_json(fixture: &GlbFixture, buffer: &str) -> String {
    let (material, materials) = match fixture.base_color {
        Some(c) => (
            r#","material":0"#.to_string(),
            format!(
                r#","materials":[{{"pbrMetallicRoughness":{{"baseColorFactor":[{},{},{},{}]}}}}]"#,
                c[0], c[1], c[2], c[3]
            ),
        ),
        None => (String::new(), String::new()),
    };
    let t = fixture.translation;
    format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
            r#""nodes":[{{"mesh":0,"translation":[{},{},{}]}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1{}}}]}}]{},"#,
            r#""buffers":[{}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},{{"buffer":0,"byteOffset":36,"byteLength":6}}],"#,
            r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
            r#"{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]}}"#
        ),
        t[0], t[1], t[2], material, materials, buffer
    )
}

/// A GLB with one node holding one triangle at (0,0,0), (1,0,0), (0,1,0)
pub fn triangle_glb(fixture: &GlbFixture) -> Vec<u8> {
    let mut bin = triangle_buffer();
    let bin_len = bin.len();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let mut json = triangle_json(fixture, &format!(r#"{{"byteLength":{}}}"#, bin_len)).into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}

/// The same triangle as a `.gltf` document plus the bytes of the sibling
/// buffer file it references by `bin_name`
pub fn triangle_gltf_with_buffer(fixture: &GlbFixture, bin_name: &str) -> (Vec<u8>, Vec<u8>) {
    let bin = triangle_buffer();
    let buffer = format!(r#"{{"uri":"{}","byteLength":{}}}"#, bin_name, bin.len());
    (triangle_json(fixture, &buffer).into_bytes(), bin)
}

/// Scratch directory removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("vitrine-io-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a file inside the directory and return its path
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
