//! CPU-side model data: binary glTF import and the procedural fallback rig.

use glam::{Mat3, Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model fetch failed: {0}")]
    Fetch(String),
    #[error("glTF parse failed: {0}")]
    Parse(String),
    #[error("external buffer not supported: {0}")]
    ExternalBuffer(String),
    #[error("GLB has no binary chunk")]
    MissingBinaryChunk,
    #[error("model contains no geometry")]
    Empty,
}

/// Identity of a material instance inside one model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Material used by primitives that do not reference one.
pub const DEFAULT_MATERIAL: MaterialId = MaterialId(u32::MAX);

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub id: MaterialId,
    pub name: String,
    pub base_color: Vec3,
    pub metallic: f32,
    pub roughness: Option<f32>,
    pub env_intensity: Option<f32>,
    pub clearcoat: f32,
}

impl MaterialDesc {
    fn fallback_default() -> Self {
        Self {
            id: DEFAULT_MATERIAL,
            name: "default".into(),
            base_color: Vec3::splat(0.8),
            metallic: 0.0,
            roughness: None,
            env_intensity: None,
            clearcoat: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct CpuMesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Option<MaterialId>,
}

impl CpuMesh {
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let base = self.vertices.len() as u32;
        for c in corners {
            self.vertices.push(Vertex {
                pos: c.to_array(),
                nrm: normal.to_array(),
            });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.vertices.iter().map(|v| Vec3::from_array(v.pos));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Meshes plus the materials they reference.
#[derive(Clone, Debug, Default)]
pub struct ModelAsset {
    pub meshes: Vec<CpuMesh>,
    pub materials: Vec<MaterialDesc>,
    pub procedural: bool,
}

impl ModelAsset {
    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }

    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.meshes
            .iter()
            .filter_map(CpuMesh::bounds)
            .reduce(|(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)))
    }

    /// Uniformly scale so the longest horizontal side equals `length`, center
    /// on the origin and rest the model on y = 0.
    pub fn fit_to_length(&mut self, length: f32) {
        let Some((lo, hi)) = self.bounds() else {
            return;
        };
        let size = hi - lo;
        let longest = size.x.max(size.z);
        if longest <= f32::EPSILON {
            return;
        }
        let scale = length / longest;
        let offset = Vec3::new(-(lo.x + hi.x) * 0.5, -lo.y, -(lo.z + hi.z) * 0.5);
        for mesh in &mut self.meshes {
            for v in &mut mesh.vertices {
                v.pos = ((Vec3::from_array(v.pos) + offset) * scale).to_array();
            }
        }
    }

    /// Parse a binary glTF (`.glb`) with embedded buffers.
    pub fn from_glb(bytes: &[u8]) -> Result<Self, ModelError> {
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| ModelError::Parse(e.to_string()))?;
        let blob = gltf.blob.as_deref();
        let buffers = gltf
            .buffers()
            .map(|b| match b.source() {
                gltf::buffer::Source::Bin => blob.ok_or(ModelError::MissingBinaryChunk),
                gltf::buffer::Source::Uri(uri) => Err(ModelError::ExternalBuffer(uri.to_string())),
            })
            .collect::<Result<Vec<&[u8]>, _>>()?;

        let mut asset = ModelAsset::default();
        for m in gltf.materials() {
            let Some(index) = m.index() else { continue };
            let pbr = m.pbr_metallic_roughness();
            let [r, g, b, _] = pbr.base_color_factor();
            asset.materials.push(MaterialDesc {
                id: MaterialId(index as u32),
                name: m.name().unwrap_or("material").to_string(),
                base_color: Vec3::new(r, g, b),
                metallic: pbr.metallic_factor(),
                roughness: Some(pbr.roughness_factor()),
                env_intensity: None,
                clearcoat: 0.0,
            });
        }

        let scene = gltf.default_scene().or_else(|| gltf.scenes().next());
        match scene {
            Some(scene) => {
                for node in scene.nodes() {
                    collect_node(&node, Mat4::IDENTITY, &buffers, &mut asset.meshes);
                }
            }
            None => {
                for mesh in gltf.meshes() {
                    collect_mesh(&mesh, Mat4::IDENTITY, &buffers, &mut asset.meshes);
                }
            }
        }

        asset.meshes.retain(|m| !m.indices.is_empty());
        if asset.meshes.is_empty() {
            return Err(ModelError::Empty);
        }
        if asset.meshes.iter().any(|m| m.material.is_none())
            && asset.material(DEFAULT_MATERIAL).is_none()
        {
            asset.materials.push(MaterialDesc::fallback_default());
        }
        for mesh in &mut asset.meshes {
            mesh.material.get_or_insert(DEFAULT_MATERIAL);
        }
        log::info!(
            "[model] parsed glb meshes={} materials={} tris={}",
            asset.meshes.len(),
            asset.materials.len(),
            asset.triangle_count()
        );
        Ok(asset)
    }

    /// Placeholder car on a turntable built from boxes and cylinders.
    pub fn procedural_car_rig() -> Self {
        const PAINT: MaterialId = MaterialId(0);
        const GLASS: MaterialId = MaterialId(1);
        const TIRE: MaterialId = MaterialId(2);
        const CHROME: MaterialId = MaterialId(3);
        const PLATFORM: MaterialId = MaterialId(4);

        let mut meshes = vec![
            box_mesh("body", Vec3::new(0.0, 0.55, 0.0), Vec3::new(4.2, 0.6, 1.8), PAINT),
            box_mesh("hood", Vec3::new(1.3, 0.9, 0.0), Vec3::new(1.4, 0.12, 1.7), PAINT),
            box_mesh("cabin", Vec3::new(-0.25, 1.1, 0.0), Vec3::new(2.0, 0.55, 1.55), GLASS),
            box_mesh("splitter", Vec3::new(2.15, 0.3, 0.0), Vec3::new(0.2, 0.08, 1.9), CHROME),
            cylinder_mesh("platform", Vec3::new(0.0, 0.04, 0.0), 3.4, 0.04, Axis::Y, 48, PLATFORM),
        ];
        for (i, (x, z)) in [(1.35, 0.95), (1.35, -0.95), (-1.35, 0.95), (-1.35, -0.95)]
            .into_iter()
            .enumerate()
        {
            let center = Vec3::new(x, 0.42, z);
            meshes.push(cylinder_mesh(
                &format!("tire_{i}"),
                center,
                0.38,
                0.14,
                Axis::Z,
                24,
                TIRE,
            ));
            let hub = center + Vec3::new(0.0, 0.0, 0.15_f32.copysign(z));
            meshes.push(cylinder_mesh(&format!("rim_{i}"), hub, 0.22, 0.02, Axis::Z, 16, CHROME));
        }

        let mat = |id, name: &str, color: Vec3, metallic, roughness| MaterialDesc {
            id,
            name: name.to_string(),
            base_color: color,
            metallic,
            roughness: Some(roughness),
            env_intensity: Some(1.0),
            clearcoat: 0.0,
        };
        let materials = vec![
            mat(PAINT, "paint", Vec3::new(0.62, 0.07, 0.05), 0.4, 0.35),
            mat(GLASS, "glass", Vec3::new(0.05, 0.07, 0.09), 0.1, 0.08),
            mat(TIRE, "tire", Vec3::splat(0.04), 0.0, 0.85),
            mat(CHROME, "chrome", Vec3::splat(0.9), 1.0, 0.12),
            mat(PLATFORM, "platform", Vec3::splat(0.16), 0.2, 0.6),
        ];
        Self {
            meshes,
            materials,
            procedural: true,
        }
    }
}

fn collect_node(node: &gltf::Node, parent: Mat4, buffers: &[&[u8]], out: &mut Vec<CpuMesh>) {
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let world = parent * local;
    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        collect_node(&child, world, buffers, out);
    }
}

fn collect_mesh(mesh: &gltf::Mesh, world: Mat4, buffers: &[&[u8]], out: &mut Vec<CpuMesh>) {
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = prim.reader(|b| buffers.get(b.index()).copied());
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(it) => it.collect(),
            None => vec![[0.0, 1.0, 0.0]; positions.len()],
        };
        let vertices = positions
            .iter()
            .zip(normals.iter().chain(std::iter::repeat(&[0.0, 1.0, 0.0])))
            .map(|(p, n)| Vertex {
                pos: world.transform_point3(Vec3::from_array(*p)).to_array(),
                nrm: (normal_matrix * Vec3::from_array(*n))
                    .normalize_or_zero()
                    .to_array(),
            })
            .collect::<Vec<_>>();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(idx) => idx.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };
        let vertex_count = vertices.len() as u32;
        if indices.iter().any(|&i| i >= vertex_count) {
            log::warn!("[model] skipping primitive with out-of-range indices");
            continue;
        }
        out.push(CpuMesh {
            name: mesh.name().unwrap_or("mesh").to_string(),
            vertices,
            indices,
            material: prim.material().index().map(|i| MaterialId(i as u32)),
        });
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Y,
    Z,
}

fn box_mesh(name: &str, center: Vec3, size: Vec3, material: MaterialId) -> CpuMesh {
    let h = size * 0.5;
    let mut m = CpuMesh {
        name: name.to_string(),
        material: Some(material),
        ..Default::default()
    };
    let c = |x: f32, y: f32, z: f32| center + Vec3::new(x * h.x, y * h.y, z * h.z);
    m.push_quad([c(1., -1., 1.), c(1., -1., -1.), c(1., 1., -1.), c(1., 1., 1.)], Vec3::X);
    m.push_quad([c(-1., -1., -1.), c(-1., -1., 1.), c(-1., 1., 1.), c(-1., 1., -1.)], Vec3::NEG_X);
    m.push_quad([c(-1., 1., 1.), c(1., 1., 1.), c(1., 1., -1.), c(-1., 1., -1.)], Vec3::Y);
    m.push_quad([c(-1., -1., -1.), c(1., -1., -1.), c(1., -1., 1.), c(-1., -1., 1.)], Vec3::NEG_Y);
    m.push_quad([c(-1., -1., 1.), c(1., -1., 1.), c(1., 1., 1.), c(-1., 1., 1.)], Vec3::Z);
    m.push_quad([c(1., -1., -1.), c(-1., -1., -1.), c(-1., 1., -1.), c(1., 1., -1.)], Vec3::NEG_Z);
    m
}

fn cylinder_mesh(
    name: &str,
    center: Vec3,
    radius: f32,
    half_len: f32,
    axis: Axis,
    segments: u32,
    material: MaterialId,
) -> CpuMesh {
    // Build around +Y, then swizzle into the requested axis.
    let orient = |v: Vec3| match axis {
        Axis::Y => v,
        Axis::Z => Vec3::new(v.x, -v.z, v.y),
    };
    let mut m = CpuMesh {
        name: name.to_string(),
        material: Some(material),
        ..Default::default()
    };
    let ring = |i: u32| {
        let a = i as f32 / segments as f32 * std::f32::consts::TAU;
        Vec3::new(a.cos(), 0.0, a.sin())
    };
    for i in 0..segments {
        let (d0, d1) = (ring(i), ring(i + 1));
        let n = orient(((d0 + d1) * 0.5).normalize());
        let p = |d: Vec3, y: f32| center + orient(d * radius + Vec3::Y * y);
        m.push_quad([p(d0, -half_len), p(d0, half_len), p(d1, half_len), p(d1, -half_len)], n);
    }
    for (y, normal) in [(half_len, Vec3::Y), (-half_len, Vec3::NEG_Y)] {
        let base = m.vertices.len() as u32;
        let n = orient(normal).to_array();
        m.vertices.push(Vertex {
            pos: (center + orient(Vec3::Y * y)).to_array(),
            nrm: n,
        });
        for i in 0..=segments {
            m.vertices.push(Vertex {
                pos: (center + orient(ring(i) * radius + Vec3::Y * y)).to_array(),
                nrm: n,
            });
        }
        for i in 0..segments {
            let (a, b) = (base + 1 + i, base + 2 + i);
            if y > 0.0 {
                m.indices.extend_from_slice(&[base, b, a]);
            } else {
                m.indices.extend_from_slice(&[base, a, b]);
            }
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_rig_has_geometry_and_shared_materials() {
        let rig = ModelAsset::procedural_car_rig();
        assert!(rig.procedural);
        assert!(rig.triangle_count() > 100);
        let tires = rig
            .meshes
            .iter()
            .filter(|m| m.material == Some(MaterialId(2)))
            .count();
        assert_eq!(tires, 4);
        for mesh in &rig.meshes {
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{}", mesh.name);
            assert!(rig.material(mesh.material.unwrap()).is_some());
        }
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        assert!(ModelAsset::from_glb(b"not a model").is_err());
        assert!(ModelAsset::from_glb(&[]).is_err());
    }

    #[test]
    fn fit_to_length_rests_on_ground() {
        let mut rig = ModelAsset::procedural_car_rig();
        rig.fit_to_length(4.0);
        let (lo, hi) = rig.bounds().unwrap();
        assert!(lo.y.abs() < 1e-4);
        assert!(((hi.x - lo.x).max(hi.z - lo.z) - 4.0).abs() < 1e-3);
    }
}
