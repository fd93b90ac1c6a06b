use crate::constants::{CLEARCOAT_FLOOR, ENV_INTENSITY_BOOST};
use crate::model::{MaterialDesc, MaterialId};
use fnv::FnvHashMap;
use glam::Vec3;

/// Live, per-frame material parameters consumed by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialParams {
    pub base_color: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub env_intensity: f32,
    pub clearcoat: f32,
}

/// One registered material: immutable baseline plus eased live values.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialRegistryEntry {
    pub id: MaterialId,
    pub name: String,
    pub base_roughness: Option<f32>,
    pub base_env_intensity: Option<f32>,
    pub live: MaterialParams,
}

/// Materials indexed by identity; each instance is registered at most once.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    entries: Vec<MaterialRegistryEntry>,
    by_id: FnvHashMap<MaterialId, usize>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material with the boosted visual baseline. Returns the slot
    /// index, or `None` when the material is already registered.
    pub fn register(&mut self, desc: &MaterialDesc) -> Option<usize> {
        if self.by_id.contains_key(&desc.id) {
            return None;
        }
        let live = MaterialParams {
            base_color: desc.base_color,
            metallic: desc.metallic.clamp(0.0, 1.0),
            roughness: desc.roughness.unwrap_or(0.5).clamp(0.0, 1.0),
            env_intensity: (desc.env_intensity.unwrap_or(1.0) * ENV_INTENSITY_BOOST).max(1.0),
            clearcoat: desc.clearcoat.max(CLEARCOAT_FLOOR),
        };
        let slot = self.entries.len();
        self.entries.push(MaterialRegistryEntry {
            id: desc.id,
            name: desc.name.clone(),
            base_roughness: desc.roughness,
            base_env_intensity: desc.env_intensity,
            live,
        });
        self.by_id.insert(desc.id, slot);
        Some(slot)
    }

    pub fn slot_of(&self, id: MaterialId) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialRegistryEntry> {
        self.slot_of(id).map(|i| &self.entries[i])
    }

    pub fn entries(&self) -> &[MaterialRegistryEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [MaterialRegistryEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        self.by_id.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(id: u32, roughness: Option<f32>) -> MaterialDesc {
        MaterialDesc {
            id: MaterialId(id),
            name: format!("m{id}"),
            base_color: Vec3::ONE,
            metallic: 0.5,
            roughness,
            env_intensity: None,
            clearcoat: 0.0,
        }
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut reg = MaterialRegistry::new();
        assert_eq!(reg.register(&desc(3, Some(0.4))), Some(0));
        assert_eq!(reg.register(&desc(3, Some(0.9))), None);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(MaterialId(3)).unwrap().base_roughness, Some(0.4));
    }

    #[test]
    fn registration_boosts_visual_baseline_only() {
        let mut reg = MaterialRegistry::new();
        reg.register(&desc(1, Some(0.3)));
        let e = reg.get(MaterialId(1)).unwrap();
        assert!(e.live.clearcoat >= CLEARCOAT_FLOOR);
        assert!(e.live.env_intensity > 1.0);
        assert_eq!(e.base_env_intensity, None);
        assert_eq!(e.live.roughness, 0.3);
    }
}
