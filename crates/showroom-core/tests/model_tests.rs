// Host-side tests for binary glTF import.

use showroom_core::model::{MaterialId, ModelAsset, ModelError};

/// Minimal GLB: one triangle, u16 indices, one material, translated node.
fn triangle_glb(translate_x: f32) -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0_u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let bin_len = bin.len();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let json = format!(
        r#"{{"asset":{{"version":"2.0"}},
"buffers":[{{"byteLength":{bin_len}}}],
"bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},{{"buffer":0,"byteOffset":36,"byteLength":6}}],
"accessors":[
 {{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},
 {{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}],
"materials":[{{"name":"paint","pbrMetallicRoughness":{{"roughnessFactor":0.25,"metallicFactor":0.5}}}}],
"meshes":[{{"name":"tri","primitives":[{{"attributes":{{"POSITION":0}},"indices":1,"material":0}}]}}],
"nodes":[{{"mesh":0,"translation":[{translate_x},0,0]}}],
"scenes":[{{"nodes":[0]}}],
"scene":0}}"#
    );
    let mut json = json.into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2_u32.to_le_bytes());
    glb.extend_from_slice(&(total as u32).to_le_bytes());
    glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"JSON");
    glb.extend_from_slice(&json);
    glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    glb.extend_from_slice(b"BIN\0");
    glb.extend_from_slice(&bin);
    glb
}

#[test]
fn parses_single_triangle_glb() {
    let asset = ModelAsset::from_glb(&triangle_glb(0.0)).expect("valid glb");
    assert!(!asset.procedural);
    assert_eq!(asset.meshes.len(), 1);
    assert_eq!(asset.triangle_count(), 1);
    let mesh = &asset.meshes[0];
    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.material, Some(MaterialId(0)));
    let mat = asset.material(MaterialId(0)).expect("material");
    assert_eq!(mat.roughness, Some(0.25));
    assert_eq!(mat.metallic, 0.5);
    assert_eq!(mat.env_intensity, None);
}

#[test]
fn node_transforms_are_applied() {
    let asset = ModelAsset::from_glb(&triangle_glb(2.0)).expect("valid glb");
    let xs: Vec<f32> = asset.meshes[0].vertices.iter().map(|v| v.pos[0]).collect();
    assert_eq!(xs, vec![2.0, 3.0, 2.0]);
}

#[test]
fn truncated_glb_is_a_parse_error() {
    let glb = triangle_glb(0.0);
    let err = ModelAsset::from_glb(&glb[..glb.len() / 2]).unwrap_err();
    assert!(matches!(err, ModelError::Parse(_)), "{err:?}");
}
