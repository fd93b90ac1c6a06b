use crate::core::{MaterialParams, SceneController, Vertex};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) camera_pos: [f32; 4],
    pub(crate) key_dir: [f32; 4],
    pub(crate) key_color: [f32; 4],
    pub(crate) fill_dir: [f32; 4],
    pub(crate) fill_color: [f32; 4],
    pub(crate) rim_dir: [f32; 4],
    pub(crate) rim_color: [f32; 4],
    pub(crate) env_zenith: [f32; 4],
    pub(crate) env_horizon: [f32; 4],
    pub(crate) env_ground: [f32; 4],
    pub(crate) params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct MaterialUniform {
    pub(crate) base_color: [f32; 4],
    pub(crate) surface: [f32; 4],
}

impl MaterialUniform {
    pub(crate) fn pack(p: &MaterialParams, glow: f32) -> Self {
        Self {
            base_color: p.base_color.extend(p.metallic).to_array(),
            surface: [p.roughness, p.env_intensity, p.clearcoat, glow],
        }
    }
}

pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    /// Registry slot of the mesh material; unknown materials are skipped.
    pub(crate) material_slot: Option<usize>,
}

pub(crate) struct GpuMaterial {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) struct SceneResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) globals_buffer: wgpu::Buffer,
    pub(crate) globals_bind_group: wgpu::BindGroup,
    pub(crate) meshes: Vec<GpuMesh>,
    pub(crate) materials: Vec<GpuMaterial>,
}

/// Upload geometry and build one uniform per registered material.
pub(crate) fn create_scene_resources(device: &wgpu::Device, scene: &SceneController) -> SceneResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
    });
    let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_globals_bgl"),
        entries: &[super::helpers::uniform_layout_entry(
            0,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        )],
    });
    let material_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_material_bgl"),
        entries: &[super::helpers::uniform_layout_entry(0, wgpu::ShaderStages::FRAGMENT)],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&globals_bgl, &material_bgl],
        push_constant_ranges: &[],
    });
    let attributes = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("scene_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            // Imported meshes do not guarantee consistent winding.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: super::helpers::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: super::helpers::HDR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_globals"),
        size: std::mem::size_of::<Globals>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_globals_bg"),
        layout: &globals_bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: globals_buffer.as_entire_binding(),
        }],
    });

    let materials = scene
        .materials()
        .entries()
        .iter()
        .map(|entry| {
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&entry.name),
                contents: bytemuck::bytes_of(&MaterialUniform::pack(&entry.live, 0.0)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("scene_material_bg"),
                layout: &material_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            GpuMaterial { buffer, bind_group }
        })
        .collect();

    let meshes = scene
        .meshes()
        .iter()
        .map(|mesh| GpuMesh {
            vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&mesh.name),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&mesh.name),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: mesh.indices.len() as u32,
            material_slot: mesh.material.and_then(|id| scene.materials().slot_of(id)),
        })
        .collect();

    SceneResources {
        pipeline,
        globals_buffer,
        globals_bind_group,
        meshes,
        materials,
    }
}

/// Pack camera, model transform, lights and environment for one frame.
pub(crate) fn pack_globals(scene: &SceneController, lens_glow: f32) -> Globals {
    let cam = scene.camera();
    let lights = scene.lights();
    let dir = |l: &crate::core::Light| l.direction.normalize_or_zero().extend(l.intensity).to_array();
    let color = |l: &crate::core::Light| l.color.extend(1.0).to_array();
    let bg = scene.background();
    let (zenith, horizon, ground) = match scene.env() {
        Some(env) => (env.zenith, env.horizon, env.ground),
        None => (bg, bg, bg),
    };
    Globals {
        view_proj: cam.view_projection().to_cols_array_2d(),
        model: scene.model_matrix().to_cols_array_2d(),
        camera_pos: cam.eye.extend(1.0).to_array(),
        key_dir: dir(&lights.key),
        key_color: color(&lights.key),
        fill_dir: dir(&lights.fill),
        fill_color: color(&lights.fill),
        rim_dir: dir(&lights.rim),
        rim_color: color(&lights.rim),
        env_zenith: zenith.extend(lights.ambient).to_array(),
        env_horizon: horizon.extend(0.0).to_array(),
        env_ground: ground.extend(0.0).to_array(),
        params: [
            lens_glow,
            crate::constants::SPECULAR_POWER_MIN,
            crate::constants::SPECULAR_POWER_MAX,
            0.0,
        ],
    }
}

impl SceneResources {
    pub(crate) fn destroy(&self) {
        self.globals_buffer.destroy();
        for m in &self.meshes {
            m.vertex_buffer.destroy();
            m.index_buffer.destroy();
        }
        for m in &self.materials {
            m.buffer.destroy();
        }
    }
}
