use crate::constants::{BLOOM_STRENGTH, BLOOM_THRESHOLD, EXPOSURE};
use crate::core::SceneController;
use web_sys as web;

mod helpers;
mod post;
mod scene;
mod targets;

use post::{PostBindGroups, PostResources, PostUniforms};
use scene::{MaterialUniform, SceneResources};
use targets::RenderTargets;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: SceneResources,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    bind_groups: PostBindGroups,
    bloom_enabled: bool,
    width: u32,
    height: u32,
    disposed: bool,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        scene: &SceneController,
        bloom_enabled: bool,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits: older WebGPU implementations reject unknown fields.
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);
        let scene = scene::create_scene_resources(&device, scene);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, format);
        let bind_groups = post::create_bind_groups(&device, &post, &linear_sampler, &targets);
        log::info!(
            "[gpu] ready {}x{} format={:?} meshes={} bloom={}",
            width,
            height,
            format,
            scene.meshes.len(),
            bloom_enabled
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene,
            targets,
            linear_sampler,
            post,
            bind_groups,
            bloom_enabled,
            width,
            height,
            disposed: false,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if self.disposed || width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
            self.bind_groups = post::create_bind_groups(
                &self.device,
                &self.post,
                &self.linear_sampler,
                &self.targets,
            );
        }
    }

    fn post_uniforms(&self, blur_dir: [f32; 2]) -> PostUniforms {
        let (bw, bh) = targets::bloom_size(self.width, self.height);
        PostUniforms {
            resolution: [bw as f32, bh as f32],
            blur_dir,
            bloom_strength: if self.bloom_enabled { BLOOM_STRENGTH } else { 0.0 },
            threshold: BLOOM_THRESHOLD,
            exposure: EXPOSURE,
            _pad: 0.0,
        }
    }

    /// Draw the scene as it stands after the controller's latest update.
    pub fn render(&mut self, scene: &SceneController, lens_glow: f32) -> Result<(), wgpu::SurfaceError> {
        if self.disposed {
            return Ok(());
        }
        let globals = scene::pack_globals(scene, lens_glow);
        self.queue
            .write_buffer(&self.scene.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let glow = scene.hover().glow;
        for (entry, gpu) in scene
            .materials()
            .entries()
            .iter()
            .zip(self.scene.materials.iter())
        {
            let u = MaterialUniform::pack(&entry.live, glow);
            self.queue.write_buffer(&gpu.buffer, 0, bytemuck::bytes_of(&u));
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: lit model → HDR
        let bg = scene.background();
        let clear = wgpu::Color {
            r: bg.x as f64,
            g: bg.y as f64,
            b: bg.z as f64,
            a: 1.0,
        };
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.scene.pipeline);
            rpass.set_bind_group(0, &self.scene.globals_bind_group, &[]);
            for mesh in &self.scene.meshes {
                let Some(material) = mesh.material_slot.and_then(|s| self.scene.materials.get(s))
                else {
                    continue;
                };
                rpass.set_bind_group(1, &material.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // Uniform writes land before the encoder is submitted, so every post
        // pass of one frame sees the same values. Blur direction therefore
        // goes through separate submissions.
        if self.bloom_enabled {
            post::write_post_uniforms(&self.queue, &self.post.uniform_buffer, self.post_uniforms([0.0, 0.0]));
            post::blit(
                &mut encoder,
                "bright_pass",
                &self.targets.bloom_a_view,
                wgpu::Color::BLACK,
                &self.post.bright_pipeline,
                &self.bind_groups.from_hdr,
                None,
            );
            self.queue.submit(Some(encoder.finish()));

            post::write_post_uniforms(&self.queue, &self.post.uniform_buffer, self.post_uniforms([1.0, 0.0]));
            let mut blur = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blur_h"),
            });
            post::blit(
                &mut blur,
                "blur_h",
                &self.targets.bloom_b_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.bind_groups.from_bloom_a,
                None,
            );
            self.queue.submit(Some(blur.finish()));

            post::write_post_uniforms(&self.queue, &self.post.uniform_buffer, self.post_uniforms([0.0, 1.0]));
            let mut blur = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blur_v"),
            });
            post::blit(
                &mut blur,
                "blur_v",
                &self.targets.bloom_a_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.bind_groups.from_bloom_b,
                None,
            );
            self.queue.submit(Some(blur.finish()));

            encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("composite"),
                });
        }

        // Final pass: tone-map HDR (+ bloom) to the swapchain
        post::write_post_uniforms(&self.queue, &self.post.uniform_buffer, self.post_uniforms([0.0, 0.0]));
        post::blit(
            &mut encoder,
            "composite",
            &view,
            clear,
            &self.post.composite_pipeline,
            &self.bind_groups.from_hdr,
            Some(&self.bind_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Release GPU buffers and textures. Safe to call more than once.
    pub fn dispose(&mut self) -> bool {
        if std::mem::replace(&mut self.disposed, true) {
            return false;
        }
        self.scene.destroy();
        self.targets.destroy();
        self.post.uniform_buffer.destroy();
        log::info!("[gpu] disposed");
        true
    }
}
