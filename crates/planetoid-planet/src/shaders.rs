//! WGSL sources compiled into the binary.

use planetoid_render::EmbeddedIncludes;

pub const PLANET_SHADER: &str = "planet.wgsl";
pub const ATMOSPHERE_SHADER: &str = "atmosphere.wgsl";

/// Every shader file by name, entry points and includes alike.
pub static SHADER_SOURCES: EmbeddedIncludes = EmbeddedIncludes(&[
    ("bindings.wgsl", include_str!("shaders/bindings.wgsl")),
    ("noise.wgsl", include_str!("shaders/noise.wgsl")),
    ("scattering.wgsl", include_str!("shaders/scattering.wgsl")),
    (PLANET_SHADER, include_str!("shaders/planet.wgsl")),
    (ATMOSPHERE_SHADER, include_str!("shaders/atmosphere.wgsl")),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoiseLayerUniform, NoiseUniform, ScatteringUniform};
    use planetoid_render::{IncludeSource, preprocess_includes};
    use std::mem::{offset_of, size_of};

    fn expand(file: &str) -> String {
        let source = SHADER_SOURCES.resolve(file).unwrap();
        preprocess_includes(&source, &SHADER_SOURCES).unwrap()
    }

    fn parse(file: &str) -> naga::Module {
        naga::front::wgsl::parse_str(&expand(file))
            .unwrap_or_else(|e| panic!("{file} failed to parse: {e:?}"))
    }

    /// `(member, offset)` pairs and the total size of WGSL struct `name`.
    fn struct_layout(module: &naga::Module, name: &str) -> (Vec<(String, u32)>, u32) {
        module
            .types
            .iter()
            .find_map(|(_, ty)| match &ty.inner {
                naga::TypeInner::Struct { members, span } if ty.name.as_deref() == Some(name) => {
                    let offsets = members
                        .iter()
                        .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                        .collect();
                    Some((offsets, *span))
                }
                _ => None,
            })
            .unwrap_or_else(|| panic!("struct {name} not declared"))
    }

    fn assert_layout(module: &naga::Module, name: &str, size: usize, fields: &[(&str, usize)]) {
        let (members, span) = struct_layout(module, name);
        assert_eq!(span as usize, size, "size of {name}");
        for (field, offset) in fields {
            let found = members
                .iter()
                .find(|(member, _)| member == field)
                .unwrap_or_else(|| panic!("{name}.{field} missing"));
            assert_eq!(found.1 as usize, *offset, "offset of {name}.{field}");
        }
    }

    #[test]
    fn test_entry_shaders_resolve_all_includes() {
        for file in [PLANET_SHADER, ATMOSPHERE_SHADER] {
            let expanded = expand(file);
            assert!(!expanded.contains("#include"), "{file} kept a directive");
            assert_eq!(expanded.matches("struct Scattering").count(), 1);
            assert!(expanded.contains("fn vs_main") && expanded.contains("fn fs_main"));
        }
    }

    #[test]
    fn test_only_planet_pulls_in_noise() {
        assert!(expand(PLANET_SHADER).contains("fn elevation("));
        assert!(!expand(ATMOSPHERE_SHADER).contains("fn perlin3("));
    }

    #[test]
    fn test_entry_shaders_validate() {
        for file in [PLANET_SHADER, ATMOSPHERE_SHADER] {
            let module = parse(file);
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            );
            if let Err(e) = validator.validate(&module) {
                panic!("{file} failed validation: {e:?}");
            }
            for stage in ["vs_main", "fs_main"] {
                assert!(
                    module.entry_points.iter().any(|ep| ep.name == stage),
                    "{file} lacks {stage}"
                );
            }
        }
    }

    #[test]
    fn test_noise_layer_layout_matches_uniform() {
        let module = parse(PLANET_SHADER);
        assert_layout(
            &module,
            "NoiseLayer",
            size_of::<NoiseLayerUniform>(),
            &[
                ("center", offset_of!(NoiseLayerUniform, center)),
                ("strength", offset_of!(NoiseLayerUniform, strength)),
                ("roughness", offset_of!(NoiseLayerUniform, roughness)),
                ("base_roughness", offset_of!(NoiseLayerUniform, base_roughness)),
                ("persistence", offset_of!(NoiseLayerUniform, persistence)),
                ("min_value", offset_of!(NoiseLayerUniform, min_value)),
                ("octaves", offset_of!(NoiseLayerUniform, octaves)),
                ("enabled", offset_of!(NoiseLayerUniform, enabled)),
            ],
        );
    }

    #[test]
    fn test_noise_params_layout_matches_uniform() {
        let module = parse(PLANET_SHADER);
        assert_layout(
            &module,
            "NoiseParams",
            size_of::<NoiseUniform>(),
            &[
                ("layers", offset_of!(NoiseUniform, layers)),
                ("layer_count", offset_of!(NoiseUniform, layer_count)),
                ("seed", offset_of!(NoiseUniform, seed)),
                ("max_elevation", offset_of!(NoiseUniform, max_elevation)),
                ("radius", offset_of!(NoiseUniform, radius)),
                ("displace_on_gpu", offset_of!(NoiseUniform, displace_on_gpu)),
            ],
        );
    }

    #[test]
    fn test_scattering_layout_matches_uniform() {
        let fields = [
            ("camera_position", offset_of!(ScatteringUniform, camera_position)),
            ("camera_height", offset_of!(ScatteringUniform, camera_height)),
            ("light_position", offset_of!(ScatteringUniform, light_position)),
            ("camera_height2", offset_of!(ScatteringUniform, camera_height2)),
            ("light_color", offset_of!(ScatteringUniform, light_color)),
            ("outer_radius", offset_of!(ScatteringUniform, outer_radius)),
            ("inv_wavelength4", offset_of!(ScatteringUniform, inv_wavelength4)),
            ("outer_radius2", offset_of!(ScatteringUniform, outer_radius2)),
            ("inner_radius", offset_of!(ScatteringUniform, inner_radius)),
            ("inner_radius2", offset_of!(ScatteringUniform, inner_radius2)),
            ("kr_esun", offset_of!(ScatteringUniform, kr_esun)),
            ("km_esun", offset_of!(ScatteringUniform, km_esun)),
            ("kr_4pi", offset_of!(ScatteringUniform, kr_4pi)),
            ("km_4pi", offset_of!(ScatteringUniform, km_4pi)),
            ("scale", offset_of!(ScatteringUniform, scale)),
            ("scale_depth", offset_of!(ScatteringUniform, scale_depth)),
            ("scale_over_scale_depth", offset_of!(ScatteringUniform, scale_over_scale_depth)),
            ("g", offset_of!(ScatteringUniform, g)),
            ("g2", offset_of!(ScatteringUniform, g2)),
            ("density_falloff", offset_of!(ScatteringUniform, density_falloff)),
            ("exposure", offset_of!(ScatteringUniform, exposure)),
            ("samples", offset_of!(ScatteringUniform, samples)),
        ];
        for file in [PLANET_SHADER, ATMOSPHERE_SHADER] {
            assert_layout(&parse(file), "Scattering", size_of::<ScatteringUniform>(), &fields);
        }
    }

    #[test]
    fn test_gpu_layer_capacity_matches_uniform() {
        let module = parse(PLANET_SHADER);
        let (members, _) = struct_layout(&module, "NoiseParams");
        let layers = module
            .types
            .iter()
            .find_map(|(_, ty)| match &ty.inner {
                naga::TypeInner::Struct { members: m, .. } if ty.name.as_deref() == Some("NoiseParams") => {
                    Some(m[0].ty)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(members[0].0, "layers");
        match module.types[layers].inner {
            naga::TypeInner::Array {
                size: naga::ArraySize::Constant(count),
                stride,
                ..
            } => {
                assert_eq!(count.get() as usize, crate::MAX_GPU_LAYERS);
                assert_eq!(stride as usize, size_of::<NoiseLayerUniform>());
            }
            ref other => panic!("layers is not a fixed array: {other:?}"),
        }
    }

    /// Host copy of the lattice noise in `noise.wgsl`.
    mod lattice {
        use glam::{IVec3, Vec3};

        fn hash3(cell: IVec3) -> u32 {
            let h = (cell.x as u32).wrapping_mul(73_856_093)
                ^ (cell.y as u32).wrapping_mul(19_349_663)
                ^ (cell.z as u32).wrapping_mul(83_492_791);
            let h = (h ^ (h >> 13)).wrapping_mul(1_274_126_177);
            h ^ (h >> 16)
        }

        fn grad(h: u32, p: Vec3) -> f32 {
            let k = h & 15;
            let u = if k < 8 { p.x } else { p.y };
            let v = if k < 4 {
                p.y
            } else if k == 12 || k == 14 {
                p.x
            } else {
                p.z
            };
            let u = if k & 1 == 0 { u } else { -u };
            let v = if k & 2 == 0 { v } else { -v };
            u + v
        }

        fn mix(a: f32, b: f32, t: f32) -> f32 {
            a + (b - a) * t
        }

        pub fn perlin3(p: Vec3) -> f32 {
            let base = p.floor();
            let i = base.as_ivec3();
            let f = p - base;
            let w = f * f * f * (f * (f * 6.0 - 15.0) + 10.0);
            let corner = |dx: i32, dy: i32, dz: i32| {
                let offset = IVec3::new(dx, dy, dz);
                grad(hash3(i + offset), f - offset.as_vec3())
            };

            let x00 = mix(corner(0, 0, 0), corner(1, 0, 0), w.x);
            let x10 = mix(corner(0, 1, 0), corner(1, 1, 0), w.x);
            let x01 = mix(corner(0, 0, 1), corner(1, 0, 1), w.x);
            let x11 = mix(corner(0, 1, 1), corner(1, 1, 1), w.x);
            mix(mix(x00, x10, w.y), mix(x01, x11, w.y), w.z).clamp(-1.0, 1.0)
        }
    }

    const ELEVATION_COMPUTE: &str = r#"
#include "bindings.wgsl"
#include "noise.wgsl"

@group(1) @binding(0) var<storage, read> points: array<vec4<f32>>;
@group(1) @binding(1) var<storage, read_write> heights: array<f32>;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {
    if (id.x >= arrayLength(&heights)) {
        return;
    }
    heights[id.x] = elevation(points[id.x].xyz);
}
"#;

    fn parity_shape() -> planetoid_terrain::ShapeConfig {
        use glam::Vec3;
        use planetoid_terrain::{NoiseLayer, ShapeConfig};

        let mut shape = ShapeConfig::new(1.0, 8);
        shape.seed = 2.5;
        shape.add_layer(NoiseLayer {
            min_value: 0.2,
            strength: 0.4,
            octaves: 4,
            ..Default::default()
        });
        shape.add_layer(NoiseLayer {
            base_roughness: 2.0,
            roughness: 2.5,
            persistence: 0.4,
            min_value: 0.6,
            strength: 0.7,
            center: Vec3::new(0.3, -1.2, 4.0),
            ..Default::default()
        });
        shape.add_layer(NoiseLayer {
            strength: 3.0,
            min_value: 0.0,
            enabled: false,
            ..Default::default()
        });
        shape
    }

    fn parity_points() -> Vec<glam::Vec3> {
        (0..48)
            .map(|i| {
                let t = i as f32 * 0.37;
                glam::Vec3::new(t.sin(), (t * 1.7).cos(), (t * 0.6).sin() - 0.2).normalize()
            })
            .collect()
    }

    #[test]
    fn test_host_lattice_noise_is_bounded_and_continuous() {
        for p in parity_points() {
            let n = lattice::perlin3(p * 3.3);
            assert!((-1.0..=1.0).contains(&n));
            let nudged = lattice::perlin3(p * 3.3 + glam::Vec3::splat(1e-4));
            assert!((n - nudged).abs() < 1e-2);
        }
        // Lattice corners are zero crossings.
        assert_eq!(lattice::perlin3(glam::Vec3::new(3.0, -2.0, 7.0)), 0.0);
    }

    fn compute_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .ok()?;
            let caps = adapter.get_downlevel_capabilities();
            if !caps.flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
                return None;
            }
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }

    #[test]
    fn test_gpu_elevation_matches_cpu_formula() {
        use wgpu::util::DeviceExt;

        let Some((device, queue)) = compute_device() else {
            return;
        };
        let shape = parity_shape();
        let points = parity_points();

        let mut library = planetoid_render::ShaderLibrary::new();
        let module = library
            .load_from_source(&device, "elevation-compute", ELEVATION_COMPUTE, &SHADER_SOURCES)
            .unwrap();
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("elevation-compute"),
            layout: None,
            module: &module,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        let noise = NoiseUniform::from_shape(&shape, 0.25, true);
        let noise_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("noise"),
            contents: bytemuck::bytes_of(&noise),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let padded: Vec<[f32; 4]> = points.iter().map(|p| p.extend(0.0).to_array()).collect();
        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("points"),
            contents: bytemuck::cast_slice(&padded),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let size = (points.len() * size_of::<f32>()) as wgpu::BufferAddress;
        let height_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("heights"),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("heights-readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let noise_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("noise"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[wgpu::BindGroupEntry {
                binding: 2,
                resource: noise_buffer.as_entire_binding(),
            }],
        });
        let io_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("elevation-io"),
            layout: &pipeline.get_bind_group_layout(1),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: point_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: height_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("elevation-compute"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("elevation-compute"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &noise_group, &[]);
            pass.set_bind_group(1, &io_group, &[]);
            pass.dispatch_workgroups(1, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&height_buffer, 0, &readback, 0, size);
        queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        });
        rx.recv().unwrap().unwrap();
        let view = slice.get_mapped_range();
        let gpu: Vec<f32> = bytemuck::cast_slice(&view[..]).to_vec();

        let mut any_raised = false;
        for (point, gpu_height) in points.iter().zip(&gpu) {
            let cpu_height = planetoid_terrain::elevation_with(*point, &shape, |q| {
                f64::from(lattice::perlin3(q.as_vec3()))
            });
            any_raised |= cpu_height > 0.0;
            assert!(
                (cpu_height - gpu_height).abs() < 1e-3,
                "elevation at {point}: cpu {cpu_height}, gpu {gpu_height}"
            );
        }
        assert!(any_raised, "parity shape produced a flat planet");
    }
}
