// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use pm_core::{ComputeBackend, HeritageMap, HeritageResult, KernelVariant};
use tracing::debug;
use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, BufferUsages, ComputePipeline, Device, MapMode,
    PipelineLayout, Queue,
};

use crate::error::{WgpuBackendError, BACKEND_NAME};
use crate::shader::{self, WORKGROUP_SIZE};

/// Workgroups per dispatch dimension guaranteed by the default limits.
const MAX_GROUPS_PER_DIM: u32 = 65_535;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ApplyParams {
    cells: u32,
    row_stride: u32,
    _pad: [u32; 2],
}

/// Device-resident copy of a heritage map with the buffers one step needs.
///
/// The field buffers are shared by every `execute` on this handle, so a
/// step holds `in_flight` from the input write until staging is unmapped.
#[derive(Debug)]
pub struct WgpuMapHandle {
    cells: usize,
    groups: (u32, u32),
    in_flight: Mutex<()>,
    input: Buffer,
    output: Buffer,
    staging: Buffer,
    bind_group: BindGroup,
    // Bound through `bind_group`; kept alive with it.
    _stencil: Buffer,
    _params: Buffer,
}

/// Applies heritage maps with a WGSL compute kernel, one invocation per
/// target cell.
pub struct WgpuBackend {
    device: Arc<Device>,
    queue: Arc<Queue>,
    bind_layout: BindGroupLayout,
    pipeline_layout: PipelineLayout,
    pipelines: Mutex<HashMap<KernelVariant, Arc<ComputePipeline>>>,
}

impl WgpuBackend {
    /// Wraps a ready-made device and queue.
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pm.backend.wgpu.bind_layout"),
            entries: &[
                storage(0, true),
                storage(1, true),
                storage(2, false),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pm.backend.wgpu.pipeline_layout"),
            bind_group_layouts: &[&bind_layout],
            push_constant_ranges: &[],
        });
        Self {
            device,
            queue,
            bind_layout,
            pipeline_layout,
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    /// Discovers a high-performance adapter and opens a device on it.
    pub fn request() -> Result<Self, WgpuBackendError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(async {
            instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::HighPerformance,
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
        })
        .ok_or(WgpuBackendError::NoAdapter)?;

        let (device, queue) = pollster::block_on(async {
            adapter
                .request_device(
                    &wgpu::DeviceDescriptor {
                        label: Some("pm.backend.wgpu.device"),
                        required_features: wgpu::Features::empty(),
                        required_limits: adapter.limits(),
                    },
                    None,
                )
                .await
        })
        .map_err(|err| WgpuBackendError::Device(err.to_string()))?;

        let info = adapter.get_info();
        debug!(adapter = %info.name, backend = ?info.backend, "selected wgpu adapter");
        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Pipeline for `variant`, compiled on first use.
    fn pipeline_for(&self, variant: KernelVariant) -> Arc<ComputePipeline> {
        let mut pipelines = self
            .pipelines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pipeline) = pipelines.get(&variant) {
            return Arc::clone(pipeline);
        }

        let label = shader::label(variant);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(shader::shader_source(variant).into()),
            });
        let pipeline = Arc::new(self.device.create_compute_pipeline(
            &wgpu::ComputePipelineDescriptor {
                label: Some(&label),
                layout: Some(&self.pipeline_layout),
                module: &module,
                entry_point: "main",
            },
        ));
        debug!(%variant, "compiled heritage apply pipeline");
        pipelines.insert(variant, Arc::clone(&pipeline));
        pipeline
    }

    fn field_buffer(&self, label: &str, cells: usize, usage: BufferUsages) -> Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (cells * std::mem::size_of::<f32>()) as u64,
            usage,
            mapped_at_creation: false,
        })
    }

    fn read_back(&self, handle: &WgpuMapHandle, output: &mut [f32]) -> Result<(), WgpuBackendError> {
        let slice = handle.staging.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| WgpuBackendError::Readback("map_async was cancelled".into()))?
            .map_err(|err| WgpuBackendError::Readback(err.to_string()))?;
        {
            let data = slice.get_mapped_range();
            output.copy_from_slice(bytemuck::cast_slice(&data));
        }
        handle.staging.unmap();
        Ok(())
    }
}

fn dispatch_groups(cells: usize) -> (u32, u32) {
    let groups = cells.div_ceil(WORKGROUP_SIZE as usize).max(1) as u32;
    let x = groups.min(MAX_GROUPS_PER_DIM);
    (x, groups.div_ceil(x))
}

impl ComputeBackend for WgpuBackend {
    type MapHandle = WgpuMapHandle;

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn upload(&self, map: &HeritageMap) -> HeritageResult<WgpuMapHandle> {
        let cells = map.rows();
        let bytes = map.as_bytes();
        let limit = u64::from(self.device.limits().max_storage_buffer_binding_size);
        if bytes.len() as u64 > limit {
            return Err(WgpuBackendError::BindingTooLarge {
                bytes: bytes.len() as u64,
                limit,
            }
            .into());
        }

        let stencil = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("pm.backend.wgpu.stencil"),
                contents: bytes,
                usage: BufferUsages::STORAGE,
            });
        let input = self.field_buffer(
            "pm.backend.wgpu.field_in",
            cells,
            BufferUsages::STORAGE | BufferUsages::COPY_DST,
        );
        let output = self.field_buffer(
            "pm.backend.wgpu.field_out",
            cells,
            BufferUsages::STORAGE | BufferUsages::COPY_SRC,
        );
        let staging = self.field_buffer(
            "pm.backend.wgpu.readback",
            cells,
            BufferUsages::MAP_READ | BufferUsages::COPY_DST,
        );

        let groups = dispatch_groups(cells);
        let params = ApplyParams {
            cells: cells as u32,
            row_stride: groups.0 * WORKGROUP_SIZE,
            _pad: [0; 2],
        };
        let params = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("pm.backend.wgpu.params"),
                contents: bytemuck::bytes_of(&params),
                usage: BufferUsages::UNIFORM,
            });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pm.backend.wgpu.bind_group"),
            layout: &self.bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: stencil.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: input.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: output.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params.as_entire_binding(),
                },
            ],
        });
        debug!(
            cells,
            stencil_bytes = bytes.len(),
            groups_x = groups.0,
            groups_y = groups.1,
            "uploaded heritage map"
        );

        Ok(WgpuMapHandle {
            cells,
            groups,
            in_flight: Mutex::new(()),
            input,
            output,
            staging,
            bind_group,
            _stencil: stencil,
            _params: params,
        })
    }

    fn execute(
        &self,
        map: &HeritageMap,
        handle: &WgpuMapHandle,
        input: &[f32],
        output: &mut [f32],
        variant: KernelVariant,
    ) -> HeritageResult<()> {
        variant.ensure_compatible(map)?;
        if input.len() != handle.cells || output.len() != handle.cells {
            return Err(WgpuBackendError::FieldLength {
                expected: handle.cells,
                input: input.len(),
                output: output.len(),
            }
            .into());
        }
        let pipeline = self.pipeline_for(variant);
        let _in_flight = handle
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.queue
            .write_buffer(&handle.input, 0, bytemuck::cast_slice(input));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pm.backend.wgpu.apply_encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("pm.backend.wgpu.apply_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &handle.bind_group, &[]);
            pass.dispatch_workgroups(handle.groups.0, handle.groups.1, 1);
        }
        let size = (handle.cells * std::mem::size_of::<f32>()) as u64;
        encoder.copy_buffer_to_buffer(&handle.output, 0, &handle.staging, 0, size);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.read_back(handle, output)?;
        Ok(())
    }
}
