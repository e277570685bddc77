// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use approx::assert_abs_diff_eq;
use pm_backend_wgpu::WgpuBackend;
use pm_config::determinism;
use pm_core::{
    ComputeBackend, CpuBackend, Field, GridShape, HeritageError, HeritageMap, HeritageOperator,
    Interpolation, KernelVariant, RotationConvention,
};
use rand::Rng;

fn backend_or_skip() -> Option<WgpuBackend> {
    match WgpuBackend::request() {
        Ok(backend) => Some(backend),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}

fn random_field(shape: GridShape) -> Field {
    seeded_field(shape, 11)
}

fn seeded_field(shape: GridShape, seed: u64) -> Field {
    let mut rng = determinism::rng_from_optional(Some(seed), "pm-backend-wgpu/tests");
    Field::from_fn(shape, |_, _| rng.gen_range(0.0f32..1.0)).unwrap()
}

#[test]
fn gpu_matches_cpu_for_every_variant() {
    let Some(gpu) = backend_or_skip() else {
        return;
    };
    let shape = GridShape::new(48, 40);
    let input = random_field(shape);
    for variant in KernelVariant::all() {
        let map = HeritageMap::rotation(
            shape,
            variant.interpolation,
            0.7,
            RotationConvention::Absolute,
        )
        .unwrap();
        let handle = gpu.upload(&map).unwrap();
        let mut on_gpu = vec![0.0f32; shape.total()];
        gpu.execute(&map, &handle, input.as_slice(), &mut on_gpu, variant)
            .unwrap();

        let mut on_cpu = vec![0.0f32; shape.total()];
        CpuBackend::sequential()
            .execute(&map, &(), input.as_slice(), &mut on_cpu, variant)
            .unwrap();
        for (g, c) in on_gpu.iter().zip(&on_cpu) {
            assert_abs_diff_eq!(*g, *c, epsilon = 1e-5);
        }
    }
}

#[test]
fn operator_runs_repeatedly_on_one_upload() {
    let Some(gpu) = backend_or_skip() else {
        return;
    };
    let shape = GridShape::square(32);
    let map = HeritageMap::rotation(shape, Interpolation::Cubic, 0.05, RotationConvention::Absolute)
        .unwrap();
    let gpu_op = HeritageOperator::new(map.clone(), gpu, true).unwrap();
    let cpu_op = HeritageOperator::new(map, CpuBackend::sequential(), true).unwrap();

    let mut gpu_field = random_field(shape);
    let mut cpu_field = gpu_field.clone();
    for _ in 0..3 {
        gpu_field = gpu_op.apply_to_new(&gpu_field).unwrap();
        cpu_field = cpu_op.apply_to_new(&cpu_field).unwrap();
    }
    for (g, c) in gpu_field.as_slice().iter().zip(cpu_field.as_slice()) {
        assert_abs_diff_eq!(*g, *c, epsilon = 1e-4);
    }
}

#[test]
fn short_buffers_are_rejected() {
    let Some(gpu) = backend_or_skip() else {
        return;
    };
    let map = HeritageMap::rotation(
        GridShape::square(8),
        Interpolation::Linear,
        0.0,
        RotationConvention::Absolute,
    )
    .unwrap();
    let handle = gpu.upload(&map).unwrap();
    let mut output = vec![0.0f32; 64];
    let variant = KernelVariant::new(Interpolation::Linear, false);
    assert!(gpu
        .execute(&map, &handle, &[0.0; 10], &mut output, variant)
        .is_err());
}

#[test]
fn mismatched_variants_are_rejected() {
    let Some(gpu) = backend_or_skip() else {
        return;
    };
    let map = HeritageMap::rotation(
        GridShape::square(4),
        Interpolation::Linear,
        0.0,
        RotationConvention::Absolute,
    )
    .unwrap();
    let handle = gpu.upload(&map).unwrap();
    let mut output = vec![0.0f32; 16];
    let err = gpu
        .execute(
            &map,
            &handle,
            &[1.0; 16],
            &mut output,
            KernelVariant::new(Interpolation::Cubic, true),
        )
        .unwrap_err();
    assert!(matches!(err, HeritageError::VariantMismatch { .. }));
}

#[test]
fn concurrent_applies_keep_their_own_inputs() {
    let Some(gpu) = backend_or_skip() else {
        return;
    };
    let shape = GridShape::square(64);
    let map = HeritageMap::rotation(shape, Interpolation::Cubic, 0.3, RotationConvention::Absolute)
        .unwrap();
    let gpu_op = HeritageOperator::new(map.clone(), gpu, true).unwrap();
    let cpu_op = HeritageOperator::new(map, CpuBackend::sequential(), true).unwrap();

    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4u64)
            .map(|seed| {
                let gpu_op = &gpu_op;
                let cpu_op = &cpu_op;
                scope.spawn(move || {
                    let input = seeded_field(shape, 100 + seed);
                    for _ in 0..8 {
                        let on_gpu = gpu_op.apply_to_new(&input).unwrap();
                        let on_cpu = cpu_op.apply_to_new(&input).unwrap();
                        for (g, c) in on_gpu.as_slice().iter().zip(on_cpu.as_slice()) {
                            assert_abs_diff_eq!(*g, *c, epsilon = 1e-5);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
    });
}
