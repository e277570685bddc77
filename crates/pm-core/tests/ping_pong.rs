// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of PhaseMap — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use approx::assert_abs_diff_eq;
use pm_config::HeritageSettings;
use pm_core::{
    CpuBackend, Field, GridShape, HeritageError, HeritageMap, HeritageOperator, Identity,
    Interpolation, MapBuilder, PingPong,
};

fn gaussian(shape: GridShape, sigma: f64) -> Field {
    let centre = shape.size_x as f64 / 2.0;
    Field::from_fn(shape, |q, p| {
        let r2 = (q as f64 - centre).powi(2) + (p as f64 - centre).powi(2);
        (-r2 / (2.0 * sigma * sigma)).exp() as f32
    })
    .unwrap()
}

#[test]
fn identity_steps_leave_the_field_untouched() {
    pm_core::telemetry::init_tracing();
    let shape = GridShape::new(6, 11);
    let initial = Field::from_fn(shape, |q, p| (q * 11 + p) as f32).unwrap();
    let map = MapBuilder::new(shape, Interpolation::Cubic).build(&Identity).unwrap();
    let operator = HeritageOperator::cpu(map, true).unwrap();
    let mut driver = PingPong::new(operator, initial.clone()).unwrap();
    driver.run(10).unwrap();
    assert_eq!(driver.steps_taken(), 10);
    assert_eq!(driver.current().as_slice(), initial.as_slice());
}

#[test]
fn four_quarter_turns_close_the_period() {
    let settings = HeritageSettings::from_toml_str(
        r#"
        grid_size = 32
        interpolation_points = 2
        interpolate_clamped = false
        steps = 4
        rotations = 1.0
        "#,
    )
    .unwrap();
    let shape = GridShape::square(settings.grid_size);
    let initial = gaussian(shape, 3.0);
    let mut driver = PingPong::from_settings(&settings, CpuBackend::new(), initial.clone()).unwrap();
    assert!(!driver.operator().is_saturating());
    driver.run(settings.total_steps()).unwrap();
    assert_eq!(driver.steps_taken(), 4);

    let result = driver.into_current();
    for (got, expected) in result.as_slice().iter().zip(initial.as_slice()) {
        assert_abs_diff_eq!(*got, *expected, epsilon = 1e-4);
    }
}

#[test]
fn rotating_a_uniform_field_loses_the_corners() {
    let shape = GridShape::square(20);
    let map = HeritageMap::rotation(
        shape,
        Interpolation::Linear,
        0.25,
        pm_core::RotationConvention::Absolute,
    )
    .unwrap();
    let operator = HeritageOperator::cpu(map, true).unwrap();
    let uniform = Field::from_fn(shape, |_, _| 1.0).unwrap();
    let mut driver = PingPong::new(operator, uniform).unwrap();
    driver.run(5).unwrap();
    let field = driver.current();
    assert!(field.as_slice().iter().all(|value| (0.0..=1.0).contains(value)));
    assert!(field.total() < 400.0);
    assert_abs_diff_eq!(field.get(10, 10).unwrap(), 1.0, epsilon = 1e-5);
}

#[test]
fn initial_field_must_match_the_map() {
    let map = MapBuilder::new(GridShape::square(4), Interpolation::Linear)
        .build(&Identity)
        .unwrap();
    let operator = HeritageOperator::cpu(map, false).unwrap();
    let err = PingPong::new(operator, Field::zeros(GridShape::square(5)).unwrap())
        .err()
        .unwrap();
    assert!(matches!(err, HeritageError::FieldShape { role: "initial", .. }));
}

#[test]
fn settings_with_unknown_orders_are_rejected() {
    let settings = HeritageSettings {
        grid_size: 8,
        interpolation_points: 5,
        ..HeritageSettings::default()
    };
    assert!(matches!(
        HeritageMap::from_settings(&settings),
        Err(HeritageError::UnsupportedOrder { points: 5 })
    ));
}

#[test]
fn settings_without_steps_are_rejected() {
    let settings = HeritageSettings::from_toml_str("grid_size = 8\nsteps = 0\n").unwrap();
    assert!(matches!(
        HeritageMap::from_settings(&settings),
        Err(HeritageError::ZeroSteps)
    ));
    let initial = Field::zeros(GridShape::square(8)).unwrap();
    assert!(matches!(
        PingPong::from_settings(&settings, CpuBackend::sequential(), initial),
        Err(HeritageError::ZeroSteps)
    ));
}
