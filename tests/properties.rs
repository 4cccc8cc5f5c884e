use std::time::Duration;

use proptest::prelude::*;
use windtunnel::aero::round_one_decimal;
use windtunnel::flow::{
    FlowClass, FlowField, FlowLine, FlowSeed, TickOutcome, POINT_SPACING, RESET_DEPTH,
};
use windtunnel::{
    compute_coefficients, compute_forces, DrsState, SessionPhase, Telemetry, TunnelParameters,
    TunnelSettings, WindTunnel,
};

fn in_domain() -> impl Strategy<Value = TunnelParameters> {
    (
        0.0..=320.0f64,
        -10.0..=10.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
        0.0..=100.0f64,
        any::<bool>(),
    )
        .prop_map(
            |(wind_speed, angle_of_attack, front_wing, rear_wing, sidepods, drs)| {
                TunnelParameters {
                    wind_speed,
                    angle_of_attack,
                    front_wing,
                    rear_wing,
                    sidepods,
                    drs: DrsState::new(drs),
                }
            },
        )
}

proptest! {
    #[test]
    fn aero_model_is_deterministic(params in in_domain()) {
        let a = compute_forces(compute_coefficients(&params), params.wind_speed);
        let b = compute_forces(compute_coefficients(&params), params.wind_speed);
        prop_assert_eq!(a.downforce.to_bits(), b.downforce.to_bits());
        prop_assert_eq!(a.drag.to_bits(), b.drag.to_bits());
        prop_assert_eq!(a.efficiency.to_bits(), b.efficiency.to_bits());
    }

    #[test]
    fn forces_are_non_negative_in_domain(params in in_domain()) {
        let c = compute_coefficients(&params);
        prop_assert!(c.cl >= 0.0);
        prop_assert!(c.cd >= 0.0);

        let f = compute_forces(c, params.wind_speed);
        prop_assert!(f.downforce >= 0.0);
        prop_assert!(f.drag >= 0.0);
        prop_assert!(f.efficiency.is_finite());
    }

    #[test]
    fn no_aero_surfaces_means_no_downforce(wind_speed in 0.0..=320.0f64) {
        let params = TunnelParameters {
            wind_speed,
            angle_of_attack: 0.0,
            front_wing: 0.0,
            rear_wing: 0.0,
            sidepods: 0.0,
            drs: DrsState::default(),
        };
        let c = compute_coefficients(&params);
        prop_assert_eq!(c.cl, 0.0);
        prop_assert_eq!(Telemetry::evaluate(&params).downforce, 0);
    }

    #[test]
    fn drs_forced_open_above_threshold(wind_speed in 200.001..=320.0f64, manual in any::<bool>()) {
        let mut tunnel = WindTunnel::new(TunnelSettings {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        tunnel.set_parameters(TunnelParameters {
            wind_speed,
            drs: DrsState::new(manual),
            ..Default::default()
        });
        prop_assert!(tunnel.parameters().drs.engaged());

        tunnel.toggle_drs();
        prop_assert!(tunnel.parameters().drs.engaged());
    }
}

#[test]
fn worked_example_at_216_kmh() {
    let params = TunnelParameters {
        wind_speed: 216.0,
        ..Default::default()
    };
    let c = compute_coefficients(&params);
    assert!((c.cl - 1.25).abs() < 1e-12);
    assert!((c.cd - 0.3904).abs() < 1e-4);

    let f = compute_forces(c, params.wind_speed);
    assert!((f.downforce - 4134.375).abs() < 1e-6);

    let t = Telemetry::from_forces(&f);
    assert_eq!((t.downforce, t.drag, t.efficiency), (4134, 1291, 3.2));
}

#[test]
fn efficiency_display_rounding() {
    assert_eq!(round_one_decimal(2.449), 2.4);
    assert_eq!(round_one_decimal(2.451), 2.5);
}

#[test]
fn reseeded_line_restarts_from_its_origin() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(2024);
    let seed = FlowSeed {
        class: FlowClass::Vortex,
        origin: nalgebra::Point3::new(-1.0, 0.5, -1.0),
        base_speed: 24.0,
    };
    let mut line = FlowLine::new(seed, 50);
    let params = TunnelParameters::default();

    loop {
        let before = line.points().to_vec();
        let head_z = line.head().z;
        if line.tick(&params, &mut rng) == TickOutcome::Reseeded {
            assert!(head_z - 24.0 * 0.02 < RESET_DEPTH);
            for (i, p) in line.points().iter().enumerate() {
                let expected_z = -1.0 - i as f64 * POINT_SPACING;
                assert!((p.z - expected_z).abs() < 1e-12);
                assert!(!before.contains(p));
            }
            break;
        }
    }
}

#[test]
fn teardown_stops_every_line() {
    let mut tunnel = WindTunnel::new(TunnelSettings {
        seed: Some(8),
        ..Default::default()
    })
    .unwrap();
    tunnel.launch();
    tunnel.advance(Duration::from_millis(1000));
    assert_eq!(tunnel.phase(), SessionPhase::Running);
    assert_eq!(tunnel.field().lines().len(), 300);

    for _ in 0..30 {
        tunnel.advance(Duration::from_millis(16));
    }
    let writes = tunnel.field().writes();
    assert_eq!(writes, 30 * 300);

    tunnel.shutdown();
    for _ in 0..30 {
        tunnel.advance(Duration::from_millis(16));
    }
    assert_eq!(tunnel.field().writes(), writes);
    assert!(tunnel.snapshot().lines.is_empty());
}

#[test]
fn zero_point_lines_are_rejected_before_ticking() {
    let settings = TunnelSettings {
        points_per_line: 0,
        seed: Some(3),
        ..Default::default()
    };
    assert!(settings.validate().is_err());
    assert!(WindTunnel::new(settings).is_err());
}

#[test]
fn flow_field_generations_do_not_overlap() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(77);
    let mut field = FlowField::new();
    field.respawn(300, 50, 100.0, &mut rng);
    let first: Vec<_> = field.lines().iter().map(|l| l.origin()).collect();

    field.respawn(300, 50, 100.0, &mut rng);
    let second: Vec<_> = field.lines().iter().map(|l| l.origin()).collect();

    assert_eq!(field.generation(), 2);
    assert!(first.iter().all(|p| !second.contains(p)));
}
