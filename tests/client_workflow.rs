//! Service test client against the loopback server.

use std::io::Write;

use icr::{ClientConfig, LoopbackIcrServer, ServiceTestClient, StepOutcome};

fn cube_obj() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".obj").tempfile().unwrap();
    let vertices = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];
    writeln!(file, "o cube").unwrap();
    for [x, y, z] in vertices {
        writeln!(file, "v {x} {y} {z}").unwrap();
    }
    writeln!(file, "f 1 2 3 4\nf 5 6 7 8").unwrap();
    file
}

#[test]
fn test_full_workflow() {
    let obj = cube_obj();
    let client = ServiceTestClient::new(LoopbackIcrServer::new(), ClientConfig::default());
    let report = client.run(4, obj.path());

    assert_eq!(report.add_fingers, StepOutcome::Succeeded);
    assert_eq!(report.load_object, StepOutcome::Succeeded);
    assert_eq!(report.compute_icr, StepOutcome::Succeeded);
    assert_eq!(
        client.service().object(),
        Some(("example_object".to_string(), 8))
    );
    assert_eq!(client.service().fingers(), 4);
}

#[test]
fn test_missing_object_skips_compute() {
    let client = ServiceTestClient::new(LoopbackIcrServer::new(), ClientConfig::default());
    let report = client.run(4, "/nonexistent/object.obj");

    assert_eq!(report.add_fingers, StepOutcome::Succeeded);
    assert_eq!(report.load_object, StepOutcome::Refused);
    assert_eq!(report.compute_icr, StepOutcome::Skipped);
    assert!(!report.succeeded());
}

#[test]
fn test_zero_fingers_skips_compute() {
    let obj = cube_obj();
    let client = ServiceTestClient::new(LoopbackIcrServer::new(), ClientConfig::default());
    let report = client.run(0, obj.path());

    assert_eq!(report.add_fingers, StepOutcome::Refused);
    assert_eq!(report.load_object, StepOutcome::Succeeded);
    assert_eq!(report.compute_icr, StepOutcome::Skipped);
}

#[test]
fn test_center_points_beyond_object_refused() {
    let obj = cube_obj();
    let config = ClientConfig {
        centerpoint_ids: vec![2, 9],
        ..Default::default()
    };
    let client = ServiceTestClient::new(LoopbackIcrServer::new(), config);
    let report = client.run(2, obj.path());
    assert_eq!(report.compute_icr, StepOutcome::Refused);
}
