//! Shared setup helpers for icr benchmarks.
//!
//! ## Running
//!
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench contact_pose
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench contact_pose -- projection

use glam::DVec3;
use icr::{ContactState, ContactsState, Header};

pub const OWN_GEOM: &str = "bench_finger_geom";
pub const TARGET_GEOM: &str = "bench_object_geom";

/// `n` contacts spread over a patch of a sphere around +Z.
pub fn contact_patch(n: usize) -> ContactState {
    let mut state = ContactState::new(OWN_GEOM, TARGET_GEOM);
    for i in 0..n {
        let angle = i as f64 * 0.61;
        let radius = 0.01 * (i % 7) as f64;
        let normal = DVec3::new(radius * angle.cos(), radius * angle.sin(), 1.0).normalize();
        state = state.with_contact(normal * 0.05, normal);
    }
    state
}

fn other(i: usize) -> ContactState {
    ContactState::new(format!("other_{i}"), TARGET_GEOM).with_contact(DVec3::X, DVec3::Z)
}

/// A batch with `others` non-matching records in front of one matching patch of `n` contacts.
pub fn batch(n: usize, others: usize) -> ContactsState {
    let mut states: Vec<ContactState> = (0..others).map(other).collect();
    states.push(contact_patch(n));
    ContactsState::new(Header::default(), states)
}

/// A batch with `others` records, none of them matching.
pub fn miss_batch(others: usize) -> ContactsState {
    let states = (0..others).map(other).collect();
    ContactsState::new(Header::default(), states)
}
