//! Static port binding at the core boundary.

use std::collections::HashSet;

use tacsim_core::Core;
use tacsim_core::common::StageId;
use tacsim_core::common::constants::{NUM_READ_PORTS, NUM_WRITE_PORTS};
use tacsim_core::config::Config;
use tacsim_core::mem::ports::{PortBinding, PortDir, PortMap};

#[test]
fn elaborated_core_carries_a_fully_owned_port_table() {
    let core = Core::new(&Config::default()).expect("default config elaborates");
    let map = core.ports();
    for port in 0..NUM_READ_PORTS {
        assert!(map.read_owner(port).is_some(), "read port {port} unbound");
    }
    for port in 0..NUM_WRITE_PORTS {
        assert!(map.write_owner(port).is_some(), "write port {port} unbound");
    }
}

#[test]
fn no_port_has_two_owners_in_the_canonical_table() {
    let map = PortMap::core_default();
    let mut seen = HashSet::new();
    for binding in map.bindings() {
        assert!(
            seen.insert((binding.dir, binding.port)),
            "{:?} port {} bound twice",
            binding.dir,
            binding.port
        );
    }
}

#[test]
fn canonical_table_matches_the_fixed_assignment() {
    let map = PortMap::core_default();
    assert_eq!(map.read_owner(0), Some(StageId::Fetch));
    assert_eq!(map.read_owner(1), Some(StageId::Compute));
    assert_eq!(map.read_owner(2), Some(StageId::Load));
    assert_eq!(map.read_owner(3), Some(StageId::Load));
    assert_eq!(map.read_owner(4), Some(StageId::Compute));
    assert_eq!(map.write_owner(0), Some(StageId::Store));
}

#[test]
fn double_ownership_is_rejected_at_validation() {
    let mut bindings: Vec<PortBinding> = PortMap::core_default().bindings().to_vec();
    bindings.push(PortBinding {
        stage: StageId::Store,
        dir: PortDir::Read,
        port: 2,
    });
    assert!(PortMap::with_bindings(bindings).validate().is_err());
}
