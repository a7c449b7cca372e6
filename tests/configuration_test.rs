/*!
Tests for building routings and topologies from their configuration.
 */

mod common;
use std::cell::RefCell;
use std::convert::TryFrom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use caminos_routing::*;
use caminos_routing::routing::prelude::*;
use caminos_routing::routing::RouterContext;
use caminos_routing::topology::TopologyBuilderArgument;
use common::*;

#[test]
fn routing_algorithm_codes()
{
    let expected = ["Table", "MeshXY", "Ring", "DragonflyMinimal", "DragonflyUGAL", "DragonflyVAL"];
    for (code, name) in expected.iter().enumerate()
    {
        let algorithm = RoutingAlgorithm::try_from(code).expect("known code");
        assert_eq!(algorithm.configuration().object_name(), Some(*name));
        let plugs = Plugs::default();
        // Every code builds.
        let _routing = new_routing(RoutingBuilderArgument{ cv: &algorithm.configuration(), plugs: &plugs });
    }
    assert!(RoutingAlgorithm::try_from(6).is_err());
    assert_eq!(RoutingAlgorithm::from_code(17), RoutingAlgorithm::Table);
    assert_eq!(RoutingAlgorithm::from_code(4), RoutingAlgorithm::UGAL);
}

#[test]
#[should_panic(expected = "Unknown Routing")]
fn unknown_routing()
{
    let plugs = Plugs::default();
    new_routing(RoutingBuilderArgument{ cv: &create_routing("Shortest"), plugs: &plugs });
}

#[test]
#[should_panic(expected = "Nothing to do with field")]
fn unknown_routing_field()
{
    let plugs = Plugs::default();
    let cv = ConfigurationValue::Object("DragonflyUGAL".to_string(), vec![("threshold".to_string(), ConfigurationValue::Number(0.6))]);
    new_routing(RoutingBuilderArgument{ cv: &cv, plugs: &plugs });
}

/// Always take the first output port registered for servers.
#[derive(Debug)]
struct ToFirstServer {}

impl Routing for ToFirstServer
{
    fn next(&self, _route: &RefCell<RouteInfo>, router: &RouterContext, _inport: usize, _inport_direction: PortDirection, _rng: &mut StdRng) -> Result<usize, Error>
    {
        router.outport(PortDirection::Server)
    }
}

fn new_to_first_server(_arg: RoutingBuilderArgument) -> Box<dyn Routing>
{
    Box::new(ToFirstServer{})
}

#[test]
fn plugged_routings_take_precedence()
{
    let mut plugs = Plugs::default();
    plugs.add_routing("MeshXY".to_string(), new_to_first_server);
    let topology_cv = create_mesh_topology(MeshBuilder{ rows: 2, columns: 2, servers_per_router: 1, ordered_virtual_networks: vec![false] });
    let routing = create_routing("MeshXY");
    let topology = new_topology(TopologyBuilderArgument{ cv: &topology_cv, routing: &routing, plugs: &plugs });
    let mut rng = StdRng::seed_from_u64(0);
    // The plugged routing delivers to the wrong node.
    assert!(topology.route_packet(0, 3, 0, &mut rng).is_err());
    let unit = topology.unit(0);
    let route = RefCell::new(RouteInfo::new(0, 0, 3, 3, 0));
    let outport = unit.outport_compute(&route, 0, PortDirection::East, &topology, &mut rng).expect("a port");
    assert_eq!(unit.directions().outport_direction(outport), Some(PortDirection::Server));
}

#[test]
fn unregistered_directions_are_reported()
{
    // A single column has no East/West ports.
    let topology_cv = create_mesh_topology(MeshBuilder{ rows: 3, columns: 1, servers_per_router: 1, ordered_virtual_networks: vec![false] });
    let topology = build_network(&topology_cv, &create_routing("MeshXY"));
    let unit = topology.unit(0);
    let context = RouterContext{ router_index: 0, table: unit.table(), directions: unit.directions(), network: &topology };
    let err = context.outport(PortDirection::East).expect_err("no East port");
    assert_eq!(err.kind, ErrorKind::UnregisteredDirection{ router_index: 0, direction: PortDirection::East });
    assert_eq!(context.outport(PortDirection::North).ok(), unit.directions().outport_index(PortDirection::North));
}

#[test]
fn topology_parameters()
{
    let topology_cv = create_dragonfly_topology(DragonflyBuilder{ routers_per_group: 3, global_channels_per_router: 2, number_of_groups: Some(5), servers_per_router: 2, virtual_channels: 3 });
    let topology = build_network(&topology_cv, &create_routing("Table"));
    let size = topology.dragonfly_size().expect("a dragonfly");
    assert_eq!(size, DragonflySize{ number_of_groups: 5, routers_per_group: 3, global_channels_per_router: 2 });
    assert_eq!(topology.num_routers(), 15);
    assert_eq!(topology.num_servers(), 30);
    assert_eq!(topology.mesh_size(), None);
    assert_eq!(topology.input_virtual_channel_load(4, 0), vec![0, 0, 0]);
    assert!(!topology.is_virtual_network_ordered(0));
    assert!(!topology.is_virtual_network_ordered(3));
    // Node 7 is the second server of router 3.
    assert_eq!(topology.server_location(7).map(|(router, _)| router), Some(3));
}

#[test]
#[should_panic(expected = "must have between 1 and 7 groups")]
fn too_many_groups()
{
    let topology_cv = create_dragonfly_topology(DragonflyBuilder{ routers_per_group: 3, global_channels_per_router: 2, number_of_groups: Some(8), servers_per_router: 1, virtual_channels: 4 });
    build_network(&topology_cv, &create_routing("Table"));
}
