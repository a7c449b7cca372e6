#![allow(dead_code)]
use caminos_routing::*;
use caminos_routing::topology::{StaticTopology, TopologyBuilderArgument, Hop};

/// Show the routing log when running the tests with `RUST_LOG=trace`.
pub fn init_logging()
{
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct MeshBuilder {
    pub rows: usize,
    pub columns: usize,
    pub servers_per_router: usize,
    pub ordered_virtual_networks: Vec<bool>,
}

pub fn create_mesh_topology(arg: MeshBuilder) -> ConfigurationValue
{
    ConfigurationValue::Object("Mesh".to_string(), vec![
        ("rows".to_string(), ConfigurationValue::Number(arg.rows as f64)),
        ("columns".to_string(), ConfigurationValue::Number(arg.columns as f64)),
        ("servers_per_router".to_string(), ConfigurationValue::Number(arg.servers_per_router as f64)),
        ("ordered_virtual_networks".to_string(), ConfigurationValue::Array(arg.ordered_virtual_networks.into_iter().map(ConfigurationValue::from).collect())),
    ])
}

pub struct RingBuilder {
    pub routers: usize,
    pub servers_per_router: usize,
    pub ordered_virtual_networks: Vec<bool>,
}

pub fn create_ring_topology(arg: RingBuilder) -> ConfigurationValue
{
    ConfigurationValue::Object("Ring".to_string(), vec![
        ("routers".to_string(), ConfigurationValue::Number(arg.routers as f64)),
        ("servers_per_router".to_string(), ConfigurationValue::Number(arg.servers_per_router as f64)),
        ("ordered_virtual_networks".to_string(), ConfigurationValue::Array(arg.ordered_virtual_networks.into_iter().map(ConfigurationValue::from).collect())),
    ])
}

pub struct DragonflyBuilder {
    pub routers_per_group: usize,
    pub global_channels_per_router: usize,
    pub number_of_groups: Option<usize>,
    pub servers_per_router: usize,
    pub virtual_channels: usize,
}

pub fn create_dragonfly_topology(arg: DragonflyBuilder) -> ConfigurationValue
{
    let mut fields = vec![
        ("routers_per_group".to_string(), ConfigurationValue::Number(arg.routers_per_group as f64)),
        ("global_channels_per_router".to_string(), ConfigurationValue::Number(arg.global_channels_per_router as f64)),
        ("servers_per_router".to_string(), ConfigurationValue::Number(arg.servers_per_router as f64)),
        ("virtual_channels".to_string(), ConfigurationValue::Number(arg.virtual_channels as f64)),
    ];
    if let Some(groups) = arg.number_of_groups
    {
        fields.push(("number_of_groups".to_string(), ConfigurationValue::Number(groups as f64)));
    }
    ConfigurationValue::Object("Dragonfly".to_string(), fields)
}

/// A routing without parameters.
pub fn create_routing(name: &str) -> ConfigurationValue
{
    ConfigurationValue::Object(name.to_string(), vec![])
}

pub fn create_ugal_routing(minimal_probe_virtual_channel: usize, detour_probe_virtual_channel: usize) -> ConfigurationValue
{
    ConfigurationValue::Object("DragonflyUGAL".to_string(), vec![
        ("minimal_probe_virtual_channel".to_string(), ConfigurationValue::Number(minimal_probe_virtual_channel as f64)),
        ("detour_probe_virtual_channel".to_string(), ConfigurationValue::Number(detour_probe_virtual_channel as f64)),
        ("legend_name".to_string(), ConfigurationValue::Literal("UGAL".to_string())),
    ])
}

pub fn build_network(topology: &ConfigurationValue, routing: &ConfigurationValue) -> StaticTopology
{
    init_logging();
    let plugs = Plugs::default();
    new_topology(TopologyBuilderArgument{ cv: topology, routing, plugs: &plugs })
}

/// Number of links between routers in a route, leaving out the delivery to the server.
pub fn router_hops(hops: &[Hop]) -> usize
{
    hops.len() - 1
}

/// The sequence of routers visited by a route.
pub fn visited_routers(hops: &[Hop]) -> Vec<usize>
{
    hops.iter().map(|hop| hop.router).collect()
}
