/*!
caminos-routing
=====

This crate provides the routing decision core of a simulated interconnection network: the per-router routing unit that, given a flit at the head of an input buffer, selects the output port it must take.

# Usage

This crate is `caminos-routing`. To use it add `caminos-routing` to your dependencies in your project's `Cargo.toml`.

```toml
[dependencies]
caminos-routing = "0.1"
```

# Public Interface

A network is built with [`new_topology`](topology::new_topology) from a topology configuration and a routing configuration. Each router gets a [RoutingUnit](routing::RoutingUnit) with its routing table, the directions of its ports, and a [Routing](routing::Routing) built by [`new_routing`](routing::new_routing). The simulator owning the routers implements [Network](network::Network) for the routing units to consult, which the built [StaticTopology](topology::StaticTopology) already does.

```ignore
let routing = ConfigurationValue::Object("DragonflyUGAL".to_string(),vec![]);
let topology_cv = ConfigurationValue::Object("Dragonfly".to_string(),vec![
	("routers_per_group".to_string(),ConfigurationValue::Number(4.0)),
	("global_channels_per_router".to_string(),ConfigurationValue::Number(2.0)),
]);
let plugs = Plugs::default();
let topology = new_topology(TopologyBuilderArgument{cv:&topology_cv,routing:&routing,plugs:&plugs});
let mut rng = StdRng::seed_from_u64(1);
let hops = topology.route_packet(0,35,0,&mut rng)?;
```

The routings available are
* `Table`, which follows the routing table of the router, choosing among the links of minimum weight.
* `MeshXY`, dimension ordered routing in a 2D mesh.
* `Ring`, shortest direction in a ring.
* `DragonflyMinimal`, `DragonflyVAL`, and `DragonflyUGAL` for dragonflies.

Whatever the routing, packets at their destination router are delivered through the table, and every error is a defect of the topology or of the configuration. The caller is expected to abort the simulation on them, as [`outport_compute_or_abort`](routing::RoutingUnit::outport_compute_or_abort) does.

# Plugging

[Plugs] may be used to provide new implementations of `Routing` and topology builders, which are looked up by name before the predefined ones.

*/

// --- crate attributes ---
// At clippy::style
	#![allow(clippy::needless_return)]
	#![allow(clippy::new_without_default)]
	#![allow(clippy::comparison_chain)]
	#![allow(clippy::len_without_is_empty)]
	#![allow(clippy::needless_range_loop)]
	#![allow(clippy::collapsible_else_if)]
	#![allow(clippy::match_ref_pats)]
	#![allow(clippy::tabs_in_doc_comments)]
// At clippy::cargo
	#![warn(clippy::cargo)]
	//missing repository and categories.
	#![allow(clippy::cargo_common_metadata)]

pub mod error;
pub mod config;
pub mod direction;
pub mod net_dest;
pub mod route;
pub mod network;
pub mod matrix;
pub mod routing;
pub mod topology;

use std::collections::BTreeMap;

use routing::{Routing,RoutingBuilderArgument};
use topology::{StaticTopology,TopologyBuilderArgument};

pub use config::ConfigurationValue;
pub use direction::{PortDirection,PortDirections};
pub use error::{Error,ErrorKind};
pub use net_dest::NetDest;
pub use network::{Network,MeshSize,DragonflySize};
pub use route::RouteInfo;
pub use routing::{new_routing,RoutingUnit,RoutingAlgorithm};
pub use topology::new_topology;

///User provided builders, by the name of the configuration object they build.
#[derive(Default)]
pub struct Plugs
{
	routings: BTreeMap<String,fn(RoutingBuilderArgument) -> Box<dyn Routing>>,
	topologies: BTreeMap<String,fn(TopologyBuilderArgument) -> StaticTopology>,
}

impl Plugs
{
	pub fn add_routing(&mut self, key:String, builder:fn(RoutingBuilderArgument) -> Box<dyn Routing>)
	{
		self.routings.insert(key,builder);
	}
	pub fn add_topology(&mut self, key:String, builder:fn(TopologyBuilderArgument) -> StaticTopology)
	{
		self.topologies.insert(key,builder);
	}
}

impl std::fmt::Debug for Plugs
{
	fn fmt(&self, f:&mut std::fmt::Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		f.debug_struct("Plugs")
			.field("routings",&self.routings.keys().collect::<Vec<_>>())
			.field("topologies",&self.topologies.keys().collect::<Vec<_>>())
			.finish()
	}
}
