
/*!

A Routing decides the output port through which a flit leaves the current router.

Each router has a [RoutingUnit] holding its routing table, its port directions, and the [Routing] selected by the configuration. Packets that have reached their destination router are always delivered through the table, since several network interfaces may be attached to the router. Every other packet is routed by the configured algorithm.

see [`new_routing`](fn.new_routing.html) for documentation on the configuration syntax of predefined routings.

*/

/// Contains RoutingTable and TableRouting.
pub mod table;
/// Contains MeshXY.
pub mod mesh;
/// Contains Ring.
pub mod ring;
/// Contains DragonflyMinimal, DragonflyUGAL, DragonflyVAL.
pub mod dragonfly;

use std::cell::RefCell;
use std::convert::TryFrom;
use std::fmt::Debug;

use ::rand::rngs::StdRng;

use crate::config::ConfigurationValue;
use crate::direction::{PortDirection,PortDirections};
use crate::network::Network;
use crate::net_dest::NetDest;
use crate::route::RouteInfo;
use crate::Plugs;
use crate::{error,source_location};
pub use crate::error::Error;

pub use self::table::{RoutingTable,TableRouting};
pub use self::mesh::MeshXY;
pub use self::ring::Ring;
pub use self::dragonfly::{DragonflyMinimal,DragonflyUGAL,DragonflyVAL};

pub mod prelude
{
	pub use super::{new_routing,Routing,RouterContext,RoutingBuilderArgument,Error};
	pub use crate::direction::PortDirection;
	pub use crate::route::RouteInfo;
}

///The state of the router performing the routing, as seen by a `Routing`.
pub struct RouterContext<'a>
{
	///Index of the router in the network.
	pub router_index: usize,
	pub table: &'a RoutingTable,
	pub directions: &'a PortDirections,
	pub network: &'a dyn Network,
}

impl<'a> RouterContext<'a>
{
	///The output port registered with a direction.
	pub fn outport(&self, direction:PortDirection) -> Result<usize,Error>
	{
		self.directions.outport_index(direction).ok_or_else(||error!(unregistered_direction,self.router_index,direction))
	}
	///Search the routing table of the router.
	pub fn lookup_table(&self, virtual_network:usize, net_dest:&NetDest, rng:&mut StdRng) -> Result<usize,Error>
	{
		let ordered = self.network.is_virtual_network_ordered(virtual_network);
		self.table.lookup(self.router_index,virtual_network,net_dest,ordered,rng).map_err(|err|err.with_message(format!("router {} looking for {:?}",self.router_index,net_dest)))
	}
}

///A routing algorithm, giving the output port for a flit in a router.
///Implementations only mutate the `intermediate_group` of the route.
pub trait Routing : Debug
{
	/// Compute the output port.
	/// `route` is the route information carried by the flit, which is owned by the router during this call.
	/// `router` gives the table, directions, and network of the router performing the routing.
	/// `inport` and `inport_direction` describe the port through which the flit arrived.
	/// `rng` is the generator of random numbers of the simulation.
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, inport:usize, inport_direction:PortDirection, rng:&mut StdRng) -> Result<usize,Error>;
	///To optionally write routing statistics into the simulation output.
	fn statistics(&self) -> Option<ConfigurationValue>{ None }
	///Clears all collected statistics
	fn reset_statistics(&mut self) {}
}

///The argument of a builder function for `Routings`.
#[derive(Debug)]
pub struct RoutingBuilderArgument<'a>
{
	///A ConfigurationValue::Object defining the routing.
	pub cv: &'a ConfigurationValue,
	///The user defined plugs. In case the routing needs to create elements.
	pub plugs: &'a Plugs,
}

/**Build a new routing.

The default is to use the routing table built with the topology. Routes can be biased via the weights assigned to the links, which is how deadlock is avoided.
```ignore
Table{
	legend_name: "table routing",
}
```

Dimension ordered routing in a mesh, first along the columns (East/West) and then along the rows (North/South).
```ignore
MeshXY{
	legend_name: "XY routing",
}
```

Shortest direction along a ring. Packets going to the antipodal router go East.
```ignore
Ring{
	legend_name: "ring routing",
}
```

For the dragonfly we have the minimal routing, the Valiant routing through a random intermediate group, and the UGAL routing choosing between both at the source router according to the occupancy of the local links.
```ignore
DragonflyMinimal{
	legend_name: "minimal",
}
DragonflyVAL{
	legend_name: "Valiant",
}
DragonflyUGAL{
	//virtual channel compared in the local link of the minimal path when both paths leave the group through the same router.
	minimal_probe_virtual_channel: 3,//optional, defaults to 3.
	//virtual channel compared in the local link of the Valiant path in that same case.
	detour_probe_virtual_channel: 0,//optional, defaults to 0.
	legend_name: "UGAL",
}
```
*/
pub fn new_routing(arg: RoutingBuilderArgument) -> Box<dyn Routing>
{
	if let &ConfigurationValue::Object(ref cv_name, ref _cv_pairs)=arg.cv
	{
		match arg.plugs.routings.get(cv_name)
		{
			Some(builder) => return builder(arg),
			_ => (),
		};
		match cv_name.as_ref()
		{
			"Table" => Box::new(TableRouting::new(arg)),
			"MeshXY" => Box::new(MeshXY::new(arg)),
			"Ring" | "Custom" => Box::new(Ring::new(arg)),
			"DragonflyMinimal" => Box::new(DragonflyMinimal::new(arg)),
			"DragonflyUGAL" => Box::new(DragonflyUGAL::new(arg)),
			"DragonflyVAL" => Box::new(DragonflyVAL::new(arg)),
			_ => panic!("Unknown Routing {}",cv_name),
		}
	}
	else
	{
		panic!("Trying to create a Routing from a non-Object");
	}
}

///The routing algorithms by their numeric code in the command line of the simulator.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum RoutingAlgorithm
{
	Table,
	XY,
	Ring,
	DragonflyMinimal,
	UGAL,
	VAL,
}

impl TryFrom<usize> for RoutingAlgorithm
{
	type Error = Error;
	fn try_from(code:usize) -> Result<RoutingAlgorithm,Error>
	{
		use RoutingAlgorithm::*;
		match code
		{
			0 => Ok(Table),
			1 => Ok(XY),
			2 => Ok(Ring),
			3 => Ok(DragonflyMinimal),
			4 => Ok(UGAL),
			5 => Ok(VAL),
			_ => Err(error!(bad_argument).with_message(format!("there is no routing algorithm with code {code}"))),
		}
	}
}

impl RoutingAlgorithm
{
	///The algorithm for a code, using the table for unknown codes.
	pub fn from_code(code:usize) -> RoutingAlgorithm
	{
		RoutingAlgorithm::try_from(code).unwrap_or(RoutingAlgorithm::Table)
	}
	///The configuration building this algorithm with default parameters.
	pub fn configuration(&self) -> ConfigurationValue
	{
		use RoutingAlgorithm::*;
		let name = match self
		{
			Table => "Table",
			XY => "MeshXY",
			Ring => "Ring",
			DragonflyMinimal => "DragonflyMinimal",
			UGAL => "DragonflyUGAL",
			VAL => "DragonflyVAL",
		};
		ConfigurationValue::Object(name.to_string(),vec![])
	}
}

///The routing part of a router: its table, its port directions, and the routing selected for the network.
#[derive(Debug)]
pub struct RoutingUnit
{
	router_index: usize,
	table: RoutingTable,
	directions: PortDirections,
	routing: Box<dyn Routing>,
}

impl RoutingUnit
{
	pub fn new(router_index:usize, routing:Box<dyn Routing>) -> RoutingUnit
	{
		RoutingUnit{
			router_index,
			table: RoutingTable::new(),
			directions: PortDirections::new(),
			routing,
		}
	}
	pub fn router_index(&self) -> usize
	{
		self.router_index
	}
	///Append a row to the table, with an entry for each virtual network.
	pub fn add_route(&mut self, entry:Vec<NetDest>)
	{
		self.table.add_route(entry);
	}
	///Append the weight of the next output link.
	pub fn add_weight(&mut self, weight:usize)
	{
		self.table.add_weight(weight);
	}
	pub fn add_in_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.directions.add_in_direction(direction,index);
	}
	pub fn add_out_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.directions.add_out_direction(direction,index);
	}
	pub fn table(&self) -> &RoutingTable
	{
		&self.table
	}
	pub fn directions(&self) -> &PortDirections
	{
		&self.directions
	}
	pub fn routing(&self) -> &dyn Routing
	{
		self.routing.as_ref()
	}
	pub fn routing_mut(&mut self) -> &mut dyn Routing
	{
		self.routing.as_mut()
	}
	/// Compute the output port of a flit that arrived through `inport`.
	/// The returned port is a registered output port of this router.
	/// Any error is a defect of the topology or of its configuration and the caller is expected to abort.
	pub fn outport_compute(&self, route:&RefCell<RouteInfo>, inport:usize, inport_direction:PortDirection, network:&dyn Network, rng:&mut StdRng) -> Result<usize,Error>
	{
		let context = RouterContext{
			router_index: self.router_index,
			table: &self.table,
			directions: &self.directions,
			network,
		};
		let (destination_router,virtual_network) = {
			let route = route.borrow();
			(route.destination_router,route.virtual_network)
		};
		let outport = if destination_router == self.router_index
		{
			// Multiple network interfaces may be attached to this router, all with direction Server.
			let route = route.borrow();
			context.lookup_table(virtual_network,&route.net_dest,rng)?
		}
		else
		{
			self.routing.next(route,&context,inport,inport_direction,rng)?
		};
		log::trace!("router {} routes packet to router {} (vnet {}) from {} to outport {}",self.router_index,destination_router,virtual_network,inport_direction,outport);
		Ok(outport)
	}
	///Like `outport_compute`, but aborting the simulation on errors.
	pub fn outport_compute_or_abort(&self, route:&RefCell<RouteInfo>, inport:usize, inport_direction:PortDirection, network:&dyn Network, rng:&mut StdRng) -> usize
	{
		match self.outport_compute(route,inport,inport_direction,network,rng)
		{
			Ok(outport) => outport,
			Err(error) => panic!("Fatal routing error at router {}: {}",self.router_index,error),
		}
	}
}
