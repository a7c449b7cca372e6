
use std::cell::RefCell;

use ::rand::rngs::StdRng;

use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::routing::prelude::*;
use crate::routing::mesh::check_inport;
use crate::{error,source_location};

/**
Shortest direction routing in a ring. Going East increases the router index, modulo the number of routers.
When both directions have the same length, which happens for the antipodal router of an even ring, the packet goes East.
**/
#[derive(Debug)]
pub struct Ring
{
}

impl Routing for Ring
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, _inport:usize, inport_direction:PortDirection, _rng:&mut StdRng) -> Result<usize,Error>
	{
		let num_routers = router.network.num_routers();
		if num_routers==0
		{
			return Err(error!(missing_topology_data,"Ring"));
		}
		let current = router.router_index;
		let destination = route.borrow().destination_router;
		let (east,hops) = ring_direction(num_routers,current,destination);
		if hops==0
		{
			return Err(error!(zero_distance,current,destination));
		}
		let outport_direction = if east
		{
			check_inport(current,inport_direction,PortDirection::East,|d|d==PortDirection::Server || d==PortDirection::West)?
		}
		else
		{
			check_inport(current,inport_direction,PortDirection::West,|d|d==PortDirection::Server || d==PortDirection::East)?
		};
		router.outport(outport_direction)
	}
}

///Whether to go East from `current` to `destination` and the number of hops in that direction.
pub fn ring_direction(num_routers:usize, current:usize, destination:usize) -> (bool,usize)
{
	let clockwise = (destination + num_routers - current) % num_routers;
	if clockwise <= num_routers/2
	{
		(true,clockwise)
	}
	else
	{
		(false,num_routers - clockwise)
	}
}

impl Ring
{
	pub fn new(arg: RoutingBuilderArgument) -> Ring
	{
		match_object_panic!(arg.cv,["Ring","Custom"],_value,);
		Ring{
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn shortest_direction()
	{
		assert_eq!(ring_direction(8,0,3),(true,3));
		assert_eq!(ring_direction(8,0,5),(false,3));
		assert_eq!(ring_direction(8,6,1),(true,3));
		// antipodal router of an even ring goes East.
		assert_eq!(ring_direction(8,2,6),(true,4));
		assert_eq!(ring_direction(8,6,2),(true,4));
		assert_eq!(ring_direction(7,0,4),(false,3));
		assert_eq!(ring_direction(7,0,3),(true,3));
		assert_eq!(ring_direction(5,3,3),(true,0));
	}
}
