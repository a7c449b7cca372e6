
use std::cell::RefCell;

use ::rand::rngs::StdRng;

use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::routing::prelude::*;
use crate::{error,source_location};

/**
Dimension ordered routing in a 2D mesh. Packets first advance along their row (East/West) until reaching the column of the destination and then along the column (North/South).
Rows grow towards North and columns towards East.

A packet never turns back in the same dimension, so a packet going East must have been injected or come from the West port. A packet may only enter the North/South ports after having finished with the East/West ones.
**/
#[derive(Debug)]
pub struct MeshXY
{
}

impl Routing for MeshXY
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, _inport:usize, inport_direction:PortDirection, _rng:&mut StdRng) -> Result<usize,Error>
	{
		let size = router.network.mesh_size().ok_or_else(||error!(missing_topology_data,"MeshXY"))?;
		if size.rows==0 || size.columns==0
		{
			return Err(error!(bad_argument).with_message(format!("empty mesh {}x{}",size.rows,size.columns)));
		}
		let current = router.router_index;
		let destination = route.borrow().destination_router;
		let (current_x,current_y) = size.unpack(current);
		let (destination_x,destination_y) = size.unpack(destination);
		let delta_x = destination_x as isize - current_x as isize;
		let delta_y = destination_y as isize - current_y as isize;
		let outport_direction = if delta_x != 0
		{
			if delta_x > 0
			{
				check_inport(current,inport_direction,PortDirection::East,|d|d==PortDirection::Server || d==PortDirection::West)?
			}
			else
			{
				check_inport(current,inport_direction,PortDirection::West,|d|d==PortDirection::Server || d==PortDirection::East)?
			}
		}
		else if delta_y != 0
		{
			if delta_y > 0
			{
				check_inport(current,inport_direction,PortDirection::North,|d|d!=PortDirection::North)?
			}
			else
			{
				check_inport(current,inport_direction,PortDirection::South,|d|d!=PortDirection::South)?
			}
		}
		else
		{
			// The destination router should have been handled by the routing unit.
			return Err(error!(zero_distance,current,destination));
		};
		router.outport(outport_direction)
	}
}

///Return `outport_direction` if the `inport_direction` is allowed by `allowed`.
pub(crate) fn check_inport(router_index:usize, inport_direction:PortDirection, outport_direction:PortDirection, allowed:impl Fn(PortDirection)->bool) -> Result<PortDirection,Error>
{
	if allowed(inport_direction)
	{
		Ok(outport_direction)
	}
	else
	{
		Err(error!(unexpected_inbound_direction,router_index,inport_direction,outport_direction))
	}
}

impl MeshXY
{
	pub fn new(arg: RoutingBuilderArgument) -> MeshXY
	{
		match_object_panic!(arg.cv,["MeshXY","XY"],_value,);
		MeshXY{
		}
	}
}
