/*!

Routings for the dragonfly of [DragonflySize](crate::network::DragonflySize), in which every router of a group is joined to all the others of its group by local channels and each group has a global channel to every other group.

* [DragonflyMinimal] goes to the router of the group holding the global channel to the destination group, crosses it, and goes to the destination router. This is, at most a local, a global, and a local hop.
* [DragonflyVAL] is Valiant's scheme: at the source router a random intermediate group is selected and the packet is routed minimally to it and then minimally to the destination.
* [DragonflyUGAL] selects at the source router between the minimal route and the Valiant route through a random group according to the occupancy of the local links that each would use.

The intermediate group is stored in the [RouteInfo] of the packet and cleared by the first router of that group.

Deadlock avoidance relies on the channels being used in order. The routings check that the port through which the packet arrived is consistent with the port they are going to use, returning an error otherwise.

*/

use std::cell::RefCell;

use ::rand::{rngs::StdRng,Rng};

use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::network::DragonflySize;
use crate::routing::prelude::*;
use crate::{error,source_location};

///Which inbound ports are valid at each step of the route.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
enum ChannelDiscipline
{
	///Only minimal routes: local, global, local.
	Minimal,
	///Routes that may cross an intermediate group: local, global, local, global, local.
	Nonminimal,
}

///Get the dragonfly size of the network, checking that it is usable.
fn dragonfly_size(router:&RouterContext, routing:&'static str) -> Result<DragonflySize,Error>
{
	let size = router.network.dragonfly_size().ok_or_else(||error!(missing_topology_data,routing))?;
	if size.number_of_groups==0 || size.routers_per_group==0 || size.global_channels_per_router==0
	{
		return Err(error!(bad_argument).with_message(format!("degenerate dragonfly {:?}",size)));
	}
	if router.router_index >= size.num_routers()
	{
		return Err(error!(bad_argument).with_message(format!("router {} is not in the dragonfly {:?}",router.router_index,size)));
	}
	Ok(size)
}

/**
The direction to take from `current` to advance minimally towards `target_group`, or towards `destination` when already in `target_group`.
`target_group` is either the group of `destination` or an intermediate group.
**/
fn minimal_direction(size:DragonflySize, current:usize, destination:usize, target_group:usize, inport_direction:PortDirection, discipline:ChannelDiscipline) -> Result<PortDirection,Error>
{
	let (current_offset,current_group) = size.unpack(current);
	let allowed = |outport_direction:PortDirection, valid:bool| -> Result<PortDirection,Error> {
		if valid
		{
			Ok(outport_direction)
		}
		else
		{
			Err(error!(unexpected_inbound_direction,current,inport_direction,outport_direction))
		}
	};
	if current_group != target_group
	{
		let (exit_offset,global_port) = size.exit(current_group,target_group);
		if current_offset != exit_offset
		{
			let outport_direction = PortDirection::Local(size.local_port(current_offset,exit_offset));
			let valid = match discipline
			{
				ChannelDiscipline::Minimal => inport_direction==PortDirection::Server,
				// Also when going out of the intermediate group.
				ChannelDiscipline::Nonminimal => inport_direction==PortDirection::Server || inport_direction.is_global(),
			};
			allowed(outport_direction,valid)
		}
		else
		{
			let outport_direction = PortDirection::Global(global_port);
			let valid = match discipline
			{
				ChannelDiscipline::Minimal => inport_direction==PortDirection::Server || inport_direction.is_local(),
				ChannelDiscipline::Nonminimal => true,
			};
			allowed(outport_direction,valid)
		}
	}
	else
	{
		let destination_offset = destination % size.routers_per_group;
		let outport_direction = PortDirection::Local(size.local_port(current_offset,destination_offset));
		allowed(outport_direction, inport_direction==PortDirection::Server || inport_direction.is_global())
	}
}

///A group chosen uniformly among those different of `current_group` and `destination_group`. There must be at least three groups.
fn random_intermediate_group(size:DragonflySize, current_group:usize, destination_group:usize, rng:&mut StdRng) -> usize
{
	let (low,high) = if current_group<destination_group { (current_group,destination_group) } else { (destination_group,current_group) };
	let mut group = rng.gen_range(0..size.number_of_groups-2);
	if group >= low
	{
		group += 1;
	}
	if group >= high
	{
		group += 1;
	}
	group
}

/**
Routing step shared by the Valiant and UGAL routings.
At the source router of a packet going to another group, and only there, `choose` may select an intermediate group. Then the packet is routed minimally towards the intermediate group, if any, or to its destination.
**/
fn nonminimal_next<F>(route:&RefCell<RouteInfo>, router:&RouterContext, inport_direction:PortDirection, routing:&'static str, choose:F) -> Result<usize,Error>
	where F: FnOnce(DragonflySize,usize,usize) -> Result<Option<usize>,Error>
{
	let size = dragonfly_size(router,routing)?;
	let current = router.router_index;
	let mut route = route.borrow_mut();
	let destination = route.destination_router;
	if current == destination
	{
		return Err(error!(zero_distance,current,destination));
	}
	let current_group = size.group(current);
	let destination_group = size.group(destination);
	if size.number_of_groups > 2 && current_group != destination_group && current == route.source_router
	{
		route.intermediate_group = choose(size,current_group,destination_group)?;
	}
	if route.intermediate_group == Some(current_group)
	{
		log::debug!("{} packet from router {} reached its intermediate group {} at router {}",routing,route.source_router,current_group,current);
		route.intermediate_group = None;
	}
	let target_group = route.intermediate_group.unwrap_or(destination_group);
	let direction = minimal_direction(size,current,destination,target_group,inport_direction,ChannelDiscipline::Nonminimal)?;
	router.outport(direction)
}

///Minimal routing in a dragonfly.
#[derive(Debug)]
pub struct DragonflyMinimal
{
}

impl Routing for DragonflyMinimal
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, _inport:usize, inport_direction:PortDirection, _rng:&mut StdRng) -> Result<usize,Error>
	{
		let size = dragonfly_size(router,"DragonflyMinimal")?;
		let current = router.router_index;
		let destination = route.borrow().destination_router;
		if current == destination
		{
			return Err(error!(zero_distance,current,destination));
		}
		let direction = minimal_direction(size,current,destination,size.group(destination),inport_direction,ChannelDiscipline::Minimal)?;
		router.outport(direction)
	}
}

impl DragonflyMinimal
{
	pub fn new(arg: RoutingBuilderArgument) -> DragonflyMinimal
	{
		match_object_panic!(arg.cv,"DragonflyMinimal",_value);
		DragonflyMinimal{
		}
	}
}

///Valiant routing in a dragonfly. Every packet to another group crosses a random intermediate group, provided there are more than two groups.
#[derive(Debug)]
pub struct DragonflyVAL
{
	///Number of intermediate groups selected.
	committed_detours: RefCell<u64>,
}

impl Routing for DragonflyVAL
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, _inport:usize, inport_direction:PortDirection, rng:&mut StdRng) -> Result<usize,Error>
	{
		nonminimal_next(route,router,inport_direction,"DragonflyVAL",|size,current_group,destination_group|{
			let middle_group = random_intermediate_group(size,current_group,destination_group,rng);
			*self.committed_detours.borrow_mut() += 1;
			log::debug!("DragonflyVAL at router {} sends packet to group {} through group {}",router.router_index,destination_group,middle_group);
			Ok(Some(middle_group))
		})
	}
	fn statistics(&self) -> Option<ConfigurationValue>
	{
		Some(ConfigurationValue::Object(String::from("DragonflyVALStatistics"),vec![
			(String::from("committed_detours"),ConfigurationValue::Number(*self.committed_detours.borrow() as f64)),
		]))
	}
	fn reset_statistics(&mut self)
	{
		self.committed_detours = RefCell::new(0);
	}
}

impl DragonflyVAL
{
	pub fn new(arg: RoutingBuilderArgument) -> DragonflyVAL
	{
		match_object_panic!(arg.cv,"DragonflyVAL",_value);
		DragonflyVAL{
			committed_detours: RefCell::new(0),
		}
	}
}

/**
UGAL (Universal Globally-Adaptive Load-balanced) routing in a dragonfly.

At the source router of a packet going to another group a random intermediate group is drawn. The occupancy of the local channel towards the router holding the global channel of the minimal route is compared with that of the local channel towards the router holding the global channel to the intermediate group. The occupancies are read at the input port of the receiving router. When the source router is itself one of those routers the occupancy of the port through which the packet arrived is used instead.

* If the two routers differ, the intermediate group is taken when the total occupancy of the Valiant channel is below 3/5 of the minimal one.
* If both routes leave through the same router, they share the channel. Then the intermediate group is taken when the occupancy of the virtual channel `detour_probe_virtual_channel` is below 3/5 of that of `minimal_probe_virtual_channel`.

The comparison of single virtual channels was tuned for a concrete number of virtual channels, hence the configurable indices.
**/
#[derive(Debug)]
pub struct DragonflyUGAL
{
	///Virtual channel read on the minimal side when both routes share the exit router.
	minimal_probe_virtual_channel: usize,
	///Virtual channel read on the Valiant side when both routes share the exit router.
	detour_probe_virtual_channel: usize,
	///Number of times a choice between the minimal and the Valiant routes has been made.
	evaluated_detours: RefCell<u64>,
	///Number of times the Valiant route has been selected.
	committed_detours: RefCell<u64>,
}

impl Routing for DragonflyUGAL
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, inport:usize, inport_direction:PortDirection, rng:&mut StdRng) -> Result<usize,Error>
	{
		nonminimal_next(route,router,inport_direction,"DragonflyUGAL",|size,current_group,destination_group|{
			let middle_group = random_intermediate_group(size,current_group,destination_group,rng);
			*self.evaluated_detours.borrow_mut() += 1;
			let current_offset = router.router_index % size.routers_per_group;
			let (minimal_offset,_) = size.exit(current_group,destination_group);
			let (detour_offset,_) = size.exit(current_group,middle_group);
			let minimal_load = self.local_channel_load(router,size,inport,current_group,current_offset,minimal_offset)?;
			let detour_load = self.local_channel_load(router,size,inport,current_group,current_offset,detour_offset)?;
			let take_detour = if minimal_offset == detour_offset
			{
				let minimal_probe = probe(&minimal_load,self.minimal_probe_virtual_channel)?;
				let detour_probe = probe(&detour_load,self.detour_probe_virtual_channel)?;
				sufficiently_lower(detour_probe,minimal_probe)
			}
			else
			{
				sufficiently_lower(detour_load.iter().sum(),minimal_load.iter().sum())
			};
			if take_detour
			{
				*self.committed_detours.borrow_mut() += 1;
				log::debug!("DragonflyUGAL at router {} sends packet to group {} through group {} (loads {:?} against {:?})",router.router_index,destination_group,middle_group,detour_load,minimal_load);
				Ok(Some(middle_group))
			}
			else
			{
				Ok(None)
			}
		})
	}
	fn statistics(&self) -> Option<ConfigurationValue>
	{
		Some(ConfigurationValue::Object(String::from("DragonflyUGALStatistics"),vec![
			(String::from("evaluated_detours"),ConfigurationValue::Number(*self.evaluated_detours.borrow() as f64)),
			(String::from("committed_detours"),ConfigurationValue::Number(*self.committed_detours.borrow() as f64)),
		]))
	}
	fn reset_statistics(&mut self)
	{
		self.evaluated_detours = RefCell::new(0);
		self.committed_detours = RefCell::new(0);
	}
}

///Whether `candidate` is below 3/5 of `reference`.
fn sufficiently_lower(candidate:usize, reference:usize) -> bool
{
	candidate*5 < reference*3
}

fn probe(load:&[usize], virtual_channel:usize) -> Result<usize,Error>
{
	load.get(virtual_channel).copied().ok_or_else(||
		error!(ill_formed_configuration,ConfigurationValue::Number(virtual_channel as f64))
			.with_message(format!("cannot probe virtual channel {} in a link with {} virtual channels",virtual_channel,load.len()))
	)
}

impl DragonflyUGAL
{
	pub fn new(arg: RoutingBuilderArgument) -> DragonflyUGAL
	{
		let mut minimal_probe_virtual_channel = 3;
		let mut detour_probe_virtual_channel = 0;
		match_object_panic!(arg.cv,"DragonflyUGAL",value,
			"minimal_probe_virtual_channel" => minimal_probe_virtual_channel = value.as_usize().expect("bad value for minimal_probe_virtual_channel"),
			"detour_probe_virtual_channel" => detour_probe_virtual_channel = value.as_usize().expect("bad value for detour_probe_virtual_channel"),
		);
		DragonflyUGAL{
			minimal_probe_virtual_channel,
			detour_probe_virtual_channel,
			evaluated_detours: RefCell::new(0),
			committed_detours: RefCell::new(0),
		}
	}
	///Occupancy of the local channel from the current router to the router at `exit_offset` of the same group.
	fn local_channel_load(&self, router:&RouterContext, size:DragonflySize, inport:usize, group:usize, current_offset:usize, exit_offset:usize) -> Result<Vec<usize>,Error>
	{
		if exit_offset == current_offset
		{
			return Ok(router.network.input_virtual_channel_load(router.router_index,inport));
		}
		let exit_router = size.pack((exit_offset,group));
		let direction = PortDirection::Local(size.local_port(exit_offset,current_offset));
		let exit_inport = router.network.inport_index(exit_router,direction).ok_or_else(||error!(unregistered_direction,exit_router,direction))?;
		Ok(router.network.input_virtual_channel_load(exit_router,exit_inport))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use crate::error::ErrorKind;
	use crate::direction::PortDirection::*;
	#[test]
	fn minimal_directions()
	{
		// 3 groups of 2 routers with a global channel each.
		let size = DragonflySize{ number_of_groups:3, routers_per_group:2, global_channels_per_router:1 };
		let minimal = ChannelDiscipline::Minimal;
		// Router 0 holds the channel to group 1, router 1 the one to group 2.
		assert_eq!(minimal_direction(size,0,3,1,Server,minimal),Ok(Global(0)));
		assert_eq!(minimal_direction(size,0,5,2,Server,minimal),Ok(Local(0)));
		assert_eq!(minimal_direction(size,1,5,2,Local(0),minimal),Ok(Global(0)));
		// Last local hop inside the destination group.
		assert_eq!(minimal_direction(size,4,5,2,Global(0),minimal),Ok(Local(0)));
		assert_eq!(minimal_direction(size,5,4,2,Global(0),minimal),Ok(Local(0)));
	}
	#[test]
	fn wrong_inbound_directions()
	{
		let size = DragonflySize{ number_of_groups:9, routers_per_group:4, global_channels_per_router:2 };
		// Going to the exit router after a global hop is not minimal.
		let err = minimal_direction(size,0,35,8,Global(1),ChannelDiscipline::Minimal).expect_err("not minimal");
		assert!(matches!(err.kind,ErrorKind::UnexpectedInboundDirection{router_index:0,inport_direction:Global(1),..}));
		// But it is the way of leaving an intermediate group.
		assert!(minimal_direction(size,0,35,8,Global(1),ChannelDiscipline::Nonminimal).is_ok());
		// Two local hops in a row are never allowed.
		assert!(minimal_direction(size,0,35,8,Local(2),ChannelDiscipline::Nonminimal).is_err());
		assert!(minimal_direction(size,0,1,0,Local(2),ChannelDiscipline::Nonminimal).is_err());
		assert!(minimal_direction(size,0,1,0,Local(2),ChannelDiscipline::Minimal).is_err());
	}
	#[test]
	fn intermediate_groups_are_uniform()
	{
		let size = DragonflySize{ number_of_groups:7, routers_per_group:3, global_channels_per_router:2 };
		let mut rng = StdRng::seed_from_u64(10);
		let mut counts = vec![0usize;size.number_of_groups];
		let trials = 50000;
		for _ in 0..trials
		{
			counts[random_intermediate_group(size,4,1,&mut rng)] += 1;
		}
		assert_eq!(counts[4],0);
		assert_eq!(counts[1],0);
		let expected = trials/5;
		for group in [0,2,3,5,6]
		{
			let deviation = (counts[group] as f64 - expected as f64).abs() / expected as f64;
			assert!(deviation < 0.05, "group {} selected {} times, expected around {}",group,counts[group],expected);
		}
	}
	#[test]
	fn three_fifths()
	{
		assert!(sufficiently_lower(2,4));
		assert!(!sufficiently_lower(3,5));
		assert!(!sufficiently_lower(0,0));
		assert!(probe(&[1,2],3).is_err());
		assert_eq!(probe(&[1,2],1).ok(),Some(2));
	}
}
