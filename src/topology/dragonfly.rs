
use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::direction::PortDirection;
use crate::network::DragonflySize;
use super::{StaticTopology,TopologyBuilderArgument,LinkDescription,CommonParameters,Shape};

/**
The links of a dragonfly, with each group a complete graph of local links and a global link between each pair of groups.

The local port `k` of the router at offset `o` goes to offset `o+k+1`, modulo the routers per group.
The global port `k` of the router at offset `o` of group `g` goes to group `g+o*C+k+1`, modulo the number of groups, with `C` the global channels per router. With fewer groups than the maximum, the ports that would go back to the own group are left unconnected.
**/
pub fn dragonfly_links(size:DragonflySize) -> Vec<Vec<LinkDescription>>
{
	let routers_per_group = size.routers_per_group;
	let channels = size.global_channels_per_router;
	(0..size.num_routers()).map(|router|{
		let (offset,group) = size.unpack(router);
		let mut links = Vec::with_capacity(routers_per_group-1+channels);
		for port in 0..routers_per_group-1
		{
			let neighbour_offset = (offset+port+1) % routers_per_group;
			links.push(LinkDescription{
				direction: PortDirection::Local(port),
				neighbour_router: size.pack((neighbour_offset,group)),
				neighbour_direction: PortDirection::Local(size.local_port(neighbour_offset,offset)),
				weight: 1,
			});
		}
		for port in 0..channels
		{
			let gap = offset*channels + port;
			if gap+1 >= size.number_of_groups
			{
				continue;
			}
			let neighbour_group = (group+gap+1) % size.number_of_groups;
			let (neighbour_offset,neighbour_port) = size.exit(neighbour_group,group);
			links.push(LinkDescription{
				direction: PortDirection::Global(port),
				neighbour_router: size.pack((neighbour_offset,neighbour_group)),
				neighbour_direction: PortDirection::Global(neighbour_port),
				weight: 2,
			});
		}
		links
	}).collect()
}

pub fn new_dragonfly(arg:TopologyBuilderArgument) -> StaticTopology
{
	let mut routers_per_group=None;
	let mut global_channels_per_router=None;
	let mut number_of_groups=None;
	let mut common=CommonParameters::default();
	match_object_panic!(arg.cv,"Dragonfly",value,
		"routers_per_group" => routers_per_group=Some(value.as_usize().expect("bad value for routers_per_group")),
		"global_channels_per_router" => global_channels_per_router=Some(value.as_usize().expect("bad value for global_channels_per_router")),
		"number_of_groups" => number_of_groups=Some(value.as_usize().expect("bad value for number_of_groups")),
		"servers_per_router" => common.servers_per_router=value.as_usize().expect("bad value for servers_per_router"),
		"ordered_virtual_networks" => common.ordered_virtual_networks=CommonParameters::parse_ordered_virtual_networks(value),
		"virtual_channels" => common.virtual_channels=value.as_usize().expect("bad value for virtual_channels"),
	);
	let routers_per_group = routers_per_group.expect("There were no routers_per_group");
	let global_channels_per_router = global_channels_per_router.expect("There were no global_channels_per_router");
	if routers_per_group==0 || global_channels_per_router==0
	{
		panic!("A Dragonfly needs routers in its groups and global channels in its routers");
	}
	let maximum_groups = routers_per_group*global_channels_per_router + 1;
	let number_of_groups = number_of_groups.unwrap_or(maximum_groups);
	if number_of_groups==0 || number_of_groups>maximum_groups
	{
		panic!("A Dragonfly with {} routers per group and {} global channels per router must have between 1 and {} groups, not {}",routers_per_group,global_channels_per_router,maximum_groups,number_of_groups);
	}
	let size = DragonflySize{ number_of_groups, routers_per_group, global_channels_per_router };
	StaticTopology::build(Shape::Dragonfly(size),dragonfly_links(size),common,arg.routing,arg.plugs).unwrap_or_else(|error|panic!("Could not build the dragonfly {:?}: {}",size,error))
}
