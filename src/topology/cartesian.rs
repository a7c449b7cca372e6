
use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::direction::PortDirection;
use crate::network::MeshSize;
use super::{StaticTopology,TopologyBuilderArgument,LinkDescription,CommonParameters,Shape};

///The links of a mesh. Routers at the border lack the ports that would leave the mesh.
pub fn mesh_links(size:MeshSize) -> Vec<Vec<LinkDescription>>
{
	(0..size.num_routers()).map(|router|{
		let (column,row) = size.unpack(router);
		let mut links = Vec::with_capacity(4);
		if column+1 < size.columns
		{
			links.push(LinkDescription{ direction:PortDirection::East, neighbour_router:size.pack((column+1,row)), neighbour_direction:PortDirection::West, weight:1 });
		}
		if column > 0
		{
			links.push(LinkDescription{ direction:PortDirection::West, neighbour_router:size.pack((column-1,row)), neighbour_direction:PortDirection::East, weight:1 });
		}
		if row+1 < size.rows
		{
			links.push(LinkDescription{ direction:PortDirection::North, neighbour_router:size.pack((column,row+1)), neighbour_direction:PortDirection::South, weight:2 });
		}
		if row > 0
		{
			links.push(LinkDescription{ direction:PortDirection::South, neighbour_router:size.pack((column,row-1)), neighbour_direction:PortDirection::North, weight:2 });
		}
		links
	}).collect()
}

///The links of a ring. A single router has none.
pub fn ring_links(num_routers:usize) -> Vec<Vec<LinkDescription>>
{
	(0..num_routers).map(|router|{
		if num_routers < 2
		{
			return vec![];
		}
		vec![
			LinkDescription{ direction:PortDirection::East, neighbour_router:(router+1)%num_routers, neighbour_direction:PortDirection::West, weight:1 },
			LinkDescription{ direction:PortDirection::West, neighbour_router:(router+num_routers-1)%num_routers, neighbour_direction:PortDirection::East, weight:1 },
		]
	}).collect()
}

pub fn new_mesh(arg:TopologyBuilderArgument) -> StaticTopology
{
	let mut rows=None;
	let mut columns=None;
	let mut common=CommonParameters::default();
	match_object_panic!(arg.cv,"Mesh",value,
		"rows" => rows=Some(value.as_usize().expect("bad value for rows")),
		"columns" => columns=Some(value.as_usize().expect("bad value for columns")),
		"servers_per_router" => common.servers_per_router=value.as_usize().expect("bad value for servers_per_router"),
		"ordered_virtual_networks" => common.ordered_virtual_networks=CommonParameters::parse_ordered_virtual_networks(value),
		"virtual_channels" => common.virtual_channels=value.as_usize().expect("bad value for virtual_channels"),
	);
	let size = MeshSize{
		rows: rows.expect("There were no rows"),
		columns: columns.expect("There were no columns"),
	};
	StaticTopology::build(Shape::Mesh(size),mesh_links(size),common,arg.routing,arg.plugs).unwrap_or_else(|error|panic!("Could not build the mesh {}x{}: {}",size.rows,size.columns,error))
}

pub fn new_ring(arg:TopologyBuilderArgument) -> StaticTopology
{
	let mut routers=None;
	let mut common=CommonParameters::default();
	match_object_panic!(arg.cv,"Ring",value,
		"routers" => routers=Some(value.as_usize().expect("bad value for routers")),
		"servers_per_router" => common.servers_per_router=value.as_usize().expect("bad value for servers_per_router"),
		"ordered_virtual_networks" => common.ordered_virtual_networks=CommonParameters::parse_ordered_virtual_networks(value),
		"virtual_channels" => common.virtual_channels=value.as_usize().expect("bad value for virtual_channels"),
	);
	let routers = routers.expect("There were no routers");
	StaticTopology::build(Shape::Ring,ring_links(routers),common,arg.routing,arg.plugs).unwrap_or_else(|error|panic!("Could not build the ring of {} routers: {}",routers,error))
}
