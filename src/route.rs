
use crate::net_dest::NetDest;

///Information carried by a flit for the routing units to operate.
///Everything is fixed when the packet is created except `intermediate_group`.
#[derive(Debug,Clone,PartialEq)]
pub struct RouteInfo
{
	///Router into which the packet was injected.
	pub source_router: usize,
	///Router to which the destination node is attached.
	pub destination_router: usize,
	///Node that injected the packet.
	pub source_node: usize,
	///Virtual network of the packet.
	pub virtual_network: usize,
	///Nodes to which the packet may be delivered. Never empty.
	pub net_dest: NetDest,
	///Group selected by the dragonfly UGAL/VAL routings for the packet to cross before going to its destination.
	///Set only at the source router and cleared by the first router of that group that handles the packet.
	pub intermediate_group: Option<usize>,
}

impl RouteInfo
{
	pub fn new(source_node:usize, source_router:usize, destination_node:usize, destination_router:usize, virtual_network:usize) -> RouteInfo
	{
		RouteInfo{
			source_router,
			destination_router,
			source_node,
			virtual_network,
			net_dest: NetDest::single(destination_node),
			intermediate_group: None,
		}
	}
}
