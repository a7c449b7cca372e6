/*!

The view of the network that the routing units consult.

The `Network` is implemented by whatever holds the routers of the simulation, such as [StaticTopology](crate::topology::StaticTopology). Routings only read from it.

*/

use crate::direction::PortDirection;

///Dimensions of a mesh, with router `i` at column `i % columns` and row `i / columns`.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct MeshSize
{
	pub rows: usize,
	pub columns: usize,
}

impl MeshSize
{
	///Get `(column,row)` of a router.
	pub fn unpack(&self, router:usize) -> (usize,usize)
	{
		(router % self.columns, router / self.columns)
	}
	pub fn pack(&self, (column,row):(usize,usize)) -> usize
	{
		row*self.columns + column
	}
	pub fn num_routers(&self) -> usize
	{
		self.rows*self.columns
	}
}

/**
Dimensions of a dragonfly. Router `i` is the router `i % routers_per_group` of the group `i / routers_per_group`.

The global channels of a group are numbered by the gap to their target group: the `k`-th global channel of the router at offset `o` in group `g` goes to group `g + o*global_channels_per_router + k + 1`, modulo `number_of_groups`.
**/
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct DragonflySize
{
	pub number_of_groups: usize,
	pub routers_per_group: usize,
	pub global_channels_per_router: usize,
}

impl DragonflySize
{
	///Get `(offset,group)` of a router.
	pub fn unpack(&self, router:usize) -> (usize,usize)
	{
		(router % self.routers_per_group, router / self.routers_per_group)
	}
	pub fn pack(&self, (offset,group):(usize,usize)) -> usize
	{
		group*self.routers_per_group + offset
	}
	pub fn group(&self, router:usize) -> usize
	{
		router / self.routers_per_group
	}
	pub fn num_routers(&self) -> usize
	{
		self.number_of_groups*self.routers_per_group
	}
	///Number of groups skipped when going from `origin` group to `target` group, counting forward. Zero for the next group.
	///Must not be called with `origin==target`.
	pub fn group_gap(&self, origin:usize, target:usize) -> usize
	{
		(target + self.number_of_groups - origin - 1) % self.number_of_groups
	}
	///The `(offset,global_port)` of the router in group `origin` holding the global channel to group `target`.
	pub fn exit(&self, origin:usize, target:usize) -> (usize,usize)
	{
		let gap = self.group_gap(origin,target);
		(gap / self.global_channels_per_router, gap % self.global_channels_per_router)
	}
	///Index of the local channel going from the router at offset `from` to the router at offset `to`, of the same group.
	///The same formula gives the local inport at `from` through which packets from `to` arrive.
	pub fn local_port(&self, from:usize, to:usize) -> usize
	{
		(to + self.routers_per_group - from - 1) % self.routers_per_group
	}
}

///Queries that routing units make about the network containing them.
pub trait Network
{
	///Total number of routers.
	fn num_routers(&self) -> usize;
	///The sizes of the mesh, if the network is a mesh.
	fn mesh_size(&self) -> Option<MeshSize> { None }
	///The sizes of the dragonfly, if the network is a dragonfly.
	fn dragonfly_size(&self) -> Option<DragonflySize> { None }
	///Whether packets of a virtual network must be delivered in order. Ordered virtual networks are routed deterministically.
	fn is_virtual_network_ordered(&self, virtual_network:usize) -> bool;
	///Index of the input port with the given direction in another router.
	fn inport_index(&self, router:usize, direction:PortDirection) -> Option<usize>;
	///Occupancy of each virtual channel of the link entering `router` through `inport`, as of the current cycle.
	fn input_virtual_channel_load(&self, router:usize, inport:usize) -> Vec<usize>;
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn dragonfly_exits_cover_every_group()
	{
		let size = DragonflySize{ number_of_groups:9, routers_per_group:4, global_channels_per_router:2 };
		for origin in 0..size.number_of_groups
		{
			let mut exits = std::collections::BTreeSet::new();
			for target in (0..size.number_of_groups).filter(|&g|g!=origin)
			{
				let (offset,port) = size.exit(origin,target);
				assert!(offset < size.routers_per_group && port < size.global_channels_per_router);
				assert_eq!((origin + offset*size.global_channels_per_router + port + 1) % size.number_of_groups, target);
				exits.insert((offset,port));
			}
			assert_eq!(exits.len(), size.number_of_groups-1);
		}
		assert_eq!(size.local_port(0,1),0);
		assert_eq!(size.local_port(1,0),2);
		assert_eq!(size.unpack(size.pack((3,5))),(3,5));
	}
}
