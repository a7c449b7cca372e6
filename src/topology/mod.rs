
/*!

A topology builds the routers of a network, connects them, and fills their routing tables.

The routers are built with a [RoutingUnit] each, with all of them using the same routing configuration. The built [StaticTopology] implements [Network], so it is what the routing units consult while routing, and it can follow packets hop by hop from their source to their destination.

see [`new_topology`](fn.new_topology.html) for documentation on the configuration syntax of predefined topologies.

*/

pub mod cartesian;
pub mod dragonfly;

use std::cell::RefCell;
use std::collections::BTreeMap;

use ::rand::rngs::StdRng;

use crate::config::ConfigurationValue;
use crate::direction::PortDirection;
use crate::matrix::Matrix;
use crate::net_dest::NetDest;
use crate::network::{Network,MeshSize,DragonflySize};
use crate::route::RouteInfo;
use crate::routing::{new_routing,RoutingBuilderArgument,RoutingUnit,Error};
use crate::Plugs;
use crate::{error,source_location};

/// Some things most uses of the topology module will use.
pub mod prelude
{
	pub use super::{StaticTopology,Location,Hop,Shape,LinkDescription,CommonParameters,TopologyBuilderArgument,new_topology};
}

///The other end of a port.
#[derive(Clone,Debug,Hash,Eq,PartialEq)]
pub enum Location
{
	RouterPort{
		router_index: usize,
		router_port: usize,
	},
	ServerPort(usize),
}

///A link from a router to another router, as declared by the builder of a topology.
///Links are bidirectional: the neighbour must declare the link back with `neighbour_direction`.
#[derive(Clone,Debug)]
pub struct LinkDescription
{
	///Direction of the port in this router, used both as input and output.
	pub direction: PortDirection,
	pub neighbour_router: usize,
	///Direction of the port in the neighbour router.
	pub neighbour_direction: PortDirection,
	///Weight of the link in the routing tables.
	pub weight: usize,
}

///The kind of network, with the parameters that the routings may ask for.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Shape
{
	Mesh(MeshSize),
	Ring,
	Dragonfly(DragonflySize),
	///A network built by a plugged builder, which can only be routed through the tables.
	Other,
}

///Configuration fields accepted by every topology.
#[derive(Clone,Debug)]
pub struct CommonParameters
{
	///Number of network interfaces attached to each router.
	pub servers_per_router: usize,
	///Whether each virtual network is ordered. Its length is the number of virtual networks.
	pub ordered_virtual_networks: Vec<bool>,
	///Number of virtual channels in each input port.
	pub virtual_channels: usize,
}

impl Default for CommonParameters
{
	fn default() -> CommonParameters
	{
		CommonParameters{
			servers_per_router: 1,
			ordered_virtual_networks: vec![false],
			virtual_channels: 4,
		}
	}
}

impl CommonParameters
{
	///Read `ordered_virtual_networks: [true,false,...]`.
	pub fn parse_ordered_virtual_networks(value:&ConfigurationValue) -> Vec<bool>
	{
		value.as_array().expect("bad value for ordered_virtual_networks").iter().map(|v|v.as_bool().expect("bad value in ordered_virtual_networks")).collect()
	}
}

///The argument of a builder function for topologies.
#[derive(Debug)]
pub struct TopologyBuilderArgument<'a>
{
	///A ConfigurationValue::Object defining the topology.
	pub cv: &'a ConfigurationValue,
	///The routing to be used by every router.
	pub routing: &'a ConfigurationValue,
	///The user defined plugs. In case the topology needs to create elements.
	pub plugs: &'a Plugs,
}

///A step of a packet through the network.
#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Hop
{
	pub router: usize,
	pub inport: usize,
	pub inport_direction: PortDirection,
	pub outport: usize,
	pub outport_direction: PortDirection,
}

/**
A network of routers connected once and for all.

In each router the ports to other routers come first, in the order given by the builder, followed by the ports to its servers. Each port is both an input and an output port with the same direction and index. Node `n` is attached to router `n / servers_per_router`.
**/
#[derive(Debug)]
pub struct StaticTopology
{
	shape: Shape,
	servers_per_router: usize,
	units: Vec<RoutingUnit>,
	///`neighbours[router][port]` is the other end of the port.
	neighbours: Vec<Vec<Location>>,
	///`servers[node]` is the `(router,port)` to which the node is attached.
	servers: Vec<(usize,usize)>,
	ordered_virtual_networks: Vec<bool>,
	virtual_channels: usize,
	///Occupancy of the input virtual channels by `(router,inport)`. Ports not present are empty.
	loads: BTreeMap<(usize,usize),Vec<usize>>,
}

const UNREACHABLE: usize = usize::MAX/3;

///Weighted distances between all pairs of routers, by the Floyd–Warshall algorithm. `UNREACHABLE` for disconnected pairs.
fn weighted_distances(links:&[Vec<LinkDescription>]) -> Matrix<usize>
{
	let n=links.len();
	let mut matrix=Matrix::constant(UNREACHABLE,n,n);
	for (origin,router_links) in links.iter().enumerate()
	{
		*matrix.get_mut(origin,origin)=0;
		for link in router_links
		{
			let d = matrix.get_mut(origin,link.neighbour_router);
			if link.weight < *d
			{
				*d = link.weight;
			}
		}
	}
	for k in 0..n
	{
		for i in 0..n
		{
			let ik = *matrix.get(i,k);
			if ik==UNREACHABLE
			{
				continue;
			}
			for j in 0..n
			{
				let alt = ik + *matrix.get(k,j);
				if alt < *matrix.get(i,j)
				{
					*matrix.get_mut(i,j)=alt;
				}
			}
		}
	}
	matrix
}

impl StaticTopology
{
	/**
	Connect the routers and build their routing units.
	`links[router]` are the links of each router to others.
	The table entry of a link contains the nodes of every router to which the link is in a path of minimum total weight. The entry of a server port contains just its node.
	**/
	pub fn build(shape:Shape, links:Vec<Vec<LinkDescription>>, common:CommonParameters, routing:&ConfigurationValue, plugs:&Plugs) -> Result<StaticTopology,Error>
	{
		let num_routers = links.len();
		let servers_per_router = common.servers_per_router;
		let num_virtual_networks = common.ordered_virtual_networks.len();
		if num_virtual_networks == 0
		{
			return Err(error!(bad_argument).with_message("there must be at least one virtual network".to_string()));
		}
		let mut neighbours = Vec::with_capacity(num_routers);
		let mut servers = Vec::with_capacity(num_routers*servers_per_router);
		for (router_index,router_links) in links.iter().enumerate()
		{
			let mut ports = Vec::with_capacity(router_links.len()+servers_per_router);
			for link in router_links
			{
				let router_port = links.get(link.neighbour_router)
					.and_then(|back| back.iter().position(|l|l.direction==link.neighbour_direction && l.neighbour_router==router_index))
					.ok_or_else(||error!(bad_argument).with_message(format!("the link {} of router {} to router {} has no link back through {}",link.direction,router_index,link.neighbour_router,link.neighbour_direction)))?;
				ports.push(Location::RouterPort{router_index:link.neighbour_router,router_port});
			}
			for offset in 0..servers_per_router
			{
				let node = router_index*servers_per_router + offset;
				servers.push((router_index,ports.len()));
				ports.push(Location::ServerPort(node));
			}
			neighbours.push(ports);
		}
		let distance = weighted_distances(&links);
		let mut units = Vec::with_capacity(num_routers);
		for (router_index,router_links) in links.iter().enumerate()
		{
			let mut unit = RoutingUnit::new(router_index,new_routing(RoutingBuilderArgument{cv:routing,plugs}));
			for (port,link) in router_links.iter().enumerate()
			{
				let neighbour = link.neighbour_router;
				let reachable : NetDest = (0..num_routers)
					.filter(|&target| target!=router_index && *distance.get(router_index,target)!=UNREACHABLE
						&& *distance.get(router_index,target) == link.weight + *distance.get(neighbour,target))
					.flat_map(|target| target*servers_per_router..(target+1)*servers_per_router)
					.collect();
				unit.add_route(vec![reachable;num_virtual_networks]);
				unit.add_weight(link.weight);
				unit.add_in_direction(link.direction,port);
				unit.add_out_direction(link.direction,port);
			}
			for offset in 0..servers_per_router
			{
				let port = router_links.len() + offset;
				unit.add_route(vec![NetDest::single(router_index*servers_per_router+offset);num_virtual_networks]);
				unit.add_weight(1);
				unit.add_in_direction(PortDirection::Server,port);
				unit.add_out_direction(PortDirection::Server,port);
			}
			unit.table().check().map_err(|e|e.with_message(format!("building router {}",router_index)))?;
			units.push(unit);
		}
		log::debug!("built {:?} network with {} routers, {} servers, and {} virtual networks",shape,num_routers,servers.len(),num_virtual_networks);
		Ok(StaticTopology{
			shape,
			servers_per_router,
			units,
			neighbours,
			servers,
			ordered_virtual_networks: common.ordered_virtual_networks,
			virtual_channels: common.virtual_channels,
			loads: BTreeMap::new(),
		})
	}
	pub fn shape(&self) -> Shape
	{
		self.shape
	}
	pub fn num_servers(&self) -> usize
	{
		self.servers.len()
	}
	pub fn servers_per_router(&self) -> usize
	{
		self.servers_per_router
	}
	pub fn num_virtual_networks(&self) -> usize
	{
		self.ordered_virtual_networks.len()
	}
	///The `(router,port)` to which a node is attached.
	pub fn server_location(&self, node:usize) -> Option<(usize,usize)>
	{
		self.servers.get(node).copied()
	}
	pub fn unit(&self, router:usize) -> &RoutingUnit
	{
		&self.units[router]
	}
	pub fn unit_mut(&mut self, router:usize) -> &mut RoutingUnit
	{
		&mut self.units[router]
	}
	///The other end of a port, if the port exists.
	pub fn neighbour(&self, router:usize, port:usize) -> Option<&Location>
	{
		self.neighbours.get(router).and_then(|ports|ports.get(port))
	}
	///Set the occupancy of the virtual channels of an input port.
	pub fn set_input_load(&mut self, router:usize, inport:usize, load:Vec<usize>)
	{
		self.loads.insert((router,inport),load);
	}
	///Empty every input port.
	pub fn clear_input_loads(&mut self)
	{
		self.loads.clear();
	}
	///The statistics of the routing of each router that reports them.
	pub fn routing_statistics(&self) -> Vec<ConfigurationValue>
	{
		self.units.iter().filter_map(|unit|unit.routing().statistics()).collect()
	}
	///Add up the numeric field `field` of the statistics of every router.
	pub fn total_routing_statistic(&self, field:&str) -> f64
	{
		self.routing_statistics().iter().filter_map(|s|s.get(field)).filter_map(|v|v.as_f64().ok()).sum()
	}
	pub fn reset_routing_statistics(&mut self)
	{
		for unit in self.units.iter_mut()
		{
			unit.routing_mut().reset_statistics();
		}
	}
	///Route a new packet from `source_node` to `destination_node`, returning the hops it makes.
	pub fn route_packet(&self, source_node:usize, destination_node:usize, virtual_network:usize, rng:&mut StdRng) -> Result<Vec<Hop>,Error>
	{
		let (source_router,source_port) = self.server_location(source_node).ok_or_else(||error!(bad_argument).with_message(format!("there is no node {}",source_node)))?;
		let (destination_router,_) = self.server_location(destination_node).ok_or_else(||error!(bad_argument).with_message(format!("there is no node {}",destination_node)))?;
		let route = RefCell::new(RouteInfo::new(source_node,source_router,destination_node,destination_router,virtual_network));
		self.follow_route(&route,source_router,source_port,rng)
	}
	/**
	Follow a packet from the input port `inport` of `router` until it is delivered to a node of its destination set.
	Fails with the error of the routing unit, or if the packet goes round for longer than any sensible route.
	**/
	pub fn follow_route(&self, route:&RefCell<RouteInfo>, router:usize, inport:usize, rng:&mut StdRng) -> Result<Vec<Hop>,Error>
	{
		let max_hops = 2*self.units.len() + 2;
		let mut hops = Vec::new();
		let mut current = router;
		let mut inport = inport;
		loop
		{
			let unit = self.units.get(current).ok_or_else(||error!(bad_argument).with_message(format!("there is no router {}",current)))?;
			let inport_direction = unit.directions().inport_direction(inport).ok_or_else(||error!(bad_argument).with_message(format!("router {} has no input port {}",current,inport)))?;
			let outport = unit.outport_compute(route,inport,inport_direction,self,rng)?;
			let outport_direction = unit.directions().outport_direction(outport).ok_or_else(||error!(bad_argument).with_message(format!("router {} has no output port {}",current,outport)))?;
			hops.push(Hop{router:current,inport,inport_direction,outport,outport_direction});
			match self.neighbour(current,outport)
			{
				Some(&Location::RouterPort{router_index,router_port}) =>
				{
					current = router_index;
					inport = router_port;
				},
				Some(&Location::ServerPort(node)) =>
				{
					if route.borrow().net_dest.contains(node)
					{
						return Ok(hops);
					}
					return Err(error!(bad_argument).with_message(format!("packet {:?} delivered to node {}",route.borrow(),node)));
				},
				None => return Err(error!(bad_argument).with_message(format!("port {} of router {} is not connected",outport,current))),
			}
			if hops.len() > max_hops
			{
				return Err(error!(undetermined).with_message(format!("packet {:?} has not arrived after {} hops",route.borrow(),hops.len())));
			}
		}
	}
}

impl Network for StaticTopology
{
	fn num_routers(&self) -> usize
	{
		self.units.len()
	}
	fn mesh_size(&self) -> Option<MeshSize>
	{
		match self.shape
		{
			Shape::Mesh(size) => Some(size),
			_ => None,
		}
	}
	fn dragonfly_size(&self) -> Option<DragonflySize>
	{
		match self.shape
		{
			Shape::Dragonfly(size) => Some(size),
			_ => None,
		}
	}
	fn is_virtual_network_ordered(&self, virtual_network:usize) -> bool
	{
		self.ordered_virtual_networks.get(virtual_network).copied().unwrap_or(false)
	}
	fn inport_index(&self, router:usize, direction:PortDirection) -> Option<usize>
	{
		self.units.get(router).and_then(|unit|unit.directions().inport_index(direction))
	}
	fn input_virtual_channel_load(&self, router:usize, inport:usize) -> Vec<usize>
	{
		match self.loads.get(&(router,inport))
		{
			Some(load) => load.clone(),
			None => vec![0;self.virtual_channels],
		}
	}
}

/**Build a new topology, with a routing unit in each router using the `routing` configuration.

Every topology accepts these fields, here with their default values.
```ignore
	//number of network interfaces attached to each router.
	servers_per_router: 1,
	//packets of ordered virtual networks are routed deterministically through the tables. There are as many virtual networks as entries.
	ordered_virtual_networks: [false],
	//virtual channels of each input port, as seen by adaptive routings.
	virtual_channels: 4,
```

A mesh. East/West links have weight 1 and North/South links have weight 2, so that tables route first along the rows.
```ignore
Mesh{
	rows: 4,
	columns: 4,
}
```

A ring. Router `i` goes East to `i+1` and West to `i-1`.
```ignore
Ring{
	routers: 8,
}
```

A dragonfly. By default it has `routers_per_group*global_channels_per_router+1` groups, with a global channel between each pair of groups. Local links have weight 1 and global links weight 2.
```ignore
Dragonfly{
	routers_per_group: 4,
	global_channels_per_router: 2,
	//number_of_groups: 9,//optional, at most the default.
}
```
*/
pub fn new_topology(arg:TopologyBuilderArgument) -> StaticTopology
{
	if let &ConfigurationValue::Object(ref cv_name, ref _cv_pairs)=arg.cv
	{
		if let Some(builder) = arg.plugs.topologies.get(cv_name)
		{
			return builder(arg);
		}
		match cv_name.as_ref()
		{
			"Mesh" => cartesian::new_mesh(arg),
			"Ring" => cartesian::new_ring(arg),
			"Dragonfly" => dragonfly::new_dragonfly(arg),
			_ => panic!("Unknown topology {}",cv_name),
		}
	}
	else
	{
		panic!("Trying to create a topology from a non-Object");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	fn link(direction:PortDirection, neighbour_router:usize, neighbour_direction:PortDirection, weight:usize) -> LinkDescription
	{
		LinkDescription{direction,neighbour_router,neighbour_direction,weight}
	}
	#[test]
	fn distances_follow_weights()
	{
		use crate::direction::PortDirection::*;
		// A path 0-1-2 with a heavy shortcut 0-2.
		let links = vec![
			vec![ link(East,1,West,1), link(North,2,South,5) ],
			vec![ link(West,0,East,1), link(East,2,West,1) ],
			vec![ link(West,1,East,1), link(South,0,North,5) ],
		];
		let distance = weighted_distances(&links);
		assert_eq!(*distance.get(0,2),2);
		assert_eq!(*distance.get(2,0),2);
		assert_eq!(*distance.get(1,1),0);
		let plugs = Plugs::default();
		let routing = ConfigurationValue::Object("Table".to_string(),vec![]);
		let topology = StaticTopology::build(Shape::Other,links,CommonParameters::default(),&routing,&plugs).expect("valid links");
		assert_eq!(topology.num_servers(),3);
		assert_eq!(topology.neighbour(0,1),Some(&Location::RouterPort{router_index:2,router_port:1}));
		assert_eq!(topology.neighbour(0,2),Some(&Location::ServerPort(0)));
		assert_eq!(topology.server_location(2),Some((2,2)));
		// The shortcut is not in any shortest path.
		let table = topology.unit(0).table();
		assert_eq!(table.num_links(),3);
		let mut rng = <StdRng as ::rand::SeedableRng>::seed_from_u64(0);
		assert_eq!(table.lookup(0,0,&NetDest::single(2),false,&mut rng).ok(),Some(0));
		assert_eq!(table.lookup(0,0,&NetDest::single(0),false,&mut rng).ok(),Some(2));
	}
	#[test]
	fn links_must_have_a_way_back()
	{
		use crate::direction::PortDirection::*;
		let links = vec![
			vec![ link(East,1,West,1) ],
			vec![ ],
		];
		let plugs = Plugs::default();
		let routing = ConfigurationValue::Object("Table".to_string(),vec![]);
		assert!(StaticTopology::build(Shape::Other,links,CommonParameters::default(),&routing,&plugs).is_err());
	}
}
