/*!

The routing table of a router and the routing that just consults it.

The table is populated during topology creation. For each virtual network there is an entry per output link with the set of destination nodes that may be reached through that link, and each link has a weight. Routes are biased through the weights, which is how the topology author avoids deadlock.

*/

use std::cell::RefCell;

use ::rand::{rngs::StdRng,Rng};

use crate::match_object_panic;
use crate::config::ConfigurationValue;
use crate::net_dest::NetDest;
use crate::routing::prelude::*;
use crate::{error,source_location};

#[derive(Debug,Clone,Default)]
pub struct RoutingTable
{
	///`entries[vnet][link]` is the set of nodes reachable through `link` for packets in `vnet`.
	entries: Vec<Vec<NetDest>>,
	///`weights[link]` is the weight of the output link `link`.
	weights: Vec<usize>,
}

impl RoutingTable
{
	pub fn new() -> RoutingTable
	{
		RoutingTable::default()
	}
	///Append the entries of a new output link, one per virtual network.
	pub fn add_route(&mut self, entry:Vec<NetDest>)
	{
		if entry.len() > self.entries.len()
		{
			self.entries.resize(entry.len(),vec![]);
		}
		for (virtual_network,net_dest) in entry.into_iter().enumerate()
		{
			self.entries[virtual_network].push(net_dest);
		}
	}
	///Append the weight of a new output link.
	pub fn add_weight(&mut self, weight:usize)
	{
		self.weights.push(weight);
	}
	pub fn num_links(&self) -> usize
	{
		self.weights.len()
	}
	pub fn num_virtual_networks(&self) -> usize
	{
		self.entries.len()
	}
	///The nodes reachable through `link` in `virtual_network`.
	pub fn entry(&self, virtual_network:usize, link:usize) -> Option<&NetDest>
	{
		self.entries.get(virtual_network).and_then(|links|links.get(link))
	}
	pub fn weight(&self, link:usize) -> Option<usize>
	{
		self.weights.get(link).copied()
	}
	///Check that every virtual network has an entry per weighted link.
	pub fn check(&self) -> Result<(),Error>
	{
		for (virtual_network,links) in self.entries.iter().enumerate()
		{
			if links.len() != self.weights.len()
			{
				return Err(error!(bad_argument).with_message(format!("virtual network {} has {} table entries but there are {} link weights",virtual_network,links.len(),self.weights.len())));
			}
		}
		Ok(())
	}
	///Whether a link restricted to the virtual networks in `supported` may carry `virtual_network`. An empty list supports all.
	pub fn supports_virtual_network(virtual_network:usize, supported:&[usize]) -> bool
	{
		supported.is_empty() || supported.contains(&virtual_network)
	}
	/**
	Find the output link for a packet of `virtual_network` going to any node in `net_dest`.

	Among the links whose entry intersects `net_dest` only those of minimum weight are considered. For an ordered virtual network the first of them is taken, so that all packets follow the same route. Otherwise one is chosen at random. To have a strict order between links they should be given different weights.
	**/
	pub fn lookup(&self, router_index:usize, virtual_network:usize, net_dest:&NetDest, ordered:bool, rng:&mut StdRng) -> Result<usize,Error>
	{
		let links = match self.entries.get(virtual_network)
		{
			Some(links) => links,
			None => return Err(error!(bad_argument).with_message(format!("virtual network {} is not in the routing table, which has {}",virtual_network,self.entries.len()))),
		};
		let mut min_weight = usize::MAX;
		let mut candidates = Vec::new();
		for (link,entry) in links.iter().enumerate()
		{
			if !net_dest.intersection_is_not_empty(entry)
			{
				continue;
			}
			let weight = match self.weights.get(link)
			{
				Some(&weight) => weight,
				None => return Err(error!(bad_argument).with_message(format!("link {link} has no weight"))),
			};
			if weight < min_weight
			{
				min_weight = weight;
				candidates.clear();
			}
			if weight == min_weight
			{
				candidates.push(link);
			}
		}
		if candidates.is_empty()
		{
			return Err(error!(no_viable_route,router_index,virtual_network));
		}
		let r = if ordered { 0 } else { rng.gen_range(0..candidates.len()) };
		Ok(candidates[r])
	}
}

///Route every packet through the routing table.
#[derive(Debug)]
pub struct TableRouting
{
}

impl Routing for TableRouting
{
	fn next(&self, route:&RefCell<RouteInfo>, router:&RouterContext, _inport:usize, _inport_direction:PortDirection, rng:&mut StdRng) -> Result<usize,Error>
	{
		let route = route.borrow();
		router.lookup_table(route.virtual_network,&route.net_dest,rng)
	}
}

impl TableRouting
{
	pub fn new(arg: RoutingBuilderArgument) -> TableRouting
	{
		match_object_panic!(arg.cv,"Table",_value);
		TableRouting{
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use crate::error::ErrorKind;
	fn sample_table() -> RoutingTable
	{
		// Two virtual networks, four links.
		let mut table = RoutingTable::new();
		let rows:[[&[usize];2];4] = [
			[&[0], &[0]],
			[&[1,2,3], &[1,2,3]],
			[&[2,3], &[2,3]],
			[&[3], &[]],
		];
		for row in rows.iter()
		{
			table.add_route(row.iter().map(|nodes|nodes.iter().copied().collect()).collect());
		}
		for weight in [1,2,1,1]
		{
			table.add_weight(weight);
		}
		table
	}
	#[test]
	fn minimum_weight_among_intersecting()
	{
		let table = sample_table();
		table.check().expect("consistent table");
		let mut rng = StdRng::seed_from_u64(0);
		assert_eq!(table.lookup(5,0,&NetDest::single(1),true,&mut rng).ok(),Some(1));
		assert_eq!(table.lookup(5,0,&NetDest::single(2),true,&mut rng).ok(),Some(2));
		// links 2 and 3 tie at weight 1 for node 3.
		assert_eq!(table.lookup(5,0,&NetDest::single(3),true,&mut rng).ok(),Some(2));
		assert_eq!(table.lookup(5,1,&NetDest::single(3),true,&mut rng).ok(),Some(2));
		for _ in 0..100
		{
			let link = table.lookup(5,0,&NetDest::single(3),false,&mut rng).expect("there is a route");
			assert!(link==2 || link==3);
		}
	}
	#[test]
	fn no_route()
	{
		let table = sample_table();
		let mut rng = StdRng::seed_from_u64(0);
		let err = table.lookup(5,1,&NetDest::single(7),true,&mut rng).expect_err("node 7 is unreachable");
		assert_eq!(err.kind,ErrorKind::NoViableRoute{router_index:5,virtual_network:1});
		assert!(table.lookup(5,2,&NetDest::single(0),true,&mut rng).is_err());
	}
	#[test]
	fn inconsistent_weights()
	{
		let mut table = sample_table();
		table.add_weight(4);
		assert!(table.check().is_err());
	}
	#[test]
	fn supported_virtual_networks()
	{
		assert!(RoutingTable::supports_virtual_network(3,&[]));
		assert!(RoutingTable::supports_virtual_network(3,&[1,3]));
		assert!(!RoutingTable::supports_virtual_network(2,&[1,3]));
	}
}
