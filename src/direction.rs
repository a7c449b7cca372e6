/*!

Port directions.

Each port of a router is given a direction when the topology is built. Topology routings compute a direction and then translate it into the port index through the `PortDirections` of the router.

The textual labels are those of the topology scripts: `"Local"` is a port towards a network interface (a server), `"Local3"` is the fourth intra-group channel of a dragonfly router, `"Global1"` its second global channel, and `"North"`, `"South"`, `"East"`, `"West"` are the cardinal ports of meshes and rings.

*/

use std::collections::BTreeMap;
use std::fmt::{Display,Formatter};
use std::str::FromStr;

use crate::{error,source_location};
use crate::error::Error;

#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum PortDirection
{
	///A port to a server/network interface. Several ports of a router may have this direction.
	Server,
	North,
	South,
	East,
	West,
	///An intra-group channel of a dragonfly.
	Local(usize),
	///A channel between groups of a dragonfly.
	Global(usize),
}

impl PortDirection
{
	pub fn is_local(&self) -> bool
	{
		matches!(self,PortDirection::Local(_))
	}
	pub fn is_global(&self) -> bool
	{
		matches!(self,PortDirection::Global(_))
	}
}

impl Display for PortDirection
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		use PortDirection::*;
		match self
		{
			Server => write!(f,"Local"),
			North => write!(f,"North"),
			South => write!(f,"South"),
			East => write!(f,"East"),
			West => write!(f,"West"),
			Local(index) => write!(f,"Local{index}"),
			Global(index) => write!(f,"Global{index}"),
		}
	}
}

impl FromStr for PortDirection
{
	type Err = Error;
	fn from_str(label:&str) -> Result<PortDirection,Error>
	{
		let indexed = |prefix:&str, build:fn(usize)->PortDirection| -> Result<PortDirection,Error> {
			label[prefix.len()..].parse::<usize>().map(build).map_err(|_|error!(bad_argument).with_message(format!("bad direction label {label}")))
		};
		match label
		{
			"Local" => Ok(PortDirection::Server),
			"North" => Ok(PortDirection::North),
			"South" => Ok(PortDirection::South),
			"East" => Ok(PortDirection::East),
			"West" => Ok(PortDirection::West),
			_ if label.starts_with("Local") => indexed("Local",PortDirection::Local),
			_ if label.starts_with("Global") => indexed("Global",PortDirection::Global),
			_ => Err(error!(bad_argument).with_message(format!("unknown direction label {label}"))),
		}
	}
}

///The two-way maps between directions and port indices of a router, for its input ports and for its output ports.
///Filled when building the topology and only read afterwards.
#[derive(Debug,Clone,Default)]
pub struct PortDirections
{
	inports_direction_to_index: BTreeMap<PortDirection,usize>,
	inports_index_to_direction: BTreeMap<usize,PortDirection>,
	outports_direction_to_index: BTreeMap<PortDirection,usize>,
	outports_index_to_direction: BTreeMap<usize,PortDirection>,
}

impl PortDirections
{
	pub fn new() -> PortDirections
	{
		PortDirections::default()
	}
	///Register the direction of an input port. When several ports share a direction the last one is found by direction.
	pub fn add_in_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.inports_direction_to_index.insert(direction,index);
		self.inports_index_to_direction.insert(index,direction);
	}
	///Register the direction of an output port. When several ports share a direction the last one is found by direction.
	pub fn add_out_direction(&mut self, direction:PortDirection, index:usize)
	{
		self.outports_direction_to_index.insert(direction,index);
		self.outports_index_to_direction.insert(index,direction);
	}
	pub fn inport_index(&self, direction:PortDirection) -> Option<usize>
	{
		self.inports_direction_to_index.get(&direction).copied()
	}
	pub fn outport_index(&self, direction:PortDirection) -> Option<usize>
	{
		self.outports_direction_to_index.get(&direction).copied()
	}
	pub fn inport_direction(&self, index:usize) -> Option<PortDirection>
	{
		self.inports_index_to_direction.get(&index).copied()
	}
	pub fn outport_direction(&self, index:usize) -> Option<PortDirection>
	{
		self.outports_index_to_direction.get(&index).copied()
	}
	pub fn num_inports(&self) -> usize
	{
		self.inports_index_to_direction.len()
	}
	pub fn num_outports(&self) -> usize
	{
		self.outports_index_to_direction.len()
	}
}
