/*!

Errors raised by the routing core.

All of them are configuration or topology defects detected while routing. None is transient: the simulator is expected to abort showing the error, since a misrouted flit would invalidate the deadlock-freedom assumptions of the experiment.

Errors are built with the `error!` macro, which records where in the source they were raised.
```ignore
return Err(error!(no_viable_route,router_index,virtual_network).with_message(format!("destination {destination}")));
```

*/

use std::fmt::{Display,Formatter};

use crate::config::ConfigurationValue;
use crate::direction::PortDirection;

///Position in the source code at which an error was created.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

impl Display for SourceLocation
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		write!(f,"{}:{}:{}",self.file,self.line,self.column)
	}
}

///Build the `SourceLocation` of the macro invocation.
#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{ file: file!(), line: line!(), column: column!() }
	}
}

///Build an `Error` of the given kind at the current source location.
///`error!(no_viable_route,router,vnet)` is `Error::no_viable_route(source_location!(),router,vnet)`.
#[macro_export]
macro_rules! error{
	($kind:ident) => {
		$crate::error::Error::$kind( $crate::source_location!() )
	};
	($kind:ident, $($args:expr),* ) => {
		$crate::error::Error::$kind( $crate::source_location!(), $($args),* )
	};
}

#[derive(Debug,Clone,PartialEq)]
pub enum ErrorKind
{
	///The destination set does not intersect any table entry of the virtual network.
	NoViableRoute{
		router_index: usize,
		virtual_network: usize,
	},
	///The packet arrived through a port that the channel discipline of the routing forbids for the computed exit.
	UnexpectedInboundDirection{
		router_index: usize,
		inport_direction: PortDirection,
		outport_direction: PortDirection,
	},
	///A topology routing was asked to route a packet already at its destination router.
	ZeroDistance{
		router_index: usize,
		destination_router: usize,
	},
	///A direction was required that has not been registered in the router.
	UnregisteredDirection{
		router_index: usize,
		direction: PortDirection,
	},
	///The network does not provide the parameters that a routing requires.
	MissingTopologyData{
		routing: &'static str,
	},
	IllFormedConfiguration(ConfigurationValue),
	BadArgument,
	Undetermined,
}

#[derive(Debug,Clone,PartialEq)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{
			source_location,
			kind,
			message: None,
		}
	}
	///Append some text to the error. Successive messages are kept in order.
	pub fn with_message(mut self, message:String) -> Error
	{
		self.message = Some(match self.message
		{
			None => message,
			Some(previous) => format!("{previous}\n{message}"),
		});
		self
	}
	pub fn no_viable_route(source_location:SourceLocation, router_index:usize, virtual_network:usize) -> Error
	{
		Error::new(source_location,ErrorKind::NoViableRoute{router_index,virtual_network})
	}
	pub fn unexpected_inbound_direction(source_location:SourceLocation, router_index:usize, inport_direction:PortDirection, outport_direction:PortDirection) -> Error
	{
		Error::new(source_location,ErrorKind::UnexpectedInboundDirection{router_index,inport_direction,outport_direction})
	}
	pub fn zero_distance(source_location:SourceLocation, router_index:usize, destination_router:usize) -> Error
	{
		Error::new(source_location,ErrorKind::ZeroDistance{router_index,destination_router})
	}
	pub fn unregistered_direction(source_location:SourceLocation, router_index:usize, direction:PortDirection) -> Error
	{
		Error::new(source_location,ErrorKind::UnregisteredDirection{router_index,direction})
	}
	pub fn missing_topology_data(source_location:SourceLocation, routing:&'static str) -> Error
	{
		Error::new(source_location,ErrorKind::MissingTopologyData{routing})
	}
	pub fn ill_formed_configuration(source_location:SourceLocation, value:ConfigurationValue) -> Error
	{
		Error::new(source_location,ErrorKind::IllFormedConfiguration(value))
	}
	pub fn bad_argument(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::BadArgument)
	}
	pub fn undetermined(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::Undetermined)
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		use ErrorKind::*;
		match self
		{
			NoViableRoute{router_index,virtual_network} => write!(f,"No route exists from router {router_index} for virtual network {virtual_network}."),
			UnexpectedInboundDirection{router_index,inport_direction,outport_direction} => write!(f,"Router {router_index} cannot route towards {outport_direction} a packet that arrived through {inport_direction}."),
			ZeroDistance{router_index,destination_router} => write!(f,"Router {router_index} was asked to route towards itself (destination router {destination_router})."),
			UnregisteredDirection{router_index,direction} => write!(f,"Router {router_index} has no port registered for direction {direction}."),
			MissingTopologyData{routing} => write!(f,"The network does not provide the data required by the {routing} routing."),
			IllFormedConfiguration(value) => write!(f,"Ill formed configuration: {value}"),
			BadArgument => write!(f,"Bad argument."),
			Undetermined => write!(f,"Undetermined error."),
		}
	}
}

impl Display for Error
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		write!(f,"{} (at {})",self.kind,self.source_location)?;
		if let Some(ref message) = self.message
		{
			write!(f,"\n{message}")?;
		}
		Ok(())
	}
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error;
	#[test]
	fn messages_accumulate()
	{
		let err = error!(no_viable_route,4,1).with_message("first".to_string()).with_message("second".to_string());
		assert_eq!(err.kind, ErrorKind::NoViableRoute{router_index:4,virtual_network:1});
		assert_eq!(err.message.as_deref(), Some("first\nsecond"));
		let text = format!("{err}");
		assert!(text.starts_with("No route exists from router 4 for virtual network 1."), "unexpected display {text}");
		assert!(text.contains("error.rs"));
	}
}
