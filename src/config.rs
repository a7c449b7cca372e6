/*!

Configuration values used to build routings and topologies.

A configuration is a tree of `ConfigurationValue`, written as
```ignore
Dragonfly{
	routers_per_group: 4,
	global_channels_per_router: 2,
	servers_per_router: 2,
	ordered_virtual_networks: [true,false,false],
	virtual_channels: 4,
}
```
Here they are built programmatically; reading them from files is left to the simulator embedding this crate.

*/

use std::fmt::{Display,Formatter};

use crate::{error,source_location};
use crate::error::Error;

#[derive(Debug,Clone,PartialEq)]
pub enum ConfigurationValue
{
	Literal(String),
	Number(f64),
	Object(String,Vec<(String,ConfigurationValue)>),
	Array(Vec<ConfigurationValue>),
	True,
	False,
}

impl From<bool> for ConfigurationValue
{
	fn from(value:bool) -> ConfigurationValue
	{
		if value { ConfigurationValue::True } else { ConfigurationValue::False }
	}
}

impl From<usize> for ConfigurationValue
{
	fn from(value:usize) -> ConfigurationValue
	{
		ConfigurationValue::Number(value as f64)
	}
}

/// match arms against the keys of an object, panicking on unknown fields.
/// first argument, `$cv:expr`, is the ConfigurationValue expected to be the object
/// second argument, `$name:literal`, is the name the Object should have, or `$names:expr` an array of accepted names.
/// third argument, `$valueid:ident`, is the variable name capturing the value in the object's elements
///    and can be used in the arms
/// the remaining arguments are the arms of the match.
#[macro_export]
macro_rules! match_object_panic{
	($cv:expr, $name:literal, $valueid:ident ) => {{
		match_object_panic!($cv,[$name],$valueid,)
	}};
	($cv:expr, $name:literal, $valueid:ident, $($arm:tt)* ) => {{
		match_object_panic!($cv,[$name],$valueid,$($arm)*)
	}};
	($cv:expr, $names:expr, $valueid:ident, $($arm:tt)* ) => {{
		if let &ConfigurationValue::Object(ref cv_name, ref cv_pairs) = $cv
		{
			if !$names.iter().any(|&x|x==cv_name)
			{
				if $names.len()==1 {
					panic!("A {} must be created from a `{}` object not `{}`",$names[0],$names[0],cv_name);
				} else {
					panic!("Trying to create either of `{:?}` object from `{}`",$names,cv_name);
				}
			}
			for &(ref name,ref $valueid) in cv_pairs
			{
				match AsRef::<str>::as_ref(&name)
				{
					$( $arm )*
					"legend_name" => (),
					_ => panic!("Nothing to do with field {} in {}",name,$names[0]),
				}
			}
		}
		else
		{
			panic!("Trying to create a {} from a non-Object",$names[0]);
		}
	}};
}

impl ConfigurationValue
{
	pub fn as_bool(&self) -> Result<bool,Error>
	{
		match self
		{
			&ConfigurationValue::True => Ok(true),
			&ConfigurationValue::False => Ok(false),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_str(&self) -> Result<&str,Error>
	{
		match self
		{
			&ConfigurationValue::Literal(ref s) => Ok(s),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_f64(&self) -> Result<f64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_usize(&self) -> Result<usize,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) =>{
				if x < 0.0
				{
					return Err(error!(ill_formed_configuration, self.clone()).with_message(format!("{x} is negative")));
				}
				let res =  x as usize;
				// Casting from a float to an integer will round the float towards zero
				let y = res as f64;
				let tolerance = 1e-5;
				if x-y > tolerance || x-y < -tolerance {
					Err(error!(ill_formed_configuration, self.clone()))
				} else {
					Ok( res )
				}
			},
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_array(&self) -> Result<&Vec<ConfigurationValue>,Error>
	{
		match self
		{
			&ConfigurationValue::Array(ref x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	///The name of an `Object`.
	pub fn object_name(&self) -> Option<&str>
	{
		match self
		{
			&ConfigurationValue::Object(ref name,_) => Some(name),
			_ => None,
		}
	}
	///Get the value of the given field of an `Object`.
	pub fn get(&self, field:&str) -> Option<&ConfigurationValue>
	{
		match self
		{
			&ConfigurationValue::Object(_,ref pairs) => pairs.iter().find(|(key,_)|key==field).map(|(_,value)|value),
			_ => None,
		}
	}
}

impl Display for ConfigurationValue
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		use ConfigurationValue::*;
		match self
		{
			Literal(s) => write!(f,"\"{s}\""),
			Number(x) => write!(f,"{x}"),
			True => write!(f,"true"),
			False => write!(f,"false"),
			Object(name,pairs) =>
			{
				write!(f,"{name}")?;
				if pairs.is_empty()
				{
					return Ok(());
				}
				write!(f,"{{")?;
				for (index,(key,value)) in pairs.iter().enumerate()
				{
					if index>0 { write!(f,", ")?; }
					write!(f,"{key}: {value}")?;
				}
				write!(f,"}}")
			},
			Array(list) =>
			{
				write!(f,"[")?;
				for (index,value) in list.iter().enumerate()
				{
					if index>0 { write!(f,", ")?; }
					write!(f,"{value}")?;
				}
				write!(f,"]")
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::match_object_panic;
	use crate::error::ErrorKind;
	fn build(cv:&ConfigurationValue) -> (Option<usize>,bool)
	{
		let mut size=None;
		let mut flag=false;
		match_object_panic!(cv,"Thing",value,
			"size" => size=Some(value.as_usize().expect("bad value for size")),
			"flag" => flag=value.as_bool().expect("bad value for flag"),
		);
		(size,flag)
	}
	#[test]
	fn objects_and_accessors()
	{
		let cv = ConfigurationValue::Object("Thing".to_string(),vec![
			("size".to_string(),ConfigurationValue::Number(3.0)),
			("flag".to_string(),ConfigurationValue::True),
			("legend_name".to_string(),ConfigurationValue::Literal("a thing".to_string())),
		]);
		assert_eq!(build(&cv),(Some(3),true));
		assert_eq!(format!("{cv}"),"Thing{size: 3, flag: true, legend_name: \"a thing\"}");
		assert_eq!(cv.get("size"),Some(&ConfigurationValue::Number(3.0)));
		assert_eq!(cv.object_name(),Some("Thing"));
		assert!(matches!(ConfigurationValue::Number(2.5).as_usize().map_err(|e|e.kind),Err(ErrorKind::IllFormedConfiguration(_))));
		assert!(ConfigurationValue::Number(-1.0).as_usize().is_err());
	}
	#[test]
	#[should_panic(expected = "Nothing to do with field colour in Thing")]
	fn unknown_fields_are_rejected()
	{
		let bad = ConfigurationValue::Object("Thing".to_string(),vec![("colour".to_string(),ConfigurationValue::True)]);
		build(&bad);
	}
}
