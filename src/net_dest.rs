
use std::fmt::{Debug,Formatter};
use std::iter::FromIterator;

const WORD_BITS: usize = 64;

///A set of destination nodes (network interfaces), stored as a bitset.
///A packet carries one of these as the set of nodes it may be delivered to, and the routing table holds one per virtual network and output link.
#[derive(Clone,Default)]
pub struct NetDest
{
	words: Vec<u64>,
}

impl NetDest
{
	pub fn new() -> NetDest
	{
		NetDest{ words: vec![] }
	}
	///The set containing a single node.
	pub fn single(node:usize) -> NetDest
	{
		let mut set = NetDest::new();
		set.add(node);
		set
	}
	pub fn add(&mut self, node:usize)
	{
		let (word,bit) = (node/WORD_BITS, node%WORD_BITS);
		if word >= self.words.len()
		{
			self.words.resize(word+1,0);
		}
		self.words[word] |= 1u64 << bit;
	}
	pub fn remove(&mut self, node:usize)
	{
		let (word,bit) = (node/WORD_BITS, node%WORD_BITS);
		if let Some(w) = self.words.get_mut(word)
		{
			*w &= !(1u64 << bit);
		}
	}
	pub fn contains(&self, node:usize) -> bool
	{
		let (word,bit) = (node/WORD_BITS, node%WORD_BITS);
		self.words.get(word).map_or(false,|w| w & (1u64<<bit) != 0)
	}
	///Add every node of `other`.
	pub fn add_all(&mut self, other:&NetDest)
	{
		if other.words.len() > self.words.len()
		{
			self.words.resize(other.words.len(),0);
		}
		for (w,o) in self.words.iter_mut().zip(other.words.iter())
		{
			*w |= *o;
		}
	}
	pub fn intersection_is_not_empty(&self, other:&NetDest) -> bool
	{
		self.words.iter().zip(other.words.iter()).any(|(a,b)| a & b != 0)
	}
	pub fn is_empty(&self) -> bool
	{
		self.words.iter().all(|&w|w==0)
	}
	pub fn count(&self) -> usize
	{
		self.words.iter().map(|w|w.count_ones() as usize).sum()
	}
	///The nodes in increasing order.
	pub fn iter(&self) -> impl Iterator<Item=usize> + '_
	{
		self.words.iter().enumerate().flat_map(|(index,&word)|
			(0..WORD_BITS).filter(move |bit| word & (1u64<<bit) != 0).map(move |bit| index*WORD_BITS+bit)
		)
	}
}

impl FromIterator<usize> for NetDest
{
	fn from_iter<I:IntoIterator<Item=usize>>(iter:I) -> NetDest
	{
		let mut set = NetDest::new();
		for node in iter
		{
			set.add(node);
		}
		set
	}
}

impl PartialEq for NetDest
{
	fn eq(&self, other:&NetDest) -> bool
	{
		let length = self.words.len().max(other.words.len());
		(0..length).all(|index| self.words.get(index).copied().unwrap_or(0) == other.words.get(index).copied().unwrap_or(0))
	}
}

impl Eq for NetDest {}

impl Debug for NetDest
{
	fn fmt(&self, f:&mut Formatter<'_>) -> Result<(),std::fmt::Error>
	{
		f.debug_set().entries(self.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn membership_and_intersection()
	{
		let a:NetDest = [1,5,70].iter().copied().collect();
		let b:NetDest = [2,70].iter().copied().collect();
		let c = NetDest::single(3);
		assert!(a.contains(70) && !a.contains(2));
		assert!(a.intersection_is_not_empty(&b));
		assert!(!a.intersection_is_not_empty(&c));
		assert!(!a.intersection_is_not_empty(&NetDest::new()));
		assert_eq!(a.iter().collect::<Vec<_>>(),vec![1,5,70]);
		let mut d = a.clone();
		d.remove(70);
		assert!(!d.intersection_is_not_empty(&b));
		assert_eq!(d,[1,5].iter().copied().collect::<NetDest>());
		d.add_all(&c);
		assert_eq!(d.count(),3);
		assert!(NetDest::new().is_empty());
	}
}
