//! Element trees for the XML endpoint family.
//!
//! Requests are assembled as [`Element`] trees and serialized with a
//! literal declaration header; responses are read back into the same
//! shape and flattened into [`NormalizedNode`] mappings.

mod element;
mod normalize;
mod parse;

pub use element::Element;
pub use normalize::{NormalizedNode, Value, normalize};
pub use parse::parse;
