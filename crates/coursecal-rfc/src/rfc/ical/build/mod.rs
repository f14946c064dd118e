//! RFC 5545 text output: escaping, 75-octet folding and serialization in a
//! fixed property order.

mod escape;
mod fold;
mod serializer;

pub use escape::{escape_param_value, escape_text};
pub use fold::fold_line;
pub use serializer::{serialize, serialize_component, serialize_property};
