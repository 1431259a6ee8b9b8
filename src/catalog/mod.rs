//! Static descriptions of everything a script can reach outside the
//! language itself: host types exposed through native snippets, and the
//! automation commands of the output script format.

pub mod commands;
pub mod host;

pub use commands::{ArgDescriptor, Command, CommandCatalog};
pub use host::{HostCatalog, HostType, Method, Property, TypeId};
