//! Domain types shared by the parser, the ports and the rules.

mod library;
mod machine;

pub use library::LibraryRecord;
pub use machine::Machine;
