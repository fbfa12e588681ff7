/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod console;
pub mod network;
pub mod object_store;
pub mod parsers;
pub mod persistence;
