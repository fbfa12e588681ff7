/// Ports module defining interfaces for hexagonal architecture
///
/// This module contains both inbound ports (driving ports - query interfaces)
/// and outbound ports (driven ports - upstream clients and the persistent store).
pub mod inbound;
pub mod outbound;
