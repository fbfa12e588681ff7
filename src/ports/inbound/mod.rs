/// Inbound ports (Driving ports) - Query interfaces
///
/// These ports define the interfaces that external adapters (e.g., CLI)
/// use to read the readiness state derived from synced data.
pub mod readiness_query_port;

pub use readiness_query_port::{ReadinessQueryPort, ReleaseReadiness};
