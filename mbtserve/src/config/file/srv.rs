use serde::{Deserialize, Serialize};

pub const KEEP_ALIVE_DEFAULT: u64 = 75;
pub const LISTEN_ADDRESSES_DEFAULT: &str = "127.0.0.1:8765";

#[serde_with::skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SrvConfig {
    /// Connection keep alive timeout in seconds.
    pub keep_alive: Option<u64>,
    /// The socket address to bind.
    pub listen_addresses: Option<String>,
    /// Number of web server workers, defaults to the number of CPUs.
    pub worker_processes: Option<usize>,
}
