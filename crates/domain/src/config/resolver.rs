use serde::{Deserialize, Serialize};

/// Resolution mode and upstream settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Walk delegations from the root (true) or forward to `nameservers` (false)
    #[serde(default = "default_true")]
    pub iterative: bool,

    /// Stub-mode upstreams as IP literals ("192.0.2.53" or "192.0.2.53:5353").
    /// When empty, `resolv_conf` is read instead.
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// resolv.conf-style file consulted for stub upstreams
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    /// Root hints file, one `name ipv4 [ipv6]` line per root server.
    /// Required in iterative mode.
    #[serde(default = "default_root_hints")]
    pub root_hints: String,

    /// Per-exchange timeout in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// Upper bound on work-loop iterations for a single lookup
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Port used when contacting nameservers learned during iteration
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            iterative: true,
            nameservers: vec![],
            resolv_conf: default_resolv_conf(),
            root_hints: default_root_hints(),
            query_timeout_ms: default_query_timeout(),
            max_steps: default_max_steps(),
            port: default_port(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_root_hints() -> String {
    "named.root".to_string()
}

fn default_query_timeout() -> u64 {
    5000
}

fn default_max_steps() -> usize {
    64
}

fn default_port() -> u16 {
    53
}
