//! Synthetic topology generation.
//!
//! A run turns a CIDR block and per-category device counts into one network
//! element, a set of addressed endpoints, and optionally two example connections.
//! Addresses come from an [`AddressPool`], so no two endpoints ever share one.

mod interface;
mod order;
mod pool;

pub use interface::{generate_mac, make_interface, DEFAULT_INTERFACE_LABEL};
pub use order::sort_by_address;
pub use pool::AddressPool;

use chrono::{Local, NaiveDateTime, Timelike};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::*;

/// Number of example connections synthesized on request
pub const EXAMPLE_CONNECTION_COUNT: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("invalid CIDR block '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("address pool exhausted: {requested} addresses requested, {available} available")]
    PoolExhausted { requested: usize, available: usize },

    #[error("network name '{name}' is reserved: {reason}")]
    ReservedNetworkName { name: String, reason: String },
}

/// How a category draws its addresses from the pool
#[derive(Debug, Clone, Copy)]
enum Draw {
    Head,
    Tail,
    Random,
}

/// How a category picks the OS of each endpoint
#[derive(Debug, Clone, Copy)]
enum OsPolicy {
    Fixed(OsType),
    Uniform(&'static [OsType]),
    /// `alternate` with the given percentage, `primary` otherwise
    Weighted { primary: OsType, alternate: OsType, alternate_pct: u32 },
}

impl OsPolicy {
    fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> OsType {
        match self {
            OsPolicy::Fixed(os) => os,
            OsPolicy::Uniform(choices) => choices.choose(rng).copied().unwrap_or(OsType::Unknown),
            OsPolicy::Weighted { primary, alternate, alternate_pct } => {
                if rng.gen_range(0..100) < alternate_pct {
                    alternate
                } else {
                    primary
                }
            }
        }
    }
}

/// One device category of the generation table
struct Category {
    name: &'static str,
    endpoint_type: EndpointType,
    draw: Draw,
    os: OsPolicy,
    count: fn(&DeviceCounts) -> usize,
}

/// Categories in allocation order. Head/tail categories come first so routers and
/// firewalls land at the bottom of the block and switches at the top.
const CATEGORIES: &[Category] = &[
    Category {
        name: "routers",
        endpoint_type: EndpointType::Router,
        draw: Draw::Head,
        os: OsPolicy::Fixed(OsType::Linux),
        count: |c| c.routers,
    },
    Category {
        name: "switches",
        endpoint_type: EndpointType::Switch,
        draw: Draw::Tail,
        os: OsPolicy::Uniform(&[OsType::Linux, OsType::Unknown]),
        count: |c| c.switches,
    },
    Category {
        name: "firewalls",
        endpoint_type: EndpointType::Firewall,
        draw: Draw::Head,
        os: OsPolicy::Uniform(&[OsType::Linux, OsType::Unknown]),
        count: |c| c.firewalls,
    },
    Category {
        name: "waps",
        endpoint_type: EndpointType::Wap,
        draw: Draw::Head,
        os: OsPolicy::Uniform(&[OsType::Linux, OsType::Android, OsType::Unknown]),
        count: |c| c.waps,
    },
    Category {
        name: "workstations_linux",
        endpoint_type: EndpointType::Workstation,
        draw: Draw::Random,
        os: OsPolicy::Weighted { primary: OsType::Linux, alternate: OsType::Macosx, alternate_pct: 25 },
        count: |c| c.workstations_linux,
    },
    Category {
        name: "workstations_windows",
        endpoint_type: EndpointType::Workstation,
        draw: Draw::Random,
        os: OsPolicy::Fixed(OsType::Windows),
        count: |c| c.workstations_windows,
    },
    Category {
        name: "servers_linux",
        endpoint_type: EndpointType::Server,
        draw: Draw::Random,
        os: OsPolicy::Fixed(OsType::Linux),
        count: |c| c.servers_linux,
    },
    Category {
        name: "servers_windows",
        endpoint_type: EndpointType::Server,
        draw: Draw::Random,
        os: OsPolicy::Fixed(OsType::Windows),
        count: |c| c.servers_windows,
    },
    Category {
        name: "ics",
        endpoint_type: EndpointType::IcsDevice,
        draw: Draw::Random,
        os: OsPolicy::Uniform(&[OsType::Unknown, OsType::Linux]),
        count: |c| c.ics,
    },
    Category {
        name: "iot",
        endpoint_type: EndpointType::IotDevice,
        draw: Draw::Random,
        os: OsPolicy::Uniform(&[OsType::Unknown, OsType::Linux, OsType::Android]),
        count: |c| c.iot,
    },
    // There is no phone endpoint type; phones are modelled as workstations
    Category {
        name: "phones",
        endpoint_type: EndpointType::Workstation,
        draw: Draw::Random,
        os: OsPolicy::Uniform(&[OsType::Android, OsType::Ios]),
        count: |c| c.phones,
    },
];

/// Generate a topology stamped with the current local time (whole seconds)
pub fn generate<R: Rng + ?Sized>(
    config: &TopologyConfig,
    rng: &mut R,
) -> Result<Vec<Element>, TopologyError> {
    let now = Local::now().naive_local();
    let now = now.with_nanosecond(0).unwrap_or(now);
    generate_at(config, now, rng)
}

/// Generate a topology with an explicit timestamp.
///
/// Output order: the network, then endpoints ascending by numeric address, then
/// any example connections. Errors leave nothing behind; no partial topology is returned.
pub fn generate_at<R: Rng + ?Sized>(
    config: &TopologyConfig,
    timestamp: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<Element>, TopologyError> {
    let mut pool = AddressPool::new(&config.cidr_block)?;
    check_network_name(config, &pool)?;

    let requested = config.counts.total();
    if requested > pool.remaining() {
        return Err(TopologyError::PoolExhausted {
            requested,
            available: pool.remaining(),
        });
    }

    let network = Element {
        id: config.network_name.clone(),
        label: config.network_name.clone(),
        timestamp,
        color: element_color::NETWORK.to_string(),
        data: String::new(),
        kind: ElementKind::Network {
            cidr_block: config.cidr_block.clone(),
        },
    };

    let mut endpoints = Vec::with_capacity(requested);
    for category in CATEGORIES {
        let count = (category.count)(&config.counts);
        for _ in 0..count {
            let ip = match category.draw {
                Draw::Head => pool.take_from_head()?,
                Draw::Tail => pool.take_from_tail()?,
                Draw::Random => pool.take_random(rng)?,
            };
            let os_type = category.os.pick(rng);
            let interface = make_interface(&ip, &ip, rng);
            endpoints.push(Element {
                id: ip.clone(),
                label: ip,
                timestamp,
                color: element_color::ENDPOINT.to_string(),
                data: String::new(),
                kind: ElementKind::Endpoint {
                    endpoint_type: category.endpoint_type,
                    os_type,
                    network: network.id.clone(),
                    interfaces: vec![interface],
                },
            });
        }
        if count > 0 {
            tracing::debug!("Allocated {} {} from {}", count, category.name, config.cidr_block);
        }
    }

    sort_by_address(&mut endpoints);

    let connections = if config.example_connections {
        example_connections(&endpoints, timestamp, rng)
    } else {
        Vec::new()
    };

    tracing::info!(
        "Generated network '{}' ({}) with {} endpoints and {} connections",
        network.id,
        config.cidr_block,
        endpoints.len(),
        connections.len()
    );

    let mut elements = Vec::with_capacity(1 + endpoints.len() + connections.len());
    elements.push(network);
    elements.extend(endpoints);
    elements.extend(connections);
    Ok(elements)
}

/// The network id must not collide with an endpoint or connection id of the same run
fn check_network_name(config: &TopologyConfig, pool: &AddressPool) -> Result<(), TopologyError> {
    let name = &config.network_name;
    let reason = if pool.contains(name) {
        Some(format!("it is an address inside {}", config.cidr_block))
    } else if config.example_connections
        && (0..EXAMPLE_CONNECTION_COUNT).any(|i| *name == connection_id(i))
    {
        Some("it is an example connection id".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(TopologyError::ReservedNetworkName {
            name: name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

fn connection_id(i: usize) -> String {
    format!("connection{}", i)
}

/// Wire randomly chosen endpoint pairs together; endpoints may connect to themselves.
/// Fewer than two endpoints yields no connections.
fn example_connections<R: Rng + ?Sized>(
    endpoints: &[Element],
    timestamp: NaiveDateTime,
    rng: &mut R,
) -> Vec<Element> {
    if endpoints.len() < 2 {
        return Vec::new();
    }

    let line_types = [LineType::Solid, LineType::Dashed];
    let mut connections = Vec::with_capacity(EXAMPLE_CONNECTION_COUNT);
    for i in 0..EXAMPLE_CONNECTION_COUNT {
        let (Some(from), Some(to)) = (endpoints.choose(rng), endpoints.choose(rng)) else {
            break;
        };
        let (Some(from_iface), Some(to_iface)) = (from.interfaces().first(), to.interfaces().first())
        else {
            continue;
        };
        connections.push(Element {
            id: connection_id(i),
            label: format!("ExConn{}", i),
            timestamp,
            color: element_color::CONNECTION.to_string(),
            data: String::new(),
            kind: ElementKind::Connection {
                interface_from: from_iface.interface_id.clone(),
                interface_to: to_iface.interface_id.clone(),
                line_type: line_types[i % line_types.len()],
            },
        });
    }
    connections
}
