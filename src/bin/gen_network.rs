use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use topology_registry::client::RegistryClient;
use topology_registry::models::{DeviceCounts, TopologyConfig};
use topology_registry::topology;

/// Generate a synthetic network and its endpoints as a JSON element array
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network name
    #[arg(short, long)]
    network: String,

    /// CIDR block, e.g. 192.168.0.0/24
    #[arg(short, long)]
    cidr_block: String,

    /// Number of routers
    #[arg(long, default_value_t = 0)]
    routers: usize,

    /// Number of switches
    #[arg(long, default_value_t = 0)]
    switches: usize,

    /// Number of firewalls
    #[arg(long, default_value_t = 0)]
    firewalls: usize,

    /// Number of wireless access points
    #[arg(long, default_value_t = 0)]
    waps: usize,

    /// Number of Linux workstations
    #[arg(long, default_value_t = 0)]
    wslinux: usize,

    /// Number of Windows workstations
    #[arg(long, default_value_t = 0)]
    wswin: usize,

    /// Number of Linux servers
    #[arg(long, default_value_t = 0)]
    svrlinux: usize,

    /// Number of Windows servers
    #[arg(long, default_value_t = 0)]
    svrwin: usize,

    /// Number of ICS devices
    #[arg(long, default_value_t = 0)]
    ics: usize,

    /// Number of IoT devices
    #[arg(long, default_value_t = 0)]
    iot: usize,

    /// Number of phones
    #[arg(long, default_value_t = 0)]
    phones: usize,

    /// Create two example connections
    #[arg(long)]
    example_connections: bool,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Bulk-upload the result to a registry at this base URL
    #[arg(long)]
    upload: Option<String>,
}

impl Args {
    fn topology_config(&self) -> TopologyConfig {
        TopologyConfig {
            network_name: self.network.clone(),
            cidr_block: self.cidr_block.clone(),
            counts: DeviceCounts {
                routers: self.routers,
                switches: self.switches,
                firewalls: self.firewalls,
                waps: self.waps,
                workstations_linux: self.wslinux,
                workstations_windows: self.wswin,
                servers_linux: self.svrlinux,
                servers_windows: self.svrwin,
                ics: self.ics,
                iot: self.iot,
                phones: self.phones,
            },
            example_connections: self.example_connections,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "topology_registry=info,gen_network=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let elements = topology::generate(&args.topology_config(), &mut rng)
        .context("topology generation failed")?;

    println!("{}", serde_json::to_string_pretty(&elements)?);

    if let Some(url) = &args.upload {
        let client = RegistryClient::new(url)?;
        match client.upload_elements(&elements).await? {
            Some(paths) => {
                tracing::info!("Uploaded {} elements to {}", paths.len(), url);
                for (id, path) in &paths {
                    tracing::debug!("{} -> {}", id, path);
                }
            }
            None => anyhow::bail!("registry at {} processed no elements", url),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_args_map_to_config() {
        let args = Args::parse_from([
            "gen-network",
            "-n",
            "corp",
            "-c",
            "10.0.0.0/24",
            "--routers",
            "2",
            "--wslinux",
            "5",
            "--phones",
            "3",
            "--example-connections",
        ]);
        let cfg = args.topology_config();
        assert_eq!(cfg.network_name, "corp");
        assert_eq!(cfg.counts.routers, 2);
        assert_eq!(cfg.counts.workstations_linux, 5);
        assert_eq!(cfg.counts.phones, 3);
        assert_eq!(cfg.counts.total(), 10);
        assert!(cfg.example_connections);
        assert!(args.upload.is_none());
    }
}
