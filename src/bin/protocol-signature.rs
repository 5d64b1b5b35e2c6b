//! Protocol signature tool.
//!
//! Computes the version-compatibility fingerprint a peer will check during
//! connection, and prints it in the forms useful for embedding: hex, base64,
//! and a byte-array source snippet.
//!
//! With no arguments the built-in Overte 2025.05 preset table is used. A
//! deployment integrating against a different peer supplies its own table via
//! `--config` (the `[signature]` section), resolving name-keyed overrides
//! against a packet-type list passed with `--packet-types`.

use std::path::PathBuf;

use clap::Parser;

use entity_protocol::config::Config;
use entity_protocol::protocol::overte;
use entity_protocol::utils::logging;
use entity_protocol::PacketTypeRegistry;

#[derive(Parser, Debug)]
#[command(
    name = "protocol-signature",
    about = "Compute the protocol-version compatibility fingerprint"
)]
struct Args {
    /// TOML configuration file with a [signature] table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference packet-type list (one name per line, in declaration order)
    #[arg(long)]
    packet_types: Option<PathBuf>,

    /// Also print the resolved per-index version table
    #[arg(long)]
    table: bool,
}

fn main() -> entity_protocol::Result<()> {
    let args = Args::parse();

    let registry = match &args.packet_types {
        Some(path) => Some(PacketTypeRegistry::from_file(path)?),
        None => None,
    };

    let (spec, logging_config) = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            config.validate_strict()?;
            (config.signature.to_spec(registry.as_ref())?, config.logging)
        }
        None => (overte::version_table_spec(), Default::default()),
    };

    logging::init(&logging_config)?;

    let signature = spec.compute()?;

    println!("Protocol signature over {} packet types:", spec.num_packet_types());
    println!("  Hex:    {}", signature.to_hex());
    println!("  Base64: {}", signature.to_base64());
    println!("  {}", signature.to_source_snippet());

    if args.table {
        println!();
        for (index, version) in spec.resolve()?.iter().enumerate() {
            let name = registry
                .as_ref()
                .and_then(|r| r.name_at(index))
                .unwrap_or("");
            println!("  [{index:3}] = {version:3}  {name}");
        }
    }

    Ok(())
}
