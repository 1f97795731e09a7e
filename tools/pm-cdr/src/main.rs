// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use patient_monitoring::core::ser::{Cdr2Encode, Endianness};
use patient_monitoring::protocol::EncapsulationHeader;
use patient_monitoring::xtypes::{TypeDescriptor, TypeObject};
use patient_monitoring::{
    DataRepresentation, PatientMonitoring, PluginConfig, TopicType, TypePlugin,
};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pm-cdr")]
#[command(about = "Encode, decode and inspect PatientMonitoring CDR payloads")]
#[command(version)]
struct Cli {
    /// Plugin configuration (YAML); defaults plus PM_* variables otherwise
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a sample and print the payload as hex
    Encode {
        /// Value of patient_condition
        condition: String,

        #[arg(short, long, value_enum, default_value_t = Representation::Xcdr)]
        representation: Representation,

        /// Big-endian payload
        #[arg(long)]
        big_endian: bool,
    },

    /// Decode an encapsulated hex payload
    Decode {
        /// Hex bytes; whitespace is ignored
        hex: String,
    },

    /// Print the TypeObject, its identifier and a summary
    TypeObject {
        #[arg(long)]
        minimal: bool,
    },

    /// Print minimum and maximum serialized sizes
    Sizes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Representation {
    Xcdr,
    Xcdr2,
}

impl From<Representation> for DataRepresentation {
    fn from(r: Representation) -> Self {
        match r {
            Representation::Xcdr => DataRepresentation::Xcdr,
            Representation::Xcdr2 => DataRepresentation::Xcdr2,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Encode {
            condition,
            representation,
            big_endian,
        } => cmd_encode(config, &condition, representation.into(), big_endian),
        Commands::Decode { hex } => cmd_decode(config, &hex),
        Commands::TypeObject { minimal } => cmd_type_object(minimal),
        Commands::Sizes => cmd_sizes(config),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PluginConfig> {
    let config = match path {
        Some(path) => PluginConfig::from_yaml_file(path)?,
        None => PluginConfig::from_env()?,
    };
    log::debug!("[config] {:?}", config);
    Ok(config)
}

fn cmd_encode(
    config: PluginConfig,
    condition: &str,
    representation: DataRepresentation,
    big_endian: bool,
) -> anyhow::Result<()> {
    let config = PluginConfig {
        endianness: if big_endian {
            Endianness::Big
        } else {
            config.endianness
        },
        ..config
    };
    let plugin = TypePlugin::<PatientMonitoring>::with_config(Arc::new(config));
    let sample = PatientMonitoring::with_condition(condition);
    let len = plugin.serialize_to_cdr_buffer(None, &sample, representation)?;
    let mut buf = vec![0u8; len];
    plugin
        .serialize_to_cdr_buffer(Some(&mut buf), &sample, representation)
        .with_context(|| format!("Failed to encode {}", sample))?;
    println!("{}", to_hex(&buf));
    Ok(())
}

fn cmd_decode(config: PluginConfig, hex: &str) -> anyhow::Result<()> {
    let bytes = from_hex(hex)?;
    let header = EncapsulationHeader::parse(&bytes).context("Invalid encapsulation header")?;
    let plugin = TypePlugin::<PatientMonitoring>::with_config(Arc::new(config));
    let mut sample = plugin.create_data();
    plugin
        .deserialize_from_cdr_buffer(&mut sample, &bytes)
        .context("Failed to decode payload")?;
    println!("encapsulation: {}", header.id);
    println!("{}", sample);
    Ok(())
}

fn cmd_type_object(minimal: bool) -> anyhow::Result<()> {
    let mut object = TypeObject::Complete(PatientMonitoring::type_object());
    if minimal {
        object = object.to_minimal();
    }
    let bytes = object.to_cdr2_vec()?;
    println!("identifier: {:?}", object.type_identifier()?);
    println!("bytes ({}): {}", bytes.len(), to_hex(&bytes));
    println!("{}", TypeDescriptor::of::<PatientMonitoring>());
    Ok(())
}

fn cmd_sizes(config: PluginConfig) -> anyhow::Result<()> {
    let plugin = TypePlugin::<PatientMonitoring>::with_config(Arc::new(config));
    println!("{:<8} {:>8} {:>8} {:>8} {:>8}", "repr", "body min", "body max", "min", "max");
    for repr in [DataRepresentation::Xcdr, DataRepresentation::Xcdr2] {
        let id = plugin.encapsulation_for(repr)?;
        println!(
            "{:<8} {:>8} {:>8} {:>8} {:>8}",
            repr.to_string(),
            plugin.get_serialized_sample_min_size(false, id, 0),
            plugin.get_serialized_sample_max_size(false, id, 0),
            plugin.get_serialized_sample_min_size(true, id, 0),
            plugin.get_serialized_sample_max_size(true, id, 0),
        );
    }
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02x}", b);
    }
    out
}

fn from_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", digits.len());
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).context("non-ASCII input")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte '{}'", pair))
        })
        .collect()
}
