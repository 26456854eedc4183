// catsu command-line tool -- drives a Yaesu FT-991A over CAT.
//
// Usage:
//   catsu-cli --port /dev/ttyUSB0 freq get A
//   catsu-cli --port /dev/ttyUSB0 freq set B 145.5M
//   catsu-cli --port /dev/ttyUSB0 memory read 17
//   catsu-cli --port /dev/ttyUSB0 mode DATA-USB
//   catsu-cli --port COM3 --baud 9600 query "MC;"
//   catsu-cli --port /dev/ttyUSB0 -v clock set

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catsu::{DisplayColour, Ft991a, Ft991aBuilder, MemoryChannelRecord, OperatingMode, Vfo};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// catsu -- control a Yaesu FT-991A from the command line.
#[derive(Parser)]
#[command(name = "catsu-cli", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    #[arg(long)]
    port: String,

    /// Baud rate; must match the radio's CAT RATE menu.
    #[arg(long, default_value_t = Ft991aBuilder::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Per-byte reply timeout in milliseconds.
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,

    /// Log protocol traffic (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a raw command without reading a reply (e.g. "FA014250000;").
    Raw { cmd: String },

    /// Send a raw command and print the reply (e.g. "MC;").
    Query { cmd: String },

    /// VFO frequency operations.
    Freq {
        #[command(subcommand)]
        action: FreqAction,
    },

    /// Selected memory channel.
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },

    /// Memory channel contents.
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Read the operating mode, or set it when a name is given.
    Mode {
        /// Mode name (e.g. USB, FM, CW-U, DATA-USB).
        name: Option<String>,
    },

    /// Set the display colour (BLUE, GRAY, GREEN, ORANGE, PURPLE, RED, "SKY BLUE").
    Colour { name: String },

    /// Radio clock.
    Clock {
        #[command(subcommand)]
        action: ClockAction,
    },
}

#[derive(Subcommand)]
enum FreqAction {
    /// Read a VFO frequency in Hz.
    Get { vfo: Vfo },
    /// Set a VFO frequency (e.g. 14313K, 145.5M, 7127000).
    Set { vfo: Vfo, value: String },
}

#[derive(Subcommand)]
enum ChannelAction {
    Get,
    /// Select memory channel 1-117.
    Set { channel: u16 },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Print the contents of memory channel 1-117.
    Read { channel: u16 },
    /// Store VFO-A in the selected memory channel.
    Store,
}

#[derive(Subcommand)]
enum ClockAction {
    Get,
    /// Set the radio clock to the current UTC time.
    Set,
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_freq(radio: &Ft991a, action: &FreqAction) -> Result<()> {
    match action {
        FreqAction::Get { vfo } => {
            let hz = radio.read_vfo_frequency(*vfo).await?;
            println!("VFO-{vfo}: {hz} Hz ({:.6} MHz)", hz as f64 / 1e6);
        }
        FreqAction::Set { vfo, value } => {
            radio
                .set_frequency_human_readable(*vfo, value)
                .await
                .with_context(|| format!("setting VFO-{vfo} to {value}"))?;
            println!("VFO-{vfo} set to {value}");
        }
    }
    Ok(())
}

fn print_memory(record: &MemoryChannelRecord) {
    let mode = record
        .operating_mode()
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| format!("unknown ({})", record.mode));
    println!("Memory channel {}", record.channel_number());
    println!("  Frequency:      {} Hz", record.frequency_hz());
    println!("  Mode:           {mode}");
    println!("  Clarifier:      {:+} Hz", record.clarifier_offset_hz());
    println!("  RX clarifier:   {}", on_off(record.rx_clarifier_on()));
    println!("  TX clarifier:   {}", on_off(record.tx_clarifier_on()));
    println!("  CTCSS mode:     {}", record.ctcss_mode);
    println!("  Shift:          {}", record.shift);
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

async fn cmd_memory(radio: &Ft991a, action: &MemoryAction) -> Result<()> {
    match action {
        MemoryAction::Read { channel } => match radio.read_memory_channel(*channel).await? {
            Some(record) => print_memory(&record),
            None => println!("Memory channel {channel} is empty"),
        },
        MemoryAction::Store => {
            radio.vfo_a_to_memory_channel().await?;
            println!("VFO-A stored");
        }
    }
    Ok(())
}

async fn cmd_mode(radio: &Ft991a, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            let mode: OperatingMode = name.parse()?;
            radio.set_operating_mode(mode).await?;
            println!("Mode set to {mode}");
        }
        None => println!("Mode: {}", radio.read_operating_mode().await?),
    }
    Ok(())
}

async fn cmd_clock(radio: &Ft991a, action: &ClockAction) -> Result<()> {
    match action {
        ClockAction::Get => {
            let clock = radio.read_date_and_time().await?;
            println!("Date:     {}", clock.date);
            println!("Time:     {}", clock.time);
            println!("Timezone: {}", clock.timezone);
        }
        ClockAction::Set => {
            radio.set_date_and_time().await?;
            println!("Clock set to UTC");
        }
    }
    Ok(())
}

async fn run(cli: &Cli, radio: &Ft991a) -> Result<()> {
    match &cli.command {
        Command::Raw { cmd } => {
            radio.send_command(cmd).await?;
            println!("Sent {cmd}");
        }
        Command::Query { cmd } => {
            let reply = radio.read_command(cmd).await?;
            println!("{}{}", reply.command, reply.parameter);
        }
        Command::Freq { action } => cmd_freq(radio, action).await?,
        Command::Channel { action } => match action {
            ChannelAction::Get => {
                println!("Memory channel {}", radio.get_current_memory_channel().await?)
            }
            ChannelAction::Set { channel } => {
                radio.set_current_memory_channel(*channel).await?;
                println!("Memory channel {channel} selected");
            }
        },
        Command::Memory { action } => cmd_memory(radio, action).await?,
        Command::Mode { name } => cmd_mode(radio, name.as_deref()).await?,
        Command::Colour { name } => {
            let colour: DisplayColour = name.parse()?;
            radio.set_display_colour(colour).await?;
            println!("Display colour set to {colour}");
        }
        Command::Clock { action } => cmd_clock(radio, action).await?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let radio = Ft991aBuilder::new()
        .serial_port(&cli.port)
        .baud_rate(cli.baud)
        .read_timeout(Duration::from_millis(cli.timeout_ms))
        .build()
        .context("invalid connection settings")?;

    run(&cli, &radio)
        .await
        .with_context(|| format!("on {} at {} baud", cli.port, cli.baud))
}
