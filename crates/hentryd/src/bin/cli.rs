use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[arg(long, default_value = "localhost")]
    pub host: String,

    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
