use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "lumen-probe")]
#[command(about = "Drives off-screen contexts on the software driver and prints read-back pixels", long_about = None)]
pub struct Cli {
    /// Drawing buffer width
    #[arg(long, default_value_t = 4)]
    pub width: u32,

    /// Drawing buffer height
    #[arg(long, default_value_t = 4)]
    pub height: u32,

    /// Number of contexts to create
    #[arg(long, default_value_t = 2)]
    pub contexts: usize,

    /// Flip uploaded rows vertically
    #[arg(long = "flip-y")]
    pub flip_y: bool,

    /// Premultiply uploaded color channels by alpha
    #[arg(long)]
    pub premultiply: bool,

    /// Unpack row alignment (1, 2, 4 or 8)
    #[arg(long, default_value_t = 4)]
    pub alignment: u32,

    /// Log filter, `env_logger` syntax
    #[arg(long)]
    pub log: Option<String>,
}
