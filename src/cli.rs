use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stormcell", version, about)]
pub struct Args {
    /// Storm config file (JSON). Defaults are used if it doesn't exist.
    #[arg(short, long, default_value = "storm.json")]
    pub config: PathBuf,

    /// Window width
    #[arg(short = 'W', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Window height
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Resolution as WxH (e.g. 1920x1080), overrides --width/--height
    #[arg(short, long, value_parser = parse_resolution)]
    pub resolution: Option<(u32, u32)>,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    pub no_vsync: bool,

    /// Seed for all randomness; omit for a different storm every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Step the simulation by measured frame time instead of the configured timestep
    #[arg(long)]
    pub wall_clock: bool,

    /// Run this many ticks without a window, logging strikes, then exit
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u64>,

    /// MQTT broker to publish strike events to
    #[arg(long)]
    pub mqtt_host: Option<String>,

    #[arg(long)]
    pub mqtt_port: Option<u16>,

    #[arg(long)]
    pub mqtt_topic: Option<String>,

    /// Write the effective config to this path and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    pub fn window_size(&self) -> (u32, u32) {
        self.resolution.unwrap_or((self.width, self.height))
    }
}

fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("resolution must be non-zero".to_string());
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["stormcell"]).unwrap();
        assert_eq!(args.config, PathBuf::from("storm.json"));
        assert_eq!(args.window_size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(!args.no_vsync && !args.wall_clock);
        assert!(args.headless.is_none());
    }

    #[test]
    fn test_resolution_overrides_size() {
        let args =
            Args::try_parse_from(["stormcell", "-W", "100", "--resolution", "1920x1080"]).unwrap();
        assert_eq!(args.window_size(), (1920, 1080));
    }

    #[test]
    fn test_bad_resolution_rejected() {
        assert!(Args::try_parse_from(["stormcell", "-r", "1920"]).is_err());
        assert!(Args::try_parse_from(["stormcell", "-r", "0x10"]).is_err());
    }

    #[test]
    fn test_headless_and_seed() {
        let args =
            Args::try_parse_from(["stormcell", "--headless", "600", "--seed", "42"]).unwrap();
        assert_eq!(args.headless, Some(600));
        assert_eq!(args.seed, Some(42));
    }
}
