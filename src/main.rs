use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use glam::DVec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use heliostat::{
    ephemeris_for, get_solar_position, solar_position, solve, sun_ray, track_day, AnglePair,
    ConfigError, DayTrack, HeliostatConfig, Location, Strategy,
};

#[derive(Parser)]
#[command(name = "heliostat")]
#[command(about = "Solar position and heliostat mirror orientation")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "heliostat.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sun position at a UTC instant, or the above-horizon path for a UTC day
    Sun {
        /// UTC date, YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        /// UTC time, HH:MM:SS; omit for the whole day
        #[arg(short, long)]
        time: Option<NaiveTime>,

        /// Latitude in degrees (overrides the config)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in degrees (overrides the config)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Altitude in metres (overrides the config)
        #[arg(long, allow_hyphen_values = true)]
        alt: Option<f64>,
    },

    /// Mirror orientation for one sun position and target direction
    Solve {
        /// Sun azimuth, degrees clockwise from north
        #[arg(long, allow_hyphen_values = true)]
        sun_azimuth: f64,

        /// Sun elevation, degrees above the horizon
        #[arg(long, allow_hyphen_values = true)]
        sun_elevation: f64,

        /// Direction from the mirror to the target
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        target: Vec<f64>,

        /// Solver strategy (overrides the config)
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Mirror angles for every above-horizon sample of a UTC day
    Track {
        /// UTC date, YYYY-MM-DD
        #[arg(short, long)]
        date: NaiveDate,

        /// Print the full track as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    ClosedForm,
    Iterative,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ClosedForm => Strategy::ClosedForm,
            StrategyArg::Iterative => Strategy::Iterative,
        }
    }
}

fn load_config(path: &Path) -> Result<HeliostatConfig, ConfigError> {
    if path.exists() {
        HeliostatConfig::from_file(path)
    } else {
        Ok(HeliostatConfig::default())
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn utc_midnight(date: NaiveDate) -> Result<DateTime<Utc>, String> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid date {}", date))
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(Path::new(&cli.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.log_level);
    info!(config = %cli.config, "configuration loaded");

    let result = match cli.command {
        Commands::Sun {
            date,
            time,
            lat,
            lon,
            alt,
        } => {
            let base = config.location();
            let location = Location {
                latitude: lat.unwrap_or(base.latitude),
                longitude: lon.unwrap_or(base.longitude),
                altitude_m: alt.unwrap_or(base.altitude_m),
            };
            run_sun(&config, date, time, &location)
        }
        Commands::Solve {
            sun_azimuth,
            sun_elevation,
            target,
            strategy,
        } => {
            let strategy = strategy.map(Strategy::from).unwrap_or(config.tracking.strategy);
            run_solve(&config, AnglePair::new(sun_azimuth, sun_elevation), &target, strategy)
        }
        Commands::Track { date, json } => run_track(&config, date, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_sun(
    config: &HeliostatConfig,
    date: NaiveDate,
    time: Option<NaiveTime>,
    location: &Location,
) -> Result<(), String> {
    let ephemeris = ephemeris_for(config.tracking.ephemeris);
    match time {
        Some(time) => {
            let at = Utc.from_utc_datetime(&date.and_time(time));
            let pos = solar_position(ephemeris, &at, location);
            println!("Time (UTC):  {}", pos.timestamp);
            println!(
                "Location:    {:.4}°, {:.4}° ({:.0} m)",
                location.latitude, location.longitude, location.altitude_m
            );
            println!("Azimuth:     {:.3}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
            println!("Elevation:   {:.3}°", pos.elevation);
        }
        None => {
            let start = utc_midnight(date)?;
            let positions = get_solar_position(
                ephemeris,
                &start,
                location,
                config.tracking.interval_minutes,
            );
            println!("{:<28} {:>10} {:>10}", "Time (UTC)", "Azimuth", "Elevation");
            println!("{}", "-".repeat(50));
            for pos in &positions {
                println!(
                    "{:<28} {:>10.3} {:>10.3}",
                    pos.timestamp.to_rfc3339(),
                    pos.azimuth,
                    pos.elevation
                );
            }
            println!("\n{} sample(s) above the horizon", positions.len());
        }
    }
    Ok(())
}

fn run_solve(
    config: &HeliostatConfig,
    sun: AnglePair,
    target: &[f64],
    strategy: Strategy,
) -> Result<(), String> {
    let target = match target {
        [x, y, z] => DVec3::new(*x, *y, *z),
        _ => return Err(format!("--target takes 3 values, got {}", target.len())),
    };
    let solution =
        solve(strategy, sun_ray(sun), target, &config.solver).map_err(|e| e.to_string())?;

    println!("Strategy:          {:?}", strategy);
    println!(
        "Mirror azimuth:    {:.6}°",
        solution.angles.azimuth_from_north
    );
    println!("Mirror elevation:  {:.6}°", solution.angles.elevation);
    println!(
        "Normal:            ({:.6}, {:.6}, {:.6})",
        solution.normal.x, solution.normal.y, solution.normal.z
    );
    println!(
        "Reflected ray:     ({:.6}, {:.6}, {:.6})",
        solution.reflected.x, solution.reflected.y, solution.reflected.z
    );
    println!("Residual:          {:.3e}", solution.residual);
    println!("Iterations:        {}", solution.iterations);
    Ok(())
}

fn run_track(config: &HeliostatConfig, date: NaiveDate, json: bool) -> Result<(), String> {
    let start = utc_midnight(date)?;
    let track = track_day(&config.heliostat(), &start, &config.tracking_options())
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&track).map_err(|e| e.to_string())?;
        println!("{}", out);
    } else {
        print_track(&track);
    }
    Ok(())
}

fn print_track(track: &DayTrack) {
    println!(
        "{:<28} {:>9} {:>9} {:>10} {:>10} {:>10}",
        "Time (UTC)", "Sun az", "Sun el", "Mirror az", "Mirror el", "Miss"
    );
    println!("{}", "-".repeat(81));
    for s in &track.samples {
        println!(
            "{:<28} {:>9.2} {:>9.2} {:>10.3} {:>10.3} {:>10.2e}",
            s.timestamp.to_rfc3339(),
            s.sun.azimuth_from_north,
            s.sun.elevation,
            s.mirror.azimuth_from_north,
            s.mirror.elevation,
            s.miss_distance
        );
    }
    for f in &track.failures {
        println!("{:<28} skipped: {}", f.timestamp.to_rfc3339(), f.error);
    }
    println!(
        "\n{} sample(s), {} skipped, strategy {:?}",
        track.samples.len(),
        track.failures.len(),
        track.strategy
    );
}
