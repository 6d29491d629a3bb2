use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{info, warn, LevelFilter};
use imgroup::{
    cluster_images,
    Error,
    GroupConfig,
    ProcessingManager,
    Result,
    RunReport,
    DistanceMetric,
    config::subsystems::{InitialAssignment, PlacementMode},
    utils::{discovery::discover_images, placement::place_files},
};

/// Group the images of a folder into k visually similar clusters.
#[derive(Debug, Parser)]
#[command(name = "group_images", version)]
struct Cli {
    /// Path to image folder
    #[arg(short = 'f', long = "folder")]
    folder: PathBuf,

    /// Number of clusters
    #[arg(short = 'k', long = "kmeans")]
    kmeans: Option<usize>,

    /// Resampling size (16-256)
    #[arg(short = 'r', long = "resample")]
    resample: Option<u32>,

    /// Use original image size as a feature for clustering
    #[arg(short = 's', long = "size")]
    size: bool,

    /// Move files instead of copying them
    #[arg(short = 'm', long = "move")]
    move_files: bool,

    /// INI configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Extraction worker threads (default: all cores)
    #[arg(short = 'w', long = "workers")]
    workers: Option<usize>,

    /// Distance used for reassignment (manhattan or euclidean)
    #[arg(long = "metric")]
    metric: Option<String>,

    /// Stop refinement after this many passes
    #[arg(long = "max-passes")]
    max_passes: Option<usize>,

    /// Assign starting labels in extraction completion order
    #[arg(long = "completion-order")]
    completion_order: bool,

    /// Where to create the K_<n> folders (default: the image folder)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Write a JSON report of the run
    #[arg(long = "report")]
    report: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<GroupConfig> {
    let mut config = match &cli.config {
        Some(path) => GroupConfig::from_ini_str(&fs::read_to_string(path)?)?,
        None => GroupConfig::default(),
    };

    if let Some(k) = cli.kmeans {
        config.refiner.clusters = k;
    }
    if let Some(resample) = cli.resample {
        config.extractor.resample = resample;
    }
    if cli.size {
        config.extractor.include_size = true;
    }
    if cli.move_files {
        config.placement.mode = PlacementMode::Move;
    }
    if let Some(workers) = cli.workers {
        config.processor.workers = workers;
    }
    if let Some(metric) = &cli.metric {
        config.refiner.metric = DistanceMetric::from_str(metric)
            .ok_or_else(|| Error::invalid(format!("unknown metric: {}", metric)))?;
    }
    if let Some(max_passes) = cli.max_passes {
        config.refiner.max_passes = Some(max_passes);
    }
    if cli.completion_order {
        config.refiner.initial_assignment = InitialAssignment::CompletionOrder;
    }
    if let Some(dir) = &cli.output_dir {
        config.placement.output_dir = Some(dir.clone());
    }
    match cli.verbose {
        0 => {}
        1 => config.processor.log_level = "debug".to_string(),
        _ => config.processor.log_level = "trace".to_string(),
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &GroupConfig) -> Result<LevelFilter> {
    let log_level = config.processor.get_log_level();
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log_level);

    if let Some(dir) = &config.processor.log_dir {
        fs::create_dir_all(dir)?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let log_file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("group_images_{}.log", timestamp)))?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(log_level)
}

fn run(cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(cli)?;

    let log_level = init_logging(&config)?;
    info!("Starting image grouping with log level: {:?}", log_level);

    let images = discover_images(&cli.folder, &config.placement.extensions)?;
    if images.is_empty() {
        return Err(Error::EmptyInput(cli.folder.clone()));
    }

    let manager = ProcessingManager::new(&config.processor);
    let progress = manager.progress_bar(images.len());
    let run = cluster_images(&images, &config, &progress)?;
    progress.finish_and_clear();

    // Each excluded image was already reported through the failure log.
    if !run.outcome.converged() {
        warn!("Refinement stopped after {} passes without converging", run.outcome.passes);
    }

    let root = config.placement.output_dir.clone().unwrap_or_else(|| cli.folder.clone());
    let summary = place_files(&run.assignments, &root, config.refiner.clusters, config.placement.mode)?;

    if let Some(report_path) = &cli.report {
        RunReport::new(&config, &run).write_json(report_path)?;
    }

    println!(
        "Grouped {} images into {} of {} clusters in {} passes ({} excluded) [{:.2}s]",
        summary.placed,
        run.non_empty_clusters(),
        config.refiner.clusters,
        run.outcome.passes,
        run.failures.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(error) = run(&cli) {
        eprintln!("{}", error);
        if matches!(error, Error::Config(_) | Error::InvalidParameter(_)) {
            eprintln!("Use --help to see available options.");
        }
        std::process::exit(1);
    }
}
