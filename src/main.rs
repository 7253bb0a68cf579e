use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use pir::{
    collect_image_files, format_elapsed, BatchOutcome, BatchProcessor, Cli, ImageSet,
    ImageToolError, ProcessConfig,
};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const EXIT_USAGE: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match run(cli) {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(err) => match err.downcast_ref::<ImageToolError>() {
            Some(ImageToolError::Cancelled) => {
                println!("\nCancelled, remaining images were not processed.");
                ExitCode::from(EXIT_INTERRUPTED)
            }
            Some(
                ImageToolError::NotFound(_)
                | ImageToolError::NoSupportedFiles(_)
                | ImageToolError::InvalidArgument(_),
            ) => {
                eprintln!("error: {:#}", err);
                eprintln!("\nFor more information, try '--help'.");
                ExitCode::from(EXIT_USAGE)
            }
            _ => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<BatchOutcome> {
    // Nothing is written until the input has been checked.
    let images = collect_image_files(&cli.input)?;
    let config = cli.to_config(&images.base_dir);
    config.validate()?;

    if config.verbose {
        print_plan(&config, &images);
    }

    if !config.skip_confirmation {
        confirm()?;
    }

    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&cancel));

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output folder {}",
            config.output_dir.display()
        )
    })?;

    let outcome = BatchProcessor::new(config)
        .with_cancel_flag(cancel)
        .run(&images)?;

    Ok(outcome)
}

fn install_interrupt_handler(cancel: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        if !cancel.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupt received, finishing images in progress...");
        }
    });

    if let Err(e) = result {
        log::warn!("Could not install interrupt handler: {}", e);
    }
}

fn confirm() -> Result<()> {
    print!("Press Enter to start or Ctrl+C to abort... ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read confirmation")?;

    Ok(())
}

fn print_plan(config: &ProcessConfig, images: &ImageSet) {
    let resolutions: Vec<String> = config.resolutions.iter().map(|r| r.to_string()).collect();

    println!("=== Configuration ===");
    println!("Input:        {}", config.input_dir.display());
    println!("Output:       {}", config.output_dir.display());
    println!("Resolutions:  {}", resolutions.join(", "));
    println!("Action:       {}", config.action);
    println!("Quality:      {}", config.quality);
    println!("Filter:       {:?}", config.algorithm);
    println!("Rotate:       {}", config.rotate);
    println!("Organize:     {}", config.organize);
    println!("Threads:      {}", config.workers);
    println!("\n=== Files ({}) ===", images.len());
    for file in &images.files {
        println!("  {}", file);
    }
    println!();
}

fn print_summary(outcome: &BatchOutcome) {
    for resolution in &outcome.resolutions {
        println!(
            "{}: {} written, {} skipped in {}",
            resolution.resolution,
            resolution.written,
            resolution.skipped.len(),
            format_elapsed(resolution.elapsed)
        );
        for skipped in &resolution.skipped {
            println!("  skipped {}: {}", skipped.file, skipped.reason);
        }
    }

    let skipped = outcome.skipped_count();
    if skipped > 0 {
        println!("Skipped {} file(s)", skipped);
    }
    println!(
        "Processed {} image(s) at {} resolution(s) in {}",
        outcome.total_files,
        outcome.resolutions.len(),
        format_elapsed(outcome.elapsed)
    );
}
