use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::Path;

// Import from screenplay-core
use screenplay_core::config::PRESET_NAMES;
use screenplay_core::export::OUTPUT_FORMATS;
use screenplay_core::{
    FormatterConfig, FormattedScript, FormattingPipeline, NoHints, PaginationError,
    PipelineStages, PlainTextPreprocessor, TextPreprocessor,
};

#[derive(Parser)]
#[command(name = "screenplay-formatter")]
#[command(about = "Classify raw Arabic/English screenplay text and lay it out on pages")]
struct Args {
    /// Path to the script text file, or '-' to read stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Output format: paginated, sequential, flat, or text
    #[arg(short = 'f', long, default_value = "paginated")]
    output_format: String,

    /// Output file path (stdout if not specified)
    #[arg(short, long)]
    output: Option<String>,

    /// Page preset (a4, us-letter); overrides the page section of the config
    #[arg(long)]
    preset: Option<String>,

    /// Fall back to a continuous, unpaginated flow when heights cannot be measured
    #[arg(long)]
    allow_unpaginated: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Dump all intermediate pipeline stage outputs to this directory
    #[arg(long, value_name = "DIR")]
    dump_stages: Option<String>,

    /// Show available config options and exit
    #[arg(long)]
    show_configs: bool,

    /// Verbose logging (per-line classification decisions)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    eprintln!("🎬 Screenplay Formatter");

    if args.show_configs {
        show_help()?;
        return Ok(());
    }

    if !OUTPUT_FORMATS.contains(&args.output_format.as_str()) {
        eprintln!(
            "❌ Unknown output format '{}' (expected one of: {})",
            args.output_format,
            OUTPUT_FORMATS.join(", ")
        );
        std::process::exit(2);
    }

    let config = match load_config(args.config.as_deref(), args.preset.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e:#}");
            std::process::exit(2);
        }
    };
    let pipeline = FormattingPipeline::new(config)?;

    let text = read_input(&args.input)?;
    eprintln!("📄 Processing: {}", display_input(&args.input));

    // Stage dump mode: capture and save all intermediates
    if let Some(stages_dir) = &args.dump_stages {
        eprintln!("🔬 Pipeline stage dump mode");
        match pipeline.capture_stages(&text, &NoHints) {
            Ok(stages) => {
                save_stages(&stages, stages_dir, &args.input)?;
                eprintln!("✅ All stages dumped to: {}", stages_dir);
            }
            Err(e) => {
                eprintln!("❌ Stage dump failed: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let script = match pipeline.format_text_with_profiling(&text, &NoHints, args.profile) {
        Ok(script) => script,
        Err(e) if args.allow_unpaginated && e.downcast_ref::<PaginationError>().is_some() => {
            eprintln!("⚠️  Pagination failed ({e}), falling back to a continuous flow");
            pipeline.format_unpaginated(&text, &NoHints)?
        }
        Err(e) => {
            eprintln!("❌ Processing failed: {e}");
            if e.downcast_ref::<PaginationError>().is_some() {
                eprintln!("   Re-run with --allow-unpaginated to produce a continuous flow instead.");
            }
            std::process::exit(1);
        }
    };

    print_summary(&script);
    write_output(&pipeline, &script, args.output.as_deref(), &args.output_format)?;

    Ok(())
}

/// Config file (or defaults), then the page preset on top. An explicit config
/// that fails to load or validate is an error, never silently replaced.
fn load_config(config_path: Option<&str>, preset: Option<&str>) -> Result<FormatterConfig> {
    let mut config = match config_path {
        Some(path) => {
            let config = FormatterConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            eprintln!("📋 Loaded config from: {}", path);
            config
        }
        None => {
            eprintln!("📋 Using default config");
            FormatterConfig::default()
        }
    };

    if let Some(name) = preset {
        let preset = FormatterConfig::preset(name).ok_or_else(|| {
            anyhow!(
                "Unknown page preset '{}' (expected one of: {})",
                name,
                PRESET_NAMES.join(", ")
            )
        })?;
        config.page = preset.page;
        eprintln!("📐 Page preset: {}", name);
    }

    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    let preprocessor = PlainTextPreprocessor::new();
    let bytes = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read script from stdin")?;
        bytes
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(anyhow!("Input script not found at: {}", input));
        }
        if !preprocessor.supports_file_type(path) {
            eprintln!("⚠️  {} does not look like a plain-text script, reading it anyway", input);
        }
        std::fs::read(path).with_context(|| format!("Failed to read {}", input))?
    };
    preprocessor.decode(&bytes)
}

fn display_input(input: &str) -> &str {
    if input == "-" {
        "<stdin>"
    } else {
        input
    }
}

fn print_summary(script: &FormattedScript) {
    let stats = &script.stats;
    eprintln!("✅ Successfully formatted script");
    eprintln!("📊 Script metrics:");
    eprintln!("   - Elements: {}", stats.total_elements);
    eprintln!("   - Scenes: {}", stats.scene_count);
    if script.is_paginated() {
        eprintln!("   - Pages: {}", stats.page_count);
    } else {
        eprintln!("   - Pages: unpaginated");
    }
    for (name, character) in stats.top_characters(5) {
        eprintln!(
            "   - {}: {} cues, {} words",
            name, character.cues, character.words_spoken
        );
    }
}

fn write_output(
    pipeline: &FormattingPipeline,
    script: &FormattedScript,
    output_path: Option<&str>,
    format: &str,
) -> Result<()> {
    match output_path {
        Some(path) => {
            pipeline.save(script, path, format)?;
            eprintln!("💾 {} format results saved to: {}", format, path);
        }
        None => {
            let rendered = pipeline.render(script, format)?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

fn show_help() -> Result<()> {
    println!("\n📋 Available Configuration Options:");
    println!("  --config <path>          Load custom config file (YAML)");
    println!("  --input <path>           Script text file, '-' for stdin (default)");
    println!("  --output <path>          Output file path (stdout if not specified)");
    println!("  --output-format <fmt>    Output format: {}", OUTPUT_FORMATS.join(", "));
    println!("  --preset <name>          Page preset: {}", PRESET_NAMES.join(", "));
    println!("  --allow-unpaginated      Continue without page breaks if measurement fails");
    println!("  --dump-stages <dir>      Write every intermediate stage to <dir>");
    println!("  --profile                Log per-stage timings");

    println!("\n📄 Output Formats:");
    println!("  paginated   - Elements, pages, break markers, stats and fingerprints (default)");
    println!("  sequential  - Ordered elements with page breaks interleaved (for renderers)");
    println!("  flat        - Simple array of element contents (minimal format)");
    println!("  text        - Monospaced plain-text screenplay with page numbers");

    println!("\n⚙️  Default config (YAML):");
    println!("{}", FormatterConfig::default().to_yaml()?);

    println!("📝 Usage Examples:");
    println!("  screenplay-formatter -i script.txt");
    println!("  screenplay-formatter -i script.txt -f text --preset us-letter");
    println!("  cat script.txt | screenplay-formatter -c config.yaml -o script.json");
    Ok(())
}

fn save_stages(stages: &PipelineStages, output_dir: &str, input: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: Raw lines
    let lines_path = format!("{}/stage1_raw_lines.json", output_dir);
    fs::write(&lines_path, serde_json::to_string_pretty(&stages.raw_lines)?)?;
    eprintln!("  💾 {} ({} lines)", lines_path, stages.raw_lines.len());

    // Stage 2: Classified lines with reasons
    let classified_path = format!("{}/stage2_classified.json", output_dir);
    fs::write(&classified_path, serde_json::to_string_pretty(&stages.classified)?)?;
    eprintln!("  💾 {} ({} elements)", classified_path, stages.classified.len());

    // Stage 3: Measured heights
    let heights_path = format!("{}/stage3_heights.json", output_dir);
    fs::write(&heights_path, serde_json::to_string_pretty(&stages.heights)?)?;
    eprintln!("  💾 {} ({} heights)", heights_path, stages.heights.len());

    // Stage 4: Pagination (absent when measurement failed)
    let pagination_path = format!("{}/stage4_pagination.json", output_dir);
    fs::write(&pagination_path, serde_json::to_string_pretty(&stages.pagination)?)?;
    match &stages.pagination {
        Some(pagination) => {
            eprintln!("  💾 {} ({} pages)", pagination_path, pagination.page_count())
        }
        None => eprintln!("  💾 {} (not paginated)", pagination_path),
    }

    // Stage 5: Validation report
    let validation_path = format!("{}/stage5_validation.json", output_dir);
    fs::write(&validation_path, serde_json::to_string_pretty(&stages.validation)?)?;
    eprintln!(
        "  💾 {} ({} issues)",
        validation_path,
        stages.validation.issues.len()
    );

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": display_input(input),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "raw_lines": stages.raw_lines.len(),
            "elements": stages.classified.len(),
            "unmeasured": stages.heights.iter().filter(|h| h.is_none()).count(),
            "pages": stages.pagination.as_ref().map(|p| p.page_count()),
            "issues": stages.validation.issues.len(),
        },
        "pagination_error": stages.pagination_error,
        "quality_score": stages.validation.quality_score,
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    eprintln!("  💾 {}", summary_path);

    Ok(())
}
