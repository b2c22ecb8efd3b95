use clap::{Parser, Subcommand};
use edgeify_core::pgm::{is_pgm_path, load_pgm, save_pgm};
use edgeify_core::pipeline::{apply_chain, Operation, Preset};
use edgeify_core::render::save_png;
use edgeify_core::session::Session;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

mod interactive;

#[derive(Parser)]
#[command(
    name = "edgeify-cli",
    about = "Enhance, denoise and edge-detect ASCII PGM (P2) images"
)]
struct Cli {
    /// Number of worker threads for window operations (default: num_cpus)
    #[arg(long, short, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a chain of operations to an image and save the result
    Apply {
        /// Input image path (.pgm)
        input: PathBuf,

        /// Output path, .pgm or .png (default: input_edgeify.pgm)
        output: Option<PathBuf>,

        /// Operation to apply, repeatable, applied in order:
        /// stretch, gamma=<g>, mean[=<n>], median[=<n>], prewitt, sobel
        #[arg(long = "op")]
        ops: Vec<Operation>,

        /// Use a named preset (overrides --op)
        #[arg(long)]
        preset: Option<String>,

        /// Comment written into the PGM header
        #[arg(long)]
        comment: Option<String>,
    },

    /// Edit an image through a numbered menu
    Interactive {
        /// Input image path (.pgm)
        input: PathBuf,

        /// Re-render this PNG after every operation
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Save the final image here on exit
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the named presets
    Presets,
}

fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_{}.pgm", stem, suffix))
}

fn is_png_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

fn check_input(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("file doesn't exist: {}", input.display()).into());
    }
    if !is_pgm_path(input) {
        return Err(format!(
            "only ASCII PGM (.pgm) images are supported: {}",
            input.display()
        )
        .into());
    }
    Ok(())
}

fn cmd_apply(
    input: &Path,
    output: Option<&Path>,
    ops: Vec<Operation>,
    preset: Option<&str>,
    comment: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    check_input(input)?;

    let (label, ops) = match preset {
        Some(name) => {
            let p = Preset::from_preset(name).ok_or_else(|| {
                let names: Vec<&str> = Preset::all_presets().iter().map(|(n, _)| *n).collect();
                format!("Unknown preset '{}'. Available: {}", name, names.join(", "))
            })?;
            (name, p.operations)
        }
        None => ("edgeify", ops),
    };
    if ops.is_empty() {
        return Err("nothing to do: pass at least one --op or a --preset".into());
    }

    let output_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input, label));

    let chain: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
    let chain = chain.join(" -> ");
    eprintln!(
        "Processing: {} -> {}",
        input.display(),
        output_path.display()
    );
    eprintln!("Chain: {}", chain);

    let img = load_pgm(input)?;
    info!(
        "loaded {}x{} image, max intensity {}",
        img.cols(),
        img.rows(),
        img.max_intensity()
    );
    let result = apply_chain(&img, &ops)?;

    if is_png_path(&output_path) {
        save_png(&result, &output_path)?;
    } else {
        let comment = comment
            .map(str::to_string)
            .unwrap_or_else(|| format!("edgeify: {}", chain));
        save_pgm(&output_path, &result, Some(&comment))?;
    }
    eprintln!("Done: {}", output_path.display());
    Ok(())
}

fn cmd_interactive(
    input: &Path,
    preview: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    check_input(input)?;

    let img = load_pgm(input)?;
    eprintln!(
        "Loaded {} ({}x{}, max intensity {})",
        input.display(),
        img.cols(),
        img.rows(),
        img.max_intensity()
    );
    if let Some(path) = preview {
        save_png(&img, path)?;
        eprintln!("Preview: {}", path.display());
    }

    let mut session = Session::new(img);
    let stdin = io::stdin();
    interactive::run_menu(&mut session, stdin.lock(), io::stdout(), preview)?;

    if let Some(path) = output {
        let ops: Vec<String> = session.history().iter().map(|op| op.to_string()).collect();
        let comment = format!("edgeify: {}", ops.join(" -> "));
        save_pgm(path, session.current(), Some(&comment))?;
        eprintln!("Saved: {}", path.display());
    }
    Ok(())
}

fn cmd_presets() {
    for (name, preset) in Preset::all_presets() {
        println!("{:<14} {}", name, preset);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Configure thread pool
    if let Some(n) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok();
    }

    match cli.command {
        Commands::Apply {
            input,
            output,
            ops,
            preset,
            comment,
        } => {
            cmd_apply(
                &input,
                output.as_deref(),
                ops,
                preset.as_deref(),
                comment.as_deref(),
            )?;
        }

        Commands::Interactive {
            input,
            preview,
            output,
        } => {
            cmd_interactive(&input, preview.as_deref(), output.as_deref())?;
        }

        Commands::Presets => cmd_presets(),
    }

    Ok(())
}
