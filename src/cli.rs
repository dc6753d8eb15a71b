// ============================================================================
// PixelForge CLI — headless sheet/project conversion via command-line arguments
// ============================================================================
//
// Usage examples:
//   PixelForge -i walk.png --frame-width 16 --frame-height 16 -o walk.pfproj
//   PixelForge -i "sheets/*.png" --frame-width 32 --frame-height 32 -o all.pfproj
//   PixelForge -i hero.pfproj -o hero_sheet.png --columns 4
//   PixelForge -i hero.pfproj                    (print a summary)
//
// Everything runs synchronously on the current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image::RgbaImage;

use crate::io::{is_project_path, load_image, load_project, save_image, save_project};
use crate::ops::sheet::{export_sheet, import_sheet};
use crate::project::Project;
use crate::settings::{EditorSettings, check_canvas_size};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// PixelForge headless sprite tool.
///
/// Slice sprite sheets into projects, export projects as sheets, or inspect them.
#[derive(Parser, Debug)]
#[command(
    name = "PixelForge",
    about = "PixelForge headless sprite sheet / project converter",
    long_about = "Slice PNG sprite sheets into a PixelForge project, export a project\n\
                  back to a single sheet, or print a project summary.\n\n\
                  Example:\n  \
                  PixelForge -i walk.png --frame-width 16 --frame-height 16 -o walk.pfproj\n  \
                  PixelForge -i walk.pfproj -o walk_sheet.png --columns 4"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "sheets/*.png").
    /// Either one .pfproj project, or one or more images to slice.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file: `.pfproj` saves a project, anything else exports a sheet image.
    /// When omitted a summary is printed instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Frame width used when slicing images (default from settings).
    #[arg(long, value_name = "PX")]
    pub frame_width: Option<u32>,

    /// Frame height used when slicing images (default from settings).
    #[arg(long, value_name = "PX")]
    pub frame_height: Option<u32>,

    /// Columns in an exported sheet (default from settings).
    #[arg(short, long, value_name = "N")]
    pub columns: Option<u32>,

    /// Print per-step timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

/// What `--output` asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputKind {
    Project,
    Sheet,
}

fn output_kind(path: &Path) -> OutputKind {
    if is_project_path(path) {
        OutputKind::Project
    } else {
        OutputKind::Sheet
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run the CLI and return an OS exit code.
/// `0` = success, `1` = failure.
pub fn run(args: CliArgs) -> ExitCode {
    let settings = EditorSettings::load();
    let start = Instant::now();

    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    let project = if inputs.iter().any(|p| is_project_path(p)) {
        if inputs.len() > 1 {
            eprintln!("error: a project input cannot be combined with other inputs.");
            return ExitCode::FAILURE;
        }
        match load_project(&inputs[0]) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: could not load '{}': {}", inputs[0].display(), e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let sliced = frame_size(&args, &settings)
            .and_then(|(fw, fh)| slice_images(&inputs, fw, fh, args.verbose));
        match sliced {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let result = match &args.output {
        None => {
            print_summary(&project);
            Ok(())
        }
        Some(out) => match output_kind(out) {
            OutputKind::Project => save_project(&project, out).map_err(|e| e.to_string()),
            OutputKind::Sheet => {
                let columns = args.columns.unwrap_or(settings.export_columns);
                export_sheet(&project, columns)
                    .and_then(|sheet| save_image(&sheet, out).map_err(|e| e.to_string()))
            }
        },
    };

    match result {
        Ok(()) => {
            if let (Some(out), true) = (&args.output, args.verbose) {
                println!(
                    "  → {} ({:.0}ms)",
                    out.display(),
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Steps
// ============================================================================

/// Frame size from the flags, falling back to the settings defaults.
fn frame_size(args: &CliArgs, settings: &EditorSettings) -> Result<(u32, u32), String> {
    let fw = args.frame_width.unwrap_or(settings.default_frame_width);
    let fh = args.frame_height.unwrap_or(settings.default_frame_height);
    check_canvas_size(fw, fh, settings.max_canvas_size)
}

fn slice_images(inputs: &[PathBuf], frame_width: u32, frame_height: u32, verbose: bool) -> Result<Project, String> {
    let mut images = Vec::with_capacity(inputs.len());
    for (idx, path) in inputs.iter().enumerate() {
        if verbose {
            println!("[{}/{}] {}", idx + 1, inputs.len(), path.display());
        }
        let img = load_image(path).map_err(|e| format!("load failed for '{}': {}", path.display(), e))?;
        images.push(img);
    }
    project_from_sheets(&images, frame_width, frame_height)
}

/// Slice every sheet into frames and gather them in one project.
fn project_from_sheets(images: &[RgbaImage], frame_width: u32, frame_height: u32) -> Result<Project, String> {
    if frame_width == 0 || frame_height == 0 {
        return Err("frame size must be at least 1x1".to_string());
    }
    let mut sprites = Vec::new();
    for img in images {
        let mut frames = import_sheet(img, frame_width, frame_height, sprites.len() + 1);
        sprites.append(&mut frames);
    }
    let mut project = Project::from_sprites(frame_width, frame_height, sprites)
        .ok_or_else(|| "no non-empty frames found in the input image(s)".to_string())?;
    project.mark_dirty();
    Ok(project)
}

fn print_summary(project: &Project) {
    println!(
        "{}: {} sprite(s), frame {}x{}",
        project.display_title(),
        project.len(),
        project.frame_width(),
        project.frame_height()
    );
    for (i, sprite) in project.sprites().iter().enumerate() {
        let canvas = sprite.canvas();
        let filled = canvas.pixels().filter(|(_, _, p)| p.is_some()).count();
        let marker = if i == project.active_index() { '*' } else { ' ' };
        println!(
            "{} [{}] {} ({}x{}, {} px)",
            marker,
            i,
            sprite.name,
            canvas.width(),
            canvas.height(),
            filled
        );
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}
