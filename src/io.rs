use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageError, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::canvas::Canvas;
use crate::project::{Project, Sprite};

/// File extension of project documents.
pub const PROJECT_EXTENSION: &str = "pfproj";

/// Maximum supported canvas dimension in pixels (per axis).
/// Prevents memory exhaustion from crafted project files.
const MAX_CANVAS_DIM: u32 = 32_768;
/// Maximum number of sprites in a project file.
const MAX_SPRITES: usize = 4096;

// ============================================================================
// PROJECT DOCUMENT FORMAT
// ============================================================================

/// Serializable project document.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectDocument {
    frame_width: u32,
    frame_height: u32,
    /// Signed so that a corrupted negative value still parses and gets clamped.
    active_index: i64,
    sprites: Vec<SpriteDocument>,
}

/// Serializable sprite: row-major RGBA bytes, base64-encoded.
#[derive(Serialize, Deserialize, Debug)]
struct SpriteDocument {
    name: String,
    width: u32,
    height: u32,
    pixels: String,
}

/// Error type for project and image file operations
#[derive(Debug)]
pub enum ProjectIoError {
    Io(std::io::Error),
    Serialize(String),
    Decode(String),
    InvalidFormat(String),
    Image(ImageError),
}

impl std::fmt::Display for ProjectIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectIoError::Io(e) => write!(f, "I/O error: {}", e),
            ProjectIoError::Serialize(e) => write!(f, "Serialization error: {}", e),
            ProjectIoError::Decode(e) => write!(f, "Decode error: {}", e),
            ProjectIoError::InvalidFormat(e) => write!(f, "Invalid format: {}", e),
            ProjectIoError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for ProjectIoError {}

impl From<std::io::Error> for ProjectIoError {
    fn from(e: std::io::Error) -> Self {
        ProjectIoError::Io(e)
    }
}

impl From<serde_json::Error> for ProjectIoError {
    fn from(e: serde_json::Error) -> Self {
        ProjectIoError::Serialize(e.to_string())
    }
}

impl From<base64::DecodeError> for ProjectIoError {
    fn from(e: base64::DecodeError) -> Self {
        ProjectIoError::Decode(e.to_string())
    }
}

impl From<ImageError> for ProjectIoError {
    fn from(e: ImageError) -> Self {
        ProjectIoError::Image(e)
    }
}

/// Flatten a canvas to row-major RGBA bytes. Empty cells are all zero.
fn encode_pixels(canvas: &Canvas) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(canvas.width() as usize * canvas.height() as usize * 4);
    for (_, _, pixel) in canvas.pixels() {
        match pixel {
            Some(p) => bytes.extend_from_slice(&p.0),
            None => bytes.extend_from_slice(&[0, 0, 0, 0]),
        }
    }
    bytes
}

/// Rebuild a canvas from row-major RGBA bytes. Alpha 0 is "no pixel",
/// whatever the color bytes say.
fn decode_pixels(width: u32, height: u32, bytes: &[u8]) -> Result<Canvas, ProjectIoError> {
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(ProjectIoError::InvalidFormat(format!(
            "pixel payload is {} bytes, expected {} for {}x{}",
            bytes.len(),
            expected,
            width,
            height
        )));
    }
    let image = RgbaImage::from_raw(width, height, bytes.to_vec())
        .ok_or_else(|| ProjectIoError::InvalidFormat("pixel buffer size mismatch".into()))?;
    Ok(Canvas::from_rgba_image(&image))
}

fn check_dimensions(what: &str, width: u32, height: u32) -> Result<(), ProjectIoError> {
    if width == 0 || height == 0 || width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
        return Err(ProjectIoError::InvalidFormat(format!(
            "{} size {}x{} out of range (1-{})",
            what, width, height, MAX_CANVAS_DIM
        )));
    }
    Ok(())
}

/// Build the serializable document for a project.
pub(crate) fn build_document(project: &Project) -> ProjectDocument {
    let sprites = project
        .sprites()
        .iter()
        .map(|sprite| {
            let canvas = sprite.canvas();
            SpriteDocument {
                name: sprite.name.clone(),
                width: canvas.width(),
                height: canvas.height(),
                pixels: BASE64.encode(encode_pixels(canvas)),
            }
        })
        .collect();

    ProjectDocument {
        frame_width: project.frame_width(),
        frame_height: project.frame_height(),
        active_index: project.active_index() as i64,
        sprites,
    }
}

/// Turn a parsed document into a fresh project. Nothing is shared with any
/// existing project, so a failure here leaves the caller's state untouched.
pub(crate) fn project_from_document(doc: ProjectDocument) -> Result<Project, ProjectIoError> {
    check_dimensions("Frame", doc.frame_width, doc.frame_height)?;
    if doc.sprites.len() > MAX_SPRITES {
        return Err(ProjectIoError::InvalidFormat(format!(
            "{} sprites exceeds the maximum of {}",
            doc.sprites.len(),
            MAX_SPRITES
        )));
    }

    let mut sprites = Vec::with_capacity(doc.sprites.len());
    for sd in doc.sprites {
        check_dimensions("Sprite", sd.width, sd.height)?;
        let bytes = BASE64.decode(sd.pixels.as_bytes())?;
        let canvas = decode_pixels(sd.width, sd.height, &bytes)?;
        sprites.push(Sprite::from_canvas(sd.name, canvas));
    }

    let count = sprites.len();
    let mut project = Project::from_sprites(doc.frame_width, doc.frame_height, sprites)
        .ok_or_else(|| ProjectIoError::InvalidFormat("project has no sprites".into()))?;
    project.set_active(doc.active_index.clamp(0, count as i64 - 1) as usize);
    Ok(project)
}

/// Serialize a project to its JSON document text.
pub fn project_to_string(project: &Project) -> Result<String, ProjectIoError> {
    Ok(serde_json::to_string_pretty(&build_document(project))?)
}

/// Parse a project from JSON document text.
pub fn project_from_str(text: &str) -> Result<Project, ProjectIoError> {
    let doc: ProjectDocument = serde_json::from_str(text)?;
    project_from_document(doc)
}

/// Write the pretty-printed document to `out`, flushing before returning.
fn write_project<W: Write>(project: &Project, out: W) -> Result<(), ProjectIoError> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, &build_document(project))?;
    writer.flush()?;
    Ok(())
}

/// Save a project document to `path`, creating parent directories.
pub fn save_project(project: &Project, path: &Path) -> Result<(), ProjectIoError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;
    write_project(project, file)?;
    crate::log_info!("Saved project {} ({} sprites)", path.display(), project.len());
    Ok(())
}

/// Load a project document. The returned project remembers `path` and
/// starts clean.
pub fn load_project(path: &Path) -> Result<Project, ProjectIoError> {
    let file = File::open(path)?;
    let doc: ProjectDocument = serde_json::from_reader(BufReader::new(file))?;
    let mut project = project_from_document(doc).inspect_err(|e| {
        crate::log_err!("Failed to load project {}: {}", path.display(), e);
    })?;
    project.path = Some(path.to_path_buf());
    project.mark_clean();
    crate::log_info!("Loaded project {} ({} sprites)", path.display(), project.len());
    Ok(project)
}

/// True when `path` carries the project extension.
pub fn is_project_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PROJECT_EXTENSION))
}

// ============================================================================
// IMAGE CODEC BOUNDARY
// ============================================================================

/// Decode any supported image file to RGBA.
pub fn load_image(path: &Path) -> Result<RgbaImage, ProjectIoError> {
    Ok(image::open(path)?.into_rgba8())
}

/// Encode an RGBA image; the format follows the file extension.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<(), ProjectIoError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    image.save(path)?;
    Ok(())
}
