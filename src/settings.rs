use std::path::PathBuf;

/// Largest canvas side accepted by the new-canvas prompt.
pub const DEFAULT_MAX_CANVAS_SIZE: u32 = 512;

/// Editor preferences, persisted as `key=value` lines.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Maximum number of undo steps per sprite (0 = unlimited)
    pub max_undo_steps: usize,
    /// Frame size for new projects
    pub default_frame_width: u32,
    pub default_frame_height: u32,
    /// Upper bound for canvas-size input
    pub max_canvas_size: u32,
    /// Columns used when exporting a sprite sheet
    pub export_columns: u32,
    /// Rectangle tool starts in filled mode
    pub rect_filled: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            max_undo_steps: 50,
            default_frame_width: 32,
            default_frame_height: 32,
            max_canvas_size: DEFAULT_MAX_CANVAS_SIZE,
            export_columns: 8,
            rect_filled: false,
        }
    }
}

impl EditorSettings {
    pub(crate) fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
                    PathBuf::from(home).join(".config")
                })
                .join("pixelforge");
            return Some(config_dir.join("pixelforge_settings.cfg"));
        }
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok()?;
            return Some(PathBuf::from(appdata).join("PixelForge").join("pixelforge_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("PixelForge")
                    .join("pixelforge_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
        {
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|d| d.join("pixelforge_settings.cfg")))
        }
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "max_undo_steps={}\n\
             default_frame_width={}\n\
             default_frame_height={}\n\
             max_canvas_size={}\n\
             export_columns={}\n\
             rect_filled={}\n",
            self.max_undo_steps,
            self.default_frame_width,
            self.default_frame_height,
            self.max_canvas_size,
            self.export_columns,
            self.rect_filled,
        )
    }

    /// Parse settings text. Unknown keys and bad values keep their defaults.
    pub fn parse(content: &str) -> Self {
        let mut s = Self::default();
        let d = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "max_undo_steps" => s.max_undo_steps = val.parse().unwrap_or(d.max_undo_steps),
                "default_frame_width" => {
                    s.default_frame_width = parse_dimension(val).unwrap_or(d.default_frame_width)
                }
                "default_frame_height" => {
                    s.default_frame_height = parse_dimension(val).unwrap_or(d.default_frame_height)
                }
                "max_canvas_size" => {
                    s.max_canvas_size = parse_dimension(val).unwrap_or(d.max_canvas_size)
                }
                "export_columns" => {
                    s.export_columns = parse_dimension(val).unwrap_or(d.export_columns)
                }
                "rect_filled" => s.rect_filled = val == "true",
                _ => {}
            }
        }
        s
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            crate::log_warn!("Could not write settings {}: {}", path.display(), e);
        }
    }

    /// Load settings from disk (returns default if file missing or corrupt)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        let Ok(content) = std::fs::read_to_string(&path) else { return Self::default() };
        Self::parse(&content)
    }
}

/// Positive integer, or `None`.
fn parse_dimension(val: &str) -> Option<u32> {
    val.parse::<u32>().ok().filter(|v| *v > 0)
}

/// Validate width/height text from a new-canvas prompt.
///
/// Returns the parsed size, or a message suitable for showing the user.
pub fn validate_canvas_size(width: &str, height: &str, max: u32) -> Result<(u32, u32), String> {
    let w = width.trim().parse::<u32>().unwrap_or(0);
    let h = height.trim().parse::<u32>().unwrap_or(0);
    check_canvas_size(w, h, max)
}

/// Range check behind [`validate_canvas_size`] for sizes that are already numbers.
pub fn check_canvas_size(width: u32, height: u32, max: u32) -> Result<(u32, u32), String> {
    if !(1..=max).contains(&width) {
        return Err(format!("Width must be 1-{}", max));
    }
    if !(1..=max).contains(&height) {
        return Err(format!("Height must be 1-{}", max));
    }
    Ok((width, height))
}
