use yansi::Paint;

/// Color palette for status output
pub struct ColorPalette {
    pub muted: (u8, u8, u8),   // unchanged notes, dates
    pub changed: (u8, u8, u8), // rewritten notes
    pub header: (u8, u8, u8),  // section labels
    pub command: (u8, u8, u8), // commit script
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        muted: (108, 112, 134),    // Gray
        changed: (166, 227, 161),  // Green
        header: (148, 226, 213),   // Teal
        command: (137, 180, 250),  // Blue
    };
}

/// Styling switch carried through the CLI's printing paths
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    fn paint(&self, text: &str, rgb: (u8, u8, u8), bold: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let (r, g, b) = rgb;
        let painted = Paint::rgb(text, r, g, b);
        if bold { painted.bold().to_string() } else { painted.to_string() }
    }

    pub fn format_header(&self, text: &str) -> String {
        self.paint(text, self.palette.header, true)
    }

    pub fn format_unchanged(&self, name: &str) -> String {
        format!("no change file: {}", self.paint(name, self.palette.muted, false))
    }

    pub fn format_changed(&self, name: &str, dry_run: bool) -> String {
        let verb = if dry_run { "would update" } else { "updated" };
        format!("{verb} {}", self.paint(name, self.palette.changed, true))
    }

    pub fn format_date(&self, date: &str) -> String {
        self.paint(date, self.palette.muted, false)
    }

    pub fn format_script(&self, script: &str) -> String {
        self.paint(script.trim_end(), self.palette.command, false)
    }
}
