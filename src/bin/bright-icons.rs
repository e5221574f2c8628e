use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bright_icons_renderer::{
    Clipboard, DirectoryDownloads, EditorState, ExportFormat, ExportOptions, Exporter,
    MemoryBlobStore, foreground_from_path,
};
use clap::Parser;
use futures::executor::block_on;
use log::info;

/// bright-icons: Compose an app icon from an editor state and export it
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the editor state JSON. Defaults are used when omitted
    #[clap(short, long)]
    pub state: Option<PathBuf>,

    /// SVG, PNG or JPEG file to use as the foreground
    #[clap(short, long)]
    pub foreground: Option<PathBuf>,

    /// Foreground tint color, e.g. "#ffffff"
    #[clap(short, long)]
    pub tint: Option<String>,

    /// Path to export options JSON
    #[clap(long)]
    pub options: Option<PathBuf>,

    /// Output format. May be repeated
    #[clap(long = "format", value_enum, default_value = "svg")]
    pub formats: Vec<ExportFormat>,

    /// Directory the exported files are written to
    #[clap(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Print the SVG markup to stdout as well
    #[clap(long)]
    pub copy: bool,
}

/// Clipboard stand-in that prints to stdout.
struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{text}").map_err(|err| err.to_string())
    }
}

fn load_state(args: &Args) -> Result<EditorState> {
    let mut state = match &args.state {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read state file {}", path.display()))?;
            EditorState::from_json(&json)
                .with_context(|| format!("failed to parse state file {}", path.display()))?
        }
        None => EditorState::new(),
    };

    if let Some(path) = &args.foreground {
        let foreground = foreground_from_path(path)
            .with_context(|| format!("failed to load foreground {}", path.display()))?;
        state = state.with_foreground(foreground);
    }
    if let Some(tint) = &args.tint {
        state = state.with_tint(tint.as_str());
    }

    state.validate()?;
    Ok(state)
}

fn load_options(args: &Args) -> Result<ExportOptions> {
    let Some(path) = &args.options else {
        return Ok(ExportOptions::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    ExportOptions::from_json(&json)
        .with_context(|| format!("failed to parse options file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let state = load_state(&args)?;
    let options = load_options(&args)?;

    let blobs = MemoryBlobStore::new();
    let clipboard = StdoutClipboard;
    let downloads = DirectoryDownloads::new(&args.out);
    let exporter = Exporter::new(&blobs, &clipboard, &downloads).with_options(options);

    if args.copy {
        exporter.copy_svg(&state)?;
    }

    for format in &args.formats {
        let artifact = block_on(exporter.export(&state, *format))
            .with_context(|| format!("{format:?} export failed"))?;
        info!(
            "wrote {}",
            downloads.dir().join(&artifact.file_name).display()
        );
    }

    Ok(())
}
