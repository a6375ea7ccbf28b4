// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, warn};

use crate::analysis::analyze;
use crate::config::{load_config, LoopmapConfig};
use crate::errors::LoopmapError;
use crate::fonts::register_display_font;
use crate::heatmap::{write_png, write_svg, CombinedMatrix, FigureStyle, OutputFormats};
use crate::seq::{file::sequences, read_seq_source, InputFormat, SeqSource};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
pub struct Cli {
    /// Sequence file (xlsx/xlsm/ods workbook, csv/tsv, or FastA)
    pub input: PathBuf,

    /// Input format
    #[arg(short, long = "format",
        help = "Input format [xlsx|csv|tsv|fasta] (or just x|c|t|f); default: from file extension",
        hide_possible_values = true,
    )]
    pub format: Option<InputFormat>,

    /// Worksheet holding the sequences (workbooks only)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Header of the sequence column (workbooks and csv/tsv)
    #[arg(short, long)]
    pub column: Option<String>,

    /// Largest distance between consecutive variable positions of one loop
    #[arg(short, long)]
    pub gap: Option<usize>,

    /// Indices of the two position groups to plot, e.g. 0,1
    #[arg(short, long, value_delimiter = ',')]
    pub loops: Option<Vec<usize>>,

    /// Output file stem; .png and .svg are appended
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write the PNG
    #[arg(long = "no-png")]
    pub no_png: bool,

    /// Do not write the SVG
    #[arg(long = "no-svg")]
    pub no_svg: bool,

    /// Resolution of the figure [dots per inch]
    #[arg(long)]
    pub dpi: Option<u32>,

    /// JSON configuration file (default: ~/.loopmapconfig or ./.loopmapconfig)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Info mode: report groups and loops, draw nothing
    #[arg(short, long)]
    pub info: bool,

    /// Also dump loops and prevalence matrices to this JSON file
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl Cli {
    // Command-line values win over the config file.
    pub fn apply_to(&self, config: &mut LoopmapConfig) {
        if let Some(sheet) = &self.sheet {
            config.sheet = sheet.clone();
        }
        if let Some(column) = &self.column {
            config.column = column.clone();
        }
        if let Some(gap) = self.gap {
            config.gap_threshold = gap;
        }
        if let Some(loops) = &self.loops {
            config.loops = loops.clone();
        }
        if let Some(output) = &self.output {
            config.output_stem = output.clone();
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
    }

    pub fn output_formats(&self) -> OutputFormats {
        let mut formats = OutputFormats::all();
        if self.no_png {
            formats.remove(OutputFormats::PNG);
        }
        if self.no_svg {
            formats.remove(OutputFormats::SVG);
        }
        formats
    }
}

fn input_format(cli: &Cli) -> Result<InputFormat, LoopmapError> {
    match cli.format {
        Some(fmt) => Ok(fmt),
        None => InputFormat::from_path(&cli.input).ok_or_else(|| {
            LoopmapError::Format(format!(
                "cannot guess the format of {}; use --format",
                cli.input.display()
            ))
        }),
    }
}

pub fn load_sequences(
    path: &Path,
    format: InputFormat,
    config: &LoopmapConfig,
) -> Result<Vec<String>, LoopmapError> {
    let source = SeqSource {
        path,
        format,
        sheet: &config.sheet,
        column: &config.column,
    };
    sequences(read_seq_source(&source)?)
}

pub fn run() -> Result<(), LoopmapError> {
    let cli = Cli::parse();
    run_cli(&cli)
}

pub fn run_cli(cli: &Cli) -> Result<(), LoopmapError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let format = input_format(cli)?;
    let seqs = load_sequences(&cli.input, format, &config)?;
    let analysis = analyze(&seqs, &config)?;

    println!("{}", analysis.loop_summary());

    if let Some(json_path) = &cli.json {
        analysis.write_json(json_path)?;
        info!("Prevalence tables written to {}", json_path.display());
    }

    if cli.info {
        println!();
        print!("{}", analysis.info_summary());
        return Ok(());
    }

    let formats = cli.output_formats();
    if formats.is_empty() {
        warn!("Both outputs disabled, nothing to draw");
        return Ok(());
    }

    register_display_font(&config)?;
    let style = FigureStyle::from_config(&config)?;
    let combined = CombinedMatrix::new(&analysis.prevalence[0], &analysis.prevalence[1]);
    info!(
        "Figure {}x{} px, combined matrix {:?}",
        style.canvas_size().0,
        style.canvas_size().1,
        combined.shape()
    );

    println!();
    if formats.contains(OutputFormats::PNG) {
        let path = config.png_path();
        write_png(&path, &combined, &style)?;
        println!("Compact heatmap saved to: {}", path.display());
    }
    if formats.contains(OutputFormats::SVG) {
        let path = config.svg_path();
        write_svg(&path, &combined, &style)?;
        println!("Vector heatmap saved to: {}", path.display());
    }
    println!();
    println!("Done!");
    Ok(())
}
