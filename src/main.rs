use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use codecmp::compression::bits::render_bits;
use codecmp::config::DEFAULT_MAX_DICT_SIZE;
use codecmp::{
    CodeWidth, Comparator, CompareConfig, CompressionReport, EncodedOutput, Error, LzwConfig,
    OverflowPolicy, Result,
};

/// Exit status when no input source was given.
const EXIT_NO_INPUT: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "codecmp")]
#[command(about = "Compare LZW and Huffman compression of the same input")]
struct Args {
    /// File to compress; `-` reads standard input.
    file: Option<PathBuf>,

    /// Compress this text instead of a file.
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Drop line terminators before compressing.
    #[arg(long)]
    join_lines: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_DICT_SIZE)]
    max_dict_size: usize,

    #[arg(long, value_enum, default_value_t = Overflow::Freeze)]
    overflow: Overflow,

    #[arg(long, value_enum, default_value_t = Width::Fixed)]
    code_width: Width,

    /// Run both codecs concurrently.
    #[arg(long)]
    parallel: bool,

    /// Print the encoded outputs and the Huffman code table.
    #[arg(long)]
    show_output: bool,

    #[arg(long, default_value = "warn")]
    log: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Overflow {
    Freeze,
    Reset,
}

impl From<Overflow> for OverflowPolicy {
    fn from(value: Overflow) -> Self {
        match value {
            Overflow::Freeze => OverflowPolicy::Freeze,
            Overflow::Reset => OverflowPolicy::Reset,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Width {
    Fixed,
    Minimal,
}

impl From<Width> for CodeWidth {
    fn from(value: Width) -> Self {
        match value {
            Width::Fixed => CodeWidth::Fixed,
            Width::Minimal => CodeWidth::Minimal,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NoInput) => {
            eprintln!("codecmp: no input provided, pass a FILE or --text");
            ExitCode::from(EXIT_NO_INPUT)
        }
        Err(err) => {
            eprintln!("codecmp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = CompareConfig {
        lzw: LzwConfig::new(
            args.max_dict_size,
            args.overflow.into(),
            args.code_width.into(),
        )?,
        parallel: args.parallel,
    };

    let mut input = load_input(args)?;
    if args.join_lines {
        if let Some(bytes) = input.as_mut() {
            join_lines(bytes);
        }
    }
    log::info!(
        "loaded {} bytes",
        input.as_ref().map_or(0, |bytes| bytes.len())
    );

    let report = Comparator::new(config).compare(input.as_deref())?;
    let mut out = std::io::stdout().lock();
    write_report(&mut out, &report, args.show_output)?;
    Ok(())
}

fn load_input(args: &Args) -> Result<Option<Vec<u8>>> {
    if let Some(text) = &args.text {
        return Ok(Some(text.clone().into_bytes()));
    }

    match &args.file {
        None => Ok(None),
        Some(path) if path.as_os_str() == "-" => {
            let mut buffer = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(Some(buffer))
        }
        Some(path) => Ok(Some(std::fs::read(path)?)),
    }
}

fn join_lines(bytes: &mut Vec<u8>) {
    bytes.retain(|&byte| byte != b'\n' && byte != b'\r');
}

fn display_symbol(symbol: u8) -> String {
    std::ascii::escape_default(symbol).to_string()
}

fn write_report<W: Write>(
    out: &mut W,
    report: &CompressionReport,
    show_output: bool,
) -> Result<()> {
    let lzw = report.lzw();
    let huffman = report.huffman();

    writeln!(out, "Original size: {} bytes", report.original_size())?;
    writeln!(out)?;
    writeln!(
        out,
        "LZW: {} codes x {} bits = {} bits ({} bytes), ratio {:.2}%",
        lzw.codes().len(),
        lzw.width(),
        lzw.size_bits(),
        lzw.size_bytes(),
        lzw.ratio() * 100.0
    )?;
    if show_output {
        writeln!(out, "Output LZW:\n{}", lzw.render())?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Huffman: {} bits ({} bytes), ratio {:.2}%",
        huffman.size_bits(),
        huffman.size_bytes(),
        huffman.ratio() * 100.0
    )?;
    if show_output {
        let codes = huffman
            .code_table()
            .iter()
            .map(|(symbol, code)| format!("{}={}", display_symbol(symbol), render_bits(code)))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "Codes: {codes}")?;
        writeln!(out, "Output Huffman:\n{}", huffman.render())?;
    }
    Ok(())
}
