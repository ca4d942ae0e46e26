//! Command-line front-end: parse a Markdown file into an HTML document
//! plus a companion stylesheet.

use clap::error::ErrorKind;
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Markdown to HTML converter built around an explicit tokenizer state
/// machine.
#[derive(Parser, Debug)]
#[command(name = "mdforge")]
struct Cli {
    /// Path to the input file in Markdown format
    #[arg(short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to the output HTML file [default: output.html]
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to the stylesheet created alongside the HTML [default: styles.css]
    #[arg(short = 's', value_name = "FILE")]
    styles: Option<PathBuf>,

    /// Log verbosity: 1 errors only, 2 adds warnings, 3 adds info
    #[arg(
        short = 'v',
        value_name = "LEVEL",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=3)
    )]
    verbosity: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if err.kind() == ErrorKind::DisplayHelp || err.kind() == ErrorKind::DisplayVersion =>
        {
            let _ = err.print();
            return;
        }
        Err(_) => {
            eprintln!("Arguments provided are not formatted correctly");
            return;
        }
    };

    let Some(input) = cli.input else {
        eprintln!("No input file has been provided");
        return;
    };

    let output = cli.output.unwrap_or_else(|| {
        println!("Output file not specified. Defaulting to output.html");
        PathBuf::from("output.html")
    });
    let styles = cli.styles.unwrap_or_else(|| {
        println!("Styles file not specified. Defaulting to styles.css");
        PathBuf::from("styles.css")
    });

    init_logging(cli.verbosity);

    let source = match fs::read_to_string(&input) {
        Ok(source) => source,
        Err(_) => {
            eprintln!(
                "Unable to open the input file. Make sure it exists and is written correctly"
            );
            return;
        }
    };

    // create both output files before parsing so a bad path fails early
    let (mut output_file, mut styles_file) = match (File::create(&output), File::create(&styles)) {
        (Ok(output_file), Ok(styles_file)) => (output_file, styles_file),
        _ => {
            eprintln!(
                "Unable to open the output file. Make sure it exists and is written correctly"
            );
            return;
        }
    };

    log::info!(target: "mdforge", "starting parsing");
    match mdforge::convert(&source, &styles.to_string_lossy()) {
        Ok(document) => {
            if output_file.write_all(document.html.as_bytes()).is_err()
                || styles_file.write_all(document.stylesheet.as_bytes()).is_err()
            {
                eprintln!(
                    "Unable to open the output file. Make sure it exists and is written correctly"
                );
                return;
            }
            log::info!(target: "mdforge", "html building has finished successfully");
            println!("Your HTML document has been built successfully!");
        }
        Err(err) => {
            eprintln!("Error during document parsing / html construction: {}", err);
        }
    }
}

/// Logger appending to `logs.log`, gated by the `-v` level.
struct FileLogger {
    sink: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}

fn init_logging(verbosity: u8) {
    if verbosity == 0 {
        return;
    }
    let file = match OpenOptions::new().create(true).append(true).open("logs.log") {
        Ok(file) => file,
        Err(_) => return,
    };
    let level = match verbosity {
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        _ => LevelFilter::Info,
    };
    let logger = FileLogger {
        sink: Mutex::new(file),
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
