use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use sumire_core::{Document, ParseError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut opts = getopts::Options::new();
    opts.optopt("h", "html", "HTML document", "FILENAME");
    opts.optopt("c", "css", "CSS stylesheet", "FILENAME");
    opts.optopt("o", "output", "Output file (defaults to stdout)", "FILENAME");
    opts.optflag("v", "verbose", "Print debug logs");
    opts.optflag("", "help", "Print this help menu");

    let program = args.first().map(String::as_str).unwrap_or("sumire-native");
    let usage = opts.usage(&format!("Usage: {} [options]", program));
    let matches = match opts.parse(args.iter().skip(1)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}\n\n{}", e, usage);
            process::exit(2);
        }
    };
    if matches.opt_present("help") {
        print!("{}", usage);
        return;
    }

    init_logging(matches.opt_present("v"));

    let str_arg = |flag: &str, default: &str| -> String { matches.opt_str(flag).unwrap_or_else(|| default.to_string()) };
    let html = PathBuf::from(str_arg("h", "demos/test.html"));
    let css = PathBuf::from(str_arg("c", "demos/test.css"));
    let output = matches.opt_str("o").map(PathBuf::from);

    if let Err(e) = run(&html, &css, output.as_deref()) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

// RUST_LOG wins over --verbose when it is set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(html: &Path, css: &Path, output: Option<&Path>) -> Result<(), Error> {
    let document = Document::parse(&read_source(html)?, &read_source(css)?)?;
    let dump = document.style().to_string();

    match output {
        Some(path) => {
            let write_err = |err| Error::Write { path: path.to_path_buf(), source: err };
            let mut file = File::create(path).map_err(write_err)?;
            file.write_all(dump.as_bytes()).map_err(write_err)?;
            tracing::info!("saved styled tree to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let path = PathBuf::from("<stdout>");
            stdout
                .lock()
                .write_all(dump.as_bytes())
                .map_err(|err| Error::Write { path, source: err })?;
        }
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String, Error> {
    let mut source = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut source))
        .map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;
    tracing::debug!("read {} ({} bytes)", path.display(), source.len());
    Ok(source)
}
