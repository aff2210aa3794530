/*!
An inspection tool for OpenFlow messages.

`decode` reads a file with one or more concatenated messages, cuts them at
their header lengths and prints every message it can decode. `hello` writes
a Hello message that offers the given versions.

```sh
$ ofcodec hello 1.0,1.3
```
*/

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

mod conf;

use conf::{Config, InputFormat};

use ofcodec::openflow::messages::{Hello, Message};
use ofcodec::openflow::version::Version;
use ofcodec::openflow::{frame_length, Codec, HEADER_LEN};

use clap::{ArgMatches, SubCommand};

use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::process::exit;

/// Parses hex digits, ignoring whitespace and an optional `0x` per token
fn parse_hex(text: &str) -> io::Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .split_whitespace()
        .map(|t| t.trim_start_matches("0x"))
        .flat_map(|t| t.bytes())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "odd number of hex digits"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let s = String::from_utf8_lossy(pair);
            u8::from_str_radix(&s, 16)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("'{}': {}", s, e)))
        })
        .collect()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn read_input(path: &str, format: InputFormat) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    match format {
        InputFormat::Hex => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            parse_hex(&text)
        }
        InputFormat::Binary => {
            let mut bytes = vec![];
            file.read_to_end(&mut bytes)?;
            Ok(bytes)
        }
    }
}

/// Decodes all messages in the file and prints them.
/// Undecodable messages are logged and skipped, a broken frame ends the run.
fn decode(path: &str, config: &Config) -> io::Result<()> {
    let input = read_input(path, config.format)?;
    let codec = Codec::with_defaults();
    let mut rest = &input[..];
    let mut count = 0;
    while !rest.is_empty() {
        let len = match frame_length(rest) {
            Some(len) if len >= HEADER_LEN && len <= rest.len() => len,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("truncated message after {} messages", count),
                ));
            }
        };
        let (frame, tail) = rest.split_at(len);
        match codec.decode(frame) {
            Ok(msg) => println!("{:#?}", msg),
            Err(ref e) if e.is_recoverable() => error!("dropping message: {}", e),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
        count += 1;
        rest = tail;
    }
    info!("Read {} messages from {}", count, path);
    Ok(())
}

/// Prints a Hello offering the comma separated versions
fn hello(versions: &str, config: &Config) -> io::Result<()> {
    let versions = versions
        .split(',')
        .map(|v| v.parse::<Version>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let message = Message::Hello(Hello::with_versions(&versions));
    let bytes = Codec::with_defaults()
        .to_bytes(config.codec.version, rand::random(), &message)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    println!("{}", to_hex(&bytes));
    Ok(())
}

fn init_logging(matches: &ArgMatches) {
    let log_lvl = match matches.occurrences_of("v") {
        0 => log::Level::Error,
        1 => log::Level::Warn,
        2 => log::Level::Info,
        3 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    #[cfg(unix)]
    {
        if matches.is_present("syslog") {
            let app_name = Some(crate_name!());
            if let Err(e) = syslog::init(syslog::Facility::LOG_USER, log_lvl.to_level_filter(), app_name) {
                eprintln!("error on logging initialization: {}", e);
            }
            log_panics::init();
            return;
        }
    }
    if let Err(e) = simple_logger::init_with_level(log_lvl) {
        eprintln!("error on logging initialization: {}", e);
    }
}

/// Reads command line arguments and calls the corresponding functions.
fn handle_cli_args() -> io::Result<()> {
    #[cfg(unix)]
    let unix_opts = "-s, --syslog      'Logs via syslog'
        ";
    #[cfg(not(unix))]
    let unix_opts = "";

    let usage = &format!(
        "{}-v...          'Repeat to set the level of verbosity'
        -c, --conf [ini]  'The INI configuration file'",
        unix_opts
    );
    let matches = app_from_crate!()
        .args_from_usage(usage)
        .subcommand(
            SubCommand::with_name("decode")
                .about("Decodes the OpenFlow messages in a file")
                .arg_from_usage("<file> 'The file with concatenated messages'"),
        )
        .subcommand(
            SubCommand::with_name("hello")
                .about("Prints a Hello message offering some versions")
                .arg_from_usage("<versions> 'Comma separated versions, e.g. 1.0,1.3'"),
        )
        .get_matches();

    init_logging(&matches);

    let config = match matches.value_of("conf") {
        Some(path) => conf::parse_file(path)?,
        None => Config::default(),
    };

    match matches.subcommand() {
        ("decode", Some(sub)) => decode(sub.value_of("file").unwrap_or_default(), &config),
        ("hello", Some(sub)) => hello(sub.value_of("versions").unwrap_or_default(), &config),
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput, matches.usage())),
    }
}

/// Entry function with top level error handling.
fn main() {
    if let Err(e) = handle_cli_args() {
        error!("{}", e);
        exit(1);
    }
}
