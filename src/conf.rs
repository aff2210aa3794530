/*!
A parser for an optional INI file with the following structure:

```ini
[Codec]
; 1.0, 1.3, 1.4 or 1.5
version=1.3

[Input]
; hex or binary
format=hex
```

Both sections and all keys may be left out, defaults are used then.
*/

use ofcodec::openflow::version::Version;

use ini::ini;
use ini::Ini;

use std::error;
use std::fmt;
use std::io;
use std::str::FromStr;

const CODEC_SECTION: &str = "Codec";
const VERSION_KEY: &str = "version";

const INPUT_SECTION: &str = "Input";
const FORMAT_KEY: &str = "format";

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Ini(ini::Error),
    InvalidValue(&'static str, &'static str, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "{}", e),
            Error::Ini(ref e) => write!(f, "{}", e),
            Error::InvalidValue(s, k, ref v) => {
                write!(f, "The INI [{}] section has an invalid '{}' value: {}", s, k, v)
            }
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(ioe) => ioe,
            _ => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl error::Error for Error {
    fn description(&self) -> &str {
        "INI configuration parser error"
    }
}

trait Section {
    type S;

    fn from_ini(conf: &Ini) -> Result<Self::S, Error>;
}

/// The version the CLI writes messages in
#[derive(Debug, PartialEq)]
pub struct CodecSection {
    pub version: Version,
}

impl Default for CodecSection {
    fn default() -> Self {
        CodecSection {
            version: Version::V1_3,
        }
    }
}

impl Section for CodecSection {
    type S = CodecSection;

    fn from_ini(conf: &Ini) -> Result<Self::S, Error> {
        debug!("Reading [{}] section", CODEC_SECTION);

        let codec = match conf.section(Some(CODEC_SECTION.to_owned())) {
            Some(codec_section) => match codec_section.get(VERSION_KEY) {
                Some(version) => CodecSection {
                    version: version
                        .parse()
                        .map_err(|e| Error::InvalidValue(CODEC_SECTION, VERSION_KEY, e))?,
                },
                None => CodecSection::default(),
            },
            _ => CodecSection::default(),
        };

        debug!("Got {:?}", codec);
        Ok(codec)
    }
}

/// How the messages to decode are stored in the input file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    /// Hex digits, whitespace between them is ignored
    Hex,
    Binary,
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(format: &str) -> Result<InputFormat, Self::Err> {
        match format.trim() {
            "hex" => Ok(InputFormat::Hex),
            "binary" => Ok(InputFormat::Binary),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

impl Default for InputFormat {
    fn default() -> Self {
        InputFormat::Hex
    }
}

impl Section for InputFormat {
    type S = InputFormat;

    fn from_ini(conf: &Ini) -> Result<Self::S, Error> {
        debug!("Reading [{}] section", INPUT_SECTION);

        let format = match conf.section(Some(INPUT_SECTION.to_owned())) {
            Some(input_section) => match input_section.get(FORMAT_KEY) {
                Some(format) => InputFormat::from_str(format)
                    .map_err(|e| Error::InvalidValue(INPUT_SECTION, FORMAT_KEY, e))?,
                None => InputFormat::default(),
            },
            _ => InputFormat::default(),
        };

        debug!("Got {:?}", format);
        Ok(format)
    }
}

/// Everything the INI file configures
#[derive(Debug, Default, PartialEq)]
pub struct Config {
    pub codec: CodecSection,
    pub format: InputFormat,
}

impl Config {
    fn from_ini(conf: &Ini) -> Result<Config, Error> {
        Ok(Config {
            codec: CodecSection::from_ini(conf)?,
            format: InputFormat::from_ini(conf)?,
        })
    }
}

pub fn parse_file(path: &str) -> Result<Config, Error> {
    info!("Reading INI file {}", path);

    let conf = match Ini::load_from_file(path) {
        Ok(i) => i,
        Err(e) => {
            return Err(Error::Ini(e));
        }
    };

    Config::from_ini(&conf)
}
