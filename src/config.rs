use crate::constants::config::{QUIET, VERBOSE};
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Settings for the codec's logger.
///
/// The file format is one value per line: the log level on the first line
/// (`verbose` or `quiet`) and the log file path on the second. Missing lines
/// keep their default value. An empty log file means stderr only, which is
/// also the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    log_level: String,
    log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(QUIET.to_string(), String::new())
    }
}

impl Config {
    pub fn new(log_level: String, log_file: String) -> Self {
        Self {
            log_level,
            log_file,
        }
    }

    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }

    pub fn get_log_file(&self) -> Option<&str> {
        if self.log_file.is_empty() {
            return None;
        }
        Some(&self.log_file)
    }

    pub fn is_verbose(&self) -> bool {
        self.log_level == VERBOSE
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Config, io::Error> {
        let mut config = Config::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let value = line.trim();
            if value.is_empty() {
                continue;
            }
            match index {
                0 => config.log_level = value.to_string(),
                1 => config.log_file = value.to_string(),
                _ => break,
            }
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, io::Error> {
        let file = File::open(path)?;
        Config::from_reader(BufReader::new(file))
    }

    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Config {
        Config::from_file(path).unwrap_or_default()
    }
}
