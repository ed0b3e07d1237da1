use crate::config::Config;
use crate::constants::config::VERBOSE;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOGGER: OnceLock<Logger> = OnceLock::new();

struct Logger {
    log_file: OnceLock<Option<Mutex<File>>>,
    config: Config,
}

impl Logger {
    fn new(config: Config) -> Logger {
        Logger {
            log_file: OnceLock::new(),
            config,
        }
    }

    fn open_log_file(path: &str) -> io::Result<File> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    // Opened on the first line written; stays closed when no file is configured.
    fn get_log_file(&self) -> Option<&Mutex<File>> {
        self.log_file
            .get_or_init(|| {
                let path = self.config.get_log_file()?;
                match Self::open_log_file(path) {
                    Ok(file) => Some(Mutex::new(file)),
                    Err(error) => {
                        eprintln!("Failed to open log file {}: {}", path, error);
                        None
                    }
                }
            })
            .as_ref()
    }

    fn write_line(&self, message: &str) {
        let line = format!("{} - {}\n", Local::now(), message);
        eprint!("{}", line);

        if let Some(file) = self.get_log_file() {
            if let Err(error) = append_line(file, &line) {
                eprintln!("Failed to write to log file: {}", error);
            }
        }
    }

    fn log_verbose(&self, message: &str) {
        if !self.config.is_verbose() {
            return;
        }
        self.write_line(message);
    }

    fn log_quiet(&self, message: &str) {
        self.write_line(message);
    }
}

fn append_line(file: &Mutex<File>, line: &str) -> io::Result<()> {
    let mut file = file
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock is poisoned"))?;
    file.write_all(line.as_bytes())
}

// Without an explicit `init` the logger is quiet and writes to stderr only.
fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Config::default()))
}

/// Installs `config` for the process-wide logger, e.g.
/// `logger::init(Config::from_file(path)?)`. Returns false if the logger was
/// already created, in which case the old settings stay.
pub fn init(config: Config) -> bool {
    LOGGER.set(Logger::new(config)).is_ok()
}

/// Returns true when `VERBOSE` messages will be written.
pub fn is_verbose() -> bool {
    get_logger().config.is_verbose()
}

/// Logs a message to stderr and, if one is configured, to the log file.
/// `VERBOSE` messages are dropped unless the configured level is `VERBOSE`.
pub fn log(message: &str, mode: &str) {
    let logger = get_logger();

    match mode {
        VERBOSE => logger.log_verbose(message),
        _ => logger.log_quiet(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use std::env;

    #[test]
    fn test_init_after_first_use_keeps_settings() {
        let verbose = is_verbose();
        assert!(!init(Config::new(VERBOSE.to_string(), String::new())));
        assert_eq!(is_verbose(), verbose);
    }

    #[test]
    fn test_failed_decode_without_init_touches_no_file() {
        let mut header = Header::default();
        assert!(!header.from_data(&[0u8; 10], false));

        assert!(!is_verbose());
        assert!(get_logger().config.get_log_file().is_none());
        assert!(get_logger().log_file.get().map_or(true, Option::is_none));
    }

    #[test]
    fn test_append_line_reports_write_errors() {
        let path = env::temp_dir().join(format!("header_codec_ro_{}.log", std::process::id()));
        fs::write(&path, "").unwrap();
        let read_only = Mutex::new(File::open(&path).unwrap());

        assert!(append_line(&read_only, "line\n").is_err());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_line_writes_to_file() {
        let path = env::temp_dir().join(format!("header_codec_rw_{}.log", std::process::id()));
        let file = Mutex::new(Logger::open_log_file(path.to_str().unwrap()).unwrap());

        append_line(&file, "first\n").unwrap();
        append_line(&file, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        fs::remove_file(&path).unwrap();
    }
}
