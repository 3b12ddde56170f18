//! File logging. The terminal belongs to the quiz screen, so log lines go to
//! `<data-dir>/f1-trivia.log`.

use std::io;

use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

use crate::config::Config;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l:<5} {t} - {m}{n}";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    File(#[from] io::Error),
    #[error("invalid logging configuration: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("logger already initialised: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

pub fn init(config: &Config) -> Result<(), LoggingError> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(config.log_path())?;

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(config.log_level))?;

    log4rs::init_config(log_config)?;
    log::info!("logging to {}", config.log_path().display());
    Ok(())
}
