// src/utils/error.rs
#![allow(dead_code)]
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Workbook decode error: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("No worksheets found in {0}")]
    NoSheets(String),

    #[error("Unsupported input {0}: expected a directory or a .zip archive")]
    UnsupportedInput(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Grid contains no rows")]
    EmptyGrid,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create output sheet: {0}")]
    Sheet(String),

    #[error("Workbook write error: {0}")]
    Workbook(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet intake failed: {0}")]
    Sheet(#[from] SheetError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
