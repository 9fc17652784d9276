// src/core/mod.rs

pub mod arg_parser;
pub mod case_book;
pub mod config_loader;
pub mod history;
pub mod logic;
pub mod paths;
pub mod sample_data;
pub mod schemes;
pub mod storage;
pub mod timing;
