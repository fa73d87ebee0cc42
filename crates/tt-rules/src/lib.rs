//! TabTally Filter List Converter
//!
//! Converts ABP/EasyList style filter lists into the browser's declarative
//! ruleset JSON. The extension ships the output as its static ruleset when
//! the host only offers declarative blocking.

pub mod parser;
pub mod dnr;

pub use dnr::{convert_file, convert_filter_list, rules_to_json, ConvertError, ConvertStats, DeclarativeRule};
pub use parser::{parse_filter_line, FilterAction, ParsedFilter};
