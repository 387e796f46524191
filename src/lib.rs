pub mod config;
pub mod error;
pub mod pipeline;
pub mod smil;
pub mod subtitle;
pub mod time;

pub use config::Config;
pub use error::{Result, SmilError};
pub use pipeline::{convert_file, print_summary, ConvertResult, ConvertStats};
pub use smil::{LoadOptions, SmilFormat, TextDocumentCache};
pub use subtitle::{Subtitle, SubtitleEntry};
pub use time::TimeCode;
