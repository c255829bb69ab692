//! Command-line argument definitions

use clap::Args;

/// Arguments for the videos command
#[derive(Args, Debug)]
pub struct VideosArgs {
    /// Folder under the videos root
    pub folder: String,
}

/// Arguments for the cuts command
#[derive(Args, Debug)]
pub struct CutsArgs {
    /// Dated folder (yyyy-MM-dd); lists the dated folders when omitted
    pub date: Option<String>,
}

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    /// Folder under the videos root
    pub folder: String,

    /// Source video file name
    pub file: String,

    /// Start offset (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub start: String,

    /// Length of the cut (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub duration: String,

    /// Do not print live progress
    #[arg(long)]
    pub quiet: bool,
}

/// Arguments for the resource command
#[derive(Args, Debug)]
pub struct ResourceArgs {
    /// Source folder, or dated folder with --cut
    pub folder: String,

    /// Video file name
    pub file: String,

    /// Look in the cuts root instead of the videos root
    #[arg(long)]
    pub cut: bool,

    /// Byte range to copy, as START-END (inclusive)
    #[arg(long, value_parser = parse_range, requires = "output")]
    pub range: Option<(u64, u64)>,

    /// Copy the video (or the requested range) to this file
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

/// Parse `START-END` into an inclusive byte range
pub fn parse_range(value: &str) -> Result<(u64, u64), String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{}'", value))?;
    let start = start
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid range start '{}': {}", start, e))?;
    let end = end
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid range end '{}': {}", end, e))?;
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0-99").unwrap(), (0, 99));
        assert_eq!(parse_range(" 5 - 7 ").unwrap(), (5, 7));
        assert!(parse_range("5").is_err());
        assert!(parse_range("a-7").is_err());
    }
}
