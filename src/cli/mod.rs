//! Command-line argument parsing.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Export the student list to CSV and exit
    Export { path: String },
    /// Run the TUI application (default)
    RunTui,
}

/// Default output path for `--export` without an argument.
const DEFAULT_EXPORT_PATH: &str = "students_data.csv";

/// Parse command-line arguments and return the command to execute.
///
/// # Examples
///
/// ```
/// use cftrack::cli::{parse_args, CliCommand};
///
/// let args = vec!["cftrack".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1); // Skip the program name
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--export" => {
                let path = args
                    .next()
                    .filter(|next| !next.starts_with('-'))
                    .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());
                return CliCommand::Export { path };
            }
            _ => {}
        }
    }
    CliCommand::RunTui
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_args_runs_tui() {
        assert_eq!(parse(&["cftrack"]), CliCommand::RunTui);
    }

    #[test]
    fn test_version_flags() {
        assert_eq!(parse(&["cftrack", "--version"]), CliCommand::Version);
        assert_eq!(parse(&["cftrack", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_export_with_path() {
        assert_eq!(
            parse(&["cftrack", "--export", "out.csv"]),
            CliCommand::Export {
                path: "out.csv".to_string()
            }
        );
    }

    #[test]
    fn test_export_defaults_path() {
        assert_eq!(
            parse(&["cftrack", "--export"]),
            CliCommand::Export {
                path: DEFAULT_EXPORT_PATH.to_string()
            }
        );
    }

    #[test]
    fn test_unknown_args_ignored() {
        assert_eq!(parse(&["cftrack", "--verbose"]), CliCommand::RunTui);
    }
}
