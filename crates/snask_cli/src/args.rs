#[derive(Debug)]
pub(crate) struct CliArgs {
    pub cmd: String,
    pub positional: Vec<String>,
}

pub(crate) fn usage() -> &'static str {
    "Usage: snask <serve <routes.json> [port] | json fmt <file> | json get <file> <path>>"
}

pub(crate) fn parse_args() -> Result<CliArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

pub(crate) fn parse_args_from<I: IntoIterator<Item = String>>(argv: I) -> Result<CliArgs, String> {
    let mut argv = argv.into_iter();
    let cmd = argv.next().ok_or_else(|| usage().to_string())?;
    let mut positional: Vec<String> = Vec::new();
    for a in argv {
        if a.starts_with("--") {
            return Err(format!("Unknown option: {a}"));
        }
        positional.push(a);
    }
    Ok(CliArgs { cmd, positional })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Result<CliArgs, String> {
        parse_args_from(v.iter().map(|s| s.to_string()))
    }

    #[test]
    fn splits_command_and_positionals() {
        let a = args(&["json", "get", "f.json", "a.b"]).unwrap();
        assert_eq!(a.cmd, "json");
        assert_eq!(a.positional, ["get", "f.json", "a.b"]);
    }

    #[test]
    fn rejects_empty_and_flags() {
        assert!(args(&[]).unwrap_err().starts_with("Usage: snask"));
        assert_eq!(args(&["serve", "--fast"]).unwrap_err(), "Unknown option: --fast");
    }
}
