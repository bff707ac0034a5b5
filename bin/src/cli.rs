//! Argument parsing (spec §6 "CLI"): one positional argument, the
//! listen port, defaulting to 8080 on absence or parse failure.

const DEFAULT_PORT: u16 = 8080;

pub fn parse_port(args: impl Iterator<Item = String>) -> u16 {
    match args.skip(1).next() {
        None => DEFAULT_PORT,
        Some(arg) => match arg.parse() {
            Ok(port) => port,
            Err(_) => {
                eprintln!("invalid port '{arg}', falling back to {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_argument_given() {
        assert_eq!(parse_port(vec!["fproxy".to_string()].into_iter()), DEFAULT_PORT);
    }

    #[test]
    fn parses_valid_port() {
        assert_eq!(parse_port(vec!["fproxy".to_string(), "9090".to_string()].into_iter()), 9090);
    }

    #[test]
    fn falls_back_on_non_integer_argument() {
        assert_eq!(parse_port(vec!["fproxy".to_string(), "not-a-port".to_string()].into_iter()), DEFAULT_PORT);
    }
}
