use std::env;
use std::net::SocketAddr;
use std::process;

use getopts::Options;
use thiserror::Error;
use tlp_parser::{timezone, Tz, DEFAULT_TIMEZONE};
use tokio::time::Duration;

pub struct Args {
    pub address: SocketAddr,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub timezone: Tz,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Options(#[from] getopts::Fail),
    #[error("Provided value for option '{option}' is invalid: {reason}")]
    Invalid { option: &'static str, reason: String },
}

enum Parsed {
    Run(Args),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) for the HTTP endpoint [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of calendar query results [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached query results [Default: 3600]",
        "SECONDS",
    );
    opts.optopt(
        "z",
        "timezone",
        "Timezone event times are written in [Default: America/Vancouver]",
        "IANA_NAME",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

fn try_parse(args: Vec<String>) -> Result<Parsed, CliError> {
    let opts = opts();
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return Ok(Parsed::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(|err| CliError::Invalid {
            option: "address",
            reason: err.to_string(),
        })?;

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = matches
        .opt_get_default("cache-ttl", 3600)
        .map(Duration::from_secs)
        .map_err(|err| CliError::Invalid {
            option: "cache-ttl",
            reason: err.to_string(),
        })?;

    let timezone = match matches.opt_str("timezone") {
        Some(name) => timezone(&name).map_err(|err| CliError::Invalid {
            option: "timezone",
            reason: err.to_string(),
        })?,
        None => DEFAULT_TIMEZONE,
    };

    Ok(Parsed::Run(Args {
        address,
        enable_cache,
        cache_ttl,
        timezone,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<Args, CliError> {
        match try_parse(args.iter().map(ToString::to_string).collect())? {
            Parsed::Run(args) => Ok(args),
            Parsed::Help(_) => panic!("expected run"),
        }
    }

    #[test]
    fn defaults() {
        let args = run(&[]).unwrap();

        assert_eq!(args.address, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert!(!args.enable_cache);
        assert_eq!(args.cache_ttl, Duration::from_secs(3600));
        assert_eq!(args.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn overrides() {
        let args = run(&["-a", "0.0.0.0:3000", "-c", "-t", "60", "-z", "America/Toronto"]).unwrap();

        assert_eq!(args.address, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert!(args.enable_cache);
        assert_eq!(args.cache_ttl, Duration::from_secs(60));
        assert_eq!(args.timezone, chrono_tz::America::Toronto);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            run(&["--cache-ttl", "soon"]),
            Err(CliError::Invalid { option: "cache-ttl", .. })
        ));
        assert!(matches!(
            run(&["--timezone", "Nowhere/Special"]),
            Err(CliError::Invalid { option: "timezone", .. })
        ));
    }

    #[test]
    fn help_short_circuits() {
        assert!(matches!(
            try_parse(vec!["--help".into(), "--cache-ttl".into(), "soon".into()]),
            Ok(Parsed::Help(_))
        ));
    }
}
