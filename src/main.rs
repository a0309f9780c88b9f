//! Hotkey demo (default binary).
//!
//! Binds a few keys to slow jobs, a help listing, and quit. Jobs run
//! concurrently; press several keys quickly to see their output interleave.

use std::io::{self, Write};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use tui_keycmd::core::{parse_timeout_ms, DispatchConfig, Dispatcher};
use tui_keycmd::input::TerminalKeySource;

const USAGE: &str = "\
usage: tui-keycmd [--debug|-d] [--timeout-ms <ms>]

  -d, --debug          log dispatcher events to stderr
      --timeout-ms MS  key read timeout (default 200, env KEYCMD_INKEY_TIMEOUT_MS)
  -h, --help           show this help";

#[derive(Debug, Default, PartialEq, Eq)]
struct DemoArgs {
    debug: bool,
    timeout: Option<Duration>,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<DemoArgs> {
    let mut parsed = DemoArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--debug" | "-d" => parsed.debug = true,
            "--help" | "-h" => parsed.help = true,
            "--timeout-ms" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --timeout-ms"))?;
                parsed.timeout = Some(parse_timeout_ms("--timeout-ms", v)?);
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_thread_names(true)
        .init();
}

/// Print a line that renders correctly in raw mode.
fn say(line: &str) {
    let mut out = io::stdout().lock();
    let _ = write!(out, "{line}\r\n");
    let _ = out.flush();
}

fn job(duration: Duration) -> impl Fn(&str) + Send + Sync + 'static {
    move |sym: &str| {
        say(&format!("{sym}: start"));
        thread::sleep(duration);
        say(&format!("{sym}: end"));
    }
}

fn register(dispatcher: &Arc<Dispatcher>) {
    dispatcher.add("aAあ", job(Duration::from_secs(2)), "2 second job");
    dispatcher.add(["b", "B", "い"], job(Duration::from_secs(1)), "1 second job");

    // Weak: the registry lives inside the dispatcher.
    let weak: Weak<Dispatcher> = Arc::downgrade(dispatcher);
    dispatcher.add(
        "hH?",
        move |_: &str| {
            if let Some(dispatcher) = weak.upgrade() {
                dispatcher.list_descriptions(true);
            }
        },
        "command help",
    );

    let stop = dispatcher.stop_action();
    dispatcher.add(
        ["q", "Q", "KEY_ESCAPE", "\u{4}", "\u{3}"],
        move |sym: &str| {
            say(&format!("{sym:?}: quit!"));
            stop(sym);
        },
        "quit",
    );
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    init_tracing(args.debug);

    let mut config = DispatchConfig::from_env()?;
    if let Some(timeout) = args.timeout {
        config = config.with_inkey_timeout(timeout);
    }

    tracing::debug!(?config, "starting dispatcher");
    let dispatcher = Arc::new(Dispatcher::new(TerminalKeySource::new(), config));
    register(&dispatcher);

    dispatcher.start()?;
    say("press h for help, q to quit");

    while !dispatcher.wait_stopped(Duration::from_secs(1)) {}

    // Surfaces a terminal read error, if that is what ended the loop.
    dispatcher.stop()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let parsed = parse_args(&args(&["-d", "--timeout-ms", "50"])).unwrap();
        assert!(parsed.debug);
        assert_eq!(parsed.timeout, Some(Duration::from_millis(50)));
        assert_eq!(parse_args(&[]).unwrap(), DemoArgs::default());
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(&args(&["--timeout-ms"])).is_err());
        assert!(parse_args(&args(&["--timeout-ms", "0"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }
}
