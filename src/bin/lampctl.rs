//! `lampctl [-c CONFIG] ACTION...`
//!
//! Drive a Lamp F from the command line, e.g.
//! `lampctl -c lamp.yaml scene indirect sleep 5000 color f080f0`.

use std::process;
#[cfg(feature = "btleplug")]
use std::time::Duration;

use argh::FromArgs;
use tracing::{error, info, Level};

use lampf_ble::config::{self, Root, Transport};
use lampf_ble::protocol::{hex, Command};
use lampf_ble::script::{self, Action};
use lampf_ble::transport::{GattTransport, MemoryTransport};
use lampf_ble::{Error, LampF, Result};

/// Drive a Luke Roberts Lamp F over Bluetooth LE.
#[derive(FromArgs)]
struct Args {
    /// configuration file, YAML or JSON (default: ./config.yaml)
    #[argh(option, short = 'c', default = "String::from(\"./config.yaml\")")]
    config: String,
    /// enable debug logging
    #[argh(switch, short = 'v')]
    debug: bool,
    /// enable trace logging
    #[argh(switch, short = 'V')]
    trace: bool,
    /// actions to run, e.g. `scene indirect color f080f0 sleep 5000`
    #[argh(positional)]
    actions: Vec<String>,
}

fn main() {
    let args: Args = argh::from_env();

    let level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    if let Err(err) = run(&args) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config_path = &args.config;
    let config_root = if config_path.ends_with(".json") {
        config::read_config_json(config_path)?
    } else {
        config::read_config_yaml(config_path)?
    };

    let actions = script::parse_script(&args.actions)?;
    if actions.is_empty() {
        return Err(Error::InvalidArgument("no actions given".to_string()));
    }

    match config_root.transport {
        Transport::DryRun => {
            let transport = MemoryTransport::new();
            let recorder = transport.clone();
            drive(&config_root, transport, &actions)?;

            for packet in recorder.writes() {
                match Command::decode(&packet) {
                    Ok(command) => info!(packet = %hex(&packet), "{}", command),
                    Err(err) => error!(packet = %hex(&packet), "undecodable packet: {}", err),
                }
            }
            Ok(())
        }
        #[cfg(feature = "btleplug")]
        Transport::Btleplug {
            adapter,
            scan_timeout_ms,
        } => {
            let transport = lampf_ble::transport::BtleTransport::new(
                adapter,
                Duration::from_millis(scan_timeout_ms),
            )
            .map_err(|source| Error::Connection {
                address: config_root.lamp.address,
                source,
            })?;
            drive(&config_root, transport, &actions)
        }
        #[cfg(not(feature = "btleplug"))]
        Transport::Btleplug { .. } => Err(Error::InvalidConfig(
            "lampctl was built without the btleplug feature; use a dryRun transport".to_string(),
        )),
    }
}

fn drive<T: GattTransport>(config_root: &Root, transport: T, actions: &[Action]) -> Result<()> {
    info!("{} @ {}", config_root.name(), config_root.lamp.address);

    let mut lamp: LampF<T> =
        LampF::new(config_root.identity(), transport).with_state(config_root.assumed_state());
    let mut session = lamp.session()?;
    script::run(&mut *session, actions)?;
    info!(state = %session.state(), "done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["lampctl"], args).unwrap()
    }

    #[test]
    fn config_defaults_to_working_directory() {
        let args = parse(&["scene", "indirect"]);
        assert_eq!(args.config, "./config.yaml");
        assert_eq!(args.actions, vec!["scene", "indirect"]);
        assert!(!args.debug && !args.trace);
    }

    #[test]
    fn config_path_needs_no_known_extension() {
        let args = parse(&["-v", "-c", "./lamp.conf", "scene", "indirect"]);
        assert_eq!(args.config, "./lamp.conf");
        assert!(args.debug);
        assert_eq!(
            script::parse_script(&args.actions).unwrap(),
            vec![Action::Scene(lampf_ble::protocol::Scene::Indirect)]
        );
    }

    #[test]
    fn help_is_available() {
        let early_exit = Args::from_args(&["lampctl"], &["--help"]).err().unwrap();
        assert!(early_exit.output.contains("--config"));
        assert!(early_exit.status.is_ok());
    }
}
