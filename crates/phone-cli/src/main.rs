use std::env;
use std::fs;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use phone_core::config::ShellConfig;
use phone_core::registry::AppRegistry;
use phone_core::state::PhoneState;
use phone_exec::client::RemoteDataClient;
use phone_exec::executor::EffectExecutor;
use tracing_subscriber::EnvFilter;

mod ui;

const LOG_ENV: &str = "PHONE_LOG";

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1).peekable();
    let command = match args.peek().map(String::as_str) {
        None => "run".to_string(),
        Some(flag) if flag.starts_with("--") && !matches!(flag, "--help" | "--version") => {
            "run".to_string()
        }
        Some(_) => args.next().unwrap_or_default(),
    };

    match command.as_str() {
        "--help" | "-h" | "help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("phone {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "run" => {
            let options = parse_options(args.collect())?;
            let config = load_config(&options)?;
            init_logging(&config)?;
            let executor = EffectExecutor::new(RemoteDataClient::from_config(&config.backend)?);
            tracing::info!(
                backend = config.backend.url.as_str(),
                offline = config.backend.offline,
                "starting phone shell"
            );
            ui::run(PhoneState::new(config), executor)
        }
        "apps" => {
            print_apps();
            Ok(())
        }
        "probe" => {
            let options = parse_options(args.collect())?;
            let config = load_config(&options)?;
            probe(&config)
        }
        _ => {
            print_help();
            Err(format!("unknown command: {command}").into())
        }
    }
}

#[derive(Debug, Default)]
struct Options {
    backend: Option<String>,
    offline: bool,
    config: Option<PathBuf>,
}

fn parse_options(args: Vec<String>) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--backend" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--backend requires a URL".into());
                };
                options.backend = Some(value.clone());
                i += 2;
            }
            "--config" => {
                let Some(value) = args.get(i + 1) else {
                    return Err("--config requires a path".into());
                };
                options.config = Some(PathBuf::from(value));
                i += 2;
            }
            "--offline" => {
                options.offline = true;
                i += 1;
            }
            other => {
                return Err(format!("unsupported argument: {other}").into());
            }
        }
    }
    Ok(options)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("phone").join("config.toml"))
}

fn load_config(options: &Options) -> Result<ShellConfig, Box<dyn std::error::Error>> {
    let path = options.config.clone().or_else(default_config_path);
    let config = match path {
        Some(path) => ShellConfig::load(&path)?,
        None => ShellConfig::default(),
    };
    Ok(config
        .with_backend_url(options.backend.clone())
        .with_offline(options.offline))
}

/// Logs go to a file so the terminal surface stays clean.
fn init_logging(config: &ShellConfig) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("phone");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("phone.log"))?;

    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log.filter)?,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn print_apps() {
    for app in AppRegistry::list() {
        let opens = if app.opens() { "opens" } else { "launcher only" };
        println!("{:<12} {:<12} {}", app.id, app.label, opens);
    }
}

fn probe(config: &ShellConfig) -> Result<(), Box<dyn std::error::Error>> {
    let executor = EffectExecutor::new(RemoteDataClient::from_config(&config.backend)?);
    println!("backend {}", executor.client().base_url());
    for report in executor.probe() {
        let status = if report.degraded { "fallback" } else { "live" };
        println!("{:<14} {:<9} {} items", report.dataset, status, report.items);
    }
    Ok(())
}

fn print_help() {
    println!("phone {}", env!("CARGO_PKG_VERSION"));
    println!("Usage:");
    println!("  phone [run] [--backend URL] [--offline] [--config PATH]");
    println!("  phone apps");
    println!("  phone probe [--backend URL] [--offline] [--config PATH]");
    println!("  phone --help");
    println!("  phone --version");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn options_accept_backend_offline_and_config() {
        let options =
            parse_options(args(&["--backend", "http://x", "--offline", "--config", "p.toml"]))
                .unwrap();
        assert_eq!(options.backend.as_deref(), Some("http://x"));
        assert!(options.offline);
        assert_eq!(options.config, Some(PathBuf::from("p.toml")));
    }

    #[test]
    fn options_reject_missing_values_and_unknown_flags() {
        assert!(parse_options(args(&["--backend"])).is_err());
        assert!(parse_options(args(&["--verbose"])).is_err());
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"http://file\"\n").unwrap();

        let options = Options {
            backend: Some("http://flag".to_string()),
            offline: true,
            config: Some(path),
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.backend.url, "http://flag");
        assert!(config.backend.offline);
    }

    #[test]
    fn file_values_survive_without_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[backend]\nurl = \"http://file\"\n").unwrap();

        let options = Options {
            config: Some(path),
            ..Options::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.backend.url, "http://file");
        assert!(!config.backend.offline);
    }
}
