use std::sync::Arc;
use std::time::Duration;

use snask_blaze::{BlazeConfig, Router, Server};
use snask_core::{Object, Value};
use snask_runtime::Dispatcher;
use snask_runtime::dispatch::HANDLER_ARITY;

use crate::args::CliArgs;
use crate::commands::common::{missing, parse_json, read_input};

pub(crate) fn run(args: &CliArgs) {
    let Some(file) = args.positional.first() else {
        missing("<routes.json>");
    };
    let config = match config_from(args.positional.get(1).map(String::as_str), |k| {
        std::env::var(k).ok()
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    let routes = match read_input(file).and_then(|text| parse_json(file, &text)) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let router = Router::new(routes);
    tracing::debug!(file = %file, routes = router.len(), "loaded route table");

    let server = match Server::bind(config, router, Arc::new(dispatcher())) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if let Ok(addr) = server.local_addr() {
        println!("blaze listening on http://{addr}");
    }
    if let Err(e) = server.run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Handlers available to every route table served from the command line.
pub(crate) fn dispatcher() -> Dispatcher {
    let mut d = Dispatcher::new();
    d.register("health", HANDLER_ARITY, |_| {
        let mut obj = Object::new();
        obj.set("status", Value::str("ok"));
        Value::object(obj)
    });
    d.register("echo", HANDLER_ARITY, |args| {
        let mut obj = Object::with_capacity(HANDLER_ARITY);
        for (name, v) in ["method", "path", "query", "body", "cookie", "headers"]
            .iter()
            .zip(args)
        {
            obj.set(name, v.clone());
        }
        Value::object(obj)
    });
    d
}

/// Defaults, then `BLAZE_*` variables, then the port argument.
pub(crate) fn config_from(
    port_arg: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<BlazeConfig, String> {
    let mut config = BlazeConfig::default();
    if let Some(host) = env("BLAZE_HOST") {
        config = config.with_host(host);
    }
    if let Some(port) = env("BLAZE_PORT") {
        config = config.with_port(parse_num("BLAZE_PORT", &port)?);
    }
    if let Some(n) = env("BLAZE_WORKERS") {
        config = config.with_workers(parse_num("BLAZE_WORKERS", &n)?);
    }
    if let Some(n) = env("BLAZE_MAX_REQUEST_BYTES") {
        config = config.with_max_request_bytes(parse_num("BLAZE_MAX_REQUEST_BYTES", &n)?);
    }
    if let Some(ms) = env("BLAZE_READ_TIMEOUT_MS") {
        let ms: u64 = parse_num("BLAZE_READ_TIMEOUT_MS", &ms)?;
        config = config.with_read_timeout((ms > 0).then(|| Duration::from_millis(ms)));
    }
    if let Some(port) = port_arg {
        config = config.with_port(parse_num("port", port)?);
    }
    Ok(config)
}

fn parse_num<T: std::str::FromStr>(name: &str, text: &str) -> Result<T, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("Invalid {name}: {text}"))
}
