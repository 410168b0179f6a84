use snask_core::path;
use snask_runtime::json::stringify_pretty;

use crate::args::CliArgs;
use crate::commands::common::{missing, parse_json, read_input};

pub(crate) fn run(args: &CliArgs) {
    let Some(sub) = args.positional.first() else {
        missing("<fmt|get>");
    };
    match sub.as_str() {
        "fmt" => fmt(&args.positional[1..]),
        "get" => get(&args.positional[1..]),
        other => {
            eprintln!("Unknown json command: {other}");
            std::process::exit(2);
        }
    }
}

fn fmt(rest: &[String]) {
    let [file] = rest else {
        missing("<file>");
    };
    let value = load(file);
    println!("{}", stringify_pretty(&value));
}

fn get(rest: &[String]) {
    let [file, query] = rest else {
        missing("<file> <path>");
    };
    let value = load(file);
    match path::walk(&value, query) {
        Ok(found) => println!("{}", stringify_pretty(&found)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn load(file: &str) -> snask_core::Value {
    let text = match read_input(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    match parse_json(file, &text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
