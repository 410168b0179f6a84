use snask_core::Value;
use snask_runtime::json;

pub fn read_input(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Read failed: {path}: {e}"))
}

pub fn parse_json(path: &str, text: &str) -> Result<Value, String> {
    json::parse(text).map_err(|e| format!("{path}: {e}"))
}

pub fn missing(what: &str) -> ! {
    eprintln!("Missing {what}");
    std::process::exit(2);
}
