use crate::Value;

pub fn expect_args(name: &str, args: &[Value], n: usize) -> Result<(), String> {
    if args.len() == n {
        return Ok(());
    }
    Err(match n {
        0 => format!("{} expects 0 arguments", name),
        1 => format!("{} expects 1 argument", name),
        _ => format!("{} expects {} arguments", name, n),
    })
}

pub fn to_f64(v: &Value) -> Option<f64> {
    v.as_number()
}

pub fn to_f64_pair(a: &Value, b: &Value) -> Option<(f64, f64)> {
    Some((to_f64(a)?, to_f64(b)?))
}
