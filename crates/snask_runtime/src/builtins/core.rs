use super::common::{expect_args, to_f64, to_f64_pair};
use crate::Value;
use crate::runtime::Runtime;
use snask_core::ops;

pub fn builtin_is_nil(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("is_nil", args, 1)?;
    Ok(Value::Bool(args[0].is_nil()))
}

pub fn builtin_is_str(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("is_str", args, 1)?;
    Ok(Value::Bool(args[0].is_str()))
}

pub fn builtin_is_obj(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("is_obj", args, 1)?;
    Ok(Value::Bool(args[0].is_obj()))
}

/// Byte length of a string or entry count of an object.
pub fn builtin_len(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("len", args, 1)?;
    Ok(args[0]
        .len()
        .map(|n| Value::from_i64(n as i64))
        .unwrap_or_default())
}

pub fn builtin_upper(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("upper", args, 1)?;
    Ok(args[0]
        .as_str()
        .map(|s| Value::str(s.to_uppercase()))
        .unwrap_or_default())
}

pub fn builtin_concat(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("concat", args, 2)?;
    Ok(ops::concat(&args[0], &args[1]))
}

pub fn builtin_abs(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("abs", args, 1)?;
    Ok(to_f64(&args[0]).map(|n| Value::from_f64(n.abs())).unwrap_or_default())
}

pub fn builtin_max(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("max", args, 2)?;
    Ok(to_f64_pair(&args[0], &args[1])
        .map(|(a, b)| Value::from_f64(a.max(b)))
        .unwrap_or_default())
}

pub fn builtin_min(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("min", args, 2)?;
    Ok(to_f64_pair(&args[0], &args[1])
        .map(|(a, b)| Value::from_f64(a.min(b)))
        .unwrap_or_default())
}
