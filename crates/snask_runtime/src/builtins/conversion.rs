use super::common::expect_args;
use crate::Value;
use crate::runtime::Runtime;
use snask_core::value::number_to_string;

pub fn builtin_str_to_num(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("str_to_num", args, 1)?;
    let v = &args[0];
    Ok(match v {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::from_f64)
            .unwrap_or_default(),
        Value::Number(_) => v.clone(),
        _ => Value::Nil,
    })
}

pub fn builtin_num_to_str(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("num_to_str", args, 1)?;
    Ok(match &args[0] {
        Value::Number(n) => Value::str(number_to_string(*n)),
        _ => Value::Nil,
    })
}
