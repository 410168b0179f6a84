use super::common::expect_args;
use crate::Value;
use crate::errors::messages::NOT_A_STRING;
use crate::json;
use crate::runtime::Runtime;
use snask_core::path_get;

pub fn builtin_json_parse(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_parse", args, 1)?;
    let Some(text) = args[0].as_str() else {
        return Ok(Value::Nil);
    };
    Ok(json::parse_with_depth(text, rt.config().json_max_depth).unwrap_or_default())
}

pub fn builtin_json_parse_ex(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_parse_ex", args, 1)?;
    let Some(text) = args[0].as_str() else {
        return Ok(Value::err(&format!("{}: {}", NOT_A_STRING, args[0].type_name())));
    };
    Ok(match json::parse_with_depth(text, rt.config().json_max_depth) {
        Ok(v) => Value::ok(v),
        Err(e) => Value::err(&e.to_string()),
    })
}

pub fn builtin_json_stringify(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_stringify", args, 1)?;
    Ok(Value::str(json::stringify(&args[0])))
}

pub fn builtin_json_stringify_pretty(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_stringify_pretty", args, 1)?;
    Ok(Value::str(json::stringify_pretty(&args[0])))
}

pub fn builtin_json_get(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_get", args, 2)?;
    Ok(args[0].get(&args[1]))
}

pub fn builtin_json_has(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_has", args, 2)?;
    let has = match (&args[0], &args[1]) {
        (Value::Object(obj), Value::Str(key)) => obj.contains_key(key),
        (Value::Object(obj), idx) => idx.as_index().is_some_and(|i| i < obj.len()),
        _ => false,
    };
    Ok(Value::Bool(has))
}

pub fn builtin_json_len(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_len", args, 1)?;
    Ok(match &args[0] {
        Value::Object(obj) => Value::from_i64(obj.len() as i64),
        _ => Value::Nil,
    })
}

pub fn builtin_json_index(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_index", args, 2)?;
    Ok(args[0].array_get(&args[1]))
}

pub fn builtin_json_set(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("json_set", args, 3)?;
    Ok(Value::Bool(args[0].set(&args[1], args[2].clone())))
}

pub fn builtin_sjson_new_object(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_new_object", args, 0)?;
    Ok(Value::new_object())
}

pub fn builtin_sjson_new_array(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_new_array", args, 0)?;
    Ok(Value::new_array())
}

pub fn builtin_sjson_type(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_type", args, 1)?;
    Ok(Value::str(args[0].type_name()))
}

pub fn builtin_sjson_arr_set(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_arr_set", args, 3)?;
    Ok(Value::Bool(args[0].array_set(&args[1], args[2].clone())))
}

pub fn builtin_sjson_arr_push(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_arr_push", args, 2)?;
    Ok(Value::Bool(args[0].array_push(args[1].clone())))
}

pub fn builtin_sjson_path_get(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sjson_path_get", args, 2)?;
    let Some(path) = args[1].as_str() else {
        return Ok(Value::err(&format!("{}: {}", NOT_A_STRING, args[1].type_name())));
    };
    Ok(path_get(&args[0], path))
}
