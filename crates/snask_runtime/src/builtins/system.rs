use super::common::{expect_args, to_f64};
use crate::Value;
use crate::runtime::Runtime;
use std::time::Duration;

pub fn builtin_time(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("time", args, 0)?;
    Ok(Value::from_i64(rt.clock_unix_secs()))
}

/// Blocks the calling thread for the given number of milliseconds.
pub fn builtin_sleep(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("sleep", args, 1)?;
    let ms = to_f64(&args[0]).unwrap_or(0.0);
    if ms.is_finite() && ms > 0.0 {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
    Ok(Value::Nil)
}

pub fn builtin_exit(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("exit", args, 1)?;
    let code = to_f64(&args[0]).map(|n| n as i32).unwrap_or(0);
    tracing::debug!(code, "exit requested");
    std::process::exit(code)
}

pub fn builtin_heap_stats(_rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("heap_stats", args, 0)?;
    Ok(Value::str(snask_core::heap::stats().memory_stats()))
}

pub fn builtin_thread_spawn(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("thread_spawn", args, 2)?;
    let Some(name) = args[0].as_str() else {
        return Ok(Value::Nil);
    };
    Ok(rt
        .threads()
        .spawn(rt.dispatcher().clone(), name, args[1].clone()))
}

pub fn builtin_thread_join(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("thread_join", args, 1)?;
    Ok(Value::Bool(rt.threads().join(&args[0])))
}

pub fn builtin_thread_detach(rt: &mut Runtime, args: &[Value]) -> Result<Value, String> {
    expect_args("thread_detach", args, 1)?;
    Ok(Value::Bool(rt.threads().detach(&args[0])))
}
