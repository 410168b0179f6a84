use snask_runtime::{BuiltinProvider, BuiltinRegistry, Dispatcher, Runtime, StdBuiltinProvider, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn call(rt: &mut Runtime, name: &str, args: &[Value]) -> Value {
    rt.call_builtin(name, args).unwrap()
}

#[test]
fn registry_matches_runtime_table() {
    let mut reg = BuiltinRegistry::new();
    StdBuiltinProvider.install(&mut reg);
    let mut a = reg.names();
    a.sort();
    a.dedup();
    assert_eq!(a, Runtime::new().builtin_names());
}

#[test]
fn unknown_builtin_and_arity_are_errors() {
    let mut rt = Runtime::new();
    let err = rt.call_builtin("no_such_thing", &[]).unwrap_err();
    assert_eq!(err, "Unknown builtin: no_such_thing");
    let err = rt.call_builtin("json_parse", &[]).unwrap_err();
    assert_eq!(err, "json_parse expects 1 argument");
    let err = rt.call_builtin("json_set", &[Value::Nil]).unwrap_err();
    assert_eq!(err, "json_set expects 3 arguments");
}

#[test]
fn json_parse_and_access() {
    let mut rt = Runtime::new();
    let doc = call(&mut rt, "json_parse", &[Value::str(r#"{"a":{"b":[1,2,3]},"s":"x"}"#)]);
    assert!(doc.is_obj());
    let a = call(&mut rt, "json_get", &[doc.clone(), Value::str("a")]);
    let b = call(&mut rt, "get_member", &[a, Value::str("b")]);
    assert_eq!(call(&mut rt, "json_len", &[b.clone()]).as_number(), Some(3.0));
    assert_eq!(call(&mut rt, "sjson_arr_len", &[b.clone()]).as_number(), Some(3.0));
    assert_eq!(
        call(&mut rt, "json_index", &[b.clone(), Value::from_i64(2)]).as_number(),
        Some(3.0)
    );
    assert!(call(&mut rt, "json_index", &[b, Value::from_i64(9)]).is_nil());
    assert_eq!(call(&mut rt, "json_has", &[doc.clone(), Value::str("s")]), Value::Bool(true));
    assert_eq!(call(&mut rt, "json_has", &[doc, Value::str("zz")]), Value::Bool(false));
}

#[test]
fn json_parse_rejects_quietly() {
    let mut rt = Runtime::new();
    assert!(call(&mut rt, "json_parse", &[Value::str("{bad")]).is_nil());
    assert!(call(&mut rt, "json_parse", &[Value::from_i64(1)]).is_nil());

    let res = call(&mut rt, "json_parse_ex", &[Value::str("[1,")]);
    assert_eq!(res.get_key("ok"), Value::Bool(false));
    assert!(res.get_key("value").is_nil());
    assert!(res.get_key("error").as_str().is_some_and(|e| e.contains("at byte")));

    let res = call(&mut rt, "json_parse_ex", &[Value::str("true")]);
    assert_eq!(res.get_key("ok"), Value::Bool(true));
    assert_eq!(res.get_key("value"), Value::Bool(true));
}

#[test]
fn build_and_stringify() {
    let mut rt = Runtime::new();
    let obj = call(&mut rt, "sjson_new_object", &[]);
    let arr = call(&mut rt, "sjson_new_array", &[]);
    assert_eq!(call(&mut rt, "sjson_arr_push", &[arr.clone(), Value::from_i64(1)]), Value::Bool(true));
    assert_eq!(
        call(&mut rt, "sjson_arr_set", &[arr.clone(), Value::from_i64(2), Value::str("z")]),
        Value::Bool(true)
    );
    assert_eq!(call(&mut rt, "json_set", &[obj.clone(), Value::str("list"), arr]), Value::Bool(true));
    assert_eq!(
        call(&mut rt, "set_member", &[obj.clone(), Value::str("n"), Value::from_f64(0.5)]),
        Value::Bool(true)
    );
    let text = call(&mut rt, "json_stringify", &[obj.clone()]);
    assert_eq!(text.as_str(), Some(r#"{"list":{"0":1,"1":null,"2":"z"},"n":0.5}"#));
    let pretty = call(&mut rt, "json_stringify_pretty", &[obj]);
    assert!(pretty.as_str().is_some_and(|s| s.starts_with("{\n  \"list\": {")));
}

#[test]
fn set_on_non_object_reports_false() {
    let mut rt = Runtime::new();
    let r = call(&mut rt, "json_set", &[Value::str("x"), Value::str("k"), Value::Nil]);
    assert_eq!(r, Value::Bool(false));
    let r = call(&mut rt, "sjson_arr_push", &[Value::Nil, Value::Nil]);
    assert_eq!(r, Value::Bool(false));
}

#[test]
fn huge_positional_write_is_refused() {
    let mut rt = Runtime::new();
    let arr = call(&mut rt, "sjson_new_array", &[]);
    call(&mut rt, "sjson_arr_push", &[arr.clone(), Value::str("a")]);
    let huge = Value::from_f64(1099511627776.0);
    assert_eq!(
        call(&mut rt, "sjson_arr_set", &[arr.clone(), huge.clone(), Value::str("x")]),
        Value::Bool(false)
    );
    assert_eq!(call(&mut rt, "json_set", &[arr.clone(), huge.clone(), Value::str("x")]), Value::Bool(false));
    assert_eq!(call(&mut rt, "set_member", &[arr.clone(), huge, Value::str("x")]), Value::Bool(false));
    assert_eq!(call(&mut rt, "json_len", &[arr.clone()]).as_number(), Some(1.0));
    assert_eq!(call(&mut rt, "json_stringify", &[arr]).as_str(), Some(r#"{"0":"a"}"#));
}

#[test]
fn path_get_builtin() {
    let mut rt = Runtime::new();
    let doc = call(&mut rt, "json_parse", &[Value::str(r#"{"users":[{"name":"ana"}]}"#)]);
    let r = call(&mut rt, "sjson_path_get", &[doc.clone(), Value::str("users.0.name")]);
    assert_eq!(r.get_key("ok"), Value::Bool(true));
    assert_eq!(r.get_key("value").as_str(), Some("ana"));
    let r = call(&mut rt, "sjson_path_get", &[doc, Value::from_i64(3)]);
    assert_eq!(r.get_key("ok"), Value::Bool(false));
}

#[test]
fn type_predicates_and_conversion() {
    let mut rt = Runtime::new();
    assert_eq!(call(&mut rt, "is_nil", &[Value::Nil]), Value::Bool(true));
    assert_eq!(call(&mut rt, "is_str", &[Value::str("")]), Value::Bool(true));
    assert_eq!(call(&mut rt, "is_obj", &[Value::from_i64(1)]), Value::Bool(false));
    assert_eq!(call(&mut rt, "sjson_type", &[Value::new_array()]).as_str(), Some("object"));
    assert_eq!(call(&mut rt, "str_to_num", &[Value::str(" 42.5 ")]).as_number(), Some(42.5));
    assert!(call(&mut rt, "str_to_num", &[Value::str("4x")]).is_nil());
    assert_eq!(call(&mut rt, "num_to_str", &[Value::from_i64(7)]).as_str(), Some("7"));
    assert_eq!(call(&mut rt, "num_to_str", &[Value::from_f64(2.25)]).as_str(), Some("2.25"));
}

#[test]
fn strings_and_math() {
    let mut rt = Runtime::new();
    assert_eq!(call(&mut rt, "len", &[Value::str("héllo")]).as_number(), Some(6.0));
    assert!(call(&mut rt, "len", &[Value::Bool(true)]).is_nil());
    assert_eq!(call(&mut rt, "upper", &[Value::str("abc")]).as_str(), Some("ABC"));
    assert_eq!(
        call(&mut rt, "concat", &[Value::str("n="), Value::from_i64(3)]).as_str(),
        Some("n=3")
    );
    assert_eq!(call(&mut rt, "abs", &[Value::from_i64(-4)]).as_number(), Some(4.0));
    assert_eq!(
        call(&mut rt, "max", &[Value::from_i64(1), Value::from_i64(9)]).as_number(),
        Some(9.0)
    );
    assert_eq!(
        call(&mut rt, "min", &[Value::from_i64(1), Value::from_i64(9)]).as_number(),
        Some(1.0)
    );
    assert!(call(&mut rt, "min", &[Value::str("1"), Value::from_i64(9)]).is_nil());
    assert_eq!(call(&mut rt, "abs", &[Value::Bool(true)]).as_number(), Some(1.0));
    assert_eq!(
        call(&mut rt, "max", &[Value::Bool(true), Value::from_i64(0)]).as_number(),
        Some(1.0)
    );
}

#[test]
fn system_builtins() {
    let mut rt = Runtime::new();
    let t = call(&mut rt, "time", &[]).as_number().unwrap();
    assert!(t > 1_600_000_000.0);
    assert!(call(&mut rt, "sleep", &[Value::from_i64(1)]).is_nil());
    let stats = call(&mut rt, "heap_stats", &[]);
    assert!(stats.as_str().is_some_and(|s| s.starts_with("Heap: objects=")));
}

#[test]
fn thread_builtins_go_through_the_dispatcher() {
    static RUNS: AtomicUsize = AtomicUsize::new(0);
    let mut d = Dispatcher::new();
    d.register("job", 1, |args| {
        RUNS.fetch_add(args[0].as_number().unwrap_or(0.0) as usize, Ordering::SeqCst);
        Value::Nil
    });
    let mut rt = Runtime::with_dispatcher(Arc::new(d));
    let h = call(&mut rt, "thread_spawn", &[Value::str("job"), Value::from_i64(5)]);
    assert!(h.is_number());
    assert_eq!(call(&mut rt, "thread_join", &[h.clone()]), Value::Bool(true));
    assert_eq!(RUNS.load(Ordering::SeqCst), 5);
    assert_eq!(call(&mut rt, "thread_detach", &[h]), Value::Bool(false));
    assert!(call(&mut rt, "thread_spawn", &[Value::Nil, Value::Nil]).is_nil());
}
