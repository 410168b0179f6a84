use crate::Value;
use crate::builtins;
use crate::runtime::Runtime;
use ahash::RandomState;
use hashbrown::HashMap;

pub type BuiltinFn = fn(&mut Runtime, &[Value]) -> Result<Value, String>;

pub type BuiltinTable = HashMap<String, BuiltinFn, RandomState>;

pub struct BuiltinRegistry {
    entries: Vec<(String, BuiltinFn)>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &str, fun: BuiltinFn) {
        self.entries.push((name.to_string(), fun));
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Later registrations replace earlier ones with the same name.
    pub fn install_into(self, table: &mut BuiltinTable) {
        for (name, fun) in self.entries {
            table.insert(name, fun);
        }
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub trait BuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry);
}

pub struct StdBuiltinProvider;

impl BuiltinProvider for StdBuiltinProvider {
    fn install(&self, registry: &mut BuiltinRegistry) {
        // json
        registry.register("json_parse", builtins::builtin_json_parse);
        registry.register("json_parse_ex", builtins::builtin_json_parse_ex);
        registry.register("json_stringify", builtins::builtin_json_stringify);
        registry.register("json_stringify_pretty", builtins::builtin_json_stringify_pretty);
        registry.register("json_get", builtins::builtin_json_get);
        registry.register("json_has", builtins::builtin_json_has);
        registry.register("json_len", builtins::builtin_json_len);
        registry.register("json_index", builtins::builtin_json_index);
        registry.register("json_set", builtins::builtin_json_set);
        // sjson
        registry.register("sjson_new_object", builtins::builtin_sjson_new_object);
        registry.register("sjson_new_array", builtins::builtin_sjson_new_array);
        registry.register("sjson_type", builtins::builtin_sjson_type);
        registry.register("sjson_arr_len", builtins::builtin_json_len);
        registry.register("sjson_arr_get", builtins::builtin_json_index);
        registry.register("sjson_arr_set", builtins::builtin_sjson_arr_set);
        registry.register("sjson_arr_push", builtins::builtin_sjson_arr_push);
        registry.register("sjson_path_get", builtins::builtin_sjson_path_get);
        // members
        registry.register("get_member", builtins::builtin_json_get);
        registry.register("set_member", builtins::builtin_json_set);
        // types and conversion
        registry.register("is_nil", builtins::builtin_is_nil);
        registry.register("is_str", builtins::builtin_is_str);
        registry.register("is_obj", builtins::builtin_is_obj);
        registry.register("str_to_num", builtins::builtin_str_to_num);
        registry.register("num_to_str", builtins::builtin_num_to_str);
        // strings and math
        registry.register("len", builtins::builtin_len);
        registry.register("upper", builtins::builtin_upper);
        registry.register("concat", builtins::builtin_concat);
        registry.register("abs", builtins::builtin_abs);
        registry.register("max", builtins::builtin_max);
        registry.register("min", builtins::builtin_min);
        // system
        registry.register("time", builtins::builtin_time);
        registry.register("sleep", builtins::builtin_sleep);
        registry.register("exit", builtins::builtin_exit);
        registry.register("heap_stats", builtins::builtin_heap_stats);
        registry.register("thread_spawn", builtins::builtin_thread_spawn);
        registry.register("thread_join", builtins::builtin_thread_join);
        registry.register("thread_detach", builtins::builtin_thread_detach);
    }
}
