use std::fs;

use moonlet::{EvalOptions, ParseOptions, Value, evaluate, parse, run};
use walkdir::WalkDir;

fn assert_success(src: &str) {
    if let Err(e) = run(src) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if run(src).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_results(src: &str, expected: &[Value]) {
    match run(src) {
        Ok(values) => assert_eq!(values, expected, "script: {src}"),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

#[test]
fn script_corpus_works() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "lua"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = run(&content) {
            panic!("Script {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn arithmetic_precedence() {
    assert_results("return 1 + 2 * 3", &[Value::Integer(7)]);
    assert_results("return (1 + 2) * 3", &[Value::Integer(9)]);
    assert_results("return 2 ^ 3 ^ 2", &[Value::Float(512.0)]);
    assert_results("return -2 ^ 2", &[Value::Float(-4.0)]);
    assert_results("return 7 // 2", &[Value::Integer(3)]);
    assert_results("return 7 % 3", &[Value::Integer(1)]);
    assert_results("return 7 / 2", &[Value::Float(3.5)]);
}

#[test]
fn concat_is_right_associative_and_coerces() {
    assert_results("return 'a' .. 'b' .. 'c'", &[Value::string("abc")]);
    assert_results("return 'n=' .. 42", &[Value::string("n=42")]);
    assert_results("return 1 .. 2", &[Value::string("12")]);
}

#[test]
fn table_constructor_and_indexing() {
    assert_results("local t = {10,20,30}; return t[2]", &[Value::Integer(20)]);
    assert_results("local t = {a = 1, ['b'] = 2}; return t.a + t.b", &[Value::Integer(3)]);
    assert_results("local t = {10, 20}; return #t", &[Value::Integer(2)]);
    assert_results("local t = {}; t[2.0] = 'x'; return t[2]", &[Value::string("x")]);
}

#[test]
fn recursive_local_function() {
    assert_results("local function f(n) if n<=1 then return 1 end return n*f(n-1) end return f(5)",
                   &[Value::Integer(120)]);
}

#[test]
fn numeric_for_accumulates() {
    assert_results("local s=0 for i=1,5 do s=s+i end return s", &[Value::Integer(15)]);
    assert_results("local s=0 for i=10,1,-2 do s=s+i end return s", &[Value::Integer(30)]);
    assert_failure("for i=1,5,0 do end");
}

#[test]
fn generic_for_visits_every_pair_once() {
    assert_success(
                   r"
        local t = {a = 1, b = 2}
        local count = 0
        local sum = 0
        local k, v
        for kk, vv in pairs(t) do
            count = count + 1
            sum = sum + vv
            k, v = kk, vv
        end
        assert(count == 2)
        assert(sum == 3)
        assert((k == 'a' and v == 1) or (k == 'b' and v == 2))
    ",
    );
}

#[test]
fn ipairs_stops_at_the_first_hole() {
    assert_success(
                   r"
        local t = {1, 2, 3}
        t[5] = 5
        local visited = 0
        for i, v in ipairs(t) do
            visited = visited + 1
            assert(i == v)
        end
        assert(visited == 3)
    ",
    );
}

#[test]
fn closures_share_their_captured_variable() {
    assert_results("local function mk() local x=0 return function() x=x+1 return x end end \
                    local c=mk() return c(),c(),c()",
                   &[Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
}

#[test]
fn loop_bodies_capture_per_iteration() {
    assert_results(
                   r"
        local fs = {}
        for i = 1, 3 do
            fs[i] = function() return i end
        end
        return fs[1](), fs[2](), fs[3]()
    ",
                   &[Value::Integer(1), Value::Integer(2), Value::Integer(3)],
    );
}

#[test]
fn assignment_arity_mismatch_is_permissive() {
    // Surplus values are dropped.
    assert_results("local a = {b = {}} a.b.c = 1, 2 return a.b.c", &[Value::Integer(1)]);
    // Missing values nil-extend.
    assert_results("local x, y = 1 return x, y == nil", &[Value::Integer(1), Value::Bool(true)]);
    assert_results("local x, y, z = 1, 2, 3, 4 return z", &[Value::Integer(3)]);
}

#[test]
fn multi_return_expands_only_in_tail_position() {
    assert_results(
                   r"
        local function two() return 1, 2 end
        local a, b, c = two(), two()
        return a, b, c
    ",
                   &[Value::Integer(1), Value::Integer(1), Value::Integer(2)],
    );
    assert_results("local function two() return 1, 2 end local t = {two(), two()} return #t",
                   &[Value::Integer(3)]);
}

#[test]
fn short_circuit_laws() {
    assert_success(
                   r"
        local touched = false
        local function touch() touched = true return true end
        assert((false and touch()) == false)
        assert(touched == false)
        assert((true or touch()) == true)
        assert(touched == false)
        assert((nil or 'fallback') == 'fallback')
        assert((1 and 2) == 2)
    ",
    );
}

#[test]
fn evaluation_order_is_left_to_right() {
    assert_success(
                   r"
        local order = {}
        local function mark(n) order[#order + 1] = n return n end
        local _ = mark(1) + mark(2) * mark(3)
        mark(4)
        assert(#order == 4)
        for i = 1, 4 do assert(order[i] == i) end
    ",
    );
}

#[test]
fn method_calls_evaluate_the_receiver_once() {
    assert_success(
                   r"
        local made = 0
        local obj = {n = 10}
        function obj.get(self, extra) return self.n + extra end
        local function fetch()
            made = made + 1
            return obj
        end
        assert(fetch():get(5) == 15)
        assert(made == 1)
    ",
    );
}

#[test]
fn method_declarations_bind_self() {
    assert_results(
                   r"
        local counter = {n = 0}
        function counter:bump(by)
            self.n = self.n + by
            return self.n
        end
        counter:bump(2)
        return counter:bump(3)
    ",
                   &[Value::Integer(5)],
    );
}

#[test]
fn metatable_index_table_delegation() {
    assert_results(
                   r"
        local base = {greeting = 'hi'}
        local t = setmetatable({}, {__index = base})
        return t.greeting
    ",
                   &[Value::string("hi")],
    );
}

#[test]
fn metatable_index_function_delegation() {
    assert_results(
                   r"
        local t = setmetatable({}, {__index = function(tbl, key) return key .. '!' end})
        return t.name
    ",
                   &[Value::string("name!")],
    );
}

#[test]
fn metatable_index_chain_is_bounded() {
    assert_failure(
                   r"
        local a = {}
        local b = {}
        setmetatable(a, {__index = b})
        setmetatable(b, {__index = a})
        return a.missing
    ",
    );
}

#[test]
fn rawget_bypasses_the_metatable() {
    assert_results(
                   r"
        local t = setmetatable({}, {__index = function() return 'ghost' end})
        return t.x, rawget(t, 'x') == nil
    ",
                   &[Value::string("ghost"), Value::Bool(true)],
    );
}

#[test]
fn pcall_converts_raises_into_values() {
    assert_success(
                   r"
        local ok, message = pcall(function() error('boom') end)
        assert(ok == false)
        assert(type(message) == 'string')
        local fine, value = pcall(function() return 7 end)
        assert(fine == true)
        assert(value == 7)
    ",
    );
}

#[test]
fn while_and_repeat_loops() {
    assert_results("local n = 0 while n < 5 do n = n + 1 end return n", &[Value::Integer(5)]);
    // The until condition sees the body's locals.
    assert_results("local n = 0 repeat local done = n > 1 n = n + 1 until done return n",
                   &[Value::Integer(3)]);
}

#[test]
fn break_leaves_the_innermost_loop() {
    assert_results(
                   r"
        local s = 0
        for i = 1, 10 do
            if i > 3 then break end
            s = s + i
        end
        return s
    ",
                   &[Value::Integer(6)],
    );
    assert_failure("break");
}

#[test]
fn goto_jumps_within_a_block() {
    assert_results(
                   r"
        local s = 0
        local i = 0
        ::top::
        i = i + 1
        s = s + i
        if i < 4 then goto top end
        return s
    ",
                   &[Value::Integer(10)],
    );
    assert_failure("goto nowhere");
}

#[test]
fn return_is_legal_anywhere() {
    assert_results("return 1 local unreachable = 2", &[Value::Integer(1)]);
}

#[test]
fn truthiness_of_zero_and_empty_string() {
    assert_success("assert(0) assert('') assert(not nil) assert(not false)");
}

#[test]
fn comparisons() {
    assert_success(
                   r"
        assert(1 < 2)
        assert(2.5 >= 2)
        assert('abc' < 'abd')
        assert(1 == 1.0)
        assert(1 ~= '1')
    ",
    );
    assert_failure("return 1 < 'x'");
}

#[test]
fn tostring_and_tonumber() {
    assert_success(
                   r"
        assert(tostring(nil) == 'nil')
        assert(tostring(12) == '12')
        assert(tostring(1.5) == '1.5')
        assert(tostring(1.0) == '1.0')
        assert(tonumber('42') == 42)
        assert(tonumber('2.5') == 2.5)
        assert(tonumber('0x10') == 16)
        assert(tonumber('pear') == nil)
        assert(type(3 // 1) == 'number')
    ",
    );
}

#[test]
fn undefined_reads_default_to_nil() {
    assert_results("return missing == nil", &[Value::Bool(true)]);
}

#[test]
fn strict_mode_errors_on_undefined_reads() {
    let program = parse("return missing", &ParseOptions::default()).unwrap();
    let options = EvalOptions { strict: true,
                                ..EvalOptions::default() };
    assert!(evaluate(&program, &options).is_err());

    let program = parse("local x = 1 return x", &ParseOptions::default()).unwrap();
    assert!(evaluate(&program, &options).is_ok());
}

#[test]
fn step_budget_halts_runaway_loops() {
    let program = parse("while true do end", &ParseOptions::default()).unwrap();
    let options = EvalOptions { max_steps: Some(1_000),
                                ..EvalOptions::default() };
    let error = evaluate(&program, &options).unwrap_err();
    assert!(error.to_string().contains("budget"), "{error}");
}

#[test]
fn depth_budget_halts_runaway_recursion() {
    let program = parse("local function f() return f() end return f()",
                        &ParseOptions::default()).unwrap();
    let options = EvalOptions { max_call_depth: 32,
                                ..EvalOptions::default() };
    let error = evaluate(&program, &options).unwrap_err();
    assert!(error.to_string().contains("depth"), "{error}");
}

#[test]
fn division_by_zero_rules() {
    assert_failure("return 1 // 0");
    assert_failure("return 1 % 0");
    // Float division follows IEEE instead of erroring.
    assert_success("local inf = 1 / 0 assert(inf > 1e300)");
}

#[test]
fn calling_non_callables_fails() {
    assert_failure("local x = 5 x()");
    assert_failure("local t = {} t.missing()");
}

#[test]
fn indexing_non_tables_fails() {
    assert_failure("local x = 5 return x.field");
    assert_failure("local x = 'text' return x[1]");
}

#[test]
fn syntax_errors_are_reported_not_panicked() {
    assert_failure("local = 3");
    assert_failure("if x then");
    assert_failure("return 1 +");
    assert_failure("f() = 3");
    assert_failure("1 + 2");
}

#[test]
fn one_parse_reports_multiple_errors() {
    let error = parse("local = 1\nlocal = 2", &ParseOptions::default()).unwrap_err();
    assert!(error.error_count() >= 2, "{error}");
}
