//! Unit tests for the interpreter.

use super::{
    builtins::{expand_escapes, is_built_in},
    heap::{Heap, HeapObject},
    interpreter::Interpreter,
    value::{format_double, Value},
};
use crate::{
    errors::errors::{Error, ErrorImpl, ErrorPhase},
    load_program,
};

fn run_with_input(source: &str, input: &str) -> (Result<i32, Error>, String) {
    let program = load_program(source.to_string(), Some("test.mypl".to_string())).unwrap();
    let mut output = Vec::new();

    let result = Interpreter::new(&program, input.as_bytes(), &mut output).run();

    (result, String::from_utf8(output).unwrap())
}

fn run(source: &str) -> (Result<i32, Error>, String) {
    run_with_input(source, "")
}

/// Wraps `body` in `main` and returns its exit code.
fn exit_code(body: &str) -> i32 {
    run(&format!("fun int main()\n{}\nend", body)).0.unwrap()
}

fn runtime_error(source: &str) -> ErrorImpl {
    let error = run(source).0.unwrap_err();
    assert_eq!(error.get_phase(), ErrorPhase::Runtime);
    error.get_internal_error().clone()
}

#[test]
fn test_main_return_value_is_exit_code() {
    assert_eq!(exit_code("return 42"), 42);
}

#[test]
fn test_falling_off_main_exits_with_zero() {
    let (result, output) = run("fun int main() print(\"done\") end");

    assert_eq!(result.unwrap(), 0);
    assert_eq!(output, "done");
}

#[test]
fn test_print_expands_escapes() {
    let (_, output) = run("fun int main() print(\"a\\nb\\tc\") return 0 end");

    assert_eq!(output, "a\nb\tc");
}

#[test]
fn test_int_division_truncates_toward_zero() {
    assert_eq!(exit_code("var a = neg 7\nreturn a / 2"), -3);
    assert_eq!(exit_code("var a = neg 7\nreturn a % 2"), -1);
    assert_eq!(exit_code("return 7 % 3"), 1);
}

#[test]
fn test_chains_lean_right() {
    assert_eq!(exit_code("return 10 - 4 - 3"), 9);
    assert_eq!(exit_code("return (10 - 4) - 3"), 3);
    assert_eq!(exit_code("return neg 1 + 2"), -3);
}

#[test]
fn test_int_arithmetic_wraps() {
    assert_eq!(exit_code("var big = 2147483647\nreturn big + 1"), i32::MIN);
}

#[test]
fn test_division_by_zero() {
    let source = "fun int main() var zero = 0\nreturn 5 / zero end";

    assert_eq!(runtime_error(source), ErrorImpl::DivisionByZero);
    assert_eq!(
        runtime_error("fun int main() var zero = 0\nreturn 5 % zero end"),
        ErrorImpl::DivisionByZero
    );
}

#[test]
fn test_division_by_zero_reports_operator_position() {
    let error = run("fun int main()\n  return 1 / 0\nend").0.unwrap_err();
    let position = error.get_position().unwrap();

    assert_eq!(position.line, 2);
    assert_eq!(position.column, 12);
}

#[test]
fn test_double_arithmetic() {
    let (_, output) = run(
        "fun int main() print(dtos(1.5 * 2.0)) print(\" \") print(dtos(1.0 / 4.0)) return 0 end",
    );

    assert_eq!(output, "3.0 0.25");
}

#[test]
fn test_boolean_logic() {
    assert_eq!(exit_code("if true and not false then return 1 end\nreturn 0"), 1);
    assert_eq!(exit_code("if false or false then return 1 end\nreturn 0"), 0);
    assert_eq!(exit_code("var t = true\nif not t then return 1 end\nreturn 2"), 2);
}

#[test]
fn test_if_elseif_else_picks_first_true_branch() {
    let body = "var x = 5\n\
                if x < 3 then return 1\n\
                elseif x < 10 then return 2\n\
                elseif x < 20 then return 3\n\
                else return 4 end";

    assert_eq!(exit_code(body), 2);
}

#[test]
fn test_while_loop() {
    assert_eq!(
        exit_code("var i = 0\nvar sum = 0\nwhile i < 5 do i = i + 1\nsum = sum + i end\nreturn sum"),
        15
    );
}

#[test]
fn test_return_from_inside_loop() {
    assert_eq!(exit_code("while true do return 7 end\nreturn 0"), 7);
    assert_eq!(exit_code("for i = 1 to 10 do if i == 4 then return i end end\nreturn 0"), 4);
}

#[test]
fn test_for_loop_is_inclusive() {
    let (result, output) = run("fun int main() for i = 1 to 3 do print(itos(i)) end return 0 end");

    assert_eq!(result.unwrap(), 0);
    assert_eq!(output, "123");
}

#[test]
fn test_for_loop_with_empty_range() {
    let (_, output) = run("fun int main() for i = 3 to 1 do print(itos(i)) end return 0 end");

    assert_eq!(output, "");
}

#[test]
fn test_for_loop_sees_body_assignments() {
    let (_, output) =
        run("fun int main() for i = 1 to 10 do i = i + 4\nprint(itos(i)) end return 0 end");

    assert_eq!(output, "510");
}

#[test]
fn test_shadowing_restores_outer_binding() {
    assert_eq!(exit_code("var x = 1\nif true then var x = 2\nx = 3 end\nreturn x"), 1);
}

#[test]
fn test_loop_body_scope_is_fresh_each_pass() {
    assert_eq!(
        exit_code("var total = 0\nfor i = 1 to 3 do var step = i * 10\ntotal = total + step end\nreturn total"),
        60
    );
}

#[test]
fn test_arguments_are_passed_by_value() {
    let source = "fun int bump(x: int) x = x + 1\nreturn x end\n\
                  fun int main() var x = 1\nvar y = bump(x)\nreturn x * 10 + y end";

    assert_eq!(run(source).0.unwrap(), 12);
}

#[test]
fn test_recursion() {
    let source = "fun int fact(n: int) if n <= 1 then return 1 end\nreturn n * fact(n - 1) end\n\
                  fun int main() return fact(5) end";

    assert_eq!(run(source).0.unwrap(), 120);
}

#[test]
fn test_nil_function_falls_through() {
    let source = "fun nil greet(name: string) print(\"hi \" + name) end\n\
                  fun int main() greet(\"bob\") return 0 end";

    assert_eq!(run(source).1, "hi bob");
}

#[test]
fn test_records_and_field_paths() {
    let source = "type Pt var x: int = 0 var y: int = 0 end\n\
                  fun int main() var p = new Pt\np.x = 1\np.y = 2\nreturn p.x + p.y end";

    assert_eq!(run(source).0.unwrap(), 3);
}

#[test]
fn test_nested_field_assignment() {
    let source = "type Node var value: int = 0 var next: Node = nil end\n\
                  fun int main() var n = new Node\nn.next = new Node\nn.next.value = 9\nreturn n.next.value end";

    assert_eq!(run(source).0.unwrap(), 9);
}

#[test]
fn test_objects_are_shared_by_reference() {
    let source = "type Pt var x: int = 0 end\n\
                  fun nil set(p: Pt) p.x = 5 end\n\
                  fun int main() var p = new Pt\nvar alias = p\nset(alias)\nreturn p.x end";

    assert_eq!(run(source).0.unwrap(), 5);
}

#[test]
fn test_object_equality_is_identity() {
    let source = "type Pt var x: int = 0 end\n\
                  fun int main() var p = new Pt\nvar q = new Pt\nvar r = p\n\
                  if p == q then return 1 end\nif p == r then return 2 end\nreturn 0 end";

    assert_eq!(run(source).0.unwrap(), 2);
}

#[test]
fn test_nil_comparisons() {
    let source = "type Pt var x: int = 0 end\n\
                  fun int main() var p: Pt = nil\nif p == nil then p = new Pt end\n\
                  if p != nil then return 1 end\nreturn 0 end";

    assert_eq!(run(source).0.unwrap(), 1);
}

#[test]
fn test_nil_dereference() {
    let source = "type Node var value: int = 0 var next: Node = nil end\n\
                  fun int main() var n = new Node\nreturn n.next.value end";

    assert_eq!(
        runtime_error(source),
        ErrorImpl::NilDereference {
            field: "value".to_string()
        }
    );
}

#[test]
fn test_field_initialisers_run_per_instance() {
    let source = "type Counter var count: int = 1 + 1 end\n\
                  fun int main() var a = new Counter\nvar b = new Counter\na.count = 10\nreturn a.count + b.count end";

    assert_eq!(run(source).0.unwrap(), 12);
}

#[test]
fn test_string_operations() {
    let (_, output) = run(
        "fun int main() var s = \"a\" + 'b' + \"c\"\nprint(s)\nprint(itos(length(s)))\n\
         if \"abc\" < \"abd\" then print(\"<\") end\nif 'x' == 'x' then print(\"=\") end\nreturn 0 end",
    );

    assert_eq!(output, "abc3<=");
}

#[test]
fn test_conversions() {
    assert_eq!(exit_code("return stoi(\"41\") + 1"), 42);
    assert_eq!(exit_code("if stod(\"2.5\") == 2.5 then return 1 end\nreturn 0"), 1);

    let (_, output) = run("fun int main() print(dtos(5.3) + \" \" + dtos(5.0) + \" \" + itos(neg 4)) return 0 end");
    assert_eq!(output, "5.3 5.0 -4");
}

#[test]
fn test_invalid_conversion() {
    assert_eq!(
        runtime_error("fun int main() return stoi(\"abc\") end"),
        ErrorImpl::InvalidConversion {
            value: "abc".to_string(),
            target: "int".to_string()
        }
    );
}

#[test]
fn test_get_character() {
    assert_eq!(exit_code("if get(1, \"abc\") == 'b' then return 1 end\nreturn 0"), 1);
    assert_eq!(
        runtime_error("fun int main() var c = get(3, \"abc\")\nreturn 0 end"),
        ErrorImpl::IndexOutOfRange { index: 3, length: 3 }
    );
}

#[test]
fn test_read_lines() {
    let source = "fun int main() var first = read()\nvar second = read()\nvar third = read()\n\
                  print(second + first)\nreturn length(third) end";
    let (result, output) = run_with_input(source, "hello\r\nworld\n");

    assert_eq!(output, "worldhello");
    assert_eq!(result.unwrap(), 0);
}

#[test]
fn test_heap_ids_start_at_one() {
    let mut heap = Heap::new();

    assert!(heap.is_empty());
    assert_eq!(heap.allocate(HeapObject::new()), 1);
    assert_eq!(heap.allocate(HeapObject::new()), 2);
    assert!(heap.has_object(2));
    assert!(!heap.has_object(3));
    assert_eq!(heap.len(), 2);
}

#[test]
fn test_allocations_reach_the_heap() {
    let program = load_program(
        "type Pt var x = 0 end fun int main() var a = new Pt\nvar b = new Pt\nreturn 0 end".to_string(),
        None,
    )
    .unwrap();
    let mut output = Vec::new();
    let mut interpreter = Interpreter::new(&program, "".as_bytes(), &mut output);

    assert_eq!(interpreter.run().unwrap(), 0);
    assert_eq!(interpreter.heap().len(), 2);
    assert_eq!(
        interpreter.heap().get(1).and_then(|object| object.get("x")),
        Some(&Value::Int(0))
    );
}

#[test]
fn test_format_double() {
    assert_eq!(format_double(5.3), "5.3");
    assert_eq!(format_double(5.0), "5.0");
    assert_eq!(format_double(0.125), "0.125");
    assert_eq!(format_double(-2.5), "-2.5");
    assert_eq!(format_double(1.0 / 3.0), "0.333333");
}

#[test]
fn test_expand_escapes() {
    assert_eq!(expand_escapes("a\\nb"), "a\nb");
    assert_eq!(expand_escapes("\\t\\t"), "\t\t");
    assert_eq!(expand_escapes("plain"), "plain");
}

#[test]
fn test_built_in_names() {
    assert!(is_built_in("print"));
    assert!(is_built_in("read"));
    assert!(!is_built_in("main"));
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Double(2.0).to_string(), "2.0");
    assert_eq!(Value::Object(3).to_string(), "<object 3>");
    assert_eq!(Value::Char('z').type_name(), "char");
}

#[test]
fn test_field_initialiser_sees_earlier_fields() {
    let source = "type T var a: int = 1 var b: int = a + 1 end\n\
                  fun int main() var t: T = new T\nreturn t.b end";

    assert_eq!(run(source).0.unwrap(), 2);
}

#[test]
fn test_field_initialiser_ignores_caller_locals() {
    let source = "type T var a: int = 1 var b: int = a end\n\
                  fun int main() var a: string = \"oops\"\nvar t: T = new T\nvar n: int = t.b\n\
                  print(itos(n))\nreturn n end";
    let (result, output) = run(source);

    assert_eq!(result.unwrap(), 1);
    assert_eq!(output, "1");
}

#[test]
fn test_new_inside_a_function_restores_its_locals() {
    let source = "type T var a: int = 5 end\n\
                  fun int make(x: int) var t = new T\nreturn x + t.a end\n\
                  fun int main() var y = 10\nvar total = make(1)\nreturn total + y end";

    assert_eq!(run(source).0.unwrap(), 16);
}
