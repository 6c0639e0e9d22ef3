//! Integration tests for the whole pipeline.
//!
//! These tests drive programs from source text through lexing, parsing, type
//! checking and interpretation using only the public API.

use mypl::{
    errors::errors::{Error, ErrorImpl, ErrorPhase},
    interpreter::interpreter::Interpreter,
    lexer::lexer::tokenize,
    lexer::tokens::TokenKind,
    load_program,
};

fn run_program(source: &str, input: &str) -> Result<(i32, String), Error> {
    let program = load_program(source.to_string(), Some("test.mypl".to_string()))?;
    let mut output = Vec::new();

    let code = Interpreter::new(&program, input.as_bytes(), &mut output).run()?;

    Ok((code, String::from_utf8(output).unwrap()))
}

fn phase_of(source: &str) -> ErrorPhase {
    run_program(source, "").unwrap_err().get_phase()
}

#[test]
fn test_record_program_exits_with_field_value() {
    let source = "type Pt var x:int=0 var y:int=0 end\n\
                  fun int main() var p:Pt=new Pt p.x=3 return p.x end";

    assert_eq!(run_program(source, "").unwrap(), (3, String::new()));
}

#[test]
fn test_for_loop_program_prints_and_exits_zero() {
    let source = "fun int main() var i:int for i=1 to 3 do print(itos(i)) end return 0 end";

    assert_eq!(run_program(source, "").unwrap(), (0, "123".to_string()));
}

#[test]
fn test_dtos_keeps_one_fractional_digit() {
    let source = "fun int main() print(dtos(5.30)) print(\",\") print(dtos(5.00)) return 0 end";

    assert_eq!(run_program(source, "").unwrap().1, "5.3,5.0");
}

#[test]
fn test_right_leaning_concatenation() {
    let source = "fun int main() print(\"a\" + \"b\" + \"c\") return 0 end";

    assert_eq!(run_program(source, "").unwrap().1, "abc");
}

#[test]
fn test_integer_division_and_remainder() {
    let source = "fun int main()\n\
                    var a = neg 9\n\
                    print(itos(a / 4) + \" \" + itos(a % 4) + \" \" + itos(9 / 4) + \" \" + itos(9 % 4))\n\
                    return 0\n\
                  end";

    assert_eq!(run_program(source, "").unwrap().1, "-2 -1 2 1");
}

#[test]
fn test_literal_lexemes_survive() {
    let tokens = tokenize("3.140 0 0.5 'c' \"s\"".to_string(), None).unwrap();
    let lexemes: Vec<(TokenKind, &str)> = tokens
        .iter()
        .map(|token| (token.kind, token.value.as_str()))
        .collect();

    assert_eq!(
        lexemes,
        vec![
            (TokenKind::Double, "3.140"),
            (TokenKind::Int, "0"),
            (TokenKind::Double, "0.5"),
            (TokenKind::Char, "c"),
            (TokenKind::String, "s"),
            (TokenKind::EOF, "EOF"),
        ]
    );
}

#[test]
fn test_errors_stop_the_pipeline_at_their_phase() {
    assert_eq!(phase_of("fun int main() var x = 01 return 0 end"), ErrorPhase::Lexical);
    assert_eq!(phase_of("fun int main() var = 1 return 0 end"), ErrorPhase::Syntax);
    assert_eq!(phase_of("fun int main() var x = 1 var x = 2 return 0 end"), ErrorPhase::Semantic);
    assert_eq!(phase_of("fun int main() var z = 0 return 1 / z end"), ErrorPhase::Runtime);
}

#[test]
fn test_program_without_main_is_rejected() {
    let error = run_program("fun int start() return 0 end", "").unwrap_err();

    assert_eq!(error.get_internal_error(), &ErrorImpl::MissingMain);
}

#[test]
fn test_shadowing_in_nested_scopes() {
    let source = "fun int main()\n\
                    var x: int = 1\n\
                    var passes = 0\n\
                    while passes < 2 do\n\
                      var x: int = 10\n\
                      print(itos(x))\n\
                      passes = passes + 1\n\
                    end\n\
                    return x\n\
                  end";

    assert_eq!(run_program(source, "").unwrap(), (1, "1010".to_string()));

    let source = "fun int main()\n\
                    var x: int = 1\n\
                    if x == 1 then\n\
                      var x: int = 10\n\
                      print(itos(x))\n\
                    end\n\
                    return x\n\
                  end";

    assert_eq!(run_program(source, "").unwrap(), (1, "10".to_string()));
}

#[test]
fn test_callee_cannot_observe_caller_locals() {
    let rejected = "fun int peek() return secret end\n\
                    fun int main() var secret = 7 return peek() end";

    assert_eq!(
        run_program(rejected, "").unwrap_err().get_internal_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "secret".to_string()
        }
    );

    let source = "fun int peek() var secret = 1 return secret end\n\
                  fun int main() var secret = 7 return secret * 10 + peek() end";

    assert_eq!(run_program(source, "").unwrap().0, 71);
}

#[test]
fn test_linked_list() {
    let source = "type Node\n\
                    var value: int = 0\n\
                    var next: Node = nil\n\
                  end\n\
                  fun Node push(head: Node, value: int)\n\
                    var node = new Node\n\
                    node.value = value\n\
                    node.next = head\n\
                    return node\n\
                  end\n\
                  fun int main()\n\
                    var head: Node = nil\n\
                    for i = 1 to 4 do head = push(head, i) end\n\
                    var sum = 0\n\
                    while head != nil do\n\
                      print(itos(head.value))\n\
                      sum = sum + head.value\n\
                      head = head.next\n\
                    end\n\
                    return sum\n\
                  end";

    assert_eq!(run_program(source, "").unwrap(), (10, "4321".to_string()));
}

#[test]
fn test_echo_input() {
    let source = "fun int main()\n\
                    var name = read()\n\
                    print(\"hello, \" + name + \"\\n\")\n\
                    return length(name)\n\
                  end";

    assert_eq!(
        run_program(source, "world\n").unwrap(),
        (5, "hello, world\n".to_string())
    );
}

#[test]
fn test_string_walk_with_get() {
    let source = "fun string reverse(s: string)\n\
                    var out = \"\"\n\
                    for i = 1 to length(s) do\n\
                      out = get(i - 1, s) + out\n\
                    end\n\
                    return out\n\
                  end\n\
                  fun int main() print(reverse(\"abc\")) return 0 end";

    assert_eq!(run_program(source, "").unwrap().1, "cba");
}
