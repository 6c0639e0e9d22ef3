use std::{
    cmp::Ordering,
    collections::HashMap,
    io::{self, BufRead, Write},
    iter,
};

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::Program,
        expressions::{CallExpr, Expr, NewRValue, RValue, Term},
        statements::{ForStmt, FunDecl, IfStmt, Stmt, TypeDecl},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    symbol_table::symbol_table::{EnvironmentId, SymbolTable},
    Position, Span,
};

use super::{
    builtins::{call_built_in, is_built_in},
    heap::{Heap, HeapObject, ObjectId},
    value::Value,
};

/// Outcome of running a statement: either keep going or unwind to the caller
/// with the returned value.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Returned(Value),
}

/// Tree-walking interpreter over a checked [`Program`].
///
/// Variables live in a [`SymbolTable`] of values; record instances live on
/// the [`Heap`] and variables only hold their ids. Every call runs in a fresh
/// child of the global environment, so callees never see caller locals.
pub struct Interpreter<'a, R: BufRead, W: Write> {
    sym_table: SymbolTable<Value>,
    heap: Heap,
    functions: HashMap<&'a str, &'a FunDecl>,
    types: HashMap<&'a str, &'a TypeDecl>,
    global_env_id: EnvironmentId,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Interpreter<'a, R, W> {
    pub fn new(program: &'a Program, input: R, output: W) -> Self {
        let mut sym_table = SymbolTable::new();
        let global_env_id = sym_table.push_environment();

        let functions = program
            .fun_decls()
            .map(|fun_decl| (fun_decl.id.value.as_str(), fun_decl))
            .collect();
        let types = program
            .type_decls()
            .map(|type_decl| (type_decl.id.value.as_str(), type_decl))
            .collect();

        Interpreter {
            sym_table,
            heap: Heap::new(),
            functions,
            types,
            global_env_id,
            input,
            output,
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Calls `main` with no arguments and turns its result into an exit
    /// code. A `nil` result exits with 0.
    pub fn run(&mut self) -> Result<i32, Error> {
        let main = CallExpr {
            function_id: Token {
                kind: TokenKind::Identifier,
                value: String::from("main"),
                span: Span {
                    start: Position::null(),
                    end: Position::null(),
                },
            },
            args: vec![],
        };

        if !self.functions.contains_key("main") {
            return Err(Error::without_position(ErrorImpl::UndefinedName {
                name: String::from("main"),
            }));
        }

        let result = self.call(&main)?;
        debug!(objects = self.heap.len(), "program finished");

        match result {
            Value::Int(code) => Ok(code),
            Value::Nil => Ok(0),
            other => Err(Error::without_position(ErrorImpl::InvalidExitValue {
                received: other.type_name().to_string(),
            })),
        }
    }

    fn exec_stmts(&mut self, stmts: &[Stmt]) -> Result<Flow, Error> {
        for stmt in stmts {
            if let Flow::Returned(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Returned(value));
            }
        }

        Ok(Flow::Continue)
    }

    /// Runs `stmts` in a fresh child environment that is popped on every
    /// exit path, including errors and early returns.
    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, Error> {
        self.sym_table.push_environment();
        let result = self.exec_stmts(stmts);
        self.sym_table.pop_environment();

        result
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, Error> {
        match stmt {
            Stmt::VarDecl(var_decl) => {
                let value = match &var_decl.expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                self.sym_table
                    .add_name(&var_decl.id.value, value, &var_decl.id.position())?;
            }
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.expr)?;
                self.assign(&assign.lvalue, value)?;
            }
            Stmt::Call(call) => {
                self.call(call)?;
            }
            Stmt::If(if_stmt) => return self.exec_if(if_stmt),
            Stmt::While(while_stmt) => {
                while self.eval_condition(&while_stmt.condition)? {
                    if let Flow::Returned(value) = self.exec_block(&while_stmt.stmts)? {
                        return Ok(Flow::Returned(value));
                    }
                }
            }
            Stmt::For(for_stmt) => {
                self.sym_table.push_environment();
                let result = self.exec_for(for_stmt);
                self.sym_table.pop_environment();

                return result;
            }
            Stmt::Return(return_stmt) => {
                return Ok(Flow::Returned(self.eval_expr(&return_stmt.expr)?));
            }
        }

        Ok(Flow::Continue)
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> Result<Flow, Error> {
        for branch in iter::once(&if_stmt.if_part).chain(&if_stmt.else_ifs) {
            if self.eval_condition(&branch.condition)? {
                return self.exec_block(&branch.stmts);
            }
        }

        match &if_stmt.else_stmts {
            Some(stmts) => self.exec_block(stmts),
            None => Ok(Flow::Continue),
        }
    }

    /// Bounds are inclusive. The loop variable is read back after every pass,
    /// so assignments to it inside the body affect the iteration.
    fn exec_for(&mut self, for_stmt: &ForStmt) -> Result<Flow, Error> {
        let var_id = &for_stmt.var_id;
        let start = self.eval_expr(&for_stmt.start)?;
        self.sym_table
            .add_name(&var_id.value, start, &var_id.position())?;

        let end = self.eval_expr(&for_stmt.end)?;
        let end = expect_int(&end, for_stmt.end.first_token())?;

        loop {
            let current = self.loop_counter(var_id)?;
            if current > end {
                break;
            }

            if let Flow::Returned(value) = self.exec_block(&for_stmt.stmts)? {
                return Ok(Flow::Returned(value));
            }

            let current = self.loop_counter(var_id)?;
            match current.checked_add(1) {
                Some(next) => {
                    self.sym_table.set_info(&var_id.value, Value::Int(next));
                }
                None => break,
            }
        }

        Ok(Flow::Continue)
    }

    fn loop_counter(&self, var_id: &Token) -> Result<i32, Error> {
        let value = self.lookup(var_id)?;
        expect_int(&value, var_id)
    }

    fn eval_condition(&mut self, condition: &Expr) -> Result<bool, Error> {
        let value = self.eval_expr(condition)?;

        value.as_bool().ok_or_else(|| {
            Error::new(
                ErrorImpl::UnexpectedValue {
                    expected: String::from("bool"),
                    received: value.type_name().to_string(),
                },
                condition.first_token().position(),
            )
        })
    }

    /// Arguments are evaluated left to right in the caller's environment,
    /// then the body runs in a new child of the global environment.
    fn call(&mut self, call: &CallExpr) -> Result<Value, Error> {
        let function = &call.function_id;

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_expr(arg)?);
        }

        if is_built_in(&function.value) {
            return call_built_in(function, &args, &mut self.input, &mut self.output);
        }

        let fun_decl: &'a FunDecl = match self.functions.get(function.value.as_str()) {
            Some(fun_decl) => *fun_decl,
            None => {
                return Err(Error::new(
                    ErrorImpl::UndefinedName {
                        name: function.value.clone(),
                    },
                    function.position(),
                ))
            }
        };
        trace!(function = %function.value, args = args.len(), "calling function");

        match self.in_global_frame(|interpreter| interpreter.run_body(fun_decl, args))? {
            Flow::Returned(value) => Ok(value),
            Flow::Continue => Ok(Value::Nil),
        }
    }

    /// Runs `body` in a new child of the global environment, then pops it
    /// and reactivates whichever environment was active before.
    fn in_global_frame<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let saved_env_id = self.sym_table.get_environment_id();
        self.sym_table.set_environment_id(self.global_env_id);
        self.sym_table.push_environment();

        let result = body(self);

        self.sym_table.pop_environment();
        if let Some(saved_env_id) = saved_env_id {
            self.sym_table.set_environment_id(saved_env_id);
        }

        result
    }

    fn run_body(&mut self, fun_decl: &FunDecl, args: Vec<Value>) -> Result<Flow, Error> {
        for (param, value) in fun_decl.params.iter().zip(args) {
            self.sym_table
                .add_name(&param.id.value, value, &param.id.position())?;
        }

        self.exec_stmts(&fun_decl.stmts)
    }

    fn assign(&mut self, lvalue: &[Token], value: Value) -> Result<(), Error> {
        let (last, path) = match lvalue.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        if path.is_empty() {
            if !self.sym_table.set_info(&last.value, value) {
                return Err(undefined_name(last));
            }
            return Ok(());
        }

        let mut current = self.lookup(&path[0])?;
        for field in &path[1..] {
            current = self.read_field(&current, field)?;
        }

        let oid = object_id(&current, last)?;
        let object = self
            .heap
            .get_mut(oid)
            .ok_or_else(|| Error::new(ErrorImpl::ObjectNotFound { oid }, last.position()))?;
        object.insert(last.value.clone(), value);

        Ok(())
    }

    fn lookup(&self, id: &Token) -> Result<Value, Error> {
        self.sym_table
            .get_info(&id.value)
            .cloned()
            .ok_or_else(|| undefined_name(id))
    }

    fn read_field(&self, value: &Value, field: &Token) -> Result<Value, Error> {
        let oid = object_id(value, field)?;
        let object = self
            .heap
            .get(oid)
            .ok_or_else(|| Error::new(ErrorImpl::ObjectNotFound { oid }, field.position()))?;

        object
            .get(&field.value)
            .cloned()
            .ok_or_else(|| undefined_name(field))
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> Result<Value, Error> {
        let lhs = self.eval_term(&expr.first)?;

        let value = match (&expr.op, &expr.rest) {
            (Some(op), Some(rest)) => {
                let rhs = self.eval_expr(rest)?;
                apply_binary(op, &lhs, &rhs)?
            }
            _ => lhs,
        };

        if expr.negated {
            negate(value, expr.first_token())
        } else {
            Ok(value)
        }
    }

    fn eval_term(&mut self, term: &Term) -> Result<Value, Error> {
        match term {
            Term::Simple(rvalue) => self.eval_rvalue(rvalue),
            Term::Complex(expr) => self.eval_expr(expr),
        }
    }

    fn eval_rvalue(&mut self, rvalue: &RValue) -> Result<Value, Error> {
        match rvalue {
            RValue::Simple(simple) => literal_value(&simple.value),
            RValue::New(new) => self.instantiate(new),
            RValue::Call(call) => self.call(call),
            RValue::Id(id) => {
                let mut value = self.lookup(&id.path[0])?;
                for field in &id.path[1..] {
                    value = self.read_field(&value, field)?;
                }
                Ok(value)
            }
            RValue::Negated(negated) => {
                let value = self.eval_expr(&negated.expr)?;
                negate(value, negated.expr.first_token())
            }
        }
    }

    /// Field initialisers run in declaration order inside their own child of
    /// the global environment, where each earlier field is already bound.
    /// The caller's locals are not visible to them. Fields without an
    /// initialiser start as `nil`.
    fn instantiate(&mut self, new: &NewRValue) -> Result<Value, Error> {
        let type_decl: &'a TypeDecl = match self.types.get(new.type_id.value.as_str()) {
            Some(type_decl) => *type_decl,
            None => return Err(undefined_name(&new.type_id)),
        };

        let object = self.in_global_frame(|interpreter| {
            let mut object = HeapObject::new();

            for vdecl in &type_decl.vdecls {
                let value = match &vdecl.expr {
                    Some(expr) => interpreter.eval_expr(expr)?,
                    None => Value::Nil,
                };
                interpreter.sym_table.add_name(
                    &vdecl.id.value,
                    value.clone(),
                    &vdecl.id.position(),
                )?;
                object.insert(vdecl.id.value.clone(), value);
            }

            Ok(object)
        })?;

        let oid = self.heap.allocate(object);
        trace!(oid, record = %new.type_id.value, "allocated object");

        Ok(Value::Object(oid))
    }
}

/// Runs `program` against the process's stdin and stdout.
pub fn interpret(program: &Program) -> Result<i32, Error> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut interpreter = Interpreter::new(program, stdin.lock(), stdout.lock());
    interpreter.run()
}

fn undefined_name(id: &Token) -> Error {
    Error::new(
        ErrorImpl::UndefinedName {
            name: id.value.clone(),
        },
        id.position(),
    )
}

fn object_id(value: &Value, field: &Token) -> Result<ObjectId, Error> {
    match value {
        Value::Object(oid) => Ok(*oid),
        Value::Nil => Err(Error::new(
            ErrorImpl::NilDereference {
                field: field.value.clone(),
            },
            field.position(),
        )),
        other => Err(Error::new(
            ErrorImpl::UnexpectedValue {
                expected: String::from("an object"),
                received: other.type_name().to_string(),
            },
            field.position(),
        )),
    }
}

fn expect_int(value: &Value, token: &Token) -> Result<i32, Error> {
    value.as_int().ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedValue {
                expected: String::from("int"),
                received: value.type_name().to_string(),
            },
            token.position(),
        )
    })
}

fn literal_value(token: &Token) -> Result<Value, Error> {
    let parse_error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: token.value.clone(),
            },
            token.position(),
        )
    };

    match token.kind {
        TokenKind::Int => token
            .value
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| parse_error()),
        TokenKind::Double => token
            .value
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| parse_error()),
        TokenKind::Bool => Ok(Value::Bool(token.value == "true")),
        TokenKind::Char => token.value.chars().next().map(Value::Char).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.value.clone(),
                },
                token.position(),
            )
        }),
        TokenKind::String => Ok(Value::Str(token.value.clone())),
        TokenKind::Nil => Ok(Value::Nil),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.position(),
        )),
    }
}

fn negate(value: Value, token: &Token) -> Result<Value, Error> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
        Value::Double(d) => Ok(Value::Double(-d)),
        other => Err(Error::new(
            ErrorImpl::UnexpectedValue {
                expected: String::from("bool, int or double"),
                received: other.type_name().to_string(),
            },
            token.position(),
        )),
    }
}

/// Both operands are always evaluated; `and` and `or` do not short-circuit.
fn apply_binary(op: &Token, lhs: &Value, rhs: &Value) -> Result<Value, Error> {
    let invalid = || {
        Error::new(
            ErrorImpl::InvalidOperands {
                operator: op.value.clone(),
                lhs: lhs.type_name().to_string(),
                rhs: rhs.type_name().to_string(),
            },
            op.position(),
        )
    };

    if lhs.is_nil() || rhs.is_nil() {
        return match op.kind {
            TokenKind::Equals => Ok(Value::Bool(lhs.is_nil() == rhs.is_nil())),
            TokenKind::NotEquals => Ok(Value::Bool(lhs.is_nil() != rhs.is_nil())),
            _ => Err(invalid()),
        };
    }

    match (lhs, rhs) {
        (Value::Int(l), Value::Int(r)) => match op.kind {
            TokenKind::Plus => Ok(Value::Int(l.wrapping_add(*r))),
            TokenKind::Dash => Ok(Value::Int(l.wrapping_sub(*r))),
            TokenKind::Star => Ok(Value::Int(l.wrapping_mul(*r))),
            TokenKind::Slash | TokenKind::Percent if *r == 0 => {
                Err(Error::new(ErrorImpl::DivisionByZero, op.position()))
            }
            TokenKind::Slash => Ok(Value::Int(l.wrapping_div(*r))),
            TokenKind::Percent => Ok(Value::Int(l.wrapping_rem(*r))),
            _ => compare(op, l.partial_cmp(r)).ok_or_else(invalid),
        },
        (Value::Double(l), Value::Double(r)) => match op.kind {
            TokenKind::Plus => Ok(Value::Double(l + r)),
            TokenKind::Dash => Ok(Value::Double(l - r)),
            TokenKind::Star => Ok(Value::Double(l * r)),
            TokenKind::Slash => Ok(Value::Double(l / r)),
            _ => compare(op, l.partial_cmp(r)).ok_or_else(invalid),
        },
        (Value::Bool(l), Value::Bool(r)) => match op.kind {
            TokenKind::And => Ok(Value::Bool(*l && *r)),
            TokenKind::Or => Ok(Value::Bool(*l || *r)),
            TokenKind::Equals => Ok(Value::Bool(l == r)),
            TokenKind::NotEquals => Ok(Value::Bool(l != r)),
            _ => Err(invalid()),
        },
        (Value::Object(l), Value::Object(r)) => match op.kind {
            TokenKind::Equals => Ok(Value::Bool(l == r)),
            TokenKind::NotEquals => Ok(Value::Bool(l != r)),
            _ => Err(invalid()),
        },
        (Value::Str(_) | Value::Char(_), Value::Str(_) | Value::Char(_)) => {
            if op.kind == TokenKind::Plus {
                return Ok(Value::Str(format!("{}{}", lhs, rhs)));
            }

            match (lhs, rhs) {
                (Value::Str(l), Value::Str(r)) => compare(op, l.partial_cmp(r)).ok_or_else(invalid),
                (Value::Char(l), Value::Char(r)) => compare(op, l.partial_cmp(r)).ok_or_else(invalid),
                _ => Err(invalid()),
            }
        }
        _ => Err(invalid()),
    }
}

/// Relational operators over an already computed ordering. `None` when `op`
/// is not relational. An unordered pair (a NaN operand) is only unequal.
fn compare(op: &Token, ordering: Option<Ordering>) -> Option<Value> {
    let result = match op.kind {
        TokenKind::Equals => ordering == Some(Ordering::Equal),
        TokenKind::NotEquals => ordering != Some(Ordering::Equal),
        TokenKind::Less => ordering == Some(Ordering::Less),
        TokenKind::LessEquals => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        TokenKind::Greater => ordering == Some(Ordering::Greater),
        TokenKind::GreaterEquals => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
        _ => return None,
    };

    Some(Value::Bool(result))
}
