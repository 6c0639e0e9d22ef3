use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Decl, Program},
        expressions::{CallExpr, Expr, RValue, Term},
        statements::{AssignStmt, ForStmt, FunDecl, IfStmt, Stmt, TypeDecl, VarDeclStmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    symbol_table::symbol_table::{EnvironmentId, SymbolTable},
    Position,
};

use super::types::{
    is_legal_op, is_primitive, result_type, TypeInfo, BOOL, CHAR, DOUBLE, INT, NIL,
    RETURN_BINDING, STRING,
};

#[derive(Debug, Default)]
pub struct TypeChecker {
    sym_table: SymbolTable<TypeInfo>,
    /// Functions and record shapes live here and nowhere else.
    global_env_id: EnvironmentId,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            sym_table: SymbolTable::new(),
            global_env_id: 0,
        }
    }

    fn register_built_ins(&mut self) -> Result<(), Error> {
        let built_ins: [(&str, &[&str]); 8] = [
            ("print", &[STRING, NIL]),
            ("stoi", &[STRING, INT]),
            ("stod", &[STRING, DOUBLE]),
            ("itos", &[INT, STRING]),
            ("dtos", &[DOUBLE, STRING]),
            ("get", &[INT, STRING, CHAR]),
            ("length", &[STRING, INT]),
            ("read", &[STRING]),
        ];

        for (name, signature) in built_ins {
            let signature = signature.iter().map(|ty| ty.to_string()).collect();
            self.sym_table
                .add_name(name, TypeInfo::Function(signature), &Position::null())?;
        }

        Ok(())
    }

    pub fn check_program(&mut self, program: &mut Program) -> Result<(), Error> {
        self.global_env_id = self.sym_table.push_environment();
        self.register_built_ins()?;

        for decl in program.decls.iter_mut() {
            match decl {
                Decl::Fun(fun_decl) => self.check_fun_decl(fun_decl)?,
                Decl::Type(type_decl) => self.check_type_decl(type_decl)?,
            }
        }

        self.check_main()?;
        self.sym_table.pop_environment();

        Ok(())
    }

    fn check_main(&self) -> Result<(), Error> {
        match self.sym_table.get_info("main") {
            Some(TypeInfo::Function(signature)) => {
                if signature.len() != 1 {
                    Err(Error::without_position(ErrorImpl::MalformedMain {
                        reason: String::from("cannot take parameters"),
                    }))
                } else if signature[0] != INT {
                    Err(Error::without_position(ErrorImpl::MalformedMain {
                        reason: String::from("must return int"),
                    }))
                } else {
                    Ok(())
                }
            }
            _ => Err(Error::without_position(ErrorImpl::MissingMain)),
        }
    }

    fn check_fun_decl(&mut self, fun_decl: &mut FunDecl) -> Result<(), Error> {
        let name = fun_decl.id.value.clone();
        trace!(function = %name, "checking function");

        if self.sym_table.name_exists_in_current(&name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared { function: name },
                fun_decl.id.position(),
            ));
        }

        if fun_decl.return_type.kind != TokenKind::Nil {
            self.check_type_name(&fun_decl.return_type)?;
        }
        for param in &fun_decl.params {
            self.check_type_name(&param.data_type)?;
        }

        let return_type = fun_decl.return_type.value.clone();
        let mut signature: Vec<String> = fun_decl
            .params
            .iter()
            .map(|param| param.data_type.value.clone())
            .collect();
        signature.push(return_type.clone());

        // Recorded before the body so recursive calls resolve.
        self.sym_table
            .add_name(&name, TypeInfo::Function(signature), &fun_decl.id.position())?;

        self.sym_table.push_environment();
        self.sym_table.add_name(
            RETURN_BINDING,
            TypeInfo::Variable(return_type),
            &fun_decl.return_type.position(),
        )?;

        for param in &fun_decl.params {
            self.sym_table.add_name(
                &param.id.value,
                TypeInfo::Variable(param.data_type.value.clone()),
                &param.id.position(),
            )?;
        }

        let result = self.check_stmts(&mut fun_decl.stmts);
        self.sym_table.pop_environment();

        result
    }

    fn check_type_decl(&mut self, type_decl: &mut TypeDecl) -> Result<(), Error> {
        let name = type_decl.id.value.clone();

        if self.sym_table.name_exists_in_current(&name) {
            return Err(Error::new(
                ErrorImpl::TypeAlreadyDeclared { name },
                type_decl.id.position(),
            ));
        }

        // Bound up front so fields may refer to the type being declared.
        self.sym_table.add_name(
            &name,
            TypeInfo::Record(HashMap::new()),
            &type_decl.id.position(),
        )?;

        self.sym_table.push_environment();
        let mut fields = HashMap::new();
        for vdecl in type_decl.vdecls.iter_mut() {
            match self.check_var_decl(vdecl) {
                Ok(field_type) => {
                    fields.insert(vdecl.id.value.clone(), field_type);
                }
                Err(error) => {
                    self.sym_table.pop_environment();
                    return Err(error);
                }
            }
        }
        self.sym_table.pop_environment();

        self.sym_table
            .set_info_in(self.global_env_id, &name, TypeInfo::Record(fields));

        Ok(())
    }

    fn check_stmts(&mut self, stmts: &mut [Stmt]) -> Result<(), Error> {
        for stmt in stmts.iter_mut() {
            self.check_stmt(stmt)?;
        }

        Ok(())
    }

    /// Checks `stmts` in a fresh environment.
    fn check_block(&mut self, stmts: &mut [Stmt]) -> Result<(), Error> {
        self.sym_table.push_environment();
        let result = self.check_stmts(stmts);
        self.sym_table.pop_environment();

        result
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) -> Result<(), Error> {
        match stmt {
            Stmt::VarDecl(var_decl) => {
                self.check_var_decl(var_decl)?;
            }
            Stmt::Assign(assign) => self.check_assign(assign)?,
            Stmt::Call(call) => {
                self.check_call(call)?;
            }
            Stmt::If(if_stmt) => self.check_if(if_stmt)?,
            Stmt::While(while_stmt) => {
                self.check_condition(&while_stmt.condition)?;
                self.check_block(&mut while_stmt.stmts)?;
            }
            Stmt::For(for_stmt) => {
                self.sym_table.push_environment();
                let result = self.check_for(for_stmt);
                self.sym_table.pop_environment();
                result?;
            }
            Stmt::Return(return_stmt) => {
                let returned = self.check_expr(&return_stmt.expr)?;
                let expected = match self.sym_table.get_info(RETURN_BINDING) {
                    Some(TypeInfo::Variable(expected)) => expected.clone(),
                    _ => NIL.to_string(),
                };

                if returned != expected {
                    return Err(Error::new(
                        ErrorImpl::TypeMatchError {
                            expected,
                            received: returned,
                        },
                        return_stmt.expr.first_token().position(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn check_var_decl(&mut self, var_decl: &mut VarDeclStmt) -> Result<String, Error> {
        let name = var_decl.id.value.clone();

        if self.sym_table.name_exists_in_current(&name) {
            return Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared { variable: name },
                var_decl.id.position(),
            ));
        }

        if let Some(data_type) = &var_decl.data_type {
            self.check_type_name(data_type)?;
        }

        let inferred = match &var_decl.expr {
            Some(expr) => Some(self.check_expr(expr)?),
            None => None,
        };

        let resolved = match (&var_decl.data_type, inferred) {
            (Some(declared), Some(inferred)) => {
                if inferred != NIL && inferred != declared.value {
                    let position = var_decl
                        .expr
                        .as_ref()
                        .map(|expr| expr.first_token().position())
                        .unwrap_or_else(|| var_decl.id.position());

                    return Err(Error::new(
                        ErrorImpl::TypeMatchError {
                            expected: declared.value.clone(),
                            received: inferred,
                        },
                        position,
                    ));
                }
                declared.value.clone()
            }
            (Some(declared), None) => declared.value.clone(),
            (None, Some(inferred)) => inferred,
            (None, None) => NIL.to_string(),
        };

        self.sym_table.add_name(
            &name,
            TypeInfo::Variable(resolved.clone()),
            &var_decl.id.position(),
        )?;
        var_decl.resolved_type = Some(resolved.clone());

        Ok(resolved)
    }

    fn check_assign(&mut self, assign: &AssignStmt) -> Result<(), Error> {
        let rhs = self.check_expr(&assign.expr)?;
        let head = &assign.lvalue[0];
        let head_type = self.variable_type(head)?;

        if assign.lvalue.len() == 1 {
            if head_type == NIL && rhs != NIL {
                self.sym_table
                    .set_info(&head.value, TypeInfo::Variable(rhs));
                return Ok(());
            }

            return self.check_assignable(&head_type, &rhs, &assign.expr);
        }

        let mut owner = head_type.clone();
        let mut target = head_type;
        for segment in &assign.lvalue[1..] {
            owner = target;
            target = self.field_type(&owner, segment)?;
        }

        if target == NIL && rhs != NIL {
            let fields = self.record_fields(&owner).cloned();

            if let (Some(mut fields), Some(field)) = (fields, assign.lvalue.last()) {
                fields.insert(field.value.clone(), rhs);
                self.sym_table
                    .set_info_in(self.global_env_id, &owner, TypeInfo::Record(fields));
            }
            return Ok(());
        }

        self.check_assignable(&target, &rhs, &assign.expr)
    }

    fn check_assignable(&self, target: &str, rhs: &str, expr: &Expr) -> Result<(), Error> {
        if rhs != NIL && rhs != target {
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: target.to_string(),
                    received: rhs.to_string(),
                },
                expr.first_token().position(),
            ));
        }

        Ok(())
    }

    fn check_if(&mut self, if_stmt: &mut IfStmt) -> Result<(), Error> {
        let branches = std::iter::once(&mut if_stmt.if_part).chain(if_stmt.else_ifs.iter_mut());

        for branch in branches {
            self.check_condition(&branch.condition)?;
            self.check_block(&mut branch.stmts)?;
        }

        if let Some(else_stmts) = &mut if_stmt.else_stmts {
            self.check_block(else_stmts)?;
        }

        Ok(())
    }

    /// Runs inside the loop's own environment, which holds the loop variable.
    fn check_for(&mut self, for_stmt: &mut ForStmt) -> Result<(), Error> {
        self.expect_type(&for_stmt.start, INT)?;
        self.sym_table.add_name(
            &for_stmt.var_id.value,
            TypeInfo::Variable(INT.to_string()),
            &for_stmt.var_id.position(),
        )?;
        self.expect_type(&for_stmt.end, INT)?;

        self.check_block(&mut for_stmt.stmts)
    }

    fn check_condition(&self, condition: &Expr) -> Result<(), Error> {
        self.expect_type(condition, BOOL)
    }

    fn expect_type(&self, expr: &Expr, expected: &str) -> Result<(), Error> {
        let received = self.check_expr(expr)?;

        if received != expected {
            return Err(Error::new(
                ErrorImpl::TypeMatchError {
                    expected: expected.to_string(),
                    received,
                },
                expr.first_token().position(),
            ));
        }

        Ok(())
    }

    pub fn check_expr(&self, expr: &Expr) -> Result<String, Error> {
        let lhs = self.check_term(&expr.first)?;

        let expr_type = match (&expr.op, &expr.rest) {
            (Some(op), Some(rest)) => {
                let rhs = self.check_expr(rest)?;

                if !is_legal_op(&op.value, &lhs, &rhs) {
                    return Err(Error::new(
                        ErrorImpl::IllegalOperator {
                            operator: op.value.clone(),
                            lhs,
                            rhs,
                        },
                        op.position(),
                    ));
                }

                result_type(&op.value, &lhs, &rhs)
            }
            _ => lhs,
        };

        if expr.negated {
            check_negatable(&expr_type, expr.first_token())?;
        }

        Ok(expr_type)
    }

    fn check_term(&self, term: &Term) -> Result<String, Error> {
        match term {
            Term::Simple(rvalue) => self.check_rvalue(rvalue),
            Term::Complex(expr) => self.check_expr(expr),
        }
    }

    fn check_rvalue(&self, rvalue: &RValue) -> Result<String, Error> {
        match rvalue {
            RValue::Simple(simple) => match simple.value.kind {
                TokenKind::Int => Ok(INT.to_string()),
                TokenKind::Double => Ok(DOUBLE.to_string()),
                TokenKind::Bool => Ok(BOOL.to_string()),
                TokenKind::Char => Ok(CHAR.to_string()),
                TokenKind::String => Ok(STRING.to_string()),
                TokenKind::Nil => Ok(NIL.to_string()),
                _ => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: simple.value.value.clone(),
                    },
                    simple.value.position(),
                )),
            },
            RValue::New(new) => match self.record_fields(&new.type_id.value) {
                Some(_) => Ok(new.type_id.value.clone()),
                None => Err(Error::new(
                    ErrorImpl::UnknownType {
                        type_: new.type_id.value.clone(),
                    },
                    new.type_id.position(),
                )),
            },
            RValue::Call(call) => self.check_call(call),
            RValue::Id(id) => {
                let mut current = self.variable_type(&id.path[0])?;
                for segment in &id.path[1..] {
                    current = self.field_type(&current, segment)?;
                }
                Ok(current)
            }
            RValue::Negated(negated) => {
                let expr_type = self.check_expr(&negated.expr)?;
                check_negatable(&expr_type, negated.expr.first_token())?;
                Ok(expr_type)
            }
        }
    }

    fn check_call(&self, call: &CallExpr) -> Result<String, Error> {
        let name = &call.function_id;
        let undefined = || {
            Error::new(
                ErrorImpl::UndefinedFunction {
                    function: name.value.clone(),
                },
                name.position(),
            )
        };

        let Some(TypeInfo::Function(signature)) = self.sym_table.get_info(&name.value) else {
            return Err(undefined());
        };
        let Some((return_type, params)) = signature.split_last() else {
            return Err(undefined());
        };

        if call.args.len() < params.len() {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    expected: params.len(),
                    received: call.args.len(),
                },
                name.position(),
            ));
        } else if call.args.len() > params.len() {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    expected: params.len(),
                    received: call.args.len(),
                },
                name.position(),
            ));
        }

        for (arg, expected) in call.args.iter().zip(params) {
            let received = self.check_expr(arg)?;

            if &received != expected {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        expected: expected.clone(),
                        received,
                    },
                    arg.first_token().position(),
                ));
            }
        }

        Ok(return_type.clone())
    }

    fn variable_type(&self, id: &Token) -> Result<String, Error> {
        match self.sym_table.get_info(&id.value) {
            Some(TypeInfo::Variable(var_type)) => Ok(var_type.clone()),
            _ => Err(Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: id.value.clone(),
                },
                id.position(),
            )),
        }
    }

    fn field_type(&self, record: &str, field: &Token) -> Result<String, Error> {
        let unknown = || {
            Error::new(
                ErrorImpl::UnknownField {
                    field: field.value.clone(),
                    record: record.to_string(),
                },
                field.position(),
            )
        };

        match self.record_fields(record) {
            Some(fields) => fields.get(&field.value).cloned().ok_or_else(unknown),
            None => Err(unknown()),
        }
    }

    /// Field map of the record type `name`. Record types are only ever bound
    /// globally, so a local variable spelled like a type cannot hide one.
    fn record_fields(&self, name: &str) -> Option<&HashMap<String, String>> {
        match self.sym_table.get_info_in(self.global_env_id, name) {
            Some(TypeInfo::Record(fields)) => Some(fields),
            _ => None,
        }
    }

    /// A declared type must be a primitive or a record declared so far.
    fn check_type_name(&self, type_id: &Token) -> Result<(), Error> {
        if is_primitive(&type_id.value) || self.record_fields(&type_id.value).is_some() {
            return Ok(());
        }

        Err(Error::new(
            ErrorImpl::UnknownType {
                type_: type_id.value.clone(),
            },
            type_id.position(),
        ))
    }
}

fn check_negatable(expr_type: &str, token: &Token) -> Result<(), Error> {
    if matches!(expr_type, BOOL | INT | DOUBLE) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::IllegalNegation {
                received: expr_type.to_string(),
            },
            token.position(),
        ))
    }
}

/// Checks `program`, filling in the resolved type of every variable declaration.
pub fn type_check(program: &mut Program) -> Result<(), Error> {
    debug!("Type checking {} declarations", program.decls.len());

    let mut type_checker = TypeChecker::new();
    type_checker.check_program(program)?;

    debug!("Finished type checking");
    Ok(())
}
