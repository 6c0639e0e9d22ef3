use super::statements::{FunDecl, TypeDecl};

/// The root of a parsed source file.
///
/// Declarations are kept in source order; the type checker relies on that
/// order for its single forward pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn fun_decls(&self) -> impl Iterator<Item = &FunDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Fun(fun_decl) => Some(fun_decl),
            Decl::Type(_) => None,
        })
    }

    pub fn type_decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Type(type_decl) => Some(type_decl),
            Decl::Fun(_) => None,
        })
    }
}

/// Top level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Fun(FunDecl),
    Type(TypeDecl),
}
