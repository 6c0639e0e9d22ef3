/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and top level declarations
/// - expressions: Expressions, terms and rvalues
/// - statements: Declarations bodies and statements
pub mod ast;
pub mod expressions;
pub mod statements;
