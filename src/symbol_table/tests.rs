use std::rc::Rc;

use super::symbol_table::SymbolTable;
use crate::{errors::errors::ErrorImpl, Position};

fn position() -> Position {
    Position::new(1, 1, Rc::new("test.mypl".to_string()))
}

#[test]
fn test_add_and_lookup() {
    let mut table = SymbolTable::new();
    table.push_environment();
    table.add_name("x", 1, &position()).unwrap();

    assert!(table.name_exists("x"));
    assert!(table.name_exists_in_current("x"));
    assert_eq!(table.get_info("x"), Some(&1));
    assert_eq!(table.get_info("y"), None);
}

#[test]
fn test_redeclare_in_same_environment_fails() {
    let mut table = SymbolTable::new();
    table.push_environment();
    table.add_name("x", 1, &position()).unwrap();

    let error = table.add_name("x", 2, &position()).unwrap_err();
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::VariableAlreadyDeclared { variable: "x".to_string() }
    );
    assert_eq!(table.get_info("x"), Some(&1));
}

#[test]
fn test_shadowing_in_child_environment() {
    let mut table = SymbolTable::new();
    table.push_environment();
    table.add_name("x", 1, &position()).unwrap();

    table.push_environment();
    assert!(table.name_exists("x"));
    assert!(!table.name_exists_in_current("x"));
    table.add_name("x", 2, &position()).unwrap();
    assert_eq!(table.get_info("x"), Some(&2));

    table.pop_environment();
    assert_eq!(table.get_info("x"), Some(&1));
}

#[test]
fn test_set_info_updates_nearest_binding() {
    let mut table = SymbolTable::new();
    table.push_environment();
    table.add_name("x", 1, &position()).unwrap();
    table.push_environment();

    assert!(table.set_info("x", 5));
    assert!(!table.set_info("missing", 5));

    table.pop_environment();
    assert_eq!(table.get_info("x"), Some(&5));
}

#[test]
fn test_pop_drops_bindings() {
    let mut table = SymbolTable::new();
    let global = table.push_environment();
    table.push_environment();
    table.add_name("local", 1, &position()).unwrap();
    table.pop_environment();

    assert_eq!(table.get_environment_id(), Some(global));
    assert!(!table.name_exists("local"));
    assert_eq!(table.depth(), 1);
}

#[test]
fn test_switching_to_global_hides_caller_locals() {
    let mut table = SymbolTable::new();
    let global = table.push_environment();
    table.add_name("f", 0, &position()).unwrap();

    table.push_environment();
    table.add_name("caller_local", 1, &position()).unwrap();
    let saved = table.get_environment_id().unwrap();

    table.set_environment_id(global);
    table.push_environment();
    assert!(table.name_exists("f"));
    assert!(!table.name_exists("caller_local"));
    table.pop_environment();

    table.set_environment_id(saved);
    assert_eq!(table.get_info("caller_local"), Some(&1));
}

#[test]
fn test_empty_table_has_no_names() {
    let table: SymbolTable<i32> = SymbolTable::default();

    assert!(!table.name_exists("x"));
    assert!(!table.name_exists_in_current("x"));
    assert_eq!(table.get_environment_id(), None);
}

#[test]
fn test_lookup_in_specific_environment_ignores_shadowing() {
    let mut table = SymbolTable::new();
    let global = table.push_environment();
    table.add_name("Pt", 1, &position()).unwrap();

    table.push_environment();
    table.add_name("Pt", 2, &position()).unwrap();

    assert_eq!(table.get_info("Pt"), Some(&2));
    assert_eq!(table.get_info_in(global, "Pt"), Some(&1));
    assert_eq!(table.get_info_in(global, "missing"), None);
    assert_eq!(table.get_info_in(99, "Pt"), None);

    assert!(table.set_info_in(global, "Pt", 3));
    assert!(!table.set_info_in(global, "missing", 3));
    assert_eq!(table.get_info_in(global, "Pt"), Some(&3));
    assert_eq!(table.get_info("Pt"), Some(&2));
}
