//! Crate-level instruction-behavior matrix and the worked end-to-end
//! scenarios, run through `Interpreter::run` rather than by calling
//! instruction functions directly.

#![cfg(test)]

use crate::code::Code;
use crate::config::Options;
use crate::interpreter::Interpreter;

fn interp() -> Interpreter {
    Interpreter::new(Options::default())
}

#[test]
fn scenario_one_bare_literals() {
    let mut i = interp();
    i.run("3 3.1415926535 FALSE TRUE").unwrap();
    assert_eq!(i.pop_boolean(), Some(true));
    assert_eq!(i.pop_boolean(), Some(false));
    assert_eq!(i.pop_float(), Some(3.1415926535));
    assert_eq!(i.pop_integer(), Some(3));
}

#[test]
fn scenario_two_mixed_arithmetic() {
    let mut i = interp();
    i.run("( 2 3 INTEGER.* 4.1 5.2 FLOAT.+ TRUE FALSE BOOLEAN.OR )")
        .unwrap();
    assert_eq!(i.pop_boolean(), Some(true));
    assert!((i.pop_float().unwrap() - 9.3).abs() < 1e-9);
    assert_eq!(i.pop_integer(), Some(6));
}

#[test]
fn scenario_four_integer_define_binds_a_name() {
    let mut i = interp();
    i.run("2 a INTEGER.DEFINE").unwrap();
    i.run("a").unwrap();
    assert_eq!(i.pop_integer(), Some(2));
}

#[test]
fn scenario_five_code_do_range_accumulates() {
    let mut i = interp();
    i.push_integer(10);
    i.run("0 3 CODE.QUOTE INTEGER.+ CODE.DO*RANGE").unwrap();
    assert_eq!(i.pop_integer(), Some(16));
}

#[test]
fn scenario_six_code_rand_is_reproducible_under_a_fixed_seed() {
    let mut options = Options::default();
    options.random_seed = 1138;
    let mut i = Interpreter::new(options.clone());
    let mut j = Interpreter::new(options);
    i.run("25 CODE.RAND").unwrap();
    j.run("25 CODE.RAND").unwrap();
    assert_eq!(i.pop_code("code"), j.pop_code("code"));
}

#[test]
fn no_op_sequences_leave_stacks_untouched() {
    let mut i = interp();
    i.push_integer(5);
    i.push_integer(0);
    // Division by zero is a no-op: the stack is bitwise unchanged.
    i.run("INTEGER./ INTEGER./ INTEGER./").unwrap();
    assert_eq!(i.stack_len("integer"), 2);
    assert_eq!(i.pop_integer(), Some(0));
    assert_eq!(i.pop_integer(), Some(5));
}

#[test]
fn shove_then_yank_restores_prior_order() {
    let mut i = interp();
    i.push_integer(1);
    i.push_integer(2);
    i.push_integer(3);
    // The index for SHOVE/YANK always comes off the integer stack itself,
    // so shoving the top item to depth 2 and then yanking from depth 2
    // round-trips back to the original order.
    i.run("2 INTEGER.SHOVE").unwrap();
    i.run("2 INTEGER.YANK").unwrap();
    assert_eq!(i.pop_integer(), Some(3));
    assert_eq!(i.pop_integer(), Some(2));
    assert_eq!(i.pop_integer(), Some(1));
}

#[test]
fn unknown_instruction_on_a_disabled_stack_fails() {
    let mut options = Options::default();
    options.allowed_types.remove("code");
    let mut i = Interpreter::new(options);
    assert!(i.run("CODE.POP").is_err());
}

#[test]
fn code_instructions_lists_the_enabled_instruction_set() {
    let mut i = interp();
    i.run("CODE.INSTRUCTIONS").unwrap();
    let listed = i.pop_code("code").unwrap();
    assert!(listed.is_list());
    assert!(listed.length() > 0);
}

#[test]
fn exec_y_combinator_is_bounded_by_the_step_limit() {
    let mut options = Options::default();
    options.eval_push_limit = 50;
    let mut i = Interpreter::new(options);
    i.push_exec(Code::atom("INTEGER.POP"));
    assert!(i.run("EXEC.Y").is_err());
}
