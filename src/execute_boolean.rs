use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use rand::Rng;
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("boolean.and".to_string(), Rc::new(and));
    table.insert("boolean.or".to_string(), Rc::new(or));
    table.insert("boolean.not".to_string(), Rc::new(not));
    table.insert("boolean.fromfloat".to_string(), Rc::new(from_float));
    table.insert("boolean.frominteger".to_string(), Rc::new(from_integer));
    table.insert("boolean.rand".to_string(), Rc::new(rand_op));
}

fn binary(interp: &mut Interpreter, op: impl Fn(bool, bool) -> bool) {
    let a = match interp.pop_boolean() {
        Some(v) => v,
        None => return,
    };
    let b = match interp.pop_boolean() {
        Some(v) => v,
        None => {
            interp.push_boolean(a);
            return;
        }
    };
    interp.push_boolean(op(a, b));
}

fn and(interp: &mut Interpreter) {
    binary(interp, |a, b| a && b);
}

fn or(interp: &mut Interpreter) {
    binary(interp, |a, b| a || b);
}

fn not(interp: &mut Interpreter) {
    if let Some(a) = interp.pop_boolean() {
        interp.push_boolean(!a);
    }
}

fn from_float(interp: &mut Interpreter) {
    if let Some(f) = interp.pop_float() {
        interp.push_boolean(f != 0.0);
    }
}

fn from_integer(interp: &mut Interpreter) {
    if let Some(i) = interp.pop_integer() {
        interp.push_boolean(i != 0);
    }
}

fn rand_op(interp: &mut Interpreter) {
    let coin = interp.rng().gen_bool(0.5);
    interp.push_boolean(coin);
}
