use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use rand::Rng;
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("float.+".to_string(), Rc::new(add));
    table.insert("float.-".to_string(), Rc::new(sub));
    table.insert("float.*".to_string(), Rc::new(mul));
    table.insert("float./".to_string(), Rc::new(div));
    table.insert("float.%".to_string(), Rc::new(rem));
    table.insert("float.<".to_string(), Rc::new(lt));
    table.insert("float.>".to_string(), Rc::new(gt));
    table.insert("float.min".to_string(), Rc::new(min));
    table.insert("float.max".to_string(), Rc::new(max));
    table.insert("float.sin".to_string(), Rc::new(sin));
    table.insert("float.cos".to_string(), Rc::new(cos));
    table.insert("float.tan".to_string(), Rc::new(tan));
    table.insert("float.fromboolean".to_string(), Rc::new(from_boolean));
    table.insert("float.frominteger".to_string(), Rc::new(from_integer));
    table.insert("float.rand".to_string(), Rc::new(rand_op));
}

/// Pops `b` (top) then `a` (second) and pushes `op(a, b)`.
fn binary(interp: &mut Interpreter, op: impl Fn(f64, f64) -> f64) {
    let b = match interp.pop_float() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_float() {
        Some(v) => v,
        None => {
            interp.push_float(b);
            return;
        }
    };
    interp.push_float(op(a, b));
}

fn add(interp: &mut Interpreter) {
    binary(interp, |a, b| a + b);
}

fn sub(interp: &mut Interpreter) {
    binary(interp, |a, b| a - b);
}

fn mul(interp: &mut Interpreter) {
    binary(interp, |a, b| a * b);
}

/// Divisor 0.0 is a no-op (stack left exactly as found).
fn div(interp: &mut Interpreter) {
    let b = match interp.pop_float() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_float() {
        Some(v) => v,
        None => {
            interp.push_float(b);
            return;
        }
    };
    if b == 0.0 {
        interp.push_float(a);
        interp.push_float(b);
        return;
    }
    interp.push_float(a / b);
}

/// Floating modulo carrying the sign of the divisor. Divisor 0.0 is a
/// no-op.
fn rem(interp: &mut Interpreter) {
    let b = match interp.pop_float() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_float() {
        Some(v) => v,
        None => {
            interp.push_float(b);
            return;
        }
    };
    if b == 0.0 {
        interp.push_float(a);
        interp.push_float(b);
        return;
    }
    let r = a % b;
    let adjusted = if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r };
    interp.push_float(adjusted);
}

fn lt(interp: &mut Interpreter) {
    let b = match interp.pop_float() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_float() {
        Some(v) => v,
        None => {
            interp.push_float(b);
            return;
        }
    };
    interp.push_boolean(a < b);
}

fn gt(interp: &mut Interpreter) {
    let b = match interp.pop_float() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_float() {
        Some(v) => v,
        None => {
            interp.push_float(b);
            return;
        }
    };
    interp.push_boolean(a > b);
}

fn min(interp: &mut Interpreter) {
    binary(interp, f64::min);
}

fn max(interp: &mut Interpreter) {
    binary(interp, f64::max);
}

fn sin(interp: &mut Interpreter) {
    if let Some(a) = interp.pop_float() {
        interp.push_float(a.sin());
    }
}

fn cos(interp: &mut Interpreter) {
    if let Some(a) = interp.pop_float() {
        interp.push_float(a.cos());
    }
}

fn tan(interp: &mut Interpreter) {
    if let Some(a) = interp.pop_float() {
        interp.push_float(a.tan());
    }
}

fn from_boolean(interp: &mut Interpreter) {
    if let Some(b) = interp.pop_boolean() {
        interp.push_float(if b { 1.0 } else { 0.0 });
    }
}

fn from_integer(interp: &mut Interpreter) {
    if let Some(i) = interp.pop_integer() {
        interp.push_float(i as f64);
    }
}

fn rand_op(interp: &mut Interpreter) {
    let (lo, hi) = {
        let options = interp.options();
        (options.min_random_float, options.max_random_float)
    };
    let value = interp.rng().gen_range(lo..=hi);
    interp.push_float(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn interp() -> Interpreter {
        Interpreter::new(Options::default())
    }

    #[test]
    fn basic_arithmetic() {
        let mut i = interp();
        i.push_float(5.67);
        i.push_float(1.23);
        i.run("FLOAT.-").unwrap();
        assert!((i.pop_float().unwrap() - 4.44).abs() < 1e-9);
    }

    #[test]
    fn division_by_zero_leaves_stack_untouched() {
        let mut i = interp();
        i.push_float(1.0);
        i.push_float(0.0);
        i.run("FLOAT./").unwrap();
        assert_eq!(i.pop_float(), Some(0.0));
        assert_eq!(i.pop_float(), Some(1.0));
    }

    #[test]
    fn scenario_three_arithmetic_chain() {
        // INTEGER.+ runs with only one integer operand available (the
        // float 1.23 does not count) and is a silent no-op.
        let mut i = interp();
        i.run("( 5 1.23 INTEGER.+ ( 4 ) INTEGER.- 5.67 FLOAT.* )")
            .unwrap();
        assert_eq!(i.pop_integer(), Some(1));
        assert!((i.pop_float().unwrap() - 6.9741).abs() < 1e-9);
    }
}
