use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use rand::Rng;
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("integer.+".to_string(), Rc::new(add));
    table.insert("integer.-".to_string(), Rc::new(sub));
    table.insert("integer.*".to_string(), Rc::new(mul));
    table.insert("integer./".to_string(), Rc::new(div));
    table.insert("integer.%".to_string(), Rc::new(rem));
    table.insert("integer.<".to_string(), Rc::new(lt));
    table.insert("integer.>".to_string(), Rc::new(gt));
    table.insert("integer.min".to_string(), Rc::new(min));
    table.insert("integer.max".to_string(), Rc::new(max));
    table.insert("integer.fromboolean".to_string(), Rc::new(from_boolean));
    table.insert("integer.fromfloat".to_string(), Rc::new(from_float));
    table.insert("integer.rand".to_string(), Rc::new(rand_op));
}

/// Pops `b` (top) then `a` (second) and pushes `op(a, b)`. Matches the
/// left-to-right reading of `a b INTEGER.op` as written in source.
fn binary(interp: &mut Interpreter, op: impl Fn(i64, i64) -> i64) {
    let b = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(b);
            return;
        }
    };
    interp.push_integer(op(a, b));
}

fn add(interp: &mut Interpreter) {
    binary(interp, |a, b| a.wrapping_add(b));
}

fn sub(interp: &mut Interpreter) {
    binary(interp, |a, b| a.wrapping_sub(b));
}

fn mul(interp: &mut Interpreter) {
    binary(interp, |a, b| a.wrapping_mul(b));
}

/// Truncated division; divisor 0 is a no-op (both operands consumed and
/// nothing pushed, per SPEC_FULL.md §4.4/§7).
fn div(interp: &mut Interpreter) {
    let b = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(b);
            return;
        }
    };
    if b == 0 {
        interp.push_integer(a);
        interp.push_integer(b);
        return;
    }
    interp.push_integer(a / b);
}

/// Truncated remainder, adjusted to carry the sign of the divisor: `(a % b
/// + b) % b` when the raw remainder and `b` disagree in sign. Divisor 0 is
/// a no-op.
fn rem(interp: &mut Interpreter) {
    let b = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(b);
            return;
        }
    };
    if b == 0 {
        interp.push_integer(a);
        interp.push_integer(b);
        return;
    }
    let r = a % b;
    let adjusted = if r != 0 && (r < 0) != (b < 0) { r + b } else { r };
    interp.push_integer(adjusted);
}

fn lt(interp: &mut Interpreter) {
    let b = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(b);
            return;
        }
    };
    interp.push_boolean(a < b);
}

fn gt(interp: &mut Interpreter) {
    let b = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let a = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(b);
            return;
        }
    };
    interp.push_boolean(a > b);
}

fn min(interp: &mut Interpreter) {
    binary(interp, std::cmp::min);
}

fn max(interp: &mut Interpreter) {
    binary(interp, std::cmp::max);
}

fn from_boolean(interp: &mut Interpreter) {
    if let Some(b) = interp.pop_boolean() {
        interp.push_integer(if b { 1 } else { 0 });
    }
}

fn from_float(interp: &mut Interpreter) {
    if let Some(f) = interp.pop_float() {
        interp.push_integer(f as i64);
    }
}

fn rand_op(interp: &mut Interpreter) {
    let (lo, hi) = {
        let options = interp.options();
        (options.min_random_integer, options.max_random_integer)
    };
    let value = interp.rng().gen_range(lo..=hi);
    interp.push_integer(value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn interp() -> Interpreter {
        Interpreter::new(Options::default())
    }

    #[test]
    fn add_consumes_both_operands_in_written_order() {
        let mut i = interp();
        i.push_integer(5);
        i.push_integer(3);
        i.run("INTEGER.-").unwrap();
        assert_eq!(i.pop_integer(), Some(2));
    }

    #[test]
    fn division_by_zero_is_a_noop() {
        let mut i = interp();
        i.push_integer(5);
        i.push_integer(0);
        i.run("INTEGER./").unwrap();
        assert_eq!(i.pop_integer(), Some(0));
        assert_eq!(i.pop_integer(), Some(5));
    }

    #[test]
    fn remainder_takes_the_sign_of_the_divisor() {
        let mut i = interp();
        i.push_integer(-7);
        i.push_integer(3);
        i.run("INTEGER.%").unwrap();
        assert_eq!(i.pop_integer(), Some(2));
    }

    #[test]
    fn rand_stays_within_configured_bounds() {
        let mut options = Options::default();
        options.min_random_integer = -3;
        options.max_random_integer = 3;
        let mut i = Interpreter::new(options);
        for _ in 0..50 {
            i.run("INTEGER.RAND").unwrap();
            let v = i.pop_integer().unwrap();
            assert!((-3..=3).contains(&v));
        }
    }
}
