use crate::code::Code;
use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use crate::value::Value;
use fnv::FnvHashMap;
use std::rc::Rc;

/// Registers the operations common to every stack (SPEC_FULL.md §4.4): DUP,
/// POP, SWAP, ROT, FLUSH, STACKDEPTH, SHOVE, YANK, YANKDUP, `=`, DEFINE.
/// Each entry closes over `stack_name` and operates through `Interpreter`'s
/// generic `stack`/`stack_mut` accessors, so one implementation serves all
/// six stacks.
pub fn register_common(table: &mut FnvHashMap<String, InstructionFn>, stack_name: &'static str) {
    table.insert(format!("{}.dup", stack_name), closure(stack_name, dup));
    table.insert(format!("{}.pop", stack_name), closure(stack_name, pop));
    table.insert(format!("{}.swap", stack_name), closure(stack_name, swap));
    table.insert(format!("{}.rot", stack_name), closure(stack_name, rot));
    table.insert(format!("{}.flush", stack_name), closure(stack_name, flush));
    table.insert(
        format!("{}.stackdepth", stack_name),
        closure(stack_name, stackdepth),
    );
    table.insert(format!("{}.shove", stack_name), closure(stack_name, shove));
    table.insert(format!("{}.yank", stack_name), closure(stack_name, yank));
    table.insert(
        format!("{}.yankdup", stack_name),
        closure(stack_name, yank_dup),
    );
    table.insert(format!("{}.=", stack_name), closure(stack_name, equal));
    table.insert(format!("{}.define", stack_name), closure(stack_name, define));
}

fn closure(stack_name: &'static str, op: fn(&mut Interpreter, &str)) -> InstructionFn {
    Rc::new(move |interp: &mut Interpreter| op(interp, stack_name))
}

fn dup(interp: &mut Interpreter, stack_name: &str) {
    if let Some(s) = interp.stack_mut(stack_name) {
        s.dup();
    }
}

fn pop(interp: &mut Interpreter, stack_name: &str) {
    if let Some(s) = interp.stack_mut(stack_name) {
        s.pop();
    }
}

fn swap(interp: &mut Interpreter, stack_name: &str) {
    if let Some(s) = interp.stack_mut(stack_name) {
        s.swap();
    }
}

fn rot(interp: &mut Interpreter, stack_name: &str) {
    if let Some(s) = interp.stack_mut(stack_name) {
        s.rot();
    }
}

fn flush(interp: &mut Interpreter, stack_name: &str) {
    if let Some(s) = interp.stack_mut(stack_name) {
        s.flush();
    }
}

fn stackdepth(interp: &mut Interpreter, stack_name: &str) {
    let len = interp.stack_len(stack_name) as i64;
    interp.push_integer(len);
}

fn shove(interp: &mut Interpreter, stack_name: &str) {
    let idx = match interp.pop_integer() {
        Some(i) => i,
        None => return,
    };
    let item = match interp.stack_mut(stack_name).and_then(|s| s.pop()) {
        Some(v) => v,
        None => {
            interp.push_integer(idx);
            return;
        }
    };
    if let Some(s) = interp.stack_mut(stack_name) {
        s.shove(item, idx);
    }
}

fn yank(interp: &mut Interpreter, stack_name: &str) {
    let idx = match interp.pop_integer() {
        Some(i) => i,
        None => return,
    };
    if let Some(s) = interp.stack_mut(stack_name) {
        s.yank(idx);
    }
}

fn yank_dup(interp: &mut Interpreter, stack_name: &str) {
    let idx = match interp.pop_integer() {
        Some(i) => i,
        None => return,
    };
    if let Some(s) = interp.stack_mut(stack_name) {
        s.yank_dup(idx);
    }
}

fn equal(interp: &mut Interpreter, stack_name: &str) {
    let (a, b) = match interp.stack_mut(stack_name) {
        Some(s) if s.len() >= 2 => (s.pop().unwrap(), s.pop().unwrap()),
        _ => return,
    };
    interp.push_boolean(a == b);
}

fn define(interp: &mut Interpreter, stack_name: &str) {
    let name = match interp.pop_name() {
        Some(n) => n,
        None => return,
    };
    let value = match interp.stack_mut(stack_name).and_then(|s| s.pop()) {
        Some(v) => v,
        None => {
            interp.push_name(name);
            return;
        }
    };
    let code = match value {
        Value::Code(c) => c,
        other => Code::atom(other.to_string()),
    };
    interp.define(name, code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    #[test]
    fn dup_works_through_the_generic_dispatch() {
        let mut interp = Interpreter::new(Options::default());
        interp.push_integer(5);
        interp.run("INTEGER.DUP").unwrap();
        assert_eq!(interp.pop_integer(), Some(5));
        assert_eq!(interp.pop_integer(), Some(5));
    }

    #[test]
    fn define_binds_a_literal_as_code() {
        let mut interp = Interpreter::new(Options::default());
        // `a` is not yet bound, so it lands on the name stack as a literal;
        // INTEGER.DEFINE then pops that name and the integer beneath it.
        interp.run("2 a INTEGER.DEFINE").unwrap();
        interp.run("a").unwrap();
        assert_eq!(interp.pop_integer(), Some(2));
    }

    #[test]
    fn stackdepth_reports_the_current_length() {
        let mut interp = Interpreter::new(Options::default());
        interp.push_integer(1);
        interp.push_integer(2);
        interp.run("INTEGER.STACKDEPTH").unwrap();
        assert_eq!(interp.pop_integer(), Some(2));
    }

    #[test]
    fn equal_compares_structurally() {
        let mut interp = Interpreter::new(Options::default());
        interp.push_integer(7);
        interp.push_integer(7);
        interp.run("INTEGER.=").unwrap();
        assert_eq!(interp.pop_boolean(), Some(true));
    }
}
