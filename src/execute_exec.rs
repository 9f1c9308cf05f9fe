use crate::code::Code;
use crate::execute_code::step_do_range;
use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("exec.do*count".to_string(), Rc::new(do_count));
    table.insert("exec.do*range".to_string(), Rc::new(do_range));
    table.insert("exec.do*times".to_string(), Rc::new(do_times));
    table.insert("exec.if".to_string(), Rc::new(exec_if));
    table.insert("exec.k".to_string(), Rc::new(exec_k));
    table.insert("exec.s".to_string(), Rc::new(exec_s));
    table.insert("exec.y".to_string(), Rc::new(exec_y));
}

fn setup_do_count(interp: &mut Interpreter, count: i64, body: Code) {
    if count <= 0 {
        return;
    }
    interp.push_integer(0);
    interp.push_integer(count - 1);
    interp.push_exec(body);
    interp.push_exec(Code::atom("EXEC.DO*RANGE"));
}

/// The body for `EXEC.DO*COUNT` is whatever is already next on `exec` —
/// taken directly off `exec`, the same way `EXEC.DO*RANGE` itself takes its
/// body (SPEC_FULL.md §4.4).
fn do_count(interp: &mut Interpreter) {
    let count = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_integer(count);
            return;
        }
    };
    setup_do_count(interp, count, c);
}

fn do_times(interp: &mut Interpreter) {
    let count = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_integer(count);
            return;
        }
    };
    let wrapped = Code::list(vec![Code::atom("INTEGER.POP"), c]);
    setup_do_count(interp, count, wrapped);
}

fn do_range(interp: &mut Interpreter) {
    let dst = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let cur = match interp.pop_integer() {
        Some(v) => v,
        None => {
            interp.push_integer(dst);
            return;
        }
    };
    let c = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_integer(cur);
            interp.push_integer(dst);
            return;
        }
    };
    step_do_range(interp, cur, dst, c, false);
}

/// `EXEC.IF` pops a boolean then `c1` (top of `exec`) then `c2` (second);
/// the true branch selects `c1` — the opposite of `CODE.IF`'s choice
/// (SPEC_FULL.md §4.4/§9).
fn exec_if(interp: &mut Interpreter) {
    let cond = match interp.pop_boolean() {
        Some(v) => v,
        None => return,
    };
    let c1 = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_boolean(cond);
            return;
        }
    };
    let c2 = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_exec(c1);
            interp.push_boolean(cond);
            return;
        }
    };
    interp.push_exec(if cond { c1 } else { c2 });
}

/// Pops `a` (top) and `b` (second), discards `b`, re-pushes `a`.
fn exec_k(interp: &mut Interpreter) {
    let a = match interp.pop_exec() {
        Some(v) => v,
        None => return,
    };
    let b = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_exec(a);
            return;
        }
    };
    drop(b);
    interp.push_exec(a);
}

/// Pops `a b c` (top to bottom) and leaves `exec`, top-first, as `a`, `c`,
/// `(b c)` — the S-combinator rewrite, achieved by pushing in the opposite
/// order so `a` lands on top and runs first.
fn exec_s(interp: &mut Interpreter) {
    let a = match interp.pop_exec() {
        Some(v) => v,
        None => return,
    };
    let b = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_exec(a);
            return;
        }
    };
    let c = match interp.pop_exec() {
        Some(v) => v,
        None => {
            interp.push_exec(b);
            interp.push_exec(a);
            return;
        }
    };
    let bc = Code::list(vec![b, c.clone()]);
    interp.push_exec(bc);
    interp.push_exec(c);
    interp.push_exec(a);
}

/// Pops `e` and pushes `(EXEC.Y e)` then `e`, so `e` runs first and, if it
/// recurses, finds its own next iteration waiting underneath.
fn exec_y(interp: &mut Interpreter) {
    let e = match interp.pop_exec() {
        Some(v) => v,
        None => return,
    };
    let wrapped = Code::list(vec![Code::atom("EXEC.Y"), e.clone()]);
    interp.push_exec(wrapped);
    interp.push_exec(e);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn interp() -> Interpreter {
        Interpreter::new(Options::default())
    }

    #[test]
    fn exec_k_keeps_the_top_item() {
        let mut i = interp();
        i.push_exec(Code::atom("2"));
        i.push_exec(Code::atom("1"));
        // exec (top-first): [1, 2]; EXEC.K pops both directly.
        exec_k(&mut i);
        i.run("").unwrap();
        assert_eq!(i.pop_integer(), Some(1));
    }

    #[test]
    fn exec_s_combinator_rewrite() {
        let mut i = interp();
        i.push_exec(Code::atom("C"));
        i.push_exec(Code::atom("B"));
        i.push_exec(Code::atom("A"));
        exec_s(&mut i);
        // exec should now read, top-first: A, C, (B C)
        let top = i.pop_exec().unwrap();
        let second = i.pop_exec().unwrap();
        let third = i.pop_exec().unwrap();
        assert_eq!(top, Code::atom("A"));
        assert_eq!(second, Code::atom("C"));
        assert_eq!(third, Code::list(vec![Code::atom("B"), Code::atom("C")]));
    }

    #[test]
    fn exec_y_requeues_itself_under_e() {
        let mut i = interp();
        i.push_exec(Code::atom("E"));
        exec_y(&mut i);
        let top = i.pop_exec().unwrap();
        let second = i.pop_exec().unwrap();
        assert_eq!(top, Code::atom("E"));
        assert_eq!(
            second,
            Code::list(vec![Code::atom("EXEC.Y"), Code::atom("E")])
        );
    }
}
