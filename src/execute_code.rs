use crate::code::Code;
use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use crate::random_code;
use fnv::{FnvHashMap, FnvHashSet};
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("code.append".to_string(), Rc::new(append));
    table.insert("code.atom".to_string(), Rc::new(atom));
    table.insert("code.car".to_string(), Rc::new(car));
    table.insert("code.cdr".to_string(), Rc::new(cdr));
    table.insert("code.cons".to_string(), Rc::new(cons));
    table.insert("code.container".to_string(), Rc::new(container));
    table.insert("code.contains".to_string(), Rc::new(contains));
    table.insert("code.list".to_string(), Rc::new(list));
    table.insert("code.length".to_string(), Rc::new(length));
    table.insert("code.nth".to_string(), Rc::new(nth));
    table.insert("code.nthcdr".to_string(), Rc::new(nthcdr));
    table.insert("code.null".to_string(), Rc::new(null));
    table.insert("code.size".to_string(), Rc::new(size));
    table.insert("code.discrepancy".to_string(), Rc::new(discrepancy));
    table.insert("code.instructions".to_string(), Rc::new(instructions));
    table.insert("code.definition".to_string(), Rc::new(definition));
    table.insert("code.quote".to_string(), Rc::new(quote));
    table.insert("code.fromboolean".to_string(), Rc::new(from_boolean));
    table.insert("code.fromfloat".to_string(), Rc::new(from_float));
    table.insert("code.frominteger".to_string(), Rc::new(from_integer));
    table.insert("code.fromname".to_string(), Rc::new(from_name));
    table.insert("code.noop".to_string(), Rc::new(noop));
    table.insert("code.do".to_string(), Rc::new(code_do));
    table.insert("code.do*".to_string(), Rc::new(code_do_star));
    table.insert("code.do*count".to_string(), Rc::new(do_count));
    table.insert("code.do*range".to_string(), Rc::new(do_range));
    table.insert("code.do*times".to_string(), Rc::new(do_times));
    table.insert("code.if".to_string(), Rc::new(code_if));
    table.insert("code.rand".to_string(), Rc::new(rand_op));
}

/// Pops one item off `exec` without executing it. Used by `CODE.QUOTE` and
/// the `EXEC.*` control combinators to take hold of the item that would
/// otherwise run next.
pub(crate) fn quote(interp: &mut Interpreter) {
    if let Some(item) = interp.pop_exec() {
        interp.push_code("code", item);
    }
}

fn as_list(c: Code) -> Vec<Code> {
    match c {
        Code::List(children) => children,
        atom => vec![atom],
    }
}

fn append(interp: &mut Interpreter) {
    let top = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let second = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", top);
            return;
        }
    };
    let max_points = interp.options().max_points_in_program;
    let mut children = as_list(second.clone());
    children.extend(as_list(top.clone()));
    let result = Code::list(children);
    if result.length() <= max_points {
        interp.push_code("code", result);
    } else {
        interp.push_code("code", second);
        interp.push_code("code", top);
    }
}

fn atom(interp: &mut Interpreter) {
    let is_atom = match interp.stack("code").and_then(|s| s.peek()) {
        Some(v) => v.as_code().map(Code::is_atom),
        None => None,
    };
    if let Some(value) = is_atom {
        interp.push_boolean(value);
    }
}

fn car(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_code("code", c.car());
    }
}

fn cdr(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_code("code", c.cdr());
    }
}

/// Conses the second item onto the top item, coerced to a list: top `( A B
/// )`, second `X` yields `( X A B )` (SPEC_FULL.md §4.4, grounded in
/// `examples/original_source/stack_code.go`'s `c2.List` prepended by `c1`).
fn cons(interp: &mut Interpreter) {
    let top = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let second = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", top);
            return;
        }
    };
    interp.push_code("code", second.cons(&top));
}

/// The smallest sublist of the top item that contains the second item as a
/// member, matching `examples/original_source/stack_code.go`'s
/// `c1(top).Container(c2(second))`.
fn container(interp: &mut Interpreter) {
    let top = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let needle = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", top);
            return;
        }
    };
    interp.push_code("code", top.container(&needle));
}

fn contains(interp: &mut Interpreter) {
    let subtree = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let haystack = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", subtree);
            return;
        }
    };
    interp.push_boolean(haystack.contains(&subtree));
}

fn list(interp: &mut Interpreter) {
    let top = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let second = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", top);
            return;
        }
    };
    interp.push_code("code", Code::list(vec![second, top]));
}

fn length(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_integer(c.length() as i64);
    }
}

fn nth(interp: &mut Interpreter) {
    let i = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_integer(i);
            return;
        }
    };
    interp.push_code("code", c.nth(i));
}

fn nthcdr(interp: &mut Interpreter) {
    let i = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_integer(i);
            return;
        }
    };
    interp.push_code("code", c.nthcdr(i));
}

fn null(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_boolean(c == Code::empty_list());
    }
}

fn size(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_integer(c.point_count() as i64);
    }
}

/// Sum, over every atom literal appearing in either tree, of the absolute
/// difference in occurrence counts. Zero means the two trees contain the
/// same multiset of atoms.
fn discrepancy(interp: &mut Interpreter) {
    let top = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    let second = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", top);
            return;
        }
    };
    let a = top.unique_items();
    let b = second.unique_items();
    let keys: FnvHashSet<&String> = a.keys().chain(b.keys()).collect();
    let discrepancy: i64 = keys
        .into_iter()
        .map(|k| {
            let ca = *a.get(k).unwrap_or(&0) as i64;
            let cb = *b.get(k).unwrap_or(&0) as i64;
            (ca - cb).abs()
        })
        .sum();
    interp.push_integer(discrepancy);
}

fn instructions(interp: &mut Interpreter) {
    let names = interp.instructions().ordered_names().to_vec();
    let children = names.into_iter().map(Code::atom).collect();
    interp.push_code("code", Code::list(children));
}

fn definition(interp: &mut Interpreter) {
    let name = match interp.pop_name() {
        Some(v) => v,
        None => return,
    };
    match interp.definition(&name).cloned() {
        Some(code) => interp.push_code("code", code),
        None => interp.push_name(name),
    }
}

fn from_boolean(interp: &mut Interpreter) {
    if let Some(b) = interp.pop_boolean() {
        interp.push_code("code", Code::atom(b.to_string()));
    }
}

fn from_float(interp: &mut Interpreter) {
    if let Some(f) = interp.pop_float() {
        interp.push_code("code", Code::atom(f.to_string()));
    }
}

fn from_integer(interp: &mut Interpreter) {
    if let Some(v) = interp.pop_integer() {
        interp.push_code("code", Code::atom(v.to_string()));
    }
}

fn from_name(interp: &mut Interpreter) {
    if let Some(n) = interp.pop_name() {
        interp.push_code("code", Code::atom(n));
    }
}

fn noop(_interp: &mut Interpreter) {}

/// `CODE.DO` leaves the code stack as it found it: the popped body is
/// pushed back immediately, and a synthetic `CODE.POP` is scheduled to run
/// after the body to remove that re-pushed copy again (SPEC_FULL.md §4.3).
fn code_do(interp: &mut Interpreter) {
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => return,
    };
    interp.push_code("code", c.clone());
    interp.push_exec(Code::atom("CODE.POP"));
    interp.push_exec(c);
}

fn code_do_star(interp: &mut Interpreter) {
    if let Some(c) = interp.pop_code("code") {
        interp.push_exec(c);
    }
}

/// Shared setup for `DO*COUNT`/`DO*TIMES`: translates a loop of `count`
/// iterations into the initial `DO*RANGE` state (SPEC_FULL.md §4.4).
fn setup_do_count(interp: &mut Interpreter, count: i64, body: Code, on_code_stack: bool) {
    if count <= 0 {
        return;
    }
    interp.push_integer(0);
    interp.push_integer(count - 1);
    if on_code_stack {
        interp.push_code("code", body);
        interp.push_exec(Code::atom("CODE.DO*RANGE"));
    } else {
        interp.push_exec(body);
        interp.push_exec(Code::atom("EXEC.DO*RANGE"));
    }
}

fn do_count(interp: &mut Interpreter) {
    let count = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_integer(count);
            return;
        }
    };
    setup_do_count(interp, count, c, true);
}

fn do_times(interp: &mut Interpreter) {
    let count = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_integer(count);
            return;
        }
    };
    let wrapped = Code::list(vec![Code::atom("INTEGER.POP"), c]);
    setup_do_count(interp, count, wrapped, true);
}

/// One step of the range loop: if `cur == dst` this is the final
/// iteration; otherwise it re-arranges a continuation on `exec` so the
/// instruction re-invokes itself after stepping `cur` one unit toward
/// `dst`. Grounded numerically against the worked example in SPEC_FULL.md
/// §8 scenario 5.
pub(crate) fn step_do_range(interp: &mut Interpreter, cur: i64, dst: i64, c: Code, on_code_stack: bool) {
    if cur == dst {
        interp.push_integer(cur);
        interp.push_exec(c);
        return;
    }
    interp.push_integer(cur);
    let next_cur = cur + (dst - cur).signum();
    if on_code_stack {
        interp.push_code("code", c.clone());
        interp.push_exec(c);
        interp.push_exec(Code::atom("CODE.DO*RANGE"));
    } else {
        interp.push_exec(c.clone());
        interp.push_exec(c);
        interp.push_exec(Code::atom("EXEC.DO*RANGE"));
    }
    interp.push_integer(next_cur);
    interp.push_integer(dst);
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
    let c = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_integer(cur);
            interp.push_integer(dst);
            return;
        }
    };
    step_do_range(interp, cur, dst, c, true);
}

/// `CODE.IF` pops a boolean then `c1` (top of code) then `c2` (second);
/// the true branch selects `c2`, diverging from `EXEC.IF`'s choice of `c1`
/// (SPEC_FULL.md §4.4/§9 — both orderings are preserved as observed).
fn code_if(interp: &mut Interpreter) {
    let cond = match interp.pop_boolean() {
        Some(v) => v,
        None => return,
    };
    let c1 = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_boolean(cond);
            return;
        }
    };
    let c2 = match interp.pop_code("code") {
        Some(v) => v,
        None => {
            interp.push_code("code", c1);
            interp.push_boolean(cond);
            return;
        }
    };
    interp.push_exec(if cond { c2 } else { c1 });
}

fn rand_op(interp: &mut Interpreter) {
    let max_points = match interp.pop_integer() {
        Some(v) => v,
        None => return,
    };
    let code = random_code::generate(interp, max_points);
    interp.push_code("code", code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn interp() -> Interpreter {
        Interpreter::new(Options::default())
    }

    #[test]
    fn car_and_cdr() {
        let mut i = interp();
        i.push_code("code", Code::list(vec![Code::atom("1"), Code::atom("2")]));
        i.run("CODE.CAR").unwrap();
        assert_eq!(i.pop_code("code"), Some(Code::atom("1")));
    }

    #[test]
    fn append_respects_the_program_size_bound() {
        let mut options = Options::default();
        options.max_points_in_program = 1;
        let mut i = Interpreter::new(options);
        i.push_code("code", Code::atom("1"));
        i.push_code("code", Code::atom("2"));
        i.run("CODE.APPEND").unwrap();
        // Appending would produce two points; the bound is one, so the
        // stack is left exactly as found.
        assert_eq!(i.pop_code("code"), Some(Code::atom("2")));
        assert_eq!(i.pop_code("code"), Some(Code::atom("1")));
    }

    #[test]
    fn discrepancy_of_identical_trees_is_zero() {
        let mut i = interp();
        let tree = Code::list(vec![Code::atom("a"), Code::atom("b")]);
        i.push_code("code", tree.clone());
        i.push_code("code", tree);
        i.run("CODE.DISCREPANCY").unwrap();
        assert_eq!(i.pop_integer(), Some(0));
    }

    #[test]
    fn code_do_restores_the_code_stack_afterward() {
        let mut i = interp();
        i.push_code("code", Code::atom("1"));
        i.run("CODE.DO").unwrap();
        assert_eq!(i.stack_len("code"), 0);
        assert_eq!(i.pop_integer(), Some(1));
    }

    #[test]
    fn definition_pushes_bound_code() {
        let mut i = interp();
        i.define("foo".to_string(), Code::atom("42"));
        i.push_name("foo".to_string());
        i.run("CODE.DEFINITION").unwrap();
        assert_eq!(i.pop_code("code"), Some(Code::atom("42")));
    }

    #[test]
    fn cons_prepends_the_second_item_onto_the_top() {
        let mut i = interp();
        // second = X, top = ( A B )
        i.push_code("code", Code::atom("X"));
        i.push_code("code", Code::list(vec![Code::atom("A"), Code::atom("B")]));
        i.run("CODE.CONS").unwrap();
        assert_eq!(
            i.pop_code("code"),
            Some(Code::list(vec![
                Code::atom("X"),
                Code::atom("A"),
                Code::atom("B"),
            ]))
        );
    }

    #[test]
    fn container_finds_the_sublist_of_the_top_holding_the_second_item() {
        let mut i = interp();
        let inner = Code::list(vec![Code::atom("a"), Code::atom("x")]);
        let top = Code::list(vec![Code::atom("z"), inner.clone()]);
        // second = the needle, top = the haystack
        i.push_code("code", Code::atom("x"));
        i.push_code("code", top);
        i.run("CODE.CONTAINER").unwrap();
        assert_eq!(i.pop_code("code"), Some(inner));
    }

    #[test]
    fn null_pops_the_code_operand() {
        let mut i = interp();
        i.push_code("code", Code::empty_list());
        i.run("CODE.NULL").unwrap();
        assert_eq!(i.pop_boolean(), Some(true));
        assert_eq!(i.stack_len("code"), 0);
    }
}
