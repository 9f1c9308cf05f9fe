use crate::instruction::InstructionFn;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use rand::seq::SliceRandom;
use std::rc::Rc;

pub fn register(table: &mut FnvHashMap<String, InstructionFn>) {
    table.insert("name.quote".to_string(), Rc::new(quote));
    table.insert("name.rand".to_string(), Rc::new(rand_op));
    table.insert("name.randboundname".to_string(), Rc::new(rand_bound_name));
}

fn quote(interp: &mut Interpreter) {
    interp.quote_next_name();
}

fn rand_op(interp: &mut Interpreter) {
    let name = interp.next_generated_name();
    interp.push_name(name);
}

/// A uniform pick among currently *defined* names, read off the ordered
/// definition list (not map iteration order, which is unspecified) so the
/// choice is reproducible under a fixed seed. No-op if nothing is defined.
fn rand_bound_name(interp: &mut Interpreter) {
    let names = interp.definition_names().to_vec();
    if names.is_empty() {
        return;
    }
    let chosen = names.choose(interp.rng()).cloned();
    if let Some(name) = chosen {
        interp.push_name(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;
    use crate::config::Options;

    fn interp() -> Interpreter {
        Interpreter::new(Options::default())
    }

    #[test]
    fn quote_suppresses_the_next_expansion() {
        let mut i = interp();
        i.define("foo".to_string(), Code::atom("1"));
        i.run("NAME.QUOTE foo").unwrap();
        assert_eq!(i.pop_name(), Some("foo".to_string()));
    }

    #[test]
    fn rand_generates_fresh_names_each_time() {
        let mut i = interp();
        i.run("NAME.RAND NAME.RAND").unwrap();
        let b = i.pop_name().unwrap();
        let a = i.pop_name().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn randboundname_is_a_noop_with_no_definitions() {
        let mut i = interp();
        i.run("NAME.RANDBOUNDNAME").unwrap();
        assert_eq!(i.stack_len("name"), 0);
    }

    #[test]
    fn randboundname_picks_a_defined_name() {
        let mut i = interp();
        i.define("foo".to_string(), Code::atom("1"));
        i.run("NAME.RANDBOUNDNAME").unwrap();
        assert_eq!(i.pop_name(), Some("foo".to_string()));
    }
}
