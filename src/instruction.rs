use crate::config::Options;
use crate::execute_boolean;
use crate::execute_code;
use crate::execute_exec;
use crate::execute_float;
use crate::execute_integer;
use crate::execute_name;
use crate::generic;
use crate::interpreter::Interpreter;
use fnv::FnvHashMap;
use std::rc::Rc;

/// A single built-in instruction, dispatched by its lowercased `stack.op`
/// key. Instructions never return an error — every operand-insufficiency
/// case is absorbed as a no-op by the instruction itself (SPEC_FULL.md
/// §4.3/§7). `Rc` rather than a bare `fn` pointer because the operations
/// common to every stack (`DUP`, `SHOVE`, ...) are one implementation
/// closed over which stack name they target, and dispatch needs to clone
/// the table entry out from under an immutable borrow before calling it
/// with `&mut Interpreter` (an `Interpreter` never crosses a thread, so
/// there is no need for `Arc`).
pub type InstructionFn = Rc<dyn Fn(&mut Interpreter)>;

/// The dispatch table an `Interpreter` consults for every `stack.op` token,
/// built once at construction time and pruned to `options.allowed_instructions`.
pub struct InstructionTable {
    table: FnvHashMap<String, InstructionFn>,
    ordered: Vec<String>,
}

impl InstructionTable {
    pub fn build(options: &Options) -> InstructionTable {
        let mut table: FnvHashMap<String, InstructionFn> = FnvHashMap::default();

        generic::register_common(&mut table, "exec");
        generic::register_common(&mut table, "name");
        for kind in ["boolean", "integer", "float", "code"] {
            if options.allowed_types.contains(kind) {
                generic::register_common(&mut table, kind);
            }
        }

        if options.allowed_types.contains("boolean") {
            execute_boolean::register(&mut table);
        }
        if options.allowed_types.contains("integer") {
            execute_integer::register(&mut table);
        }
        if options.allowed_types.contains("float") {
            execute_float::register(&mut table);
        }
        execute_name::register(&mut table);
        if options.allowed_types.contains("code") {
            execute_code::register(&mut table);
        }
        execute_exec::register(&mut table);

        if !options.allowed_instructions.is_empty() {
            table.retain(|key, _| options.allowed_instructions.contains(key));
        }

        let mut ordered: Vec<String> = table.keys().cloned().collect();
        ordered.sort();

        InstructionTable { table, ordered }
    }

    pub fn get(&self, key: &str) -> Option<&InstructionFn> {
        self.table.get(key)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Instruction names in a fixed (sorted) order, consulted by
    /// `CODE.INSTRUCTIONS` and by random code generation.
    pub fn ordered_names(&self) -> &[String] {
        &self.ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_a_type_removes_its_instructions() {
        let mut options = Options::default();
        options.allowed_types.remove("float");
        let table = InstructionTable::build(&options);
        assert!(table.get("float.+").is_none());
        assert!(table.get("integer.+").is_some());
    }

    #[test]
    fn allowed_instructions_prunes_the_table() {
        let mut options = Options::default();
        options.allowed_instructions.insert("integer.+".to_string());
        let table = InstructionTable::build(&options);
        assert!(table.get("integer.+").is_some());
        assert!(table.get("integer.-").is_none());
    }
}
