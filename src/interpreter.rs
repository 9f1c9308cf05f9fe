use crate::code::Code;
use crate::config::Options;
use crate::error::{Error, ExecutionError};
use crate::instruction::InstructionTable;
use crate::name_encode;
use crate::parse::parse_code;
use crate::stack::Stack;
use crate::value::Value;
use fnv::FnvHashMap;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// The concrete Push interpreter: named typed stacks, a definitions map, an
/// instruction dispatch table, a deterministic PRNG, and the evaluation step
/// counter. There is exactly one of these per running program; it owns all
/// of its state and performs no I/O beyond optional `log` records.
pub struct Interpreter {
    stacks: FnvHashMap<String, Stack<Value>>,
    definitions: FnvHashMap<String, Code>,
    definition_order: Vec<String>,
    instructions: InstructionTable,
    rng: SmallRng,
    seed: i64,
    step_count: u64,
    quote_next_name: bool,
    num_names_generated: u64,
    options: Options,
}

impl Interpreter {
    pub fn new(options: Options) -> Interpreter {
        let seed = if options.random_seed == 0 {
            rand::thread_rng().gen::<i64>()
        } else {
            options.random_seed
        };
        let rng = SmallRng::seed_from_u64(seed as u64);

        let mut stacks = FnvHashMap::default();
        stacks.insert("exec".to_string(), Stack::new());
        stacks.insert("name".to_string(), Stack::new());
        for kind in ["boolean", "code", "float", "integer"] {
            if options.allowed_types.contains(kind) {
                stacks.insert(kind.to_string(), Stack::new());
            }
        }

        let instructions = InstructionTable::build(&options);
        log::debug!(
            "interpreter created: {} stacks enabled, {} instructions enabled, seed {}",
            stacks.len(),
            instructions.len(),
            seed
        );

        Interpreter {
            stacks,
            definitions: FnvHashMap::default(),
            definition_order: Vec::new(),
            instructions,
            rng,
            seed,
            step_count: 0,
            quote_next_name: false,
            num_names_generated: 0,
            options,
        }
    }

    /// The seed actually in effect, recoverable even when `random_seed == 0`
    /// was requested (SPEC_FULL.md §9).
    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Registers an additional named stack, overwriting any existing stack
    /// of the same name. Used to add stacks beyond the four typed stacks
    /// `new` wires up from `options.allowed_types`.
    pub fn register_stack(&mut self, name: impl Into<String>, stack: Stack<Value>) {
        self.stacks.insert(name.into(), stack);
    }

    pub fn stack(&self, name: &str) -> Option<&Stack<Value>> {
        self.stacks.get(name)
    }

    pub fn stack_mut(&mut self, name: &str) -> Option<&mut Stack<Value>> {
        self.stacks.get_mut(name)
    }

    pub fn stack_len(&self, name: &str) -> usize {
        self.stacks.get(name).map(Stack::len).unwrap_or(0)
    }

    pub fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    pub fn definition(&self, name: &str) -> Option<&Code> {
        self.definitions.get(name)
    }

    pub fn definition_names(&self) -> &[String] {
        &self.definition_order
    }

    /// Binds `name` to `code`. Appends to `definition_order` only the first
    /// time a name is defined; later redefinitions update the mapping in
    /// place without moving the name in the order (§3 invariants).
    pub fn define(&mut self, name: String, code: Code) {
        if !self.definitions.contains_key(&name) {
            self.definition_order.push(name.clone());
        }
        self.definitions.insert(name, code);
    }

    pub fn quote_next_name(&mut self) {
        self.quote_next_name = true;
    }

    pub fn next_generated_name(&mut self) -> String {
        let counter = self.num_names_generated;
        self.num_names_generated += 1;
        name_encode::encode(counter)
    }

    // -- typed stack helpers -------------------------------------------------

    pub fn pop_boolean(&mut self) -> Option<bool> {
        self.pop_typed("boolean", Value::as_boolean)
    }

    pub fn push_boolean(&mut self, value: bool) {
        self.push_typed("boolean", Value::Boolean(value));
    }

    pub fn pop_integer(&mut self) -> Option<i64> {
        self.pop_typed("integer", Value::as_integer)
    }

    pub fn push_integer(&mut self, value: i64) {
        self.push_typed("integer", Value::Integer(value));
    }

    pub fn pop_float(&mut self) -> Option<f64> {
        self.pop_typed("float", Value::as_float)
    }

    pub fn push_float(&mut self, value: f64) {
        self.push_typed("float", Value::Float(value));
    }

    pub fn pop_name(&mut self) -> Option<String> {
        self.pop_typed("name", |v| v.as_name().map(str::to_string))
    }

    pub fn push_name(&mut self, value: String) {
        self.push_typed("name", Value::Name(value));
    }

    pub fn pop_code(&mut self, stack_name: &str) -> Option<Code> {
        self.pop_typed(stack_name, |v| v.as_code().cloned())
    }

    pub fn push_code(&mut self, stack_name: &str, code: Code) {
        self.push_typed(stack_name, Value::Code(code));
    }

    /// Pops a raw `Code` off `exec` without executing it. Used by
    /// instructions (`CODE.QUOTE`, `EXEC.K`, `EXEC.S`, `EXEC.Y`, ...) that
    /// consume items that would otherwise run next.
    pub fn pop_exec(&mut self) -> Option<Code> {
        self.pop_code("exec")
    }

    pub fn push_exec(&mut self, code: Code) {
        self.push_code("exec", code);
    }

    fn pop_typed<T>(&mut self, stack_name: &str, extract: impl Fn(&Value) -> Option<T>) -> Option<T> {
        let value = self.stacks.get_mut(stack_name)?.pop()?;
        extract(&value)
    }

    fn push_typed(&mut self, stack_name: &str, value: Value) {
        if let Some(stack) = self.stacks.get_mut(stack_name) {
            stack.push(value);
        }
    }

    // -- execution -------------------------------------------------------

    pub fn run(&mut self, program: &str) -> Result<(), Error> {
        let code = parse_code(program)?;
        self.run_code(code)
    }

    pub fn run_code(&mut self, code: Code) -> Result<(), Error> {
        self.step_count = 0;

        if self.options.top_level_push_code {
            if self.stacks.contains_key("code") {
                self.push_code("code", code.clone());
            }
        }
        self.push_exec(code);

        while !self.stack_len_zero("exec") {
            if self.step_count >= self.options.eval_push_limit {
                return Err(Error::Execution(ExecutionError::ExecLimitExceeded {
                    step_count: self.step_count,
                }));
            }
            let item = self.pop_exec().expect("exec is non-empty");
            self.step_count += 1;

            if self.options.tracing {
                log::trace!(
                    "step {}: popped `{}`; depths = {:?}",
                    self.step_count,
                    item,
                    self.stack_depths()
                );
            }

            match item {
                Code::List(children) => {
                    for child in children.into_iter().rev() {
                        self.push_exec(child);
                    }
                }
                Code::Atom(token) => {
                    self.dispatch_atom(&token)?;
                }
            }
        }

        if self.options.top_level_pop_code && self.stacks.contains_key("code") {
            self.stack_mut("code").unwrap().pop();
        }

        Ok(())
    }

    fn stack_len_zero(&self, name: &str) -> bool {
        self.stacks.get(name).map(Stack::is_empty).unwrap_or(true)
    }

    fn stack_depths(&self) -> FnvHashMap<String, usize> {
        self.stacks
            .iter()
            .map(|(name, stack)| (name.clone(), stack.len()))
            .collect()
    }

    fn dispatch_atom(&mut self, token: &str) -> Result<(), ExecutionError> {
        if let Ok(value) = token.parse::<i64>() {
            return self.push_literal("integer", Value::Integer(value), token);
        }
        if let Ok(value) = token.parse::<f64>() {
            return self.push_literal("float", Value::Float(value), token);
        }
        if let Some(value) = parse_boolean_literal(token) {
            return self.push_literal("boolean", Value::Boolean(value), token);
        }
        if let Some(dot) = token.find('.') {
            let stack_name = token[..dot].to_lowercase();
            let op = token[dot + 1..].to_lowercase();
            let key = format!("{}.{}", stack_name, op);
            match self.instructions.get(&key).cloned() {
                Some(instruction) => {
                    instruction(self);
                    return Ok(());
                }
                None => {
                    return Err(ExecutionError::UnknownInstruction {
                        token: token.to_string(),
                    })
                }
            }
        }
        self.dispatch_name(token);
        Ok(())
    }

    fn push_literal(
        &mut self,
        stack_name: &'static str,
        value: Value,
        token: &str,
    ) -> Result<(), ExecutionError> {
        if !self.stacks.contains_key(stack_name) {
            log::warn!(
                "literal `{}` requires the `{}` stack, which is disabled",
                token,
                stack_name
            );
            return Err(ExecutionError::DisabledStackLiteral {
                token: token.to_string(),
                stack: stack_name,
            });
        }
        self.push_typed(stack_name, value);
        Ok(())
    }

    fn dispatch_name(&mut self, token: &str) {
        let lowered = token.to_lowercase();
        if !self.quote_next_name {
            if let Some(code) = self.definitions.get(&lowered).cloned() {
                self.push_exec(code);
                return;
            }
        }
        self.push_name(lowered);
        self.quote_next_name = false;
    }
}

fn parse_boolean_literal(token: &str) -> Option<bool> {
    match token.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
