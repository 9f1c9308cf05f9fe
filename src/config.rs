use crate::parse_error::ParseError;
use fnv::FnvHashSet;

/// The frozen options record the interpreter is constructed from
/// (SPEC_FULL.md §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub top_level_push_code: bool,
    pub top_level_pop_code: bool,
    pub eval_push_limit: u64,
    pub new_erc_name_probability: f64,
    pub max_points_in_program: usize,
    pub max_points_in_random_expression: usize,
    pub min_random_integer: i64,
    pub max_random_integer: i64,
    pub min_random_float: f64,
    pub max_random_float: f64,
    pub tracing: bool,
    pub random_seed: i64,
    pub allowed_types: FnvHashSet<String>,
    pub allowed_instructions: FnvHashSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        let mut allowed_types = FnvHashSet::default();
        for t in ["boolean", "code", "float", "integer"] {
            allowed_types.insert(t.to_string());
        }
        Options {
            top_level_push_code: true,
            top_level_pop_code: false,
            eval_push_limit: 1000,
            new_erc_name_probability: 0.001,
            max_points_in_program: 100,
            max_points_in_random_expression: 25,
            min_random_integer: -10,
            max_random_integer: 10,
            min_random_float: -1.0,
            max_random_float: 1.0,
            tracing: false,
            random_seed: 0,
            allowed_types,
            allowed_instructions: FnvHashSet::default(),
        }
    }
}

/// Parses the flat configuration-file format of SPEC_FULL.md §6 and builds
/// an `Options` record from it. Grounded on the teacher's `Configuration`
/// (generalized to the full parameter set) and on
/// `examples/original_source/options.go`'s `parseOptions`, with the
/// `min-random-integer`/`max-random-integer` bug from that source fixed:
/// `max-random-integer` now correctly sets `max_random_integer`.
#[derive(Debug, Default)]
pub struct Configuration {
    options: Options,
    restrict_types: bool,
    restrict_instructions: bool,
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            options: Options::default(),
            restrict_types: false,
            restrict_instructions: false,
        }
    }

    pub fn from_str(text: &str) -> Result<Configuration, ParseError> {
        let mut config = Configuration::new();
        for raw_line in text.lines() {
            let line = match raw_line.find('#') {
                Some(idx) => &raw_line[..idx],
                None => raw_line,
            };
            let mut tokens = line.split_whitespace();
            while let Some(name) = tokens.next() {
                let value = tokens
                    .next()
                    .ok_or_else(|| ParseError::missing_value(name))?;
                config.apply(name, value)?;
            }
        }
        Ok(config)
    }

    fn apply(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        match name {
            "type" => {
                if !self.restrict_types {
                    self.options.allowed_types.clear();
                    self.restrict_types = true;
                }
                match value {
                    "boolean" | "code" | "float" | "integer" => {
                        self.options.allowed_types.insert(value.to_string());
                    }
                    "name" | "exec" => {} // always present, silently accepted
                    _ => return Err(ParseError::invalid_value(name, value)),
                }
            }
            "instruction" => {
                if !self.restrict_instructions {
                    self.restrict_instructions = true;
                }
                self.options
                    .allowed_instructions
                    .insert(value.to_lowercase());
            }
            "min-random-integer" => {
                self.options.min_random_integer = parse_i64(name, value)?;
            }
            "max-random-integer" => {
                self.options.max_random_integer = parse_i64(name, value)?;
            }
            "min-random-float" => {
                self.options.min_random_float = parse_f64(name, value)?;
            }
            "max-random-float" => {
                self.options.max_random_float = parse_f64(name, value)?;
            }
            "max-points-in-program" => {
                self.options.max_points_in_program = parse_usize(name, value)?;
            }
            "max-points-in-random-expressions" => {
                self.options.max_points_in_random_expression = parse_usize(name, value)?;
            }
            "evalpush-limit" => {
                self.options.eval_push_limit = parse_usize(name, value)? as u64;
            }
            "new-erc-name-probability" => {
                self.options.new_erc_name_probability = parse_f64(name, value)?;
            }
            "random-seed" => {
                self.options.random_seed = parse_i64(name, value)?;
            }
            "top-level-push-code" => {
                self.options.top_level_push_code = parse_bool(name, value)?;
            }
            "top-level-pop-code" => {
                self.options.top_level_pop_code = parse_bool(name, value)?;
            }
            "tracing" => {
                self.options.tracing = parse_bool(name, value)?;
            }
            _ => return Err(ParseError::unknown_parameter(name)),
        }
        Ok(())
    }

    pub fn into_options(self) -> Options {
        let mut options = self.options;
        if !self.restrict_instructions {
            // No explicit `instruction` lines: every built-in instruction is allowed.
            // The interpreter substitutes its full instruction set in this case.
            options.allowed_instructions.clear();
        }
        options
    }
}

fn parse_i64(name: &str, value: &str) -> Result<i64, ParseError> {
    value
        .parse::<i64>()
        .map_err(|_| ParseError::invalid_value(name, value))
}

fn parse_usize(name: &str, value: &str) -> Result<usize, ParseError> {
    value
        .parse::<usize>()
        .map_err(|_| ParseError::invalid_value(name, value))
}

fn parse_f64(name: &str, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .map_err(|_| ParseError::invalid_value(name, value))
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::invalid_value(name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_all_four_typed_stacks() {
        let options = Options::default();
        assert!(options.allowed_types.contains("integer"));
        assert!(options.allowed_types.contains("float"));
        assert!(options.allowed_types.contains("boolean"));
        assert!(options.allowed_types.contains("code"));
    }

    #[test]
    fn parses_recognised_parameters() {
        let text = "# a comment\nmax-random-integer 42\nmin-random-integer -7\ntracing true\n";
        let options = Configuration::from_str(text).unwrap().into_options();
        assert_eq!(options.max_random_integer, 42);
        assert_eq!(options.min_random_integer, -7);
        assert!(options.tracing);
    }

    #[test]
    fn min_and_max_random_integer_are_independent() {
        // Regression test for the min/max-random-integer bug described in
        // SPEC_FULL.md §9: both used to write into the same field.
        let text = "min-random-integer -100\nmax-random-integer 100\n";
        let options = Configuration::from_str(text).unwrap().into_options();
        assert_eq!(options.min_random_integer, -100);
        assert_eq!(options.max_random_integer, 100);
    }

    #[test]
    fn unknown_parameter_is_an_error() {
        assert!(Configuration::from_str("not-a-real-parameter 1").is_err());
    }

    #[test]
    fn missing_value_is_an_error() {
        assert!(Configuration::from_str("tracing").is_err());
    }

    #[test]
    fn type_restricts_allowed_types() {
        let text = "type integer\ntype boolean\n";
        let options = Configuration::from_str(text).unwrap().into_options();
        assert!(options.allowed_types.contains("integer"));
        assert!(options.allowed_types.contains("boolean"));
        assert!(!options.allowed_types.contains("float"));
    }

    #[test]
    fn instruction_lines_are_lowercased() {
        let text = "instruction INTEGER.+\n";
        let options = Configuration::from_str(text).unwrap().into_options();
        assert!(options.allowed_instructions.contains("integer.+"));
    }
}
