use crate::code::Code;
use crate::interpreter::Interpreter;
use rand::seq::SliceRandom;
use rand::Rng;

/// `CODE.RAND`'s generator. Chooses a target size uniformly in `[1,
/// max_points]` (itself clamped to `max_points_in_random_expression`), then
/// recursively decomposes that size into a tree whose leaves are drawn from
/// the union of enabled instructions, currently defined names, and the
/// three ephemeral-random-constant kinds (SPEC_FULL.md §4.4).
pub fn generate(interp: &mut Interpreter, max_points: i64) -> Code {
    let ceiling = interp.options().max_points_in_random_expression as i64;
    let clamped = max_points.clamp(1, ceiling.max(1));
    let size = interp.rng().gen_range(1..=clamped);
    random_code_with_size(interp, size as usize)
}

fn random_code_with_size(interp: &mut Interpreter, size: usize) -> Code {
    if size <= 1 {
        return choose_atom(interp);
    }
    let remaining = size - 1;
    let part_sizes = decompose(interp, remaining, remaining);
    let mut children: Vec<Code> = part_sizes
        .into_iter()
        .map(|part| random_code_with_size(interp, part))
        .collect();
    children.shuffle(interp.rng());
    Code::list(children)
}

/// Splits `number` into a random sequence of positive integers, at most
/// `max_parts` of them, that sum to `number`. Each part is drawn uniformly
/// from what remains after reserving at least 1 point per still-needed
/// part, so the recursion always terminates with a valid partition.
fn decompose(interp: &mut Interpreter, number: usize, max_parts: usize) -> Vec<usize> {
    if max_parts <= 1 || number <= 1 {
        return vec![number.max(1)];
    }
    let upper = (number.saturating_sub(max_parts) + 1).max(1);
    let this_part = interp.rng().gen_range(1..=upper);
    let mut result = vec![this_part];
    result.extend(decompose(interp, number - this_part, max_parts - 1));
    result
}

fn choose_atom(interp: &mut Interpreter) -> Code {
    let instructions = interp.instructions().ordered_names().to_vec();
    let definitions = interp.definition_names().to_vec();
    let total = instructions.len() + definitions.len() + 3;
    if total == 0 {
        return Code::empty_list();
    }
    let idx = interp.rng().gen_range(0..total);
    if idx < instructions.len() {
        return Code::atom(instructions[idx].clone());
    }
    let idx = idx - instructions.len();
    if idx < definitions.len() {
        return Code::atom(definitions[idx].clone());
    }
    match idx - definitions.len() {
        0 => integer_erc(interp),
        1 => float_erc(interp),
        _ => name_erc(interp),
    }
}

fn integer_erc(interp: &mut Interpreter) -> Code {
    let (lo, hi) = {
        let options = interp.options();
        (options.min_random_integer, options.max_random_integer)
    };
    Code::atom(interp.rng().gen_range(lo..=hi).to_string())
}

fn float_erc(interp: &mut Interpreter) -> Code {
    let (lo, hi) = {
        let options = interp.options();
        (options.min_random_float, options.max_random_float)
    };
    Code::atom(interp.rng().gen_range(lo..=hi).to_string())
}

/// With probability `new_erc_name_probability`, mints a brand new name via
/// the same encoder `NAME.RAND` uses. Otherwise reuses an existing defined
/// name if one exists, falling back to minting one if none do.
fn name_erc(interp: &mut Interpreter) -> Code {
    let probability = interp.options().new_erc_name_probability;
    let roll: f64 = interp.rng().gen();
    if roll < probability {
        return Code::atom(interp.next_generated_name());
    }
    let names = interp.definition_names().to_vec();
    match names.choose(interp.rng()) {
        Some(name) => Code::atom(name.clone()),
        None => Code::atom(interp.next_generated_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    #[test]
    fn generated_trees_respect_the_atoms_only_size_bound() {
        let mut interp = Interpreter::new(Options::default());
        for _ in 0..20 {
            let tree = generate(&mut interp, 10);
            assert!(tree.length() >= 1 && tree.length() <= 10);
        }
    }

    #[test]
    fn same_seed_yields_the_same_tree() {
        let mut options = Options::default();
        options.random_seed = 1138;
        let mut a = Interpreter::new(options.clone());
        let mut b = Interpreter::new(options);
        let tree_a = generate(&mut a, 25);
        let tree_b = generate(&mut b, 25);
        assert_eq!(tree_a, tree_b);
    }

    #[test]
    fn max_points_is_clamped_to_the_configured_ceiling() {
        let mut options = Options::default();
        options.max_points_in_random_expression = 3;
        let mut interp = Interpreter::new(options);
        let tree = generate(&mut interp, 1000);
        assert!(tree.length() <= 3);
    }
}
