use fnv::FnvHashMap;
use std::fmt;

/// A node in the Push code tree.
///
/// A `Code` is either an atom — an uninterpreted literal token, whose type
/// (integer, float, boolean, instruction, or name) is resolved at execution
/// time, never at parse time — or a list of child nodes. `Length` always
/// equals the number of atoms reachable in the subtree; list-constructor
/// nodes themselves are not counted (see SPEC_FULL.md's Code.Length note).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Code {
    Atom(String),
    List(Vec<Code>),
}

impl Code {
    pub fn atom(token: impl Into<String>) -> Code {
        Code::Atom(token.into())
    }

    pub fn list(children: Vec<Code>) -> Code {
        Code::List(children)
    }

    pub fn empty_list() -> Code {
        Code::List(Vec::new())
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Code::Atom(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Code::List(_))
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Code::Atom(s) => Some(s.as_str()),
            Code::List(_) => None,
        }
    }

    pub fn as_children(&self) -> Option<&[Code]> {
        match self {
            Code::List(children) => Some(children.as_slice()),
            Code::Atom(_) => None,
        }
    }

    /// The number of atoms reachable in this subtree. Atoms-only convention
    /// (SPEC_FULL.md §9): list-constructor nodes are not counted.
    pub fn length(&self) -> usize {
        match self {
            Code::Atom(_) => 1,
            Code::List(children) => children.iter().map(Code::length).sum(),
        }
    }

    /// The total number of points (atoms plus list-constructor nodes)
    /// reachable in this subtree, including `self`. Distinct from `length`,
    /// which counts atoms only.
    pub fn point_count(&self) -> usize {
        match self {
            Code::Atom(_) => 1,
            Code::List(children) => 1 + children.iter().map(Code::point_count).sum::<usize>(),
        }
    }

    /// True if `self` equals `subtree`, or any descendant of `self` does.
    pub fn contains(&self, subtree: &Code) -> bool {
        if self == subtree {
            return true;
        }
        match self {
            Code::Atom(_) => false,
            Code::List(children) => children.iter().any(|c| c.contains(subtree)),
        }
    }

    /// The smallest strict sublist of `self` that directly contains `subtree`
    /// as one of its immediate children, found by depth-first pre-order
    /// search (first match wins on ties).
    pub fn container(&self, subtree: &Code) -> Code {
        fn search(node: &Code, subtree: &Code) -> Option<Code> {
            let children = node.as_children()?;
            if children.iter().any(|c| c == subtree) {
                return Some(node.clone());
            }
            for child in children {
                if let Some(found) = search(child, subtree) {
                    return Some(found);
                }
            }
            None
        }
        search(self, subtree).unwrap_or_else(Code::empty_list)
    }

    /// Maps each distinct atom literal reachable in this tree to its
    /// occurrence count.
    pub fn unique_items(&self) -> FnvHashMap<String, usize> {
        fn walk(node: &Code, counts: &mut FnvHashMap<String, usize>) {
            match node {
                Code::Atom(token) => {
                    *counts.entry(token.clone()).or_insert(0) += 1;
                }
                Code::List(children) => {
                    for child in children {
                        walk(child, counts);
                    }
                }
            }
        }
        let mut counts = FnvHashMap::default();
        walk(self, &mut counts);
        counts
    }

    /// The first child of a list, or the empty list if `self` is an atom or
    /// an empty list.
    pub fn car(&self) -> Code {
        match self {
            Code::List(children) if !children.is_empty() => children[0].clone(),
            _ => Code::empty_list(),
        }
    }

    /// All children after the first, as a list. The empty list if `self` is
    /// an atom, empty, or a singleton.
    pub fn cdr(&self) -> Code {
        match self {
            Code::List(children) if children.len() > 1 => Code::list(children[1..].to_vec()),
            _ => Code::empty_list(),
        }
    }

    /// Prepend `self` to `rest`, wrapping `rest` in a singleton list first
    /// if it is an atom.
    pub fn cons(&self, rest: &Code) -> Code {
        let mut children = vec![self.clone()];
        match rest {
            Code::List(existing) => children.extend(existing.iter().cloned()),
            Code::Atom(_) => children.push(rest.clone()),
        }
        Code::list(children)
    }

    /// Index into the immediate elements of this tree using the
    /// modulo-with-absolute-value convention used by `CODE.NTH`/`CODE.NTHCDR`
    /// (distinct from the clamp convention used by `Stack::shove`/`yank`).
    pub fn nth_flat_index(len: usize, i: i64) -> usize {
        if len == 0 {
            return 0;
        }
        let idx = i % len as i64;
        idx.unsigned_abs() as usize
    }

    /// The `i`th immediate element (for a list) or `self` (for an atom),
    /// using `nth_flat_index`.
    pub fn nth(&self, i: i64) -> Code {
        match self {
            Code::Atom(_) => self.clone(),
            Code::List(children) => {
                if children.is_empty() {
                    return Code::empty_list();
                }
                let idx = Code::nth_flat_index(children.len(), i);
                children[idx].clone()
            }
        }
    }

    /// Like `nth`, but returns the remainder of the list from that index on.
    pub fn nthcdr(&self, i: i64) -> Code {
        match self {
            Code::Atom(_) => self.clone(),
            Code::List(children) => {
                if children.is_empty() {
                    return Code::empty_list();
                }
                let idx = Code::nth_flat_index(children.len(), i);
                Code::list(children[idx..].to_vec())
            }
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Atom(token) => write!(f, "{}", token),
            Code::List(children) => {
                write!(f, "(")?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, " )")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_atoms_only() {
        let c = Code::list(vec![
            Code::atom("1"),
            Code::list(vec![Code::atom("2"), Code::atom("3")]),
        ]);
        assert_eq!(c.length(), 3);
    }

    #[test]
    fn empty_list_has_zero_length() {
        assert_eq!(Code::empty_list().length(), 0);
    }

    #[test]
    fn contains_finds_nested_subtree() {
        let inner = Code::atom("x");
        let c = Code::list(vec![Code::atom("a"), Code::list(vec![inner.clone()])]);
        assert!(c.contains(&inner));
        assert!(!c.contains(&Code::atom("y")));
    }

    #[test]
    fn container_finds_direct_parent() {
        let target = Code::atom("x");
        let inner = Code::list(vec![Code::atom("a"), target.clone()]);
        let c = Code::list(vec![Code::atom("z"), inner.clone()]);
        assert_eq!(c.container(&target), inner);
    }

    #[test]
    fn container_returns_empty_when_absent() {
        let c = Code::list(vec![Code::atom("a")]);
        assert_eq!(c.container(&Code::atom("missing")), Code::empty_list());
    }

    #[test]
    fn unique_items_counts_each_atom() {
        let c = Code::list(vec![Code::atom("a"), Code::atom("b"), Code::atom("a")]);
        let counts = c.unique_items();
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
    }

    #[test]
    fn display_round_trips_structure() {
        let c = Code::list(vec![Code::atom("1"), Code::list(vec![Code::atom("2")])]);
        assert_eq!(format!("{}", c), "( 1 ( 2 ) )");
    }

    #[test]
    fn car_and_cdr() {
        let c = Code::list(vec![Code::atom("1"), Code::atom("2"), Code::atom("3")]);
        assert_eq!(c.car(), Code::atom("1"));
        assert_eq!(c.cdr(), Code::list(vec![Code::atom("2"), Code::atom("3")]));
        assert_eq!(Code::atom("x").car(), Code::empty_list());
    }

    #[test]
    fn point_count_includes_list_nodes() {
        let c = Code::list(vec![Code::atom("1"), Code::list(vec![Code::atom("2")])]);
        // self, the inner list, and two atoms.
        assert_eq!(c.point_count(), 4);
        assert_eq!(Code::atom("x").point_count(), 1);
    }

    #[test]
    fn cons_prepends() {
        let c = Code::atom("1").cons(&Code::list(vec![Code::atom("2")]));
        assert_eq!(c, Code::list(vec![Code::atom("1"), Code::atom("2")]));
    }
}
