use crate::strings::string_repr;
use crate::types::MalObject;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Quote and escape strings so the output reads back to an equal value.
    ReadableRepresentation,
    /// Emit string contents as they are, for display to a human.
    Directly,
}

impl From<bool> for PrintMode {
    fn from(readable: bool) -> Self {
        match readable {
            true => PrintMode::ReadableRepresentation,
            false => PrintMode::Directly,
        }
    }
}

fn join(elements: &[MalObject], mode: PrintMode) -> String {
    elements.iter().map(|obj| pr_str(obj, mode)).join(" ")
}

pub fn pr_str(object: &MalObject, mode: PrintMode) -> String {
    match object {
        MalObject::Integer(value) => value.to_string(),
        MalObject::String(s) => match mode {
            PrintMode::ReadableRepresentation => string_repr(s),
            PrintMode::Directly => s.clone(),
        },
        MalObject::Keyword(name) => format!(":{}", name),
        MalObject::Symbol(name) => name.to_string(),
        MalObject::List(elements) => format!("({})", join(elements, mode)),
        MalObject::Vector(elements) => format!("[{}]", join(elements, mode)),
        MalObject::Map(entries) => format!("{{{}}}", join(entries, mode)),
        MalObject::Primitive(f) => format!("#<function {}>", f.name),
    }
}

pub fn print(object: &MalObject, readable: bool) -> String {
    pr_str(object, PrintMode::from(readable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core;

    fn sample_list() -> MalObject {
        MalObject::wrap_list(vec![
            MalObject::new_symbol("f"),
            MalObject::Integer(-3),
            MalObject::new_string("a\"b\n"),
            MalObject::new_keyword("k"),
        ])
    }

    #[test]
    fn atoms() {
        assert_eq!(print(&MalObject::Integer(42), true), "42");
        assert_eq!(print(&MalObject::Integer(-7), false), "-7");
        assert_eq!(print(&MalObject::new_symbol("abc"), true), "abc");
    }

    #[test]
    fn strings_depend_on_mode() {
        let s = MalObject::new_string("say \"hi\"\n\\");
        assert_eq!(print(&s, true), r#""say \"hi\"\n\\""#);
        assert_eq!(print(&s, false), "say \"hi\"\n\\");
        assert_eq!(print(&MalObject::new_string(""), true), r#""""#);
        assert_eq!(print(&MalObject::new_string(""), false), "");
    }

    #[test]
    fn keywords_ignore_mode() {
        let k = MalObject::new_keyword("foo");
        assert_eq!(print(&k, true), ":foo");
        assert_eq!(print(&k, false), ":foo");
    }

    #[test]
    fn containers_use_single_spaces() {
        assert_eq!(print(&sample_list(), true), r#"(f -3 "a\"b\n" :k)"#);
        assert_eq!(print(&sample_list(), false), "(f -3 a\"b\n :k)");
        let vector = MalObject::wrap_vector(vec![MalObject::Integer(1), sample_list()]);
        assert_eq!(print(&vector, true), r#"[1 (f -3 "a\"b\n" :k)]"#);
        let map = MalObject::wrap_map(vec![
            MalObject::new_keyword("a"),
            MalObject::Integer(1),
            MalObject::new_string("b"),
            MalObject::wrap_vector(vec![]),
        ]);
        assert_eq!(print(&map, true), r#"{:a 1 "b" []}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(print(&MalObject::new_list(), true), "()");
        assert_eq!(print(&MalObject::wrap_vector(vec![]), true), "[]");
        assert_eq!(print(&MalObject::wrap_map(vec![]), true), "{}");
    }

    #[test]
    fn primitives_print_their_name() {
        assert_eq!(
            print(&MalObject::Primitive(&core::ADD), true),
            "#<function +>"
        );
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(sample_list().to_string(), r#"(f -3 "a\"b\n" :k)"#);
    }
}
