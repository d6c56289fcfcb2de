#![allow(missing_docs)]

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// Reads `data/<name>.txt`.
pub fn load(name: &str) -> String {
    let path = format!("{}/data/{name}.txt", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to load {path}: {e}"))
}

pub type File<'s> = codespan_reporting::files::SimpleFile<&'static str, &'s str>;

pub fn emit_diags(f: &File<'_>, error: impl IntoIterator<Item = Diagnostic<()>>) -> String {
    let mut output = codespan_reporting::term::termcolor::NoColor::new(Vec::new());

    for diag in error {
        codespan_reporting::term::emit_to_write_style(
            &mut output,
            &codespan_reporting::term::Config::default(),
            f,
            &diag,
        )
        .expect("failed to render diagnostic");
    }

    String::from_utf8(output.into_inner()).unwrap()
}

/// Renders one note per entry, labelled with the entry key, so span
/// regressions show up as a changed picture.
pub fn collect_spans(block: &field_fmt::Block<'_>, path: &str, diags: &mut Vec<Diagnostic<()>>) {
    for entry in block {
        let key = format!("{path}.{}", entry.key);
        let code = match &entry.value {
            None => "bare",
            Some(field_fmt::Value::Scalar(_)) => "scalar",
            Some(field_fmt::Value::Block(inner)) => {
                collect_spans(inner, &key, diags);
                "block"
            }
        };
        diags.push(
            Diagnostic::note()
                .with_code(code)
                .with_message(key)
                .with_labels(vec![Label::primary((), entry.span())]),
        );
    }
}

/// Loads an invalid data file, asserts that parsing fails with the given
/// diagnostic code and that the rendered diagnostic points at the file.
#[macro_export]
macro_rules! invalid {
    ($name:ident, $code:literal) => {
        #[test]
        fn $name() {
            let text = $crate::load(stringify!($name));
            let error = field_fmt::parse(&text).unwrap_err();
            let diag = error.to_diagnostic(());
            assert_eq!(diag.code.as_deref(), Some($code));

            let file = $crate::File::new(stringify!($name), &text);
            let rendered = $crate::emit_diags(&file, Some(diag));
            assert!(rendered.contains(concat!("[", $code, "]")), "{rendered}");
            assert!(rendered.contains(stringify!($name)), "{rendered}");
        }
    };
}
